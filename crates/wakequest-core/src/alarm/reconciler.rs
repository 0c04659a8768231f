//! Schedule reconciliation.
//!
//! The reconciler keeps the persisted schedule map consistent with what the
//! notification collaborator actually has armed. Per alarm it is a two-state
//! machine, `Unscheduled` or `Scheduled(handle)`, and the map holds a key
//! exactly while a live trigger is outstanding.
//!
//! Methods take `&mut self`; hosts serialize operations per alarm id (the
//! CLI is single-threaded per invocation). Every map mutation is persisted
//! before the operation reports success. A crash between "trigger installed"
//! and "map persisted" leaves an orphan the startup [`Reconciler::audit`]
//! pass cleans up.

use chrono::{Duration, NaiveDateTime, Utc};
use tracing::{debug, warn};

use super::occurrence::{next_occurrence, truncate_to_minute};
use super::Alarm;
use crate::error::{CoreError, Result, ValidationError};
use crate::events::Event;
use crate::game::{apply_success, reward_for};
use crate::platform::{AudioSink, Notifier};
use crate::storage::{AlarmStore, PlayerStore, ScheduleMapStore};

/// Stateful orchestrator over the alarm, player and schedule-map stores and
/// the platform collaborators.
pub struct Reconciler {
    alarms: Box<dyn AlarmStore>,
    players: Box<dyn PlayerStore>,
    map: Box<dyn ScheduleMapStore>,
    notifier: Box<dyn Notifier>,
    audio: Box<dyn AudioSink>,
}

impl Reconciler {
    pub fn new(
        alarms: Box<dyn AlarmStore>,
        players: Box<dyn PlayerStore>,
        map: Box<dyn ScheduleMapStore>,
        notifier: Box<dyn Notifier>,
        audio: Box<dyn AudioSink>,
    ) -> Self {
        Self {
            alarms,
            players,
            map,
            notifier,
            audio,
        }
    }

    // ── Lifecycle transitions ────────────────────────────────────────

    /// Create or edit an alarm. Enabled alarms are (re)armed for their next
    /// occurrence, disabled ones lose any outstanding trigger.
    pub fn upsert(&mut self, mut alarm: Alarm, now: NaiveDateTime) -> Result<Event> {
        alarm.validate()?;
        self.alarms.upsert(&alarm)?;
        if alarm.enabled {
            let fires_at = self.arm(&mut alarm, now)?;
            Ok(Event::AlarmArmed {
                alarm_id: alarm.id,
                fires_at,
                at: Utc::now(),
            })
        } else {
            self.disarm(&alarm.id)?;
            Ok(Event::AlarmDisarmed {
                alarm_id: alarm.id,
                at: Utc::now(),
            })
        }
    }

    /// Flip the enabled flag and reconcile. Errors if the alarm is gone.
    pub fn set_enabled(&mut self, id: &str, enabled: bool, now: NaiveDateTime) -> Result<Event> {
        let mut alarm = self.require(id)?;
        alarm.enabled = enabled;
        self.upsert(alarm, now)
    }

    /// Remove the alarm record and any outstanding trigger. Unknown ids are
    /// a no-op (cancel-style semantics).
    pub fn delete(&mut self, id: &str) -> Result<Event> {
        self.disarm(id)?;
        self.alarms.delete(id)?;
        Ok(Event::AlarmDeleted {
            alarm_id: id.to_string(),
            at: Utc::now(),
        })
    }

    /// The platform reported the alarm's trigger fired. The map entry is now
    /// stale and is dropped; re-arming waits until the wake is resolved so a
    /// repeating alarm cannot ring over its own challenge.
    pub fn handle_fired(&mut self, id: &str, _now: NaiveDateTime) -> Result<Event> {
        // The platform consumed the trigger; the entry goes away regardless
        // of whether the alarm record still exists.
        let mut map = self.map.get()?;
        if map.remove(id).is_some() {
            self.map.save(&map)?;
        }

        let alarm = self.require(id)?;
        debug!(alarm_id = id, "alarm fired, ring cycle begins");
        if let Err(e) = self.audio.start_loop(&alarm.sound_id, alarm.volume) {
            warn!(alarm_id = id, error = %e, "failed to start alarm audio loop");
        }
        Ok(Event::AlarmFired {
            alarm_id: alarm.id,
            label: alarm.label,
            at: Utc::now(),
        })
    }

    /// Snooze the ringing alarm for its fixed snooze duration.
    ///
    /// Requires snoozing enabled and `snooze_count < snooze_max`; a request
    /// past the ceiling is rejected and the count is left untouched.
    pub fn snooze(&mut self, id: &str, now: NaiveDateTime) -> Result<Event> {
        let mut alarm = self.require(id)?;
        if !alarm.snooze_enabled {
            return Err(ValidationError::SnoozeDisabled.into());
        }
        if alarm.snooze_count >= alarm.snooze_max {
            return Err(ValidationError::SnoozeExhausted {
                max: alarm.snooze_max,
            }
            .into());
        }

        if let Err(e) = self.audio.stop_loop() {
            warn!(alarm_id = id, error = %e, "failed to stop alarm audio loop");
        }

        // Fixed offset from now, not a base occurrence.
        let fires_at =
            truncate_to_minute(now) + Duration::minutes(i64::from(alarm.snooze_minutes));
        self.disarm(id)?;
        let handle = self.notifier.install(fires_at, &alarm.id, &alarm.label)?;
        let mut map = self.map.get()?;
        map.insert(alarm.id.clone(), handle);
        self.map.save(&map)?;

        alarm.snooze_count += 1;
        self.alarms.upsert(&alarm)?;
        debug!(alarm_id = id, count = alarm.snooze_count, "alarm snoozed");
        Ok(Event::AlarmSnoozed {
            alarm_id: alarm.id.clone(),
            fires_at,
            snoozes_remaining: alarm.snoozes_remaining(),
            at: Utc::now(),
        })
    }

    /// The wake mission was solved: stop the noise, reset the snooze budget,
    /// advance the player, and re-arm repeating alarms. A one-off stays
    /// enabled but unscheduled until the user re-arms it.
    pub fn resolve_success(&mut self, id: &str, now: NaiveDateTime) -> Result<Event> {
        if let Err(e) = self.audio.stop_loop() {
            warn!(alarm_id = id, error = %e, "failed to stop alarm audio loop");
        }

        let mut alarm = self.require(id)?;
        alarm.snooze_count = 0;
        self.alarms.upsert(&alarm)?;

        let player = self.players.get()?;
        let updated = apply_success(&player, &alarm, now);
        self.players.save(&updated)?;
        let reward = reward_for(alarm.difficulty);

        let rearmed_for = if !alarm.is_one_off() && alarm.enabled {
            Some(self.arm(&mut alarm, now)?)
        } else {
            None
        };

        debug!(alarm_id = id, level = updated.level, "wake resolved");
        Ok(Event::WakeResolved {
            alarm_id: alarm.id,
            xp_gained: reward.xp,
            coins_gained: reward.coins,
            level: updated.level,
            leveled_up: updated.level > player.level,
            streak_days: updated.streak_days,
            rearmed_for,
            at: Utc::now(),
        })
    }

    /// Startup reconciliation: cancel map entries whose alarm is gone or
    /// disabled, and install missing triggers for enabled alarms.
    pub fn audit(&mut self, now: NaiveDateTime) -> Result<Event> {
        let alarms = self.alarms.list_all()?;
        let mut map = self.map.get()?;

        let mut cancelled = 0u32;
        let stale: Vec<String> = map
            .keys()
            .filter(|id| {
                !alarms
                    .iter()
                    .any(|a| a.enabled && a.id.as_str() == id.as_str())
            })
            .cloned()
            .collect();
        for id in stale {
            if let Some(handle) = map.remove(&id) {
                self.notifier.cancel(&handle)?;
                cancelled += 1;
            }
        }
        self.map.save(&map)?;

        let mut rearmed = 0u32;
        for mut alarm in alarms {
            if alarm.enabled && !map.contains_key(&alarm.id) {
                self.arm(&mut alarm, now)?;
                rearmed += 1;
            }
        }

        debug!(rearmed, cancelled, "schedule audit completed");
        Ok(Event::AuditCompleted {
            rearmed,
            cancelled,
            at: Utc::now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn require(&self, id: &str) -> Result<Alarm> {
        self.alarms
            .get_by_id(id)?
            .ok_or_else(|| CoreError::AlarmNotFound(id.to_string()))
    }

    /// Install a trigger for the alarm's next base occurrence, replacing any
    /// outstanding one. A new base occurrence resets the snooze budget.
    fn arm(&mut self, alarm: &mut Alarm, now: NaiveDateTime) -> Result<NaiveDateTime> {
        self.disarm(&alarm.id)?;

        let fires_at = next_occurrence(alarm, now);
        let handle = self.notifier.install(fires_at, &alarm.id, &alarm.label)?;
        let mut map = self.map.get()?;
        map.insert(alarm.id.clone(), handle);
        self.map.save(&map)?;

        if alarm.snooze_count != 0 {
            alarm.snooze_count = 0;
            self.alarms.upsert(alarm)?;
        }
        debug!(alarm_id = %alarm.id, %fires_at, "alarm armed");
        Ok(fires_at)
    }

    /// Cancel and drop the outstanding trigger, if any. Returns whether an
    /// entry existed. Cancelling an already-fired or unknown handle is a
    /// success inside the notifier, so this never errors on staleness.
    fn disarm(&mut self, id: &str) -> Result<bool> {
        let mut map = self.map.get()?;
        match map.remove(id) {
            Some(handle) => {
                self.notifier.cancel(&handle)?;
                self.map.save(&map)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
