//! CLI stand-ins for the platform collaborators.
//!
//! The real notification and audio services belong to a host platform the
//! CLI does not have. [`KvNotifier`] records pending triggers as a kv
//! document so `wakequest ring due` can surface them, and [`LogAudio`] turns
//! the audio loop into log lines. Both keep the reconciler exercised
//! end-to-end through the same traits a GUI shell would implement.

use std::collections::BTreeMap;
use std::rc::Rc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use wakequest_core::{AudioSink, Database, Notifier, Result, TriggerHandle};

const TRIGGERS_KEY: &str = "pending_triggers:v1";

/// One installed-but-not-yet-fired trigger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingTrigger {
    pub alarm_id: String,
    pub label: String,
    pub fires_at: NaiveDateTime,
}

/// Notifier backed by the kv store.
pub struct KvNotifier {
    db: Rc<Database>,
}

impl KvNotifier {
    pub fn new(db: Rc<Database>) -> Self {
        Self { db }
    }

    fn load(&self) -> Result<BTreeMap<String, PendingTrigger>> {
        match self.db.kv_get(TRIGGERS_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json).unwrap_or_default()),
            None => Ok(BTreeMap::new()),
        }
    }

    fn store(&self, map: &BTreeMap<String, PendingTrigger>) -> Result<()> {
        let json = serde_json::to_string(map)?;
        self.db.kv_set(TRIGGERS_KEY, &json)?;
        Ok(())
    }

    /// All pending triggers, soonest first.
    pub fn pending(&self) -> Result<Vec<(TriggerHandle, PendingTrigger)>> {
        let mut entries: Vec<_> = self
            .load()?
            .into_iter()
            .map(|(handle, trigger)| (TriggerHandle::new(handle), trigger))
            .collect();
        entries.sort_by_key(|(_, t)| t.fires_at);
        Ok(entries)
    }

    /// Pending triggers whose fire time has passed.
    pub fn due(&self, now: NaiveDateTime) -> Result<Vec<(TriggerHandle, PendingTrigger)>> {
        Ok(self
            .pending()?
            .into_iter()
            .filter(|(_, t)| t.fires_at <= now)
            .collect())
    }

    /// Drop the pending entries for an alarm whose trigger the "platform"
    /// just delivered. Absent entries are fine.
    pub fn consume_for_alarm(&mut self, alarm_id: &str) -> Result<()> {
        let mut map = self.load()?;
        map.retain(|_, t| t.alarm_id != alarm_id);
        self.store(&map)
    }
}

impl Notifier for KvNotifier {
    fn install(
        &mut self,
        fires_at: NaiveDateTime,
        alarm_id: &str,
        label: &str,
    ) -> Result<TriggerHandle> {
        let handle = TriggerHandle::new(Uuid::new_v4().to_string());
        let mut map = self.load()?;
        map.insert(
            handle.as_str().to_string(),
            PendingTrigger {
                alarm_id: alarm_id.to_string(),
                label: label.to_string(),
                fires_at,
            },
        );
        self.store(&map)?;
        Ok(handle)
    }

    fn cancel(&mut self, handle: &TriggerHandle) -> Result<()> {
        let mut map = self.load()?;
        // Unknown or already-fired handles cancel successfully.
        map.remove(handle.as_str());
        self.store(&map)
    }
}

/// Audio sink that logs instead of playing. Best-effort by construction.
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn start_loop(&mut self, sound_id: &str, volume: f32) -> Result<()> {
        info!(sound_id, volume, "alarm loop started");
        Ok(())
    }

    fn stop_loop(&mut self) -> Result<()> {
        info!("alarm loop stopped");
        Ok(())
    }
}
