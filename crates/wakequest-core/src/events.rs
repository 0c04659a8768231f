use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every alarm lifecycle transition produces an Event.
/// The CLI prints them as JSON; a GUI shell would subscribe to them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A trigger was installed for the alarm's next occurrence.
    AlarmArmed {
        alarm_id: String,
        fires_at: NaiveDateTime,
        at: DateTime<Utc>,
    },
    /// Any outstanding trigger was cancelled.
    AlarmDisarmed {
        alarm_id: String,
        at: DateTime<Utc>,
    },
    /// The alarm record was removed along with its trigger.
    AlarmDeleted {
        alarm_id: String,
        at: DateTime<Utc>,
    },
    /// The platform reported the trigger fired; the ring cycle begins.
    AlarmFired {
        alarm_id: String,
        label: String,
        at: DateTime<Utc>,
    },
    /// A snooze trigger was installed at now + snooze_minutes.
    AlarmSnoozed {
        alarm_id: String,
        fires_at: NaiveDateTime,
        snoozes_remaining: u32,
        at: DateTime<Utc>,
    },
    /// The wake mission was solved and progression applied.
    WakeResolved {
        alarm_id: String,
        xp_gained: u32,
        coins_gained: u32,
        level: u32,
        leveled_up: bool,
        streak_days: u32,
        /// Next occurrence installed for repeating alarms, absent for
        /// one-offs (they stay enabled but unscheduled).
        rearmed_for: Option<NaiveDateTime>,
        at: DateTime<Utc>,
    },
    /// Startup reconciliation finished.
    AuditCompleted {
        rearmed: u32,
        cancelled: u32,
        at: DateTime<Utc>,
    },
}
