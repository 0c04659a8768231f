//! Platform collaborator contracts.
//!
//! The core never talks to the host notification or audio services directly;
//! it goes through these traits. The CLI provides a kv-backed notifier and a
//! logging audio sink, the desktop shell would plug in the real services, and
//! tests use recording fakes.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Opaque token representing one scheduled future alert, issued by the
/// notification collaborator.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TriggerHandle(String);

impl TriggerHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TriggerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The host notification delivery service.
pub trait Notifier {
    /// Install a trigger that fires at `fires_at` local wall-clock time,
    /// carrying the alarm id back to the host when it delivers.
    fn install(
        &mut self,
        fires_at: NaiveDateTime,
        alarm_id: &str,
        label: &str,
    ) -> Result<TriggerHandle>;

    /// Cancel a previously installed trigger. Cancelling a handle that has
    /// already fired or is unknown is a success, not an error.
    fn cancel(&mut self, handle: &TriggerHandle) -> Result<()>;
}

/// The host audio playback service. Best-effort: callers log failures and
/// carry on, a broken speaker must never abort an alarm resolution.
pub trait AudioSink {
    fn start_loop(&mut self, sound_id: &str, volume: f32) -> Result<()>;
    fn stop_loop(&mut self) -> Result<()>;
}
