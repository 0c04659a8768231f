//! Alarm definitions.
//!
//! An [`Alarm`] is the persisted description of a wake-up: a wall-clock time
//! of day, an optional set of repeat weekdays, snooze policy and the
//! difficulty tier that drives both the math mission and the reward size.
//! Times carry no timezone -- they are always interpreted against the local
//! clock at evaluation time.

pub mod occurrence;
pub mod reconciler;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// A wall-clock time of day at minute granularity.
///
/// Serialized as an `"HH:MM"` string so stored documents stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8) -> Result<Self, ValidationError> {
        if hour > 23 || minute > 59 {
            return Err(ValidationError::InvalidTime(format!("{hour:02}:{minute:02}")));
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// The same instant as a chrono time, seconds zeroed.
    pub fn as_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(u32::from(self.hour), u32::from(self.minute), 0)
            .unwrap_or_default()
    }
}

impl Default for TimeOfDay {
    /// 07:00, the stock wake-up time.
    fn default() -> Self {
        Self { hour: 7, minute: 0 }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeOfDay {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ValidationError::InvalidTime(s.to_string());
        let (h, m) = s.split_once(':').ok_or_else(bad)?;
        let hour: u8 = h.trim().parse().map_err(|_| bad())?;
        let minute: u8 = m.trim().parse().map_err(|_| bad())?;
        Self::new(hour, minute).map_err(|_| bad())
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(t: TimeOfDay) -> String {
        t.to_string()
    }
}

/// Difficulty tier of the wake mission. Drives operand ranges, the required
/// correct-answer streak and the reward size.
///
/// Deserialization is lenient (`from = "String"`): a stored document written
/// by a newer build may carry a tier this build does not know, which lands on
/// `Unknown` instead of poisoning the whole alarm collection. User input goes
/// through the strict [`FromStr`] parse instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Unknown,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ValidationError;

    /// Strict parse for user input. `med` is accepted as shorthand.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" | "med" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(ValidationError::InvalidDifficulty(other.to_string())),
        }
    }
}

impl From<String> for Difficulty {
    fn from(s: String) -> Self {
        s.parse().unwrap_or(Difficulty::Unknown)
    }
}

/// A persisted alarm definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alarm {
    /// Opaque unique id, immutable after creation.
    pub id: String,
    pub time_of_day: TimeOfDay,
    pub label: String,
    pub enabled: bool,
    /// Weekday indices, 0 = Sunday .. 6 = Saturday. Empty means one-off.
    pub repeat_days: BTreeSet<u8>,
    pub sound_id: String,
    /// Playback volume, 0.0 - 1.0.
    pub volume: f32,
    pub snooze_enabled: bool,
    /// Fixed duration of a single snooze, in minutes.
    pub snooze_minutes: u32,
    /// Ceiling on snoozes per ring cycle.
    pub snooze_max: u32,
    /// Snoozes taken in the current ring cycle. Reset whenever the alarm
    /// produces a new base occurrence.
    #[serde(default)]
    pub snooze_count: u32,
    pub difficulty: Difficulty,
}

impl Alarm {
    /// A fresh alarm with a generated id and the given time.
    pub fn new(time_of_day: TimeOfDay) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            time_of_day,
            label: String::new(),
            enabled: true,
            repeat_days: BTreeSet::new(),
            sound_id: "default".to_string(),
            volume: 1.0,
            snooze_enabled: true,
            snooze_minutes: 5,
            snooze_max: 3,
            snooze_count: 0,
            difficulty: Difficulty::Easy,
        }
    }

    /// Synchronous validation of field invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for &day in &self.repeat_days {
            if day > 6 {
                return Err(ValidationError::InvalidWeekday(day));
            }
        }
        if self.snooze_minutes == 0 {
            return Err(ValidationError::InvalidValue {
                field: "snooze_minutes".to_string(),
                message: "must be a positive number of minutes".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(ValidationError::InvalidValue {
                field: "volume".to_string(),
                message: format!("{} is outside 0.0-1.0", self.volume),
            });
        }
        if self.snooze_count > self.snooze_max {
            return Err(ValidationError::InvalidValue {
                field: "snooze_count".to_string(),
                message: format!("{} exceeds snooze_max {}", self.snooze_count, self.snooze_max),
            });
        }
        Ok(())
    }

    /// Whether this alarm repeats on the given weekday (0 = Sunday).
    pub fn repeats_on(&self, weekday: u8) -> bool {
        self.repeat_days.contains(&weekday)
    }

    /// One-off alarms have no repeat weekdays.
    pub fn is_one_off(&self) -> bool {
        self.repeat_days.is_empty()
    }

    pub fn snoozes_remaining(&self) -> u32 {
        self.snooze_max.saturating_sub(self.snooze_count)
    }
}
