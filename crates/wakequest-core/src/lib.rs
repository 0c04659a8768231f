//! # WakeQuest Core Library
//!
//! Core business logic for WakeQuest, a wake-up alarm that gamifies getting
//! out of bed: a ringing alarm is dismissed by solving a streak of arithmetic
//! problems, and every successful wake feeds XP, levels, coins and a daily
//! streak. The library is CLI-first -- all operations are available through
//! the `wakequest` binary, and a GUI shell would be a thin layer over the
//! same core.
//!
//! ## Architecture
//!
//! - **Occurrence Calculator**: pure function from alarm definition plus a
//!   reference instant to the next concrete firing instant
//! - **Schedule Reconciler**: keeps the persisted alarm-id to trigger-handle
//!   map consistent across create/edit/disable/fire/snooze/resolve
//! - **Challenge Generator**: arithmetic problems and the mission session
//!   that gates dismissal
//! - **Progression Engine**: pure player state transition for a completed
//!   wake
//! - **Storage**: SQLite kv documents for alarms, player and schedule map,
//!   TOML for configuration
//!
//! ## Key Components
//!
//! - [`Reconciler`]: lifecycle orchestrator
//! - [`next_occurrence`]: occurrence calculator
//! - [`Mission`]: in-flight wake mission
//! - [`apply_success`]: progression transition
//! - [`Database`] / [`Config`]: persistence

pub mod alarm;
pub mod error;
pub mod events;
pub mod game;
pub mod platform;
pub mod storage;

pub use alarm::occurrence::next_occurrence;
pub use alarm::reconciler::Reconciler;
pub use alarm::{Alarm, Difficulty, TimeOfDay};
pub use error::{ConfigError, CoreError, Result, StorageError, ValidationError};
pub use events::Event;
pub use game::{
    apply_success, generate, required_streak, reward_for, Mission, MissionOutcome, Op, Player,
    Problem, Reward,
};
pub use platform::{AudioSink, Notifier, TriggerHandle};
pub use storage::{
    AlarmStore, Config, Database, PlayerStore, ScheduleMap, ScheduleMapStore, SqliteAlarmStore,
    SqlitePlayerStore, SqliteScheduleMapStore,
};
