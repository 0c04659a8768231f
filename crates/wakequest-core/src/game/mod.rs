//! The wake game: math missions and player progression.

pub mod challenge;
pub mod progression;

pub use challenge::{generate, required_streak, Mission, MissionOutcome, Op, Problem};
pub use progression::{apply_success, reward_for, Player, Reward};
