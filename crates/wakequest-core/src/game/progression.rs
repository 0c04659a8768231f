//! Player progression.
//!
//! A completed wake feeds XP, coins, the streak and the wake counter.
//! `apply_success` is a pure state transition -- the caller loads the player,
//! applies, and persists the result.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::alarm::{Alarm, Difficulty};

/// Singleton progression state. Re-created with zero defaults if absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Player {
    pub level: u32,
    /// Always `0 <= xp < xp_to_next`.
    pub xp: u32,
    pub xp_to_next: u32,
    pub coins: u32,
    pub streak_days: u32,
    /// Local calendar date of the most recent successful wake.
    pub last_success_date: Option<NaiveDate>,
    pub total_wakes: u32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            level: 1,
            xp: 0,
            xp_to_next: xp_required(1),
            coins: 0,
            streak_days: 0,
            last_success_date: None,
            total_wakes: 0,
        }
    }
}

/// XP and coins granted by one successful wake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub xp: u32,
    pub coins: u32,
}

/// Fixed reward table keyed by difficulty tier.
pub fn reward_for(difficulty: Difficulty) -> Reward {
    match difficulty {
        Difficulty::Easy => Reward { xp: 20, coins: 5 },
        Difficulty::Medium => Reward { xp: 35, coins: 8 },
        Difficulty::Hard => Reward { xp: 50, coins: 12 },
        Difficulty::Unknown => Reward { xp: 10, coins: 2 },
    }
}

/// Linearly increasing level cost curve.
fn xp_required(level: u32) -> u32 {
    100 + level * 50
}

/// Advance the player for one successfully dismissed alarm.
///
/// The level loop carries over, so a single success can produce multiple
/// level-ups. Streak continuity is judged on local calendar dates: a second
/// success the same day leaves the streak untouched (XP and coins still
/// accrue), yesterday extends it, anything else -- including a stored date in
/// the future from clock skew -- resets it to 1.
pub fn apply_success(player: &Player, alarm: &Alarm, now_local: NaiveDateTime) -> Player {
    let reward = reward_for(alarm.difficulty);

    let mut xp = player.xp + reward.xp;
    let mut level = player.level;
    let mut xp_to_next = player.xp_to_next;
    while xp >= xp_to_next {
        xp -= xp_to_next;
        level += 1;
        xp_to_next = xp_required(level);
    }

    let today = now_local.date();
    let yesterday = today - Duration::days(1);
    let streak_days = match player.last_success_date {
        None => 1,
        Some(d) if d == today => player.streak_days,
        Some(d) if d == yesterday => player.streak_days + 1,
        Some(_) => 1,
    };

    Player {
        level,
        xp,
        xp_to_next,
        coins: player.coins + reward.coins,
        streak_days,
        last_success_date: Some(today),
        total_wakes: player.total_wakes + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarm::TimeOfDay;
    use chrono::NaiveDate;

    fn alarm(difficulty: Difficulty) -> Alarm {
        let mut alarm = Alarm::new(TimeOfDay::new(7, 0).unwrap());
        alarm.difficulty = difficulty;
        alarm
    }

    fn noon(year: i32, month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn reward_table() {
        assert_eq!(reward_for(Difficulty::Easy), Reward { xp: 20, coins: 5 });
        assert_eq!(reward_for(Difficulty::Medium), Reward { xp: 35, coins: 8 });
        assert_eq!(reward_for(Difficulty::Hard), Reward { xp: 50, coins: 12 });
        assert_eq!(reward_for(Difficulty::Unknown), Reward { xp: 10, coins: 2 });
    }

    #[test]
    fn default_player_starts_at_level_one() {
        let p = Player::default();
        assert_eq!(p.level, 1);
        assert_eq!(p.xp, 0);
        assert_eq!(p.xp_to_next, 150);
        assert_eq!(p.streak_days, 0);
        assert!(p.last_success_date.is_none());
    }

    #[test]
    fn hard_success_below_threshold_does_not_level() {
        let player = Player {
            xp: 90,
            ..Player::default()
        };
        let next = apply_success(&player, &alarm(Difficulty::Hard), noon(2026, 8, 7));
        assert_eq!(next.xp, 140);
        assert_eq!(next.level, 1);
        assert_eq!(next.xp_to_next, 150);
        assert_eq!(next.coins, 12);

        // A further hard success crosses 150 and carries the remainder over.
        let after = apply_success(&next, &alarm(Difficulty::Hard), noon(2026, 8, 7));
        assert_eq!(after.level, 2);
        assert_eq!(after.xp, 40);
        assert_eq!(after.xp_to_next, 200);
    }

    #[test]
    fn carry_over_loop_supports_multiple_level_ups() {
        // Inconsistent stored state still drains through the loop.
        let player = Player {
            level: 1,
            xp: 349,
            xp_to_next: 150,
            ..Player::default()
        };
        let next = apply_success(&player, &alarm(Difficulty::Hard), noon(2026, 8, 7));
        assert_eq!(next.level, 3);
        assert_eq!(next.xp, 49);
        assert_eq!(next.xp_to_next, 250);
    }

    #[test]
    fn first_success_starts_streak_at_one() {
        let next = apply_success(&Player::default(), &alarm(Difficulty::Easy), noon(2026, 8, 7));
        assert_eq!(next.streak_days, 1);
        assert_eq!(next.last_success_date, NaiveDate::from_ymd_opt(2026, 8, 7));
        assert_eq!(next.total_wakes, 1);
    }

    #[test]
    fn yesterday_extends_streak() {
        let player = Player {
            streak_days: 4,
            last_success_date: NaiveDate::from_ymd_opt(2026, 8, 6),
            ..Player::default()
        };
        let next = apply_success(&player, &alarm(Difficulty::Easy), noon(2026, 8, 7));
        assert_eq!(next.streak_days, 5);
    }

    #[test]
    fn same_day_success_keeps_streak_but_accrues_rewards() {
        let player = Player {
            streak_days: 4,
            coins: 10,
            last_success_date: NaiveDate::from_ymd_opt(2026, 8, 7),
            ..Player::default()
        };
        let next = apply_success(&player, &alarm(Difficulty::Easy), noon(2026, 8, 7));
        assert_eq!(next.streak_days, 4);
        assert_eq!(next.coins, 15);
        assert_eq!(next.xp, 20);
        assert_eq!(next.total_wakes, 1);
    }

    #[test]
    fn gap_resets_streak_to_one() {
        let player = Player {
            streak_days: 9,
            last_success_date: NaiveDate::from_ymd_opt(2026, 8, 4),
            ..Player::default()
        };
        let next = apply_success(&player, &alarm(Difficulty::Easy), noon(2026, 8, 7));
        assert_eq!(next.streak_days, 1);
    }

    #[test]
    fn future_date_from_clock_skew_resets_streak() {
        let player = Player {
            streak_days: 9,
            last_success_date: NaiveDate::from_ymd_opt(2026, 8, 20),
            ..Player::default()
        };
        let next = apply_success(&player, &alarm(Difficulty::Easy), noon(2026, 8, 7));
        assert_eq!(next.streak_days, 1);
    }

    #[test]
    fn player_serde_defaults_fill_missing_fields() {
        let p: Player = serde_json::from_str("{\"coins\": 7}").unwrap();
        assert_eq!(p.coins, 7);
        assert_eq!(p.level, 1);
        assert_eq!(p.xp_to_next, 150);
    }
}
