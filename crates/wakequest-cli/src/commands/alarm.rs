use std::collections::BTreeSet;

use clap::Subcommand;
use serde::Serialize;

use wakequest_core::{
    next_occurrence, Alarm, AlarmStore, Config, ScheduleMapStore, SqliteAlarmStore,
    SqliteScheduleMapStore, ValidationError,
};

use super::{now_local, open_db, print_json, reconciler};

#[derive(Subcommand)]
pub enum AlarmAction {
    /// Create a new alarm (unset flags fall back to configured defaults)
    Add {
        /// Wake time as HH:MM
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        label: Option<String>,
        /// Repeat weekdays, e.g. "mon,wed,fri" or "1,3,5"; omit for one-off
        #[arg(long)]
        repeat: Option<String>,
        /// easy, medium or hard
        #[arg(long)]
        difficulty: Option<String>,
        #[arg(long)]
        sound: Option<String>,
        /// Playback volume 0.0-1.0
        #[arg(long)]
        volume: Option<f32>,
        #[arg(long)]
        snooze_minutes: Option<u32>,
        #[arg(long)]
        snooze_max: Option<u32>,
        /// Disable snoozing entirely
        #[arg(long)]
        no_snooze: bool,
        /// Create without arming
        #[arg(long)]
        disabled: bool,
    },
    /// List alarms with their armed state
    List,
    /// Show one alarm
    Show { id: String },
    /// Edit fields of an existing alarm and reconcile its trigger
    Edit {
        id: String,
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        repeat: Option<String>,
        #[arg(long)]
        difficulty: Option<String>,
        #[arg(long)]
        sound: Option<String>,
        #[arg(long)]
        volume: Option<f32>,
        #[arg(long)]
        snooze_minutes: Option<u32>,
        #[arg(long)]
        snooze_max: Option<u32>,
    },
    /// Arm an alarm
    Enable { id: String },
    /// Cancel an alarm's outstanding trigger
    Disable { id: String },
    /// Delete an alarm and its trigger
    Delete { id: String },
}

/// Parse a repeat-days flag: weekday names or indices, comma separated.
/// "none" clears the set (one-off).
fn parse_repeat_days(raw: &str) -> Result<BTreeSet<u8>, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("none") {
        return Ok(BTreeSet::new());
    }
    let mut days = BTreeSet::new();
    for token in raw.split(',') {
        let token = token.trim().to_ascii_lowercase();
        let day = match token.as_str() {
            "sun" | "sunday" => 0,
            "mon" | "monday" => 1,
            "tue" | "tuesday" => 2,
            "wed" | "wednesday" => 3,
            "thu" | "thursday" => 4,
            "fri" | "friday" => 5,
            "sat" | "saturday" => 6,
            other => other
                .parse::<u8>()
                .map_err(|_| ValidationError::InvalidValue {
                    field: "repeat".to_string(),
                    message: format!("unrecognized weekday '{other}'"),
                })?,
        };
        if day > 6 {
            return Err(ValidationError::InvalidWeekday(day));
        }
        days.insert(day);
    }
    Ok(days)
}

/// Alarm plus derived schedule info for display.
#[derive(Serialize)]
struct AlarmView {
    #[serde(flatten)]
    alarm: Alarm,
    armed: bool,
    next_occurrence: Option<chrono::NaiveDateTime>,
}

fn view(alarm: Alarm, armed: bool) -> AlarmView {
    let next = alarm
        .enabled
        .then(|| next_occurrence(&alarm, now_local()));
    AlarmView {
        alarm,
        armed,
        next_occurrence: next,
    }
}

#[allow(clippy::too_many_arguments)]
fn apply_edits(
    alarm: &mut Alarm,
    time: Option<String>,
    label: Option<String>,
    repeat: Option<String>,
    difficulty: Option<String>,
    sound: Option<String>,
    volume: Option<f32>,
    snooze_minutes: Option<u32>,
    snooze_max: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(time) = time {
        alarm.time_of_day = time.parse()?;
    }
    if let Some(label) = label {
        alarm.label = label;
    }
    if let Some(repeat) = repeat {
        alarm.repeat_days = parse_repeat_days(&repeat)?;
    }
    if let Some(difficulty) = difficulty {
        alarm.difficulty = difficulty.parse()?;
    }
    if let Some(sound) = sound {
        alarm.sound_id = sound;
    }
    if let Some(volume) = volume {
        alarm.volume = volume;
    }
    if let Some(minutes) = snooze_minutes {
        alarm.snooze_minutes = minutes;
    }
    if let Some(max) = snooze_max {
        alarm.snooze_max = max;
        alarm.snooze_count = alarm.snooze_count.min(max);
    }
    Ok(())
}

pub fn run(action: AlarmAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_db()?;

    match action {
        AlarmAction::Add {
            time,
            label,
            repeat,
            difficulty,
            sound,
            volume,
            snooze_minutes,
            snooze_max,
            no_snooze,
            disabled,
        } => {
            let mut alarm = Config::load_or_default().default_alarm();
            apply_edits(
                &mut alarm,
                time,
                label,
                repeat,
                difficulty,
                sound,
                volume,
                snooze_minutes,
                snooze_max,
            )?;
            if no_snooze {
                alarm.snooze_enabled = false;
            }
            if disabled {
                alarm.enabled = false;
            }
            let event = reconciler(&db).upsert(alarm.clone(), now_local())?;
            print_json(&view(alarm, !disabled))?;
            print_json(&event)?;
        }
        AlarmAction::List => {
            let store = SqliteAlarmStore::new(db.clone());
            let map = SqliteScheduleMapStore::new(db.clone()).get()?;
            let views: Vec<AlarmView> = store
                .list_all()?
                .into_iter()
                .map(|a| {
                    let armed = map.contains_key(&a.id);
                    view(a, armed)
                })
                .collect();
            print_json(&views)?;
        }
        AlarmAction::Show { id } => {
            let store = SqliteAlarmStore::new(db.clone());
            match store.get_by_id(&id)? {
                Some(alarm) => {
                    let armed = SqliteScheduleMapStore::new(db.clone())
                        .get()?
                        .contains_key(&id);
                    print_json(&view(alarm, armed))?;
                }
                None => {
                    eprintln!("no alarm with id '{id}'");
                    std::process::exit(1);
                }
            }
        }
        AlarmAction::Edit {
            id,
            time,
            label,
            repeat,
            difficulty,
            sound,
            volume,
            snooze_minutes,
            snooze_max,
        } => {
            let store = SqliteAlarmStore::new(db.clone());
            let mut alarm = store
                .get_by_id(&id)?
                .ok_or_else(|| format!("no alarm with id '{id}'"))?;
            apply_edits(
                &mut alarm,
                time,
                label,
                repeat,
                difficulty,
                sound,
                volume,
                snooze_minutes,
                snooze_max,
            )?;
            let event = reconciler(&db).upsert(alarm, now_local())?;
            print_json(&event)?;
        }
        AlarmAction::Enable { id } => {
            let event = reconciler(&db).set_enabled(&id, true, now_local())?;
            print_json(&event)?;
        }
        AlarmAction::Disable { id } => {
            let event = reconciler(&db).set_enabled(&id, false, now_local())?;
            print_json(&event)?;
        }
        AlarmAction::Delete { id } => {
            let event = reconciler(&db).delete(&id)?;
            print_json(&event)?;
        }
    }

    Ok(())
}
