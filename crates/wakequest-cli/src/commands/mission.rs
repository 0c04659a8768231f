use clap::Subcommand;
use serde::Serialize;

use wakequest_core::{AlarmStore, Mission, MissionOutcome, SqliteAlarmStore};

use super::{now_local, open_db, print_json, reconciler};

/// The in-flight mission is parked in the kv store between invocations.
const MISSION_KEY: &str = "mission:v1";

#[derive(Subcommand)]
pub enum MissionAction {
    /// Begin the math mission for a ringing alarm
    Start { id: String },
    /// Submit an answer to the current problem
    Answer { value: i64 },
    /// Show the current problem and streak progress
    Status,
    /// Abandon the active mission without resolving the alarm
    Abandon,
}

/// Mission as shown to the player -- the answer stays hidden.
#[derive(Serialize)]
struct MissionView {
    alarm_id: String,
    difficulty: String,
    prompt: String,
    correct: u32,
    required: u32,
}

fn view_of(mission: &Mission) -> MissionView {
    MissionView {
        alarm_id: mission.alarm_id.clone(),
        difficulty: mission.difficulty.to_string(),
        prompt: mission.problem.prompt(),
        correct: mission.correct,
        required: mission.required,
    }
}

fn load_mission(db: &wakequest_core::Database) -> Result<Option<Mission>, Box<dyn std::error::Error>> {
    match db.kv_get(MISSION_KEY)? {
        Some(json) => Ok(serde_json::from_str(&json).ok()),
        None => Ok(None),
    }
}

fn save_mission(
    db: &wakequest_core::Database,
    mission: &Mission,
) -> Result<(), Box<dyn std::error::Error>> {
    db.kv_set(MISSION_KEY, &serde_json::to_string(mission)?)?;
    Ok(())
}

pub fn run(action: MissionAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_db()?;
    let mut rng = rand::thread_rng();

    match action {
        MissionAction::Start { id } => {
            let store = SqliteAlarmStore::new(db.clone());
            let alarm = store
                .get_by_id(&id)?
                .ok_or_else(|| format!("no alarm with id '{id}'"))?;
            let mission = Mission::begin(alarm.id.as_str(), alarm.difficulty, &mut rng);
            save_mission(&db, &mission)?;
            print_json(&view_of(&mission))?;
        }
        MissionAction::Answer { value } => {
            let mut mission =
                load_mission(&db)?.ok_or("no active mission; run `mission start` first")?;
            match mission.submit(value, &mut rng) {
                MissionOutcome::Solved => {
                    db.kv_delete(MISSION_KEY)?;
                    let event = reconciler(&db).resolve_success(&mission.alarm_id, now_local())?;
                    print_json(&event)?;
                }
                outcome @ (MissionOutcome::Correct { .. } | MissionOutcome::Wrong) => {
                    save_mission(&db, &mission)?;
                    print_json(&outcome)?;
                    print_json(&view_of(&mission))?;
                }
            }
        }
        MissionAction::Status => match load_mission(&db)? {
            Some(mission) => print_json(&view_of(&mission))?,
            None => println!("{{\"active\": false}}"),
        },
        MissionAction::Abandon => {
            db.kv_delete(MISSION_KEY)?;
            println!("{{\"type\": \"mission_abandoned\"}}");
        }
    }

    Ok(())
}
