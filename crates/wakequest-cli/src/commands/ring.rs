use clap::Subcommand;
use serde::Serialize;

use crate::notifier::KvNotifier;

use super::{now_local, open_db, print_json, reconciler};

#[derive(Subcommand)]
pub enum RingAction {
    /// List installed triggers whose fire time has passed
    Due,
    /// Route a fired trigger for the alarm into the ring cycle
    Fire { id: String },
    /// Snooze the ringing alarm for its fixed snooze duration
    Snooze { id: String },
}

#[derive(Serialize)]
struct DueView {
    handle: String,
    alarm_id: String,
    label: String,
    fires_at: chrono::NaiveDateTime,
}

pub fn run(action: RingAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_db()?;

    match action {
        RingAction::Due => {
            let kv = KvNotifier::new(db.clone());
            let due: Vec<DueView> = kv
                .due(now_local())?
                .into_iter()
                .map(|(handle, t)| DueView {
                    handle: handle.as_str().to_string(),
                    alarm_id: t.alarm_id,
                    label: t.label,
                    fires_at: t.fires_at,
                })
                .collect();
            print_json(&due)?;
        }
        RingAction::Fire { id } => {
            // The "platform" consumed the trigger when it delivered.
            let mut kv = KvNotifier::new(db.clone());
            kv.consume_for_alarm(&id)?;
            let event = reconciler(&db).handle_fired(&id, now_local())?;
            print_json(&event)?;
        }
        RingAction::Snooze { id } => {
            let event = reconciler(&db).snooze(&id, now_local())?;
            print_json(&event)?;
        }
    }

    Ok(())
}
