pub mod alarm;
pub mod audit;
pub mod config;
pub mod mission;
pub mod player;
pub mod ring;

use std::rc::Rc;

use chrono::{Local, NaiveDateTime};

use wakequest_core::{
    Database, Reconciler, SqliteAlarmStore, SqlitePlayerStore, SqliteScheduleMapStore,
};

use crate::notifier::{KvNotifier, LogAudio};

pub fn open_db() -> Result<Rc<Database>, Box<dyn std::error::Error>> {
    Ok(Rc::new(Database::open()?))
}

/// Wire a reconciler over the shared database and the CLI collaborators.
pub fn reconciler(db: &Rc<Database>) -> Reconciler {
    Reconciler::new(
        Box::new(SqliteAlarmStore::new(db.clone())),
        Box::new(SqlitePlayerStore::new(db.clone())),
        Box::new(SqliteScheduleMapStore::new(db.clone())),
        Box::new(KvNotifier::new(db.clone())),
        Box::new(LogAudio),
    )
}

/// Wall-clock reads happen only here, at the CLI edge.
pub fn now_local() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
