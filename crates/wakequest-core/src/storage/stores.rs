//! Durable store contracts and their SQLite implementations.
//!
//! The reconciler only sees the traits; anything that can hold three JSON
//! documents qualifies. Reads are lenient -- an absent or unreadable document
//! resolves to its default (a corrupt record is logged, never fatal). Writes
//! are last-write-wins with no cross-store transactions.

use std::collections::BTreeMap;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use super::Database;
use crate::alarm::Alarm;
use crate::error::Result;
use crate::game::Player;
use crate::platform::TriggerHandle;

const ALARMS_KEY: &str = "alarms:v1";
const PLAYER_KEY: &str = "player:v1";
const SCHEDULE_MAP_KEY: &str = "alarm_schedule_map:v1";

/// Persisted alarm-id to trigger-handle table. A key exists iff that alarm
/// currently has a live outstanding trigger.
pub type ScheduleMap = BTreeMap<String, TriggerHandle>;

/// Durable alarm collection.
pub trait AlarmStore {
    fn list_all(&self) -> Result<Vec<Alarm>>;
    fn get_by_id(&self, id: &str) -> Result<Option<Alarm>>;
    fn upsert(&mut self, alarm: &Alarm) -> Result<()>;
    fn delete(&mut self, id: &str) -> Result<()>;
}

/// Durable player singleton.
pub trait PlayerStore {
    /// Returns a zero-valued default if never initialized.
    fn get(&self) -> Result<Player>;
    fn save(&mut self, player: &Player) -> Result<()>;
}

/// Durable schedule map.
pub trait ScheduleMapStore {
    fn get(&self) -> Result<ScheduleMap>;
    fn save(&mut self, map: &ScheduleMap) -> Result<()>;
}

fn load_doc<T: Default + DeserializeOwned>(db: &Database, key: &str) -> Result<T> {
    match db.kv_get(key)? {
        Some(json) => match serde_json::from_str(&json) {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!(key, error = %e, "unreadable stored document, using default");
                Ok(T::default())
            }
        },
        None => Ok(T::default()),
    }
}

fn save_doc<T: Serialize>(db: &Database, key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    db.kv_set(key, &json)?;
    Ok(())
}

/// Alarm collection as a JSON document in the kv table.
pub struct SqliteAlarmStore {
    db: Rc<Database>,
}

impl SqliteAlarmStore {
    pub fn new(db: Rc<Database>) -> Self {
        Self { db }
    }
}

impl AlarmStore for SqliteAlarmStore {
    fn list_all(&self) -> Result<Vec<Alarm>> {
        load_doc(&self.db, ALARMS_KEY)
    }

    fn get_by_id(&self, id: &str) -> Result<Option<Alarm>> {
        Ok(self.list_all()?.into_iter().find(|a| a.id == id))
    }

    fn upsert(&mut self, alarm: &Alarm) -> Result<()> {
        let mut alarms = self.list_all()?;
        match alarms.iter_mut().find(|a| a.id == alarm.id) {
            Some(existing) => *existing = alarm.clone(),
            None => alarms.push(alarm.clone()),
        }
        save_doc(&self.db, ALARMS_KEY, &alarms)
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        let mut alarms = self.list_all()?;
        alarms.retain(|a| a.id != id);
        save_doc(&self.db, ALARMS_KEY, &alarms)
    }
}

/// Player singleton as a JSON document in the kv table.
pub struct SqlitePlayerStore {
    db: Rc<Database>,
}

impl SqlitePlayerStore {
    pub fn new(db: Rc<Database>) -> Self {
        Self { db }
    }
}

impl PlayerStore for SqlitePlayerStore {
    fn get(&self) -> Result<Player> {
        load_doc(&self.db, PLAYER_KEY)
    }

    fn save(&mut self, player: &Player) -> Result<()> {
        save_doc(&self.db, PLAYER_KEY, player)
    }
}

/// Schedule map as a JSON document in the kv table.
pub struct SqliteScheduleMapStore {
    db: Rc<Database>,
}

impl SqliteScheduleMapStore {
    pub fn new(db: Rc<Database>) -> Self {
        Self { db }
    }
}

impl ScheduleMapStore for SqliteScheduleMapStore {
    fn get(&self) -> Result<ScheduleMap> {
        load_doc(&self.db, SCHEDULE_MAP_KEY)
    }

    fn save(&mut self, map: &ScheduleMap) -> Result<()> {
        save_doc(&self.db, SCHEDULE_MAP_KEY, map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarm::TimeOfDay;

    fn open() -> Rc<Database> {
        Rc::new(Database::open_memory().unwrap())
    }

    fn alarm(label: &str) -> Alarm {
        let mut alarm = Alarm::new(TimeOfDay::new(7, 0).unwrap());
        alarm.label = label.to_string();
        alarm
    }

    #[test]
    fn alarm_store_roundtrip() {
        let db = open();
        let mut store = SqliteAlarmStore::new(db.clone());
        assert!(store.list_all().unwrap().is_empty());

        let a = alarm("first");
        store.upsert(&a).unwrap();
        let listed = store.list_all().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].label, "first");
        assert_eq!(store.get_by_id(&a.id).unwrap().unwrap().id, a.id);
    }

    #[test]
    fn upsert_replaces_existing_alarm() {
        let db = open();
        let mut store = SqliteAlarmStore::new(db);
        let mut a = alarm("before");
        store.upsert(&a).unwrap();
        a.label = "after".to_string();
        store.upsert(&a).unwrap();

        let listed = store.list_all().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].label, "after");
    }

    #[test]
    fn delete_removes_only_target() {
        let db = open();
        let mut store = SqliteAlarmStore::new(db);
        let a = alarm("keep");
        let b = alarm("drop");
        store.upsert(&a).unwrap();
        store.upsert(&b).unwrap();

        store.delete(&b.id).unwrap();
        let listed = store.list_all().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, a.id);

        // Deleting an unknown id is a no-op.
        store.delete("nope").unwrap();
        assert_eq!(store.list_all().unwrap().len(), 1);
    }

    #[test]
    fn player_store_defaults_then_persists() {
        let db = open();
        let mut store = SqlitePlayerStore::new(db);
        let p = store.get().unwrap();
        assert_eq!(p, Player::default());

        let mut p = p;
        p.coins = 42;
        store.save(&p).unwrap();
        assert_eq!(store.get().unwrap().coins, 42);
    }

    #[test]
    fn schedule_map_store_roundtrip() {
        let db = open();
        let mut store = SqliteScheduleMapStore::new(db);
        assert!(store.get().unwrap().is_empty());

        let mut map = ScheduleMap::new();
        map.insert("a1".to_string(), TriggerHandle::new("t-1"));
        store.save(&map).unwrap();
        assert_eq!(
            store.get().unwrap().get("a1"),
            Some(&TriggerHandle::new("t-1"))
        );
    }

    #[test]
    fn corrupt_document_resolves_to_default() {
        let db = open();
        db.kv_set(ALARMS_KEY, "{not json").unwrap();
        let store = SqliteAlarmStore::new(db);
        assert!(store.list_all().unwrap().is_empty());
    }
}
