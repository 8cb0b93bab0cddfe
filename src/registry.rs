//! In-process player registry.
//!
//! The registry is process-wide mutable state: append-only, insertion-ordered,
//! no identity constraint (duplicates are allowed) and no teardown. The embedding
//! host serializes calls into this crate today, but the registry still locks
//! so it stays sound if it is ever reached from more than one thread.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// One player's details as stored natively
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    pub sports_type: String,
    pub age: i32,
}

impl PlayerRecord {
    pub fn new(name: impl Into<String>, sports_type: impl Into<String>, age: i32) -> Self {
        Self {
            name: name.into(),
            sports_type: sports_type.into(),
            age,
        }
    }
}

/// Append-only, insertion-ordered store of [`PlayerRecord`]s
#[derive(Default)]
pub struct PlayerRegistry {
    records: Mutex<Vec<PlayerRecord>>,
}

impl PlayerRegistry {
    pub const fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    /// Appends a record. Insertion order is the enumeration order.
    pub fn insert(&self, record: PlayerRecord) {
        log::info!("player {} added", record.name);
        self.records.lock().unwrap().push(record);
    }

    /// Returns a copy of every record in insertion order.
    ///
    /// The copy is decoupled from internal storage; callers may mutate it
    /// freely without affecting the registry.
    pub fn snapshot(&self) -> Vec<PlayerRecord> {
        self.records.lock().unwrap().clone()
    }
}

/// The process-wide registry written by `addPlayers` and read by
/// `getPlayersList`. Lives for the whole process.
pub static PLAYERS: PlayerRegistry = PlayerRegistry::new();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_appends_in_order() {
        let registry = PlayerRegistry::new();
        registry.insert(PlayerRecord::new("R Jadeja", "Cricket", 33));
        registry.insert(PlayerRecord::new("C Ronaldo", "Football", 37));
        registry.insert(PlayerRecord::new("R Federer", "Tennis", 40));

        let records = registry.snapshot();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].name, "R Jadeja");
        assert_eq!(records[1].name, "C Ronaldo");
        assert_eq!(records[2].name, "R Federer");
    }

    #[test]
    fn test_duplicates_are_allowed() {
        let registry = PlayerRegistry::new();
        let record = PlayerRecord::new("R Jadeja", "Cricket", 33);
        registry.insert(record.clone());
        registry.insert(record.clone());
        assert_eq!(registry.snapshot(), vec![record.clone(), record]);
    }

    #[test]
    fn test_snapshot_is_decoupled_from_storage() {
        let registry = PlayerRegistry::new();
        registry.insert(PlayerRecord::new("R Federer", "Tennis", 40));

        let mut first = registry.snapshot();
        first[0].name = "mutated".to_string();
        first.push(PlayerRecord::new("extra", "None", 0));

        let second = registry.snapshot();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].name, "R Federer");
    }

    #[test]
    fn test_empty_registry_snapshot() {
        let registry = PlayerRegistry::new();
        assert!(registry.snapshot().is_empty());
    }

    #[test]
    fn test_record_json_round_trip() {
        let record = PlayerRecord::new("R Ashwin", "Cricket", 34);
        let json = serde_json::to_string(&record).unwrap();
        let back: PlayerRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
