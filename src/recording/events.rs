// src/recording/events.rs
//! Event marker table
//!
//! Events are (sample index, code) pairs recorded on the stimulus channel
//! during acquisition. The table is kept sorted by sample index so epoch
//! extraction can walk it in time order.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::NeuroResult;

/// A single event marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Sample index into the recording where the event occurred
    pub sample: usize,
    /// Integer event code (trigger value)
    pub code: i64,
}

/// Ordered sequence of event markers
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventTable {
    events: Vec<Event>,
}

impl EventTable {
    /// Build a table from markers in any order; sorts by sample index.
    pub fn new(mut events: Vec<Event>) -> Self {
        events.sort_by_key(|e| e.sample);
        Self { events }
    }

    /// Markers in time order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Number of markers.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True when the table holds no markers.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Retain only markers whose code appears in `codes`.
    pub fn select(&self, codes: &[i64]) -> EventTable {
        EventTable {
            events: self
                .events
                .iter()
                .filter(|e| codes.contains(&e.code))
                .copied()
                .collect(),
        }
    }

    /// Write the table to a JSON fixture file.
    pub fn save(&self, path: impl AsRef<Path>) -> NeuroResult<()> {
        let file = File::create(path)?;
        serde_json::to_writer(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Read a table back from a JSON fixture file, restoring sample order.
    pub fn load(path: impl AsRef<Path>) -> NeuroResult<Self> {
        let file = File::open(path)?;
        let table: EventTable = serde_json::from_reader(BufReader::new(file))?;
        Ok(EventTable::new(table.events))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_on_construction() {
        let table = EventTable::new(vec![
            Event { sample: 300, code: 3 },
            Event { sample: 100, code: 1 },
            Event { sample: 200, code: 1 },
        ]);
        let samples: Vec<usize> = table.events().iter().map(|e| e.sample).collect();
        assert_eq!(samples, vec![100, 200, 300]);
    }

    #[test]
    fn test_select_by_code() {
        let table = EventTable::new(vec![
            Event { sample: 10, code: 1 },
            Event { sample: 20, code: 2 },
            Event { sample: 30, code: 3 },
            Event { sample: 40, code: 1 },
        ]);
        let selected = table.select(&[1, 3]);
        assert_eq!(selected.len(), 3);
        assert!(selected.events().iter().all(|e| e.code == 1 || e.code == 3));
    }

    #[test]
    fn test_save_load_round_trip() {
        let table = EventTable::new(vec![
            Event { sample: 5, code: 1 },
            Event { sample: 15, code: 3 },
        ]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        table.save(&path).unwrap();
        assert_eq!(EventTable::load(&path).unwrap(), table);
    }
}
