//! Host-side model of the counter cells the generated code maintains.
//!
//! Mirrors the emitted protocol step by step (lookup, then atomic add or
//! upsert), so its behaviour under concurrency, including the first-touch
//! race, is the behaviour of the generated code.

use std::sync::atomic::{AtomicU32, Ordering};

use dashmap::DashMap;

use crate::counter::CounterTable;
use crate::map_kind::TableKind;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CounterError {
    #[error("index {index} is outside an array of {capacity} cells")]
    IndexOutOfRange { index: u32, capacity: u32 },
    #[error("map is full ({capacity} entries); cannot create index {index}")]
    MapFull { index: u32, capacity: u32 },
}

/// Counter map contents.
///
/// An array map holds every cell `0..capacity` from the start, zeroed. A
/// hash map holds a cell only after its first upsert and at most
/// `capacity` cells.
#[derive(Debug)]
pub struct CounterCells {
    kind: TableKind,
    capacity: u32,
    cells: DashMap<u32, AtomicU32>,
}

impl CounterCells {
    pub fn new(kind: TableKind, capacity: u32) -> Self {
        let cells = DashMap::new();
        if kind == TableKind::Array {
            for index in 0..capacity {
                cells.insert(index, AtomicU32::new(0));
            }
        }
        CounterCells {
            kind,
            capacity,
            cells,
        }
    }

    /// Cells for the map a [`CounterTable`] declares.
    pub fn for_table(table: &CounterTable) -> Self {
        Self::new(table.kind(), table.capacity())
    }

    /// `increment(index)`: add 1, creating the cell with 1 when absent.
    pub fn increment(&self, index: u32) -> Result<(), CounterError> {
        self.add(index, 1)
    }

    /// `add(index, delta)`: add `delta`, creating the cell with `delta`
    /// when absent.
    pub fn add(&self, index: u32, delta: u32) -> Result<(), CounterError> {
        if let Some(cell) = self.cells.get(&index) {
            cell.fetch_add(delta, Ordering::Relaxed);
            return Ok(());
        }
        self.upsert(index, delta)
    }

    /// Current value of a cell, `None` when absent.
    pub fn get(&self, index: u32) -> Option<u32> {
        self.cells.get(&index).map(|cell| cell.load(Ordering::Relaxed))
    }

    /// Number of present cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The map's own update: replaces any value stored concurrently.
    fn upsert(&self, index: u32, value: u32) -> Result<(), CounterError> {
        match self.kind {
            TableKind::Array => {
                // Every in-range slot exists, so a miss means out of range.
                Err(CounterError::IndexOutOfRange {
                    index,
                    capacity: self.capacity,
                })
            }
            TableKind::Hash | TableKind::LpmTrie => {
                let full = usize::try_from(self.capacity).is_ok_and(|cap| self.cells.len() >= cap);
                if full && !self.cells.contains_key(&index) {
                    return Err(CounterError::MapFull {
                        index,
                        capacity: self.capacity,
                    });
                }
                self.cells.insert(index, AtomicU32::new(value));
                Ok(())
            }
        }
    }
}
