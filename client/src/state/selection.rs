//! The single "currently selected table" slot.
//!
//! A selection can only be made from a [`RowSnapshot`], and a snapshot can only
//! be obtained by parsing the data stored on a rendered select trigger, so the
//! slot never holds a hand-built record.

use tables::{SnapshotError, TableRecord};

/// A record recovered from a rendered row's stored snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct RowSnapshot(TableRecord);

impl RowSnapshot {
    /// # Errors
    ///
    /// Returns [`SnapshotError`] when `raw` is not a valid snapshot.
    pub fn parse(raw: &str) -> Result<Self, SnapshotError> {
        TableRecord::from_snapshot(raw).map(Self)
    }

    pub fn record(&self) -> &TableRecord {
        &self.0
    }
}

#[derive(Debug, Default)]
pub struct SelectionState {
    current: Option<TableRecord>,
}

impl SelectionState {
    pub fn current(&self) -> Option<&TableRecord> {
        self.current.as_ref()
    }

    /// Replace the slot, returning the stored record.
    pub fn select(&mut self, snapshot: RowSnapshot) -> &TableRecord {
        self.current.insert(snapshot.0)
    }

    /// Empty the slot, returning what it held.
    pub fn clear(&mut self) -> Option<TableRecord> {
        self.current.take()
    }
}

#[cfg(test)]
#[path = "selection_test.rs"]
mod tests;
