use std::{
    collections::VecDeque,
    time::{SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};

use crate::{availability::Availability, book::BookKind, events::Circulation};

/// A serializable representation of a timestamp
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
pub struct TimeStamp {
    /// Seconds since Unix epoch
    pub seconds: u64,
    /// Nanoseconds part
    pub nanos: u32,
}

impl TimeStamp {
    /// Create a new timestamp from the current system time.
    ///
    /// A clock set before the Unix epoch reads as the epoch itself.
    #[must_use]
    pub fn now() -> Self {
        let duration = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
        Self { seconds: duration.as_secs(), nanos: duration.subsec_nanos() }
    }
}

/// One successful borrow or return
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CirculationRecord {
    /// Shelf holding the copy
    pub kind: BookKind,
    /// Title of the copy
    pub title: String,
    /// Author of the copy
    pub author: String,
    /// ISBN of the copy
    pub isbn: u64,
    /// The state before the action
    pub from: Availability,
    /// The state after the action
    pub to: Availability,
    /// What was done
    pub action: Circulation,
    /// When it happened
    pub timestamp: TimeStamp,
}

/// Bounded log of circulation records, oldest first
#[derive(Debug, Clone, Default)]
pub struct CirculationHistory {
    /// Records in the order they happened
    records: VecDeque<CirculationRecord>,
    /// Maximum number of records to keep
    capacity: usize,
}

impl CirculationHistory {
    /// Create an empty history keeping at most `capacity` records
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { records: VecDeque::new(), capacity }
    }

    /// Append a record, dropping the oldest ones beyond capacity
    pub fn push(&mut self, record: CirculationRecord) {
        if self.capacity == 0 {
            return;
        }
        self.records.push_back(record);
        while self.records.len() > self.capacity {
            self.records.pop_front();
        }
    }

    /// Records oldest first
    pub fn records(&self) -> impl Iterator<Item = &CirculationRecord> {
        self.records.iter()
    }

    /// Number of records kept
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Maximum number of records kept
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
