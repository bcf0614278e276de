//! Roll records, the newest-first history, and the roll phase.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::face::FaceValue;

// ---------------------------------------------------------------------------
// RollPhase
// ---------------------------------------------------------------------------

/// Whether a roll is currently spinning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RollPhase {
    /// Settled; a new roll may start.
    #[default]
    Idle,
    /// Spinning; further roll requests are ignored until settle.
    Rolling,
}

impl RollPhase {
    pub fn is_rolling(self) -> bool {
        self == RollPhase::Rolling
    }
}

// ---------------------------------------------------------------------------
// RollRecord
// ---------------------------------------------------------------------------

/// One completed roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollRecord {
    pub value: FaceValue,
    /// Milliseconds since the Unix epoch at settle time.
    pub timestamp_ms: i64,
}

// ---------------------------------------------------------------------------
// RollHistory
// ---------------------------------------------------------------------------

/// Completed rolls, newest first. Unbounded; only [`clear`](Self::clear)
/// removes entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollHistory {
    records: VecDeque<RollRecord>,
}

impl RollHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record at the front.
    pub fn record(&mut self, record: RollRecord) {
        self.records.push_front(record);
    }

    /// The most recent roll, if any.
    pub fn latest(&self) -> Option<&RollRecord> {
        self.records.front()
    }

    pub fn get(&self, index: usize) -> Option<&RollRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Records from newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &RollRecord> + '_ {
        self.records.iter()
    }

    /// Number of times each face has come up, indexed by `face - 1`.
    pub fn tally(&self) -> [usize; 6] {
        let mut counts = [0usize; 6];
        for record in &self.records {
            counts[usize::from(record.value.get() - 1)] += 1;
        }
        counts
    }
}

impl<'a> IntoIterator for &'a RollHistory {
    type Item = &'a RollRecord;
    type IntoIter = std::collections::vec_deque::Iter<'a, RollRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(value: FaceValue, timestamp_ms: i64) -> RollRecord {
        RollRecord { value, timestamp_ms }
    }

    #[test]
    fn newest_first() {
        let mut history = RollHistory::new();
        history.record(rec(FaceValue::TWO, 100));
        history.record(rec(FaceValue::FIVE, 200));

        assert_eq!(history.len(), 2);
        assert_eq!(history.latest(), Some(&rec(FaceValue::FIVE, 200)));
        assert_eq!(history.get(1), Some(&rec(FaceValue::TWO, 100)));

        let values: Vec<u8> = history.iter().map(|r| r.value.get()).collect();
        assert_eq!(values, vec![5, 2]);
    }

    #[test]
    fn clear_empties() {
        let mut history = RollHistory::new();
        history.record(rec(FaceValue::ONE, 1));
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.latest(), None);
    }

    #[test]
    fn tally_counts_faces() {
        let mut history = RollHistory::new();
        for face in [FaceValue::SIX, FaceValue::SIX, FaceValue::ONE] {
            history.record(rec(face, 0));
        }
        assert_eq!(history.tally(), [1, 0, 0, 0, 0, 2]);
    }

    #[test]
    fn phase_defaults_to_idle() {
        assert_eq!(RollPhase::default(), RollPhase::Idle);
        assert!(!RollPhase::Idle.is_rolling());
        assert!(RollPhase::Rolling.is_rolling());
    }
}
