//! Store: active predictions keyed by target game number.
//!
//! The store holds only non-terminal records. Assigning a terminal status
//! through [`PredictionStore::resolve`] removes the record in the same call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::paths::status as codes;
use crate::core::Suit;

/// Handle to a message published in the prediction channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageRef(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pending,
    WonAt0,
    WonAt1,
    WonAt2,
    Lost,
}

impl Status {
    /// Win status for a hit `offset` games after the target.
    pub fn won_at(offset: u32) -> Option<Self> {
        match offset {
            0 => Some(Status::WonAt0),
            1 => Some(Status::WonAt1),
            2 => Some(Status::WonAt2),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool { !matches!(self, Status::Pending) }

    pub fn is_win(self) -> bool { matches!(self, Status::WonAt0 | Status::WonAt1 | Status::WonAt2) }

    /// Short code, as stored and listed by `/status`.
    pub fn code(self) -> &'static str {
        match self {
            Status::Pending => codes::PENDING,
            Status::WonAt0 => codes::WON_0,
            Status::WonAt1 => codes::WON_1,
            Status::WonAt2 => codes::WON_2,
            Status::Lost => codes::LOST,
        }
    }

    /// Text shown in the published prediction message.
    pub fn label(self) -> String {
        match self {
            Status::Pending => self.code().to_string(),
            Status::Lost => format!("{} {}", self.code(), codes::LOST_SUFFIX),
            _ => format!("{} {}", self.code(), codes::WON_SUFFIX),
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub target: u32,
    pub suit: Suit,
    pub base_game: u32,
    pub status: Status,
    pub check_count: u32,
    pub created_at: DateTime<Utc>,
    pub message_ref: Option<MessageRef>,
}

impl Prediction {
    pub fn new(target: u32, suit: Suit, base_game: u32) -> Self {
        Self {
            target,
            suit,
            base_game,
            status: Status::Pending,
            check_count: 0,
            created_at: Utc::now(),
            message_ref: None,
        }
    }

    pub fn with_message_ref(mut self, message_ref: Option<MessageRef>) -> Self {
        self.message_ref = message_ref;
        self
    }
}

#[derive(Debug, Default, Clone)]
pub struct PredictionStore {
    active: BTreeMap<u32, Prediction>,
}

impl PredictionStore {
    pub fn new() -> Self { Self::default() }

    /// Insert or replace the record for `record.target`.
    pub fn put(&mut self, record: Prediction) { self.active.insert(record.target, record); }

    /// Insert unless a record for the same target is already active.
    pub fn insert_if_absent(&mut self, record: Prediction) -> bool {
        if self.active.contains_key(&record.target) {
            return false;
        }
        self.put(record);
        true
    }

    pub fn get(&self, target: u32) -> Option<&Prediction> { self.active.get(&target) }

    pub fn get_mut(&mut self, target: u32) -> Option<&mut Prediction> { self.active.get_mut(&target) }

    pub fn remove(&mut self, target: u32) -> Option<Prediction> { self.active.remove(&target) }

    pub fn contains(&self, target: u32) -> bool { self.active.contains_key(&target) }

    pub fn len(&self) -> usize { self.active.len() }

    pub fn is_empty(&self) -> bool { self.active.is_empty() }

    /// Snapshot ordered by target ascending.
    pub fn all(&self) -> Vec<Prediction> { self.active.values().cloned().collect() }

    /// Assign `status`. Terminal statuses take the record out of the store
    /// and hand it back with the final status set.
    pub fn resolve(&mut self, target: u32, status: Status) -> Option<Prediction> {
        if status.is_terminal() {
            let mut record = self.active.remove(&target)?;
            record.status = status;
            return Some(record);
        }
        let record = self.active.get_mut(&target)?;
        record.status = status;
        Some(record.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_if_absent_keeps_existing() {
        let mut store = PredictionStore::new();
        assert!(store.insert_if_absent(Prediction::new(432, Suit::Heart, 430)));

        store.get_mut(432).unwrap().check_count = 1;
        assert!(!store.insert_if_absent(Prediction::new(432, Suit::Club, 430)));

        let kept = store.get(432).unwrap();
        assert_eq!(kept.suit, Suit::Heart);
        assert_eq!(kept.check_count, 1);
        assert_eq!(kept.status, Status::Pending);
    }

    #[test]
    fn terminal_status_removes_record() {
        let mut store = PredictionStore::new();
        store.put(Prediction::new(10, Suit::Spade, 8));
        store.put(Prediction::new(11, Suit::Club, 9));

        let done = store.resolve(10, Status::WonAt1).unwrap();
        assert_eq!(done.status, Status::WonAt1);
        assert!(store.get(10).is_none());

        let lost = store.resolve(11, Status::Lost).unwrap();
        assert_eq!(lost.status, Status::Lost);
        assert!(store.is_empty());

        assert!(store.resolve(99, Status::Lost).is_none());
    }

    #[test]
    fn all_is_ordered_by_target() {
        let mut store = PredictionStore::new();
        for target in [40, 12, 33] {
            store.put(Prediction::new(target, Suit::Diamond, target - 2));
        }
        let targets: Vec<u32> = store.all().iter().map(|p| p.target).collect();
        assert_eq!(targets, vec![12, 33, 40]);
    }

    #[test]
    fn labels() {
        assert_eq!(Status::Pending.label(), "⏳⏳");
        assert_eq!(Status::WonAt2.label(), "✅2️⃣ GAGNÉ");
        assert_eq!(Status::Lost.label(), "❌ PERDU");
        assert_eq!(Status::won_at(3), None);
    }
}
