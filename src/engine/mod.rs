//! Engine: duplicate-suit creation rule and the three-game verification window.
//!
//! # Verification window
//!
//! ```text
//! prediction for T
//!   finalized T     suit in either group → ✅0️⃣   else check_count = 1
//!   finalized T+1   suit in either group → ✅1️⃣   else check_count = 1
//!   finalized T+2   (needs check_count ≥ 1)
//!                   suit in either group → ✅2️⃣   else ❌
//! ```
//!
//! A finalized message settles at most one prediction: the first hit or
//! loss ends the procedure for that message.

use crate::core::{contains_suit, count_by_suit, Suit};
use crate::store::{Prediction, PredictionStore, Status};

/// Offsets after the target at which a prediction is still checked.
pub const FOLLOW_UP_OFFSETS: [u32; 2] = [1, 2];

/// First suit (in [`Suit::ALL`] order) appearing at least twice.
pub fn find_duplicate_suit(second_group: &str) -> Option<Suit> {
    let counts = count_by_suit(second_group);
    Suit::ALL.into_iter().find(|suit| counts.get(suit).copied().unwrap_or(0) >= 2)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Creation {
    Create { target: u32, suit: Suit },
    AlreadyActive { target: u32, suit: Suit },
    NoDuplicate,
}

/// Decide what a new (non-finalized) message for `game` should produce.
pub fn plan_prediction(game: u32, second_group: &str, offset: u32, store: &PredictionStore) -> Creation {
    let Some(suit) = find_duplicate_suit(second_group) else {
        return Creation::NoDuplicate;
    };
    let target = game.saturating_add(offset);
    if store.contains(target) {
        Creation::AlreadyActive { target, suit }
    } else {
        Creation::Create { target, suit }
    }
}

/// Terminal outcome of a verification: the record, already out of the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub prediction: Prediction,
    /// Distance between the finalized game and the prediction's target.
    pub offset: u32,
}

impl Verdict {
    pub fn is_win(&self) -> bool { self.prediction.status.is_win() }
}

/// A prediction that was looked at and not settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Miss {
    pub target: u32,
    pub offset: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verification {
    pub verdict: Option<Verdict>,
    pub misses: Vec<Miss>,
}

fn seen_in(first: &str, second: &str, suit: Suit) -> bool {
    contains_suit(first, suit) || contains_suit(second, suit)
}

/// Run the verification window for finalized game `game`.
pub fn verify(store: &mut PredictionStore, game: u32, first: &str, second: &str) -> Verification {
    let mut outcome = Verification::default();

    if let Some(current) = store.get_mut(game) {
        if seen_in(first, second, current.suit) {
            outcome.verdict = settle(store, game, 0, Status::WonAt0);
            return outcome;
        }
        current.check_count = 1;
        outcome.misses.push(Miss { target: game, offset: 0 });
    }

    for offset in FOLLOW_UP_OFFSETS {
        let Some(candidate) = game.checked_sub(offset) else { continue };
        let Some(prediction) = store.get_mut(candidate) else { continue };
        if prediction.check_count < offset - 1 {
            continue;
        }
        if seen_in(first, second, prediction.suit) {
            let status = Status::won_at(offset).unwrap_or(Status::WonAt2);
            outcome.verdict = settle(store, candidate, offset, status);
            return outcome;
        }
        if offset == 2 {
            outcome.verdict = settle(store, candidate, offset, Status::Lost);
            return outcome;
        }
        prediction.check_count = offset;
        outcome.misses.push(Miss { target: candidate, offset });
    }

    outcome
}

fn settle(store: &mut PredictionStore, target: u32, offset: u32, status: Status) -> Option<Verdict> {
    store.resolve(target, status).map(|prediction| Verdict { prediction, offset })
}
