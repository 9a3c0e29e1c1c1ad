//! Approximate dedup of already-processed source messages.
//!
//! Keys are `"{game}_{first 50 chars}"`. The set is cleared outright once it
//! holds more than `capacity` keys, so a message seen before the clear is
//! accepted again afterwards.

use std::collections::HashSet;

use crate::core::paths::{DEDUP_CAPACITY, DEDUP_PREFIX_CHARS};

#[derive(Debug, Clone)]
pub struct Dedup {
    seen: HashSet<String>,
    capacity: usize,
}

impl Default for Dedup {
    fn default() -> Self { Self::with_capacity(DEDUP_CAPACITY) }
}

impl Dedup {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { seen: HashSet::new(), capacity }
    }

    pub fn key(game: u32, text: &str) -> String {
        let prefix: String = text.chars().take(DEDUP_PREFIX_CHARS).collect();
        format!("{game}_{prefix}")
    }

    /// Record the message; `false` when it was already seen in this window.
    pub fn first_sighting(&mut self, game: u32, text: &str) -> bool {
        if !self.seen.insert(Self::key(game, text)) {
            return false;
        }
        if self.seen.len() > self.capacity {
            self.seen.clear();
        }
        true
    }

    pub fn len(&self) -> usize { self.seen.len() }

    pub fn is_empty(&self) -> bool { self.seen.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeats_are_rejected() {
        let mut dedup = Dedup::default();
        assert!(dedup.first_sighting(430, "#N430 (a)(b)"));
        assert!(!dedup.first_sighting(430, "#N430 (a)(b)"));
        assert!(dedup.first_sighting(431, "#N430 (a)(b)"));
    }

    #[test]
    fn only_the_prefix_counts() {
        let head = "x".repeat(DEDUP_PREFIX_CHARS);
        let mut dedup = Dedup::default();
        assert!(dedup.first_sighting(1, &format!("{head} tail one")));
        assert!(!dedup.first_sighting(1, &format!("{head} tail two")));
    }

    #[test]
    fn window_clears_past_capacity() {
        let mut dedup = Dedup::with_capacity(3);
        for game in 0..3 {
            assert!(dedup.first_sighting(game, "m"));
        }
        assert_eq!(dedup.len(), 3);
        assert!(dedup.first_sighting(3, "m"));
        assert!(dedup.is_empty());
        // forgotten after the clear
        assert!(dedup.first_sighting(0, "m"));
    }
}
