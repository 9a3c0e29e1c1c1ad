//! Read-only views of the reactor, published after every event.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::store::Prediction;

/// Reachability of the two channels, as last probed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChannelHealth {
    pub source_ok: bool,
    pub prediction_ok: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counters {
    pub events: u64,
    pub source_messages: u64,
    pub duplicates: u64,
    pub parse_failures: u64,
    pub predictions_created: u64,
    pub wins: u64,
    pub losses: u64,
    pub forwarded: u64,
    pub outbound_failures: u64,
    pub handler_errors: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSnapshot {
    pub current_game: u32,
    pub prediction_offset: u32,
    pub transfer_enabled: bool,
    pub channels: ChannelHealth,
    pub counters: Counters,
    pub predictions: Vec<Prediction>,
    pub updated_at: DateTime<Utc>,
}

impl Default for StatusSnapshot {
    fn default() -> Self {
        Self {
            current_game: 0,
            prediction_offset: crate::core::paths::offset::DEFAULT,
            transfer_enabled: true,
            channels: ChannelHealth::default(),
            counters: Counters::default(),
            predictions: Vec::new(),
            updated_at: Utc::now(),
        }
    }
}
