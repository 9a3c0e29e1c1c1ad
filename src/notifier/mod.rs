//! Notifier: prediction messages in the prediction channel
//!
//! # Flow
//!
//! ```text
//! Reactor ──publish(target, suit, ⏳⏳)──▶ Notifier ──send_message──▶ Messenger
//!    │                                       │
//!    │◀──────── Option<MessageRef> ──────────┘   (None on failure, logged)
//!    │
//!    └──update(ref, target, suit, ✅1️⃣)──▶ Notifier ──edit_message──▶ Messenger
//! ```
//!
//! The notifier never fails its caller. Outbound errors are logged and the
//! in-memory state moves on regardless.

mod format;

pub use format::{format_forward, format_prediction};

use async_trait::async_trait;
use std::sync::Arc;

use crate::core::Suit;
use crate::store::{MessageRef, Status};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    Plain,
    Markdown,
}

/// Outbound chat operations. Implemented by the Telegram client; tests use
/// a recording double.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_message(&self, chat_id: i64, text: &str, mode: ParseMode) -> anyhow::Result<MessageRef>;
    async fn edit_message(&self, chat_id: i64, message: MessageRef, text: &str) -> anyhow::Result<()>;
    async fn delete_message(&self, chat_id: i64, message: MessageRef) -> anyhow::Result<()>;
    /// Title of a chat the bot can see; errors when it cannot.
    async fn chat_title(&self, chat_id: i64) -> anyhow::Result<String>;
}

#[derive(Clone)]
pub struct Notifier {
    messenger: Arc<dyn Messenger>,
    channel: i64,
}

impl Notifier {
    pub fn new(messenger: Arc<dyn Messenger>, channel: i64) -> Self {
        Self { messenger, channel }
    }

    pub fn channel(&self) -> i64 { self.channel }

    pub fn messenger(&self) -> &Arc<dyn Messenger> { &self.messenger }

    pub async fn publish(&self, target: u32, suit: Suit, status: Status) -> Option<MessageRef> {
        let text = format_prediction(target, suit, status);
        match self.messenger.send_message(self.channel, &text, ParseMode::Plain).await {
            Ok(message) => {
                tracing::info!(target_game = target, suit = %suit, message_id = message.0, "prediction published");
                Some(message)
            }
            Err(e) => {
                tracing::error!(target_game = target, error = %e, "prediction publish failed");
                None
            }
        }
    }

    pub async fn update(&self, message: MessageRef, target: u32, suit: Suit, status: Status) -> bool {
        let text = format_prediction(target, suit, status);
        match self.messenger.edit_message(self.channel, message, &text).await {
            Ok(()) => {
                tracing::info!(target_game = target, status = %status.label(), "prediction status edited");
                true
            }
            Err(e) => {
                tracing::error!(target_game = target, message_id = message.0, error = %e, "prediction edit failed");
                false
            }
        }
    }

    /// Forward a finalized source message to the administrator.
    pub async fn forward(&self, admin: i64, text: &str) -> bool {
        match self.messenger.send_message(admin, &format_forward(text), ParseMode::Markdown).await {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(admin, error = %e, "forward to admin failed");
                false
            }
        }
    }
}
