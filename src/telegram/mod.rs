//! Telegram - Bot API transport
//!
//! - [`TelegramClient`]: JSON calls (`sendMessage`, `editMessageText`,
//!   `deleteMessage`, `getChat`, `getMe`, `getUpdates`); implements
//!   [`Messenger`](crate::notifier::Messenger)
//! - [`poll_updates`]: long-polling loop feeding reactor events
//!
//! # Update mapping
//!
//! | Update | Event |
//! |--------|-------|
//! | `channel_post`, `message` | `NewMessage` |
//! | `message` in a private chat starting with `/` | `Command` |
//! | `edited_channel_post`, `edited_message` | `EditedMessage` |

pub mod client;
mod error;
mod listen;
pub mod updates;

pub use client::{BotIdentity, TelegramClient};
pub use error::TelegramApiError;
pub use listen::poll_updates;
pub use updates::{normalize_chat_id, parse_update};
