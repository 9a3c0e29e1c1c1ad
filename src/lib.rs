//! Baccarat Oracle: duplicate-suit predictions for a Telegram game channel.
//!
//! # Architecture
//!
//! ```text
//! Telegram getUpdates
//!   │
//!   ├── poll_updates (telegram) ──mpsc<Event>──▶ Reactor (single owner)
//!   │                                              ├── core: #N game, (groups), suits
//!   │                                              ├── engine: create / verify
//!   │                                              ├── store: active predictions
//!   │                                              └── notifier ──▶ Messenger (TelegramClient)
//!   │
//!   └── server (axum) ◀──watch<StatusSnapshot>── Reactor
//! ```
//!
//! # Prediction lifecycle
//!
//! | Trigger | Effect |
//! |---------|--------|
//! | new message, 2+ of one suit in the second group | prediction for N + offset, `⏳⏳` |
//! | finalized target game, suit present | `✅0️⃣`, removed |
//! | finalized target + 1, suit present | `✅1️⃣`, removed |
//! | finalized target + 2 | `✅2️⃣` or `❌`, removed |
//!
//! # Features
//!
//! - `native` (default) - tokio runtime, Telegram transport, HTTP server, logging
//!
//! Without `native` the pure parts (`core`, `engine`, `store`, `config`)
//! still build.
//!
//! # Usage
//!
//! ```ignore
//! use baccarat_oracle::{BotConfig, Reactor, TelegramClient};
//!
//! let config = BotConfig::from_env()?;
//! let client = TelegramClient::new(&config.api_base, &config.bot_token);
//! let mut reactor = Reactor::new(&config, Arc::new(client.clone()));
//! reactor.probe_channels(STARTUP_PROBE_TEXT).await;
//! ```

// =============================================================================
// Shared modules (compile everywhere)
// =============================================================================
pub mod config;
pub mod core;
pub mod engine;
pub mod store;

// =============================================================================
// Native-only modules (tokio, network, HTTP)
// =============================================================================
#[cfg(feature = "native")]
pub mod logging;
#[cfg(feature = "native")]
pub mod notifier;
#[cfg(feature = "native")]
pub mod reactor;
#[cfg(feature = "native")]
pub mod runtime;
#[cfg(feature = "native")]
pub mod server;
#[cfg(feature = "native")]
pub mod telegram;

// =============================================================================
// Re-exports: Shared
// =============================================================================
pub use config::{BotConfig, ConfigError};
pub use core::{parse_game_message, GameMessage, ParseError, Suit};
pub use engine::{find_duplicate_suit, plan_prediction, verify, Creation, Verdict, Verification};
pub use store::{MessageRef, Prediction, PredictionStore, Status};

// =============================================================================
// Re-exports: Native
// =============================================================================
#[cfg(feature = "native")]
pub use notifier::{Messenger, Notifier, ParseMode};
#[cfg(feature = "native")]
pub use reactor::{Event, Reactor, StatusSnapshot, COMMAND_PROBE_TEXT, STARTUP_PROBE_TEXT};
#[cfg(feature = "native")]
pub use runtime::{install_signal_handlers, Shutdown};
#[cfg(feature = "native")]
pub use server::{create_router, create_router_with_name};
#[cfg(feature = "native")]
pub use telegram::{poll_updates, TelegramApiError, TelegramClient};
