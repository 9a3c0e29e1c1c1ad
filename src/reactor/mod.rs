//! Reactor - the single owner of prediction state
//!
//! # Architecture
//!
//! ```text
//! poll_updates ──mpsc<Event>──▶ Reactor::run
//!                                  │  handle(event), one at a time
//!                                  ├── NewMessage     → plan_prediction → store → publish
//!                                  ├── EditedMessage  → forward → verify → edit status
//!                                  └── Command        → reply
//!                                  │
//!                                  └──watch<StatusSnapshot>──▶ HTTP server
//! ```
//!
//! Every handler runs to completion, outbound calls included, before the
//! next event is taken. Nothing else touches the store.

mod commands;
mod dedup;
mod event;
mod status;

pub use commands::{parse_command, parse_offset_request, Command, CommandError};
pub use dedup::Dedup;
pub use event::Event;
pub use status::{ChannelHealth, Counters, StatusSnapshot};

use std::sync::Arc;
use chrono::Utc;
use tokio::sync::{mpsc, watch};

use crate::config::BotConfig;
use crate::core::{extract_game_number, extract_parenthesized_groups, is_finalized};
use crate::engine::{self, Creation};
use crate::notifier::{Messenger, Notifier, ParseMode};
use crate::runtime::Shutdown;
use crate::store::{Prediction, PredictionStore, Status};

use commands::DebugView;

/// Test message posted (and deleted) in the prediction channel at startup.
pub const STARTUP_PROBE_TEXT: &str = "🤖 Bot v2.0 démarré!";
/// Test message used by `/checkchannels`.
pub const COMMAND_PROBE_TEXT: &str = "🔍 Test...";

/// Outcome of probing one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    Ok { title: String },
    ReadOnly { title: String },
    Unreachable { reason: String },
}

impl ProbeResult {
    pub fn is_ok(&self) -> bool { matches!(self, ProbeResult::Ok { .. }) }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelReport {
    pub source: ProbeResult,
    pub prediction: ProbeResult,
}

/// Error text shown in replies, cut like the chat client shows it.
fn short_reason(e: &anyhow::Error) -> String {
    e.to_string().chars().take(50).collect()
}

pub struct Reactor {
    store: PredictionStore,
    dedup: Dedup,
    notifier: Notifier,
    source_channel: i64,
    admin_id: Option<i64>,
    prediction_offset: u32,
    transfer_enabled: bool,
    current_game: u32,
    last_forwarded: Option<u32>,
    channels: ChannelHealth,
    counters: Counters,
    snapshot: watch::Sender<StatusSnapshot>,
}

impl Reactor {
    pub fn new(config: &BotConfig, messenger: Arc<dyn Messenger>) -> Self {
        let snapshot = StatusSnapshot { prediction_offset: config.prediction_offset, ..Default::default() };
        let (snapshot, _) = watch::channel(snapshot);
        Self {
            store: PredictionStore::new(),
            dedup: Dedup::default(),
            notifier: Notifier::new(messenger, config.prediction_channel),
            source_channel: config.source_channel,
            admin_id: config.admin_id,
            prediction_offset: config.prediction_offset,
            transfer_enabled: true,
            current_game: 0,
            last_forwarded: None,
            channels: ChannelHealth::default(),
            counters: Counters::default(),
            snapshot,
        }
    }

    /// Receiver of the snapshot published after every event.
    pub fn subscribe(&self) -> watch::Receiver<StatusSnapshot> {
        self.snapshot.subscribe()
    }

    pub fn store(&self) -> &PredictionStore { &self.store }

    pub fn counters(&self) -> &Counters { &self.counters }

    pub fn channels(&self) -> ChannelHealth { self.channels }

    pub fn prediction_offset(&self) -> u32 { self.prediction_offset }

    pub fn transfer_enabled(&self) -> bool { self.transfer_enabled }

    pub fn current_game(&self) -> u32 { self.current_game }

    pub fn set_channel_health(&mut self, channels: ChannelHealth) {
        self.channels = channels;
        self.publish_snapshot();
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            current_game: self.current_game,
            prediction_offset: self.prediction_offset,
            transfer_enabled: self.transfer_enabled,
            channels: self.channels,
            counters: self.counters,
            predictions: self.store.all(),
            updated_at: Utc::now(),
        }
    }

    fn publish_snapshot(&self) {
        self.snapshot.send_replace(self.snapshot());
    }

    /// Probe both channels and record the results in the health flags.
    ///
    /// Source: `getChat`. Prediction: `getChat`, then send `test_text` and
    /// delete it again; a failed send marks the channel read-only.
    pub async fn probe_channels(&mut self, test_text: &str) -> ChannelReport {
        let messenger = self.notifier.messenger().clone();
        let prediction_channel = self.notifier.channel();

        let source = match messenger.chat_title(self.source_channel).await {
            Ok(title) => {
                tracing::info!(channel = self.source_channel, %title, "source channel reachable");
                ProbeResult::Ok { title }
            }
            Err(e) => {
                tracing::error!(channel = self.source_channel, error = %e, "source channel unreachable");
                ProbeResult::Unreachable { reason: short_reason(&e) }
            }
        };

        let prediction = match messenger.chat_title(prediction_channel).await {
            Ok(title) => match messenger.send_message(prediction_channel, test_text, ParseMode::Plain).await {
                Ok(message) => {
                    if let Err(e) = messenger.delete_message(prediction_channel, message).await {
                        tracing::warn!(channel = prediction_channel, error = %e, "probe message not deleted");
                    }
                    tracing::info!(channel = prediction_channel, %title, "prediction channel writable");
                    ProbeResult::Ok { title }
                }
                Err(e) => {
                    tracing::error!(channel = prediction_channel, error = %e, "prediction channel is read-only");
                    ProbeResult::ReadOnly { title }
                }
            },
            Err(e) => {
                tracing::error!(channel = prediction_channel, error = %e, "prediction channel unreachable");
                ProbeResult::Unreachable { reason: short_reason(&e) }
            }
        };

        self.set_channel_health(ChannelHealth { source_ok: source.is_ok(), prediction_ok: prediction.is_ok() });
        ChannelReport { source, prediction }
    }

    /// Dispatch one event to its handler, then publish the snapshot.
    pub async fn handle(&mut self, event: Event) -> anyhow::Result<()> {
        self.counters.events += 1;
        let result = match event {
            Event::NewMessage { chat_id, text } if chat_id == self.source_channel => {
                self.on_source_message(&text, false).await
            }
            Event::EditedMessage { chat_id, text } if chat_id == self.source_channel => {
                if is_finalized(&text) {
                    tracing::debug!("finalized edit received");
                    self.on_source_message(&text, true).await
                } else {
                    Ok(())
                }
            }
            Event::Command { chat_id, sender_id, text } => self.on_command(chat_id, sender_id, &text).await,
            other => {
                tracing::trace!(chat_id = other.chat_id(), kind = other.kind(), "ignoring event from other chat");
                Ok(())
            }
        };
        if result.is_err() {
            self.counters.handler_errors += 1;
        }
        self.publish_snapshot();
        result
    }

    /// Consume events until shutdown or until every sender is gone.
    pub async fn run(mut self, mut rx: mpsc::Receiver<Event>, shutdown: Shutdown) {
        let mut stop = shutdown.subscribe();
        if shutdown.is_triggered().await {
            return;
        }
        tracing::info!(offset = self.prediction_offset, "reactor started");
        loop {
            let event = tokio::select! {
                event = rx.recv() => event,
                _ = stop.recv() => break,
            };
            let Some(event) = event else { break };
            let kind = event.kind();
            if let Err(e) = self.handle(event).await {
                tracing::error!(kind, error = %format!("{e:#}"), "event handler failed");
            }
        }
        tracing::info!(active = self.store.len(), "reactor stopped");
    }

    async fn on_source_message(&mut self, text: &str, finalized: bool) -> anyhow::Result<()> {
        let Some(game) = extract_game_number(text) else {
            return Ok(());
        };
        self.current_game = game;
        self.counters.source_messages += 1;

        if !self.dedup.first_sighting(game, text) {
            self.counters.duplicates += 1;
            tracing::debug!(game, "duplicate message skipped");
            return Ok(());
        }

        let groups = extract_parenthesized_groups(text);
        let [first, second, ..] = groups.as_slice() else {
            self.counters.parse_failures += 1;
            tracing::warn!(game, found = groups.len(), "fewer than two groups, message skipped");
            return Ok(());
        };
        let (first, second) = (*first, *second);
        tracing::info!(game, first, second, finalized, "source message");

        if finalized {
            self.on_finalized(game, text, first, second).await
        } else {
            self.on_new_message(game, second).await
        }
    }

    async fn on_new_message(&mut self, game: u32, second: &str) -> anyhow::Result<()> {
        match engine::plan_prediction(game, second, self.prediction_offset, &self.store) {
            Creation::NoDuplicate => {
                tracing::info!(game, "no duplicate suit in second group");
            }
            Creation::AlreadyActive { target, .. } => {
                tracing::info!(game, target_game = target, "prediction already active");
            }
            Creation::Create { target, suit } => {
                self.store.put(Prediction::new(target, suit, game));
                self.counters.predictions_created += 1;
                tracing::info!(game, target_game = target, suit = suit.name(), "new prediction");

                if !self.channels.prediction_ok {
                    tracing::warn!(target_game = target, "prediction channel not reachable, not published");
                    return Ok(());
                }
                let message = self.notifier.publish(target, suit, Status::Pending).await;
                if message.is_none() {
                    self.counters.outbound_failures += 1;
                }
                if let Some(record) = self.store.get_mut(target) {
                    record.message_ref = message;
                }
            }
        }
        Ok(())
    }

    async fn on_finalized(&mut self, game: u32, text: &str, first: &str, second: &str) -> anyhow::Result<()> {
        if let Some(admin) = self.admin_id {
            if self.transfer_enabled && self.last_forwarded != Some(game) {
                if self.notifier.forward(admin, text).await {
                    self.last_forwarded = Some(game);
                    self.counters.forwarded += 1;
                } else {
                    self.counters.outbound_failures += 1;
                }
            }
        }

        let verification = engine::verify(&mut self.store, game, first, second);
        for miss in &verification.misses {
            tracing::info!(game, target_game = miss.target, offset = miss.offset, "suit not found yet");
        }
        let Some(verdict) = verification.verdict else {
            return Ok(());
        };

        let prediction = &verdict.prediction;
        if verdict.is_win() {
            self.counters.wins += 1;
        } else {
            self.counters.losses += 1;
        }
        tracing::info!(
            game,
            target_game = prediction.target,
            status = %prediction.status.label(),
            "prediction settled"
        );

        if let (Some(message), true) = (prediction.message_ref, self.channels.prediction_ok) {
            if !self.notifier.update(message, prediction.target, prediction.suit, prediction.status).await {
                self.counters.outbound_failures += 1;
            }
        }
        Ok(())
    }

    async fn on_command(&mut self, chat_id: i64, sender_id: Option<i64>, text: &str) -> anyhow::Result<()> {
        let Some(command) = parse_command(text) else {
            return Ok(());
        };
        tracing::info!(chat_id, ?command, "admin command");

        let reply = match command {
            Command::Start => commands::start_text(self.prediction_offset),
            Command::Help => commands::help_text(self.prediction_offset),
            Command::Status => commands::status_text(self.current_game, self.prediction_offset, &self.store.all()),
            Command::SetOffset(argument) => {
                let is_admin = self.admin_id.is_some() && sender_id == self.admin_id;
                match parse_offset_request(is_admin, argument.as_deref()) {
                    Ok(value) => {
                        self.prediction_offset = value;
                        tracing::info!(offset = value, "prediction offset changed");
                        commands::offset_changed_text(value)
                    }
                    Err(e) => e.to_string(),
                }
            }
            Command::TransferOn => {
                self.transfer_enabled = true;
                "✅ Transfert activé".to_string()
            }
            Command::TransferOff => {
                self.transfer_enabled = false;
                "⛔ Transfert désactivé".to_string()
            }
            Command::CheckChannels => {
                self.reply(chat_id, "🔍 Vérification des canaux...").await?;
                let report = self.probe_channels(COMMAND_PROBE_TEXT).await;
                check_channels_text(&report)
            }
            Command::Debug => commands::debug_text(&DebugView {
                source_channel: self.source_channel,
                prediction_channel: self.notifier.channel(),
                admin_id: self.admin_id,
                prediction_offset: self.prediction_offset,
                transfer_enabled: self.transfer_enabled,
                current_game: self.current_game,
                active_predictions: self.store.len(),
                channels: self.channels,
                counters: &self.counters,
            }),
        };
        self.reply(chat_id, &reply).await
    }

    async fn reply(&mut self, chat_id: i64, text: &str) -> anyhow::Result<()> {
        let messenger = self.notifier.messenger().clone();
        if let Err(e) = messenger.send_message(chat_id, text, ParseMode::Markdown).await {
            self.counters.outbound_failures += 1;
            return Err(e.context(format!("reply to chat {chat_id}")));
        }
        Ok(())
    }
}

fn check_channels_text(report: &ChannelReport) -> String {
    let mut text = String::from("📡 *Résultat:*\n\n");
    text.push_str(&match &report.source {
        ProbeResult::Ok { title } | ProbeResult::ReadOnly { title } => format!("✅ *Source:* {title}\n"),
        ProbeResult::Unreachable { reason } => format!("❌ *Source:* {reason}\n"),
    });
    text.push_str(&match &report.prediction {
        ProbeResult::Ok { title } => format!("✅ *Prédiction:* {title}\n"),
        ProbeResult::ReadOnly { .. } => "⚠️ *Prédiction:* Lecture seule\n".to_string(),
        ProbeResult::Unreachable { reason } => format!("❌ *Prédiction:* {reason}\n"),
    });
    text
}
