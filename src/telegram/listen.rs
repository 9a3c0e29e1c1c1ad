//! Long-polling listener: getUpdates → mpsc of [`Event`]

use std::time::Duration;
use tokio::sync::mpsc;

use super::client::TelegramClient;
use super::updates::{parse_update, update_id};
use crate::reactor::Event;
use crate::runtime::Shutdown;

pub const POLL_RETRY_SECS: u64 = 5;
pub const POLL_CONFLICT_RETRY_SECS: u64 = 2;
pub const POLL_MAX_RATE_LIMIT_RETRY_SECS: u64 = 60;

/// Poll until shutdown, the receiver is dropped, or the token is rejected.
pub async fn poll_updates(
    client: TelegramClient,
    tx: mpsc::Sender<Event>,
    shutdown: Shutdown,
) -> anyhow::Result<()> {
    let mut offset: i64 = 0;
    let mut stop = shutdown.subscribe();
    tracing::info!("listening for Telegram updates");

    loop {
        let batch = tokio::select! {
            batch = client.get_updates(offset) => batch,
            _ = stop.recv() => {
                tracing::info!("update listener stopping");
                return Ok(());
            }
        };

        let updates = match batch {
            Ok(updates) => updates,
            Err(e) if e.is_unauthorized() => {
                anyhow::bail!("getUpdates rejected the bot token: {e}");
            }
            Err(e) => {
                let delay = if e.is_conflict() {
                    tracing::warn!(error = %e, "polling conflict; is another process using this token?");
                    POLL_CONFLICT_RETRY_SECS
                } else if let Some(retry_after) = e.retry_after() {
                    tracing::warn!(retry_after, "getUpdates rate limited");
                    retry_after.clamp(1, POLL_MAX_RATE_LIMIT_RETRY_SECS)
                } else {
                    tracing::warn!(error = %e, "getUpdates failed");
                    POLL_RETRY_SECS
                };
                tokio::select! {
                    _ = tokio::time::sleep(Duration::from_secs(delay)) => {}
                    _ = stop.recv() => return Ok(()),
                }
                continue;
            }
        };

        for update in &updates {
            if let Some(id) = update_id(update) {
                offset = offset.max(id + 1);
            }
            let Some(event) = parse_update(update) else {
                tracing::trace!("skipping update without text");
                continue;
            };
            if tx.send(event).await.is_err() {
                tracing::info!("reactor gone; update listener stopping");
                return Ok(());
            }
        }
    }
}
