// src/polling.rs
//! Long-polling update loop, for running without a public webhook URL

use crate::core::TelegramClient;
use crate::delivery::DeliveryAdapter;
use crate::types::Update;
use anyhow::{Context, Result};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

const POLL_ERROR_PAUSE: Duration = Duration::from_secs(5);

/// Offset that acknowledges every update in `updates`
pub fn next_offset(current: Option<i64>, updates: &[Update]) -> Option<i64> {
    updates
        .iter()
        .map(|u| u.update_id + 1)
        .max()
        .max(current)
}

pub async fn run_polling(
    client: Arc<TelegramClient>,
    adapter: Arc<DeliveryAdapter>,
    poll_timeout_secs: u64,
) -> Result<()> {
    client
        .delete_webhook()
        .await
        .context("Failed to remove existing webhook before polling")?;
    info!("Polling for updates every {}s", poll_timeout_secs);

    poll_until(&client, &adapter, poll_timeout_secs, tokio::signal::ctrl_c()).await;
    Ok(())
}

/// Poll until `shutdown` resolves. The same shutdown future is raced against
/// every `getUpdates` call, so a signal that lands between polls is not lost.
pub async fn poll_until<S: Future>(
    client: &TelegramClient,
    adapter: &Arc<DeliveryAdapter>,
    poll_timeout_secs: u64,
    shutdown: S,
) {
    tokio::pin!(shutdown);

    let mut offset = None;
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutting down update loop");
                return;
            }
            polled = client.get_updates(offset, poll_timeout_secs) => match polled {
                Ok(updates) => {
                    debug!("Received {} updates", updates.len());
                    offset = next_offset(offset, &updates);
                    for update in updates {
                        let _ = adapter.spawn_update(update);
                    }
                }
                Err(e) => {
                    error!("getUpdates failed: {}", e);
                    tokio::time::sleep(POLL_ERROR_PAUSE).await;
                }
            }
        }
    }
}
