//! Scoped push-event subscriptions.
//!
//! The Ring cloud exposes push-style events through the active-dings
//! endpoint; a subscription polls it on a fixed interval, deduplicates by
//! ding id, and feeds new events into a channel. Dropping the handle aborts
//! the polling task, so repeated monitoring windows cannot leak
//! subscriptions.

use std::collections::HashSet;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::models::EventInfo;

use super::RingClient;

/// A live event subscription; the polling task is released on drop.
#[derive(Debug)]
pub struct EventSubscription {
    rx: mpsc::Receiver<EventInfo>,
    task: JoinHandle<()>,
}

impl EventSubscription {
    pub(super) fn start(client: RingClient, poll_interval: Duration) -> Self {
        let (tx, rx) = mpsc::channel(64);
        let task = tokio::spawn(poll_loop(client, poll_interval, tx));
        Self { rx, task }
    }

    /// Receive the next event; `None` once the subscription is closed.
    pub async fn recv(&mut self) -> Option<EventInfo> {
        self.rx.recv().await
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn poll_loop(client: RingClient, poll_interval: Duration, tx: mpsc::Sender<EventInfo>) {
    let mut seen: HashSet<u64> = HashSet::new();
    let mut interval = tokio::time::interval(poll_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        interval.tick().await;

        let dings = match client.active_dings().await {
            Ok(dings) => dings,
            Err(error) => {
                tracing::warn!(%error, "Failed to poll active events");
                continue;
            }
        };

        for ding in dings {
            if !seen.insert(ding.id) {
                continue;
            }

            tracing::debug!(ding_id = ding.id, kind = %ding.kind, "New Ring event");

            if tx.send(EventInfo::from_ding(&ding)).await.is_err() {
                // Receiver dropped; the window is over.
                return;
            }
        }
    }
}
