//! Sequential processing of bus events.

use super::bridge::{BridgeService, BusOutcome};
use crate::bridge::{
    domain::Message,
    ports::{bus::BusConnection, queue::QueuePublisher, validator::RequestValidator},
};
use mockable::Clock;
use tokio::sync::mpsc;
use tracing::{error, info};

/// Counts of how bus events were handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Responses published to the queue.
    pub published: usize,
    /// Events dropped by the formatter.
    pub dropped: usize,
    /// Events of types the bridge does not answer.
    pub ignored: usize,
    /// Events whose response could not be published.
    pub failed: usize,
}

/// Feeds events from `events` through `service` until the channel closes.
///
/// Per-event failures are logged and counted; they never end the loop.
pub async fn dispatch_bus_events<V, P, B, K>(
    service: &BridgeService<V, P, B, K>,
    mut events: mpsc::Receiver<Message>,
) -> DispatchStats
where
    V: RequestValidator,
    P: QueuePublisher,
    B: BusConnection,
    K: Clock + Send + Sync,
{
    let mut stats = DispatchStats::default();
    while let Some(event) = events.recv().await {
        match service.handle_bus_event(event).await {
            Ok(BusOutcome::Published { .. }) => stats.published += 1,
            Ok(BusOutcome::Dropped { .. }) => stats.dropped += 1,
            Ok(BusOutcome::Ignored { .. }) => stats.ignored += 1,
            Err(err) => {
                error!(error = %err, "failed to handle bus event");
                stats.failed += 1;
            }
        }
    }
    info!(?stats, "bus event channel closed");
    stats
}
