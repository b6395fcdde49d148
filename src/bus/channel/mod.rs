//! In-memory channel-based event bus for standalone mode.
//!
//! Uses a tokio broadcast channel for pub/sub within a single process.
//! Ideal for local development and testing without external transport.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, error, info, warn};

use super::{BusError, EventBus, EventHandler, Result, SubscriptionId};
use crate::domain::EventEnvelope;

/// Default broadcast channel capacity.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Check if an event name matches a subscription filter.
///
/// Matching rules:
/// - "#" matches every event
/// - Exact match: "seller.assigned" matches "seller.assigned"
/// - Hierarchical: "seller" matches "seller.assigned" (prefix match with
///   dot separator)
fn name_matches(name: &str, filter: &str) -> bool {
    if filter == "#" {
        return true;
    }
    if name == filter {
        return true;
    }
    name.starts_with(filter) && name[filter.len()..].starts_with('.')
}

struct Subscription {
    filter: String,
    handler: Box<dyn EventHandler>,
}

/// In-memory event bus using a tokio broadcast channel.
///
/// Published envelopes are fanned out to one consumer task, which
/// dispatches each to every subscription whose filter matches the
/// event name.
pub struct ChannelEventBus {
    sender: broadcast::Sender<Arc<EventEnvelope>>,
    subscriptions: Arc<RwLock<HashMap<SubscriptionId, Subscription>>>,
    next_id: AtomicU64,
    consuming: Arc<RwLock<bool>>,
}

impl ChannelEventBus {
    /// Create a bus with the given broadcast capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);

        info!(capacity, "Channel event bus initialized");

        Self {
            sender,
            subscriptions: Arc::new(RwLock::new(HashMap::new())),
            next_id: AtomicU64::new(0),
            consuming: Arc::new(RwLock::new(false)),
        }
    }

    /// Start the consumer task if it is not running yet.
    ///
    /// The broadcast receiver is created before the task is spawned, so
    /// events published after `subscribe` returns are never missed.
    async fn ensure_consuming(&self) {
        {
            let mut consuming = self.consuming.write().await;
            if *consuming {
                return;
            }
            *consuming = true;
        }

        let mut receiver = self.sender.subscribe();
        let subscriptions = Arc::clone(&self.subscriptions);

        tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(event) => {
                        let name = event.name();
                        let subs = subscriptions.read().await;
                        for (id, sub) in subs.iter() {
                            if !name_matches(name, &sub.filter) {
                                continue;
                            }
                            debug!(event = name, subscription = id.0, "Dispatching event");
                            if let Err(err) = sub.handler.handle(Arc::clone(&event)).await {
                                warn!(
                                    event = name,
                                    subscription = id.0,
                                    error = %err,
                                    "Event handler failed"
                                );
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        error!(skipped = n, "Channel consumer lagged, skipped events");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        info!("Channel closed, stopping consumer");
                        break;
                    }
                }
            }
        });
    }
}

impl Default for ChannelEventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

#[async_trait]
impl EventBus for ChannelEventBus {
    #[tracing::instrument(name = "bus.publish", skip_all, fields(event = event.name()))]
    async fn publish(&self, event: Arc<EventEnvelope>) -> Result<()> {
        match self.sender.send(event) {
            Ok(receiver_count) => {
                debug!(receivers = receiver_count, "Published event to channel");
            }
            Err(_) => {
                // No receivers yet; fine for publish-only deployments.
                debug!("Published event (no receivers)");
            }
        }
        Ok(())
    }

    async fn subscribe(
        &self,
        event_name: &str,
        handler: Box<dyn EventHandler>,
    ) -> Result<SubscriptionId> {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        {
            let mut subs = self.subscriptions.write().await;
            subs.insert(
                id,
                Subscription {
                    filter: event_name.to_string(),
                    handler,
                },
            );
        }
        self.ensure_consuming().await;

        info!(filter = event_name, subscription = id.0, "Handler subscribed");

        Ok(id)
    }

    async fn unsubscribe(&self, id: SubscriptionId) -> Result<()> {
        let removed = self.subscriptions.write().await.remove(&id);
        match removed {
            Some(sub) => {
                info!(filter = %sub.filter, subscription = id.0, "Handler unsubscribed");
                Ok(())
            }
            None => Err(BusError::UnknownSubscription(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Utc;
    use futures::future::BoxFuture;
    use tokio::sync::mpsc;
    use uuid::Uuid;

    use super::*;
    use crate::domain::SellerEvent;

    struct Recorder {
        tx: mpsc::UnboundedSender<String>,
    }

    impl EventHandler for Recorder {
        fn handle(
            &self,
            event: Arc<EventEnvelope>,
        ) -> BoxFuture<'static, std::result::Result<(), BusError>> {
            let tx = self.tx.clone();
            Box::pin(async move {
                let _ = tx.send(event.name().to_string());
                Ok(())
            })
        }
    }

    fn assigned_event() -> Arc<EventEnvelope> {
        Arc::new(EventEnvelope::new(
            "corr",
            SellerEvent::Assigned {
                seller_id: Uuid::new_v4(),
                client_id: "c-1".to_string(),
                at: Utc::now(),
            },
        ))
    }

    fn released_event() -> Arc<EventEnvelope> {
        Arc::new(EventEnvelope::new(
            "corr",
            SellerEvent::Released {
                seller_id: Uuid::new_v4(),
                client_id: "c-1".to_string(),
                at: Utc::now(),
            },
        ))
    }

    async fn recv_name(rx: &mut mpsc::UnboundedReceiver<String>) -> Option<String> {
        tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .ok()
            .flatten()
    }

    #[tokio::test]
    async fn test_subscriber_receives_matching_event() {
        let bus = ChannelEventBus::default();
        let (tx, mut rx) = mpsc::unbounded_channel();
        bus.subscribe("seller.assigned", Box::new(Recorder { tx }))
            .await
            .unwrap();

        bus.publish(assigned_event()).await.unwrap();

        assert_eq!(recv_name(&mut rx).await.as_deref(), Some("seller.assigned"));
    }

    #[tokio::test]
    async fn test_filter_excludes_other_events() {
        let bus = ChannelEventBus::default();
        let (tx, mut rx) = mpsc::unbounded_channel();
        bus.subscribe("seller.released", Box::new(Recorder { tx }))
            .await
            .unwrap();

        bus.publish(assigned_event()).await.unwrap();
        bus.publish(released_event()).await.unwrap();

        // Only the released event comes through.
        assert_eq!(recv_name(&mut rx).await.as_deref(), Some("seller.released"));
    }

    #[tokio::test]
    async fn test_prefix_filter_matches_event_family() {
        let bus = ChannelEventBus::default();
        let (tx, mut rx) = mpsc::unbounded_channel();
        bus.subscribe("seller", Box::new(Recorder { tx })).await.unwrap();

        bus.publish(assigned_event()).await.unwrap();

        assert_eq!(recv_name(&mut rx).await.as_deref(), Some("seller.assigned"));
    }

    #[tokio::test]
    async fn test_hash_filter_matches_all() {
        let bus = ChannelEventBus::default();
        let (tx, mut rx) = mpsc::unbounded_channel();
        bus.subscribe("#", Box::new(Recorder { tx })).await.unwrap();

        bus.publish_batch(vec![assigned_event(), released_event()])
            .await
            .unwrap();

        assert_eq!(recv_name(&mut rx).await.as_deref(), Some("seller.assigned"));
        assert_eq!(recv_name(&mut rx).await.as_deref(), Some("seller.released"));
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_delivery() {
        let bus = ChannelEventBus::default();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = bus.subscribe("#", Box::new(Recorder { tx })).await.unwrap();

        bus.unsubscribe(id).await.unwrap();
        bus.publish(assigned_event()).await.unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unsubscribe_unknown_id_fails() {
        let bus = ChannelEventBus::default();
        let result = bus.unsubscribe(SubscriptionId(99)).await;
        assert!(matches!(result, Err(BusError::UnknownSubscription(_))));
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_ok() {
        let bus = ChannelEventBus::default();
        bus.publish(assigned_event()).await.unwrap();
    }

    #[test]
    fn test_name_matching_rules() {
        assert!(name_matches("seller.assigned", "#"));
        assert!(name_matches("seller.assigned", "seller.assigned"));
        assert!(name_matches("seller.assigned", "seller"));
        assert!(!name_matches("seller.assigned", "seller.released"));
        assert!(!name_matches("sellers.assigned", "seller"));
    }
}
