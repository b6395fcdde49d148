//! Mock event bus implementation for testing.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{BusError, EventBus, EventHandler, Result, SubscriptionId};
use crate::domain::EventEnvelope;

/// Mock event bus that records published envelopes.
#[derive(Default)]
pub struct MockEventBus {
    published: RwLock<Vec<EventEnvelope>>,
    fail_on_publish: RwLock<bool>,
}

impl MockEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_fail_on_publish(&self, fail: bool) {
        *self.fail_on_publish.write().await = fail;
    }

    pub async fn published_count(&self) -> usize {
        self.published.read().await.len()
    }

    /// Names of published events, in publish order.
    pub async fn published_names(&self) -> Vec<&'static str> {
        self.published.read().await.iter().map(|e| e.name()).collect()
    }

    pub async fn take_published(&self) -> Vec<EventEnvelope> {
        std::mem::take(&mut *self.published.write().await)
    }
}

#[async_trait]
impl EventBus for MockEventBus {
    async fn publish(&self, event: Arc<EventEnvelope>) -> Result<()> {
        if *self.fail_on_publish.read().await {
            return Err(BusError::Publish("mock publish failure".to_string()));
        }
        self.published.write().await.push((*event).clone());
        Ok(())
    }

    async fn subscribe(
        &self,
        _event_name: &str,
        _handler: Box<dyn EventHandler>,
    ) -> Result<SubscriptionId> {
        Err(BusError::SubscribeNotSupported)
    }

    async fn unsubscribe(&self, id: SubscriptionId) -> Result<()> {
        Err(BusError::UnknownSubscription(id))
    }
}
