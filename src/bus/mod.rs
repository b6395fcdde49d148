//! Event bus for assignment state changes.
//!
//! This module contains:
//! - `EventBus` trait: event delivery to downstream consumers
//!   (analytics, notifications)
//! - `EventHandler` trait: for processing delivered events
//! - Implementations: in-process channel bus, mock

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::domain::EventEnvelope;

pub mod channel;
pub mod mock;

pub use channel::ChannelEventBus;
pub use mock::MockEventBus;

/// Result type for bus operations.
pub type Result<T> = std::result::Result<T, BusError>;

/// Errors that can occur during bus operations.
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    #[error("Publish failed: {0}")]
    Publish(String),

    #[error("Subscribe failed: {0}")]
    Subscribe(String),

    #[error("Unknown subscription {0:?}")]
    UnknownSubscription(SubscriptionId),

    #[error("Subscribe not supported for this bus type")]
    SubscribeNotSupported,
}

/// Identifier handed out by `subscribe` and consumed by `unsubscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Handler for processing events delivered by the bus.
pub trait EventHandler: Send + Sync {
    /// Process one event envelope.
    fn handle(
        &self,
        event: Arc<EventEnvelope>,
    ) -> BoxFuture<'static, std::result::Result<(), BusError>>;
}

/// Interface for event delivery to downstream consumers.
///
/// The engine only publishes; subscription management exists for the
/// consumers themselves. Envelopes are wrapped in `Arc` so every
/// consumer receives a zero-copy reference to the same immutable data.
///
/// Implementations:
/// - `ChannelEventBus`: tokio broadcast within a single process
/// - `MockEventBus`: in-memory mock for testing
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Publish one event to consumers.
    async fn publish(&self, event: Arc<EventEnvelope>) -> Result<()>;

    /// Publish several events from one command.
    ///
    /// The default implementation publishes in order and stops at the
    /// first failure.
    async fn publish_batch(&self, events: Vec<Arc<EventEnvelope>>) -> Result<()> {
        for event in events {
            self.publish(event).await?;
        }
        Ok(())
    }

    /// Register a handler for events whose name matches `event_name`.
    /// `"#"` matches every event; a bare prefix such as `"seller"`
    /// matches the whole `seller.*` family.
    async fn subscribe(
        &self,
        event_name: &str,
        handler: Box<dyn EventHandler>,
    ) -> Result<SubscriptionId>;

    /// Remove a previously registered handler.
    async fn unsubscribe(&self, id: SubscriptionId) -> Result<()>;
}
