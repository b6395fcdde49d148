//! Release-seller command handler.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{HandlerError, Result};
use crate::bus::EventBus;
use crate::commands::ReleaseClient;
use crate::config::EngineSettings;
use crate::domain::{EventEnvelope, Seller, SellerEvent};
use crate::ledger::AssignmentLedger;
use crate::projection::SellerView;
use crate::repository::{RepositoryError, SellerRepository};

/// Handles release commands.
///
/// The ledger resolves which seller the client is bound to; taking the
/// binding out first serializes concurrent releases of the same client,
/// so a double release decrements at most once. The binding is restored
/// if the decrement cannot be persisted.
pub struct ReleaseSellerHandler {
    repository: Arc<dyn SellerRepository>,
    ledger: Arc<dyn AssignmentLedger>,
    event_bus: Arc<dyn EventBus>,
    save_retry_attempts: u32,
}

impl ReleaseSellerHandler {
    /// Create a handler with default engine settings.
    pub fn new(
        repository: Arc<dyn SellerRepository>,
        ledger: Arc<dyn AssignmentLedger>,
        event_bus: Arc<dyn EventBus>,
    ) -> Self {
        Self::with_settings(repository, ledger, event_bus, &EngineSettings::default())
    }

    /// Create a handler with explicit engine settings.
    pub fn with_settings(
        repository: Arc<dyn SellerRepository>,
        ledger: Arc<dyn AssignmentLedger>,
        event_bus: Arc<dyn EventBus>,
        settings: &EngineSettings,
    ) -> Self {
        Self {
            repository,
            ledger,
            event_bus,
            save_retry_attempts: settings.save_retry_attempts.max(1),
        }
    }

    /// Execute one release command.
    pub async fn handle(&self, command: &ReleaseClient) -> Result<SellerView> {
        let client_id = command.client_id();

        let seller_id = self.ledger.unbind(client_id).await?;

        let persisted = match self.release_from(seller_id).await {
            Ok(persisted) => persisted,
            Err(err) => {
                // Nothing was persisted; restore the observed binding.
                self.ledger.bind(client_id, seller_id).await.ok();
                return Err(err);
            }
        };

        info!(
            client_id,
            seller_id = %persisted.id(),
            current_clients = persisted.current_clients(),
            "Client released from seller"
        );

        let view = SellerView::from(&persisted);
        let event = Arc::new(EventEnvelope::new(
            command.correlation_id(),
            SellerEvent::Released {
                seller_id: persisted.id(),
                client_id: client_id.to_string(),
                at: persisted.updated_at(),
            },
        ));

        if let Err(source) = self.event_bus.publish(event).await {
            warn!(
                client_id,
                seller_id = %persisted.id(),
                error = %source,
                "Seller persisted but event publication failed"
            );
            return Err(HandlerError::PublishFailed {
                view: Box::new(view),
                source,
            });
        }

        Ok(view)
    }

    /// Decrement and persist under the version check, re-reading on
    /// conflict.
    async fn release_from(&self, seller_id: Uuid) -> Result<Seller> {
        let mut attempt = 0;
        loop {
            attempt += 1;

            let mut seller = self
                .repository
                .find_by_id(seller_id)
                .await?
                .ok_or(HandlerError::SellerVanished(seller_id))?;
            seller.release_one()?;

            match self.repository.save(&seller).await {
                Ok(persisted) => return Ok(persisted),
                Err(RepositoryError::Conflict { .. }) if attempt < self.save_retry_attempts => {
                    debug!(seller_id = %seller_id, attempt, "Stale seller snapshot, re-reading");
                    continue;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}
