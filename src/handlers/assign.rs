//! Assign-seller command handler.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{HandlerError, Result};
use crate::bus::EventBus;
use crate::commands::AssignClient;
use crate::config::EngineSettings;
use crate::domain::{EventEnvelope, LoadTransition, SellerEvent};
use crate::ledger::AssignmentLedger;
use crate::policy;
use crate::projection::SellerView;
use crate::repository::{RepositoryError, SellerRepository};

/// Handles assignment commands.
///
/// Loads the seller pool, selects a seller through the policy, claims
/// the client binding, persists the incremented load under the version
/// check, and publishes events once persistence has succeeded. A stale
/// selection surfaces as a version conflict and re-runs the whole
/// decide step against fresh state, bounded by the configured attempt
/// budget.
pub struct AssignSellerHandler {
    repository: Arc<dyn SellerRepository>,
    ledger: Arc<dyn AssignmentLedger>,
    event_bus: Arc<dyn EventBus>,
    save_retry_attempts: u32,
}

impl AssignSellerHandler {
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

    /// Execute one assignment command.
    pub async fn handle(&self, command: &AssignClient) -> Result<SellerView> {
        let client_id = command.client_id();

        // Cheap duplicate check up front; the bind below is the
        // authoritative atomic claim.
        if self.ledger.resolve(client_id).await.is_some() {
            return Err(HandlerError::AlreadyAssigned(client_id.to_string()));
        }

        let mut attempt = 0;
        loop {
            attempt += 1;

            let sellers = self.repository.find_all().await?;
            let selected = policy::select(&sellers, command.specialty()).ok_or(
                HandlerError::NoAvailableSellers {
                    specialty: command.specialty(),
                },
            )?;

            let mut seller = selected.clone();
            let transition = seller.assign_one()?;

            self.ledger.bind(client_id, seller.id()).await?;

            let persisted = match self.repository.save(&seller).await {
                Ok(persisted) => persisted,
                Err(RepositoryError::Conflict { .. }) if attempt < self.save_retry_attempts => {
                    self.ledger.unbind(client_id).await.ok();
                    debug!(
                        client_id,
                        seller_id = %seller.id(),
                        attempt,
                        "Stale seller snapshot, reselecting"
                    );
                    continue;
                }
                Err(err) => {
                    self.ledger.unbind(client_id).await.ok();
                    return Err(err.into());
                }
            };

            info!(
                client_id,
                seller_id = %persisted.id(),
                current_clients = persisted.current_clients(),
                "Client assigned to seller"
            );

            let view = SellerView::from(&persisted);
            let at = persisted.updated_at();

            let mut events = vec![Arc::new(EventEnvelope::new(
                command.correlation_id(),
                SellerEvent::Assigned {
                    seller_id: persisted.id(),
                    client_id: client_id.to_string(),
                    at,
                },
            ))];
            if transition == LoadTransition::ReachedCapacity {
                events.push(Arc::new(EventEnvelope::new(
                    command.correlation_id(),
                    SellerEvent::CapacityReached {
                        seller_id: persisted.id(),
                        at,
                    },
                )));
            }

            if let Err(source) = self.event_bus.publish_batch(events).await {
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

            return Ok(view);
        }
    }
}
