//! Command and query handlers orchestrating the assignment engine.
//!
//! Command handlers load state through the repository port, decide via
//! the assignment policy, persist under the optimistic version check,
//! and publish domain events strictly after persistence succeeds.
//! Query handlers are read-only projections with no side effects.

mod assign;
mod queries;
mod release;

pub use assign::AssignSellerHandler;
pub use queries::SellerQueries;
pub use release::ReleaseSellerHandler;

use uuid::Uuid;

use crate::bus::BusError;
use crate::domain::{DomainError, Specialty};
use crate::ledger::LedgerError;
use crate::projection::SellerView;
use crate::repository::RepositoryError;

/// Result type for handler operations.
pub type Result<T> = std::result::Result<T, HandlerError>;

/// Errors surfaced by command handlers.
///
/// Every failure is reported to the caller; nothing is swallowed.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("No available sellers (specialty filter: {specialty:?})")]
    NoAvailableSellers { specialty: Option<Specialty> },

    #[error("Client '{0}' is already assigned to a seller")]
    AlreadyAssigned(String),

    #[error("Client '{0}' has no active assignment")]
    ClientNotAssigned(String),

    #[error("Seller {0} referenced by the ledger was not found")]
    SellerVanished(Uuid),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// The seller row was persisted but event publication failed. The
    /// mutation stands; the caller decides whether to retry publication.
    #[error("Seller state persisted but event publication failed: {source}")]
    PublishFailed {
        view: Box<SellerView>,
        #[source]
        source: BusError,
    },
}

impl From<LedgerError> for HandlerError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::AlreadyAssigned(client_id) => HandlerError::AlreadyAssigned(client_id),
            LedgerError::NotBound(client_id) => HandlerError::ClientNotAssigned(client_id),
        }
    }
}
