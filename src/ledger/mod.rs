//! Client-to-seller assignment ledger.
//!
//! The engine owns which seller each escalated client is bound to.
//! Release commands carry only the client id and are resolved here, and
//! the insert-if-absent `bind` is what enforces
//! at-most-one-seller-per-client under concurrent assignment requests.

use async_trait::async_trait;
use uuid::Uuid;

pub mod memory;

pub use memory::MemoryAssignmentLedger;

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur during ledger operations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("Client '{0}' is already assigned to a seller")]
    AlreadyAssigned(String),

    #[error("Client '{0}' has no seller binding")]
    NotBound(String),
}

/// Interface for the client→seller binding store.
///
/// Implementations:
/// - `MemoryAssignmentLedger`: in-process map
#[async_trait]
pub trait AssignmentLedger: Send + Sync {
    /// Bind a client to a seller. Fails if the client is already bound;
    /// the check and the insert must be atomic.
    async fn bind(&self, client_id: &str, seller_id: Uuid) -> Result<()>;

    /// Look up the seller a client is bound to.
    async fn resolve(&self, client_id: &str) -> Option<Uuid>;

    /// Remove a client's binding, returning the seller it pointed at.
    async fn unbind(&self, client_id: &str) -> Result<Uuid>;
}
