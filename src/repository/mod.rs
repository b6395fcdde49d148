//! Seller persistence port.
//!
//! This module contains:
//! - `SellerRepository` trait: the persistence contract the engine
//!   consumes
//! - `RepositoryError`: adapter-reported failures
//! - Implementations: in-memory, failure-injecting mock

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Seller, Specialty};

pub mod memory;
pub mod mock;

pub use memory::MemorySellerRepository;
pub use mock::MockSellerRepository;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Errors that can occur during repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Seller {0} not found")]
    SellerNotFound(Uuid),

    #[error("Version conflict persisting seller {seller_id}: expected {expected}, stored {stored}")]
    Conflict {
        seller_id: Uuid,
        expected: u64,
        stored: u64,
    },

    #[error("Storage backend failure: {0}")]
    Backend(String),
}

/// Interface for seller persistence.
///
/// `save` is a compare-and-swap: adapters must verify that the stored
/// row's version equals the incoming seller's version and persist with
/// the version incremented, failing with [`RepositoryError::Conflict`]
/// otherwise. Command handlers rely on this to serialize capacity
/// changes per seller without holding a lock across their
/// read-decide-write span.
///
/// Listing operations return sellers in ascending id order so repeated
/// reads over an unchanged store yield identical snapshots.
///
/// Implementations:
/// - `MemorySellerRepository`: in-process storage
/// - `MockSellerRepository`: failure-injecting mock for tests
#[async_trait]
pub trait SellerRepository: Send + Sync {
    /// Fetch one seller by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Seller>>;

    /// Fetch every seller.
    async fn find_all(&self) -> Result<Vec<Seller>>;

    /// Fetch sellers that are available and below capacity.
    async fn find_available(&self) -> Result<Vec<Seller>>;

    /// Fetch sellers with the given specialty.
    async fn find_by_specialty(&self, specialty: Specialty) -> Result<Vec<Seller>>;

    /// Persist a seller under the version check. Returns the stored row
    /// with its bumped version.
    async fn save(&self, seller: &Seller) -> Result<Seller>;

    /// Remove a seller.
    async fn delete(&self, id: Uuid) -> Result<()>;
}
