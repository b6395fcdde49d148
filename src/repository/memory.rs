//! In-memory seller repository.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::{RepositoryError, Result, SellerRepository};
use crate::domain::{Seller, SellerStatus, Specialty};

/// Seller repository backed by an in-process map.
///
/// Suitable for standalone deployments and tests. The version check in
/// `save` runs under the map's write lock, making check and store
/// atomic.
#[derive(Default)]
pub struct MemorySellerRepository {
    sellers: RwLock<HashMap<Uuid, Seller>>,
}

impl MemorySellerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a seller, bypassing the version check. Administrative
    /// creation sits outside the command handlers.
    pub async fn insert(&self, seller: Seller) {
        self.sellers.write().await.insert(seller.id(), seller);
    }
}

fn sorted_by_id(mut sellers: Vec<Seller>) -> Vec<Seller> {
    sellers.sort_by_key(Seller::id);
    sellers
}

#[async_trait]
impl SellerRepository for MemorySellerRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Seller>> {
        Ok(self.sellers.read().await.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Seller>> {
        let store = self.sellers.read().await;
        Ok(sorted_by_id(store.values().cloned().collect()))
    }

    async fn find_available(&self) -> Result<Vec<Seller>> {
        let store = self.sellers.read().await;
        Ok(sorted_by_id(
            store
                .values()
                .filter(|s| s.status() == SellerStatus::Available && s.has_spare_capacity())
                .cloned()
                .collect(),
        ))
    }

    async fn find_by_specialty(&self, specialty: Specialty) -> Result<Vec<Seller>> {
        let store = self.sellers.read().await;
        Ok(sorted_by_id(
            store
                .values()
                .filter(|s| s.specialty() == Some(specialty))
                .cloned()
                .collect(),
        ))
    }

    async fn save(&self, seller: &Seller) -> Result<Seller> {
        let mut store = self.sellers.write().await;
        let stored = store
            .get(&seller.id())
            .ok_or(RepositoryError::SellerNotFound(seller.id()))?;

        if stored.version() != seller.version() {
            debug!(
                seller_id = %seller.id(),
                expected = seller.version(),
                stored = stored.version(),
                "Version conflict on save"
            );
            return Err(RepositoryError::Conflict {
                seller_id: seller.id(),
                expected: seller.version(),
                stored: stored.version(),
            });
        }

        let persisted = seller.clone().with_version(seller.version() + 1);
        store.insert(persisted.id(), persisted.clone());
        Ok(persisted)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.sellers
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::SellerNotFound(id))
    }
}
