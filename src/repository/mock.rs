//! Mock seller repository for testing.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{RepositoryError, Result, SellerRepository};
use crate::domain::{Seller, SellerStatus, Specialty};

/// Mock repository that stores sellers in memory and can inject
/// failures: hard backend errors on find/save, or a number of version
/// conflicts before a save goes through.
#[derive(Default)]
pub struct MockSellerRepository {
    sellers: RwLock<HashMap<Uuid, Seller>>,
    fail_on_find: RwLock<bool>,
    fail_on_save: RwLock<bool>,
    conflicts_to_inject: RwLock<u32>,
}

impl MockSellerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, seller: Seller) {
        self.sellers.write().await.insert(seller.id(), seller);
    }

    pub async fn set_fail_on_find(&self, fail: bool) {
        *self.fail_on_find.write().await = fail;
    }

    pub async fn set_fail_on_save(&self, fail: bool) {
        *self.fail_on_save.write().await = fail;
    }

    /// Make the next `count` saves fail with a version conflict.
    pub async fn inject_conflicts(&self, count: u32) {
        *self.conflicts_to_inject.write().await = count;
    }
}

#[async_trait]
impl SellerRepository for MockSellerRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Seller>> {
        if *self.fail_on_find.read().await {
            return Err(RepositoryError::Backend("mock find failure".to_string()));
        }
        Ok(self.sellers.read().await.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Seller>> {
        if *self.fail_on_find.read().await {
            return Err(RepositoryError::Backend("mock find failure".to_string()));
        }
        let store = self.sellers.read().await;
        let mut all: Vec<Seller> = store.values().cloned().collect();
        all.sort_by_key(Seller::id);
        Ok(all)
    }

    async fn find_available(&self) -> Result<Vec<Seller>> {
        Ok(self
            .find_all()
            .await?
            .into_iter()
            .filter(|s| s.status() == SellerStatus::Available && s.has_spare_capacity())
            .collect())
    }

    async fn find_by_specialty(&self, specialty: Specialty) -> Result<Vec<Seller>> {
        Ok(self
            .find_all()
            .await?
            .into_iter()
            .filter(|s| s.specialty() == Some(specialty))
            .collect())
    }

    async fn save(&self, seller: &Seller) -> Result<Seller> {
        if *self.fail_on_save.read().await {
            return Err(RepositoryError::Backend("mock save failure".to_string()));
        }
        {
            let mut conflicts = self.conflicts_to_inject.write().await;
            if *conflicts > 0 {
                *conflicts -= 1;
                return Err(RepositoryError::Conflict {
                    seller_id: seller.id(),
                    expected: seller.version(),
                    stored: seller.version() + 1,
                });
            }
        }
        let mut store = self.sellers.write().await;
        let stored = store
            .get(&seller.id())
            .ok_or(RepositoryError::SellerNotFound(seller.id()))?;
        if stored.version() != seller.version() {
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
