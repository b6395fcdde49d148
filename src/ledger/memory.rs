//! In-memory assignment ledger.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AssignmentLedger, LedgerError, Result};

/// Assignment ledger backed by an in-process map.
#[derive(Default)]
pub struct MemoryAssignmentLedger {
    bindings: RwLock<HashMap<String, Uuid>>,
}

impl MemoryAssignmentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of active bindings.
    pub async fn len(&self) -> usize {
        self.bindings.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.bindings.read().await.is_empty()
    }
}

#[async_trait]
impl AssignmentLedger for MemoryAssignmentLedger {
    async fn bind(&self, client_id: &str, seller_id: Uuid) -> Result<()> {
        let mut bindings = self.bindings.write().await;
        match bindings.entry(client_id.to_string()) {
            Entry::Occupied(_) => Err(LedgerError::AlreadyAssigned(client_id.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(seller_id);
                Ok(())
            }
        }
    }

    async fn resolve(&self, client_id: &str) -> Option<Uuid> {
        self.bindings.read().await.get(client_id).copied()
    }

    async fn unbind(&self, client_id: &str) -> Result<Uuid> {
        self.bindings
            .write()
            .await
            .remove(client_id)
            .ok_or_else(|| LedgerError::NotBound(client_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_resolve_unbind_roundtrip() {
        let ledger = MemoryAssignmentLedger::new();
        let seller_id = Uuid::new_v4();

        ledger.bind("client-1", seller_id).await.unwrap();
        assert_eq!(ledger.resolve("client-1").await, Some(seller_id));

        assert_eq!(ledger.unbind("client-1").await.unwrap(), seller_id);
        assert_eq!(ledger.resolve("client-1").await, None);
    }

    #[tokio::test]
    async fn test_bind_rejects_bound_client() {
        let ledger = MemoryAssignmentLedger::new();
        ledger.bind("client-1", Uuid::new_v4()).await.unwrap();

        let err = ledger.bind("client-1", Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err, LedgerError::AlreadyAssigned("client-1".to_string()));
        assert_eq!(ledger.len().await, 1);
    }

    #[tokio::test]
    async fn test_unbind_unknown_client_is_not_bound() {
        let ledger = MemoryAssignmentLedger::new();
        let err = ledger.unbind("ghost").await.unwrap_err();
        assert_eq!(err, LedgerError::NotBound("ghost".to_string()));
    }

    #[tokio::test]
    async fn test_concurrent_binds_admit_exactly_one() {
        use std::sync::Arc;

        let ledger = Arc::new(MemoryAssignmentLedger::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let ledger = Arc::clone(&ledger);
            handles.push(tokio::spawn(async move {
                ledger.bind("client-1", Uuid::new_v4()).await
            }));
        }

        let mut wins = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                wins += 1;
            }
        }
        assert_eq!(wins, 1);
        assert_eq!(ledger.len().await, 1);
    }
}
