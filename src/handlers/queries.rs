//! Read-only seller queries.

use std::sync::Arc;

use super::Result;
use crate::domain::Specialty;
use crate::projection::SellerView;
use crate::repository::SellerRepository;

/// Query handlers over the seller pool.
///
/// Pure reads: no mutation, no events. Ordering follows the repository
/// contract (ascending seller id), so two reads over an unchanged store
/// return identical projections.
pub struct SellerQueries {
    repository: Arc<dyn SellerRepository>,
}

impl SellerQueries {
    pub fn new(repository: Arc<dyn SellerRepository>) -> Self {
        Self { repository }
    }

    /// Project every seller.
    pub async fn find_all(&self) -> Result<Vec<SellerView>> {
        let sellers = self.repository.find_all().await?;
        Ok(sellers.iter().map(SellerView::from).collect())
    }

    /// Project sellers that can take another client.
    pub async fn find_available(&self) -> Result<Vec<SellerView>> {
        let sellers = self.repository.find_available().await?;
        Ok(sellers.iter().map(SellerView::from).collect())
    }

    /// Project sellers with the given specialty.
    pub async fn find_by_specialty(&self, specialty: Specialty) -> Result<Vec<SellerView>> {
        let sellers = self.repository.find_by_specialty(specialty).await?;
        Ok(sellers.iter().map(SellerView::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Seller, SellerStatus};
    use crate::repository::MemorySellerRepository;

    fn seller(max_clients: u32, specialty: Option<Specialty>) -> Seller {
        Seller::new("s", "s@example.com", "1", max_clients, specialty, 3.0).unwrap()
    }

    async fn seeded() -> (Arc<MemorySellerRepository>, SellerQueries) {
        let repository = Arc::new(MemorySellerRepository::new());

        let mut busy = seller(1, Some(Specialty::Premium));
        busy.assign_one().unwrap();
        let mut offline = seller(2, None);
        offline.set_status(SellerStatus::Offline).unwrap();

        repository.insert(busy).await;
        repository.insert(offline).await;
        repository.insert(seller(2, Some(Specialty::Premium))).await;
        repository.insert(seller(3, Some(Specialty::Technical))).await;

        let queries = SellerQueries::new(Arc::clone(&repository) as Arc<dyn SellerRepository>);
        (repository, queries)
    }

    #[tokio::test]
    async fn test_find_all_projects_every_seller() {
        let (_, queries) = seeded().await;
        let all = queries.find_all().await.unwrap();
        assert_eq!(all.len(), 4);
    }

    #[tokio::test]
    async fn test_find_available_excludes_busy_and_offline() {
        let (_, queries) = seeded().await;
        let available = queries.find_available().await.unwrap();
        assert_eq!(available.len(), 2);
        assert!(available.iter().all(|v| v.status == "available"));
    }

    #[tokio::test]
    async fn test_find_by_specialty_projects_matching_sellers() {
        let (_, queries) = seeded().await;
        let premium = queries.find_by_specialty(Specialty::Premium).await.unwrap();
        assert_eq!(premium.len(), 2);
        assert!(premium.iter().all(|v| v.specialty.as_deref() == Some("premium")));
    }

    #[tokio::test]
    async fn test_queries_are_pure_and_stable() {
        let (_, queries) = seeded().await;
        let first = queries.find_available().await.unwrap();
        let second = queries.find_available().await.unwrap();
        assert_eq!(first, second);

        let all_first = queries.find_all().await.unwrap();
        let all_second = queries.find_all().await.unwrap();
        assert_eq!(all_first, all_second);
    }
}
