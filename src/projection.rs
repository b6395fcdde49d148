//! External projection of seller state.
//!
//! `SellerView` is the shape callers see; it exposes wire labels and the
//! computed load percentage while keeping entity invariants internal.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::Seller;

/// Read model of one seller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SellerView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub status: String,
    pub current_clients: u32,
    pub max_clients: u32,
    pub specialty: Option<String>,
    pub rating: f64,
    pub load_percentage: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Seller> for SellerView {
    fn from(seller: &Seller) -> Self {
        Self {
            id: seller.id(),
            name: seller.name().to_string(),
            email: seller.email().to_string(),
            phone: seller.phone().to_string(),
            status: seller.status().as_str().to_string(),
            current_clients: seller.current_clients(),
            max_clients: seller.max_clients(),
            specialty: seller.specialty().map(|s| s.as_str().to_string()),
            rating: seller.rating(),
            load_percentage: seller.load_percentage(),
            created_at: seller.created_at(),
            updated_at: seller.updated_at(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Specialty;

    #[test]
    fn test_view_reflects_entity_state() {
        let mut seller = Seller::new(
            "Iris",
            "iris@example.com",
            "+1 555 0101",
            4,
            Some(Specialty::Technical),
            4.2,
        )
        .unwrap();
        seller.assign_one().unwrap();

        let view = SellerView::from(&seller);
        assert_eq!(view.id, seller.id());
        assert_eq!(view.status, "available");
        assert_eq!(view.specialty.as_deref(), Some("technical"));
        assert_eq!(view.current_clients, 1);
        assert_eq!(view.load_percentage, 25.0);
    }

    #[test]
    fn test_view_of_unset_specialty() {
        let seller = Seller::new("Jo", "jo@example.com", "+1 555 0102", 1, None, 3.0).unwrap();
        let view = SellerView::from(&seller);
        assert_eq!(view.specialty, None);
        assert_eq!(view.status, "available");
    }
}
