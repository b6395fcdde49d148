//! Seller selection policy.
//!
//! Pure selection over a snapshot of the seller pool; no I/O, no
//! mutation. Handlers re-run the selection on a fresh snapshot when the
//! optimistic save detects a stale pick.

use std::cmp::Ordering;

use crate::domain::{Seller, SellerStatus, Specialty};

/// Select the seller that should receive the next client.
///
/// Eligibility: not offline, spare capacity, and specialty match (an
/// unset preference matches any seller). Among eligible sellers the
/// order is least loaded first, then highest rated, then lowest id, so
/// repeated runs over the same snapshot pick the same seller.
pub fn select(sellers: &[Seller], specialty: Option<Specialty>) -> Option<&Seller> {
    sellers
        .iter()
        .filter(|s| is_eligible(s, specialty))
        .min_by(|a, b| rank(a, b))
}

fn is_eligible(seller: &Seller, specialty: Option<Specialty>) -> bool {
    seller.status() != SellerStatus::Offline
        && seller.has_spare_capacity()
        && seller.matches_specialty(specialty)
}

fn rank(a: &Seller, b: &Seller) -> Ordering {
    a.load_percentage()
        .total_cmp(&b.load_percentage())
        .then_with(|| b.rating().total_cmp(&a.rating()))
        .then_with(|| a.id().cmp(&b.id()))
}
