//! Seller entity with self-validating capacity transitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Result type for domain operations.
pub type Result<T> = std::result::Result<T, DomainError>;

/// Errors raised by seller state transitions.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Seller {seller_id} is at capacity ({max_clients})")]
    CapacityExceeded { seller_id: Uuid, max_clients: u32 },

    #[error("Seller {seller_id} has no clients assigned")]
    NoClientsAssigned { seller_id: Uuid },

    #[error("Seller {seller_id} is offline")]
    SellerOffline { seller_id: Uuid },

    #[error("Invalid status transition for seller {seller_id}: {from} -> {to}")]
    InvalidStatusTransition {
        seller_id: Uuid,
        from: SellerStatus,
        to: SellerStatus,
    },

    #[error("max_clients must be positive")]
    InvalidCapacity,
}

/// Availability state of a seller.
///
/// `Available` and `Busy` are derived from load crossing the capacity
/// threshold. `Offline` is administrative and is never entered or left
/// by a load transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SellerStatus {
    Available,
    Busy,
    Offline,
}

impl SellerStatus {
    /// Wire label for projections.
    pub fn as_str(&self) -> &'static str {
        match self {
            SellerStatus::Available => "available",
            SellerStatus::Busy => "busy",
            SellerStatus::Offline => "offline",
        }
    }
}

impl std::fmt::Display for SellerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed set of seller specialties used to match escalated clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Specialty {
    Premium,
    General,
    Technical,
    Vip,
}

impl Specialty {
    /// Parse a wire label. Returns `None` for labels outside the set.
    pub fn parse(label: &str) -> Option<Specialty> {
        match label {
            "premium" => Some(Specialty::Premium),
            "general" => Some(Specialty::General),
            "technical" => Some(Specialty::Technical),
            "vip" => Some(Specialty::Vip),
            _ => None,
        }
    }

    /// Wire label for projections.
    pub fn as_str(&self) -> &'static str {
        match self {
            Specialty::Premium => "premium",
            Specialty::General => "general",
            Specialty::Technical => "technical",
            Specialty::Vip => "vip",
        }
    }
}

impl std::fmt::Display for Specialty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reported by load transitions so handlers know which events to publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadTransition {
    /// Load changed without crossing the capacity threshold.
    None,
    /// The seller just reached capacity and flipped to busy.
    ReachedCapacity,
    /// The seller dropped below capacity and flipped back to available.
    RegainedCapacity,
}

/// One human sales agent eligible to receive client assignments.
///
/// Load is mutated only through [`Seller::assign_one`] and
/// [`Seller::release_one`], which keep `status` consistent with
/// capacity: the seller flips to busy exactly when `current_clients`
/// reaches `max_clients` and back to available when it drops below.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seller {
    id: Uuid,
    name: String,
    email: String,
    phone: String,
    status: SellerStatus,
    current_clients: u32,
    max_clients: u32,
    specialty: Option<Specialty>,
    rating: f64,
    version: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Seller {
    /// Create a seller with no clients assigned.
    ///
    /// `max_clients` must be positive. Ratings outside `[0.0, 5.0]` are
    /// clamped into range.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        max_clients: u32,
        specialty: Option<Specialty>,
        rating: f64,
    ) -> Result<Self> {
        if max_clients == 0 {
            return Err(DomainError::InvalidCapacity);
        }
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            status: SellerStatus::Available,
            current_clients: 0,
            max_clients,
            specialty,
            rating: rating.clamp(0.0, 5.0),
            version: 0,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn status(&self) -> SellerStatus {
        self.status
    }

    pub fn current_clients(&self) -> u32 {
        self.current_clients
    }

    pub fn max_clients(&self) -> u32 {
        self.max_clients
    }

    pub fn specialty(&self) -> Option<Specialty> {
        self.specialty
    }

    pub fn rating(&self) -> f64 {
        self.rating
    }

    /// Optimistic-concurrency token; bumped by the repository on save.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Return this seller with the given version. Repository adapters
    /// use this to stamp the stored row after a successful save.
    pub fn with_version(mut self, version: u64) -> Seller {
        self.version = version;
        self
    }

    /// Current load as a percentage of capacity.
    pub fn load_percentage(&self) -> f64 {
        f64::from(self.current_clients) / f64::from(self.max_clients) * 100.0
    }

    /// True when at least one more client fits.
    pub fn has_spare_capacity(&self) -> bool {
        self.current_clients < self.max_clients
    }

    /// True when `requested` is unset or equals this seller's specialty.
    pub fn matches_specialty(&self, requested: Option<Specialty>) -> bool {
        match requested {
            None => true,
            Some(wanted) => self.specialty == Some(wanted),
        }
    }

    /// Take on one more client.
    ///
    /// Fails when the seller is offline or already at capacity; no state
    /// changes on failure. Flips to busy when the post-increment load
    /// equals capacity.
    pub fn assign_one(&mut self) -> Result<LoadTransition> {
        if self.status == SellerStatus::Offline {
            return Err(DomainError::SellerOffline { seller_id: self.id });
        }
        if self.current_clients >= self.max_clients {
            return Err(DomainError::CapacityExceeded {
                seller_id: self.id,
                max_clients: self.max_clients,
            });
        }
        self.current_clients += 1;
        self.updated_at = Utc::now();
        if self.current_clients == self.max_clients && self.status == SellerStatus::Available {
            self.status = SellerStatus::Busy;
            return Ok(LoadTransition::ReachedCapacity);
        }
        Ok(LoadTransition::None)
    }

    /// Let one client go.
    ///
    /// Fails when no clients are assigned. Flips back to available when
    /// a busy seller drops below capacity; an offline seller stays
    /// offline.
    pub fn release_one(&mut self) -> Result<LoadTransition> {
        if self.current_clients == 0 {
            return Err(DomainError::NoClientsAssigned { seller_id: self.id });
        }
        self.current_clients -= 1;
        self.updated_at = Utc::now();
        if self.status == SellerStatus::Busy && self.current_clients < self.max_clients {
            self.status = SellerStatus::Available;
            return Ok(LoadTransition::RegainedCapacity);
        }
        Ok(LoadTransition::None)
    }

    /// Administrative status change.
    ///
    /// `Offline` can be entered and left at any load, but leaving it must
    /// land on the status the current load dictates. Flipping between
    /// `Available` and `Busy` directly is rejected when it contradicts
    /// the capacity-derived state.
    pub fn set_status(&mut self, next: SellerStatus) -> Result<()> {
        if next == self.status {
            return Ok(());
        }
        let full = self.current_clients == self.max_clients;
        let allowed = match next {
            SellerStatus::Offline => true,
            SellerStatus::Available => !full,
            SellerStatus::Busy => full,
        };
        if !allowed {
            return Err(DomainError::InvalidStatusTransition {
                seller_id: self.id,
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }
}
