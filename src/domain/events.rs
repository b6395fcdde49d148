//! Domain events emitted by assignment state changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A completed, persisted assignment state change.
///
/// Events are published exactly once per successful command, strictly
/// after the seller row has been persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SellerEvent {
    /// A client was bound to a seller.
    Assigned {
        seller_id: Uuid,
        client_id: String,
        at: DateTime<Utc>,
    },
    /// A client's binding to a seller was freed.
    Released {
        seller_id: Uuid,
        client_id: String,
        at: DateTime<Utc>,
    },
    /// A seller took on its last free slot and flipped to busy.
    CapacityReached { seller_id: Uuid, at: DateTime<Utc> },
}

impl SellerEvent {
    /// Routing name used by bus subscriptions.
    pub fn name(&self) -> &'static str {
        match self {
            SellerEvent::Assigned { .. } => "seller.assigned",
            SellerEvent::Released { .. } => "seller.released",
            SellerEvent::CapacityReached { .. } => "seller.capacity_reached",
        }
    }

    /// The seller this event is about.
    pub fn seller_id(&self) -> Uuid {
        match self {
            SellerEvent::Assigned { seller_id, .. }
            | SellerEvent::Released { seller_id, .. }
            | SellerEvent::CapacityReached { seller_id, .. } => *seller_id,
        }
    }
}

/// Envelope pairing an event with its command correlation metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Correlation id of the command that caused the event.
    pub correlation_id: String,
    /// The state change itself.
    pub event: SellerEvent,
}

impl EventEnvelope {
    pub fn new(correlation_id: impl Into<String>, event: SellerEvent) -> Self {
        Self {
            correlation_id: correlation_id.into(),
            event,
        }
    }

    /// Routing name of the wrapped event.
    pub fn name(&self) -> &'static str {
        self.event.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        let at = Utc::now();
        let seller_id = Uuid::new_v4();
        let assigned = SellerEvent::Assigned {
            seller_id,
            client_id: "c-1".to_string(),
            at,
        };
        let released = SellerEvent::Released {
            seller_id,
            client_id: "c-1".to_string(),
            at,
        };
        let full = SellerEvent::CapacityReached { seller_id, at };

        assert_eq!(assigned.name(), "seller.assigned");
        assert_eq!(released.name(), "seller.released");
        assert_eq!(full.name(), "seller.capacity_reached");
        assert_eq!(assigned.seller_id(), seller_id);
    }

    #[test]
    fn test_envelope_serializes_event_tag() {
        let envelope = EventEnvelope::new(
            "corr-1",
            SellerEvent::CapacityReached {
                seller_id: Uuid::new_v4(),
                at: Utc::now(),
            },
        );
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["correlation_id"], "corr-1");
        assert_eq!(json["event"]["type"], "capacity_reached");
    }
}
