//! Validated command values.
//!
//! Commands are built through constructing functions that return either
//! an immutable command value or a typed validation error. An invalid
//! command never reaches the repository or the event bus.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::Specialty;

/// Length limits for validated fields.
pub mod limits {
    /// Maximum client identifier length.
    pub const MAX_CLIENT_ID_LENGTH: usize = 128;
    /// Maximum client display-name length.
    pub const MAX_CLIENT_NAME_LENGTH: usize = 256;
}

/// Errors rejecting malformed command input.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("client id cannot be empty")]
    EmptyClientId,

    #[error("client id exceeds maximum length (max: {max}, got: {got})")]
    ClientIdTooLong { max: usize, got: usize },

    #[error("client name exceeds maximum length (max: {max}, got: {got})")]
    ClientNameTooLong { max: usize, got: usize },

    #[error("unknown specialty '{0}' (allowed: premium, general, technical, vip)")]
    UnknownSpecialty(String),
}

fn validate_client_id(client_id: &str) -> Result<(), ValidationError> {
    if client_id.is_empty() {
        return Err(ValidationError::EmptyClientId);
    }
    if client_id.len() > limits::MAX_CLIENT_ID_LENGTH {
        return Err(ValidationError::ClientIdTooLong {
            max: limits::MAX_CLIENT_ID_LENGTH,
            got: client_id.len(),
        });
    }
    Ok(())
}

fn correlation_or_generated(correlation_id: Option<String>) -> String {
    correlation_id.unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Request to bind one escalated client to a seller.
#[derive(Debug, Clone)]
pub struct AssignClient {
    client_id: String,
    client_name: String,
    specialty: Option<Specialty>,
    correlation_id: String,
    requested_at: DateTime<Utc>,
}

impl AssignClient {
    /// Build a validated assignment command.
    ///
    /// `specialty` is an optional wire label; labels outside the fixed
    /// set are rejected. A correlation id is generated when none is
    /// supplied.
    pub fn new(
        client_id: impl Into<String>,
        client_name: impl Into<String>,
        specialty: Option<&str>,
        correlation_id: Option<String>,
    ) -> Result<Self, ValidationError> {
        let client_id = client_id.into();
        validate_client_id(&client_id)?;

        let client_name = client_name.into();
        if client_name.len() > limits::MAX_CLIENT_NAME_LENGTH {
            return Err(ValidationError::ClientNameTooLong {
                max: limits::MAX_CLIENT_NAME_LENGTH,
                got: client_name.len(),
            });
        }

        let specialty = match specialty {
            None => None,
            Some(label) => Some(
                Specialty::parse(label)
                    .ok_or_else(|| ValidationError::UnknownSpecialty(label.to_string()))?,
            ),
        };

        Ok(Self {
            client_id,
            client_name,
            specialty,
            correlation_id: correlation_or_generated(correlation_id),
            requested_at: Utc::now(),
        })
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    pub fn specialty(&self) -> Option<Specialty> {
        self.specialty
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    pub fn requested_at(&self) -> DateTime<Utc> {
        self.requested_at
    }
}

/// Request to free one client's seller binding.
#[derive(Debug, Clone)]
pub struct ReleaseClient {
    client_id: String,
    correlation_id: String,
    requested_at: DateTime<Utc>,
}

impl ReleaseClient {
    /// Build a validated release command.
    pub fn new(
        client_id: impl Into<String>,
        correlation_id: Option<String>,
    ) -> Result<Self, ValidationError> {
        let client_id = client_id.into();
        validate_client_id(&client_id)?;
        Ok(Self {
            client_id,
            correlation_id: correlation_or_generated(correlation_id),
            requested_at: Utc::now(),
        })
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    pub fn requested_at(&self) -> DateTime<Utc> {
        self.requested_at
    }
}
