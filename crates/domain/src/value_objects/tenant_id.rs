//! Tenant identifier value object
//!
//! # Examples
//!
//! ```
//! use domain::TenantId;
//!
//! let tenant_id = TenantId::new();
//! assert!(!tenant_id.to_string().is_empty());
//!
//! let parsed = TenantId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();
//! assert_eq!(parsed.to_string(), "550e8400-e29b-41d4-a716-446655440000");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A unique tenant identifier
///
/// Tenants are the outermost scope below the platform. Tenant ids are opaque:
/// two ids are related only by equality, never by prefix or hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(Uuid);

impl TenantId {
    /// Create a new random tenant ID
    ///
    /// # Examples
    ///
    /// ```
    /// use domain::TenantId;
    ///
    /// let id1 = TenantId::new();
    /// let id2 = TenantId::new();
    /// assert_ne!(id1, id2);
    /// ```
    #[allow(clippy::new_without_default)] // A default id would have to be random
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a tenant ID from an existing UUID
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse a tenant ID from a string
    ///
    /// # Examples
    ///
    /// ```
    /// use domain::TenantId;
    ///
    /// assert!(TenantId::parse("550e8400-e29b-41d4-a716-446655440000").is_ok());
    /// assert!(TenantId::parse("invalid").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    /// Get the underlying UUID
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for TenantId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<TenantId> for Uuid {
    fn from(id: TenantId) -> Self {
        id.0
    }
}
