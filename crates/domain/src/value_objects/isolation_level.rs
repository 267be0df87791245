//! Isolation level value object
//!
//! The five scopes an operation can be bound to, ordered from the broadest
//! (platform) to the most specific (user).
//!
//! # Examples
//!
//! ```
//! use domain::IsolationLevel;
//!
//! assert!(IsolationLevel::Platform.is_broader_than(IsolationLevel::Tenant));
//! assert!(IsolationLevel::User.is_narrower_than(IsolationLevel::Department));
//! assert_eq!("organization".parse::<IsolationLevel>().unwrap(), IsolationLevel::Organization);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Isolation level of a context or of an operation's requirement
///
/// The order is fixed: `Platform > Tenant > Organization > Department > User`.
/// The derived `Ord` follows declaration order, so `Platform < User` when
/// compared with `<`; use [`IsolationLevel::rank`] or the `is_*_than`
/// helpers to keep the intent readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IsolationLevel {
    /// Platform operators, unscoped
    Platform,
    /// Scoped to one tenant
    Tenant,
    /// Scoped to one organization inside a tenant
    Organization,
    /// Scoped to one department inside an organization
    Department,
    /// Scoped to a single user
    User,
}

impl IsolationLevel {
    /// All levels from broadest to most specific
    pub const ALL: [Self; 5] = [
        Self::Platform,
        Self::Tenant,
        Self::Organization,
        Self::Department,
        Self::User,
    ];

    /// Integer rank, 0 for platform up to 4 for user
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Platform => 0,
            Self::Tenant => 1,
            Self::Organization => 2,
            Self::Department => 3,
            Self::User => 4,
        }
    }

    /// Check if this level covers more data than `other`
    #[must_use]
    pub const fn is_broader_than(self, other: Self) -> bool {
        self.rank() < other.rank()
    }

    /// Check if this level covers less data than `other`
    #[must_use]
    pub const fn is_narrower_than(self, other: Self) -> bool {
        self.rank() > other.rank()
    }

    /// The broader of two levels
    #[must_use]
    pub const fn broadest(self, other: Self) -> Self {
        if self.rank() <= other.rank() {
            self
        } else {
            other
        }
    }

    /// Get the canonical lowercase name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Platform => "platform",
            Self::Tenant => "tenant",
            Self::Organization => "organization",
            Self::Department => "department",
            Self::User => "user",
        }
    }
}

impl fmt::Display for IsolationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for IsolationLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "platform" => Ok(Self::Platform),
            "tenant" => Ok(Self::Tenant),
            "organization" | "org" => Ok(Self::Organization),
            "department" | "dept" => Ok(Self::Department),
            "user" => Ok(Self::User),
            _ => Err(format!(
                "Invalid isolation level: {s}. Use platform, tenant, organization, department or user"
            )),
        }
    }
}

/// A scoped column carried by isolated records and filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IsolationField {
    /// `tenantId`
    TenantId,
    /// `organizationId`
    OrganizationId,
    /// `departmentId`
    DepartmentId,
    /// `userId`
    UserId,
}

impl IsolationField {
    /// Fields in the order they are compared
    pub const ALL: [Self; 4] = [
        Self::TenantId,
        Self::OrganizationId,
        Self::DepartmentId,
        Self::UserId,
    ];

    /// Filter key as handed to the persistence layer
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::TenantId => "tenantId",
            Self::OrganizationId => "organizationId",
            Self::DepartmentId => "departmentId",
            Self::UserId => "userId",
        }
    }

    /// Snake-case column name for SQL-style stores
    #[must_use]
    pub const fn column_name(&self) -> &'static str {
        match self {
            Self::TenantId => "tenant_id",
            Self::OrganizationId => "organization_id",
            Self::DepartmentId => "department_id",
            Self::UserId => "user_id",
        }
    }

    /// The level whose own identifier this field holds
    #[must_use]
    pub const fn level(&self) -> IsolationLevel {
        match self {
            Self::TenantId => IsolationLevel::Tenant,
            Self::OrganizationId => IsolationLevel::Organization,
            Self::DepartmentId => IsolationLevel::Department,
            Self::UserId => IsolationLevel::User,
        }
    }
}

impl fmt::Display for IsolationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
