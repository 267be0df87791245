//! Port for department persistence
//!
//! Every read takes an [`IsolationFilter`]; implementations must apply it as
//! an equality filter (AND across entries) before returning rows.

use async_trait::async_trait;
use domain::{DepartmentId, DepartmentRecord, IsolationFilter};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for department storage
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DepartmentRepository: Send + Sync {
    /// All departments matching `filter`
    async fn find(&self, filter: &IsolationFilter)
    -> Result<Vec<DepartmentRecord>, ApplicationError>;

    /// One department, if it exists and matches `filter`
    async fn get(
        &self,
        id: &DepartmentId,
        filter: &IsolationFilter,
    ) -> Result<Option<DepartmentRecord>, ApplicationError>;

    /// Insert a department, or replace it with a newer version
    ///
    /// Replacing requires `record.version` to be greater than the stored
    /// version; otherwise the write is rejected as stale.
    async fn save(&self, record: &DepartmentRecord) -> Result<(), ApplicationError>;
}
