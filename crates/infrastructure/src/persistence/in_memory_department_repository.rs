//! In-memory department store
//!
//! Applies the isolation filter to every read the way a SQL store would add
//! `WHERE column = value` clauses.

use std::{collections::BTreeMap, sync::Arc};

use application::{error::ApplicationError, ports::DepartmentRepository};
use async_trait::async_trait;
use domain::{DepartmentId, DepartmentRecord, IsolationFilter};
use parking_lot::RwLock;
use tracing::{debug, instrument};

/// Department repository backed by a shared map
///
/// Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDepartmentRepository {
    records: Arc<RwLock<BTreeMap<DepartmentId, DepartmentRecord>>>,
}

impl InMemoryDepartmentRepository {
    /// Create an empty repository
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository holding `records`
    pub fn with_records(records: impl IntoIterator<Item = DepartmentRecord>) -> Self {
        let records = records.into_iter().map(|r| (r.id, r)).collect();
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    /// Number of stored departments, ignoring isolation
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl DepartmentRepository for InMemoryDepartmentRepository {
    #[instrument(skip(self), fields(filter_len = filter.len()))]
    async fn find(
        &self,
        filter: &IsolationFilter,
    ) -> Result<Vec<DepartmentRecord>, ApplicationError> {
        let records = self.records.read();
        let matching: Vec<_> = records
            .values()
            .filter(|record| filter.matches(*record))
            .cloned()
            .collect();
        debug!(total = records.len(), matching = matching.len(), "Filtered departments");
        Ok(matching)
    }

    #[instrument(skip(self, filter), fields(department_id = %id))]
    async fn get(
        &self,
        id: &DepartmentId,
        filter: &IsolationFilter,
    ) -> Result<Option<DepartmentRecord>, ApplicationError> {
        Ok(self
            .records
            .read()
            .get(id)
            .filter(|record| filter.matches(*record))
            .cloned())
    }

    #[instrument(skip(self, record), fields(department_id = %record.id, version = record.version))]
    async fn save(&self, record: &DepartmentRecord) -> Result<(), ApplicationError> {
        let mut records = self.records.write();
        if let Some(stored) = records.get(&record.id) {
            if stored.tenant_id != record.tenant_id
                || stored.organization_id != record.organization_id
            {
                return Err(ApplicationError::Repository(format!(
                    "department {} cannot move between tenants or organizations",
                    record.id
                )));
            }
            if record.version <= stored.version {
                return Err(ApplicationError::Repository(format!(
                    "stale write for department {}: stored version {} is not older than {}",
                    record.id, stored.version, record.version
                )));
            }
        }
        records.insert(record.id, record.clone());
        Ok(())
    }
}
