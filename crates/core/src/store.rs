//! Storage boundary for subscription records.
//!
//! The service layer only talks to a [`SubscriptionStore`]. Consistency,
//! isolation and any retry policy belong to the implementation; the core
//! never locks or retries on its own.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cost::{CostQuery, CostSummary};
use crate::error::CoreError;
use crate::subscription::{Subscription, SubscriptionPage};
use crate::types::DbId;

/// Persistence operations required by the subscription service.
///
/// Implementations report backend failures as [`CoreError::Storage`].
/// Missing rows are reported as `None` / `false`, never as errors.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Cheap liveness probe for the backing store.
    async fn health_check(&self) -> Result<(), CoreError>;

    /// Persist a fully-formed record and return it as stored.
    async fn create(&self, sub: &Subscription) -> Result<Subscription, CoreError>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<Subscription>, CoreError>;

    /// Newest first, with the total number of stored records.
    async fn list(&self, limit: i64, offset: i64) -> Result<SubscriptionPage, CoreError>;

    /// Replace the stored record with the same id.
    ///
    /// Returns `None` if no such record exists.
    async fn update(&self, sub: &Subscription) -> Result<Option<Subscription>, CoreError>;

    /// Hard delete. Returns `true` if a record was removed.
    async fn delete(&self, id: DbId) -> Result<bool, CoreError>;

    /// Count and sum the prices of records matching `query`.
    async fn total_cost(&self, query: &CostQuery) -> Result<CostSummary, CoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MemoryStoreError {
    #[error("subscription {0} already exists")]
    DuplicateId(DbId),
}

/// Process-local store backed by a `HashMap`.
///
/// Cost queries evaluate [`CostQuery::matches`] in-process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<DbId, Subscription>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubscriptionStore for MemoryStore {
    async fn health_check(&self) -> Result<(), CoreError> {
        Ok(())
    }

    async fn create(&self, sub: &Subscription) -> Result<Subscription, CoreError> {
        let mut records = self.records.write().await;
        if records.contains_key(&sub.id) {
            return Err(CoreError::storage(MemoryStoreError::DuplicateId(sub.id)));
        }
        records.insert(sub.id, sub.clone());
        Ok(sub.clone())
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Subscription>, CoreError> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<SubscriptionPage, CoreError> {
        let records = self.records.read().await;

        let mut items: Vec<Subscription> = records.values().cloned().collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));

        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        let take = usize::try_from(limit).unwrap_or(0);
        let items = items.into_iter().skip(skip).take(take).collect();

        Ok(SubscriptionPage {
            items,
            total: records.len() as i64,
        })
    }

    async fn update(&self, sub: &Subscription) -> Result<Option<Subscription>, CoreError> {
        let mut records = self.records.write().await;
        match records.get_mut(&sub.id) {
            Some(slot) => {
                *slot = sub.clone();
                Ok(Some(sub.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: DbId) -> Result<bool, CoreError> {
        Ok(self.records.write().await.remove(&id).is_some())
    }

    async fn total_cost(&self, query: &CostQuery) -> Result<CostSummary, CoreError> {
        let records = self.records.read().await;
        CostSummary::collect(records.values(), query)
    }
}
