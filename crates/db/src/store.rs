//! [`SubscriptionStore`] backed by PostgreSQL.

use async_trait::async_trait;
use subtrack_core::cost::{CostQuery, CostSummary};
use subtrack_core::error::CoreError;
use subtrack_core::store::SubscriptionStore;
use subtrack_core::subscription::{Subscription, SubscriptionPage};
use subtrack_core::types::DbId;

use crate::models::subscription::SubscriptionRow;
use crate::repositories::SubscriptionRepo;
use crate::DbPool;

/// Adapts [`SubscriptionRepo`] to the core storage boundary.
///
/// Every `sqlx` error surfaces as [`CoreError::Storage`].
#[derive(Debug, Clone)]
pub struct PgSubscriptionStore {
    pool: DbPool,
}

impl PgSubscriptionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// SQLSTATE 22003: the `SUM(price)` numeric no longer fits the `BIGINT` cast.
fn is_numeric_out_of_range(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("22003"))
}

fn to_domain(row: SubscriptionRow) -> Result<Subscription, CoreError> {
    Subscription::try_from(row).map_err(CoreError::storage)
}

#[async_trait]
impl SubscriptionStore for PgSubscriptionStore {
    async fn health_check(&self) -> Result<(), CoreError> {
        crate::health_check(&self.pool)
            .await
            .map_err(CoreError::storage)
    }

    async fn create(&self, sub: &Subscription) -> Result<Subscription, CoreError> {
        let row = SubscriptionRepo::create(&self.pool, sub)
            .await
            .map_err(CoreError::storage)?;
        to_domain(row)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Subscription>, CoreError> {
        SubscriptionRepo::find_by_id(&self.pool, id)
            .await
            .map_err(CoreError::storage)?
            .map(to_domain)
            .transpose()
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<SubscriptionPage, CoreError> {
        let rows = SubscriptionRepo::list(&self.pool, limit, offset)
            .await
            .map_err(CoreError::storage)?;
        let total = SubscriptionRepo::count(&self.pool)
            .await
            .map_err(CoreError::storage)?;

        let items = rows
            .into_iter()
            .map(to_domain)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SubscriptionPage { items, total })
    }

    async fn update(&self, sub: &Subscription) -> Result<Option<Subscription>, CoreError> {
        SubscriptionRepo::update(&self.pool, sub)
            .await
            .map_err(CoreError::storage)?
            .map(to_domain)
            .transpose()
    }

    async fn delete(&self, id: DbId) -> Result<bool, CoreError> {
        SubscriptionRepo::delete(&self.pool, id)
            .await
            .map_err(CoreError::storage)
    }

    async fn total_cost(&self, query: &CostQuery) -> Result<CostSummary, CoreError> {
        let (total_cost, count) = SubscriptionRepo::total_cost(&self.pool, query)
            .await
            .map_err(|err| {
                if is_numeric_out_of_range(&err) {
                    CoreError::CostOverflow
                } else {
                    CoreError::storage(err)
                }
            })?;
        Ok(CostSummary { total_cost, count })
    }
}
