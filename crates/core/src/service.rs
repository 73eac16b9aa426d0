//! Subscription use cases on top of a [`SubscriptionStore`].
//!
//! Validation, identity, timestamps, merge and pagination rules live here;
//! persistence is delegated.

use std::sync::Arc;

use chrono::Utc;

use crate::cost::{CostQuery, CostSummary};
use crate::error::CoreError;
use crate::pagination::{clamp_limit, clamp_offset};
use crate::store::SubscriptionStore;
use crate::subscription::{
    CreateSubscription, Subscription, SubscriptionPage, UpdateSubscription,
};
use crate::types::DbId;
use crate::validation::{parse_create, parse_update};

/// Raw total-cost request values, as received from the transport.
#[derive(Debug, Clone, Default)]
pub struct CostRequest<'a> {
    pub start_date: &'a str,
    pub end_date: &'a str,
    pub user_id: Option<&'a str>,
    pub service_name: Option<&'a str>,
}

#[derive(Clone)]
pub struct SubscriptionService {
    store: Arc<dyn SubscriptionStore>,
}

impl SubscriptionService {
    pub fn new(store: Arc<dyn SubscriptionStore>) -> Self {
        Self { store }
    }

    /// Probe the backing store.
    pub async fn health_check(&self) -> Result<(), CoreError> {
        self.store.health_check().await
    }

    pub async fn create(&self, input: &CreateSubscription) -> Result<Subscription, CoreError> {
        let new = parse_create(input).inspect_err(log_rejected)?;
        let sub = Subscription::create(new, uuid::Uuid::new_v4(), Utc::now());
        sub.check_interval().inspect_err(log_rejected)?;

        let created = self.store.create(&sub).await?;
        tracing::info!(
            subscription_id = %created.id,
            user_id = %created.user_id,
            service_name = %created.service_name,
            "Subscription created",
        );
        Ok(created)
    }

    /// Look up by id. Ids that are not UUIDs cannot exist and yield `NotFound`.
    pub async fn get(&self, raw_id: &str) -> Result<Subscription, CoreError> {
        let id = parse_id(raw_id)?;
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::subscription_not_found(raw_id))
    }

    /// Newest first. `limit` and `offset` are clamped before reaching storage.
    pub async fn list(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<SubscriptionPage, CoreError> {
        self.store
            .list(clamp_limit(limit), clamp_offset(offset))
            .await
    }

    /// Merge the supplied fields into the stored record.
    ///
    /// Concurrent updates of the same id are not serialized: the last write
    /// observed by storage wins.
    pub async fn update(
        &self,
        raw_id: &str,
        input: &UpdateSubscription,
    ) -> Result<Subscription, CoreError> {
        let patch = parse_update(input).inspect_err(log_rejected)?;
        let existing = self.get(raw_id).await?;

        let merged = existing.merge(&patch, Utc::now());
        merged.check_interval().inspect_err(log_rejected)?;

        let updated = self
            .store
            .update(&merged)
            .await?
            .ok_or_else(|| CoreError::subscription_not_found(raw_id))?;

        tracing::info!(subscription_id = %updated.id, "Subscription updated");
        Ok(updated)
    }

    pub async fn delete(&self, raw_id: &str) -> Result<(), CoreError> {
        let id = parse_id(raw_id)?;
        if !self.store.delete(id).await? {
            return Err(CoreError::subscription_not_found(raw_id));
        }

        tracing::info!(subscription_id = %id, "Subscription deleted");
        Ok(())
    }

    /// Total cost of subscriptions active during the requested period.
    pub async fn total_cost(&self, request: &CostRequest<'_>) -> Result<CostSummary, CoreError> {
        let query = CostQuery::new(
            request.start_date,
            request.end_date,
            request.user_id,
            request.service_name,
        )
        .inspect_err(log_rejected)?;

        let summary = self
            .store
            .total_cost(&query)
            .await
            .inspect_err(|err| {
                if matches!(err, CoreError::CostOverflow) {
                    tracing::warn!(
                        period_start = %query.period_start,
                        period_end = %query.period_end,
                        "Total cost overflowed",
                    );
                }
            })?;
        tracing::debug!(
            period_start = %query.period_start,
            period_end = %query.period_end,
            total_cost = summary.total_cost,
            count = summary.count,
            "Total cost computed",
        );
        Ok(summary)
    }
}

fn parse_id(raw_id: &str) -> Result<DbId, CoreError> {
    uuid::Uuid::parse_str(raw_id).map_err(|_| CoreError::subscription_not_found(raw_id))
}

fn log_rejected(err: &CoreError) {
    tracing::warn!(error = %err, "Subscription request rejected");
}
