//! Repository for the `subscriptions` table.

use sqlx::PgPool;
use subtrack_core::cost::CostQuery;
use subtrack_core::subscription::Subscription;
use subtrack_core::types::DbId;

use crate::models::subscription::SubscriptionRow;

/// Column list for `subscriptions` queries.
const COLUMNS: &str = "\
    id, service_name, price, user_id, start_date, end_date, \
    created_at, updated_at";

/// Provides data access for subscriptions.
pub struct SubscriptionRepo;

impl SubscriptionRepo {
    /// Insert a fully-formed record, returning the stored row.
    pub async fn create(pool: &PgPool, sub: &Subscription) -> Result<SubscriptionRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO subscriptions \
                 (id, service_name, price, user_id, start_date, end_date, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SubscriptionRow>(&query)
            .bind(sub.id)
            .bind(&sub.service_name)
            .bind(sub.price)
            .bind(sub.user_id)
            .bind(sub.start_date.first_day())
            .bind(sub.end_date.map(|d| d.first_day()))
            .bind(sub.created_at)
            .bind(sub.updated_at)
            .fetch_one(pool)
            .await
    }

    /// Find a subscription by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<SubscriptionRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM subscriptions WHERE id = $1");
        sqlx::query_as::<_, SubscriptionRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List subscriptions, newest first.
    pub async fn list(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SubscriptionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM subscriptions \
             ORDER BY created_at DESC, id \
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, SubscriptionRow>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Total number of stored subscriptions.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM subscriptions")
            .fetch_one(pool)
            .await
    }

    /// Overwrite every mutable column of an existing row.
    ///
    /// The caller has already merged the partial update, so no `COALESCE`
    /// is needed here. Returns `None` if the row does not exist.
    pub async fn update(pool: &PgPool, sub: &Subscription) -> Result<Option<SubscriptionRow>, sqlx::Error> {
        let query = format!(
            "UPDATE subscriptions SET \
                 service_name = $2, \
                 price = $3, \
                 user_id = $4, \
                 start_date = $5, \
                 end_date = $6, \
                 updated_at = $7 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SubscriptionRow>(&query)
            .bind(sub.id)
            .bind(&sub.service_name)
            .bind(sub.price)
            .bind(sub.user_id)
            .bind(sub.start_date.first_day())
            .bind(sub.end_date.map(|d| d.first_day()))
            .bind(sub.updated_at)
            .fetch_optional(pool)
            .await
    }

    /// Delete a subscription by ID.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM subscriptions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Sum and count subscriptions active during the query window.
    ///
    /// Evaluates the overlap predicate in SQL: the subscription starts on or
    /// before the window end, and is open-ended or ends on or after the
    /// window start. The user filter compares the canonical text form of the
    /// UUID so it behaves as an exact string match.
    pub async fn total_cost(pool: &PgPool, query: &CostQuery) -> Result<(i64, i64), sqlx::Error> {
        sqlx::query_as::<_, (i64, i64)>(
            "SELECT COALESCE(SUM(price), 0)::BIGINT, COUNT(*) \
             FROM subscriptions \
             WHERE start_date <= $1 \
               AND (end_date IS NULL OR end_date >= $2) \
               AND ($3::TEXT IS NULL OR user_id::TEXT = $3) \
               AND ($4::TEXT IS NULL OR service_name = $4)",
        )
        .bind(query.period_end.first_day())
        .bind(query.period_start.first_day())
        .bind(query.user_id.as_deref())
        .bind(query.service_name.as_deref())
        .fetch_one(pool)
        .await
    }
}
