//! Row model for the `subscriptions` table.

use chrono::NaiveDate;
use sqlx::FromRow;
use subtrack_core::month_year::{MonthYear, MonthYearError};
use subtrack_core::subscription::Subscription;
use subtrack_core::types::{DbId, Timestamp};

/// A row from the `subscriptions` table.
///
/// Dates are stored as the first day of their month.
#[derive(Debug, Clone, FromRow)]
pub struct SubscriptionRow {
    pub id: DbId,
    pub service_name: String,
    pub price: i64,
    pub user_id: uuid::Uuid,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = MonthYearError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        Ok(Subscription {
            id: row.id,
            service_name: row.service_name,
            price: row.price,
            user_id: row.user_id,
            start_date: MonthYear::from_date(row.start_date)?,
            end_date: row.end_date.map(MonthYear::from_date).transpose()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
