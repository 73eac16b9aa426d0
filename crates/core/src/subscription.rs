//! Subscription entity, request DTOs, and the partial-update merge rule.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;
use crate::month_year::MonthYear;
use crate::types::{DbId, Timestamp};

/// Maximum length of a service name, in characters.
pub const MAX_SERVICE_NAME_LENGTH: usize = 255;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A persisted subscription record.
///
/// `end_date = None` means the subscription is open-ended (still active).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: DbId,
    pub service_name: String,
    pub price: i64,
    pub user_id: uuid::Uuid,
    pub start_date: MonthYear,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<MonthYear>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Subscription {
    /// Materialize a validated creation request with a fresh identity.
    pub fn create(new: NewSubscription, id: DbId, now: Timestamp) -> Self {
        Self {
            id,
            service_name: new.service_name,
            price: new.price,
            user_id: new.user_id,
            start_date: new.start_date,
            end_date: new.end_date,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update on top of this record.
    ///
    /// Supplied fields replace, absent fields are kept. `id` and
    /// `created_at` never change; `updated_at` is always set to `now`.
    pub fn merge(&self, patch: &SubscriptionPatch, now: Timestamp) -> Self {
        Self {
            id: self.id,
            service_name: patch
                .service_name
                .clone()
                .unwrap_or_else(|| self.service_name.clone()),
            price: patch.price.unwrap_or(self.price),
            user_id: patch.user_id.unwrap_or(self.user_id),
            start_date: patch.start_date.unwrap_or(self.start_date),
            end_date: match patch.end_date {
                Some(end_date) => end_date,
                None => self.end_date,
            },
            created_at: self.created_at,
            updated_at: now,
        }
    }

    /// Reject records whose end month precedes their start month.
    pub fn check_interval(&self) -> Result<(), CoreError> {
        match self.end_date {
            Some(end) if end < self.start_date => Err(CoreError::Validation(format!(
                "end_date ({end}) must not be before start_date ({})",
                self.start_date
            ))),
            _ => Ok(()),
        }
    }
}

/// One page of subscriptions plus the total row count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionPage {
    pub items: Vec<Subscription>,
    pub total: i64,
}

// ---------------------------------------------------------------------------
// Request DTOs (raw, unvalidated)
// ---------------------------------------------------------------------------

/// Body of a create request.
///
/// Every field defaults when missing so that absence is reported by the
/// validator as a field error instead of a decode failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateSubscription {
    pub service_name: String,
    pub price: i64,
    pub user_id: String,
    pub start_date: String,
    pub end_date: Option<String>,
}

/// Body of an update request. Only supplied fields are applied.
///
/// `end_date` distinguishes three states: key absent (keep), `null` or `""`
/// (clear), and a value (set).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSubscription {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<Option<String>>,
}

/// Maps a present key to `Some(..)` even when its value is `null`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ---------------------------------------------------------------------------
// Validated inputs
// ---------------------------------------------------------------------------

/// A create request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscription {
    pub service_name: String,
    pub price: i64,
    pub user_id: uuid::Uuid,
    pub start_date: MonthYear,
    pub end_date: Option<MonthYear>,
}

/// An update request that passed validation.
///
/// `end_date: Some(None)` clears the end date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionPatch {
    pub service_name: Option<String>,
    pub price: Option<i64>,
    pub user_id: Option<uuid::Uuid>,
    pub start_date: Option<MonthYear>,
    pub end_date: Option<Option<MonthYear>>,
}
