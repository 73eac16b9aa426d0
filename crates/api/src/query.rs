//! Query parameter types for API handlers.
//!
//! Fields are kept as raw strings so that malformed values reach the
//! domain rules (lenient pagination, `INVALID_DATE_FORMAT` for cost bounds)
//! instead of being rejected by the extractor.

use serde::Deserialize;

/// Pagination parameters (`?limit=&offset=`).
///
/// Unparseable values count as absent and are clamped in the service layer.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// Parameters of `GET /subscriptions/total-cost`.
#[derive(Debug, Default, Deserialize)]
pub struct TotalCostParams {
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    pub user_id: Option<String>,
    pub service_name: Option<String>,
}
