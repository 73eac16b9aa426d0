//! Handlers for the `/subscriptions` resource.
//!
//! Handlers only translate between HTTP and [`SubscriptionService`]; every
//! rule (validation, identity, pagination clamping, cost aggregation) lives
//! in `subtrack_core`.
//!
//! [`SubscriptionService`]: subtrack_core::service::SubscriptionService

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use subtrack_core::pagination::parse_param;
use subtrack_core::service::CostRequest;
use subtrack_core::subscription::{CreateSubscription, UpdateSubscription};

use crate::error::{AppError, AppResult};
use crate::query::{PaginationParams, TotalCostParams};
use crate::state::AppState;

/// Unwrap a JSON body, reporting malformed payloads in the API error shape.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload.map(|Json(input)| input).map_err(|rejection| {
        AppError::BadRequest(format!("invalid request body: {}", rejection.body_text()))
    })
}

/// POST /api/v1/subscriptions
pub async fn create_subscription(
    State(state): State<AppState>,
    payload: Result<Json<CreateSubscription>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let input = json_body(payload)?;
    let created = state.subscriptions.create(&input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/subscriptions
///
/// Newest first. `limit` defaults to 15 and is capped at 99; unparseable
/// values fall back to the defaults.
pub async fn list_subscriptions(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let page = state
        .subscriptions
        .list(
            parse_param(params.limit.as_deref()),
            parse_param(params.offset.as_deref()),
        )
        .await?;
    Ok(Json(page))
}

/// GET /api/v1/subscriptions/{id}
pub async fn get_subscription(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let sub = state.subscriptions.get(&id).await?;
    Ok(Json(sub))
}

/// PUT /api/v1/subscriptions/{id}
///
/// Partial update: absent fields keep their stored values, and
/// `"end_date": null` (or `""`) clears the end date.
pub async fn update_subscription(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateSubscription>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let input = json_body(payload)?;
    let updated = state.subscriptions.update(&id, &input).await?;
    Ok(Json(updated))
}

/// DELETE /api/v1/subscriptions/{id}
pub async fn delete_subscription(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.subscriptions.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/subscriptions/total-cost?start_date=MM-YYYY&end_date=MM-YYYY
///
/// Optional `user_id` and `service_name` narrow the sum by exact match.
pub async fn total_cost(
    State(state): State<AppState>,
    Query(params): Query<TotalCostParams>,
) -> AppResult<impl IntoResponse> {
    let request = CostRequest {
        start_date: &params.start_date,
        end_date: &params.end_date,
        user_id: params.user_id.as_deref(),
        service_name: params.service_name.as_deref(),
    };
    let summary = state.subscriptions.total_cost(&request).await?;
    Ok(Json(summary))
}
