pub mod health;
pub mod subscriptions;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /subscriptions                     list, create
/// /subscriptions/total-cost          aggregate cost over a month range
/// /subscriptions/{id}                get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/subscriptions", subscriptions::router())
}
