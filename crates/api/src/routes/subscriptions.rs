//! Route definitions for subscriptions, mounted at `/subscriptions`.

use axum::routing::get;
use axum::Router;

use crate::handlers::subscriptions;
use crate::state::AppState;

/// ```text
/// GET    /              -> list_subscriptions
/// POST   /              -> create_subscription
/// GET    /total-cost    -> total_cost
/// GET    /{id}          -> get_subscription
/// PUT    /{id}          -> update_subscription
/// DELETE /{id}          -> delete_subscription
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(subscriptions::list_subscriptions).post(subscriptions::create_subscription),
        )
        .route("/total-cost", get(subscriptions::total_cost))
        .route(
            "/{id}",
            get(subscriptions::get_subscription)
                .put(subscriptions::update_subscription)
                .delete(subscriptions::delete_subscription),
        )
}
