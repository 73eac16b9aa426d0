use std::sync::Arc;

use subtrack_core::service::SubscriptionService;
use subtrack_core::store::SubscriptionStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (the store sits behind an `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Subscription use cases over the configured store.
    pub subscriptions: SubscriptionService,
}

impl AppState {
    pub fn new(store: Arc<dyn SubscriptionStore>) -> Self {
        Self {
            subscriptions: SubscriptionService::new(store),
        }
    }
}
