//! Domain logic for the subscription tracking service.
//!
//! Everything here is free of transport and database concerns: the
//! month-year date model, the subscription entity and its merge rule,
//! input validation, the period-overlap cost engine, and the
//! [`store::SubscriptionStore`] boundary that storage backends implement.

pub mod cost;
pub mod error;
pub mod month_year;
pub mod pagination;
pub mod service;
pub mod store;
pub mod subscription;
pub mod types;
pub mod validation;
