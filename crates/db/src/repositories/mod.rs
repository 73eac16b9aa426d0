//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod subscription_repo;

pub use subscription_repo::SubscriptionRepo;
