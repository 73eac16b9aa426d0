//! Row models mapped with `sqlx::FromRow`.

pub mod subscription;
