/// Boxed source error carried by [`CoreError::Storage`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A cost query bound is not a strict `MM-YYYY` value.
    #[error("Invalid date format: {0}")]
    InvalidDateFormat(String),

    /// The summed price of a cost query does not fit in an `i64`.
    #[error("Total cost exceeds the representable range")]
    CostOverflow,

    #[error("Storage failure: {0}")]
    Storage(#[source] BoxError),
}

impl CoreError {
    /// Wrap any backend error as an opaque storage failure.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        CoreError::Storage(Box::new(err))
    }

    /// Shorthand for a missing subscription.
    pub fn subscription_not_found(id: impl ToString) -> Self {
        CoreError::NotFound {
            entity: "Subscription",
            id: id.to_string(),
        }
    }
}
