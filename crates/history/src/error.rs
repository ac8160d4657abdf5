use plotweave_core::error::CoreError;

/// Error type for every history-engine entry point.
///
/// Wraps [`CoreError`] for the expected domain outcomes (not-found,
/// version conflict, paused plot) and `sqlx::Error` for storage failures.
/// Storage failures propagate up and abort the surrounding transaction;
/// no partial write is ever observable.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convenience type alias for history-engine return values.
pub type HistoryResult<T> = Result<T, HistoryError>;

impl HistoryError {
    pub fn not_found(entity: &'static str, key: impl std::fmt::Display) -> Self {
        Self::Core(CoreError::not_found(entity, key))
    }
}
