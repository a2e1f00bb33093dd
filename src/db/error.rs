use thiserror::Error;

/// Failures the persistence layer reports with a domain meaning. They travel
/// inside `anyhow::Error` and can be recovered with `downcast_ref`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Content {0} not found")]
    NotFound(String),
    #[error("Content {0} already exists.")]
    DuplicateId(String),
    #[error("Unknown difficulty '{0}'")]
    InvalidDifficulty(String),
    #[error("Title is required.")]
    EmptyTitle,
}
