use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    /// No live row matched the id, either because it never existed or
    /// because it was soft deleted.
    #[error("car not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
