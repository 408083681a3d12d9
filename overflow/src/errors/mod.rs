//! Error types for the overflow server binary.
//! Covers configuration, store initialisation and serving failures.
use overflow_repository::RepositoryError;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("{0} must be set")]
    MissingEnv(&'static str),
    #[error("Invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Tracing error: {0}")]
    Tracing(String),
}
