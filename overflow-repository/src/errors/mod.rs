//! Error types for the overflow repository.
//! Consolidates and re-exports error types related to repository operations.
mod repository;

pub use repository::RepositoryError;
