//! # Overflow Repository
//! This crate provides traits and implementations for persisting votable
//! content, users, sessions and the per-user vote relation. It includes
//! definitions for errors, interfaces, a PostgreSQL implementation and an
//! in-memory implementation.
pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod postgres;

pub use errors::RepositoryError;
pub use interfaces::{
    CommitOutcome, ContentRepository, SessionRepository, UserRepository, VoteTarget,
};
pub use memory::{InMemoryStore, InMemoryVoteTarget};
pub use postgres::{
    PostgresContentRepository, PostgresSessionRepository, PostgresUserRepository,
    PostgresVoteTarget, run_migrations,
};
