//! # Overflow Shared
//! This crate defines the data structures shared across the overflow workspace.
//! It includes identifiers, votable kinds, vote states and intents, vote outcomes,
//! content records (questions, answers, comments) and user profiles.
pub mod types;
