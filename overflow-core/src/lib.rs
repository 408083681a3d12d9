//! # Overflow Core
//! This crate holds the domain logic of the overflow service: the vote state
//! machine shared by questions, answers and comments, the session issuer that
//! turns bearer tokens into user ids, and the moderation rules.
pub mod auth;
pub mod errors;
pub mod moderation;
pub mod votes;
