//! The three-state vote model.
//!
//! `machine` decides which transition a request maps to given the recorded
//! state; `service` runs it against the `VoteTarget` registered for a kind.
pub mod machine;
mod service;

pub use machine::{StateMismatch, plan};
pub use service::VoteService;
