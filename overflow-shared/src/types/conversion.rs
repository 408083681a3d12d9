use thiserror::Error;

/// Errors raised when decoding a stored discriminant back into a domain enum.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Invalid votable kind: {0}")]
    InvalidVotableKind(i16),
    #[error("Invalid vote direction: {0}")]
    InvalidDirection(i16),
    #[error("Invalid moderation status: {0}")]
    InvalidModerationStatus(i16),
}
