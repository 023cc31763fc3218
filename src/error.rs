//! Error types shared by the store, the interest ledger and the HTTP layer

use std::convert::Infallible;

/// Field level validation failures. Always surfaced as [`MarketError::InvalidInput`].
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),
    #[error("{0} must not be blank")]
    Blank(&'static str),
    #[error("'pending' is not a decision, expected 'accepted' or 'rejected'")]
    PendingDecision,
    #[error("malformed request: {0}")]
    Malformed(String),
}

#[derive(thiserror::Error, Debug)]
pub enum MarketError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValidationError),
    #[error("caller identity is required")]
    Unauthenticated,
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("storage error: {0}")]
    Storage(#[from] sled::Error),
    #[error("failed to encode document: {0}")]
    Encode(#[from] minicbor::encode::Error<Infallible>),
    #[error("failed to decode document: {0}")]
    Decode(#[from] minicbor::decode::Error),
    #[error("failed to generate identifier: {0}")]
    Identifier(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("internal error: {0}")]
    Internal(String),
}

/// Coarse classification handed to callers so they can render a message
/// without inspecting error internals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    Unauthenticated,
    Forbidden,
    Conflict,
    InvalidState,
    NotFound,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::Unauthenticated => "unauthenticated",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::Conflict => "conflict",
            ErrorKind::InvalidState => "invalid_state",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Internal => "internal",
        }
    }
}

impl MarketError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MarketError::InvalidInput(_) => ErrorKind::InvalidInput,
            MarketError::Unauthenticated => ErrorKind::Unauthenticated,
            MarketError::Forbidden(_) => ErrorKind::Forbidden,
            MarketError::Conflict(_) => ErrorKind::Conflict,
            MarketError::InvalidState(_) => ErrorKind::InvalidState,
            MarketError::NotFound(_) => ErrorKind::NotFound,
            MarketError::Storage(_)
            | MarketError::Encode(_)
            | MarketError::Decode(_)
            | MarketError::Identifier(_)
            | MarketError::Config(_)
            | MarketError::Internal(_) => ErrorKind::Internal,
        }
    }
}

pub type Result<T, E = MarketError> = std::result::Result<T, E>;
