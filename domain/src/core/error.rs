//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// These cover malformed input and state-machine misuse. Business-rule
/// rejections of ballots and delegations have their own dedicated enums.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid vote choice: {0} (expected for, against, abstain or no_opinion)")]
    InvalidChoice(String),

    #[error("Invalid presence mode: {0} (expected present, remote or proxy)")]
    InvalidPresence(String),

    #[error("Invalid convocation: {0} (expected 1 or 2)")]
    InvalidConvocation(u8),

    #[error("Invalid voting weight: {0}")]
    InvalidWeight(f64),

    #[error("Motion has already been opened")]
    MotionAlreadyOpened,

    #[error("Motion is not open")]
    MotionNotOpen,

    #[error("Motion records a close time without an open time")]
    ClosedWithoutOpened,

    #[error("Proxy ballot must name the proxy voter")]
    ProxyVoterMissing,
}
