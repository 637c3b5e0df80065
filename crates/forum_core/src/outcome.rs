//! Three-way result type returned by every query service operation.
//!
//! # Responsibility
//! - Separate recoverable precondition failures from store breakage.
//! - Let callers branch exhaustively instead of catching errors.
//!
//! # Invariants
//! - `Failure` messages are safe to show to end users.
//! - `Fatal` messages are diagnostic and have already been logged by core.

use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Outcome of one query service operation.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Outcome<T> {
    /// Operation completed. The value may be an empty collection.
    Success(T),
    /// A stated precondition was not met; the caller should react.
    Failure(String),
    /// The store misbehaved; not meaningfully recoverable by the caller.
    Fatal(String),
}

impl<T> Outcome<T> {
    pub fn success(value: T) -> Self {
        Self::Success(value)
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(message.into())
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        Self::Fatal(message.into())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }

    /// Returns the success value, discarding any message.
    pub fn value(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) | Self::Fatal(_) => None,
        }
    }

    /// Returns the failure or fatal message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure(message) | Self::Fatal(message) => Some(message.as_str()),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Success(value) => Outcome::Success(f(value)),
            Self::Failure(message) => Outcome::Failure(message),
            Self::Fatal(message) => Outcome::Fatal(message),
        }
    }

    /// Chains a dependent operation; failures short-circuit unchanged.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Outcome<U>) -> Outcome<U> {
        match self {
            Self::Success(value) => f(value),
            Self::Failure(message) => Outcome::Failure(message),
            Self::Fatal(message) => Outcome::Fatal(message),
        }
    }

    /// Converts into a `Result` so callers can propagate with `?`.
    pub fn into_result(self) -> Result<T, OutcomeError> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(message) => Err(OutcomeError::Failure(message)),
            Self::Fatal(message) => Err(OutcomeError::Fatal(message)),
        }
    }
}

/// Non-success outcome as an `Error` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeError {
    Failure(String),
    Fatal(String),
}

impl OutcomeError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }
}

impl Display for OutcomeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Failure(message) => write!(f, "{message}"),
            Self::Fatal(message) => write!(f, "internal error: {message}"),
        }
    }
}

impl Error for OutcomeError {}

impl<T> From<OutcomeError> for Outcome<T> {
    fn from(value: OutcomeError) -> Self {
        match value {
            OutcomeError::Failure(message) => Self::Failure(message),
            OutcomeError::Fatal(message) => Self::Fatal(message),
        }
    }
}
