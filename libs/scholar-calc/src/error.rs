//! Error types for scholar-calc

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error tag produced by the evaluator and the function library
///
/// The `Display` text is the message shown on the calculator display while
/// the engine is in the error state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    #[error("Division by zero")]
    DivisionByZero,

    #[error("Math Error")]
    MathDomainError,

    #[error("Error")]
    Overflow,

    /// Input rejected by the display length cap. Never becomes an error state.
    #[error("Input too long")]
    InputTooLong,
}

impl ErrorKind {
    /// Fixed presentation text for this error
    pub fn message(self) -> &'static str {
        match self {
            Self::DivisionByZero => "Division by zero",
            Self::MathDomainError => "Math Error",
            Self::Overflow => "Error",
            Self::InputTooLong => "Input too long",
        }
    }

    /// Find the error whose presentation text is `text`
    pub fn from_message(text: &str) -> Option<Self> {
        [
            Self::DivisionByZero,
            Self::MathDomainError,
            Self::Overflow,
            Self::InputTooLong,
        ]
        .into_iter()
        .find(|kind| kind.message() == text)
    }
}

/// Errors raised at the library boundary (persistence, serialization, parsing)
///
/// Event handling never returns these; calculation failures are reported
/// through [`ErrorKind`] inside the output snapshot.
#[derive(Debug, Error)]
pub enum CalcError {
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CalcError {
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;
