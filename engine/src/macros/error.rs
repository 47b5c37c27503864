//! Macro error types
//!
//! Every failure here is a validation problem in the SQL template. None of
//! them are retryable.

use thiserror::Error;

/// Errors that can occur while expanding a macro.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MacroError {
    /// The macro was called with fewer arguments than it needs.
    #[error("macro {name} needs {expected}")]
    MissingArgument {
        /// The macro name.
        name: String,
        /// Description of the required arguments.
        expected: &'static str,
    },

    /// The interval argument is not a usable duration.
    #[error("error parsing interval {0}")]
    InvalidDuration(String),

    /// The fill value argument is not a number.
    #[error("error parsing fill value {0}")]
    InvalidNumericLiteral(String),

    /// No handler is registered under this name.
    #[error("unknown macro {0}")]
    UnknownMacro(String),
}

impl MacroError {
    /// Returns a stable snake_case identifier for the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MissingArgument { .. } => "missing_argument",
            Self::InvalidDuration(_) => "invalid_duration",
            Self::InvalidNumericLiteral(_) => "invalid_numeric_literal",
            Self::UnknownMacro(_) => "unknown_macro",
        }
    }
}

/// Result type for macro evaluation
pub type MacroResult<T> = Result<T, MacroError>;
