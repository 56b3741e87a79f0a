//! Error types for WKT parsing and formatting

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// WKT parse, construction and formatting errors
///
/// Parse errors carry the character offset of the offending fragment.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Lexical error at offset {position}: {message}")]
    Lexical { message: String, position: usize },

    #[error("Expected {expected}, found '{found}' at offset {position}")]
    UnexpectedToken {
        expected: String,
        found: String,
        position: usize,
    },

    #[error("Unknown keyword '{keyword}' at offset {position}")]
    UnknownKeyword { keyword: String, position: usize },

    #[error("Unknown projection method '{0}'")]
    UnknownProjectionMethod(String),

    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameterValue { name: String, reason: String },

    #[error("Unknown unit label '{label}' at offset {position}")]
    UnknownUnitLabel { label: String, position: usize },

    #[error("Invalid object: {0}")]
    InvalidObject(String),

    #[error("Cannot format: {0}")]
    Format(String),

    #[error(transparent)]
    Units(#[from] meridian_units::Error),
}

impl Error {
    pub(crate) fn unexpected(
        expected: impl Into<String>,
        found: impl Into<String>,
        position: usize,
    ) -> Self {
        Error::UnexpectedToken {
            expected: expected.into(),
            found: found.into(),
            position,
        }
    }

    pub(crate) fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidParameterValue {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Character offset of the offending fragment, when the error came from the text.
    pub fn position(&self) -> Option<usize> {
        match self {
            Error::Lexical { position, .. }
            | Error::UnexpectedToken { position, .. }
            | Error::UnknownKeyword { position, .. }
            | Error::UnknownUnitLabel { position, .. } => Some(*position),
            _ => None,
        }
    }
}
