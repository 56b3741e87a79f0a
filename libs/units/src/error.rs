use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("unknown unit label '{0}'")]
    UnknownLabel(String),

    #[error("'{0}' is not a valid unit label")]
    InvalidLabel(String),

    #[error("incompatible units: '{from}' vs '{to}'")]
    Incompatible { from: String, to: String },

    #[error("no {dialect} label for unit {unit}")]
    Unmapped { unit: String, dialect: String },

    #[error("unknown unit dialect '{0}'")]
    UnknownDialect(String),
}
