use thiserror::Error;

/// Parse failures for the string tokens a provider or config file may use.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardInputError {
    #[error("unknown field identifier `{0}`")]
    UnknownField(String),
    #[error("unknown field status `{0}` (expected valid, invalid or incomplete)")]
    UnknownStatus(String),
    #[error("invalid color token `{0}`")]
    InvalidColor(String),
}
