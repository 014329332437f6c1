/// Shared error type used across all tidechat crates.
///
/// Every failure is local and synchronous, raised before any state is
/// mutated.  `Validation` names the violated cross-field rule so callers
/// can surface it; `Conflict` is the only variant a caller should retry.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("validation [{rule}]: {message}")]
    Validation {
        rule: &'static str,
        message: String,
    },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("configuration: {0}")]
    Configuration(String),

    /// Lost a race on a parent's latest-child pointer.  Retry once.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// The name of the violated rule, for `Validation` errors.
    pub fn rule(&self) -> Option<&'static str> {
        match self {
            Self::Validation { rule, .. } => Some(rule),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
