use shopdeck_core::DomainError;

/// Errors surfaced to the admin page. Nothing is retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// Rejected input, locally or by the gateway (HTTP 400).
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("product not found")]
    NotFound,

    /// The gateway could not persist the change (HTTP 5xx).
    #[error("storage failure: {0}")]
    Storage(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("failed to parse response: {0}")]
    Parse(String),

    /// Any other non-success status.
    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("no draft is open")]
    NoOpenDraft,
}

impl From<DomainError> for ClientError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::NotFound => Self::NotFound,
            DomainError::Validation(msg)
            | DomainError::InvalidId(msg)
            | DomainError::InvariantViolation(msg) => Self::Validation(msg),
        }
    }
}
