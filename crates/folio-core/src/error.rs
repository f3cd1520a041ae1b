use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a POST to the form relay.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("relay request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("relay rejected the submission with status {0}")]
    Rejected(StatusCode),

    #[error("relay task ended before answering: {0}")]
    Interrupted(String),
}

/// Contact form submission refused before any request was made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactError {
    #[error("missing required field(s): {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),

    #[error("a submission is already being sent")]
    InFlight,
}
