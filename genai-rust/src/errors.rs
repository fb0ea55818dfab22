use thiserror::Error;

#[derive(Error, Debug)]
pub enum LanguageModelError {
    /// The request could not be built, e.g. an API key that is not a valid
    /// header value.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Sending the request or decoding the reply failed.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The provider answered with a non-success status. Holds the body.
    #[error("Status error: {1} (Status {0})")]
    StatusCode(reqwest::StatusCode, String),
    /// The reply was well-formed but not usable, e.g. Gemini returned no
    /// candidate.
    #[error("Invariant from {0}: {1}")]
    Invariant(&'static str, String),
    /// The provider declined to answer (blocked prompt or safety stop).
    #[error("Refusal: {0}")]
    Refusal(String),
}

pub type LanguageModelResult<T> = Result<T, LanguageModelError>;
