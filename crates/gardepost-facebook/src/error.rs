use thiserror::Error;

/// Errors produced by the Facebook Graph client.
#[derive(Debug, Error)]
pub enum FacebookError {
    #[error("Facebook request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The platform rejected the call; `message` is its own wording.
    #[error("Facebook API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The call succeeded but the response carried no object id.
    #[error("Facebook response missing id")]
    MissingId,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FacebookError>;
