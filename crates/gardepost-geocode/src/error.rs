use thiserror::Error;

/// Errors produced by the geocoding client.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("Geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Geocoding API error {status}: {body}")]
    Api { status: u16, body: String },

    /// The service answered but found nothing for the address.
    #[error("No geocoding result for address: {address}")]
    NoResult { address: String },
}

pub type Result<T> = std::result::Result<T, GeocodeError>;
