use thiserror::Error;

use gardepost_core::config::MAX_RADIUS_KM;

/// Errors that can occur while resolving a duty-roster report.
#[derive(Debug, Error)]
pub enum DutyError {
    #[error("Duty feed request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Duty feed API error {status}: {body}")]
    Api { status: u16, body: String },

    /// No radius up to the ceiling produced complete coverage; no report
    /// was fetched.
    #[error("No sufficient radius up to {max_radius_km} km")]
    CoverageExhausted { max_radius_km: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DutyError {
    pub(crate) fn exhausted() -> Self {
        DutyError::CoverageExhausted {
            max_radius_km: MAX_RADIUS_KM,
        }
    }
}

pub type Result<T> = std::result::Result<T, DutyError>;
