use thiserror::Error;

use gardepost_core::types::PostStatus;
use gardepost_duty::DutyError;

/// Everything the publication pipeline can fail at.
///
/// Per-entity errors are caught at the orchestrator boundary and recorded
/// as outcomes; lifecycle errors surface directly to the caller of that
/// single operation.
#[derive(Debug, Error)]
pub enum PublishError {
    /// A required field is missing on the entity (e.g. no Facebook page id).
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Geocoding failed: {0}")]
    Geocoding(#[from] gardepost_geocode::GeocodeError),

    /// Duty feed failure, including coverage exhaustion.
    #[error(transparent)]
    Duty(#[from] DutyError),

    #[error("Rasterization failed: {0}")]
    Render(#[from] gardepost_render::RenderError),

    /// The remote platform rejected an upload, create or delete; carries
    /// the platform's own message verbatim.
    #[error("Remote platform error: {0}")]
    Remote(#[from] gardepost_facebook::FacebookError),

    /// Store write failure. Completed remote side effects are not rolled
    /// back — the remote post may already exist.
    #[error("Persistence error: {0}")]
    Persistence(#[from] gardepost_store::StoreError),

    #[error("Post not found: {id}")]
    PostNotFound { id: String },

    #[error("Pharmacy not found: {id}")]
    PharmacyNotFound { id: String },

    /// A lifecycle transition from a terminal state was attempted.
    #[error("Post is {from}; only scheduled posts can be {action}")]
    InvalidState {
        from: PostStatus,
        action: &'static str,
    },

    #[error("No post message configured")]
    MissingMessage,

    #[error("No pharmacies registered")]
    NoPharmacies,

    #[error("Image not found: {path}")]
    MissingImage { path: String },
}

impl PublishError {
    /// Short machine-checkable cause, recorded alongside the human-readable
    /// message in batch outcomes.
    pub fn code(&self) -> &'static str {
        match self {
            PublishError::Validation(_) => "VALIDATION_ERROR",
            PublishError::Geocoding(_) => "GEOCODING_ERROR",
            PublishError::Duty(DutyError::CoverageExhausted { .. }) => "COVERAGE_EXHAUSTED",
            PublishError::Duty(_) => "DUTY_FEED_ERROR",
            PublishError::Render(_) => "RENDER_ERROR",
            PublishError::Remote(_) => "REMOTE_INTEGRATION_ERROR",
            PublishError::Persistence(_) => "PERSISTENCE_ERROR",
            PublishError::PostNotFound { .. } | PublishError::PharmacyNotFound { .. } => {
                "NOT_FOUND"
            }
            PublishError::InvalidState { .. } => "INVALID_STATE",
            PublishError::MissingMessage => "MISSING_MESSAGE",
            PublishError::NoPharmacies => "NO_PHARMACIES",
            PublishError::MissingImage { .. } => "MISSING_IMAGE",
        }
    }
}

pub type Result<T> = std::result::Result<T, PublishError>;
