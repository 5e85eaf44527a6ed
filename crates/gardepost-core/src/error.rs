use thiserror::Error;

/// Errors `gardepost-core` itself can produce.
///
/// The collaborator crates and the scheduler carry their own richer error
/// types; here only configuration loading can fail.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
