use thiserror::Error;

/// Errors produced by the PDF rasterizer.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Spawning `convert` or touching the output directory failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// `convert` exited non-zero.
    #[error("PDF conversion failed: {stderr}")]
    Convert { stderr: String },

    /// `convert` exited zero but produced no page images.
    #[error("No page images generated from PDF")]
    NoPages,
}

pub type Result<T> = std::result::Result<T, RenderError>;
