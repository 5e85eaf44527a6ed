//! `gardepost-render` — rasterize roster PDFs into page images.
//!
//! Thin wrapper around the ImageMagick `convert` binary. A report can
//! rasterize into several pages; downstream only posts the first one.

pub mod converter;
pub mod error;

pub use converter::PdfConverter;
pub use error::{RenderError, Result};
