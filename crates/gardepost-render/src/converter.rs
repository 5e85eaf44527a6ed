use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{RenderError, Result};

// Rasterization parameters the roster layout was tuned for.
const DENSITY: &str = "200";
const RESIZE: &str = "800x1000";

/// Rasterizes PDFs into PNG pages via the external `convert` binary.
pub struct PdfConverter {
    png_dir: PathBuf,
}

impl PdfConverter {
    pub fn new(png_dir: impl Into<PathBuf>) -> Self {
        Self {
            png_dir: png_dir.into(),
        }
    }

    /// Convert every page of `pdf_path` into a PNG, returning the page
    /// paths in page order.
    pub async fn convert(&self, pdf_path: &Path) -> Result<Vec<PathBuf>> {
        tokio::fs::create_dir_all(&self.png_dir).await?;

        let stem = Uuid::new_v4().to_string();
        let pattern = self.png_dir.join(format!("{stem}-%d.png"));
        debug!(pdf = %pdf_path.display(), "rasterizing");

        let output = Command::new("convert")
            .arg("-density")
            .arg(DENSITY)
            .arg(pdf_path)
            .arg("-resize")
            .arg(RESIZE)
            .arg(&pattern)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            warn!(pdf = %pdf_path.display(), %stderr, "convert failed");
            return Err(RenderError::Convert { stderr });
        }

        let mut pages = self.collect_pages(&stem).await?;
        if pages.is_empty() {
            return Err(RenderError::NoPages);
        }
        // `%d` counts up from 0, so a lexical sort keeps page order for the
        // single-digit page counts roster reports produce.
        pages.sort();
        info!(pdf = %pdf_path.display(), pages = pages.len(), "rasterized");
        Ok(pages)
    }

    async fn collect_pages(&self, stem: &str) -> Result<Vec<PathBuf>> {
        let mut pages = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.png_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            if name.to_string_lossy().starts_with(stem) {
                pages.push(entry.path());
            }
        }
        Ok(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn collect_pages_only_matches_own_stem() {
        let dir = std::env::temp_dir().join(format!("gardepost-render-{}", Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(dir.join("aaaa-0.png"), b"x").await.unwrap();
        tokio::fs::write(dir.join("aaaa-1.png"), b"x").await.unwrap();
        tokio::fs::write(dir.join("bbbb-0.png"), b"x").await.unwrap();

        let converter = PdfConverter::new(&dir);
        let mut pages = converter.collect_pages("aaaa").await.unwrap();
        pages.sort();
        assert_eq!(pages.len(), 2);
        assert!(pages[0].to_string_lossy().ends_with("aaaa-0.png"));

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
