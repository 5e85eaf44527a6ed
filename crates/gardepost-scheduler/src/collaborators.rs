//! Trait seams for the external collaborators the pipeline drives.
//!
//! The concrete clients live in their own crates; the impls here adapt them
//! so the orchestrator and lifecycle controller only ever hold trait
//! objects. Tests substitute doubles.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use gardepost_core::types::GeoPoint;
use gardepost_duty::{CoveragePolicy, DutyError, DutyWindow, RadiusResolver};
use gardepost_facebook::{FacebookClient, FacebookError};
use gardepost_geocode::{GeocodeClient, GeocodeError};
use gardepost_render::{PdfConverter, RenderError};

/// Resolves a free-text address into coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn lookup(&self, address: &str) -> Result<GeoPoint, GeocodeError>;
}

#[async_trait]
impl Geocoder for GeocodeClient {
    async fn lookup(&self, address: &str) -> Result<GeoPoint, GeocodeError> {
        GeocodeClient::lookup(self, address).await
    }
}

/// Produces a roster report PDF for a window, or fails when no radius up to
/// the ceiling yields complete coverage.
#[async_trait]
pub trait ReportSource: Send + Sync {
    #[allow(clippy::too_many_arguments)]
    async fn fetch_report(
        &self,
        initial_radius: u32,
        anchor: GeoPoint,
        address: &str,
        window: &DutyWindow,
        policy: CoveragePolicy,
        bearer: &str,
    ) -> Result<PathBuf, DutyError>;
}

#[async_trait]
impl ReportSource for RadiusResolver {
    async fn fetch_report(
        &self,
        initial_radius: u32,
        anchor: GeoPoint,
        address: &str,
        window: &DutyWindow,
        policy: CoveragePolicy,
        bearer: &str,
    ) -> Result<PathBuf, DutyError> {
        self.resolve(initial_radius, anchor, address, window, policy, bearer)
            .await
    }
}

/// Turns a report PDF into page images.
#[async_trait]
pub trait Rasterizer: Send + Sync {
    async fn rasterize(&self, pdf: &Path) -> Result<Vec<PathBuf>, RenderError>;
}

#[async_trait]
impl Rasterizer for PdfConverter {
    async fn rasterize(&self, pdf: &Path) -> Result<Vec<PathBuf>, RenderError> {
        self.convert(pdf).await
    }
}

/// The remote social platform: photo upload, post creation, post deletion.
#[async_trait]
pub trait Platform: Send + Sync {
    async fn upload_photo(
        &self,
        page_access_token: &str,
        page_id: &str,
        image: &Path,
    ) -> Result<String, FacebookError>;

    async fn create_post(
        &self,
        page_access_token: &str,
        page_id: &str,
        message: &str,
        media_id: &str,
        scheduled_publish_time: Option<i64>,
    ) -> Result<String, FacebookError>;

    async fn delete_post(
        &self,
        fb_post_id: &str,
        page_access_token: &str,
    ) -> Result<(), FacebookError>;
}

#[async_trait]
impl Platform for FacebookClient {
    async fn upload_photo(
        &self,
        page_access_token: &str,
        page_id: &str,
        image: &Path,
    ) -> Result<String, FacebookError> {
        FacebookClient::upload_photo(self, page_access_token, page_id, image).await
    }

    async fn create_post(
        &self,
        page_access_token: &str,
        page_id: &str,
        message: &str,
        media_id: &str,
        scheduled_publish_time: Option<i64>,
    ) -> Result<String, FacebookError> {
        FacebookClient::create_post(
            self,
            page_access_token,
            page_id,
            message,
            media_id,
            scheduled_publish_time,
        )
        .await
    }

    async fn delete_post(
        &self,
        fb_post_id: &str,
        page_access_token: &str,
    ) -> Result<(), FacebookError> {
        FacebookClient::delete_post(self, fb_post_id, page_access_token).await
    }
}
