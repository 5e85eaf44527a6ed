use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::{error, info, warn};

use gardepost_core::types::{OperatorContext, Pharmacy};
use gardepost_duty::{CoveragePolicy, DutyWindow};
use gardepost_render::RenderError;
use gardepost_store::{MessageStore, PharmacyStore, PostStore};

use crate::collaborators::{Geocoder, Platform, Rasterizer, ReportSource};
use crate::error::{PublishError, Result};
use crate::schedule::{next_occurrence, pinned_start};
use crate::types::{BatchReport, EntityOutcome, Outcome};

/// Per-entity pipeline result before it is flattened into an [`Outcome`].
enum EntityResult {
    Scheduled { post_id: String, fb_post_id: String },
    Skipped(&'static str),
}

/// Drives one generation run across every registered pharmacy.
///
/// The orchestrator is the only writer of new posts; afterwards the
/// lifecycle controller owns their state. It is also the only place
/// allowed to backfill a pharmacy's coordinates.
pub struct Orchestrator {
    pharmacies: Arc<PharmacyStore>,
    posts: Arc<PostStore>,
    messages: Arc<MessageStore>,
    geocoder: Box<dyn Geocoder>,
    reports: Box<dyn ReportSource>,
    rasterizer: Box<dyn Rasterizer>,
    platform: Arc<dyn Platform>,
}

impl Orchestrator {
    pub fn new(
        pharmacies: Arc<PharmacyStore>,
        posts: Arc<PostStore>,
        messages: Arc<MessageStore>,
        geocoder: Box<dyn Geocoder>,
        reports: Box<dyn ReportSource>,
        rasterizer: Box<dyn Rasterizer>,
        platform: Arc<dyn Platform>,
    ) -> Self {
        Self {
            pharmacies,
            posts,
            messages,
            geocoder,
            reports,
            rasterizer,
            platform,
        }
    }

    /// Run the batch for every pharmacy, strictly sequentially.
    ///
    /// Fails wholesale only when the shared post message is missing or no
    /// pharmacies exist; any per-pharmacy failure becomes a `Failed`
    /// outcome and the batch moves on.
    pub async fn generate(
        &self,
        start_date: NaiveDate,
        now: DateTime<Utc>,
        ctx: &OperatorContext,
    ) -> Result<BatchReport> {
        let message = self.messages.get()?.ok_or(PublishError::MissingMessage)?;
        let pharmacies = self.pharmacies.list()?;
        if pharmacies.is_empty() {
            return Err(PublishError::NoPharmacies);
        }

        info!(operator = %ctx, count = pharmacies.len(), %start_date, "generation run started");

        let mut outcomes = Vec::with_capacity(pharmacies.len());
        for pharmacy in pharmacies {
            let name = pharmacy.name.clone();
            let outcome = match self.process(&pharmacy, &message, start_date, now).await {
                Ok(EntityResult::Scheduled {
                    post_id,
                    fb_post_id,
                }) => {
                    info!(pharmacy = %name, %post_id, "post scheduled");
                    Outcome::Scheduled {
                        post_id,
                        fb_post_id,
                    }
                }
                Ok(EntityResult::Skipped(reason)) => {
                    info!(pharmacy = %name, reason, "pharmacy skipped");
                    Outcome::Skipped {
                        reason: reason.to_string(),
                    }
                }
                Err(e) => {
                    error!(pharmacy = %name, code = e.code(), "pharmacy failed: {e}");
                    Outcome::Failed {
                        code: e.code(),
                        message: e.to_string(),
                    }
                }
            };
            outcomes.push(EntityOutcome {
                pharmacy: name,
                outcome,
            });
        }

        Ok(BatchReport { outcomes })
    }

    /// The per-pharmacy pipeline:
    /// validate → resolve-date → guard-check → geocode-if-needed →
    /// fetch-report → rasterize → upload → schedule remotely → persist.
    async fn process(
        &self,
        pharmacy: &Pharmacy,
        message: &str,
        start_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<EntityResult> {
        let page_id = pharmacy
            .facebook_page_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| PublishError::Validation("missing Facebook page id".into()))?;

        let start = pinned_start(start_date);
        let slot = next_occurrence(start, pharmacy.posting_day, now);

        if self
            .posts
            .find_active_for_date(&pharmacy.id, slot.date_naive())?
            .is_some()
        {
            return Ok(EntityResult::Skipped("already scheduled for this date"));
        }

        let window_end =
            start + Duration::days(pharmacy.posting_frequency.max_advance_days());
        if slot > window_end {
            return Ok(EntityResult::Skipped("next slot beyond allowed range"));
        }

        let anchor = match pharmacy.anchor() {
            Some(anchor) => anchor,
            None => {
                let point = self.geocoder.lookup(&pharmacy.address).await?;
                // Backfill so the pharmacy is never geocoded again; a write
                // failure here only costs a repeat lookup next run.
                if let Err(e) = self.pharmacies.set_coordinates(&pharmacy.id, point) {
                    warn!(pharmacy = %pharmacy.name, "coordinate backfill failed: {e}");
                }
                point
            }
        };

        let window = DutyWindow::new(start, window_end);
        let policy = CoveragePolicy::from(pharmacy.api_mode);
        let report = self
            .reports
            .fetch_report(
                pharmacy.radius_km,
                anchor,
                &pharmacy.address,
                &window,
                policy,
                &pharmacy.duty_api_token,
            )
            .await?;

        let pages = self.rasterizer.rasterize(&report).await?;
        let image = pages
            .first()
            .ok_or(PublishError::Render(RenderError::NoPages))?;

        let media_id = self
            .platform
            .upload_photo(&pharmacy.page_access_token, page_id, image)
            .await?;
        let fb_post_id = self
            .platform
            .create_post(
                &pharmacy.page_access_token,
                page_id,
                message,
                &media_id,
                Some(slot.timestamp()),
            )
            .await?;

        let post = self.posts.create(
            &pharmacy.id,
            &image.to_string_lossy(),
            slot,
            Some(&fb_post_id),
        )?;

        Ok(EntityResult::Scheduled {
            post_id: post.id,
            fb_post_id,
        })
    }
}
