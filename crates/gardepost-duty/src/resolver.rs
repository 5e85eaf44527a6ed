use std::path::PathBuf;

use tracing::{debug, info};

use gardepost_core::config::MAX_RADIUS_KM;
use gardepost_core::types::GeoPoint;

use crate::client::DutyFeed;
use crate::coverage::{is_covered, CoveragePolicy};
use crate::error::{DutyError, Result};
use crate::types::{Duty, DutyWindow};

/// Find the smallest radius, starting at `initial_radius` and widening by
/// 1 km per step, at which `duties` fully cover `window` under `policy`.
///
/// Purely local: the dataset is fetched once by the caller and re-filtered
/// per step. Coverage being monotonic in the radius makes the first success
/// the minimal sufficient radius.
pub fn find_sufficient_radius(
    duties: &[Duty],
    anchor: GeoPoint,
    initial_radius: u32,
    window: &DutyWindow,
    policy: CoveragePolicy,
) -> Result<u32> {
    let mut radius = initial_radius;
    while radius <= MAX_RADIUS_KM {
        if is_covered(duties, anchor, radius, window, policy) {
            return Ok(radius);
        }
        debug!(radius, "coverage incomplete, widening");
        radius += 1;
    }
    Err(DutyError::exhausted())
}

/// Coverage-driven report resolver.
///
/// One duty-dataset fetch, a local radius search, then one report fetch at
/// the minimal sufficient radius. On exhaustion no report is fetched.
pub struct RadiusResolver {
    feed: Box<dyn DutyFeed>,
}

impl RadiusResolver {
    pub fn new(feed: Box<dyn DutyFeed>) -> Self {
        Self { feed }
    }

    pub async fn resolve(
        &self,
        initial_radius: u32,
        anchor: GeoPoint,
        address: &str,
        window: &DutyWindow,
        policy: CoveragePolicy,
        bearer: &str,
    ) -> Result<PathBuf> {
        let duties = self.feed.fetch_duties(window, bearer).await?;
        let radius = find_sufficient_radius(&duties, anchor, initial_radius, window, policy)?;
        info!(radius, "sufficient radius found");
        self.feed
            .fetch_report(radius, anchor, address, window, bearer)
            .await
    }
}
