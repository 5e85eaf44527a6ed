//! `gardepost-duty` — duty-roster feed client, coverage evaluation and the
//! radius resolver.
//!
//! # Overview
//!
//! A roster report is only worth posting when the duty feed shows complete
//! on-call coverage for every day of the publication window. The resolver
//! fetches the window's full duty dataset once, then widens the search
//! radius kilometre by kilometre — filtering the cached dataset locally —
//! until the coverage policy is satisfied or the 35 km ceiling is hit. Only
//! then is the formatted PDF report fetched, at the minimal sufficient
//! radius.
//!
//! Coverage is monotonic in the radius: a duty within `r` km stays within
//! every larger radius, so the first satisfying radius is also the smallest.

pub mod client;
pub mod coverage;
pub mod error;
pub mod resolver;
pub mod types;

pub use client::{DutyFeed, DutyFeedClient};
pub use coverage::{haversine_km, is_covered, CoveragePolicy};
pub use error::{DutyError, Result};
pub use resolver::{find_sufficient_radius, RadiusResolver};
pub use types::{Duty, DutyShift, DutyWindow};
