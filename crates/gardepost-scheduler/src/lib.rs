//! `gardepost-scheduler` — the publication pipeline.
//!
//! # Overview
//!
//! Three pieces live here:
//!
//! - [`schedule`] — the pure date calculator: the next publication slot for
//!   a recurrence rule, never in the past, always at the 06:00 slot hour.
//! - [`orchestrator::Orchestrator`] — the batch generation run: per
//!   pharmacy, resolve the slot, guard against duplicates, geocode once if
//!   needed, resolve the roster report, rasterize, upload and schedule the
//!   post, then record it. One pharmacy's failure never stops the batch.
//! - [`lifecycle::LifecycleController`] — administrative transitions on
//!   recorded posts: force-publish, cancel (remote delete first), bulk
//!   delete and the read-time archived view.
//!
//! External collaborators enter through the traits in [`collaborators`], so
//! tests drive the whole pipeline with doubles.

pub mod collaborators;
pub mod error;
pub mod lifecycle;
pub mod orchestrator;
pub mod schedule;
pub mod types;

pub use collaborators::{Geocoder, Platform, Rasterizer, ReportSource};
pub use error::{PublishError, Result};
pub use lifecycle::LifecycleController;
pub use orchestrator::Orchestrator;
pub use types::{BatchReport, EntityOutcome, Outcome, PostView};
