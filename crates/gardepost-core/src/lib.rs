//! `gardepost-core` — shared domain types, configuration and base errors.
//!
//! Everything in here is plain data: no I/O, no database handles. The other
//! crates (store, duty feed, Facebook client, scheduler) all depend on this
//! one and nothing else in the workspace.

pub mod config;
pub mod error;
pub mod types;

pub use config::GardepostConfig;
pub use error::{CoreError, Result};
pub use types::{
    ApiMode, DisplayStatus, GeoPoint, OperatorContext, Pharmacy, Post, PostStatus,
    PostingFrequency,
};
