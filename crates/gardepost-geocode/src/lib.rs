//! `gardepost-geocode` — resolve a pharmacy's free-text address into
//! coordinates.
//!
//! Called at most once per pharmacy: the orchestrator caches the result back
//! onto the entity and never re-geocodes populated coordinates.

pub mod client;
pub mod error;

pub use client::GeocodeClient;
pub use error::{GeocodeError, Result};
