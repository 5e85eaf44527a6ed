//! `gardepost-facebook` — Facebook Graph API client for page posts.
//!
//! Three operations: upload an unpublished photo to a page, create a feed
//! post referencing it (immediately or at a scheduled publish time), and
//! delete a post. Remote error messages are surfaced verbatim so operators
//! see exactly what the platform rejected.

pub mod client;
pub mod error;

pub use client::FacebookClient;
pub use error::{FacebookError, Result};
