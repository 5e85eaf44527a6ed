//! `gardepost-store` — SQLite persistence for pharmacies, posts and the
//! shared post message.
//!
//! One database file serves the whole workspace; every store wraps its own
//! `Mutex<Connection>` so callers can hold managers independently. Schema
//! migrations are idempotent and run from the binary at startup via
//! [`db::init_db`].

pub mod db;
pub mod error;
pub mod message;
pub mod pharmacies;
pub mod posts;

pub use error::{Result, StoreError};
pub use message::MessageStore;
pub use pharmacies::{PharmacyDraft, PharmacyStore};
pub use posts::{PostListing, PostStore};
