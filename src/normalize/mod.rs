//! Raw backend JSON to view models.
//!
//! The backend has renamed fields across versions. Each view-model field is
//! read through an ordered chain: canonical name, then known aliases, then a
//! default. Only aliases actually emitted by some backend version are listed.

pub mod fields;
pub mod import;
pub mod matches;
pub mod stats;
