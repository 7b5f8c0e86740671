//! Application identifiers and sharded-path utilities.
//!
//! Every screening application is keyed by a UUID. PETS uses a *canonical*
//! representation for these identifiers: **32 lowercase hexadecimal characters**
//! (no hyphens). The same value is used in REST paths, in calls to the external
//! persistence API and to derive on-disk storage locations.
//!
//! ## Canonical form
//! - Length: 32
//! - Characters: `0-9` and `a-f` only
//! - Example: `550e8400e29b41d4a716446655440000`
//!
//! Externally supplied identifiers must already be canonical; use
//! [`ApplicationId::parse`] to validate them.
//!
//! ## Sharded directory layout
//! For a canonical id `u`, application files live under
//! `parent_dir/<u[0..2]>/<u[2..4]>/<u>/`, for example
//! `pets_data/applications/55/0e/550e8400e29b41d4a716446655440000/`.

mod service;

pub use service::{ApplicationId, Uuid};

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type UuidResult<T> = Result<T, UuidError>;
