//! # API Shared
//!
//! Shared request and response types for PETS APIs.
//!
//! Contains:
//! - JSON request/response types with OpenAPI schemas (`dto` module)
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` and the `pets-run` binary.

pub mod dto;
pub mod health;

pub use dto::*;
pub use health::HealthService;
