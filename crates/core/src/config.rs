//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into services, so
//! request handling never reads process-wide environment variables.

use crate::constants::{APPLICATIONS_DIR_NAME, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::{PetsError, PetsResult};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: Option<PathBuf>,
    persistence_url: Option<String>,
    request_timeout: Duration,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Arguments
    ///
    /// * `data_dir` - Directory for YAML application files; `None` keeps applications in memory
    /// * `persistence_url` - Base URL of the external persistence API, if any
    /// * `request_timeout` - Timeout for each persistence call
    ///
    /// # Errors
    ///
    /// Returns `PetsError::InvalidInput` if the URL is blank or not http(s), or the
    /// timeout is zero.
    pub fn new(
        data_dir: Option<PathBuf>,
        persistence_url: Option<String>,
        request_timeout: Duration,
    ) -> PetsResult<Self> {
        let persistence_url = persistence_url
            .map(|url| validate_persistence_url(&url))
            .transpose()?;

        if request_timeout.is_zero() {
            return Err(PetsError::InvalidInput(
                "request timeout must be greater than zero".into(),
            ));
        }

        Ok(Self {
            data_dir,
            persistence_url,
            request_timeout,
        })
    }

    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    pub fn applications_dir(&self) -> Option<PathBuf> {
        self.data_dir
            .as_ref()
            .map(|dir| dir.join(APPLICATIONS_DIR_NAME))
    }

    pub fn persistence_url(&self) -> Option<&str> {
        self.persistence_url.as_deref()
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            persistence_url: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

fn validate_persistence_url(url: &str) -> PetsResult<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(PetsError::InvalidInput(
            "persistence URL cannot be empty".into(),
        ));
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(PetsError::InvalidInput(format!(
            "persistence URL must start with http:// or https://, got '{trimmed}'"
        )));
    }
    Ok(trimmed.to_owned())
}

/// Parse the persistence request timeout from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default timeout.
pub fn request_timeout_from_env_value(value: Option<String>) -> PetsResult<Duration> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let secs = match value {
        Some(v) => v.parse::<u64>().map_err(|_| {
            PetsError::InvalidInput(format!("request timeout must be whole seconds, got '{v}'"))
        })?,
        None => DEFAULT_REQUEST_TIMEOUT_SECS,
    };

    Ok(Duration::from_secs(secs))
}

/// Treat blank optional environment values as unset.
pub fn optional_env_value(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
