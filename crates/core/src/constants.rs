//! Constants used throughout the PETS core crate.
//!
//! Page paths, storage names and workflow limits live here so the tracker,
//! transitions and stores agree on them.

/// Directory name for application storage under the data directory.
pub const APPLICATIONS_DIR_NAME: &str = "applications";

/// Filename for a stored application.
pub const APPLICATION_YAML_FILENAME: &str = "application.yaml";

/// Default address for the REST server.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

/// Default timeout for calls to the persistence API.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Word limit for free-text notes and comments.
pub const MAX_FREE_TEXT_WORDS: usize = 150;

/// Number of sputum samples collected per application.
pub const SPUTUM_SAMPLE_COUNT: u8 = 3;

/// Months a TB clearance certificate is valid for.
pub const CERTIFICATE_VALIDITY_MONTHS: u32 = 6;

/// Months a certificate is valid for after close contact with a person with TB.
pub const CLOSE_CONTACT_CERTIFICATE_VALIDITY_MONTHS: u32 = 3;

// ============================================================================
// PAGES
// ============================================================================

pub const TRACKER_PAGE: &str = "/tracker";

pub const SERVICE_PROBLEM_PAGE: &str = "/sorry-there-is-problem-with-service";

pub const PAGE_NOT_FOUND: &str = "/page-not-found";

pub const TB_CERTIFICATE_SUMMARY_PAGE: &str = "/tb-certificate-summary";

pub const SPUTUM_COLLECTION_PAGE: &str = "/enter-sputum-sample-collection-information";

pub const SPUTUM_RESULTS_PAGE: &str = "/enter-sputum-sample-results";

pub const SPUTUM_CHECK_PAGE: &str = "/check-sputum-collection-details-results";

pub const GET_WRITTEN_CONSENT_PAGE: &str = "/get-written-consent";

pub const NO_MATCHING_RECORD_PAGE: &str = "/no-matching-record-found";
