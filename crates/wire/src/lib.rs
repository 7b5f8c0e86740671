//! Wire models for the external PETS persistence API.
//!
//! This crate provides **wire models** and **format/translation helpers** for the JSON
//! exchanged with the application persistence service:
//! - request payloads posted once a section is complete ([`payloads`])
//! - the application record returned by `GET /application/{id}` ([`application`])
//! - image upload URL requests ([`upload`])
//!
//! Payloads are strict (`deny_unknown_fields`) so that a payload built by this crate can
//! always be parsed back by it. The received application is strict at the top level but
//! carries each section's business fields through untouched; PETS only needs each
//! section's completion status from it.

pub mod application;
pub mod payloads;
pub mod status;
pub mod upload;

// Re-export facades
pub use application::ApplicationRecord;

// Re-export public domain-level types
pub use application::{CreatedApplication, ReceivedApplication, ReceivedSection, RemoteSection};
pub use payloads::{
    ApplicantDetailsPayload, ChestXrayPayload, MedicalScreeningPayload,
    RadiologicalOutcomePayload, SputumDecisionPayload, SputumDetailsPayload, SputumSamplePayload,
    SputumSamples, TbCertificateIssuedPayload, TbCertificateNotIssuedPayload,
    TbCertificatePayload, TravelInformationPayload,
};
pub use status::BackendStatus;
pub use upload::{GenerateImageUploadUrlRequest, GenerateImageUploadUrlResponse, ImageType};

/// Errors returned by the `pets-wire` boundary crate.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("translation error: {0}")]
    Translation(String),
}

/// Type alias for Results that can fail with a [`WireError`].
pub type WireResult<T> = Result<T, WireError>;

/// Deserialize `json_text` into `T`, reporting the path of the first mismatch.
pub(crate) fn parse_with_path<T>(what: &str, json_text: &str) -> WireResult<T>
where
    T: serde::de::DeserializeOwned,
{
    let mut deserializer = serde_json::Deserializer::from_str(json_text);
    match serde_path_to_error::deserialize::<_, T>(&mut deserializer) {
        Ok(parsed) => Ok(parsed),
        Err(err) => {
            let path = err.path().to_string();
            let source = err.into_inner();
            let path = if path.is_empty() || path == "." {
                "<root>"
            } else {
                path.as_str()
            };
            Err(WireError::Translation(format!(
                "{what} schema mismatch at {path}: {source}"
            )))
        }
    }
}
