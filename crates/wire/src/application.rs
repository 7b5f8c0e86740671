//! The application record returned by `GET /application/{id}`.
//!
//! Responsibilities:
//! - Define public domain-level types for the fetched record
//! - Define a wire model for deserialisation
//! - Translate the wire model into domain types (canonical id, typed section keys)
//!
//! Only the section envelope (`status`, `dateCreated`) is interpreted here. The
//! remaining business fields of each section are carried through as JSON.

use crate::{parse_with_path, BackendStatus, WireError, WireResult};
use chrono::{DateTime, Utc};
use pets_uuid::ApplicationId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Public domain-level types
// ============================================================================

/// Section keys used by the persistence API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RemoteSection {
    Applicant,
    TravelInformation,
    MedicalScreening,
    ChestXray,
    RadiologicalOutcome,
    SputumRequirement,
    SputumDetails,
    TbCertificate,
}

impl RemoteSection {
    pub fn as_str(self) -> &'static str {
        match self {
            RemoteSection::Applicant => "applicant",
            RemoteSection::TravelInformation => "travelInformation",
            RemoteSection::MedicalScreening => "medicalScreening",
            RemoteSection::ChestXray => "chestXray",
            RemoteSection::RadiologicalOutcome => "radiologicalOutcome",
            RemoteSection::SputumRequirement => "sputumRequirement",
            RemoteSection::SputumDetails => "sputumDetails",
            RemoteSection::TbCertificate => "tbCertificate",
        }
    }
}

/// One section of a fetched application.
#[derive(Clone, Debug, PartialEq)]
pub struct ReceivedSection {
    pub status: BackendStatus,
    pub date_created: Option<DateTime<Utc>>,
    /// Save counter, present on sputum details only.
    pub version: Option<u64>,
    /// Business fields, unchanged from the response.
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// A fetched application with whichever sections the backend holds.
#[derive(Clone, Debug, PartialEq)]
pub struct ReceivedApplication {
    pub application_id: ApplicationId,
    pub applicant_photo_url: Option<String>,
    pub sections: BTreeMap<RemoteSection, ReceivedSection>,
}

impl ReceivedApplication {
    pub fn section(&self, key: RemoteSection) -> Option<&ReceivedSection> {
        self.sections.get(&key)
    }
}

/// Response to `POST /application`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedApplication {
    pub application_id: ApplicationId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<DateTime<Utc>>,
}

// ============================================================================
// Public operations
// ============================================================================

/// Application record operations.
///
/// Zero-sized namespace for parsing fetched records and rendering payloads.
pub struct ApplicationRecord;

impl ApplicationRecord {
    /// Parse a fetched application from JSON text.
    ///
    /// Uses `serde_path_to_error` so that a mismatch reports the failing field path
    /// (e.g. `sputumDetails`).
    ///
    /// # Errors
    ///
    /// Returns [`WireError`] if:
    /// - the JSON does not match the application envelope,
    /// - an unknown top-level key is present,
    /// - the application id is not canonical,
    /// - `dateCreated` is not an RFC 3339 timestamp.
    pub fn parse(json_text: &str) -> WireResult<ReceivedApplication> {
        let wire: ApplicationWire = parse_with_path("Application", json_text)?;
        wire_to_domain(wire)
    }

    /// Render any payload as JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::InvalidJson`] if serialisation fails.
    pub fn render<T: Serialize>(payload: &T) -> WireResult<String> {
        Ok(serde_json::to_string(payload)?)
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ApplicationWire {
    application_id: String,
    #[serde(default)]
    applicant_photo_url: Option<String>,
    #[serde(default)]
    applicant: Option<SectionWire>,
    #[serde(default)]
    travel_information: Option<SectionWire>,
    #[serde(default)]
    medical_screening: Option<SectionWire>,
    #[serde(default)]
    chest_xray: Option<SectionWire>,
    #[serde(default)]
    radiological_outcome: Option<SectionWire>,
    #[serde(default)]
    sputum_requirement: Option<SectionWire>,
    #[serde(default)]
    sputum_details: Option<SectionWire>,
    #[serde(default)]
    tb_certificate: Option<SectionWire>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SectionWire {
    status: BackendStatus,
    #[serde(default)]
    date_created: Option<String>,
    #[serde(default)]
    version: Option<u64>,
    #[serde(flatten)]
    fields: serde_json::Map<String, serde_json::Value>,
}

// ============================================================================
// Helper functions (internal)
// ============================================================================

fn section_to_domain(key: RemoteSection, wire: SectionWire) -> WireResult<ReceivedSection> {
    let date_created = wire
        .date_created
        .map(|raw| {
            raw.parse::<DateTime<Utc>>().map_err(|e| {
                WireError::Translation(format!(
                    "{}.dateCreated is not a timestamp: {e}",
                    key.as_str()
                ))
            })
        })
        .transpose()?;

    let mut fields = wire.fields;
    // The section echoes the owning application id; it carries no extra meaning here.
    fields.remove("applicationId");

    Ok(ReceivedSection {
        status: wire.status,
        date_created,
        version: wire.version,
        fields,
    })
}

fn wire_to_domain(wire: ApplicationWire) -> WireResult<ReceivedApplication> {
    let application_id = ApplicationId::parse(&wire.application_id)
        .map_err(|e| WireError::Translation(format!("Invalid application ID: {e}")))?;

    let candidates = [
        (RemoteSection::Applicant, wire.applicant),
        (RemoteSection::TravelInformation, wire.travel_information),
        (RemoteSection::MedicalScreening, wire.medical_screening),
        (RemoteSection::ChestXray, wire.chest_xray),
        (RemoteSection::RadiologicalOutcome, wire.radiological_outcome),
        (RemoteSection::SputumRequirement, wire.sputum_requirement),
        (RemoteSection::SputumDetails, wire.sputum_details),
        (RemoteSection::TbCertificate, wire.tb_certificate),
    ];

    let mut sections = BTreeMap::new();
    for (key, section) in candidates {
        if let Some(section) = section {
            sections.insert(key, section_to_domain(key, section)?);
        }
    }

    Ok(ReceivedApplication {
        application_id,
        applicant_photo_url: wire.applicant_photo_url,
        sections,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "applicationId": "90a8d1ea318041d9adb070a834d4e0f6",
        "travelInformation": {
            "applicationId": "90a8d1ea318041d9adb070a834d4e0f6",
            "status": "completed",
            "dateCreated": "2025-03-10T09:15:00Z",
            "ukAddressLine1": "182 Willow Crescent",
            "visaCategory": "Study"
        },
        "sputumDetails": {
            "status": "incompleted",
            "version": 2,
            "sputumSamples": {}
        }
    }"#;

    #[test]
    fn parses_fetched_application() {
        let app = ApplicationRecord::parse(SAMPLE).expect("parse application");

        assert_eq!(
            app.application_id.to_string(),
            "90a8d1ea318041d9adb070a834d4e0f6"
        );
        let travel = app
            .section(RemoteSection::TravelInformation)
            .expect("travel section");
        assert_eq!(travel.status, BackendStatus::Completed);
        assert!(travel.date_created.is_some());
        assert_eq!(travel.fields["visaCategory"], "Study");
        assert!(!travel.fields.contains_key("applicationId"));

        let sputum = app.section(RemoteSection::SputumDetails).unwrap();
        assert_eq!(sputum.status, BackendStatus::Incompleted);
        assert_eq!(sputum.version, Some(2));
        assert!(app.section(RemoteSection::TbCertificate).is_none());
    }

    #[test]
    fn reports_path_of_schema_mismatch() {
        let input = r#"{
            "applicationId": "90a8d1ea318041d9adb070a834d4e0f6",
            "chestXray": { "status": "done" }
        }"#;
        let err = ApplicationRecord::parse(input).expect_err("bad status should fail");
        let msg = err.to_string();
        assert!(msg.contains("chestXray"), "unexpected message: {msg}");
    }

    #[test]
    fn rejects_unknown_top_level_keys() {
        let input = r#"{ "applicationId": "90a8d1ea318041d9adb070a834d4e0f6", "clinic": {} }"#;
        assert!(ApplicationRecord::parse(input).is_err());
    }

    #[test]
    fn rejects_non_canonical_application_id() {
        let input = r#"{ "applicationId": "APP-123" }"#;
        let err = ApplicationRecord::parse(input).expect_err("id should be rejected");
        assert!(matches!(err, WireError::Translation(_)));
    }
}
