//! Per-section state.
//!
//! An application is made of eight sections, one per workflow step. Each section is
//! a `{ status, data, version }` record. `data` holds the raw form fields keyed by
//! their camelCase field key; the rules for those fields live in [`fields`].

pub mod fields;

use crate::constants::{SPUTUM_CHECK_PAGE, SPUTUM_COLLECTION_PAGE};
use crate::PetsError;
use pets_types::DateParts;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// SECTION KINDS
// ============================================================================

/// The workflow steps, in tracker order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SectionKind {
    #[serde(rename = "applicant-details")]
    ApplicantDetails,
    #[serde(rename = "travel-information")]
    Travel,
    #[serde(rename = "medical-screening")]
    Medical,
    #[serde(rename = "chest-xray")]
    ChestXray,
    #[serde(rename = "radiological-outcome")]
    RadiologicalOutcome,
    #[serde(rename = "sputum-decision")]
    SputumDecision,
    #[serde(rename = "sputum-collection")]
    SputumCollection,
    #[serde(rename = "tb-certificate")]
    TbCertificate,
}

impl SectionKind {
    /// All sections in tracker order.
    pub const ALL: [SectionKind; 8] = [
        SectionKind::ApplicantDetails,
        SectionKind::Travel,
        SectionKind::Medical,
        SectionKind::ChestXray,
        SectionKind::RadiologicalOutcome,
        SectionKind::SputumDecision,
        SectionKind::SputumCollection,
        SectionKind::TbCertificate,
    ];

    /// URL slug, also used as the serialised key.
    pub fn slug(self) -> &'static str {
        match self {
            SectionKind::ApplicantDetails => "applicant-details",
            SectionKind::Travel => "travel-information",
            SectionKind::Medical => "medical-screening",
            SectionKind::ChestXray => "chest-xray",
            SectionKind::RadiologicalOutcome => "radiological-outcome",
            SectionKind::SputumDecision => "sputum-decision",
            SectionKind::SputumCollection => "sputum-collection",
            SectionKind::TbCertificate => "tb-certificate",
        }
    }

    /// Task name shown in the tracker.
    pub fn task_name(self) -> &'static str {
        match self {
            SectionKind::ApplicantDetails => "Visa applicant details",
            SectionKind::Travel => "UK travel information",
            SectionKind::Medical => "Medical history and TB symptoms",
            SectionKind::ChestXray => "Upload chest X-ray images",
            SectionKind::RadiologicalOutcome => "Radiological outcome",
            SectionKind::SputumDecision => "Make a sputum decision",
            SectionKind::SputumCollection => "Sputum collection and results",
            SectionKind::TbCertificate => "TB certificate outcome",
        }
    }

    /// First page of the section's form.
    pub fn entry_page(self) -> &'static str {
        match self {
            SectionKind::ApplicantDetails => "/enter-applicant-information",
            SectionKind::Travel => "/proposed-visa-category",
            SectionKind::Medical => "/record-medical-history-tb-symptoms",
            SectionKind::ChestXray => "/upload-chest-x-ray-images",
            SectionKind::RadiologicalOutcome => "/chest-x-ray-results",
            SectionKind::SputumDecision => "/is-sputum-collection-required",
            SectionKind::SputumCollection => SPUTUM_COLLECTION_PAGE,
            SectionKind::TbCertificate => "/will-you-issue-tb-clearance-certificate",
        }
    }

    /// Check-your-answers page shown once the section is complete.
    pub fn check_page(self) -> &'static str {
        match self {
            SectionKind::ApplicantDetails => "/check-visa-applicant-details",
            SectionKind::Travel => "/check-travel-information",
            SectionKind::Medical => "/check-medical-history-and-tb-symptoms",
            SectionKind::ChestXray => "/check-chest-x-ray-images",
            SectionKind::RadiologicalOutcome => "/check-chest-x-ray-results-findings",
            SectionKind::SputumDecision => "/check-sputum-decision-information",
            SectionKind::SputumCollection => SPUTUM_CHECK_PAGE,
            SectionKind::TbCertificate => "/tb-screening-complete",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for SectionKind {
    type Err = PetsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == s)
            .ok_or_else(|| PetsError::UnknownSection(s.to_owned()))
    }
}

// ============================================================================
// SECTION STATE
// ============================================================================

/// Stored completion state of a section.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionStatus {
    #[default]
    NotYetStarted,
    InProgress,
    Completed,
    NotRequired,
}

impl SectionStatus {
    pub fn is_completed(self) -> bool {
        matches!(self, SectionStatus::Completed)
    }

    /// Name as stored in YAML and returned by the REST API.
    pub fn as_str(self) -> &'static str {
        match self {
            SectionStatus::NotYetStarted => "NotYetStarted",
            SectionStatus::InProgress => "InProgress",
            SectionStatus::Completed => "Completed",
            SectionStatus::NotRequired => "NotRequired",
        }
    }
}

/// A single form value.
///
/// Text answers and radio choices are strings, dates keep their three boxes and
/// checkbox groups are lists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Date(DateParts),
    List(Vec<String>),
}

impl FieldValue {
    /// True when nothing was entered.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::Date(parts) => parts.is_empty(),
            FieldValue::List(items) => items.iter().all(|item| item.trim().is_empty()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text.trim()),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&DateParts> {
        match self {
            FieldValue::Date(parts) => Some(parts),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_owned())
    }
}

impl From<DateParts> for FieldValue {
    fn from(value: DateParts) -> Self {
        FieldValue::Date(value)
    }
}

/// Form fields keyed by field key.
pub type FieldMap = BTreeMap<String, FieldValue>;

/// Persisted state for one workflow step.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Section {
    #[serde(default)]
    pub status: SectionStatus,
    #[serde(default)]
    pub data: FieldMap,
    /// Save counter; incremented on every successful save and never decremented.
    #[serde(default)]
    pub version: u64,
}

impl Section {
    /// Trimmed text value of `key`, if present and non-blank.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.data
            .get(key)
            .and_then(FieldValue::as_text)
            .filter(|text| !text.is_empty())
    }

    pub fn date(&self, key: &str) -> Option<&DateParts> {
        self.data
            .get(key)
            .and_then(FieldValue::as_date)
            .filter(|parts| !parts.is_empty())
    }

    /// List value of `key`, or an empty list. Text values are split on commas.
    pub fn list(&self, key: &str) -> Vec<String> {
        let items: Vec<&str> = match self.data.get(key) {
            Some(FieldValue::List(items)) => items.iter().map(String::as_str).collect(),
            Some(FieldValue::Text(text)) => text.split(',').collect(),
            _ => Vec::new(),
        };
        items
            .into_iter()
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_owned)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_kind_slugs_round_trip() {
        for kind in SectionKind::ALL {
            assert_eq!(kind.slug().parse::<SectionKind>().unwrap(), kind);
        }
        assert!(matches!(
            "photo".parse::<SectionKind>(),
            Err(PetsError::UnknownSection(_))
        ));
    }

    #[test]
    fn field_values_deserialize_by_shape() {
        let json = r#"{
            "visaCategory": "Work",
            "dateXrayTaken": { "day": "1", "month": "2", "year": "2025" },
            "tbSymptomsList": ["Cough", "Fever"]
        }"#;
        let data: FieldMap = serde_json::from_str(json).unwrap();
        assert_eq!(data["visaCategory"], FieldValue::from("Work"));
        assert_eq!(
            data["dateXrayTaken"],
            FieldValue::Date(DateParts::new("1", "2", "2025"))
        );
        assert_eq!(
            data["tbSymptomsList"].as_list().map(<[String]>::len),
            Some(2)
        );
    }

    #[test]
    fn blank_values_are_detected() {
        assert!(FieldValue::from("   ").is_blank());
        assert!(FieldValue::Date(DateParts::default()).is_blank());
        assert!(FieldValue::List(vec![" ".into()]).is_blank());
        assert!(!FieldValue::Date(DateParts::new("1", "", "")).is_blank());
    }

    #[test]
    fn section_accessors_skip_blank_values() {
        let mut section = Section::default();
        section.data.insert("a".into(), FieldValue::from("  hi "));
        section.data.insert("b".into(), FieldValue::from(""));
        assert_eq!(section.text("a"), Some("hi"));
        assert_eq!(section.text("b"), None);
        assert_eq!(section.text("missing"), None);
        assert!(section.list("missing").is_empty());

        section
            .data
            .insert("findings".into(), FieldValue::from("Apical fibrosis, , Cavity"));
        assert_eq!(section.list("findings"), vec!["Apical fibrosis", "Cavity"]);
    }
}
