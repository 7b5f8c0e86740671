//! JSON request and response bodies.
//!
//! Field names are camelCase on the wire. Section fields are carried as raw JSON
//! values keyed by field key; the core decides what each value means.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationRes {
    pub application_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationListItem {
    pub application_id: String,
    /// RFC 3339 creation time.
    pub created_at: String,
    pub overall_status: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ListApplicationsRes {
    pub applications: Vec<ApplicationListItem>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrackerTaskRes {
    pub section: String,
    pub name: String,
    pub status: String,
    pub clickable: bool,
    pub link: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TrackerGroupRes {
    pub heading: String,
    pub tasks: Vec<TrackerTaskRes>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrackerRes {
    pub application_id: String,
    pub overall_status: String,
    pub groups: Vec<TrackerGroupRes>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SectionRes {
    pub section: String,
    pub status: String,
    pub version: u64,
    /// Stored field values keyed by field key.
    #[schema(value_type = Object)]
    pub data: BTreeMap<String, serde_json::Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct SaveSectionReq {
    /// `save-progress` or `save-and-continue`.
    pub action: String,
    /// Text answers are strings, dates are `{day, month, year}` and checkbox
    /// groups are arrays of strings.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub fields: BTreeMap<String, serde_json::Value>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveSectionRes {
    pub status: String,
    pub version: u64,
    pub next_page: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldErrorRes {
    pub field: String,
    pub message: String,
}

/// Body of a 422 response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ValidationErrorRes {
    pub errors: Vec<FieldErrorRes>,
    /// The error summary list, in page order.
    pub summary: Vec<String>,
}

/// Body of an error response that sends the user to another page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub message: String,
    pub redirect: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WordCountRes {
    pub words: usize,
    pub limit: usize,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadRes {
    pub file_name: String,
    pub size_bytes: u64,
    pub media_type: Option<String>,
    pub checksum: String,
    pub image_type: String,
    pub upload_url: Option<String>,
    pub bucket_path: Option<String>,
}

/// Certificate details for the summary page. Only the fields of the active
/// outcome are set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRes {
    pub issued: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_not_issued: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physician_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRes {
    pub certificate: Option<CertificateRes>,
    pub sputum_outcome: String,
}

/// Answer to the written-consent question.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ConsentReq {
    /// "Yes" or "No"; blank when nothing was selected.
    #[serde(default)]
    pub consent: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConsentRes {
    pub next_page: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn save_request_accepts_mixed_field_shapes() {
        let req: SaveSectionReq = serde_json::from_value(json!({
            "action": "save-and-continue",
            "fields": {
                "visaCategory": "Work",
                "dateXrayTaken": { "day": "1", "month": "2", "year": "2025" }
            }
        }))
        .unwrap();
        assert_eq!(req.action, "save-and-continue");
        assert_eq!(req.fields.len(), 2);
    }

    #[test]
    fn consent_request_defaults_to_blank() {
        let req: ConsentReq = serde_json::from_value(json!({})).unwrap();
        assert_eq!(req.consent, "");
    }

    #[test]
    fn save_request_rejects_unknown_keys() {
        let res = serde_json::from_value::<SaveSectionReq>(json!({
            "action": "save-progress",
            "section": "travel-information"
        }));
        assert!(res.is_err());
    }

    #[test]
    fn certificate_res_omits_inactive_branch() {
        let res = CertificateRes {
            issued: false,
            certificate_number: None,
            issue_date: None,
            expiry_date: None,
            reason_not_issued: Some("Testing postponed".into()),
            physician_name: Some("Dr Who".into()),
            comments: None,
        };
        let value = serde_json::to_value(&res).unwrap();
        assert_eq!(
            value,
            json!({
                "issued": false,
                "reasonNotIssued": "Testing postponed",
                "physicianName": "Dr Who"
            })
        );
    }
}
