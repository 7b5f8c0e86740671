//! Request payloads posted to the persistence API, one per section.
//!
//! Field names follow the persistence API's camelCase JSON. Optional values are
//! omitted rather than sent as `null`. Dates are ISO 8601 calendar dates
//! (`YYYY-MM-DD`).

use chrono::NaiveDate;
use pets_types::YesOrNo;
use serde::{Deserialize, Serialize};

/// `POST /applicant/register/{id}`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ApplicantDetailsPayload {
    pub full_name: String,
    pub sex: String,
    pub date_of_birth: NaiveDate,
    pub country_of_nationality: String,
    pub passport_number: String,
    pub country_of_issue: String,
    pub issue_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub applicant_home_address1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applicant_home_address2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applicant_home_address3: Option<String>,
    pub town_or_city: String,
    pub province_or_state: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applicant_photo_file_name: Option<String>,
}

/// `POST /application/{id}/travel-information`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TravelInformationPayload {
    pub visa_category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uk_address_line1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uk_address_line2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uk_address_line3: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uk_address_town_or_city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uk_address_postcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uk_email_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uk_mobile_number: Option<String>,
}

/// `POST /application/{id}/medical-screening`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MedicalScreeningPayload {
    pub date_of_medical_screening: NaiveDate,
    pub age: u32,
    pub symptoms_of_tb: YesOrNo,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symptoms_other: Option<String>,
    #[serde(default)]
    pub history_of_conditions_under11: Vec<String>,
    pub history_of_previous_tb: YesOrNo,
    #[serde(default)]
    pub previous_tb_details: String,
    pub contact_with_person_with_tb: YesOrNo,
    #[serde(default)]
    pub contact_with_tb_details: String,
    pub pregnant: String,
    pub have_menstral_period: String,
    #[serde(default)]
    pub physical_examination_notes: String,
    pub is_xray_required: YesOrNo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_xray_not_required: Option<String>,
}

/// `POST /application/{id}/chest-xray`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ChestXrayPayload {
    pub chest_xray_taken: YesOrNo,
    pub postero_anterior_xray_file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apical_lordotic_xray_file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lateral_decubitus_xray_file_name: Option<String>,
    pub date_xray_taken: NaiveDate,
}

/// `POST /application/{id}/radiological-outcome`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RadiologicalOutcomePayload {
    pub xray_result: String,
    #[serde(default)]
    pub xray_result_detail: String,
    #[serde(default)]
    pub xray_minor_findings: Vec<String>,
    #[serde(default)]
    pub xray_associated_minor_findings: Vec<String>,
    #[serde(default)]
    pub xray_active_tb_findings: Vec<String>,
}

/// `POST /application/{id}/sputum-decision`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SputumDecisionPayload {
    pub sputum_required: YesOrNo,
}

/// One sputum sample as sent to the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SputumSamplePayload {
    pub date_of_sample: NaiveDate,
    pub collection_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smear_result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub culture_result: Option<String>,
    pub date_updated: NaiveDate,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SputumSamples {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample1: Option<SputumSamplePayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample2: Option<SputumSamplePayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample3: Option<SputumSamplePayload>,
}

/// `PUT /application/{id}/sputum-details`
///
/// `version` is the section's save counter; the backend uses it to reject
/// writes based on a stale read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SputumDetailsPayload {
    pub sputum_samples: SputumSamples,
    pub version: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TbCertificateIssuedPayload {
    pub is_issued: YesOrNo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    pub issue_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub certificate_number: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TbCertificateNotIssuedPayload {
    pub is_issued: YesOrNo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    pub not_issued_reason: String,
    pub physician_name: String,
}

/// `POST /application/{id}/tb-certificate`; the body shape depends on the outcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TbCertificatePayload {
    Issued(TbCertificateIssuedPayload),
    NotIssued(TbCertificateNotIssuedPayload),
}
