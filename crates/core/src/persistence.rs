//! Client for the external persistence API.
//!
//! Completed sections are posted to the backend, one endpoint per section. The
//! backend is an external collaborator: a non-2xx response is reported as
//! [`PetsError::Persistence`] and is never retried.

use crate::application::Application;
use crate::branching::{certificate_expiry, certificate_issue_date};
use crate::config::CoreConfig;
use crate::constants::SPUTUM_SAMPLE_COUNT;
use crate::sections::fields::sample_key;
use crate::sections::{Section, SectionKind, SectionStatus};
use crate::validation::parts_to_date;
use crate::{PetsError, PetsResult};
use async_trait::async_trait;
use chrono::NaiveDate;
use pets_types::YesOrNo;
use pets_uuid::ApplicationId;
use pets_wire::{
    ApplicantDetailsPayload, ApplicationRecord, ChestXrayPayload, CreatedApplication,
    GenerateImageUploadUrlRequest, GenerateImageUploadUrlResponse, MedicalScreeningPayload,
    RadiologicalOutcomePayload, ReceivedApplication, RemoteSection, SputumDecisionPayload,
    SputumDetailsPayload, SputumSamplePayload, SputumSamples, TbCertificateIssuedPayload,
    TbCertificateNotIssuedPayload, TbCertificatePayload, TravelInformationPayload,
};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use std::time::Duration;

// ============================================================================
// SUBMISSIONS
// ============================================================================

/// A completed section, ready to send.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SectionSubmission {
    ApplicantDetails(ApplicantDetailsPayload),
    TravelInformation(TravelInformationPayload),
    MedicalScreening(MedicalScreeningPayload),
    ChestXray(ChestXrayPayload),
    RadiologicalOutcome(RadiologicalOutcomePayload),
    SputumDecision(SputumDecisionPayload),
    SputumDetails(SputumDetailsPayload),
    TbCertificate(TbCertificatePayload),
}

impl SectionSubmission {
    /// Path of the endpoint, relative to the API base URL.
    pub fn path(&self, id: ApplicationId) -> String {
        let suffix = match self {
            SectionSubmission::ApplicantDetails(_) => return format!("/applicant/register/{id}"),
            SectionSubmission::TravelInformation(_) => "travel-information",
            SectionSubmission::MedicalScreening(_) => "medical-screening",
            SectionSubmission::ChestXray(_) => "chest-xray",
            SectionSubmission::RadiologicalOutcome(_) => "radiological-outcome",
            SectionSubmission::SputumDecision(_) => "sputum-decision",
            SectionSubmission::SputumDetails(_) => "sputum-details",
            SectionSubmission::TbCertificate(_) => "tb-certificate",
        };
        format!("/application/{id}/{suffix}")
    }

    pub fn method(&self) -> Method {
        match self {
            SectionSubmission::SputumDetails(_) => Method::PUT,
            _ => Method::POST,
        }
    }
}

fn missing(kind: SectionKind, key: &str) -> PetsError {
    PetsError::InvalidInput(format!("{kind} is missing {key}"))
}

fn text(kind: SectionKind, section: &Section, key: &str) -> PetsResult<String> {
    section
        .text(key)
        .map(str::to_owned)
        .ok_or_else(|| missing(kind, key))
}

fn optional_text(section: &Section, key: &str) -> Option<String> {
    section.text(key).map(str::to_owned)
}

fn date(kind: SectionKind, section: &Section, key: &str) -> PetsResult<NaiveDate> {
    section
        .date(key)
        .and_then(parts_to_date)
        .ok_or_else(|| missing(kind, key))
}

fn yes_no(kind: SectionKind, section: &Section, key: &str) -> PetsResult<YesOrNo> {
    Ok(text(kind, section, key)?.parse::<YesOrNo>()?)
}

/// Builds the backend payload for a completed section.
///
/// # Errors
///
/// Returns `PetsError::InvalidInput` if a field the payload needs is missing or
/// malformed. Sections are validated before they complete, so this indicates a
/// stored record that was edited by hand.
pub fn build_submission(
    app: &Application,
    kind: SectionKind,
    today: NaiveDate,
) -> PetsResult<SectionSubmission> {
    let section = app.section(kind);
    let s = &section;

    let submission = match kind {
        SectionKind::ApplicantDetails => SectionSubmission::ApplicantDetails(ApplicantDetailsPayload {
            full_name: text(kind, s, "fullName")?,
            sex: text(kind, s, "sex")?,
            date_of_birth: date(kind, s, "dateOfBirth")?,
            country_of_nationality: text(kind, s, "countryOfNationality")?,
            passport_number: text(kind, s, "passportNumber")?,
            country_of_issue: text(kind, s, "countryOfIssue")?,
            issue_date: date(kind, s, "passportIssueDate")?,
            expiry_date: date(kind, s, "passportExpiryDate")?,
            applicant_home_address1: text(kind, s, "applicantHomeAddress1")?,
            applicant_home_address2: optional_text(s, "applicantHomeAddress2"),
            applicant_home_address3: optional_text(s, "applicantHomeAddress3"),
            town_or_city: text(kind, s, "townOrCity")?,
            province_or_state: text(kind, s, "provinceOrState")?,
            country: text(kind, s, "country")?,
            postcode: optional_text(s, "postcode"),
            applicant_photo_file_name: optional_text(s, "applicantPhotoFileName"),
        }),
        SectionKind::Travel => SectionSubmission::TravelInformation(TravelInformationPayload {
            visa_category: text(kind, s, "visaCategory")?,
            uk_address_line1: optional_text(s, "ukAddressLine1"),
            uk_address_line2: optional_text(s, "ukAddressLine2"),
            uk_address_line3: optional_text(s, "ukAddressLine3"),
            uk_address_town_or_city: optional_text(s, "ukAddressTownOrCity"),
            uk_address_postcode: optional_text(s, "ukAddressPostcode"),
            uk_email_address: optional_text(s, "ukEmailAddress"),
            uk_mobile_number: optional_text(s, "ukMobileNumber"),
        }),
        SectionKind::Medical => SectionSubmission::MedicalScreening(MedicalScreeningPayload {
            date_of_medical_screening: date(kind, s, "completionDate")?,
            age: text(kind, s, "age")?
                .parse()
                .map_err(|_| PetsError::InvalidInput(format!("{kind} has a non-numeric age")))?,
            symptoms_of_tb: yes_no(kind, s, "tbSymptoms")?,
            symptoms: s.list("tbSymptomsList"),
            symptoms_other: optional_text(s, "otherSymptomsDetail"),
            history_of_conditions_under11: s.list("underElevenConditions"),
            history_of_previous_tb: yes_no(kind, s, "previousTb")?,
            previous_tb_details: optional_text(s, "previousTbDetail").unwrap_or_default(),
            contact_with_person_with_tb: yes_no(kind, s, "closeContactWithTb")?,
            contact_with_tb_details: optional_text(s, "closeContactWithTbDetail").unwrap_or_default(),
            pregnant: text(kind, s, "pregnant")?,
            have_menstral_period: text(kind, s, "menstrualPeriods")?,
            physical_examination_notes: optional_text(s, "physicalExamNotes").unwrap_or_default(),
            is_xray_required: yes_no(kind, s, "chestXrayTaken")?,
            reason_xray_not_required: xray_not_taken_reason(s),
        }),
        SectionKind::ChestXray => SectionSubmission::ChestXray(ChestXrayPayload {
            chest_xray_taken: YesOrNo::Yes,
            postero_anterior_xray_file_name: text(kind, s, "posteroAnteriorXrayFileName")?,
            apical_lordotic_xray_file_name: optional_text(s, "apicalLordoticXrayFileName"),
            lateral_decubitus_xray_file_name: optional_text(s, "lateralDecubitusXrayFileName"),
            date_xray_taken: date(kind, s, "dateXrayTaken")?,
        }),
        SectionKind::RadiologicalOutcome => {
            SectionSubmission::RadiologicalOutcome(RadiologicalOutcomePayload {
                xray_result: text(kind, s, "xrayResult")?,
                xray_result_detail: optional_text(s, "xrayResultDetail").unwrap_or_default(),
                xray_minor_findings: s.list("xrayMinorFindings"),
                xray_associated_minor_findings: s.list("xrayAssociatedMinorFindings"),
                xray_active_tb_findings: s.list("xrayActiveTbFindings"),
            })
        }
        SectionKind::SputumDecision => SectionSubmission::SputumDecision(SputumDecisionPayload {
            sputum_required: yes_no(kind, s, "isSputumRequired")?,
        }),
        SectionKind::SputumCollection => {
            let mut samples = (1..=SPUTUM_SAMPLE_COUNT).map(|n| sputum_sample(s, n, today));
            SectionSubmission::SputumDetails(SputumDetailsPayload {
                sputum_samples: SputumSamples {
                    sample1: samples.next().flatten(),
                    sample2: samples.next().flatten(),
                    sample3: samples.next().flatten(),
                },
                version: s.version,
            })
        }
        SectionKind::TbCertificate => {
            let comments = optional_text(s, "physicianComments");
            let payload = if yes_no(kind, s, "willIssueCertificate")?.is_yes() {
                let issue_date = certificate_issue_date(app, today);
                let close_contact = app.text(SectionKind::Medical, "closeContactWithTb") == Some("Yes");
                TbCertificatePayload::Issued(TbCertificateIssuedPayload {
                    is_issued: YesOrNo::Yes,
                    comments,
                    issue_date,
                    expiry_date: certificate_expiry(issue_date, close_contact).ok_or_else(|| {
                        PetsError::InvalidInput(format!("{kind} issue date {issue_date} has no expiry"))
                    })?,
                    certificate_number: text(kind, s, "certificateNumber")?,
                })
            } else {
                TbCertificatePayload::NotIssued(TbCertificateNotIssuedPayload {
                    is_issued: YesOrNo::No,
                    comments,
                    not_issued_reason: text(kind, s, "reasonNotIssued")?,
                    physician_name: text(kind, s, "declaringPhysicianName")?,
                })
            };
            SectionSubmission::TbCertificate(payload)
        }
    };
    Ok(submission)
}

/// Reason for skipping the X-ray, with the free-text detail for "Other".
fn xray_not_taken_reason(section: &Section) -> Option<String> {
    if section.text("chestXrayTaken") != Some("No") {
        return None;
    }
    match section.text("reasonXrayWasNotTaken")? {
        "Other" => Some(
            section
                .text("xrayWasNotTakenFurtherDetails")
                .map_or_else(|| "Other".to_owned(), |detail| format!("Other: {detail}")),
        ),
        reason => Some(reason.to_owned()),
    }
}

fn sputum_sample(section: &Section, n: u8, today: NaiveDate) -> Option<SputumSamplePayload> {
    Some(SputumSamplePayload {
        date_of_sample: section.date(&sample_key(n, "Date")).and_then(parts_to_date)?,
        collection_method: section.text(&sample_key(n, "CollectionMethod"))?.to_owned(),
        smear_result: optional_text(section, &sample_key(n, "SmearResult")),
        culture_result: optional_text(section, &sample_key(n, "CultureResult")),
        date_updated: today,
    })
}

/// Section statuses held by the backend.
///
/// "completed" maps to `Completed` and "incompleted" to `InProgress`. Sections the
/// backend has not seen are left out.
pub fn statuses_from_received(received: &ReceivedApplication) -> Vec<(SectionKind, SectionStatus)> {
    received
        .sections
        .iter()
        .map(|(remote, section)| {
            let status = if section.status.is_completed() {
                SectionStatus::Completed
            } else {
                SectionStatus::InProgress
            };
            (section_kind(*remote), status)
        })
        .collect()
}

fn section_kind(remote: RemoteSection) -> SectionKind {
    match remote {
        RemoteSection::Applicant => SectionKind::ApplicantDetails,
        RemoteSection::TravelInformation => SectionKind::Travel,
        RemoteSection::MedicalScreening => SectionKind::Medical,
        RemoteSection::ChestXray => SectionKind::ChestXray,
        RemoteSection::RadiologicalOutcome => SectionKind::RadiologicalOutcome,
        RemoteSection::SputumRequirement => SectionKind::SputumDecision,
        RemoteSection::SputumDetails => SectionKind::SputumCollection,
        RemoteSection::TbCertificate => SectionKind::TbCertificate,
    }
}

// ============================================================================
// CLIENTS
// ============================================================================

/// Calls made to the persistence API.
#[async_trait]
pub trait PersistenceClient: Send + Sync {
    /// Registers a new application and returns its id.
    async fn create_application(&self) -> PetsResult<ApplicationId>;

    /// Sends a completed section.
    async fn submit(&self, id: ApplicationId, submission: &SectionSubmission) -> PetsResult<()>;

    /// Requests a signed upload URL. `None` when no backend is configured.
    async fn generate_image_upload_url(
        &self,
        id: ApplicationId,
        request: &GenerateImageUploadUrlRequest,
    ) -> PetsResult<Option<GenerateImageUploadUrlResponse>>;

    /// Fetches the backend's copy of an application. `None` if it has none.
    async fn fetch_application(&self, id: ApplicationId) -> PetsResult<Option<ReceivedApplication>>;
}

/// Stand-in used when no persistence API is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPersistence;

#[async_trait]
impl PersistenceClient for NoopPersistence {
    async fn create_application(&self) -> PetsResult<ApplicationId> {
        Ok(ApplicationId::new())
    }

    async fn submit(&self, id: ApplicationId, submission: &SectionSubmission) -> PetsResult<()> {
        tracing::debug!(path = %submission.path(id), "no persistence API configured, skipping submit");
        Ok(())
    }

    async fn generate_image_upload_url(
        &self,
        _id: ApplicationId,
        _request: &GenerateImageUploadUrlRequest,
    ) -> PetsResult<Option<GenerateImageUploadUrlResponse>> {
        Ok(None)
    }

    async fn fetch_application(&self, _id: ApplicationId) -> PetsResult<Option<ReceivedApplication>> {
        Ok(None)
    }
}

/// HTTP client for the persistence API.
#[derive(Debug, Clone)]
pub struct HttpPersistenceClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPersistenceClient {
    /// Creates a client for `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns `PetsError::Http` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> PetsResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        })
    }

    /// Creates a client from config, or `None` if no persistence URL is set.
    pub fn from_config(cfg: &CoreConfig) -> PetsResult<Option<Self>> {
        cfg.persistence_url()
            .map(|url| Self::new(url, cfg.request_timeout()))
            .transpose()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        endpoint: &str,
    ) -> PetsResult<reqwest::Response> {
        check_status(request.send().await?, endpoint)
    }
}

fn check_status(response: reqwest::Response, endpoint: &str) -> PetsResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    tracing::warn!(%status, endpoint, "persistence API rejected request");
    Err(PetsError::Persistence {
        status: status.as_u16(),
        endpoint: endpoint.to_owned(),
    })
}

#[async_trait]
impl PersistenceClient for HttpPersistenceClient {
    async fn create_application(&self) -> PetsResult<ApplicationId> {
        let endpoint = "/application";
        let response = self
            .send(self.client.post(self.url(endpoint)).json(&serde_json::json!({})), endpoint)
            .await?;
        let created: CreatedApplication = response.json().await?;
        Ok(created.application_id)
    }

    async fn submit(&self, id: ApplicationId, submission: &SectionSubmission) -> PetsResult<()> {
        let endpoint = submission.path(id);
        let request = self
            .client
            .request(submission.method(), self.url(&endpoint))
            .json(submission);
        self.send(request, &endpoint).await?;
        tracing::info!(endpoint = %endpoint, "submitted section");
        Ok(())
    }

    async fn generate_image_upload_url(
        &self,
        id: ApplicationId,
        request: &GenerateImageUploadUrlRequest,
    ) -> PetsResult<Option<GenerateImageUploadUrlResponse>> {
        let endpoint = format!("/application/{id}/generate-image-upload-url");
        let response = self
            .send(self.client.post(self.url(&endpoint)).json(request), &endpoint)
            .await?;
        Ok(Some(response.json().await?))
    }

    async fn fetch_application(&self, id: ApplicationId) -> PetsResult<Option<ReceivedApplication>> {
        let endpoint = format!("/application/{id}");
        let response = self.client.get(self.url(&endpoint)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check_status(response, &endpoint)?;
        let body = response.text().await?;
        Ok(Some(ApplicationRecord::parse(&body)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::FieldValue;
    use chrono::Utc;
    use pets_types::DateParts;
    use pets_wire::ImageType;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn completed(pairs: &[(&str, FieldValue)]) -> Section {
        Section {
            status: SectionStatus::Completed,
            data: pairs
                .iter()
                .map(|(key, value)| ((*key).to_owned(), value.clone()))
                .collect(),
            version: 3,
        }
    }

    fn client(server: &MockServer) -> HttpPersistenceClient {
        HttpPersistenceClient::new(server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_not_issued_certificate_payload() {
        let mut app = Application::new(ApplicationId::new(), Utc::now());
        app.set_section(
            SectionKind::TbCertificate,
            completed(&[
                ("willIssueCertificate", "No".into()),
                ("reasonNotIssued", "Confirmed or suspected TB".into()),
                ("declaringPhysicianName", "Dr Jane Smith".into()),
            ]),
        );
        let submission = build_submission(&app, SectionKind::TbCertificate, today()).unwrap();
        assert_eq!(submission.method(), Method::POST);
        assert_eq!(
            serde_json::to_value(&submission).unwrap(),
            json!({
                "isIssued": "No",
                "notIssuedReason": "Confirmed or suspected TB",
                "physicianName": "Dr Jane Smith"
            })
        );
    }

    #[test]
    fn test_sputum_details_are_put_with_version() {
        let mut app = Application::new(ApplicationId::new(), Utc::now());
        app.set_section(
            SectionKind::SputumCollection,
            completed(&[
                ("sample1Date", DateParts::new("10", "3", "2025").into()),
                ("sample1CollectionMethod", "Coughed up".into()),
                ("sample1SmearResult", "Positive".into()),
            ]),
        );
        let submission = build_submission(&app, SectionKind::SputumCollection, today()).unwrap();
        assert_eq!(submission.method(), Method::PUT);
        assert_eq!(
            submission.path(app.id),
            format!("/application/{}/sputum-details", app.id)
        );
        let SectionSubmission::SputumDetails(details) = submission else {
            panic!("expected sputum details");
        };
        assert_eq!(details.version, 3);
        let sample = details.sputum_samples.sample1.unwrap();
        assert_eq!(sample.date_of_sample, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        assert_eq!(sample.date_updated, today());
        assert!(details.sputum_samples.sample2.is_none());
    }

    #[test]
    fn test_medical_payload_carries_xray_not_taken_reason() {
        let mut app = Application::new(ApplicationId::new(), Utc::now());
        app.set_section(
            SectionKind::Medical,
            completed(&[
                ("age", "7".into()),
                ("tbSymptoms", "Yes".into()),
                ("tbSymptomsList", FieldValue::List(vec!["Other symptoms".into()])),
                ("otherSymptomsDetail", "Night sweats".into()),
                ("underElevenConditions", FieldValue::List(vec!["Cyanosis".into()])),
                ("previousTb", "No".into()),
                ("closeContactWithTb", "No".into()),
                ("pregnant", "N/A".into()),
                ("menstrualPeriods", "N/A".into()),
                ("chestXrayTaken", "No".into()),
                ("reasonXrayWasNotTaken", "Other".into()),
                ("xrayWasNotTakenFurtherDetails", "Parent declined".into()),
                ("completionDate", DateParts::new("10", "5", "2025").into()),
            ]),
        );
        let SectionSubmission::MedicalScreening(medical) =
            build_submission(&app, SectionKind::Medical, today()).unwrap()
        else {
            panic!("expected medical screening");
        };
        assert_eq!(medical.age, 7);
        assert_eq!(medical.symptoms_other.as_deref(), Some("Night sweats"));
        assert_eq!(medical.history_of_conditions_under11, vec!["Cyanosis".to_string()]);
        assert_eq!(
            medical.reason_xray_not_required.as_deref(),
            Some("Other: Parent declined")
        );
    }

    #[test]
    fn test_missing_field_is_reported() {
        let app = Application::new(ApplicationId::new(), Utc::now());
        let err = build_submission(&app, SectionKind::Travel, today()).unwrap_err();
        assert!(err.to_string().contains("visaCategory"));
    }

    #[test]
    fn test_backend_statuses_map_to_section_statuses() {
        let received = ApplicationRecord::parse(
            r#"{
                "applicationId": "90a8d1ea318041d9adb070a834d4e0f6",
                "travelInformation": { "status": "completed", "visaCategory": "Work" },
                "sputumRequirement": { "status": "incompleted" }
            }"#,
        )
        .unwrap();
        assert_eq!(
            statuses_from_received(&received),
            vec![
                (SectionKind::Travel, SectionStatus::Completed),
                (SectionKind::SputumDecision, SectionStatus::InProgress),
            ]
        );
    }

    #[tokio::test]
    async fn test_submit_posts_payload() {
        let server = MockServer::start().await;
        let id = ApplicationId::parse("90a8d1ea318041d9adb070a834d4e0f6").unwrap();
        Mock::given(method("POST"))
            .and(path("/application/90a8d1ea318041d9adb070a834d4e0f6/sputum-decision"))
            .and(body_json(json!({ "sputumRequired": "Yes" })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let submission = SectionSubmission::SputumDecision(SputumDecisionPayload {
            sputum_required: YesOrNo::Yes,
        });
        client(&server).submit(id, &submission).await.unwrap();
    }

    #[tokio::test]
    async fn test_non_success_status_is_a_persistence_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let submission = SectionSubmission::SputumDecision(SputumDecisionPayload {
            sputum_required: YesOrNo::No,
        });
        let err = client(&server)
            .submit(ApplicationId::new(), &submission)
            .await
            .unwrap_err();
        assert!(matches!(err, PetsError::Persistence { status: 500, .. }));
        assert!(err.is_persistence_failure());
    }

    #[tokio::test]
    async fn test_create_application_returns_backend_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/application"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "applicationId": "90a8d1ea318041d9adb070a834d4e0f6",
                "dateCreated": "2025-03-10T09:15:00Z"
            })))
            .mount(&server)
            .await;

        let id = client(&server).create_application().await.unwrap();
        assert_eq!(id.to_string(), "90a8d1ea318041d9adb070a834d4e0f6");
    }

    #[tokio::test]
    async fn test_fetch_application_handles_missing_and_present() {
        let server = MockServer::start().await;
        let id = ApplicationId::parse("90a8d1ea318041d9adb070a834d4e0f6").unwrap();
        Mock::given(method("GET"))
            .and(path("/application/90a8d1ea318041d9adb070a834d4e0f6"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "applicationId": "90a8d1ea318041d9adb070a834d4e0f6",
                "medicalScreening": { "status": "completed" }
            })))
            .mount(&server)
            .await;

        let fetched = client(&server).fetch_application(id).await.unwrap().unwrap();
        assert!(fetched.section(RemoteSection::MedicalScreening).is_some());

        let missing = client(&server)
            .fetch_application(ApplicationId::new())
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_generate_image_upload_url() {
        let server = MockServer::start().await;
        let id = ApplicationId::new();
        Mock::given(method("POST"))
            .and(path(format!("/application/{id}/generate-image-upload-url")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "uploadUrl": "https://bucket.example/upload",
                "bucketPath": "xray/pa.dcm"
            })))
            .mount(&server)
            .await;

        let request = GenerateImageUploadUrlRequest {
            file_name: "pa.dcm".into(),
            checksum: None,
            image_type: ImageType::Dicom,
        };
        let response = client(&server)
            .generate_image_upload_url(id, &request)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(response.bucket_path, "xray/pa.dcm");
        assert!(NoopPersistence
            .generate_image_upload_url(id, &request)
            .await
            .unwrap()
            .is_none());
    }
}
