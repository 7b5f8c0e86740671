//! Screening workflow service.
//!
//! `ScreeningService` drives one application through the workflow. It uses a
//! type-state so that operations needing an application id are only available
//! once one exists:
//! - `ScreeningService<Uninitialised>` can only create an application.
//! - `ScreeningService<Initialised>` works on an existing application.
//!
//! Saves are applied to a copy of the stored application. Branch rules are then
//! re-applied, a completed section is submitted to the persistence API, and only
//! then is the copy written back. A failed submission leaves the store unchanged.
//! Writes to one application are serialised so concurrent saves cannot overwrite
//! each other.

use crate::application::Application;
use crate::branching::{apply_branches, certificate_summary, sputum_outcome, CertificateSummary, SputumOutcome};
use crate::config::CoreConfig;
use crate::lookup::{matches_passport, validate_search};
use crate::persistence::{
    build_submission, statuses_from_received, HttpPersistenceClient, NoopPersistence,
    PersistenceClient,
};
use crate::section_state::{apply_save, SaveAction, Saved, ValidationErrors};
use crate::sections::{FieldMap, Section, SectionKind, SectionStatus};
use crate::stores::{ApplicationStore, FileStore, InMemoryStore};
use crate::tracker::{ScreeningStatus, Tracker};
use crate::{PetsError, PetsResult};
use chrono::{DateTime, NaiveDate, Utc};
use pets_files::{UploadKind, UploadMetadata, UploadService};
use pets_uuid::ApplicationId;
use pets_wire::{GenerateImageUploadUrlRequest, GenerateImageUploadUrlResponse};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One write lock per application.
#[derive(Default)]
struct ApplicationLocks {
    locks: Mutex<HashMap<ApplicationId, Arc<Mutex<()>>>>,
}

impl ApplicationLocks {
    async fn acquire(&self, id: ApplicationId) -> OwnedMutexGuard<()> {
        let lock = self.locks.lock().await.entry(id).or_default().clone();
        lock.lock_owned().await
    }
}

/// Shared dependencies of the screening service.
#[derive(Clone)]
pub struct ScreeningContext {
    store: Arc<dyn ApplicationStore>,
    persistence: Arc<dyn PersistenceClient>,
    uploads: UploadService,
    locks: Arc<ApplicationLocks>,
}

impl ScreeningContext {
    pub fn new(store: Arc<dyn ApplicationStore>, persistence: Arc<dyn PersistenceClient>) -> Self {
        Self {
            store,
            persistence,
            uploads: UploadService::default(),
            locks: Arc::default(),
        }
    }

    /// In-memory store with no persistence API.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStore::new()), Arc::new(NoopPersistence))
    }

    /// Builds the context described by `cfg`.
    ///
    /// Uses a [`FileStore`] when a data directory is configured and an
    /// [`HttpPersistenceClient`] when a persistence URL is configured.
    ///
    /// # Errors
    ///
    /// Returns `PetsError` if the storage directory cannot be created or the HTTP
    /// client cannot be built.
    pub fn from_config(cfg: &CoreConfig) -> PetsResult<Self> {
        let store: Arc<dyn ApplicationStore> = match cfg.applications_dir() {
            Some(dir) => Arc::new(FileStore::open(dir)?),
            None => Arc::new(InMemoryStore::new()),
        };
        let persistence: Arc<dyn PersistenceClient> = match HttpPersistenceClient::from_config(cfg)? {
            Some(client) => Arc::new(client),
            None => Arc::new(NoopPersistence),
        };
        Ok(Self::new(store, persistence))
    }

    /// Lists stored applications with their overall status.
    pub async fn list_applications(&self) -> PetsResult<Vec<ApplicationSummary>> {
        let applications = self.store.list().await?;
        Ok(applications.iter().map(ApplicationSummary::of).collect())
    }

    /// Finds applications whose applicant details hold this passport.
    ///
    /// # Returns
    ///
    /// `SearchOutcome::Invalid` if the search form fails validation, otherwise the
    /// matches in creation order. No match is `Found` with an empty list.
    pub async fn search_by_passport(
        &self,
        passport_number: &str,
        country_of_issue: &str,
    ) -> PetsResult<SearchOutcome> {
        if let Err(errors) = validate_search(passport_number, country_of_issue) {
            return Ok(SearchOutcome::Invalid(errors));
        }
        let applications = self.store.list().await?;
        let found: Vec<ApplicationSummary> = applications
            .iter()
            .filter(|app| matches_passport(app, passport_number, country_of_issue))
            .map(ApplicationSummary::of)
            .collect();
        tracing::debug!(matches = found.len(), "searched applications by passport");
        Ok(SearchOutcome::Found(found))
    }
}

/// One row of the application list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationSummary {
    pub application_id: ApplicationId,
    pub created_at: DateTime<Utc>,
    pub overall_status: ScreeningStatus,
}

impl ApplicationSummary {
    fn of(app: &Application) -> Self {
        Self {
            application_id: app.id,
            created_at: app.created_at,
            overall_status: Tracker::for_application(app).overall_status,
        }
    }
}

/// Result of a passport search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(Vec<ApplicationSummary>),
    Invalid(ValidationErrors),
}

/// Result of a save request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(Saved),
    Invalid(ValidationErrors),
}

/// What the summary pages show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreeningSummary {
    pub certificate: Option<CertificateSummary>,
    pub sputum_outcome: SputumOutcome,
}

/// An accepted upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub metadata: UploadMetadata,
    /// Signed URL from the persistence API, if one is configured.
    pub upload: Option<GenerateImageUploadUrlResponse>,
}

#[derive(Clone, Copy, Debug)]
pub struct Uninitialised;

#[derive(Clone, Copy, Debug)]
pub struct Initialised {
    application_id: ApplicationId,
}

pub struct ScreeningService<S> {
    ctx: ScreeningContext,
    state: S,
}

impl ScreeningService<Uninitialised> {
    pub fn new(ctx: ScreeningContext) -> Self {
        Self {
            ctx,
            state: Uninitialised,
        }
    }

    /// Creates an application with every section not yet started.
    ///
    /// The id comes from the persistence API when one is configured.
    ///
    /// # Errors
    ///
    /// Returns `PetsError` if the persistence API rejects the request or the store
    /// cannot save the application.
    pub async fn create(self) -> PetsResult<ScreeningService<Initialised>> {
        let application_id = self.ctx.persistence.create_application().await?;
        let application = Application::new(application_id, Utc::now());
        self.ctx.store.create(&application).await?;
        tracing::info!(%application_id, "created application");

        Ok(ScreeningService {
            ctx: self.ctx,
            state: Initialised { application_id },
        })
    }
}

impl ScreeningService<Initialised> {
    /// Works on an existing application.
    ///
    /// # Errors
    ///
    /// Returns `PetsError::Uuid` if `application_id` is not canonical.
    pub fn with_id(ctx: ScreeningContext, application_id: &str) -> PetsResult<Self> {
        let application_id = ApplicationId::parse(application_id)?;
        Ok(Self {
            ctx,
            state: Initialised { application_id },
        })
    }

    pub fn application_id(&self) -> ApplicationId {
        self.state.application_id
    }

    /// Loads the application.
    ///
    /// # Errors
    ///
    /// Returns `PetsError::ApplicationNotFound` if it does not exist.
    pub async fn application(&self) -> PetsResult<Application> {
        self.ctx
            .store
            .get(self.state.application_id)
            .await?
            .ok_or_else(|| PetsError::ApplicationNotFound(self.state.application_id.to_string()))
    }

    pub async fn tracker(&self) -> PetsResult<Tracker> {
        Ok(Tracker::for_application(&self.application().await?))
    }

    /// Stored state of one section, as last saved.
    pub async fn section(&self, kind: SectionKind) -> PetsResult<Section> {
        Ok(self.application().await?.section(kind))
    }

    /// Saves a form using today's date for date rules.
    pub async fn save(
        &self,
        kind: SectionKind,
        action: SaveAction,
        fields: FieldMap,
    ) -> PetsResult<SaveOutcome> {
        self.save_on(kind, action, fields, Utc::now().date_naive()).await
    }

    /// Saves a form.
    ///
    /// # Arguments
    ///
    /// * `kind` - Section the form belongs to
    /// * `action` - How the form was submitted
    /// * `fields` - Submitted fields, merged over the stored data
    /// * `today` - Reference date for date rules and payload dates
    ///
    /// # Returns
    ///
    /// `SaveOutcome::Invalid` with field errors if validation fails; nothing is
    /// stored in that case. Otherwise the section as stored and the next page.
    ///
    /// # Errors
    ///
    /// Returns `PetsError::ApplicationNotFound` for an unknown application, and a
    /// persistence error if the backend rejects a completed section.
    pub async fn save_on(
        &self,
        kind: SectionKind,
        action: SaveAction,
        fields: FieldMap,
        today: NaiveDate,
    ) -> PetsResult<SaveOutcome> {
        let _guard = self.ctx.locks.acquire(self.state.application_id).await;
        let mut application = self.application().await?;
        let current = application.section(kind);

        let saved = match apply_save(kind, &current, action, fields, today) {
            Ok(saved) => saved,
            Err(errors) => {
                tracing::debug!(section = %kind, errors = errors.errors.len(), "section failed validation");
                return Ok(SaveOutcome::Invalid(errors));
            }
        };

        application.set_section(kind, saved.section);
        apply_branches(&mut application);

        if action == SaveAction::SaveAndContinue {
            let submission = build_submission(&application, kind, today)?;
            self.ctx
                .persistence
                .submit(application.id, &submission)
                .await?;
        }

        self.ctx.store.put(&application).await?;
        let section = application.section(kind);
        if section.status == SectionStatus::Completed {
            tracing::info!(application_id = %application.id, section = %kind, version = section.version, "section completed");
        }

        Ok(SaveOutcome::Saved(Saved {
            section,
            next_page: saved.next_page,
        }))
    }

    /// Certificate summary and sputum outcome.
    pub async fn summary(&self, today: NaiveDate) -> PetsResult<ScreeningSummary> {
        let application = self.application().await?;
        Ok(ScreeningSummary {
            certificate: certificate_summary(&application, today),
            sputum_outcome: sputum_outcome(&application),
        })
    }

    /// Checks an image and, when a persistence API is configured, requests a
    /// signed upload URL for it.
    ///
    /// # Errors
    ///
    /// Returns `PetsError::Files` if the file is rejected.
    pub async fn request_upload(
        &self,
        kind: UploadKind,
        file_name: &str,
        bytes: &[u8],
    ) -> PetsResult<UploadOutcome> {
        // Confirms the application exists before talking to the backend.
        self.application().await?;
        let metadata = self.ctx.uploads.check(kind, file_name, bytes)?;
        let request = GenerateImageUploadUrlRequest {
            file_name: metadata.file_name.to_string(),
            checksum: Some(metadata.checksum.clone()),
            image_type: metadata.image_type,
        };
        let upload = self
            .ctx
            .persistence
            .generate_image_upload_url(self.state.application_id, &request)
            .await?;
        Ok(UploadOutcome { metadata, upload })
    }

    /// Replaces local section statuses with the persistence API's view.
    ///
    /// # Returns
    ///
    /// `false` if the backend has no record of the application.
    pub async fn refresh_from_backend(&self) -> PetsResult<bool> {
        let _guard = self.ctx.locks.acquire(self.state.application_id).await;
        let Some(received) = self
            .ctx
            .persistence
            .fetch_application(self.state.application_id)
            .await?
        else {
            return Ok(false);
        };

        let mut application = self.application().await?;
        for (kind, status) in statuses_from_received(&received) {
            application.set_status(kind, status);
        }
        apply_branches(&mut application);
        self.ctx.store.put(&application).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::FieldValue;
    use crate::tracker::TaskStatus;
    use async_trait::async_trait;
    use pets_types::DateParts;
    use pets_wire::ReceivedApplication;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn text(pairs: &[(&str, &str)]) -> FieldMap {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), FieldValue::from(*value)))
            .collect()
    }

    fn with_date(mut fields: FieldMap, key: &str, day: &str, month: &str, year: &str) -> FieldMap {
        fields.insert(key.to_owned(), DateParts::new(day, month, year).into());
        fields
    }

    async fn new_service() -> ScreeningService<Initialised> {
        ScreeningService::new(ScreeningContext::in_memory())
            .create()
            .await
            .unwrap()
    }

    async fn complete(service: &ScreeningService<Initialised>, kind: SectionKind, fields: FieldMap) -> Saved {
        match service
            .save_on(kind, SaveAction::SaveAndContinue, fields, today())
            .await
            .unwrap()
        {
            SaveOutcome::Saved(saved) => saved,
            SaveOutcome::Invalid(errors) => panic!("{kind} rejected: {:?}", errors.summary()),
        }
    }

    fn applicant_details() -> FieldMap {
        let fields = text(&[
            ("fullName", "Jane Doe"),
            ("sex", "Female"),
            ("countryOfNationality", "Ghana"),
            ("passportNumber", "AB1234567"),
            ("countryOfIssue", "Ghana"),
            ("applicantHomeAddress1", "1 High Street"),
            ("townOrCity", "Accra"),
            ("provinceOrState", "Greater Accra"),
            ("country", "Ghana"),
        ]);
        let fields = with_date(fields, "dateOfBirth", "1", "1", "1990");
        let fields = with_date(fields, "passportIssueDate", "1", "1", "2020");
        with_date(fields, "passportExpiryDate", "1", "1", "2030")
    }

    fn medical_screening() -> FieldMap {
        let mut fields = text(&[
            ("age", "30"),
            ("tbSymptoms", "Yes"),
            ("previousTb", "No"),
            ("closeContactWithTb", "No"),
            ("pregnant", "No"),
            ("menstrualPeriods", "N/A"),
            ("chestXrayTaken", "Yes"),
        ]);
        fields.insert("tbSymptomsList".into(), FieldValue::List(vec!["Cough".into()]));
        with_date(fields, "completionDate", "10", "5", "2025")
    }

    fn sputum_collection() -> FieldMap {
        let mut fields = FieldMap::new();
        for (n, day) in [(1, "13"), (2, "14"), (3, "15")] {
            fields = with_date(fields, &format!("sample{n}Date"), day, "5", "2025");
            for (suffix, value) in [
                ("CollectionMethod", "Coughed up"),
                ("SmearResult", "Positive"),
                ("CultureResult", "Positive"),
            ] {
                fields.insert(format!("sample{n}{suffix}"), value.into());
            }
        }
        fields
    }

    #[tokio::test]
    async fn test_full_screening_without_certificate() {
        let service = new_service().await;

        complete(&service, SectionKind::ApplicantDetails, applicant_details()).await;
        complete(&service, SectionKind::Travel, text(&[("visaCategory", "Work")])).await;
        complete(&service, SectionKind::Medical, medical_screening()).await;
        complete(
            &service,
            SectionKind::ChestXray,
            with_date(
                text(&[("posteroAnteriorXrayFileName", "pa.dcm")]),
                "dateXrayTaken",
                "12",
                "5",
                "2025",
            ),
        )
        .await;
        complete(
            &service,
            SectionKind::RadiologicalOutcome,
            text(&[
                ("xrayResult", "Old or active TB"),
                ("xrayActiveTbFindings", "Cavity, Consolidation"),
            ]),
        )
        .await;
        complete(&service, SectionKind::SputumDecision, text(&[("isSputumRequired", "Yes")])).await;
        let sputum = complete(&service, SectionKind::SputumCollection, sputum_collection()).await;
        assert_eq!(sputum.next_page, "/check-sputum-collection-details-results");

        let certificate = complete(
            &service,
            SectionKind::TbCertificate,
            text(&[
                ("willIssueCertificate", "No"),
                ("reasonNotIssued", "Confirmed or suspected TB"),
                ("declaringPhysicianName", "Dr Jane Smith"),
            ]),
        )
        .await;
        assert_eq!(certificate.next_page, "/tb-certificate-summary");

        let tracker = service.tracker().await.unwrap();
        assert_eq!(tracker.overall_status, ScreeningStatus::CertificateNotIssued);
        let statuses: Vec<TaskStatus> = tracker.tasks().map(|task| task.status).collect();
        assert_eq!(&statuses[..7], &[TaskStatus::Completed; 7]);
        assert_eq!(statuses[7], TaskStatus::CertificateNotIssued);

        let summary = service.summary(today()).await.unwrap();
        assert_eq!(summary.sputum_outcome, SputumOutcome::Positive);
        assert!(matches!(
            summary.certificate,
            Some(CertificateSummary::NotIssued { .. })
        ));
    }

    #[tokio::test]
    async fn test_invalid_save_leaves_section_unchanged() {
        let service = new_service().await;
        service
            .save_on(
                SectionKind::SputumCollection,
                SaveAction::SaveProgress,
                text(&[("sample1CollectionMethod", "Induced")]),
                today(),
            )
            .await
            .unwrap();
        let before = service.section(SectionKind::SputumCollection).await.unwrap();

        let outcome = service
            .save_on(
                SectionKind::SputumCollection,
                SaveAction::SaveAndContinue,
                with_date(FieldMap::new(), "sample1Date", "32", "13", "2024"),
                today(),
            )
            .await
            .unwrap();
        let SaveOutcome::Invalid(errors) = outcome else {
            panic!("expected validation errors");
        };
        assert_eq!(
            errors.for_field("sample1Date"),
            Some("Sputum sample 1 date must be a real date")
        );
        assert_eq!(service.section(SectionKind::SputumCollection).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_back_navigation_returns_saved_data() {
        let service = new_service().await;
        service
            .save_on(
                SectionKind::Travel,
                SaveAction::SaveProgress,
                text(&[("ukAddressLine1", "10 Downing Street")]),
                today(),
            )
            .await
            .unwrap();
        let section = service.section(SectionKind::Travel).await.unwrap();
        assert_eq!(section.status, SectionStatus::InProgress);
        assert_eq!(section.version, 1);
        assert_eq!(section.text("ukAddressLine1"), Some("10 Downing Street"));
    }

    #[tokio::test]
    async fn test_sputum_no_marks_collection_not_required() {
        let service = new_service().await;
        complete(&service, SectionKind::SputumDecision, text(&[("isSputumRequired", "No")])).await;
        let tracker = service.tracker().await.unwrap();
        assert_eq!(
            tracker.task(SectionKind::SputumCollection).unwrap().status,
            TaskStatus::NotRequired
        );
        let stored = service.application().await.unwrap();
        assert_eq!(stored.status(SectionKind::SputumCollection), SectionStatus::NotRequired);
    }

    struct FailingPersistence;

    #[async_trait]
    impl PersistenceClient for FailingPersistence {
        async fn create_application(&self) -> PetsResult<ApplicationId> {
            Ok(ApplicationId::new())
        }

        async fn submit(&self, id: ApplicationId, submission: &crate::persistence::SectionSubmission) -> PetsResult<()> {
            Err(PetsError::Persistence {
                status: 503,
                endpoint: submission.path(id),
            })
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

    #[tokio::test]
    async fn test_persistence_failure_is_not_stored() {
        let ctx = ScreeningContext::new(Arc::new(InMemoryStore::new()), Arc::new(FailingPersistence));
        let service = ScreeningService::new(ctx).create().await.unwrap();

        let err = service
            .save_on(
                SectionKind::Travel,
                SaveAction::SaveAndContinue,
                text(&[("visaCategory", "Study")]),
                today(),
            )
            .await
            .unwrap_err();
        assert!(err.is_persistence_failure());
        assert_eq!(err.redirect_page(), "/sorry-there-is-problem-with-service");

        let section = service.section(SectionKind::Travel).await.unwrap();
        assert_eq!(section.status, SectionStatus::NotYetStarted);
        assert_eq!(section.version, 0);
    }

    #[tokio::test]
    async fn test_unknown_application_is_not_found() {
        let service = ScreeningService::with_id(
            ScreeningContext::in_memory(),
            "550e8400e29b41d4a716446655440000",
        )
        .unwrap();
        assert!(matches!(
            service.tracker().await,
            Err(PetsError::ApplicationNotFound(_))
        ));
        assert!(ScreeningService::with_id(ScreeningContext::in_memory(), "nope").is_err());
    }

    #[tokio::test]
    async fn test_upload_is_checked() {
        let service = new_service().await;
        let err = service
            .request_upload(UploadKind::ApplicantPhoto, "photo.gif", b"GIF89a")
            .await
            .unwrap_err();
        assert!(matches!(err, PetsError::Files(_)));

        let mut dicom = vec![0u8; 128];
        dicom.extend_from_slice(b"DICM");
        let outcome = service
            .request_upload(UploadKind::ChestXray, "pa.dcm", &dicom)
            .await
            .unwrap();
        assert_eq!(outcome.metadata.size_bytes, 132);
        assert!(outcome.upload.is_none());
    }

    struct SlowPersistence;

    #[async_trait]
    impl PersistenceClient for SlowPersistence {
        async fn create_application(&self) -> PetsResult<ApplicationId> {
            Ok(ApplicationId::new())
        }

        async fn submit(&self, _id: ApplicationId, _submission: &crate::persistence::SectionSubmission) -> PetsResult<()> {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
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

    #[tokio::test]
    async fn test_concurrent_saves_to_one_application_are_all_kept() {
        let ctx = ScreeningContext::new(Arc::new(InMemoryStore::new()), Arc::new(SlowPersistence));
        let service = ScreeningService::new(ctx.clone()).create().await.unwrap();
        let other = ScreeningService::with_id(ctx, &service.application_id().to_string()).unwrap();

        let (travel, sputum) = tokio::join!(
            service.save_on(
                SectionKind::Travel,
                SaveAction::SaveAndContinue,
                text(&[("visaCategory", "Work")]),
                today(),
            ),
            other.save_on(
                SectionKind::SputumDecision,
                SaveAction::SaveAndContinue,
                text(&[("isSputumRequired", "Yes")]),
                today(),
            ),
        );
        assert!(matches!(travel.unwrap(), SaveOutcome::Saved(_)));
        assert!(matches!(sputum.unwrap(), SaveOutcome::Saved(_)));

        let stored = service.application().await.unwrap();
        assert_eq!(stored.status(SectionKind::Travel), SectionStatus::Completed);
        assert_eq!(stored.status(SectionKind::SputumDecision), SectionStatus::Completed);
    }

    #[tokio::test]
    async fn test_search_by_passport() {
        let ctx = ScreeningContext::in_memory();
        let service = ScreeningService::new(ctx.clone()).create().await.unwrap();
        ScreeningService::new(ctx.clone()).create().await.unwrap();
        complete(&service, SectionKind::ApplicantDetails, applicant_details()).await;

        let SearchOutcome::Found(found) = ctx.search_by_passport("ab1234567", "Ghana").await.unwrap() else {
            panic!("expected a search result");
        };
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].application_id, service.application_id());

        let SearchOutcome::Found(none) = ctx.search_by_passport("ZZ999", "Ghana").await.unwrap() else {
            panic!("expected a search result");
        };
        assert!(none.is_empty());

        let SearchOutcome::Invalid(errors) = ctx.search_by_passport("", "Ghana").await.unwrap() else {
            panic!("expected validation errors");
        };
        assert_eq!(
            errors.for_field("passportNumber"),
            Some("Enter the applicant's passport number.")
        );
    }

    #[tokio::test]
    async fn test_list_applications_reports_status() {
        let ctx = ScreeningContext::in_memory();
        ScreeningService::new(ctx.clone()).create().await.unwrap();
        ScreeningService::new(ctx.clone()).create().await.unwrap();
        let listed = ctx.list_applications().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed
            .iter()
            .all(|summary| summary.overall_status == ScreeningStatus::InProgress));
    }
}
