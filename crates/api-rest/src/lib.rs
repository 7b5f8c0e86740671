//! # API REST
//!
//! REST API implementation for PETS.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, status codes)
//!
//! Uses `api-shared` for request/response types. Workflow rules live in `pets-core`;
//! handlers only translate between JSON and core types.

#![warn(rust_2018_idioms)]

use api_shared::{
    ApplicationListItem, CertificateRes, ConsentReq, ConsentRes, CreateApplicationRes, ErrorRes,
    FieldErrorRes,
    HealthRes, HealthService, ListApplicationsRes, SaveSectionReq, SaveSectionRes, SectionRes,
    SummaryRes, TrackerGroupRes, TrackerRes, TrackerTaskRes, UploadRes, ValidationErrorRes,
    WordCountRes,
};
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path as AxumPath, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use pets_core::{
    constants::NO_MATCHING_RECORD_PAGE,
    validation::{count_words, word_count_message},
    ApplicationSummary, CertificateSummary, FieldMap, FieldValue, PetsError, SaveAction,
    SaveOutcome, ScreeningContext, ScreeningService, SearchOutcome, SectionKind, Tracker,
    UploadKind, ValidationErrors,
};
use pets_files::{FilesError, MAX_DICOM_BYTES};
use serde::Deserialize;
use std::collections::BTreeMap;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state for the REST API server
///
/// Holds the screening context shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub ctx: ScreeningContext,
}

impl AppState {
    pub fn new(ctx: ScreeningContext) -> Self {
        Self { ctx }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        list_applications,
        create_application,
        search_applications,
        written_consent,
        get_tracker,
        get_section,
        save_section,
        get_summary,
        upload_file,
        word_count,
    ),
    components(schemas(
        HealthRes,
        CreateApplicationRes,
        ApplicationListItem,
        ListApplicationsRes,
        TrackerRes,
        TrackerGroupRes,
        TrackerTaskRes,
        SectionRes,
        SaveSectionReq,
        SaveSectionRes,
        FieldErrorRes,
        ValidationErrorRes,
        ErrorRes,
        CertificateRes,
        SummaryRes,
        UploadRes,
        WordCountRes,
        ConsentReq,
        ConsentRes,
    ))
)]
pub struct ApiDoc;

/// Largest upload body accepted, so DICOM files up to their own limit reach the
/// file checks instead of axum's default 2 MB cap.
const MAX_UPLOAD_BODY_BYTES: usize = MAX_DICOM_BYTES as usize + 1024 * 1024;

/// Builds the REST router with Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/applications", get(list_applications))
        .route("/applications", post(create_application))
        .route("/applications/search", get(search_applications))
        .route("/consent", post(written_consent))
        .route("/applications/:id/tracker", get(get_tracker))
        .route("/applications/:id/sections/:section", get(get_section))
        .route("/applications/:id/sections/:section", post(save_section))
        .route("/applications/:id/summary", get(get_summary))
        .route(
            "/applications/:id/uploads",
            post(upload_file).layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY_BYTES)),
        )
        .route("/word-count", get(word_count))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ============================================================================
// ERROR MAPPING
// ============================================================================

/// Maps a core error onto a status code and a redirect page.
///
/// Unknown applications and sections are 404 (`/page-not-found`), persistence
/// API failures are 502 and anything else is 500; both of the latter send the
/// user to the service problem page.
fn error_response(context: &str, e: PetsError) -> Response {
    let status = match &e {
        PetsError::ApplicationNotFound(_) | PetsError::UnknownSection(_) | PetsError::Uuid(_) => {
            StatusCode::NOT_FOUND
        }
        PetsError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        e if e.is_persistence_failure() => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        tracing::error!("{}: {:?}", context, e);
    } else {
        tracing::debug!("{}: {}", context, e);
    }

    let redirect = match &e {
        // Malformed ids never name an application.
        PetsError::Uuid(_) => pets_core::constants::PAGE_NOT_FOUND,
        other => other.redirect_page(),
    };
    let message = match status {
        StatusCode::BAD_REQUEST => e.to_string(),
        StatusCode::NOT_FOUND => "Not found".to_owned(),
        _ => "Sorry, there is a problem with the service".to_owned(),
    };

    (
        status,
        Json(ErrorRes {
            message,
            redirect: redirect.to_owned(),
        }),
    )
        .into_response()
}

fn validation_response(errors: &ValidationErrors) -> Response {
    let body = ValidationErrorRes {
        errors: errors
            .errors
            .iter()
            .map(|e| FieldErrorRes {
                field: e.field.clone(),
                message: e.message.clone(),
            })
            .collect(),
        summary: errors.summary().into_iter().map(str::to_owned).collect(),
    };
    (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
}

/// Converts posted JSON values into form values.
///
/// # Errors
///
/// Returns the key of the first value that is not a string, a date object or a
/// list of strings.
fn to_field_map(fields: BTreeMap<String, serde_json::Value>) -> Result<FieldMap, String> {
    fields
        .into_iter()
        .map(|(key, value)| match serde_json::from_value::<FieldValue>(value) {
            Ok(value) => Ok((key, value)),
            Err(_) => Err(key),
        })
        .collect()
}

fn list_res(applications: Vec<ApplicationSummary>) -> ListApplicationsRes {
    ListApplicationsRes {
        applications: applications
            .into_iter()
            .map(|app| ApplicationListItem {
                application_id: app.application_id.to_string(),
                created_at: app.created_at.to_rfc3339(),
                overall_status: app.overall_status.to_string(),
            })
            .collect(),
    }
}

fn tracker_res(application_id: String, tracker: &Tracker) -> TrackerRes {
    TrackerRes {
        application_id,
        overall_status: tracker.overall_status.to_string(),
        groups: tracker
            .groups
            .iter()
            .map(|group| TrackerGroupRes {
                heading: group.heading.to_owned(),
                tasks: group
                    .tasks
                    .iter()
                    .map(|task| TrackerTaskRes {
                        section: task.section.slug().to_owned(),
                        name: task.name.to_owned(),
                        status: task.status.as_str().to_owned(),
                        clickable: task.clickable,
                        link: task.link.to_owned(),
                    })
                    .collect(),
            })
            .collect(),
    }
}

fn certificate_res(summary: CertificateSummary) -> CertificateRes {
    const DISPLAY_DATE: &str = "%-d %B %Y";
    match summary {
        CertificateSummary::Issued {
            certificate_number,
            issue_date,
            expiry_date,
        } => CertificateRes {
            issued: true,
            certificate_number: Some(certificate_number),
            issue_date: Some(issue_date.format(DISPLAY_DATE).to_string()),
            expiry_date: Some(expiry_date.format(DISPLAY_DATE).to_string()),
            reason_not_issued: None,
            physician_name: None,
            comments: None,
        },
        CertificateSummary::NotIssued {
            reason,
            physician_name,
            comments,
        } => CertificateRes {
            issued: false,
            certificate_number: None,
            issue_date: None,
            expiry_date: None,
            reason_not_issued: Some(reason),
            physician_name: Some(physician_name),
            comments,
        },
    }
}

// ============================================================================
// HANDLERS
// ============================================================================

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/applications",
    responses(
        (status = 200, description = "Applications with their overall status", body = ListApplicationsRes),
        (status = 500, description = "Internal server error")
    )
)]
/// List all stored applications, oldest first.
///
/// # Errors
/// Returns `500 Internal Server Error` if the store cannot be read.
#[axum::debug_handler]
async fn list_applications(
    State(state): State<AppState>,
) -> Result<Json<ListApplicationsRes>, (StatusCode, &'static str)> {
    match state.ctx.list_applications().await {
        Ok(applications) => Ok(Json(list_res(applications))),
        Err(e) => {
            tracing::error!("List applications error: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"))
        }
    }
}

#[utoipa::path(
    post,
    path = "/applications",
    responses(
        (status = 201, description = "Application created", body = CreateApplicationRes),
        (status = 502, description = "Persistence API failed"),
        (status = 500, description = "Internal server error")
    )
)]
/// Create a new application with every task not yet started.
///
/// # Errors
/// Returns `502 Bad Gateway` if the persistence API rejects the registration and
/// `500 Internal Server Error` if the application cannot be stored.
#[axum::debug_handler]
async fn create_application(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<CreateApplicationRes>), (StatusCode, &'static str)> {
    match ScreeningService::new(state.ctx.clone()).create().await {
        Ok(service) => Ok((
            StatusCode::CREATED,
            Json(CreateApplicationRes {
                application_id: service.application_id().to_string(),
            }),
        )),
        Err(e) if e.is_persistence_failure() => {
            tracing::error!("Create application error: {:?}", e);
            Err((StatusCode::BAD_GATEWAY, "Persistence API error"))
        }
        Err(e) => {
            tracing::error!("Create application error: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"))
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchQuery {
    #[serde(default)]
    passport_number: String,
    #[serde(default)]
    country_of_issue: String,
}

#[utoipa::path(
    get,
    path = "/applications/search",
    params(
        ("passportNumber" = String, Query, description = "Applicant's passport number"),
        ("countryOfIssue" = String, Query, description = "Country that issued the passport")
    ),
    responses(
        (status = 200, description = "Matching applications", body = ListApplicationsRes),
        (status = 404, description = "No application holds this passport", body = ErrorRes),
        (status = 422, description = "Search form failed validation", body = ValidationErrorRes),
        (status = 500, description = "Internal server error")
    )
)]
/// Find applications by passport number and country of issue.
///
/// When nothing matches the user is sent to the no-matching-record page, which
/// leads on to the written-consent question.
#[axum::debug_handler]
async fn search_applications(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Response {
    match state
        .ctx
        .search_by_passport(&query.passport_number, &query.country_of_issue)
        .await
    {
        Ok(SearchOutcome::Found(found)) if found.is_empty() => (
            StatusCode::NOT_FOUND,
            Json(ErrorRes {
                message: "No Applications found".to_owned(),
                redirect: NO_MATCHING_RECORD_PAGE.to_owned(),
            }),
        )
            .into_response(),
        Ok(SearchOutcome::Found(found)) => Json(list_res(found)).into_response(),
        Ok(SearchOutcome::Invalid(errors)) => validation_response(&errors),
        Err(e) => error_response("Search applications error", e),
    }
}

#[utoipa::path(
    post,
    path = "/consent",
    request_body = ConsentReq,
    responses(
        (status = 200, description = "Page to go to next", body = ConsentRes),
        (status = 422, description = "No answer selected", body = ValidationErrorRes)
    )
)]
/// Answer "Do you have the visa applicant's written consent for TB screening?".
#[axum::debug_handler]
async fn written_consent(
    State(_state): State<AppState>,
    Json(req): Json<ConsentReq>,
) -> Response {
    match pets_core::consent_next_page(&req.consent) {
        Ok(next_page) => Json(ConsentRes {
            next_page: next_page.to_owned(),
        })
        .into_response(),
        Err(errors) => validation_response(&errors),
    }
}

#[utoipa::path(
    get,
    path = "/applications/{id}/tracker",
    params(("id" = String, Path, description = "Application id (32 lowercase hex)")),
    responses(
        (status = 200, description = "Task list with statuses", body = TrackerRes),
        (status = 404, description = "Unknown application", body = ErrorRes)
    )
)]
/// Task list for the tracker page.
#[axum::debug_handler]
async fn get_tracker(State(state): State<AppState>, AxumPath(id): AxumPath<String>) -> Response {
    let result = async {
        let service = ScreeningService::with_id(state.ctx.clone(), &id)?;
        service.tracker().await
    }
    .await;

    match result {
        Ok(tracker) => Json(tracker_res(id, &tracker)).into_response(),
        Err(e) => error_response("Tracker error", e),
    }
}

#[utoipa::path(
    get,
    path = "/applications/{id}/sections/{section}",
    params(
        ("id" = String, Path, description = "Application id"),
        ("section" = String, Path, description = "Section slug, e.g. travel-information")
    ),
    responses(
        (status = 200, description = "Stored section data", body = SectionRes),
        (status = 404, description = "Unknown application or section", body = ErrorRes)
    )
)]
/// Stored answers for one section, used to prefill a form on back-navigation.
#[axum::debug_handler]
async fn get_section(
    State(state): State<AppState>,
    AxumPath((id, section)): AxumPath<(String, String)>,
) -> Response {
    let result = async {
        let kind: SectionKind = section.parse()?;
        let service = ScreeningService::with_id(state.ctx.clone(), &id)?;
        Ok::<_, PetsError>((kind, service.section(kind).await?))
    }
    .await;

    let (kind, section) = match result {
        Ok(found) => found,
        Err(e) => return error_response("Read section error", e),
    };

    let data: Result<BTreeMap<String, serde_json::Value>, _> = section
        .data
        .iter()
        .map(|(key, value)| serde_json::to_value(value).map(|value| (key.clone(), value)))
        .collect();

    match data {
        Ok(data) => Json(SectionRes {
            section: kind.slug().to_owned(),
            status: section.status.as_str().to_owned(),
            version: section.version,
            data,
        })
        .into_response(),
        Err(e) => {
            tracing::error!("Serialise section error: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/applications/{id}/sections/{section}",
    params(
        ("id" = String, Path, description = "Application id"),
        ("section" = String, Path, description = "Section slug")
    ),
    request_body = SaveSectionReq,
    responses(
        (status = 200, description = "Section saved", body = SaveSectionRes),
        (status = 400, description = "Unknown action or malformed field value", body = ErrorRes),
        (status = 404, description = "Unknown application or section", body = ErrorRes),
        (status = 422, description = "Validation failed", body = ValidationErrorRes),
        (status = 502, description = "Persistence API failed; nothing was saved", body = ErrorRes)
    )
)]
/// Save a form with `save-progress` or `save-and-continue`.
///
/// # Returns
/// * `200` - The stored status and version and the page to go to next
/// * `422` - Field errors and the error summary; the section is unchanged
///
/// # Errors
/// Returns `502 Bad Gateway` with a redirect to the service problem page if the
/// persistence API rejects a completed section.
#[axum::debug_handler]
async fn save_section(
    State(state): State<AppState>,
    AxumPath((id, section)): AxumPath<(String, String)>,
    Json(SaveSectionReq { action, fields }): Json<SaveSectionReq>,
) -> Response {
    let fields = match to_field_map(fields) {
        Ok(fields) => fields,
        Err(key) => {
            return error_response(
                "Save section error",
                PetsError::InvalidInput(format!("field '{key}' has an unsupported value")),
            )
        }
    };

    let result = async {
        let kind: SectionKind = section.parse()?;
        let action: SaveAction = action.parse()?;
        let service = ScreeningService::with_id(state.ctx.clone(), &id)?;
        service.save(kind, action, fields).await
    }
    .await;

    match result {
        Ok(SaveOutcome::Saved(saved)) => Json(SaveSectionRes {
            status: saved.section.status.as_str().to_owned(),
            version: saved.section.version,
            next_page: saved.next_page,
        })
        .into_response(),
        Ok(SaveOutcome::Invalid(errors)) => validation_response(&errors),
        Err(e) => error_response("Save section error", e),
    }
}

#[utoipa::path(
    get,
    path = "/applications/{id}/summary",
    params(("id" = String, Path, description = "Application id")),
    responses(
        (status = 200, description = "Certificate summary and sputum outcome", body = SummaryRes),
        (status = 404, description = "Unknown application", body = ErrorRes)
    )
)]
/// Certificate summary and overall sputum outcome.
///
/// `certificate` is absent until the certificate decision has enough answers.
#[axum::debug_handler]
async fn get_summary(State(state): State<AppState>, AxumPath(id): AxumPath<String>) -> Response {
    let result = async {
        let service = ScreeningService::with_id(state.ctx.clone(), &id)?;
        service.summary(Utc::now().date_naive()).await
    }
    .await;

    match result {
        Ok(summary) => Json(SummaryRes {
            certificate: summary.certificate.map(certificate_res),
            sputum_outcome: summary.sputum_outcome.to_string(),
        })
        .into_response(),
        Err(e) => error_response("Summary error", e),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadQuery {
    kind: String,
    file_name: String,
}

fn parse_upload_kind(kind: &str) -> Option<UploadKind> {
    match kind {
        "applicant-photo" => Some(UploadKind::ApplicantPhoto),
        "chest-xray" => Some(UploadKind::ChestXray),
        _ => None,
    }
}

#[utoipa::path(
    post,
    path = "/applications/{id}/uploads",
    params(
        ("id" = String, Path, description = "Application id"),
        ("kind" = String, Query, description = "applicant-photo or chest-xray"),
        ("fileName" = String, Query, description = "Name of the selected file")
    ),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "File accepted", body = UploadRes),
        (status = 400, description = "Unknown upload kind", body = ErrorRes),
        (status = 404, description = "Unknown application", body = ErrorRes),
        (status = 422, description = "File rejected", body = ValidationErrorRes),
        (status = 502, description = "Persistence API failed", body = ErrorRes)
    )
)]
/// Check an applicant photo or chest X-ray and request a signed upload URL.
///
/// Every failed check is reported, so the user sees all problems with a file at once.
#[axum::debug_handler]
async fn upload_file(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> Response {
    let Some(kind) = parse_upload_kind(&query.kind) else {
        return error_response(
            "Upload error",
            PetsError::InvalidInput(format!("unknown upload kind: {}", query.kind)),
        );
    };

    let result = async {
        let service = ScreeningService::with_id(state.ctx.clone(), &id)?;
        service.request_upload(kind, &query.file_name, &body).await
    }
    .await;

    match result {
        Ok(outcome) => Json(UploadRes {
            file_name: outcome.metadata.file_name.to_string(),
            size_bytes: outcome.metadata.size_bytes,
            media_type: outcome.metadata.media_type.map(|m| m.to_string()),
            checksum: outcome.metadata.checksum,
            image_type: match outcome.metadata.image_type {
                pets_wire::ImageType::Photo => "photo".to_owned(),
                pets_wire::ImageType::Dicom => "dicom".to_owned(),
            },
            upload_url: outcome.upload.as_ref().map(|u| u.upload_url.clone()),
            bucket_path: outcome.upload.map(|u| u.bucket_path),
        })
        .into_response(),
        Err(PetsError::Files(FilesError::Rejected { errors, .. })) => {
            let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
            let body = ValidationErrorRes {
                errors: messages
                    .iter()
                    .map(|message| FieldErrorRes {
                        field: "file".to_owned(),
                        message: message.clone(),
                    })
                    .collect(),
                summary: messages,
            };
            (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
        }
        Err(PetsError::Files(e)) => {
            error_response("Upload error", PetsError::InvalidInput(e.to_string()))
        }
        Err(e) => error_response("Upload error", e),
    }
}

#[derive(Debug, Deserialize)]
struct WordCountQuery {
    #[serde(default)]
    text: String,
    limit: usize,
}

#[utoipa::path(
    get,
    path = "/word-count",
    params(
        ("text" = String, Query, description = "Text typed so far"),
        ("limit" = usize, Query, description = "Word limit")
    ),
    responses(
        (status = 200, description = "Live word count hint", body = WordCountRes)
    )
)]
/// Live "words remaining" hint for limited free-text fields.
#[axum::debug_handler]
async fn word_count(
    State(_state): State<AppState>,
    Query(query): Query<WordCountQuery>,
) -> Json<WordCountRes> {
    Json(WordCountRes {
        words: count_words(&query.text),
        limit: query.limit,
        message: word_count_message(&query.text, query.limit),
    })
}
