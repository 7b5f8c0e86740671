//! # PETS Core
//!
//! Core business logic for pre-entry TB screening.
//!
//! This crate contains the workflow rules and storage:
//! - Section records and per-field validation
//! - Save transitions (`save-progress` / `save-and-continue`)
//! - The task sequencer behind the tracker page
//! - Branching between sections and the certificate outcome
//! - Application stores (in memory or sharded YAML files)
//! - The client for the external persistence API
//! - Passport search and the written-consent question
//!
//! **No API concerns**: HTTP servers and request/response types belong in
//! `api-rest` and `api-shared`.

pub mod application;
pub mod branching;
pub mod config;
pub mod constants;
pub mod error;
pub mod lookup;
pub mod persistence;
pub mod screening;
pub mod section_state;
pub mod sections;
pub mod stores;
pub mod tracker;
pub mod validation;

pub use application::Application;
pub use branching::{
    apply_branches, certificate_expiry, certificate_summary, sputum_outcome, BranchFlags,
    CertificateOutcome, CertificateSummary, SputumOutcome,
};
pub use config::CoreConfig;
pub use error::{PetsError, PetsResult};
pub use lookup::{consent_next_page, matches_passport, validate_search};
pub use persistence::{HttpPersistenceClient, NoopPersistence, PersistenceClient, SectionSubmission};
pub use screening::{
    ApplicationSummary, Initialised, SaveOutcome, ScreeningContext, ScreeningService, SearchOutcome,
    ScreeningSummary, Uninitialised, UploadOutcome,
};
pub use section_state::{apply_save, SaveAction, Saved, ValidationErrors};
pub use sections::fields::FieldError;
pub use sections::{FieldMap, FieldValue, Section, SectionKind, SectionStatus};
pub use stores::{ApplicationStore, FileStore, InMemoryStore};
pub use tracker::{sequence_tasks, ScreeningStatus, TaskInput, TaskState, TaskStatus, Tracker};

pub use pets_files::{UploadKind, UploadMetadata};
pub use pets_types::DateParts;
pub use pets_uuid::ApplicationId;
