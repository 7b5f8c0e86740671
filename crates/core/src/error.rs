use crate::constants::{PAGE_NOT_FOUND, SERVICE_PROBLEM_PAGE};

#[derive(Debug, thiserror::Error)]
pub enum PetsError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("application not found: {0}")]
    ApplicationNotFound(String),
    #[error("unknown section: {0}")]
    UnknownSection(String),
    #[error("invalid application id: {0}")]
    Uuid(#[from] pets_uuid::UuidError),
    #[error("invalid text: {0}")]
    Text(#[from] pets_types::TextError),
    #[error("wire error: {0}")]
    Wire(#[from] pets_wire::WireError),
    #[error("upload error: {0}")]
    Files(#[from] pets_files::FilesError),

    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to write application file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to read application file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to serialize YAML: {0}")]
    YamlSerialization(serde_yaml::Error),
    #[error("failed to deserialize YAML: {0}")]
    YamlDeserialization(serde_yaml::Error),

    #[error("persistence request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("persistence API returned {status} for {endpoint}")]
    Persistence { status: u16, endpoint: String },
}

impl PetsError {
    /// Page the user is sent to when this error ends a request.
    pub fn redirect_page(&self) -> &'static str {
        match self {
            PetsError::ApplicationNotFound(_) | PetsError::UnknownSection(_) => PAGE_NOT_FOUND,
            _ => SERVICE_PROBLEM_PAGE,
        }
    }

    /// True for failures of the external persistence API.
    pub fn is_persistence_failure(&self) -> bool {
        matches!(self, PetsError::Http(_) | PetsError::Persistence { .. })
    }
}

pub type PetsResult<T> = std::result::Result<T, PetsError>;
