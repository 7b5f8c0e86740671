//! PETS upload checks
//!
//! Applicant photos and chest X-ray images are stored by an external file service.
//! Before an upload URL is requested, the file is checked here:
//!
//! - the extension must match the kind of upload,
//! - the file must not be empty or exceed the size limit for its format,
//! - the content must actually be an image (sniffed with `infer`) or a DICOM object.
//!
//! Accepted files yield [`UploadMetadata`] with a SHA-256 checksum that is sent with the
//! `generate-image-upload-url` request.
//!
//! ## Example Usage
//!
//! ```no_run
//! use pets_files::{UploadKind, UploadService};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let service = UploadService::default();
//! let metadata = service.check_file(UploadKind::ChestXray, Path::new("pa-view.dcm"))?;
//! println!("{} {}", metadata.file_name, metadata.checksum);
//! # Ok(())
//! # }
//! ```

mod constants;
mod files;

pub use constants::{DICOM_EXTENSIONS, MAX_DICOM_BYTES, MAX_PHOTO_BYTES, PHOTO_EXTENSIONS};
pub use files::{UploadKind, UploadMetadata, UploadService};

/// A reason an upload was rejected. `Display` is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("The selected file must be a JPG, JPEG or PNG")]
    NotPhoto,
    #[error("The selected file must be a DICOM file")]
    NotDicom,
    #[error("The selected file must be smaller than 10MB")]
    PhotoTooLarge,
    #[error("The selected file must be smaller than 50MB")]
    DicomTooLarge,
    #[error("The selected file is empty")]
    Empty,
    #[error("The selected file is an invalid JPG, JPEG or PNG file")]
    InvalidPhoto,
    #[error("The selected file is password protected or is an invalid DICOM file")]
    InvalidDicom,
}

/// Errors that can occur during file checks
#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    /// The file failed one or more upload checks
    #[error("{file_name}: {}", join_messages(.errors))]
    Rejected {
        file_name: String,
        errors: Vec<UploadError>,
    },

    /// Path does not name a file
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn join_messages(errors: &[UploadError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
