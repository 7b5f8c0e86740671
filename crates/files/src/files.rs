//! Upload check implementation
//!
//! [`UploadService`] applies the upload rules in a fixed order and collects every
//! failure, so a user sees all problems with a file at once:
//!
//! 1. extension matches the upload kind
//! 2. size is within the limit for the detected format
//! 3. the file is not empty
//! 4. the content is a real image or DICOM object
//!
//! The content check is skipped for empty files and for files whose extension is
//! not recognised at all.

use crate::constants::{DICOM_MAGIC, DICOM_MAGIC_OFFSET};
use crate::{
    FilesError, UploadError, DICOM_EXTENSIONS, MAX_DICOM_BYTES, MAX_PHOTO_BYTES,
    PHOTO_EXTENSIONS,
};
use pets_types::NonEmptyText;
use pets_wire::ImageType;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// What the file is being uploaded as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    /// Applicant photo: JPG, JPEG or PNG only.
    ApplicantPhoto,
    /// Chest X-ray view: DICOM, or a JPG/JPEG/PNG export.
    ChestXray,
}

/// Format inferred from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DetectedFormat {
    Photo,
    Dicom,
}

/// Metadata for an accepted upload.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct UploadMetadata {
    /// Original filename
    pub file_name: NonEmptyText,

    /// Size of the file in bytes
    pub size_bytes: u64,

    /// Sniffed media type, if recognised.
    ///
    /// Best-effort only; DICOM objects are reported as `application/dicom`.
    pub media_type: Option<NonEmptyText>,

    /// Lowercase hex SHA-256 digest of the content
    pub checksum: String,

    /// Image type reported to the upload URL endpoint
    pub image_type: ImageType,
}

/// Checks files before upload.
///
/// Limits default to 10MB for photos and 50MB for DICOM.
#[derive(Debug, Clone)]
pub struct UploadService {
    max_photo_bytes: u64,
    max_dicom_bytes: u64,
}

impl Default for UploadService {
    fn default() -> Self {
        Self {
            max_photo_bytes: MAX_PHOTO_BYTES,
            max_dicom_bytes: MAX_DICOM_BYTES,
        }
    }
}

impl UploadService {
    /// Creates a service with custom size limits.
    pub fn with_limits(max_photo_bytes: u64, max_dicom_bytes: u64) -> Self {
        Self {
            max_photo_bytes,
            max_dicom_bytes,
        }
    }

    /// Checks an in-memory upload.
    ///
    /// # Arguments
    ///
    /// * `kind` - What the file is being uploaded as
    /// * `file_name` - Name of the file as selected by the user
    /// * `bytes` - Full file content
    ///
    /// # Returns
    ///
    /// [`UploadMetadata`] for an accepted file.
    ///
    /// # Errors
    ///
    /// Returns [`FilesError::Rejected`] listing every failed check, or
    /// [`FilesError::InvalidPath`] if `file_name` is blank.
    pub fn check(
        &self,
        kind: UploadKind,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<UploadMetadata, FilesError> {
        let name = NonEmptyText::new(file_name)
            .map_err(|_| FilesError::InvalidPath("file name cannot be empty".into()))?;

        let format = detect_format(name.as_str());
        let size = bytes.len() as u64;
        let mut errors = Vec::new();

        match (kind, format) {
            (UploadKind::ApplicantPhoto, Some(DetectedFormat::Photo)) => {}
            (UploadKind::ApplicantPhoto, _) => errors.push(UploadError::NotPhoto),
            (UploadKind::ChestXray, Some(_)) => {}
            (UploadKind::ChestXray, None) => errors.push(UploadError::NotDicom),
        }

        match format {
            Some(DetectedFormat::Dicom) if size > self.max_dicom_bytes => {
                errors.push(UploadError::DicomTooLarge)
            }
            Some(DetectedFormat::Photo) if size > self.max_photo_bytes => {
                errors.push(UploadError::PhotoTooLarge)
            }
            _ => {}
        }

        if size == 0 {
            errors.push(UploadError::Empty);
        } else {
            match format {
                Some(DetectedFormat::Photo) if !is_photo(bytes) => {
                    errors.push(UploadError::InvalidPhoto)
                }
                Some(DetectedFormat::Dicom) if !is_dicom(bytes) => {
                    errors.push(UploadError::InvalidDicom)
                }
                _ => {}
            }
        }

        if !errors.is_empty() {
            return Err(FilesError::Rejected {
                file_name: name.to_string(),
                errors,
            });
        }

        let media_type = match format {
            Some(DetectedFormat::Dicom) => NonEmptyText::new("application/dicom").ok(),
            _ => infer::get(bytes).and_then(|kind| NonEmptyText::new(kind.mime_type()).ok()),
        };

        let image_type = match format {
            Some(DetectedFormat::Dicom) => ImageType::Dicom,
            _ => ImageType::Photo,
        };

        Ok(UploadMetadata {
            file_name: name,
            size_bytes: size,
            media_type,
            checksum: sha256_hex(bytes),
            image_type,
        })
    }

    /// Reads a file from disk and checks it.
    ///
    /// # Errors
    ///
    /// Returns `FilesError` if the path has no file name, the file cannot be read,
    /// or the content fails the checks in [`UploadService::check`].
    pub fn check_file(&self, kind: UploadKind, path: &Path) -> Result<UploadMetadata, FilesError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| FilesError::InvalidPath(path.display().to_string()))?;

        let bytes = fs::read(path).map_err(|e| {
            FilesError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read upload {}: {}", path.display(), e),
            ))
        })?;

        self.check(kind, file_name, &bytes)
    }
}

fn detect_format(file_name: &str) -> Option<DetectedFormat> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())?
        .to_ascii_lowercase();

    if PHOTO_EXTENSIONS.contains(&extension.as_str()) {
        Some(DetectedFormat::Photo)
    } else if DICOM_EXTENSIONS.contains(&extension.as_str()) {
        Some(DetectedFormat::Dicom)
    } else {
        None
    }
}

fn is_photo(bytes: &[u8]) -> bool {
    matches!(
        infer::get(bytes).map(|kind| kind.mime_type()),
        Some("image/jpeg") | Some("image/png")
    )
}

fn is_dicom(bytes: &[u8]) -> bool {
    bytes
        .get(DICOM_MAGIC_OFFSET..DICOM_MAGIC_OFFSET + DICOM_MAGIC.len())
        .is_some_and(|magic| magic == DICOM_MAGIC)
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PNG_HEADER: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];
    const JPEG_HEADER: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46];

    fn dicom_bytes() -> Vec<u8> {
        let mut bytes = vec![0u8; 128];
        bytes.extend_from_slice(b"DICM");
        bytes.extend_from_slice(&[0x02, 0x00, 0x00, 0x00]);
        bytes
    }

    fn rejected(err: FilesError) -> Vec<UploadError> {
        match err {
            FilesError::Rejected { errors, .. } => errors,
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_accepts_png_photo_with_checksum() {
        let service = UploadService::default();
        let metadata = service
            .check(UploadKind::ApplicantPhoto, "photo.png", PNG_HEADER)
            .expect("png should be accepted");

        assert_eq!(metadata.file_name.as_str(), "photo.png");
        assert_eq!(metadata.size_bytes, PNG_HEADER.len() as u64);
        assert_eq!(metadata.image_type, ImageType::Photo);
        assert_eq!(
            metadata.media_type.as_ref().map(|m| m.as_str()),
            Some("image/png")
        );
        assert_eq!(metadata.checksum.len(), 64);
        assert_eq!(metadata.checksum, sha256_hex(PNG_HEADER));
    }

    #[test]
    fn test_accepts_dicom_xray() {
        let service = UploadService::default();
        let metadata = service
            .check(UploadKind::ChestXray, "pa-view.DCM", &dicom_bytes())
            .expect("dicom should be accepted");
        assert_eq!(metadata.image_type, ImageType::Dicom);
        assert_eq!(
            metadata.media_type.as_ref().map(|m| m.as_str()),
            Some("application/dicom")
        );
    }

    #[test]
    fn test_photo_upload_rejects_dicom_extension() {
        let service = UploadService::default();
        let err = service
            .check(UploadKind::ApplicantPhoto, "scan.dcm", &dicom_bytes())
            .expect_err("dicom is not a photo");
        assert_eq!(rejected(err), vec![UploadError::NotPhoto]);
    }

    #[test]
    fn test_xray_upload_rejects_unknown_extension() {
        let service = UploadService::default();
        let err = service
            .check(UploadKind::ChestXray, "notes.pdf", b"%PDF-1.4")
            .expect_err("pdf is not accepted");
        assert_eq!(rejected(err), vec![UploadError::NotDicom]);
        assert_eq!(
            UploadError::NotDicom.to_string(),
            "The selected file must be a DICOM file"
        );
    }

    #[test]
    fn test_empty_file_is_rejected_without_content_check() {
        let service = UploadService::default();
        let err = service
            .check(UploadKind::ApplicantPhoto, "photo.jpg", &[])
            .expect_err("empty file should fail");
        assert_eq!(rejected(err), vec![UploadError::Empty]);
    }

    #[test]
    fn test_size_limits_apply_per_format() {
        let service = UploadService::with_limits(8, 64);

        let err = service
            .check(UploadKind::ApplicantPhoto, "photo.jpg", JPEG_HEADER)
            .expect_err("photo over limit");
        assert_eq!(rejected(err), vec![UploadError::PhotoTooLarge]);

        let err = service
            .check(UploadKind::ChestXray, "view.dcm", &dicom_bytes())
            .expect_err("dicom over limit");
        assert_eq!(rejected(err), vec![UploadError::DicomTooLarge]);
    }

    #[test]
    fn test_renamed_text_file_is_invalid_photo() {
        let service = UploadService::default();
        let err = service
            .check(UploadKind::ApplicantPhoto, "photo.jpeg", b"just some text")
            .expect_err("text is not a jpeg");
        assert_eq!(rejected(err), vec![UploadError::InvalidPhoto]);
    }

    #[test]
    fn test_dicom_without_magic_is_invalid() {
        let service = UploadService::default();
        let err = service
            .check(UploadKind::ChestXray, "view.dcm", &[1u8; 200])
            .expect_err("missing DICM magic");
        assert_eq!(rejected(err), vec![UploadError::InvalidDicom]);
    }

    #[test]
    fn test_check_file_reads_from_disk() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("photo.jpg");
        fs::write(&path, JPEG_HEADER).expect("write photo");

        let metadata = UploadService::default()
            .check_file(UploadKind::ApplicantPhoto, &path)
            .expect("jpeg on disk should be accepted");
        assert_eq!(metadata.file_name.as_str(), "photo.jpg");
        assert_eq!(
            metadata.media_type.as_ref().map(|m| m.as_str()),
            Some("image/jpeg")
        );
    }

    #[test]
    fn test_check_file_missing_path_is_io_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let err = UploadService::default()
            .check_file(UploadKind::ChestXray, &temp_dir.path().join("missing.dcm"))
            .expect_err("missing file");
        assert!(matches!(err, FilesError::Io(_)));
    }
}
