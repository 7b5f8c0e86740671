/// Largest accepted JPG, JPEG or PNG upload.
pub const MAX_PHOTO_BYTES: u64 = 10 * 1024 * 1024;

/// Largest accepted DICOM upload.
pub const MAX_DICOM_BYTES: u64 = 50 * 1024 * 1024;

pub const PHOTO_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

pub const DICOM_EXTENSIONS: [&str; 1] = ["dcm"];

/// Offset of the `DICM` magic after the 128-byte DICOM preamble.
pub(crate) const DICOM_MAGIC_OFFSET: usize = 128;

pub(crate) const DICOM_MAGIC: &[u8; 4] = b"DICM";
