use axum::body::Bytes;
use tracing::warn;

use super::Rejection;

pub const IMAGE_FIELD: &str = "image";

pub const DEFAULT_MAX_FILE_SIZE: usize = 10 * 1024 * 1024;
pub const MIN_IMAGE_BYTES: usize = 100;
pub const MAX_FILENAME_LENGTH: usize = 255;

const BLOCKED_EXTENSIONS: &[&str] = &[
    ".exe", ".bat", ".cmd", ".scr", ".pif", ".com", ".jar", ".php", ".jsp", ".asp", ".js", ".vbs",
    ".sh", ".py",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Webp,
}

impl ImageKind {
    pub fn from_mime(mimetype: &str) -> Option<Self> {
        match mimetype {
            "image/jpeg" | "image/jpg" => Some(ImageKind::Jpeg),
            "image/png" => Some(ImageKind::Png),
            "image/webp" => Some(ImageKind::Webp),
            _ => None,
        }
    }

    /// Leading magic bytes. WEBP only checks the RIFF container header.
    pub fn signature(self) -> &'static [u8] {
        match self {
            ImageKind::Jpeg => &[0xFF, 0xD8, 0xFF],
            ImageKind::Png => &[0x89, 0x50, 0x4E, 0x47],
            ImageKind::Webp => &[0x52, 0x49, 0x46, 0x46],
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub bytes: Bytes,
    pub mimetype: String,
    pub size: usize,
    pub original_name: Option<String>,
}

/// Checks an upload before it is handed to vision analysis, returning the
/// file back on success.
pub fn validate_file(
    file: Option<&UploadedFile>,
    max_size: usize,
) -> Result<&UploadedFile, Rejection> {
    check_file(file, max_size).inspect_err(|rejection| {
        warn!(
            code = rejection.code(),
            field = rejection.field(),
            "Rejected file upload"
        );
    })
}

fn check_file(file: Option<&UploadedFile>, max_size: usize) -> Result<&UploadedFile, Rejection> {
    let file = file.ok_or(Rejection::MissingFile)?;

    let kind = ImageKind::from_mime(&file.mimetype).ok_or(Rejection::UnsupportedType)?;

    if file.size > max_size {
        return Err(Rejection::FileTooLarge { max: max_size });
    }

    if file.bytes.is_empty() {
        return Err(Rejection::EmptyFile);
    }

    if let Some(name) = &file.original_name {
        check_filename(name)?;
    }

    if file.bytes.len() < MIN_IMAGE_BYTES {
        return Err(Rejection::FileTooSmall);
    }

    // declared type must agree with the actual header
    if !file.bytes.starts_with(kind.signature()) {
        return Err(Rejection::HeaderMismatch);
    }

    Ok(file)
}

fn check_filename(name: &str) -> Result<(), Rejection> {
    if name.chars().count() > MAX_FILENAME_LENGTH {
        return Err(Rejection::FilenameTooLong);
    }

    let lowered = name.to_lowercase();
    if BLOCKED_EXTENSIONS.iter().any(|ext| lowered.ends_with(ext)) {
        return Err(Rejection::DisallowedExtension);
    }

    Ok(())
}
