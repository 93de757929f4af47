//! Image upload validation.
//!
//! An upload is accepted when its extension is one of jpeg/png/jpg/gif,
//! its content is detected as an image of a compatible kind, any declared MIME
//! type agrees, and its size is within the configured limit.

use crate::error::{AppError, AppResult};

/// Default upper bound for category images: 2048 KiB.
pub const MAX_IMAGE_BYTES: u64 = 2048 * 1024;

const ALLOWED_EXTENSIONS: &str = "jpeg, png, jpg, gif";

/// Accepted image kinds, keyed by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Jpg,
    Gif,
}

impl ImageKind {
    /// Parses a file extension, ignoring case and a leading dot.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "jpeg" => Some(ImageKind::Jpeg),
            "png" => Some(ImageKind::Png),
            "jpg" => Some(ImageKind::Jpg),
            "gif" => Some(ImageKind::Gif),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageKind::Jpeg | ImageKind::Jpg => "image/jpeg",
            ImageKind::Png => "image/png",
            ImageKind::Gif => "image/gif",
        }
    }

    /// Whether a client-declared MIME type is consistent with this kind.
    /// `image/jpg` and `image/pjpeg` are common browser spellings for JPEG.
    fn accepts_mime(&self, declared: &str) -> bool {
        let declared = declared.trim().to_ascii_lowercase();
        match declared.as_str() {
            "image/jpg" | "image/pjpeg" => self.mime_type() == "image/jpeg",
            other => other == self.mime_type(),
        }
    }
}

/// MIME type of the content as detected by `infer`, when it is an image.
fn detect_image_mime(bytes: &[u8]) -> Option<&'static str> {
    infer::get(bytes)
        .filter(|kind| kind.matcher_type() == infer::MatcherType::Image)
        .map(|kind| kind.mime_type())
}

/// An uploaded image as received from the request layer.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    /// Extension of the client's filename, without the dot
    pub original_extension: String,
    /// Content type sent by the client, if any
    pub declared_mime: Option<String>,
    pub size_bytes: u64,
}

impl ImageUpload {
    /// Builds an upload from the client filename; the extension is whatever
    /// follows the last dot (empty when there is none).
    pub fn new(bytes: Vec<u8>, original_filename: &str, declared_mime: Option<String>) -> Self {
        let original_extension = original_filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_string())
            .unwrap_or_default();
        let size_bytes = bytes.len() as u64;

        Self {
            bytes,
            original_extension,
            declared_mime,
            size_bytes,
        }
    }
}

/// Acceptance rules for category images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageRules {
    pub max_bytes: u64,
}

impl Default for ImageRules {
    fn default() -> Self {
        Self {
            max_bytes: MAX_IMAGE_BYTES,
        }
    }
}

impl ImageRules {
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    /// The rejection for an image over `max_bytes`, also used when the
    /// request body limit cuts the upload short.
    pub fn too_large(&self) -> AppError {
        AppError::validation(
            "image",
            format!(
                "The image may not be greater than {} kilobytes.",
                self.max_bytes / 1024
            ),
        )
    }

    /// Checks an upload and returns its kind.
    pub fn validate(&self, upload: &ImageUpload) -> AppResult<ImageKind> {
        let not_allowed = || {
            AppError::validation(
                "image",
                format!("The image must be a file of type: {}.", ALLOWED_EXTENSIONS),
            )
        };

        let kind = ImageKind::from_extension(&upload.original_extension).ok_or_else(not_allowed)?;

        if upload.size_bytes == 0 || upload.bytes.is_empty() {
            return Err(AppError::validation("image", "The image must be an image."));
        }

        if upload.size_bytes > self.max_bytes {
            return Err(self.too_large());
        }

        match detect_image_mime(&upload.bytes) {
            Some(detected) if detected == kind.mime_type() => {}
            Some(_) => return Err(not_allowed()),
            None => return Err(AppError::validation("image", "The image must be an image.")),
        }

        if let Some(declared) = upload.declared_mime.as_deref() {
            // Browsers fall back to octet-stream when they cannot tell.
            if declared != "application/octet-stream" && !kind.accepts_mime(declared) {
                return Err(not_allowed());
            }
        }

        Ok(kind)
    }
}
