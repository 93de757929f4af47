//! Image upload rules, filename tokens and the public file store.

mod file_store;
mod token;
mod upload;

pub use file_store::{FileStore, LocalFileStore};
pub use token::{AlphanumericTokenGenerator, TOKEN_LENGTH, TokenGenerator};
pub use upload::{ImageKind, ImageRules, ImageUpload, MAX_IMAGE_BYTES};

/// Directory under the public root that holds category images.
pub const CATEGORY_ASSET_DIR: &str = "categories";
