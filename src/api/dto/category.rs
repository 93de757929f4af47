//! Category request and response DTOs.

use async_trait::async_trait;
use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use axum::http::{Extensions, StatusCode};
use serde::Serialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::error::{AppError, AppResult};
use crate::models::Category;
use crate::services::CategoryInput;
use crate::storage::{ImageRules, ImageUpload};
use crate::utils::validate::FromMultipart;

/// Category as returned by the API.
#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Drinks")]
    pub name: String,
    #[schema(example = "Beverages")]
    pub description: String,
    /// Stored path relative to the public root
    #[schema(example = "categories/Xb3kT9qLmN0pR7sV2wY5zA8cE1fH4jK6oU0iD3gB.jpg")]
    pub image: Option<String>,
    /// Where the image is served from
    #[schema(example = "/categories/Xb3kT9qLmN0pR7sV2wY5zA8cE1fH4jK6oU0iD3gB.jpg")]
    pub image_url: Option<String>,
    #[schema(value_type = String, example = "2024-06-01T12:00:00")]
    pub created_at: jiff::civil::DateTime,
    #[schema(value_type = String, example = "2024-06-01T12:00:00")]
    pub updated_at: jiff::civil::DateTime,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            image_url: category.image.as_ref().map(|path| format!("/{}", path)),
            name: category.name,
            description: category.description,
            image: category.image,
            created_at: category.created_at.to_jiff(),
            updated_at: category.updated_at.to_jiff(),
        }
    }
}

/// Confirmation returned by create and update.
#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryMessageResponse {
    #[schema(example = "Category created.")]
    pub message: String,
    pub category: CategoryResponse,
}

impl CategoryMessageResponse {
    pub fn new(message: &str, category: Category) -> Self {
        Self {
            message: message.to_string(),
            category: category.into(),
        }
    }
}

/// Confirmation without a payload, returned by delete.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Category deleted.")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

/// Multipart category form. Unknown fields are ignored; an `image` part with
/// neither filename nor content counts as absent.
///
/// The image is the only part that can outgrow the body limit, so hitting
/// the limit is reported as an oversized image using the [`ImageRules`]
/// found in the request extensions.
#[derive(Debug, Validate)]
pub struct CategoryForm {
    #[validate(
        custom(function = "not_blank", message = "The name field is required."),
        length(max = 255, message = "The name may not be greater than 255 characters.")
    )]
    pub name: String,
    #[validate(custom(function = "not_blank", message = "The description field is required."))]
    pub description: String,
    pub image: Option<ImageUpload>,
}

#[async_trait]
impl FromMultipart for CategoryForm {
    async fn from_multipart(mut multipart: Multipart, extensions: &Extensions) -> AppResult<Self> {
        let rules = extensions.get::<ImageRules>().copied().unwrap_or_default();
        let read_error = |error: MultipartError| -> AppError {
            if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
                rules.too_large()
            } else {
                error.into()
            }
        };

        let mut name = String::new();
        let mut description = String::new();
        let mut image = None;

        while let Some(field) = multipart.next_field().await.map_err(read_error)? {
            let field_name = field.name().unwrap_or_default().to_string();

            match field_name.as_str() {
                "name" => name = field.text().await.map_err(read_error)?,
                "description" => description = field.text().await.map_err(read_error)?,
                "image" => {
                    let filename = field.file_name().unwrap_or_default().to_string();
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await.map_err(read_error)?;

                    if !(filename.is_empty() && bytes.is_empty()) {
                        image = Some(ImageUpload::new(bytes.to_vec(), &filename, content_type));
                    }
                }
                _ => {}
            }
        }

        Ok(Self {
            name,
            description,
            image,
        })
    }
}

impl From<CategoryForm> for CategoryInput {
    fn from(form: CategoryForm) -> Self {
        CategoryInput {
            name: form.name,
            description: form.description,
            image: form.image,
        }
    }
}

/// OpenAPI description of the multipart body; never constructed.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct CategoryUpload {
    #[schema(example = "Drinks")]
    name: String,
    #[schema(example = "Beverages")]
    description: String,
    /// jpeg, png, jpg or gif; required on create
    #[schema(value_type = Option<String>, format = Binary)]
    image: Option<Vec<u8>>,
}
