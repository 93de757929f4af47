//! Data Transfer Objects for API requests and responses.

mod category;
mod error;
mod health;

pub use category::{
    CategoryForm, CategoryMessageResponse, CategoryResponse, CategoryUpload, MessageResponse,
};
pub use error::ErrorResponse;
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
