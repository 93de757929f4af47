use async_trait::async_trait;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::Extensions;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Types that can be assembled from a `multipart/form-data` body.
///
/// `extensions` are the request's extensions, for settings installed by
/// route layers.
#[async_trait]
pub trait FromMultipart: Sized {
    async fn from_multipart(multipart: Multipart, extensions: &Extensions) -> AppResult<Self>;
}

/// Extractor that reads a multipart form into `T` and validates it.
#[derive(Debug, Clone, Default)]
pub struct ValidatedMultipart<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedMultipart<T>
where
    T: FromMultipart + Validate + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> AppResult<Self> {
        let extensions = req.extensions().clone();
        let multipart = Multipart::from_request(req, state).await?;
        let value = T::from_multipart(multipart, &extensions).await?;
        value.validate()?;
        Ok(ValidatedMultipart(value))
    }
}
