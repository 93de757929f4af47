//! Admin category handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::CATEGORY_TAG;
use crate::api::dto::{
    CategoryForm, CategoryMessageResponse, CategoryResponse, CategoryUpload, ErrorResponse,
    MessageResponse,
};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::ValidatedMultipart;

pub fn category_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_categories))
        .routes(routes!(create_category))
        .routes(routes!(show_category))
        .routes(routes!(update_category))
        .routes(routes!(update_category_form))
        .routes(routes!(delete_category))
        .routes(routes!(edit_category))
}

/// GET /api/admin/categories
#[utoipa::path(
    get,
    path = "/",
    tag = CATEGORY_TAG,
    responses(
        (status = 200, description = "All categories ordered by id", body = Vec<CategoryResponse>)
    )
)]
async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<CategoryResponse>>> {
    let categories = state.services.categories.list().await?;
    Ok(Json(categories.into_iter().map(CategoryResponse::from).collect()))
}

/// POST /api/admin/categories
#[utoipa::path(
    post,
    path = "/",
    tag = CATEGORY_TAG,
    request_body(content = CategoryUpload, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Category created", body = CategoryMessageResponse),
        (status = 400, description = "Invalid form or image", body = ErrorResponse),
        (status = 500, description = "Image could not be stored", body = ErrorResponse)
    )
)]
async fn create_category(
    State(state): State<AppState>,
    ValidatedMultipart(form): ValidatedMultipart<CategoryForm>,
) -> AppResult<(StatusCode, Json<CategoryMessageResponse>)> {
    let category = state.services.categories.create(form.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(CategoryMessageResponse::new("Category created.", category)),
    ))
}

/// GET /api/admin/categories/{id}
#[utoipa::path(
    get,
    path = "/{id}",
    tag = CATEGORY_TAG,
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category found", body = CategoryResponse),
        (status = 404, description = "Category not found", body = ErrorResponse)
    )
)]
async fn show_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<CategoryResponse>> {
    let category = state.services.categories.edit(id).await?;
    Ok(Json(category.into()))
}

/// GET /api/admin/categories/{id}/edit
#[utoipa::path(
    get,
    path = "/{id}/edit",
    tag = CATEGORY_TAG,
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category to edit", body = CategoryResponse),
        (status = 404, description = "Category not found", body = ErrorResponse)
    )
)]
async fn edit_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<CategoryResponse>> {
    let category = state.services.categories.edit(id).await?;
    Ok(Json(category.into()))
}

/// PUT /api/admin/categories/{id}
#[utoipa::path(
    put,
    path = "/{id}",
    tag = CATEGORY_TAG,
    params(("id" = i32, Path, description = "Category ID")),
    request_body(content = CategoryUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Category updated", body = CategoryMessageResponse),
        (status = 400, description = "Invalid form or image", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse)
    )
)]
async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedMultipart(form): ValidatedMultipart<CategoryForm>,
) -> AppResult<Json<CategoryMessageResponse>> {
    let category = state.services.categories.update(id, form.into()).await?;
    Ok(Json(CategoryMessageResponse::new("Category updated.", category)))
}

/// POST /api/admin/categories/{id}
///
/// Same as PUT, for HTML forms that cannot send PUT with a file.
#[utoipa::path(
    post,
    path = "/{id}",
    tag = CATEGORY_TAG,
    params(("id" = i32, Path, description = "Category ID")),
    request_body(content = CategoryUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Category updated", body = CategoryMessageResponse),
        (status = 400, description = "Invalid form or image", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse)
    )
)]
async fn update_category_form(
    state: State<AppState>,
    id: Path<i32>,
    form: ValidatedMultipart<CategoryForm>,
) -> AppResult<Json<CategoryMessageResponse>> {
    update_category(state, id, form).await
}

/// DELETE /api/admin/categories/{id}
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = CATEGORY_TAG,
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category deleted", body = MessageResponse),
        (status = 404, description = "Category not found", body = ErrorResponse)
    )
)]
async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.services.categories.destroy(id).await?;
    Ok(Json(MessageResponse::new("Category deleted.")))
}
