use utoipa::OpenApi;

pub const CATEGORY_TAG: &str = "Categories";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Resto Admin",
        description = "Restaurant back-office API",
    ),
    components(schemas(crate::api::dto::ErrorResponse)),
    tags(
        (name = CATEGORY_TAG, description = "Menu category administration"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;
