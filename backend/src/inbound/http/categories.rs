//! Category HTTP handlers.
//!
//! ```text
//! POST   /categories
//! GET    /categories
//! GET    /categories/{id}
//! PUT    /categories/{id}
//! DELETE /categories/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::CategoryId;
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{created, ok, ok_empty};
use crate::inbound::http::schemas::{
    CategoryEnvelopeSchema, CategoryListEnvelopeSchema, EmptyEnvelopeSchema, ErrorEnvelopeSchema,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{category_name, parse_id};

/// Request payload for creating or renaming a category.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CategoryRequest {
    #[schema(example = "Electronics", max_length = 255)]
    pub name: Option<String>,
}

/// Create a category with a unique name.
#[utoipa::path(
    post,
    path = "/categories",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryEnvelopeSchema),
        (status = 400, description = "Validation failed or name taken", body = ErrorEnvelopeSchema),
        (status = 503, description = "Storage unavailable", body = ErrorEnvelopeSchema)
    ),
    tags = ["categories"],
    operation_id = "createCategory"
)]
#[post("/categories")]
pub async fn create_category(
    state: web::Data<HttpState>,
    payload: web::Json<CategoryRequest>,
) -> ApiResult<HttpResponse> {
    let name = category_name(payload.name.as_deref())?;
    let category = state.categories.create(name).await?;
    Ok(created("Category created successfully", category))
}

/// List every category.
#[utoipa::path(
    get,
    path = "/categories",
    responses(
        (status = 200, description = "All categories", body = CategoryListEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["categories"],
    operation_id = "listCategories"
)]
#[get("/categories")]
pub async fn list_categories(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let categories = state.categories.list().await?;
    Ok(ok("Categories retrieved successfully", categories))
}

/// Fetch one category.
#[utoipa::path(
    get,
    path = "/categories/{id}",
    params(("id" = i64, Path, description = "Category identifier")),
    responses(
        (status = 200, description = "The category", body = CategoryEnvelopeSchema),
        (status = 400, description = "Malformed identifier", body = ErrorEnvelopeSchema),
        (status = 404, description = "No such category", body = ErrorEnvelopeSchema)
    ),
    tags = ["categories"],
    operation_id = "getCategory"
)]
#[get("/categories/{id}")]
pub async fn get_category(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id: CategoryId = parse_id(&path)?;
    let category = state.categories.get(id).await?;
    Ok(ok("Category retrieved successfully", category))
}

/// Rename a category.
#[utoipa::path(
    put,
    path = "/categories/{id}",
    params(("id" = i64, Path, description = "Category identifier")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryEnvelopeSchema),
        (status = 400, description = "Validation failed or name taken", body = ErrorEnvelopeSchema),
        (status = 404, description = "No such category", body = ErrorEnvelopeSchema)
    ),
    tags = ["categories"],
    operation_id = "updateCategory"
)]
#[put("/categories/{id}")]
pub async fn update_category(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<CategoryRequest>,
) -> ApiResult<HttpResponse> {
    let id: CategoryId = parse_id(&path)?;
    let name = category_name(payload.name.as_deref())?;
    let category = state.categories.update(id, name).await?;
    Ok(ok("Category updated successfully", category))
}

/// Delete a category no product references.
#[utoipa::path(
    delete,
    path = "/categories/{id}",
    params(("id" = i64, Path, description = "Category identifier")),
    responses(
        (status = 200, description = "Category deleted", body = EmptyEnvelopeSchema),
        (status = 404, description = "No such category", body = ErrorEnvelopeSchema),
        (status = 409, description = "Products still reference the category", body = ErrorEnvelopeSchema)
    ),
    tags = ["categories"],
    operation_id = "deleteCategory"
)]
#[delete("/categories/{id}")]
pub async fn delete_category(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id: CategoryId = parse_id(&path)?;
    state.categories.delete(id).await?;
    Ok(ok_empty("Category deleted successfully"))
}
