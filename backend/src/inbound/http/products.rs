//! Product HTTP handlers.
//!
//! ```text
//! POST   /products
//! GET    /products
//! GET    /products/{id}
//! PUT    /products/{id}
//! DELETE /products/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ProductDraft, ProductId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{created, ok, ok_empty};
use crate::inbound::http::schemas::{
    EmptyEnvelopeSchema, ErrorEnvelopeSchema, ProductEnvelopeSchema, ProductListEnvelopeSchema,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_id, product_draft};

/// Request payload for creating or replacing a product.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ProductRequest {
    #[schema(example = "Laptop", max_length = 255)]
    pub name: Option<String>,
    #[schema(value_type = Option<f64>, example = 1500.0)]
    pub price: Option<Decimal>,
    #[schema(example = 1)]
    pub category_id: Option<i64>,
}

impl ProductRequest {
    fn draft(&self) -> Result<ProductDraft, crate::domain::Error> {
        product_draft(self.name.as_deref(), self.price, self.category_id)
    }
}

/// Create a product in an existing category.
#[utoipa::path(
    post,
    path = "/products",
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductEnvelopeSchema),
        (
            status = 400,
            description = "Validation failed, unknown category or name taken in the category",
            body = ErrorEnvelopeSchema
        )
    ),
    tags = ["products"],
    operation_id = "createProduct"
)]
#[post("/products")]
pub async fn create_product(
    state: web::Data<HttpState>,
    payload: web::Json<ProductRequest>,
) -> ApiResult<HttpResponse> {
    let draft = payload.draft()?;
    let product = state.products.create(draft).await?;
    Ok(created("Product created successfully", product))
}

/// List every product with its category.
#[utoipa::path(
    get,
    path = "/products",
    responses(
        (status = 200, description = "All products", body = ProductListEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["products"],
    operation_id = "listProducts"
)]
#[get("/products")]
pub async fn list_products(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let products = state.products.list().await?;
    Ok(ok("Products retrieved successfully", products))
}

/// Fetch one product with its category.
#[utoipa::path(
    get,
    path = "/products/{id}",
    params(("id" = i64, Path, description = "Product identifier")),
    responses(
        (status = 200, description = "The product", body = ProductEnvelopeSchema),
        (status = 400, description = "Malformed identifier", body = ErrorEnvelopeSchema),
        (status = 404, description = "No such product", body = ErrorEnvelopeSchema)
    ),
    tags = ["products"],
    operation_id = "getProduct"
)]
#[get("/products/{id}")]
pub async fn get_product(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id: ProductId = parse_id(&path)?;
    let product = state.products.get(id).await?;
    Ok(ok("Product retrieved successfully", product))
}

/// Replace a product's name, price and category.
#[utoipa::path(
    put,
    path = "/products/{id}",
    params(("id" = i64, Path, description = "Product identifier")),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductEnvelopeSchema),
        (status = 400, description = "Validation failed", body = ErrorEnvelopeSchema),
        (status = 404, description = "No such product", body = ErrorEnvelopeSchema)
    ),
    tags = ["products"],
    operation_id = "updateProduct"
)]
#[put("/products/{id}")]
pub async fn update_product(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<ProductRequest>,
) -> ApiResult<HttpResponse> {
    let id: ProductId = parse_id(&path)?;
    let draft = payload.draft()?;
    let product = state.products.update(id, draft).await?;
    Ok(ok("Product updated successfully", product))
}

/// Delete a product no order line references.
#[utoipa::path(
    delete,
    path = "/products/{id}",
    params(("id" = i64, Path, description = "Product identifier")),
    responses(
        (status = 200, description = "Product deleted", body = EmptyEnvelopeSchema),
        (status = 404, description = "No such product", body = ErrorEnvelopeSchema),
        (status = 409, description = "Order lines still reference the product", body = ErrorEnvelopeSchema)
    ),
    tags = ["products"],
    operation_id = "deleteProduct"
)]
#[delete("/products/{id}")]
pub async fn delete_product(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id: ProductId = parse_id(&path)?;
    state.products.delete(id).await?;
    Ok(ok_empty("Product deleted successfully"))
}
