//! Order HTTP handlers.
//!
//! ```text
//! POST   /orders
//! GET    /orders
//! GET    /orders/{id}
//! DELETE /orders/{id}
//! ```
//!
//! Orders are immutable once placed, so there is no update route.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::OrderId;
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{created, ok, ok_empty};
use crate::inbound::http::schemas::{
    EmptyEnvelopeSchema, ErrorEnvelopeSchema, OrderEnvelopeSchema, OrderListEnvelopeSchema,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{RawOrderLine, order_request, parse_id};

/// One requested order line.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, ToSchema)]
pub struct OrderLineRequest {
    #[schema(example = 1)]
    pub product_id: Option<i64>,
    #[schema(example = 2, minimum = 1)]
    pub quantity: Option<i32>,
}

/// Request payload for placing an order. Prices, totals, the order date and
/// the invoice number are all assigned by the server.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateOrderRequest {
    pub details: Option<Vec<OrderLineRequest>>,
}

impl From<OrderLineRequest> for RawOrderLine {
    fn from(value: OrderLineRequest) -> Self {
        Self {
            product_id: value.product_id,
            quantity: value.quantity,
        }
    }
}

/// Place an order, pricing every line against the current catalogue.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order placed and invoiced", body = OrderEnvelopeSchema),
        (status = 400, description = "Validation failed", body = ErrorEnvelopeSchema),
        (status = 404, description = "A referenced product does not exist", body = ErrorEnvelopeSchema),
        (status = 500, description = "Persistence or invoice assignment failed", body = ErrorEnvelopeSchema)
    ),
    tags = ["orders"],
    operation_id = "createOrder"
)]
#[post("/orders")]
pub async fn create_order(
    state: web::Data<HttpState>,
    payload: web::Json<CreateOrderRequest>,
) -> ApiResult<HttpResponse> {
    let details = payload
        .into_inner()
        .details
        .map(|lines| lines.into_iter().map(RawOrderLine::from).collect());
    let request = order_request(details)?;
    let order = state.orders.create(request).await?;
    Ok(created("Order created successfully", order))
}

/// List every order with its lines.
#[utoipa::path(
    get,
    path = "/orders",
    responses(
        (status = 200, description = "All orders", body = OrderListEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["orders"],
    operation_id = "listOrders"
)]
#[get("/orders")]
pub async fn list_orders(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let orders = state.orders.list().await?;
    Ok(ok("Orders fetched successfully", orders))
}

/// Fetch one order with its lines.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(("id" = i64, Path, description = "Order identifier")),
    responses(
        (status = 200, description = "The order", body = OrderEnvelopeSchema),
        (status = 400, description = "Malformed identifier", body = ErrorEnvelopeSchema),
        (status = 404, description = "No such order", body = ErrorEnvelopeSchema)
    ),
    tags = ["orders"],
    operation_id = "getOrder"
)]
#[get("/orders/{id}")]
pub async fn get_order(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id: OrderId = parse_id(&path)?;
    let order = state.orders.get(id).await?;
    Ok(ok("Order fetched successfully", order))
}

/// Delete an order and its lines.
#[utoipa::path(
    delete,
    path = "/orders/{id}",
    params(("id" = i64, Path, description = "Order identifier")),
    responses(
        (status = 200, description = "Order deleted", body = EmptyEnvelopeSchema),
        (status = 404, description = "No such order", body = ErrorEnvelopeSchema)
    ),
    tags = ["orders"],
    operation_id = "deleteOrder"
)]
#[delete("/orders/{id}")]
pub async fn delete_order(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id: OrderId = parse_id(&path)?;
    state.orders.delete(id).await?;
    Ok(ok_empty("Order deleted successfully"))
}
