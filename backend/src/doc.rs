//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every catalogue, order and health endpoint together
//! with the envelope schemas from [`crate::inbound::http::schemas`], which
//! describe domain types without coupling them to utoipa.
//!
//! The generated document is served by Swagger UI in debug builds and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use utoipa::OpenApi;

use crate::inbound::http::categories::CategoryRequest;
use crate::inbound::http::orders::{CreateOrderRequest, OrderLineRequest};
use crate::inbound::http::products::ProductRequest;
use crate::inbound::http::schemas::{
    CategoryEnvelopeSchema, CategoryListEnvelopeSchema, CategorySchema, EmptyEnvelopeSchema,
    ErrorEnvelopeSchema, OrderDetailSchema, OrderEnvelopeSchema, OrderListEnvelopeSchema,
    OrderSchema, ProductEnvelopeSchema, ProductListEnvelopeSchema, ProductSchema,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Order desk API",
        description = "Category, product and order management with invoice numbering."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::categories::create_category,
        crate::inbound::http::categories::list_categories,
        crate::inbound::http::categories::get_category,
        crate::inbound::http::categories::update_category,
        crate::inbound::http::categories::delete_category,
        crate::inbound::http::products::create_product,
        crate::inbound::http::products::list_products,
        crate::inbound::http::products::get_product,
        crate::inbound::http::products::update_product,
        crate::inbound::http::products::delete_product,
        crate::inbound::http::orders::create_order,
        crate::inbound::http::orders::list_orders,
        crate::inbound::http::orders::get_order,
        crate::inbound::http::orders::delete_order,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        CategoryRequest,
        ProductRequest,
        CreateOrderRequest,
        OrderLineRequest,
        CategorySchema,
        ProductSchema,
        OrderSchema,
        OrderDetailSchema,
        CategoryEnvelopeSchema,
        CategoryListEnvelopeSchema,
        ProductEnvelopeSchema,
        ProductListEnvelopeSchema,
        OrderEnvelopeSchema,
        OrderListEnvelopeSchema,
        EmptyEnvelopeSchema,
        ErrorEnvelopeSchema
    )),
    tags(
        (name = "categories", description = "Product categories"),
        (name = "products", description = "Catalogue products"),
        (name = "orders", description = "Order placement and history"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the registered OpenAPI surface.

    use super::*;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // Note: utoipa replaces :: with . in schema names
    const ORDER_SCHEMA_NAME: &str = "crate.domain.Order";

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn every_resource_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/categories",
            "/categories/{id}",
            "/products",
            "/products/{id}",
            "/orders",
            "/orders/{id}",
            "/health/ready",
            "/health/live",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn order_schema_exposes_invoice_number() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let order = schemas.get(ORDER_SCHEMA_NAME).expect("Order schema");

        assert_object_schema_has_field(order, "invoice_number");
        assert_object_schema_has_field(order, "total_price");
    }
}
