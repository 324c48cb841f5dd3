//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the serialised shape of their domain types but
//! live in the inbound adapter layer where framework concerns belong. The
//! envelope wrappers describe the `{message, data, errors}` body each
//! endpoint returns.

#![expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]

use std::collections::BTreeMap;

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::Category`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Category)]
pub struct CategorySchema {
    #[schema(example = 1)]
    id: i64,
    #[schema(example = "Electronics", max_length = 255)]
    name: String,
}

/// OpenAPI schema for [`crate::domain::Product`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Product)]
pub struct ProductSchema {
    #[schema(example = 1)]
    id: i64,
    #[schema(example = "Laptop", max_length = 255)]
    name: String,
    #[schema(value_type = f64, example = 1500.0)]
    price: f64,
    #[schema(example = 1)]
    category_id: i64,
    category: Option<CategorySchema>,
}

/// OpenAPI schema for [`crate::domain::OrderDetail`].
#[derive(ToSchema)]
#[schema(as = crate::domain::OrderDetail)]
pub struct OrderDetailSchema {
    id: i64,
    order_id: i64,
    product_id: i64,
    #[schema(example = 2, minimum = 1)]
    quantity: i32,
    /// Unit price times quantity, frozen when the order was placed.
    #[schema(value_type = f64, example = 3000.0)]
    subtotal: f64,
    product: Option<ProductSchema>,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    #[schema(value_type = String, format = DateTime)]
    updated_at: String,
}

/// OpenAPI schema for [`crate::domain::Order`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Order)]
pub struct OrderSchema {
    id: i64,
    /// `INV-<YYYYMMDD>-<id>`.
    #[schema(example = "INV-20240305-42")]
    invoice_number: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    order_date: String,
    #[schema(value_type = f64, example = 3000.0)]
    total_price: f64,
    details: Vec<OrderDetailSchema>,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    #[schema(value_type = String, format = DateTime)]
    updated_at: String,
}

/// Failure envelope: `data` is always null.
#[derive(ToSchema)]
pub struct ErrorEnvelopeSchema {
    #[schema(example = "Validation error")]
    message: String,
    #[schema(value_type = Option<Object>)]
    data: Option<()>,
    /// Field name to message; order lines are keyed `details[<index>].<field>`.
    #[schema(example = json!({"name": "name must be unique"}))]
    errors: Option<BTreeMap<String, String>>,
}

/// Success envelope without payload.
#[derive(ToSchema)]
pub struct EmptyEnvelopeSchema {
    #[schema(example = "Category deleted successfully")]
    message: String,
    #[schema(value_type = Option<Object>)]
    data: Option<()>,
    #[schema(value_type = Option<Object>)]
    errors: Option<()>,
}

macro_rules! envelope_schema {
    ($name:ident, $data:ty, $doc:literal) => {
        #[doc = $doc]
        #[derive(ToSchema)]
        pub struct $name {
            message: String,
            data: $data,
            #[schema(value_type = Option<Object>)]
            errors: Option<()>,
        }
    };
}

envelope_schema!(CategoryEnvelopeSchema, CategorySchema, "Envelope carrying one category.");
envelope_schema!(CategoryListEnvelopeSchema, Vec<CategorySchema>, "Envelope carrying every category.");
envelope_schema!(ProductEnvelopeSchema, ProductSchema, "Envelope carrying one product.");
envelope_schema!(ProductListEnvelopeSchema, Vec<ProductSchema>, "Envelope carrying every product.");
envelope_schema!(OrderEnvelopeSchema, OrderSchema, "Envelope carrying one order.");
envelope_schema!(OrderListEnvelopeSchema, Vec<OrderSchema>, "Envelope carrying every order.");

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn domain_wrappers_use_domain_names() {
        // utoipa replaces :: with . in schema names
        assert_eq!(CategorySchema::name(), "crate.domain.Category");
        assert_eq!(ProductSchema::name(), "crate.domain.Product");
        assert_eq!(OrderSchema::name(), "crate.domain.Order");
    }

    #[test]
    fn order_schema_lists_invoice_and_details() {
        let schema_json = schema_to_json::<OrderSchema>();
        assert!(schema_json.contains("invoice_number"));
        assert!(schema_json.contains("details"));
    }

    #[test]
    fn error_envelope_has_all_three_members() {
        let schema_json = schema_to_json::<ErrorEnvelopeSchema>();
        for member in ["message", "data", "errors"] {
            assert!(schema_json.contains(member), "missing {member}");
        }
    }
}
