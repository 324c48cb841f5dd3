//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request bodies deserialise into permissive payloads (every field
//! optional) so that missing fields surface as per-field messages in the
//! envelope's `errors` map rather than as a generic decoding failure.

use actix_web::{HttpRequest, error::JsonPayloadError, web};
use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::{
    CategoryId, CategoryName, Error, FieldErrors, OrderLine, OrderRequest, PositiveValueError,
    Price, ProductDraft, ProductId, ProductName, Quantity,
};

/// Message returned when a path identifier is not a positive integer.
pub const INVALID_ID_MESSAGE: &str = "Invalid ID format";
/// Message returned when a JSON body cannot be decoded.
pub const INVALID_PAYLOAD_MESSAGE: &str = "Invalid request payload";

/// Parse a numeric path segment into an identifier.
///
/// # Examples
/// ```
/// use orderdesk::domain::CategoryId;
/// use orderdesk::inbound::http::validation::parse_id;
///
/// let id: CategoryId = parse_id("42").expect("numeric id");
/// assert_eq!(id.get(), 42);
/// assert!(parse_id::<CategoryId>("abc").is_err());
/// ```
pub fn parse_id<T: From<i64>>(raw: &str) -> Result<T, Error> {
    match raw.parse::<i64>() {
        Ok(value) if value > 0 => Ok(T::from(value)),
        _ => Err(Error::invalid_request(INVALID_ID_MESSAGE)),
    }
}

/// JSON extractor configuration mapping decode failures to the envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejected request payload");
    Error::invalid_request(INVALID_PAYLOAD_MESSAGE).into()
}

fn required(fields: &mut FieldErrors, field: &str) {
    fields.insert(field, format!("{field} is required"));
}

/// Positive identifiers only; zero is treated as absent.
fn reference<T: From<i64>>(fields: &mut FieldErrors, field: &str, raw: Option<i64>) -> Option<T> {
    match raw {
        Some(value) if value > 0 => Some(T::from(value)),
        Some(_) => {
            fields.insert(field, format!("{field} must be greater than 0"));
            None
        }
        None => {
            required(fields, field);
            None
        }
    }
}

fn price(fields: &mut FieldErrors, raw: Option<Decimal>) -> Option<Price> {
    match raw {
        None => {
            required(fields, "price");
            None
        }
        Some(amount) if amount.is_zero() => {
            fields.check("price", Err(PositiveValueError::Missing { field: "price" }))
        }
        Some(amount) => fields.check("price", Price::new(amount)),
    }
}

/// Validate a category name payload.
pub(crate) fn category_name(raw: Option<&str>) -> Result<CategoryName, Error> {
    let mut fields = FieldErrors::default();
    let name = fields.check("name", CategoryName::new(raw.unwrap_or_default()));
    fields.into_result()?;
    name.ok_or_else(|| Error::internal("category name validation yielded no value"))
}

/// Validate a product payload, reporting every offending field at once.
pub(crate) fn product_draft(
    name: Option<&str>,
    raw_price: Option<Decimal>,
    category_id: Option<i64>,
) -> Result<ProductDraft, Error> {
    let mut fields = FieldErrors::default();
    let name = fields.check("name", ProductName::new(name.unwrap_or_default()));
    let price = price(&mut fields, raw_price);
    let category_id = reference::<CategoryId>(&mut fields, "category_id", category_id);
    fields.into_result()?;

    match (name, price, category_id) {
        (Some(name), Some(price), Some(category_id)) => Ok(ProductDraft {
            name,
            price,
            category_id,
        }),
        _ => Err(Error::internal("product validation yielded no value")),
    }
}

/// Raw order line as received, before validation.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct RawOrderLine {
    pub product_id: Option<i64>,
    pub quantity: Option<i32>,
}

fn order_line(fields: &mut FieldErrors, index: usize, raw: RawOrderLine) -> Option<OrderLine> {
    let product_key = format!("details[{index}].product_id");
    let quantity_key = format!("details[{index}].quantity");

    let product_id = reference::<ProductId>(fields, &product_key, raw.product_id);
    let quantity = match raw.quantity {
        None | Some(0) => {
            required(fields, &quantity_key);
            None
        }
        Some(value) => {
            let checked = Quantity::new(value)
                .map_err(|_| format!("{quantity_key} must be greater than 0"));
            fields.check(quantity_key, checked)
        }
    };

    Some(OrderLine {
        product_id: product_id?,
        quantity: quantity?,
    })
}

/// Validate an order placement payload.
pub(crate) fn order_request(details: Option<Vec<RawOrderLine>>) -> Result<OrderRequest, Error> {
    let mut fields = FieldErrors::default();
    let raw_lines = details.unwrap_or_default();
    if raw_lines.is_empty() {
        required(&mut fields, "details");
    }
    let lines: Vec<OrderLine> = raw_lines
        .into_iter()
        .enumerate()
        .filter_map(|(index, raw)| order_line(&mut fields, index, raw))
        .collect();
    fields.into_result()?;

    OrderRequest::new(lines).ok_or_else(|| Error::internal("order validation yielded no lines"))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for request validation.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    fn field_message(error: &Error, field: &str) -> Option<String> {
        error
            .field_errors()
            .and_then(|fields| fields.get(field))
            .map(str::to_owned)
    }

    #[rstest]
    #[case("abc")]
    #[case("0")]
    #[case("-3")]
    #[case("")]
    fn malformed_ids_are_rejected(#[case] raw: &str) {
        let error = parse_id::<ProductId>(raw).expect_err("invalid id");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(error.message(), INVALID_ID_MESSAGE);
    }

    #[rstest]
    #[case(None, "name is required")]
    #[case(Some("   "), "name is required")]
    fn category_name_is_required(#[case] raw: Option<&str>, #[case] expected: &str) {
        let error = category_name(raw).expect_err("missing name");
        assert_eq!(error.message(), "Validation error");
        assert_eq!(field_message(&error, "name").as_deref(), Some(expected));
    }

    #[rstest]
    fn category_name_length_is_bounded() {
        let long = "x".repeat(256);
        let error = category_name(Some(&long)).expect_err("too long");
        assert_eq!(
            field_message(&error, "name").as_deref(),
            Some("name exceeds maximum length of 255")
        );
    }

    #[rstest]
    fn product_errors_are_reported_together() {
        let error = product_draft(None, Some(Decimal::new(-5, 0)), None).expect_err("invalid");
        assert_eq!(field_message(&error, "name").as_deref(), Some("name is required"));
        assert_eq!(
            field_message(&error, "price").as_deref(),
            Some("price must be greater than 0")
        );
        assert_eq!(
            field_message(&error, "category_id").as_deref(),
            Some("category_id is required")
        );
    }

    #[rstest]
    fn zero_price_counts_as_missing() {
        let error = product_draft(Some("Laptop"), Some(Decimal::ZERO), Some(1)).expect_err("zero");
        assert_eq!(field_message(&error, "price").as_deref(), Some("price is required"));
    }

    #[rstest]
    fn valid_product_payload_builds_a_draft() {
        let draft = product_draft(Some(" Laptop "), Some(Decimal::new(150_000, 2)), Some(3))
            .expect("valid draft");
        assert_eq!(draft.name.as_str(), "Laptop");
        assert_eq!(draft.category_id, CategoryId::new(3));
    }

    #[rstest]
    fn order_requires_details() {
        let error = order_request(Some(Vec::new())).expect_err("empty order");
        assert_eq!(
            field_message(&error, "details").as_deref(),
            Some("details is required")
        );
    }

    #[rstest]
    fn order_line_errors_are_indexed() {
        let error = order_request(Some(vec![
            RawOrderLine {
                product_id: Some(1),
                quantity: Some(2),
            },
            RawOrderLine {
                product_id: None,
                quantity: Some(-1),
            },
        ]))
        .expect_err("invalid line");

        assert_eq!(
            field_message(&error, "details[1].product_id").as_deref(),
            Some("details[1].product_id is required")
        );
        assert_eq!(
            field_message(&error, "details[1].quantity").as_deref(),
            Some("details[1].quantity must be greater than 0")
        );
        assert!(field_message(&error, "details[0].quantity").is_none());
    }

    #[rstest]
    fn valid_order_keeps_line_order() {
        let request = order_request(Some(vec![
            RawOrderLine {
                product_id: Some(7),
                quantity: Some(1),
            },
            RawOrderLine {
                product_id: Some(3),
                quantity: Some(4),
            },
        ]))
        .expect("valid order");
        let ids: Vec<_> = request.lines().iter().map(|line| line.product_id).collect();
        assert_eq!(ids, vec![ProductId::new(7), ProductId::new(3)]);
    }
}
