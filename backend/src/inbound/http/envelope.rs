//! Uniform JSON response envelope.
//!
//! Every response body, success or failure, has the shape
//! `{ "message": string, "data": value|null, "errors": object|null }`.

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::domain::FieldErrors;

/// Response body shared by every endpoint.
///
/// # Examples
/// ```
/// use orderdesk::inbound::http::envelope::Envelope;
///
/// let body = Envelope::success("Category created successfully", 7);
/// let json = serde_json::to_value(&body).expect("serialise");
/// assert_eq!(json["data"], 7);
/// assert!(json["errors"].is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Human-readable outcome.
    pub message: String,
    /// Payload on success.
    pub data: Option<T>,
    /// Per-field validation messages on failure.
    pub errors: Option<FieldErrors>,
}

impl<T> Envelope<T> {
    /// Successful envelope carrying `data`.
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            errors: None,
        }
    }
}

impl Envelope<()> {
    /// Envelope without payload, used for deletions and failures.
    pub fn empty(message: impl Into<String>, errors: Option<FieldErrors>) -> Self {
        Self {
            message: message.into(),
            data: None,
            errors,
        }
    }
}

fn respond<T: Serialize>(status: StatusCode, body: &Envelope<T>) -> HttpResponse {
    HttpResponse::build(status).json(body)
}

/// `200 OK` with `data`.
pub fn ok<T: Serialize>(message: &str, data: T) -> HttpResponse {
    respond(StatusCode::OK, &Envelope::success(message, data))
}

/// `201 Created` with `data`.
pub fn created<T: Serialize>(message: &str, data: T) -> HttpResponse {
    respond(StatusCode::CREATED, &Envelope::success(message, data))
}

/// `200 OK` with a null `data`.
pub fn ok_empty(message: &str) -> HttpResponse {
    respond(StatusCode::OK, &Envelope::empty(message, None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use rstest::rstest;
    use serde_json::{Value, json};

    async fn body_of(response: HttpResponse) -> Value {
        let bytes = to_bytes(response.into_body()).await.expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[rstest]
    #[actix_web::test]
    async fn created_uses_201_and_fills_data() {
        let response = created("Order created successfully", json!({"id": 1}));
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_of(response).await;
        assert_eq!(
            body,
            json!({
                "message": "Order created successfully",
                "data": {"id": 1},
                "errors": null
            })
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn empty_envelope_serialises_null_data() {
        let body = body_of(ok_empty("Category deleted successfully")).await;
        assert!(body["data"].is_null());
        assert!(body["errors"].is_null());
    }
}
