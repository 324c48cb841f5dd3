//! Readiness and liveness checks.
//!
//! The server reports not-ready until `main` has migrated the schema, opened
//! both pools and bound the listener. Liveness only proves the worker threads
//! still answer.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, get, web};

use super::envelope::Envelope;

/// Readiness flag shared between `main` and the health handlers.
#[derive(Debug, Default)]
pub struct HealthState {
    ready: AtomicBool,
}

impl HealthState {
    /// A state that reports not-ready until [`HealthState::mark_ready`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Start reporting ready.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Whether storage and cache are wired up.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}

fn health_reply(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status)
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(Envelope::<()>::empty(message, None))
}

/// 200 once storage and cache are connected, 503 while starting.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    operation_id = "readinessCheck",
    responses(
        (status = 200, description = "Service is ready", body = crate::inbound::http::schemas::EmptyEnvelopeSchema),
        (status = 503, description = "Service is still starting", body = crate::inbound::http::schemas::EmptyEnvelopeSchema)
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    if state.is_ready() {
        health_reply(StatusCode::OK, "Service is ready")
    } else {
        health_reply(StatusCode::SERVICE_UNAVAILABLE, "Service is starting")
    }
}

/// 200 whenever a worker can answer.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    operation_id = "livenessCheck",
    responses(
        (status = 200, description = "Service is alive", body = crate::inbound::http::schemas::EmptyEnvelopeSchema)
    )
)]
#[get("/health/live")]
pub async fn live() -> HttpResponse {
    health_reply(StatusCode::OK, "Service is alive")
}
