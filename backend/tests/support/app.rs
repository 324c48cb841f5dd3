//! In-process application harness over the in-memory adapters.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::HeaderMap;
use actix_web::middleware::NormalizePath;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use orderdesk::Trace;
use orderdesk::domain::{CategoryService, OrderService, ProductService, ReadThroughCache};
use orderdesk::inbound::http::configure;
use orderdesk::inbound::http::state::HttpState;
use orderdesk::test_support::{FixedClock, InMemoryListCache, InMemoryStore};

/// Instant every order placed through the harness receives.
pub fn placed_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Status and decoded JSON body of one exchange.
pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl Reply {
    /// `data.id` of a successful create.
    pub fn id(&self) -> i64 {
        self.body["data"]["id"].as_i64().expect("data.id present")
    }

    /// Message recorded for `field` in the `errors` map.
    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.body["errors"][field].as_str()
    }
}

pub struct TestApp {
    pub store: InMemoryStore,
    pub cache: Arc<InMemoryListCache>,
    pub clock: Arc<FixedClock>,
    state: web::Data<HttpState>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = InMemoryStore::new();
        let cache = Arc::new(InMemoryListCache::new());
        let clock = Arc::new(FixedClock::new(placed_at()));
        let list_cache = ReadThroughCache::new(cache.clone());
        let repo = Arc::new(store.clone());

        let state = web::Data::new(HttpState::new(
            CategoryService::new(repo.clone(), list_cache.clone()),
            ProductService::new(repo.clone(), repo.clone(), list_cache.clone()),
            OrderService::new(repo.clone(), repo, list_cache, clock.clone()),
        ));

        Self {
            store,
            cache,
            clock,
            state,
        }
    }

    pub async fn send(&self, request: TestRequest) -> Reply {
        let app = test::init_service(
            App::new()
                .app_data(self.state.clone())
                .configure(configure)
                .wrap(Trace)
                .wrap(NormalizePath::trim()),
        )
        .await;
        let response = test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = test::read_body(response).await;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("JSON response body")
        };
        Reply {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> Reply {
        self.send(TestRequest::get().uri(uri)).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> Reply {
        self.send(TestRequest::post().uri(uri).set_json(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> Reply {
        self.send(TestRequest::put().uri(uri).set_json(body)).await
    }

    pub async fn delete(&self, uri: &str) -> Reply {
        self.send(TestRequest::delete().uri(uri)).await
    }

    pub async fn create_category(&self, name: &str) -> i64 {
        let reply = self
            .post("/categories", serde_json::json!({ "name": name }))
            .await;
        assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
        reply.id()
    }

    pub async fn create_product(&self, name: &str, price: f64, category_id: i64) -> i64 {
        let reply = self
            .post(
                "/products",
                serde_json::json!({ "name": name, "price": price, "category_id": category_id }),
            )
            .await;
        assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
        reply.id()
    }
}
