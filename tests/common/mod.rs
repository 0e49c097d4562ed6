// Not every test binary exercises every helper.
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, Set};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

use dokan_api::{
    config::AppConfig,
    entities::{product_variant, site_setting},
    events::{self, EventSender},
    handlers::AppServices,
    migrator::Migrator,
    AppState,
};

/// Test harness: the full application state backed by an in-memory SQLite
/// database, plus the v1 router for request-level tests.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        // A single connection keeps every query on the same in-memory DB.
        let mut options = ConnectOptions::new("sqlite::memory:".to_string());
        options.max_connections(1).min_connections(1);
        let db = Database::connect(options)
            .await
            .expect("in-memory sqlite should connect");
        Migrator::up(&db, None).await.expect("migrations apply");

        let db_arc = Arc::new(db);
        let (event_tx, event_rx) = mpsc::channel(64);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let services = AppServices::new(db_arc.clone(), Arc::new(event_sender.clone()));
        let state = AppState {
            db: db_arc,
            config: AppConfig::new("sqlite::memory:", "127.0.0.1", 18_080, "test"),
            event_sender,
            services,
        };

        let router = Router::new()
            .nest("/api/v1", dokan_api::api_v1_routes())
            .with_state(state.clone());

        Self {
            router,
            state,
            _event_task: event_task,
        }
    }

    /// Insert a product variant directly, bypassing the HTTP layer.
    pub async fn seed_variant(
        &self,
        weight_size: &str,
        price: Decimal,
        stock_quantity: i32,
        is_active: bool,
    ) -> product_variant::Model {
        let now = Utc::now();
        product_variant::ActiveModel {
            id: Set(Uuid::new_v4()),
            variant_name: Set(format!("{} Pack", weight_size)),
            weight_size: Set(weight_size.to_string()),
            description: Set(None),
            price: Set(price),
            original_price: Set(None),
            stock_quantity: Set(stock_quantity),
            is_active: Set(is_active),
            badge: Set(None),
            image_url: Set(None),
            display_order: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.state.db)
        .await
        .expect("variant insert")
    }

    /// Insert a site setting row directly.
    pub async fn seed_setting(&self, key: &str, value: &str, setting_type: &str) {
        site_setting::ActiveModel {
            setting_key: Set(key.to_string()),
            setting_value: Set(Some(value.to_string())),
            setting_type: Set(Some(setting_type.to_string())),
            description: Set(None),
            updated_at: Set(Utc::now()),
        }
        .insert(&*self.state.db)
        .await
        .expect("setting insert");
    }

    /// Fire a JSON request at the router and return the raw response.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(path);
        let request = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                builder
                    .body(Body::from(json.to_string()))
                    .expect("request builds")
            }
            None => builder.body(Body::empty()).expect("request builds"),
        };

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router responds")
    }

    /// Fire a JSON request and decode the JSON body, asserting the status.
    pub async fn request_json(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        expected_status: StatusCode,
    ) -> Value {
        let response = self.request(method, path, body).await;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: Value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| panic!("non-JSON body: {}", String::from_utf8_lossy(&bytes)));
        assert_eq!(status, expected_status, "unexpected status, body: {json}");
        json
    }
}
