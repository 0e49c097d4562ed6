//! dokan-api library
//!
//! Backend for a direct-to-consumer storefront: public checkout plus the
//! admin back office for orders, product variants, testimonials and site
//! settings.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod services;

use std::sync::Arc;

use axum::{
    extract::State,
    response::Json,
    routing::{get, post, put},
    Router,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

/// Common response wrapper for every successful endpoint.
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

/// The full v1 API surface.
pub fn api_v1_routes() -> Router<AppState> {
    let checkout = Router::new().route("/checkout", post(handlers::checkout::submit_checkout));

    let orders = Router::new()
        .route("/orders", get(handlers::orders::list_orders))
        .route("/orders/export", get(handlers::orders::export_orders_csv))
        .route(
            "/orders/by-number/:order_number",
            get(handlers::orders::get_order_by_number),
        )
        .route(
            "/orders/:id",
            get(handlers::orders::get_order)
                .put(handlers::orders::update_order)
                .delete(handlers::orders::delete_order),
        )
        .route(
            "/orders/:id/status",
            put(handlers::orders::update_order_status),
        )
        .route("/orders/:id/history", get(handlers::orders::order_history));

    let products = Router::new()
        .route(
            "/products",
            get(handlers::products::list_active_products)
                .post(handlers::products::create_product),
        )
        .route("/products/all", get(handlers::products::list_all_products))
        .route("/products/low-stock", get(handlers::products::list_low_stock))
        .route(
            "/products/:id",
            get(handlers::products::get_product)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        );

    let testimonials = Router::new()
        .route(
            "/testimonials",
            get(handlers::testimonials::list_active_testimonials)
                .post(handlers::testimonials::create_testimonial),
        )
        .route(
            "/testimonials/all",
            get(handlers::testimonials::list_all_testimonials),
        )
        .route(
            "/testimonials/:id",
            put(handlers::testimonials::update_testimonial)
                .delete(handlers::testimonials::delete_testimonial),
        );

    let settings = Router::new()
        .route(
            "/settings",
            get(handlers::settings::get_settings).put(handlers::settings::update_settings),
        )
        .route("/settings/all", get(handlers::settings::list_setting_rows))
        .route("/settings/typed", get(handlers::settings::get_typed_settings));

    let dashboard = Router::new()
        .route("/dashboard/stats", get(handlers::dashboard::dashboard_stats))
        .route(
            "/dashboard/recent-orders",
            get(handlers::dashboard::recent_orders),
        );

    Router::new()
        .route("/status", get(api_status))
        .route("/health", get(health_check))
        .merge(checkout)
        .merge(orders)
        .merge(products)
        .merge(testimonials)
        .merge(settings)
        .merge(dashboard)
}

async fn api_status() -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let status_data = json!({
        "status": "ok",
        "service": "dokan-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "environment": std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
    });

    Ok(Json(ApiResponse::success(status_data)))
}

async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let db_status = match state.db.ping().await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };

    let health_data = json!({
        "status": db_status,
        "checks": {
            "database": db_status,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    Ok(Json(ApiResponse::success(health_data)))
}

#[cfg(test)]
mod response_tests {
    use super::*;

    #[test]
    fn success_response_wraps_data() {
        let response = ApiResponse::success("ok");
        assert!(response.success);
        assert_eq!(response.data, Some("ok"));
        assert!(response.message.is_none());
        chrono::DateTime::parse_from_rfc3339(&response.timestamp).expect("timestamp should parse");
    }

    #[test]
    fn message_response_carries_both() {
        let response = ApiResponse::message(5, "saved");
        assert!(response.success);
        assert_eq!(response.data, Some(5));
        assert_eq!(response.message.as_deref(), Some("saved"));
    }
}
