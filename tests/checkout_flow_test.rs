//! End-to-end checkout tests: validation, server-side pricing, persistence.

mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use rust_decimal_macros::dec;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;

use dokan_api::entities::order;
use dokan_api::services::catalog::UpdateVariantInput;

fn valid_payload() -> serde_json::Value {
    json!({
        "name": "Rahim Ahmed",
        "phone": "01712345678",
        "address": "House 12, Road 5, Dhanmondi, Dhaka-1209",
        "package": "250g",
        "quantity": 1
    })
}

#[tokio::test]
async fn accepts_valid_checkout_and_prices_from_catalog() {
    let app = TestApp::new().await;
    app.seed_variant("250g", dec!(999), 60, true).await;

    let body = app
        .request_json(
            Method::POST,
            "/api/v1/checkout",
            Some(valid_payload()),
            StatusCode::CREATED,
        )
        .await;

    assert_eq!(body["success"], true);
    let order_number = body["data"]["order_number"].as_str().expect("order number");
    assert!(order_number.starts_with("ORD-"));
    assert_eq!(body["data"]["total_price"], "999");

    // The persisted order is Pending, with price fields fixed at creation.
    let stored = order::Entity::find()
        .one(&*app.state.db)
        .await
        .unwrap()
        .expect("order persisted");
    assert_eq!(stored.order_number, order_number);
    assert_eq!(stored.order_status, "Pending");
    assert_eq!(stored.unit_price, dec!(999));
    assert_eq!(stored.total_price, dec!(999));
    assert_eq!(stored.payment_method, "Cash on Delivery");
    assert!(stored.cancelled_at.is_none());
    assert!(stored.delivered_at.is_none());
}

#[tokio::test]
async fn quantity_multiplies_the_catalog_unit_price() {
    let app = TestApp::new().await;
    app.seed_variant("500g", dec!(1499), 40, true).await;

    let mut payload = valid_payload();
    payload["package"] = json!("500g");
    payload["quantity"] = json!(3);

    let body = app
        .request_json(
            Method::POST,
            "/api/v1/checkout",
            Some(payload),
            StatusCode::CREATED,
        )
        .await;

    assert_eq!(body["data"]["unit_price"], "1499");
    assert_eq!(body["data"]["total_price"], "4497");
}

#[tokio::test]
async fn rejects_short_name_and_address_with_field_errors() {
    let app = TestApp::new().await;
    app.seed_variant("250g", dec!(999), 60, true).await;

    let mut payload = valid_payload();
    payload["name"] = json!("Ra");
    payload["address"] = json!("short");

    let body = app
        .request_json(
            Method::POST,
            "/api/v1/checkout",
            Some(payload),
            StatusCode::BAD_REQUEST,
        )
        .await;

    let field_errors = body["field_errors"].as_object().expect("field errors map");
    assert!(field_errors.contains_key("name"));
    assert!(field_errors.contains_key("address"));
    assert!(!field_errors.contains_key("phone"));

    // No partial writes.
    let count = order::Entity::find().count(&*app.state.db).await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn unknown_package_fails_closed() {
    let app = TestApp::new().await;
    app.seed_variant("250g", dec!(999), 60, true).await;

    let mut payload = valid_payload();
    payload["package"] = json!("750g");

    let body = app
        .request_json(
            Method::POST,
            "/api/v1/checkout",
            Some(payload),
            StatusCode::BAD_REQUEST,
        )
        .await;

    assert!(body["field_errors"]["package"].is_string());
    let count = order::Entity::find().count(&*app.state.db).await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn inactive_variant_is_not_orderable() {
    let app = TestApp::new().await;
    app.seed_variant("250g", dec!(999), 60, false).await;

    let body = app
        .request_json(
            Method::POST,
            "/api/v1/checkout",
            Some(valid_payload()),
            StatusCode::BAD_REQUEST,
        )
        .await;

    assert!(body["field_errors"]["package"].is_string());
}

#[tokio::test]
async fn quantity_above_cap_is_rejected() {
    let app = TestApp::new().await;
    app.seed_variant("250g", dec!(999), 60, true).await;

    let mut payload = valid_payload();
    payload["quantity"] = json!(11);

    let body = app
        .request_json(
            Method::POST,
            "/api/v1/checkout",
            Some(payload),
            StatusCode::BAD_REQUEST,
        )
        .await;

    assert!(body["field_errors"]["quantity"].is_string());
}

#[tokio::test]
async fn client_supplied_price_fields_are_refused() {
    let app = TestApp::new().await;
    app.seed_variant("250g", dec!(999), 60, true).await;

    let mut payload = valid_payload();
    payload["unit_price"] = json!("1");

    // The request schema has no price field at all; extra fields are refused
    // outright rather than ignored.
    let response = app
        .request(Method::POST, "/api/v1/checkout", Some(payload))
        .await;
    assert!(response.status().is_client_error());

    let count = order::Entity::find().count(&*app.state.db).await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn total_price_is_immutable_after_catalog_price_change() {
    let app = TestApp::new().await;
    let variant = app.seed_variant("250g", dec!(999), 60, true).await;

    app.request_json(
        Method::POST,
        "/api/v1/checkout",
        Some(valid_payload()),
        StatusCode::CREATED,
    )
    .await;

    // Reprice the variant after the sale.
    app.state
        .services
        .catalog
        .update_variant(
            variant.id,
            UpdateVariantInput {
                variant_name: None,
                weight_size: None,
                description: None,
                price: Some(dec!(1299)),
                original_price: None,
                stock_quantity: None,
                is_active: None,
                badge: None,
                image_url: None,
                display_order: None,
            },
        )
        .await
        .unwrap();

    let stored = order::Entity::find()
        .one(&*app.state.db)
        .await
        .unwrap()
        .expect("order persisted");
    assert_eq!(stored.unit_price, dec!(999));
    assert_eq!(stored.total_price, dec!(999));
}
