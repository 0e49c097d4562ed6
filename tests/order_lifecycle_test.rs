//! Order lifecycle tests: status machine side effects, history, deletion,
//! list filtering and search.

mod common;

use assert_matches::assert_matches;
use axum::http::{Method, StatusCode};
use common::TestApp;
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::json;
use uuid::Uuid;

use dokan_api::entities::{order::OrderStatus, order_status_history};
use dokan_api::errors::ServiceError;
use dokan_api::services::checkout::CheckoutRequest;
use dokan_api::services::order_status::UpdateOrderStatusRequest;

async fn place_order(app: &TestApp, name: &str, phone: &str) -> Uuid {
    let confirmation = app
        .state
        .services
        .checkout
        .submit(CheckoutRequest {
            name: name.to_string(),
            phone: phone.to_string(),
            address: "House 12, Road 5, Dhanmondi, Dhaka-1209".to_string(),
            package: "250g".to_string(),
            quantity: 1,
            customer_notes: None,
        })
        .await
        .expect("checkout accepted");
    confirmation.order_id
}

fn status_request(status: OrderStatus) -> UpdateOrderStatusRequest {
    UpdateOrderStatusRequest {
        status,
        changed_by: Some("admin".to_string()),
        notes: None,
    }
}

#[tokio::test]
async fn delivering_an_order_stamps_delivered_at_and_appends_history() {
    let app = TestApp::new().await;
    app.seed_variant("250g", dec!(999), 60, true).await;
    let order_id = place_order(&app, "Rahim Ahmed", "01712345678").await;

    let updated = app
        .state
        .services
        .order_status
        .update_status(order_id, status_request(OrderStatus::Delivered))
        .await
        .unwrap();

    assert_eq!(updated.order_status, "Delivered");
    assert!(updated.delivered_at.is_some());
    assert!(updated.cancelled_at.is_none());

    let history = app
        .state
        .services
        .orders
        .status_history(order_id)
        .await
        .unwrap();
    // Creation row plus the transition.
    assert_eq!(history.len(), 2);
    let last = history.last().unwrap();
    assert_eq!(last.old_status.as_deref(), Some("Pending"));
    assert_eq!(last.new_status, "Delivered");
    assert_eq!(last.changed_by.as_deref(), Some("admin"));
}

#[tokio::test]
async fn cancelling_stamps_cancelled_at_only() {
    let app = TestApp::new().await;
    app.seed_variant("250g", dec!(999), 60, true).await;
    let order_id = place_order(&app, "Rahim Ahmed", "01712345678").await;

    let updated = app
        .state
        .services
        .order_status
        .update_status(order_id, status_request(OrderStatus::Cancelled))
        .await
        .unwrap();

    assert!(updated.cancelled_at.is_some());
    assert!(updated.delivered_at.is_none());
}

#[tokio::test]
async fn leaving_a_terminal_state_clears_its_timestamp() {
    let app = TestApp::new().await;
    app.seed_variant("250g", dec!(999), 60, true).await;
    let order_id = place_order(&app, "Rahim Ahmed", "01712345678").await;

    let svc = &app.state.services.order_status;

    let delivered = svc
        .update_status(order_id, status_request(OrderStatus::Delivered))
        .await
        .unwrap();
    assert!(delivered.delivered_at.is_some());

    // The permissive graph allows reopening a delivered order.
    let reopened = svc
        .update_status(order_id, status_request(OrderStatus::Confirmed))
        .await
        .unwrap();
    assert_eq!(reopened.order_status, "Confirmed");
    assert!(reopened.delivered_at.is_none());
    assert!(reopened.cancelled_at.is_none());

    // Delivered → Cancelled swaps which terminal timestamp is set.
    svc.update_status(order_id, status_request(OrderStatus::Delivered))
        .await
        .unwrap();
    let crossed = svc
        .update_status(order_id, status_request(OrderStatus::Cancelled))
        .await
        .unwrap();
    assert!(crossed.cancelled_at.is_some());
    assert!(crossed.delivered_at.is_none());
}

#[tokio::test]
async fn every_transition_appends_exactly_one_history_row() {
    let app = TestApp::new().await;
    app.seed_variant("250g", dec!(999), 60, true).await;
    let order_id = place_order(&app, "Rahim Ahmed", "01712345678").await;

    let svc = &app.state.services.order_status;
    for status in [
        OrderStatus::Confirmed,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
    ] {
        svc.update_status(order_id, status_request(status))
            .await
            .unwrap();
    }

    let history = app
        .state
        .services
        .orders
        .status_history(order_id)
        .await
        .unwrap();
    assert_eq!(history.len(), 4);
    let transitions: Vec<(Option<&str>, &str)> = history
        .iter()
        .map(|row| (row.old_status.as_deref(), row.new_status.as_str()))
        .collect();
    assert_eq!(
        transitions,
        vec![
            (None, "Pending"),
            (Some("Pending"), "Confirmed"),
            (Some("Confirmed"), "Out for Delivery"),
            (Some("Out for Delivery"), "Delivered"),
        ]
    );
}

#[tokio::test]
async fn updating_a_missing_order_fails_with_not_found() {
    let app = TestApp::new().await;

    let result = app
        .state
        .services
        .order_status
        .update_status(Uuid::new_v4(), status_request(OrderStatus::Confirmed))
        .await;

    assert_matches!(result, Err(ServiceError::NotFound(_)));
}

#[tokio::test]
async fn status_update_over_http_returns_updated_order() {
    let app = TestApp::new().await;
    app.seed_variant("250g", dec!(999), 60, true).await;
    let order_id = place_order(&app, "Rahim Ahmed", "01712345678").await;

    let body = app
        .request_json(
            Method::PUT,
            &format!("/api/v1/orders/{}/status", order_id),
            Some(json!({ "status": "Out for Delivery" })),
            StatusCode::OK,
        )
        .await;

    assert_eq!(body["data"]["order_status"], "Out for Delivery");

    let unknown = app
        .request(
            Method::PUT,
            &format!("/api/v1/orders/{}/status", order_id),
            Some(json!({ "status": "Shipped" })),
        )
        .await;
    assert!(unknown.status().is_client_error());
}

#[tokio::test]
async fn deleting_an_order_removes_its_history() {
    let app = TestApp::new().await;
    app.seed_variant("250g", dec!(999), 60, true).await;
    let order_id = place_order(&app, "Rahim Ahmed", "01712345678").await;

    app.state
        .services
        .order_status
        .update_status(order_id, status_request(OrderStatus::Confirmed))
        .await
        .unwrap();

    app.state
        .services
        .orders
        .delete_order(order_id)
        .await
        .unwrap();

    let orphaned = order_status_history::Entity::find()
        .filter(order_status_history::Column::OrderId.eq(order_id))
        .count(&*app.state.db)
        .await
        .unwrap();
    assert_eq!(orphaned, 0);

    let again = app.state.services.orders.delete_order(order_id).await;
    assert_matches!(again, Err(ServiceError::NotFound(_)));
}

#[tokio::test]
async fn list_filters_by_status_and_searches_case_insensitively() {
    let app = TestApp::new().await;
    app.seed_variant("250g", dec!(999), 60, true).await;

    let first = place_order(&app, "Rahim Ahmed", "01712345678").await;
    let _second = place_order(&app, "Karim Uddin", "01898765432").await;

    app.state
        .services
        .order_status
        .update_status(first, status_request(OrderStatus::Confirmed))
        .await
        .unwrap();

    let confirmed = app
        .request_json(
            Method::GET,
            "/api/v1/orders?status=Confirmed",
            None,
            StatusCode::OK,
        )
        .await;
    assert_eq!(confirmed["data"]["total"], 1);
    assert_eq!(confirmed["data"]["items"][0]["customer_name"], "Rahim Ahmed");

    let searched = app
        .request_json(
            Method::GET,
            "/api/v1/orders?search=KARIM",
            None,
            StatusCode::OK,
        )
        .await;
    assert_eq!(searched["data"]["total"], 1);
    assert_eq!(searched["data"]["items"][0]["customer_name"], "Karim Uddin");

    let by_phone = app
        .request_json(
            Method::GET,
            "/api/v1/orders?search=0171",
            None,
            StatusCode::OK,
        )
        .await;
    assert_eq!(by_phone["data"]["total"], 1);

    let everything = app
        .request_json(Method::GET, "/api/v1/orders?status=all", None, StatusCode::OK)
        .await;
    assert_eq!(everything["data"]["total"], 2);
}

#[tokio::test]
async fn admin_notes_can_be_edited() {
    let app = TestApp::new().await;
    app.seed_variant("250g", dec!(999), 60, true).await;
    let order_id = place_order(&app, "Rahim Ahmed", "01712345678").await;

    let body = app
        .request_json(
            Method::PUT,
            &format!("/api/v1/orders/{}", order_id),
            Some(json!({ "notes": "Call before delivery" })),
            StatusCode::OK,
        )
        .await;

    assert_eq!(body["data"]["notes"], "Call before delivery");
}

#[tokio::test]
async fn variant_referenced_by_an_order_cannot_be_deleted() {
    let app = TestApp::new().await;
    let variant = app.seed_variant("250g", dec!(999), 60, true).await;
    place_order(&app, "Rahim Ahmed", "01712345678").await;

    let result = app
        .state
        .services
        .catalog
        .delete_variant(variant.id)
        .await;
    assert_matches!(result, Err(ServiceError::Conflict(_)));

    let over_http = app
        .request(
            Method::DELETE,
            &format!("/api/v1/products/{}", variant.id),
            None,
        )
        .await;
    assert_eq!(over_http.status(), StatusCode::CONFLICT);
}
