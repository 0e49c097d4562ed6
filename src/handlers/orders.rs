use std::str::FromStr;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::{order, order_status_history, product_variant};
use crate::services::order_status::UpdateOrderStatusRequest;
use crate::services::orders::{OrderListFilter, UpdateOrderNotesRequest};
use crate::{errors::ServiceError, ApiResponse, AppState, PaginatedResponse};

/// Query parameters for the admin order list and the CSV export.
#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    /// Exact status filter; omit or pass "all" for every status
    pub status: Option<String>,
    /// Case-insensitive substring over customer name, phone, order number
    pub search: Option<String>,
}

fn default_page() -> u64 {
    1
}
fn default_limit() -> u64 {
    20
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderProductInfo {
    pub variant_name: String,
    pub weight_size: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub order_number: String,
    pub customer_name: String,
    pub phone_number: String,
    pub delivery_address: String,
    pub product_variant_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<OrderProductInfo>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub order_status: order::OrderStatus,
    pub payment_method: String,
    pub customer_notes: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusHistoryResponse {
    pub id: Uuid,
    pub old_status: Option<String>,
    pub new_status: String,
    pub changed_at: DateTime<Utc>,
    pub changed_by: Option<String>,
    pub notes: Option<String>,
}

pub(crate) fn map_order(
    model: order::Model,
    variant: Option<product_variant::Model>,
) -> Result<OrderResponse, ServiceError> {
    let order_status = order::OrderStatus::from_str(&model.order_status).map_err(|_| {
        ServiceError::InvalidStatus(format!("Unknown order status: {}", model.order_status))
    })?;

    Ok(OrderResponse {
        id: model.id,
        order_number: model.order_number,
        customer_name: model.customer_name,
        phone_number: model.phone_number,
        delivery_address: model.delivery_address,
        product_variant_id: model.product_variant_id,
        product: variant.map(|v| OrderProductInfo {
            variant_name: v.variant_name,
            weight_size: v.weight_size,
        }),
        quantity: model.quantity,
        unit_price: model.unit_price,
        total_price: model.total_price,
        order_status,
        payment_method: model.payment_method,
        customer_notes: model.customer_notes,
        notes: model.notes,
        created_at: model.created_at,
        updated_at: model.updated_at,
        cancelled_at: model.cancelled_at,
        delivered_at: model.delivered_at,
    })
}

fn map_history(model: order_status_history::Model) -> StatusHistoryResponse {
    StatusHistoryResponse {
        id: model.id,
        old_status: model.old_status,
        new_status: model.new_status,
        changed_at: model.changed_at,
        changed_by: model.changed_by,
        notes: model.notes,
    }
}

fn parse_filter(query: &OrderListQuery) -> Result<OrderListFilter, ServiceError> {
    let status = match query.status.as_deref() {
        None | Some("all") | Some("") => None,
        Some(raw) => Some(order::OrderStatus::from_str(raw).map_err(|_| {
            ServiceError::InvalidStatus(format!("Unknown order status: {}", raw))
        })?),
    };

    Ok(OrderListFilter {
        status,
        search: query.search.clone(),
    })
}

/// List orders with filtering and pagination
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    summary = "List orders",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("limit" = Option<u64>, Query, description = "Items per page (default: 20)"),
        ("status" = Option<String>, Query, description = "Exact status filter, or \"all\""),
        ("search" = Option<String>, Query, description = "Substring over name/phone/order number"),
    ),
    responses(
        (status = 200, description = "Orders retrieved", body = ApiResponse<PaginatedResponse<OrderResponse>>),
        (status = 400, description = "Invalid status filter", body = crate::errors::ErrorResponse),
    )
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<OrderResponse>>>, ServiceError> {
    let filter = parse_filter(&query)?;
    let page = query.page.max(1);
    let limit = query.limit.max(1);

    let result = state
        .services
        .orders
        .list_orders(&filter, page, limit)
        .await?;

    let items: Vec<OrderResponse> = result
        .orders
        .into_iter()
        .map(|(model, variant)| map_order(model, variant))
        .collect::<Result<_, _>>()?;

    let total_pages = result.total.div_ceil(limit);
    Ok(Json(ApiResponse::success(PaginatedResponse {
        items,
        total: result.total,
        page,
        limit,
        total_pages,
    })))
}

/// Get a single order by id
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    summary = "Get order",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order found", body = ApiResponse<OrderResponse>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<OrderResponse>>, ServiceError> {
    let model = state.services.orders.get_order(id).await?;
    let variant = state.services.catalog.get_variant(model.product_variant_id).await.ok();
    Ok(Json(ApiResponse::success(map_order(model, variant)?)))
}

/// Get a single order by its human-readable order number
#[utoipa::path(
    get,
    path = "/api/v1/orders/by-number/{order_number}",
    summary = "Get order by number",
    params(("order_number" = String, Path, description = "Order number")),
    responses(
        (status = 200, description = "Order found", body = ApiResponse<OrderResponse>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn get_order_by_number(
    State(state): State<AppState>,
    Path(order_number): Path<String>,
) -> Result<Json<ApiResponse<OrderResponse>>, ServiceError> {
    let model = state
        .services
        .orders
        .get_order_by_number(&order_number)
        .await?;
    let variant = state.services.catalog.get_variant(model.product_variant_id).await.ok();
    Ok(Json(ApiResponse::success(map_order(model, variant)?)))
}

/// Update an order's status
#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}/status",
    summary = "Update order status",
    request_body = UpdateOrderStatusRequest,
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Unknown status", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateOrderStatusRequest>,
) -> Result<Json<ApiResponse<OrderResponse>>, ServiceError> {
    let model = state.services.order_status.update_status(id, request).await?;
    Ok(Json(ApiResponse::success(map_order(model, None)?)))
}

/// Update an order's notes
#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}",
    summary = "Update order notes",
    request_body = UpdateOrderNotesRequest,
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order updated", body = ApiResponse<OrderResponse>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateOrderNotesRequest>,
) -> Result<Json<ApiResponse<OrderResponse>>, ServiceError> {
    let model = state.services.orders.update_notes(id, request).await?;
    Ok(Json(ApiResponse::success(map_order(model, None)?)))
}

/// Delete an order (hard delete, removes its status history)
#[utoipa::path(
    delete,
    path = "/api/v1/orders/{id}",
    summary = "Delete order",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ServiceError> {
    state.services.orders.delete_order(id).await?;
    Ok(Json(ApiResponse::success(
        serde_json::json!({ "deleted": id }),
    )))
}

/// Status transition audit trail for an order
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}/history",
    summary = "Order status history",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "History retrieved", body = ApiResponse<Vec<StatusHistoryResponse>>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn order_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<StatusHistoryResponse>>>, ServiceError> {
    let rows = state.services.orders.status_history(id).await?;
    let items = rows.into_iter().map(map_history).collect();
    Ok(Json(ApiResponse::success(items)))
}

/// Export the currently filtered order list as CSV
#[utoipa::path(
    get,
    path = "/api/v1/orders/export",
    summary = "Export orders as CSV",
    params(
        ("status" = Option<String>, Query, description = "Exact status filter, or \"all\""),
        ("search" = Option<String>, Query, description = "Substring over name/phone/order number"),
    ),
    responses(
        (status = 200, description = "CSV document", content_type = "text/csv"),
        (status = 400, description = "Invalid status filter", body = crate::errors::ErrorResponse),
    )
)]
pub async fn export_orders_csv(
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> Result<Response, ServiceError> {
    let filter = parse_filter(&query)?;
    let csv = state.services.orders.export_csv(&filter).await?;

    let filename = format!("orders_{}.csv", Utc::now().format("%Y-%m-%d"));
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        csv,
    )
        .into_response())
}
