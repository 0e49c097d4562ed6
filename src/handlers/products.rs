use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::product_variant;
use crate::services::catalog::{CreateVariantInput, UpdateVariantInput};
use crate::{errors::ServiceError, ApiResponse, AppState};

#[derive(Debug, Deserialize, ToSchema)]
pub struct LowStockQuery {
    /// Override the configured threshold for this request
    pub threshold: Option<i32>,
}

/// Active product variants as shown on the landing page
#[utoipa::path(
    get,
    path = "/api/v1/products",
    summary = "List active product variants",
    responses(
        (status = 200, description = "Variants retrieved", body = ApiResponse<Vec<product_variant::Model>>),
    )
)]
pub async fn list_active_products(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<product_variant::Model>>>, ServiceError> {
    let variants = state.services.catalog.list_active().await?;
    Ok(Json(ApiResponse::success(variants)))
}

/// Every product variant, active or not, for the admin screen
#[utoipa::path(
    get,
    path = "/api/v1/products/all",
    summary = "List all product variants",
    responses(
        (status = 200, description = "Variants retrieved", body = ApiResponse<Vec<product_variant::Model>>),
    )
)]
pub async fn list_all_products(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<product_variant::Model>>>, ServiceError> {
    let variants = state.services.catalog.list_all().await?;
    Ok(Json(ApiResponse::success(variants)))
}

/// Active variants under the low-stock threshold, lowest stock first
#[utoipa::path(
    get,
    path = "/api/v1/products/low-stock",
    summary = "List low-stock variants",
    params(("threshold" = Option<i32>, Query, description = "Override the configured threshold")),
    responses(
        (status = 200, description = "Variants retrieved", body = ApiResponse<Vec<product_variant::Model>>),
    )
)]
pub async fn list_low_stock(
    State(state): State<AppState>,
    Query(query): Query<LowStockQuery>,
) -> Result<Json<ApiResponse<Vec<product_variant::Model>>>, ServiceError> {
    let threshold = match query.threshold {
        Some(threshold) => threshold,
        None => state.services.settings.typed().await?.low_stock_threshold,
    };
    let variants = state.services.catalog.low_stock(threshold).await?;
    Ok(Json(ApiResponse::success(variants)))
}

/// Get one product variant
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    summary = "Get product variant",
    params(("id" = Uuid, Path, description = "Variant id")),
    responses(
        (status = 200, description = "Variant found", body = ApiResponse<product_variant::Model>),
        (status = 404, description = "Variant not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<product_variant::Model>>, ServiceError> {
    let variant = state.services.catalog.get_variant(id).await?;
    Ok(Json(ApiResponse::success(variant)))
}

/// Create a product variant
#[utoipa::path(
    post,
    path = "/api/v1/products",
    summary = "Create product variant",
    request_body = CreateVariantInput,
    responses(
        (status = 201, description = "Variant created", body = ApiResponse<product_variant::Model>),
        (status = 400, description = "Validation error", body = crate::errors::ErrorResponse),
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<CreateVariantInput>,
) -> Result<(StatusCode, Json<ApiResponse<product_variant::Model>>), ServiceError> {
    let variant = state.services.catalog.create_variant(input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(variant))))
}

/// Update a product variant
#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    summary = "Update product variant",
    request_body = UpdateVariantInput,
    params(("id" = Uuid, Path, description = "Variant id")),
    responses(
        (status = 200, description = "Variant updated", body = ApiResponse<product_variant::Model>),
        (status = 404, description = "Variant not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateVariantInput>,
) -> Result<Json<ApiResponse<product_variant::Model>>, ServiceError> {
    let variant = state.services.catalog.update_variant(id, input).await?;
    Ok(Json(ApiResponse::success(variant)))
}

/// Delete a product variant; blocked while orders reference it
#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    summary = "Delete product variant",
    params(("id" = Uuid, Path, description = "Variant id")),
    responses(
        (status = 200, description = "Variant deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Variant not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Variant referenced by orders", body = crate::errors::ErrorResponse),
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ServiceError> {
    state.services.catalog.delete_variant(id).await?;
    Ok(Json(ApiResponse::success(
        serde_json::json!({ "deleted": id }),
    )))
}
