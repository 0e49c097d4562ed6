use axum::{extract::State, http::StatusCode, response::Json};

use crate::services::checkout::{CheckoutConfirmation, CheckoutRequest};
use crate::{errors::ServiceError, ApiResponse, AppState};

/// Accept a checkout submission
///
/// Validates the shopper's input, resolves the price from current catalog
/// state and creates a Pending order.
#[utoipa::path(
    post,
    path = "/api/v1/checkout",
    summary = "Submit checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Order accepted", body = ApiResponse<CheckoutConfirmation>),
        (status = 400, description = "Field-level validation errors", body = crate::errors::ErrorResponse),
        (status = 404, description = "Selected package no longer offered", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    )
)]
pub async fn submit_checkout(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CheckoutConfirmation>>), ServiceError> {
    let confirmation = state.services.checkout.submit(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(confirmation))))
}
