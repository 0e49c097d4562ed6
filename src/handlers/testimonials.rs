use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use uuid::Uuid;

use crate::entities::testimonial;
use crate::services::testimonials::{CreateTestimonialInput, UpdateTestimonialInput};
use crate::{errors::ServiceError, ApiResponse, AppState};

/// Active testimonials as shown on the landing page
#[utoipa::path(
    get,
    path = "/api/v1/testimonials",
    summary = "List active testimonials",
    responses(
        (status = 200, description = "Testimonials retrieved", body = ApiResponse<Vec<testimonial::Model>>),
    )
)]
pub async fn list_active_testimonials(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<testimonial::Model>>>, ServiceError> {
    let testimonials = state.services.testimonials.list_active().await?;
    Ok(Json(ApiResponse::success(testimonials)))
}

/// Every testimonial for the admin screen
#[utoipa::path(
    get,
    path = "/api/v1/testimonials/all",
    summary = "List all testimonials",
    responses(
        (status = 200, description = "Testimonials retrieved", body = ApiResponse<Vec<testimonial::Model>>),
    )
)]
pub async fn list_all_testimonials(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<testimonial::Model>>>, ServiceError> {
    let testimonials = state.services.testimonials.list_all().await?;
    Ok(Json(ApiResponse::success(testimonials)))
}

/// Create a testimonial
#[utoipa::path(
    post,
    path = "/api/v1/testimonials",
    summary = "Create testimonial",
    request_body = CreateTestimonialInput,
    responses(
        (status = 201, description = "Testimonial created", body = ApiResponse<testimonial::Model>),
        (status = 400, description = "Validation error", body = crate::errors::ErrorResponse),
    )
)]
pub async fn create_testimonial(
    State(state): State<AppState>,
    Json(input): Json<CreateTestimonialInput>,
) -> Result<(StatusCode, Json<ApiResponse<testimonial::Model>>), ServiceError> {
    let testimonial = state.services.testimonials.create_testimonial(input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(testimonial))))
}

/// Update a testimonial
#[utoipa::path(
    put,
    path = "/api/v1/testimonials/{id}",
    summary = "Update testimonial",
    request_body = UpdateTestimonialInput,
    params(("id" = Uuid, Path, description = "Testimonial id")),
    responses(
        (status = 200, description = "Testimonial updated", body = ApiResponse<testimonial::Model>),
        (status = 404, description = "Testimonial not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn update_testimonial(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateTestimonialInput>,
) -> Result<Json<ApiResponse<testimonial::Model>>, ServiceError> {
    let testimonial = state
        .services
        .testimonials
        .update_testimonial(id, input)
        .await?;
    Ok(Json(ApiResponse::success(testimonial)))
}

/// Delete a testimonial
#[utoipa::path(
    delete,
    path = "/api/v1/testimonials/{id}",
    summary = "Delete testimonial",
    params(("id" = Uuid, Path, description = "Testimonial id")),
    responses(
        (status = 200, description = "Testimonial deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Testimonial not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn delete_testimonial(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ServiceError> {
    state.services.testimonials.delete_testimonial(id).await?;
    Ok(Json(ApiResponse::success(
        serde_json::json!({ "deleted": id }),
    )))
}
