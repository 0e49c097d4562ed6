use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::handlers::orders::OrderResponse;
use crate::services::reports::DashboardStats;
use crate::{errors::ServiceError, ApiResponse, AppState};

const DEFAULT_RECENT_LIMIT: u64 = 10;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RecentOrdersQuery {
    pub limit: Option<u64>,
}

/// Aggregate dashboard metrics: counts, revenue, low-stock alerts
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/stats",
    summary = "Dashboard statistics",
    responses(
        (status = 200, description = "Statistics computed", body = ApiResponse<DashboardStats>),
    )
)]
pub async fn dashboard_stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DashboardStats>>, ServiceError> {
    let stats = state.services.dashboard.stats().await?;
    Ok(Json(ApiResponse::success(stats)))
}

/// The newest orders for the dashboard feed
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/recent-orders",
    summary = "Recent orders",
    params(("limit" = Option<u64>, Query, description = "Number of orders (default: 10)")),
    responses(
        (status = 200, description = "Orders retrieved", body = ApiResponse<Vec<OrderResponse>>),
    )
)]
pub async fn recent_orders(
    State(state): State<AppState>,
    Query(query): Query<RecentOrdersQuery>,
) -> Result<Json<ApiResponse<Vec<OrderResponse>>>, ServiceError> {
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT).clamp(1, 100);
    let rows = state.services.dashboard.recent_orders(limit).await?;

    let items: Vec<OrderResponse> = rows
        .into_iter()
        .map(|(model, variant)| super::orders::map_order(model, variant))
        .collect::<Result<_, _>>()?;

    Ok(Json(ApiResponse::success(items)))
}
