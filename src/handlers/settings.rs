use std::collections::BTreeMap;

use axum::{extract::State, response::Json};

use crate::entities::site_setting;
use crate::services::settings::{SettingUpdate, SiteSettings};
use crate::{errors::ServiceError, ApiResponse, AppState};

/// Flat key→value settings map consumed by the landing page at render time
#[utoipa::path(
    get,
    path = "/api/v1/settings",
    summary = "Get site settings",
    responses(
        (status = 200, description = "Settings retrieved", body = ApiResponse<BTreeMap<String, String>>),
    )
)]
pub async fn get_settings(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<BTreeMap<String, String>>>, ServiceError> {
    let map = state.services.settings.as_map().await?;
    Ok(Json(ApiResponse::success(map)))
}

/// Full setting rows (value, type hint, description) for the admin screen
#[utoipa::path(
    get,
    path = "/api/v1/settings/all",
    summary = "List setting rows",
    responses(
        (status = 200, description = "Settings retrieved", body = ApiResponse<Vec<site_setting::Model>>),
    )
)]
pub async fn list_setting_rows(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<site_setting::Model>>>, ServiceError> {
    let rows = state.services.settings.list().await?;
    Ok(Json(ApiResponse::success(rows)))
}

/// Settings parsed into their typed form, defaults applied
#[utoipa::path(
    get,
    path = "/api/v1/settings/typed",
    summary = "Get typed site settings",
    responses(
        (status = 200, description = "Settings retrieved", body = ApiResponse<SiteSettings>),
    )
)]
pub async fn get_typed_settings(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<SiteSettings>>, ServiceError> {
    let settings = state.services.settings.typed().await?;
    Ok(Json(ApiResponse::success(settings)))
}

/// Apply a batch of key/value updates from the admin settings screen
#[utoipa::path(
    put,
    path = "/api/v1/settings",
    summary = "Update site settings",
    request_body = Vec<SettingUpdate>,
    responses(
        (status = 200, description = "Settings saved", body = ApiResponse<BTreeMap<String, String>>),
    )
)]
pub async fn update_settings(
    State(state): State<AppState>,
    Json(updates): Json<Vec<SettingUpdate>>,
) -> Result<Json<ApiResponse<BTreeMap<String, String>>>, ServiceError> {
    state.services.settings.update_many(updates).await?;
    let map = state.services.settings.as_map().await?;
    Ok(Json(ApiResponse::success(map)))
}
