//! Completion-provider API routes (read-only).

use crate::api::error::{ApiError, ApiResult};
use crate::config::Config;
use crate::structurer::{
    get_provider_info_from_config, get_provider_status_from_config, ProviderInfo, ProviderStatus,
};
use axum::{response::Json, routing::get, Router};

/// Create the provider router.
pub fn router() -> Router {
    Router::new()
        .route("/", get(provider_info))
        .route("/status", get(provider_status))
}

/// GET /provider - Provider configuration summary (no secrets).
async fn provider_info() -> ApiResult<Json<ProviderInfo>> {
    let config = Config::load().map_err(ApiError::from)?;
    Ok(Json(get_provider_info_from_config(&config.ai)))
}

/// GET /provider/status - Validation status of the configured provider.
async fn provider_status() -> ApiResult<Json<ProviderStatus>> {
    let config = Config::load().map_err(ApiError::from)?;
    Ok(Json(get_provider_status_from_config(&config.ai)))
}
