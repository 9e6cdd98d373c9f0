//! `/api/*` handlers.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mcpilot_core::api::{SaveConfigRequest, SaveConfigResponse, SettingsResponse, StatusReport};
use mcpilot_core::config::{HelperSettings, SettingsUpdate};
use mcpilot_core::document::clean_config_value;
use mcpilot_core::host::HostInfo;
use mcpilot_core::types::TargetSelector;
use mcpilot_core::writer::ConfigWriter;

use crate::state::AppState;

pub async fn status(State(state): State<AppState>) -> Json<StatusReport> {
    Json(StatusReport::running(&state.settings().await))
}

pub async fn hostname(State(state): State<AppState>) -> Json<HostInfo> {
    Json(state.host().clone())
}

pub async fn get_settings(State(state): State<AppState>) -> Json<HelperSettings> {
    Json(state.settings().await)
}

pub async fn update_settings(State(state): State<AppState>, body: Bytes) -> Response {
    let update = match SettingsUpdate::parse(&body) {
        Ok(update) => update,
        Err(err) => {
            tracing::warn!(error = %err, "rejected settings update");
            return (
                StatusCode::BAD_REQUEST,
                Json(SettingsResponse::failure(err.to_string())),
            )
                .into_response();
        }
    };

    let settings = state.apply_update(&update).await;
    tracing::info!(
        max_backups = settings.max_backups,
        code = %settings.paths.code.display(),
        desktop = %settings.paths.desktop.display(),
        cursor = %settings.paths.cursor.display(),
        claude_ide_cursor = %settings.paths.claude_ide_cursor.display(),
        "settings updated"
    );
    Json(SettingsResponse::success(settings)).into_response()
}

pub async fn save_config(State(state): State<AppState>, body: Bytes) -> Response {
    let request = match parse_save_request(&body) {
        Ok(request) => request,
        Err(message) => {
            tracing::warn!(error = %message, "rejected save-config request");
            return (
                StatusCode::BAD_REQUEST,
                Json(SaveConfigResponse::failure(message)),
            )
                .into_response();
        }
    };

    let writer = ConfigWriter::from_settings(&state.settings().await);
    let clean = clean_config_value(&request.config);
    let selector = TargetSelector::parse(&request.target);
    tracing::debug!(selector = %selector, servers = clean.mcp_servers.len(), "saving config");

    let results = match tokio::task::spawn_blocking(move || writer.write(&clean, &selector)).await
    {
        Ok(results) => results,
        Err(err) => {
            tracing::error!(error = %err, "config writer task failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SaveConfigResponse::failure(err.to_string())),
            )
                .into_response();
        }
    };

    tracing::info!(selector = %request.target, results = results.len(), "config save finished");
    Json(SaveConfigResponse::success(results)).into_response()
}

fn parse_save_request(body: &[u8]) -> Result<SaveConfigRequest, String> {
    let request: SaveConfigRequest =
        serde_json::from_slice(body).map_err(|err| err.to_string())?;
    if !request.config.is_object() {
        return Err("config must be a JSON object".to_string());
    }
    Ok(request)
}
