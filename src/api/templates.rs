use axum::extract::State;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::extract::{ApiJson, ApiPath};
use crate::api::handlers::AppState;
use crate::api::response::{ApiError, ApiResponse, ApiResult};
use crate::model::TemplateKind;
use crate::store::traits::Store;
use crate::templates::TemplateInfo;

#[derive(Debug, Deserialize)]
pub struct TemplateUpdate {
    pub template: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct RestoreRequest {
    #[serde(rename = "backupPath")]
    pub backup_path: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoredTemplate {
    pub restored_file: String,
    pub backup_path: String,
}

fn template_kind(slug: &str) -> Result<TemplateKind, ApiError> {
    TemplateKind::from_slug(slug)
        .ok_or_else(|| ApiError::not_found(format!("Unknown template type: {}", slug)))
}

pub async fn get_template<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(slug): ApiPath<String>,
) -> ApiResult<Value> {
    let kind = template_kind(&slug)?;
    let template = state.templates.read(kind).await?;
    Ok(ApiResponse::ok(template))
}

pub async fn update_template<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(slug): ApiPath<String>,
    ApiJson(body): ApiJson<TemplateUpdate>,
) -> ApiResult<Value> {
    let kind = template_kind(&slug)?;
    let Some(template) = body.template.filter(Value::is_object) else {
        return Err(ApiError::bad_request("Template data is required"));
    };

    state.templates.write(kind, &template).await?;
    Ok(ApiResponse::ok(template).with_message(format!("{} template updated successfully", kind.label())))
}

pub async fn list_backups<S: Store>(State(state): State<AppState<S>>) -> ApiResult<Vec<String>> {
    let backups = state.templates.list_backups().await?;
    Ok(ApiResponse::list(backups))
}

pub async fn restore_backup<S: Store>(
    State(state): State<AppState<S>>,
    ApiJson(request): ApiJson<RestoreRequest>,
) -> ApiResult<RestoredTemplate> {
    let Some(backup_path) = request.backup_path.filter(|p| !p.trim().is_empty()) else {
        return Err(ApiError::bad_request("Backup path is required"));
    };

    let restored_file = state.templates.restore(&backup_path).await?;
    Ok(ApiResponse::ok(RestoredTemplate {
        restored_file,
        backup_path,
    })
    .with_message("Template restored successfully"))
}

pub async fn template_info<S: Store>(State(state): State<AppState<S>>) -> ApiResult<TemplateInfo> {
    Ok(ApiResponse::ok(state.templates.info().await))
}
