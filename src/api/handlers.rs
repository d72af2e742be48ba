use axum::response::Json;
use serde::Serialize;
use std::sync::Arc;

use crate::api::response::ApiError;
use crate::config::AppConfig;
use crate::templates::TemplateStore;

/// Everything a handler can reach: the database, the template files and
/// the loaded configuration.
#[derive(Debug)]
pub struct AppContext<S> {
    pub store: S,
    pub templates: TemplateStore,
    pub config: AppConfig,
}

impl<S> AppContext<S> {
    pub fn new(store: S, templates: TemplateStore, config: AppConfig) -> Self {
        Self {
            store,
            templates,
            config,
        }
    }
}

pub type AppState<S> = Arc<AppContext<S>>;

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn route_not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
