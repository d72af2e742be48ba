use axum::extract::State;

use crate::api::extract::{ApiPath, ApiQuery};
use crate::api::handlers::AppState;
use crate::api::response::{ApiError, ApiResponse, ApiResult, ResultExt};
use crate::model::{CaseSummaryReport, ContactHours, ContactHoursQuery, DashboardReport, Id};
use crate::store::traits::Store;

pub async fn dashboard<S: Store>(State(state): State<AppState<S>>) -> ApiResult<DashboardReport> {
    let report = state
        .store
        .dashboard()
        .await
        .or_internal("Failed to generate dashboard report")?;
    Ok(ApiResponse::ok(report))
}

pub async fn case_summary<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(id): ApiPath<Id>,
) -> ApiResult<CaseSummaryReport> {
    state
        .store
        .case_summary(id)
        .await
        .or_internal("Failed to generate case summary")?
        .map(ApiResponse::ok)
        .ok_or_else(|| ApiError::not_found("Case not found"))
}

pub async fn contact_hours<S: Store>(
    State(state): State<AppState<S>>,
    ApiQuery(query): ApiQuery<ContactHoursQuery>,
) -> ApiResult<Vec<ContactHours>> {
    let rows = state
        .store
        .contact_hours(&query)
        .await
        .or_internal("Failed to generate contact hours report")?;
    Ok(ApiResponse::list(rows))
}
