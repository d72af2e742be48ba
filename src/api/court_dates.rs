use axum::extract::State;

use crate::api::cases::ensure_case;
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::api::handlers::AppState;
use crate::api::response::{ApiError, ApiResponse, ApiResult, ResultExt};
use crate::model::{is_blank, CourtDate, CourtDateFilter, CourtDateUpdate, Id, NewCourtDate};
use crate::store::traits::Store;

pub async fn list_court_dates<S: Store>(
    State(state): State<AppState<S>>,
    ApiQuery(filter): ApiQuery<CourtDateFilter>,
) -> ApiResult<Vec<CourtDate>> {
    let dates = state
        .store
        .list_court_dates(&filter)
        .await
        .or_internal("Failed to fetch court dates")?;
    Ok(ApiResponse::list(dates))
}

pub async fn get_court_date<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(id): ApiPath<Id>,
) -> ApiResult<CourtDate> {
    state
        .store
        .get_court_date(id)
        .await
        .or_internal("Failed to fetch court date")?
        .map(ApiResponse::ok)
        .ok_or_else(|| ApiError::not_found("Court date not found"))
}

pub async fn create_court_date<S: Store>(
    State(state): State<AppState<S>>,
    ApiJson(new_date): ApiJson<NewCourtDate>,
) -> ApiResult<CourtDate> {
    let Some(case_id) = new_date.case_id.filter(|_| new_date.has_required_fields()) else {
        return Err(ApiError::bad_request("Case ID and court date are required"));
    };
    ensure_case(&state, case_id, "Failed to create court date").await?;

    let date = state
        .store
        .create_court_date(&new_date)
        .await
        .or_internal("Failed to create court date")?;
    Ok(ApiResponse::created(date).with_message("Court date created successfully"))
}

pub async fn update_court_date<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(id): ApiPath<Id>,
    ApiJson(update): ApiJson<CourtDateUpdate>,
) -> ApiResult<CourtDate> {
    if state
        .store
        .get_court_date(id)
        .await
        .or_internal("Failed to update court date")?
        .is_none()
    {
        return Err(ApiError::not_found("Court date not found"));
    }
    if update.is_empty() {
        return Err(ApiError::bad_request("No valid fields to update"));
    }
    if update.court_date.as_deref().is_some_and(is_blank) {
        return Err(ApiError::bad_request("Court date cannot be empty"));
    }

    state
        .store
        .update_court_date(id, &update)
        .await
        .or_internal("Failed to update court date")?
        .map(|date| ApiResponse::ok(date).with_message("Court date updated successfully"))
        .ok_or_else(|| ApiError::not_found("Court date not found"))
}

pub async fn delete_court_date<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(id): ApiPath<Id>,
) -> ApiResult<()> {
    if !state
        .store
        .delete_court_date(id)
        .await
        .or_internal("Failed to delete court date")?
    {
        return Err(ApiError::not_found("Court date not found"));
    }
    Ok(ApiResponse::message("Court date deleted successfully"))
}
