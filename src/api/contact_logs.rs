use axum::extract::State;

use crate::api::cases::ensure_case;
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::api::handlers::AppState;
use crate::api::response::{ApiError, ApiResponse, ApiResult, ResultExt};
use crate::model::{
    ContactLog, ContactLogFilter, ContactLogUpdate, ContactLogWithNames, Id, NewContactLog,
};
use crate::store::traits::Store;

pub async fn list_contact_logs<S: Store>(
    State(state): State<AppState<S>>,
    ApiQuery(filter): ApiQuery<ContactLogFilter>,
) -> ApiResult<Vec<ContactLogWithNames>> {
    let logs = state
        .store
        .list_contact_logs(&filter)
        .await
        .or_internal("Failed to fetch contact logs")?;
    Ok(ApiResponse::list(logs))
}

pub async fn get_contact_log<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(id): ApiPath<Id>,
) -> ApiResult<ContactLogWithNames> {
    state
        .store
        .get_contact_log(id)
        .await
        .or_internal("Failed to fetch contact log")?
        .map(ApiResponse::ok)
        .ok_or_else(|| ApiError::not_found("Contact log not found"))
}

pub async fn create_contact_log<S: Store>(
    State(state): State<AppState<S>>,
    ApiJson(new_log): ApiJson<NewContactLog>,
) -> ApiResult<ContactLog> {
    let (Some(case_id), Some(contact_id)) = (new_log.case_id, new_log.contact_id) else {
        return Err(required_fields());
    };
    if !new_log.has_required_fields() {
        return Err(required_fields());
    }

    ensure_case(&state, case_id, "Failed to create contact log").await?;
    if !state
        .store
        .contact_exists(contact_id)
        .await
        .or_internal("Failed to create contact log")?
    {
        return Err(ApiError::not_found("Contact not found"));
    }

    let log = state
        .store
        .create_contact_log(&new_log)
        .await
        .or_internal("Failed to create contact log")?;
    Ok(ApiResponse::created(log).with_message("Contact log created successfully"))
}

fn required_fields() -> ApiError {
    ApiError::bad_request("Case ID, Contact ID, description, and contact date are required")
}

/// Only the fields present in the body change; `notes: null` clears notes.
pub async fn update_contact_log<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(id): ApiPath<Id>,
    ApiJson(update): ApiJson<ContactLogUpdate>,
) -> ApiResult<ContactLog> {
    if !state
        .store
        .contact_log_exists(id)
        .await
        .or_internal("Failed to update contact log")?
    {
        return Err(ApiError::not_found("Contact log not found"));
    }
    if update.is_empty() {
        return Err(ApiError::bad_request("No valid fields to update"));
    }

    state
        .store
        .update_contact_log(id, &update)
        .await
        .or_internal("Failed to update contact log")?
        .map(|log| ApiResponse::ok(log).with_message("Contact log updated successfully"))
        .ok_or_else(|| ApiError::not_found("Contact log not found"))
}

pub async fn delete_contact_log<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(id): ApiPath<Id>,
) -> ApiResult<()> {
    let deleted = state
        .store
        .delete_contact_log(id)
        .await
        .or_internal("Failed to delete contact log")?;
    if !deleted {
        return Err(ApiError::not_found("Contact log not found"));
    }
    Ok(ApiResponse::message("Contact log deleted successfully"))
}
