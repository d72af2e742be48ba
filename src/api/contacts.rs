use axum::extract::State;

use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::api::handlers::AppState;
use crate::api::response::{ApiError, ApiResponse, ApiResult, ResultExt};
use crate::model::{is_blank, Contact, ContactDetail, ContactFilter, ContactSummary, ContactUpdate, Id, NewContact};
use crate::store::traits::Store;

pub async fn list_contacts<S: Store>(
    State(state): State<AppState<S>>,
    ApiQuery(filter): ApiQuery<ContactFilter>,
) -> ApiResult<Vec<ContactSummary>> {
    let contacts = state
        .store
        .list_contacts(&filter)
        .await
        .or_internal("Failed to fetch contacts")?;
    Ok(ApiResponse::list(contacts))
}

pub async fn get_contact<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(id): ApiPath<Id>,
) -> ApiResult<ContactDetail> {
    state
        .store
        .get_contact_detail(id)
        .await
        .or_internal("Failed to fetch contact")?
        .map(ApiResponse::ok)
        .ok_or_else(|| ApiError::not_found("Contact not found"))
}

pub async fn create_contact<S: Store>(
    State(state): State<AppState<S>>,
    ApiJson(new_contact): ApiJson<NewContact>,
) -> ApiResult<Contact> {
    if is_blank(&new_contact.name) {
        return Err(ApiError::bad_request("Contact name is required"));
    }

    let contact = state
        .store
        .create_contact(&new_contact)
        .await
        .or_internal("Failed to create contact")?;
    Ok(ApiResponse::created(contact).with_message("Contact created successfully"))
}

pub async fn update_contact<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(id): ApiPath<Id>,
    ApiJson(update): ApiJson<ContactUpdate>,
) -> ApiResult<Contact> {
    if !state
        .store
        .contact_exists(id)
        .await
        .or_internal("Failed to update contact")?
    {
        return Err(ApiError::not_found("Contact not found"));
    }
    if update.is_empty() {
        return Err(ApiError::bad_request("No valid fields to update"));
    }
    if update.name.as_deref().is_some_and(is_blank) {
        return Err(ApiError::bad_request("Contact name is required"));
    }

    state
        .store
        .update_contact(id, &update)
        .await
        .or_internal("Failed to update contact")?
        .map(|contact| ApiResponse::ok(contact).with_message("Contact updated successfully"))
        .ok_or_else(|| ApiError::not_found("Contact not found"))
}

/// Contacts with logged interactions are kept so the history stays intact.
pub async fn delete_contact<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(id): ApiPath<Id>,
) -> ApiResult<()> {
    if !state
        .store
        .contact_exists(id)
        .await
        .or_internal("Failed to delete contact")?
    {
        return Err(ApiError::not_found("Contact not found"));
    }

    let logs = state
        .store
        .count_contact_logs_for_contact(id)
        .await
        .or_internal("Failed to delete contact")?;
    if logs > 0 {
        return Err(ApiError::Conflict(format!(
            "Contact has {} contact log(s) and cannot be deleted",
            logs
        )));
    }

    state
        .store
        .delete_contact(id)
        .await
        .or_internal("Failed to delete contact")?;
    Ok(ApiResponse::message("Contact deleted successfully"))
}
