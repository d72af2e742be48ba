use axum::extract::State;

use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::api::handlers::AppState;
use crate::api::response::{ApiError, ApiResponse, ApiResult, ResultExt};
use crate::model::{
    is_blank, Case, CaseContact, CaseDetail, CaseFilter, CaseSummary, CaseUpdate, CrossCaseRole, Id,
    NewCase, NewCaseContact,
};
use crate::store::traits::Store;

pub async fn list_cases<S: Store>(
    State(state): State<AppState<S>>,
    ApiQuery(filter): ApiQuery<CaseFilter>,
) -> ApiResult<Vec<CaseSummary>> {
    let cases = state
        .store
        .list_cases(&filter)
        .await
        .or_internal("Failed to fetch cases")?;
    Ok(ApiResponse::list(cases))
}

pub async fn get_case<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(id): ApiPath<Id>,
) -> ApiResult<CaseDetail> {
    match state
        .store
        .get_case_detail(id)
        .await
        .or_internal("Failed to fetch case")?
    {
        Some(detail) => Ok(ApiResponse::ok(detail)),
        None => Err(ApiError::not_found("Case not found")),
    }
}

pub async fn create_case<S: Store>(
    State(state): State<AppState<S>>,
    ApiJson(new_case): ApiJson<NewCase>,
) -> ApiResult<Case> {
    if is_blank(&new_case.case_name) {
        return Err(ApiError::bad_request("Case name is required"));
    }

    if let Some(number) = new_case.normalized_number() {
        let taken = state
            .store
            .case_number_taken(number, None)
            .await
            .or_internal("Failed to create case")?;
        if taken {
            return Err(ApiError::bad_request("Case number already exists"));
        }
    }

    let case = state
        .store
        .create_case(&new_case)
        .await
        .or_internal("Failed to create case")?;
    log::info!("Created case {} ({})", case.id, case.case_name);

    Ok(ApiResponse::created(case).with_message("Case created successfully"))
}

pub async fn update_case<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(id): ApiPath<Id>,
    ApiJson(update): ApiJson<CaseUpdate>,
) -> ApiResult<Case> {
    if !state
        .store
        .case_exists(id)
        .await
        .or_internal("Failed to update case")?
    {
        return Err(ApiError::not_found("Case not found"));
    }

    if update.is_empty() {
        return Err(ApiError::bad_request("No valid fields to update"));
    }
    if update.case_name.as_deref().is_some_and(is_blank) {
        return Err(ApiError::bad_request("Case name is required"));
    }

    if let Some(number) = update.new_number() {
        let taken = state
            .store
            .case_number_taken(number, Some(id))
            .await
            .or_internal("Failed to update case")?;
        if taken {
            return Err(ApiError::bad_request("Case number already exists"));
        }
    }

    let case = state
        .store
        .update_case(id, &update)
        .await
        .or_internal("Failed to update case")?
        .ok_or_else(|| ApiError::not_found("Case not found"))?;

    Ok(ApiResponse::ok(case).with_message("Case updated successfully"))
}

/// Cases are never removed; deleting one closes it.
pub async fn archive_case<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(id): ApiPath<Id>,
) -> ApiResult<()> {
    let archived = state
        .store
        .archive_case(id)
        .await
        .or_internal("Failed to archive case")?;
    if !archived {
        return Err(ApiError::not_found("Case not found"));
    }

    log::info!("Archived case {}", id);
    Ok(ApiResponse::message("Case archived successfully"))
}

pub async fn list_case_contacts<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(case_id): ApiPath<Id>,
) -> ApiResult<Vec<CaseContact>> {
    ensure_case(&state, case_id, "Failed to fetch case contacts").await?;

    let contacts = state
        .store
        .list_case_contacts(case_id)
        .await
        .or_internal("Failed to fetch case contacts")?;
    Ok(ApiResponse::list(contacts))
}

pub async fn link_case_contact<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(case_id): ApiPath<Id>,
    ApiJson(link): ApiJson<NewCaseContact>,
) -> ApiResult<CaseContact> {
    let Some(contact_id) = link.contact_id.filter(|_| !is_blank(&link.role)) else {
        return Err(ApiError::bad_request("Contact ID and role are required"));
    };

    ensure_case(&state, case_id, "Failed to link contact").await?;
    if !state
        .store
        .contact_exists(contact_id)
        .await
        .or_internal("Failed to link contact")?
    {
        return Err(ApiError::not_found("Contact not found"));
    }

    if state
        .store
        .case_contact_exists(case_id, contact_id, &link.role)
        .await
        .or_internal("Failed to link contact")?
    {
        return Err(ApiError::bad_request(
            "Contact already has this role on the case",
        ));
    }

    let linked = state
        .store
        .link_contact(case_id, &link)
        .await
        .or_internal("Failed to link contact")?;
    Ok(ApiResponse::created(linked).with_message("Contact linked to case"))
}

pub async fn unlink_case_contact<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath((case_id, link_id)): ApiPath<(Id, Id)>,
) -> ApiResult<()> {
    let removed = state
        .store
        .unlink_contact(case_id, link_id)
        .await
        .or_internal("Failed to unlink contact")?;
    if !removed {
        return Err(ApiError::not_found("Case contact not found"));
    }
    Ok(ApiResponse::message("Contact removed from case"))
}

/// Every case the contact takes part in. The case id in the path only
/// scopes the route.
pub async fn cross_case_roles<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath((_case_id, contact_id)): ApiPath<(Id, Id)>,
) -> ApiResult<Vec<CrossCaseRole>> {
    let roles = state
        .store
        .cross_case_roles(contact_id)
        .await
        .or_internal("Failed to fetch cross-case data")?;
    Ok(ApiResponse::list(roles))
}

pub(crate) async fn ensure_case<S: Store>(
    state: &AppState<S>,
    case_id: Id,
    failure: &str,
) -> Result<(), ApiError> {
    if state.store.case_exists(case_id).await.or_internal(failure)? {
        Ok(())
    } else {
        Err(ApiError::not_found("Case not found"))
    }
}
