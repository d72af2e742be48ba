use axum::extract::State;

use crate::api::cases::ensure_case;
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::api::handlers::AppState;
use crate::api::response::{ApiError, ApiResponse, ApiResult, ResultExt};
use crate::model::{is_blank, EvidenceFilter, EvidenceReview, EvidenceReviewUpdate, Id, NewEvidenceReview};
use crate::store::traits::Store;

pub async fn list_evidence<S: Store>(
    State(state): State<AppState<S>>,
    ApiQuery(filter): ApiQuery<EvidenceFilter>,
) -> ApiResult<Vec<EvidenceReview>> {
    let reviews = state
        .store
        .list_evidence(&filter)
        .await
        .or_internal("Failed to fetch evidence reviews")?;
    Ok(ApiResponse::list(reviews))
}

pub async fn get_evidence<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(id): ApiPath<Id>,
) -> ApiResult<EvidenceReview> {
    state
        .store
        .get_evidence(id)
        .await
        .or_internal("Failed to fetch evidence review")?
        .map(ApiResponse::ok)
        .ok_or_else(|| ApiError::not_found("Evidence review not found"))
}

pub async fn create_evidence<S: Store>(
    State(state): State<AppState<S>>,
    ApiJson(new_review): ApiJson<NewEvidenceReview>,
) -> ApiResult<EvidenceReview> {
    let Some(case_id) = new_review.case_id.filter(|_| new_review.has_required_fields()) else {
        return Err(ApiError::bad_request(
            "Case ID, evidence type, and title are required",
        ));
    };
    ensure_case(&state, case_id, "Failed to create evidence review").await?;

    let review = state
        .store
        .create_evidence(&new_review)
        .await
        .or_internal("Failed to create evidence review")?;
    Ok(ApiResponse::created(review).with_message("Evidence review created successfully"))
}

pub async fn update_evidence<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(id): ApiPath<Id>,
    ApiJson(update): ApiJson<EvidenceReviewUpdate>,
) -> ApiResult<EvidenceReview> {
    if state
        .store
        .get_evidence(id)
        .await
        .or_internal("Failed to update evidence review")?
        .is_none()
    {
        return Err(ApiError::not_found("Evidence review not found"));
    }
    if update.is_empty() {
        return Err(ApiError::bad_request("No valid fields to update"));
    }
    if update.title.as_deref().is_some_and(is_blank)
        || update.evidence_type.as_deref().is_some_and(is_blank)
    {
        return Err(ApiError::bad_request("Evidence type and title cannot be empty"));
    }

    state
        .store
        .update_evidence(id, &update)
        .await
        .or_internal("Failed to update evidence review")?
        .map(|review| ApiResponse::ok(review).with_message("Evidence review updated successfully"))
        .ok_or_else(|| ApiError::not_found("Evidence review not found"))
}

pub async fn delete_evidence<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(id): ApiPath<Id>,
) -> ApiResult<()> {
    if !state
        .store
        .delete_evidence(id)
        .await
        .or_internal("Failed to delete evidence review")?
    {
        return Err(ApiError::not_found("Evidence review not found"));
    }
    Ok(ApiResponse::message("Evidence review deleted successfully"))
}
