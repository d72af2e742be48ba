use axum::extract::State;
use itertools::Itertools;

use crate::api::cases::ensure_case;
use crate::api::extract::{ApiJson, ApiPath};
use crate::api::handlers::AppState;
use crate::api::response::{ApiError, ApiResponse, ApiResult, ResultExt};
use crate::model::{
    is_blank, Case, ColumnDef, Id, KanbanBoard, KanbanColumn, KanbanTask, KanbanTaskUpdate,
    NewKanbanTask, TaskMove,
};
use crate::store::traits::Store;

pub async fn get_board<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(case_id): ApiPath<Id>,
) -> ApiResult<KanbanBoard> {
    let case = state
        .store
        .get_case(case_id)
        .await
        .or_internal("Failed to fetch kanban board")?
        .ok_or_else(|| ApiError::not_found("Case not found"))?;

    let tasks = state
        .store
        .list_tasks_for_case(case_id)
        .await
        .or_internal("Failed to fetch kanban board")?;
    let columns = state.templates.kanban_columns().await;

    Ok(ApiResponse::ok(build_board(&case, columns, tasks)))
}

/// Lays tasks out in the configured columns. Tasks in a column the template
/// does not know get a column of their own after the configured ones.
fn build_board(case: &Case, columns: Vec<ColumnDef>, tasks: Vec<KanbanTask>) -> KanbanBoard {
    let mut by_status = tasks
        .into_iter()
        .sorted_by_key(|task| task.position)
        .into_group_map_by(|task| task.status.clone());

    let mut board_columns: Vec<KanbanColumn> = columns
        .into_iter()
        .map(|column| KanbanColumn {
            tasks: by_status.remove(&column.id).unwrap_or_default(),
            id: column.id,
            title: column.title,
        })
        .collect();

    board_columns.extend(
        by_status
            .into_iter()
            .sorted_by(|(a, _), (b, _)| a.cmp(b))
            .map(|(status, tasks)| KanbanColumn {
                title: status.clone(),
                id: status,
                tasks,
            }),
    );

    KanbanBoard {
        case_id: case.id,
        case_name: case.case_name.clone(),
        columns: board_columns,
    }
}

pub async fn create_task<S: Store>(
    State(state): State<AppState<S>>,
    ApiJson(new_task): ApiJson<NewKanbanTask>,
) -> ApiResult<KanbanTask> {
    let Some(case_id) = new_task.case_id.filter(|_| !is_blank(&new_task.title)) else {
        return Err(ApiError::bad_request("Case ID and title are required"));
    };
    ensure_case(&state, case_id, "Failed to create task").await?;

    let task = state
        .store
        .create_task(&new_task)
        .await
        .or_internal("Failed to create task")?;
    Ok(ApiResponse::created(task).with_message("Task created successfully"))
}

pub async fn update_task<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(id): ApiPath<Id>,
    ApiJson(update): ApiJson<KanbanTaskUpdate>,
) -> ApiResult<KanbanTask> {
    if state
        .store
        .get_task(id)
        .await
        .or_internal("Failed to update task")?
        .is_none()
    {
        return Err(ApiError::not_found("Task not found"));
    }
    if update.is_empty() {
        return Err(ApiError::bad_request("No valid fields to update"));
    }
    if update.title.as_deref().is_some_and(is_blank) {
        return Err(ApiError::bad_request("Title is required"));
    }

    state
        .store
        .update_task(id, &update)
        .await
        .or_internal("Failed to update task")?
        .map(|task| ApiResponse::ok(task).with_message("Task updated successfully"))
        .ok_or_else(|| ApiError::not_found("Task not found"))
}

pub async fn move_task<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(id): ApiPath<Id>,
    ApiJson(task_move): ApiJson<TaskMove>,
) -> ApiResult<KanbanTask> {
    if is_blank(&task_move.status) {
        return Err(ApiError::bad_request("Status is required"));
    }

    state
        .store
        .move_task(id, &task_move.status, task_move.position)
        .await
        .or_internal("Failed to move task")?
        .map(|task| ApiResponse::ok(task).with_message("Task moved successfully"))
        .ok_or_else(|| ApiError::not_found("Task not found"))
}

pub async fn delete_task<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(id): ApiPath<Id>,
) -> ApiResult<()> {
    let deleted = state
        .store
        .delete_task(id)
        .await
        .or_internal("Failed to delete task")?;
    if !deleted {
        return Err(ApiError::not_found("Task not found"));
    }
    Ok(ApiResponse::message("Task deleted successfully"))
}
