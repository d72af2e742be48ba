use anyhow::{Context, Result};

use super::SqliteStore;
use crate::model::{Id, KanbanTask, KanbanTaskUpdate, NewKanbanTask};
use crate::store::db::{execute, fetch_optional, UpdateSet};
use crate::store::traits::KanbanStore;

const TASK_BY_ID_SQL: &str = "SELECT * FROM kanban_tasks WHERE id = ?";

#[async_trait::async_trait]
impl KanbanStore for SqliteStore {
    async fn list_tasks_for_case(&self, case_id: Id) -> Result<Vec<KanbanTask>> {
        self.db
            .query(
                "SELECT * FROM kanban_tasks WHERE case_id = ? ORDER BY status, position, created_at",
                &[case_id.into()],
            )
            .await
            .context("Failed to list kanban tasks")
    }

    async fn get_task(&self, id: Id) -> Result<Option<KanbanTask>> {
        self.db
            .get(TASK_BY_ID_SQL, &[id.into()])
            .await
            .context("Failed to fetch kanban task")
    }

    async fn create_task(&self, new_task: &NewKanbanTask) -> Result<KanbanTask> {
        let result = self
            .db
            .run(
                r#"
                INSERT INTO kanban_tasks (case_id, title, description, status, priority, assignee, due_date, position)
                VALUES (?, ?, ?, ?, ?, ?, ?, (
                    SELECT COALESCE(MAX(position) + 1, 0)
                    FROM kanban_tasks
                    WHERE case_id = ? AND status = ?
                ))
                "#,
                &[
                    new_task.case_id.into(),
                    new_task.title.trim().into(),
                    new_task.description.as_deref().into(),
                    new_task.column().into(),
                    new_task.priority.as_str().into(),
                    new_task.assignee.as_deref().into(),
                    new_task.due_date.as_deref().into(),
                    new_task.case_id.into(),
                    new_task.column().into(),
                ],
            )
            .await
            .context("Failed to create kanban task")?;

        self.get_task(result.last_insert_rowid)
            .await?
            .context("Created kanban task disappeared")
    }

    async fn update_task(&self, id: Id, update: &KanbanTaskUpdate) -> Result<Option<KanbanTask>> {
        let mut set = UpdateSet::new();
        set.set_if("title", update.title.as_deref().map(str::trim))
            .set_if("description", update.description.clone())
            .set_if("priority", update.priority.map(|p| p.as_str()))
            .set_if("assignee", update.assignee.clone())
            .set_if("due_date", update.due_date.clone());

        if !set.is_empty() {
            let (sql, params) = set.into_statement("kanban_tasks", id);
            self.db
                .run(&sql, &params)
                .await
                .context("Failed to update kanban task")?;
        }

        self.get_task(id).await
    }

    async fn move_task(&self, id: Id, status: &str, position: Option<i64>) -> Result<Option<KanbanTask>> {
        let status = status.trim().to_string();

        let moved = self
            .db
            .transaction(move |conn| {
                Box::pin(async move {
                    let task: Option<KanbanTask> =
                        fetch_optional(&mut *conn, TASK_BY_ID_SQL, &[id.into()]).await?;
                    let Some(task) = task else {
                        return Ok(false);
                    };

                    // Close the gap left in the old column
                    execute(
                        &mut *conn,
                        r#"
                        UPDATE kanban_tasks SET position = position - 1
                        WHERE case_id = ? AND status = ? AND position > ? AND id != ?
                        "#,
                        &[
                            task.case_id.into(),
                            task.status.as_str().into(),
                            task.position.into(),
                            id.into(),
                        ],
                    )
                    .await?;

                    let (column_len,): (i64,) = fetch_optional(
                        &mut *conn,
                        "SELECT COUNT(*) FROM kanban_tasks WHERE case_id = ? AND status = ? AND id != ?",
                        &[task.case_id.into(), status.as_str().into(), id.into()],
                    )
                    .await?
                    .unwrap_or((0,));
                    let target = position.unwrap_or(column_len).clamp(0, column_len);

                    // Open a slot in the new column
                    execute(
                        &mut *conn,
                        r#"
                        UPDATE kanban_tasks SET position = position + 1
                        WHERE case_id = ? AND status = ? AND position >= ? AND id != ?
                        "#,
                        &[
                            task.case_id.into(),
                            status.as_str().into(),
                            target.into(),
                            id.into(),
                        ],
                    )
                    .await?;

                    execute(
                        &mut *conn,
                        "UPDATE kanban_tasks SET status = ?, position = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
                        &[status.as_str().into(), target.into(), id.into()],
                    )
                    .await?;

                    Ok(true)
                })
            })
            .await
            .context("Failed to move kanban task")?;

        if !moved {
            return Ok(None);
        }
        self.get_task(id).await
    }

    async fn delete_task(&self, id: Id) -> Result<bool> {
        self.db
            .transaction(move |conn| {
                Box::pin(async move {
                    let task: Option<KanbanTask> =
                        fetch_optional(&mut *conn, TASK_BY_ID_SQL, &[id.into()]).await?;
                    let Some(task) = task else {
                        return Ok(false);
                    };

                    execute(&mut *conn, "DELETE FROM kanban_tasks WHERE id = ?", &[id.into()]).await?;
                    execute(
                        &mut *conn,
                        r#"
                        UPDATE kanban_tasks SET position = position - 1
                        WHERE case_id = ? AND status = ? AND position > ?
                        "#,
                        &[
                            task.case_id.into(),
                            task.status.as_str().into(),
                            task.position.into(),
                        ],
                    )
                    .await?;

                    Ok(true)
                })
            })
            .await
            .context("Failed to delete kanban task")
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support;
    use super::*;
    use crate::model::TaskPriority;

    fn new_task(case_id: Id, title: &str, status: &str) -> NewKanbanTask {
        NewKanbanTask {
            case_id: Some(case_id),
            title: title.to_string(),
            status: Some(status.to_string()),
            ..Default::default()
        }
    }

    async fn column(store: &SqliteStore, case_id: Id, status: &str) -> Vec<(String, i64)> {
        store
            .list_tasks_for_case(case_id)
            .await
            .unwrap()
            .into_iter()
            .filter(|t| t.status == status)
            .map(|t| (t.title, t.position))
            .collect()
    }

    #[tokio::test]
    async fn test_create_task_appends_to_column() {
        let store = test_support::store().await;
        let case = test_support::case(&store, "Johnson Family", None).await;

        let first = store.create_task(&new_task(case.id, "Prepare court report", "todo")).await.unwrap();
        let second = store.create_task(&new_task(case.id, "Schedule visit", "todo")).await.unwrap();
        let other = store.create_task(&new_task(case.id, "Parent assessment", "in-progress")).await.unwrap();

        assert_eq!(first.position, 0);
        assert_eq!(second.position, 1);
        assert_eq!(other.position, 0);
        assert_eq!(first.priority, TaskPriority::Medium);
    }

    #[tokio::test]
    async fn test_move_task_keeps_columns_dense() {
        let store = test_support::store().await;
        let case = test_support::case(&store, "Johnson Family", None).await;

        let a = store.create_task(&new_task(case.id, "A", "todo")).await.unwrap();
        store.create_task(&new_task(case.id, "B", "todo")).await.unwrap();
        store.create_task(&new_task(case.id, "C", "todo")).await.unwrap();
        store.create_task(&new_task(case.id, "X", "done")).await.unwrap();

        let moved = store.move_task(a.id, "done", Some(0)).await.unwrap().unwrap();
        assert_eq!(moved.status, "done");
        assert_eq!(moved.position, 0);

        assert_eq!(
            column(&store, case.id, "todo").await,
            vec![("B".to_string(), 0), ("C".to_string(), 1)]
        );
        assert_eq!(
            column(&store, case.id, "done").await,
            vec![("A".to_string(), 0), ("X".to_string(), 1)]
        );
    }

    #[tokio::test]
    async fn test_move_task_within_column_and_clamps_position() {
        let store = test_support::store().await;
        let case = test_support::case(&store, "Johnson Family", None).await;

        let a = store.create_task(&new_task(case.id, "A", "todo")).await.unwrap();
        store.create_task(&new_task(case.id, "B", "todo")).await.unwrap();
        store.create_task(&new_task(case.id, "C", "todo")).await.unwrap();

        let moved = store.move_task(a.id, "todo", Some(99)).await.unwrap().unwrap();
        assert_eq!(moved.position, 2);
        assert_eq!(
            column(&store, case.id, "todo").await,
            vec![("B".to_string(), 0), ("C".to_string(), 1), ("A".to_string(), 2)]
        );

        assert!(store.move_task(404, "todo", None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_task_compacts_column() {
        let store = test_support::store().await;
        let case = test_support::case(&store, "Johnson Family", None).await;

        store.create_task(&new_task(case.id, "A", "review")).await.unwrap();
        let b = store.create_task(&new_task(case.id, "B", "review")).await.unwrap();
        store.create_task(&new_task(case.id, "C", "review")).await.unwrap();

        assert!(store.delete_task(b.id).await.unwrap());
        assert_eq!(
            column(&store, case.id, "review").await,
            vec![("A".to_string(), 0), ("C".to_string(), 1)]
        );
        assert!(!store.delete_task(b.id).await.unwrap());
    }
}
