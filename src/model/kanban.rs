use crate::model::{patch, Id, Patch};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const DEFAULT_TASK_STATUS: &str = "todo";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum TaskPriority {
    High,
    #[default]
    Medium,
    Low,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::High => "high",
            TaskPriority::Medium => "medium",
            TaskPriority::Low => "low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct KanbanTask {
    pub id: Id,
    pub case_id: Id,
    pub title: String,
    pub description: Option<String>,
    /// Id of the kanban column the task sits in
    pub status: String,
    pub priority: TaskPriority,
    pub assignee: Option<String>,
    pub due_date: Option<String>,
    pub position: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewKanbanTask {
    pub case_id: Option<Id>,
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub priority: TaskPriority,
    pub assignee: Option<String>,
    pub due_date: Option<String>,
}

impl NewKanbanTask {
    pub fn column(&self) -> &str {
        self.status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_TASK_STATUS)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KanbanTaskUpdate {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "patch")]
    pub description: Patch<String>,
    pub priority: Option<TaskPriority>,
    #[serde(default, deserialize_with = "patch")]
    pub assignee: Patch<String>,
    #[serde(default, deserialize_with = "patch")]
    pub due_date: Patch<String>,
}

impl KanbanTaskUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.assignee.is_none()
            && self.due_date.is_none()
    }
}

/// Target column and zero-based slot for a task being moved.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskMove {
    #[serde(default)]
    pub status: String,
    pub position: Option<i64>,
}

/// Column definition taken from the kanban columns template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDef {
    pub id: String,
    pub title: String,
}

impl ColumnDef {
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
        }
    }

    /// Reads the `columns` array of a kanban columns template. Entries need an
    /// `id`; the title falls back to `name` and then to the id.
    pub fn from_template(template: &serde_json::Value) -> Vec<ColumnDef> {
        let Some(columns) = template.get("columns").and_then(|c| c.as_array()) else {
            return Vec::new();
        };

        columns
            .iter()
            .filter_map(|column| {
                let id = column.get("id")?.as_str()?;
                let title = column
                    .get("title")
                    .or_else(|| column.get("name"))
                    .and_then(|t| t.as_str())
                    .unwrap_or(id);
                Some(ColumnDef::new(id, title))
            })
            .collect()
    }

    pub fn defaults() -> Vec<ColumnDef> {
        vec![
            ColumnDef::new("todo", "To Do"),
            ColumnDef::new("in-progress", "In Progress"),
            ColumnDef::new("review", "Review"),
            ColumnDef::new("done", "Done"),
        ]
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct KanbanColumn {
    pub id: String,
    pub title: String,
    pub tasks: Vec<KanbanTask>,
}

#[derive(Debug, Clone, Serialize)]
pub struct KanbanBoard {
    pub case_id: Id,
    pub case_name: String,
    pub columns: Vec<KanbanColumn>,
}
