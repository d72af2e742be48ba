//! JSON field templates on disk.
//!
//! Live templates sit in `<root>/fields/<name>.json`. Overwriting one first
//! copies the current file to `<name>.backup.json`, and a restore copies it
//! back, so a single level of undo is always available.

use std::collections::BTreeMap;
use std::io;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use walkdir::WalkDir;

use crate::model::{ColumnDef, TemplateKind};

const FIELDS_DIR: &str = "fields";
const BACKUP_SUFFIX: &str = ".backup.json";

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("{} template not found", .0.label())]
    NotFound(TemplateKind),
    #[error("Invalid template structure: {0} array is required")]
    InvalidStructure(&'static str),
    #[error("Invalid backup path")]
    InvalidBackupPath,
    #[error("Backup file not found")]
    BackupNotFound,
    #[error("Template file error: {0}")]
    Io(#[from] io::Error),
    #[error("Template is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Backup scan was interrupted: {0}")]
    Scan(#[from] tokio::task::JoinError),
}

pub type TemplateResult<T> = Result<T, TemplateError>;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateEntry {
    pub kind: TemplateKind,
    pub name: &'static str,
    pub file: String,
    pub exists: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateInfo {
    pub templates_directory: String,
    /// Keyed by the template's file stem, e.g. `contactRoles`
    pub available_templates: BTreeMap<&'static str, TemplateEntry>,
    pub features: TemplateFeatures,
    pub usage: Vec<String>,
}

/// Capabilities of the template store, reported by the info endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateFeatures {
    pub automatic_backups: bool,
    pub backup_restore: bool,
    pub validation: bool,
    /// Files are re-read on every request
    pub hot_reloading: bool,
    pub custom_field_support: bool,
}

impl TemplateFeatures {
    pub const ENABLED: TemplateFeatures = TemplateFeatures {
        automatic_backups: true,
        backup_restore: true,
        validation: true,
        hot_reloading: true,
        custom_field_support: true,
    };
}

#[derive(Debug, Clone)]
pub struct TemplateStore {
    root: PathBuf,
}

impl TemplateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn live_path(&self, kind: TemplateKind) -> PathBuf {
        self.root.join(FIELDS_DIR).join(kind.file_name())
    }

    fn backup_path(&self, kind: TemplateKind) -> PathBuf {
        self.root.join(FIELDS_DIR).join(kind.backup_file_name())
    }

    /// Writes the default content of every template file that is missing.
    /// Returns the kinds that were created.
    pub async fn ensure_defaults(&self) -> TemplateResult<Vec<TemplateKind>> {
        tokio::fs::create_dir_all(self.root.join(FIELDS_DIR)).await?;

        let mut created = Vec::new();
        for kind in TemplateKind::ALL {
            let path = self.live_path(kind);
            if tokio::fs::try_exists(&path).await? {
                continue;
            }
            tokio::fs::write(&path, serde_json::to_string_pretty(&kind.default_content())?).await?;
            log::info!("Created default {} template at {}", kind.slug(), path.display());
            created.push(kind);
        }
        Ok(created)
    }

    pub async fn read(&self, kind: TemplateKind) -> TemplateResult<Value> {
        let raw = match tokio::fs::read_to_string(self.live_path(kind)).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(TemplateError::NotFound(kind))
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&raw)?)
    }

    /// Replaces the live template, keeping the previous bytes as its backup.
    pub async fn write(&self, kind: TemplateKind, template: &Value) -> TemplateResult<()> {
        if !kind.is_valid(template) {
            return Err(TemplateError::InvalidStructure(kind.array_key()));
        }

        let live = self.live_path(kind);
        if tokio::fs::try_exists(&live).await? {
            tokio::fs::copy(&live, self.backup_path(kind)).await?;
        } else {
            tokio::fs::create_dir_all(self.root.join(FIELDS_DIR)).await?;
        }

        tokio::fs::write(&live, serde_json::to_string_pretty(template)?).await?;
        log::info!("Updated {} template", kind.slug());
        Ok(())
    }

    /// Every `*.backup.json` below the templates directory, as sorted
    /// `/`-separated paths relative to it.
    pub async fn list_backups(&self) -> TemplateResult<Vec<String>> {
        let root = self.root.clone();
        let backups = tokio::task::spawn_blocking(move || scan_backups(&root)).await?;
        Ok(backups)
    }

    /// Copies `backup_path` (relative to the templates directory) over its
    /// live file and returns the restored file's relative path.
    pub async fn restore(&self, backup_path: &str) -> TemplateResult<String> {
        let relative = validate_backup_path(backup_path)?;
        let backup = self.root.join(&relative);
        if !tokio::fs::try_exists(&backup).await? {
            return Err(TemplateError::BackupNotFound);
        }

        let live_relative = backup_path
            .trim()
            .strip_suffix(BACKUP_SUFFIX)
            .map(|stem| format!("{}.json", stem))
            .ok_or(TemplateError::InvalidBackupPath)?;

        tokio::fs::copy(&backup, self.root.join(&live_relative)).await?;
        log::info!("Restored {} from {}", live_relative, backup_path);
        Ok(live_relative)
    }

    /// The configured kanban columns, or the built-in ones when the template
    /// is missing or has no usable columns.
    pub async fn kanban_columns(&self) -> Vec<ColumnDef> {
        match self.read(TemplateKind::KanbanColumns).await {
            Ok(template) => {
                let columns = ColumnDef::from_template(&template);
                if columns.is_empty() {
                    ColumnDef::defaults()
                } else {
                    columns
                }
            }
            Err(TemplateError::NotFound(_)) => ColumnDef::defaults(),
            Err(e) => {
                log::warn!("Falling back to default kanban columns: {}", e);
                ColumnDef::defaults()
            }
        }
    }

    pub async fn info(&self) -> TemplateInfo {
        let mut available_templates = BTreeMap::new();
        for kind in TemplateKind::ALL {
            let exists = tokio::fs::try_exists(self.live_path(kind))
                .await
                .unwrap_or(false);
            available_templates.insert(
                kind.info_key(),
                TemplateEntry {
                    kind,
                    name: kind.label(),
                    file: format!("{}/{}", FIELDS_DIR, kind.file_name()),
                    exists,
                },
            );
        }

        TemplateInfo {
            templates_directory: self.root.display().to_string(),
            available_templates,
            features: TemplateFeatures::ENABLED,
            usage: TemplateKind::ALL
                .iter()
                .map(|kind| {
                    format!(
                        "GET/PUT /api/templates/fields/{} (requires a \"{}\" array)",
                        kind.slug(),
                        kind.array_key()
                    )
                })
                .chain([
                    "GET /api/templates/backup lists backups".to_string(),
                    "POST /api/templates/restore with {\"backupPath\"} restores one".to_string(),
                ])
                .collect(),
        }
    }
}

fn scan_backups(root: &Path) -> Vec<String> {
    let mut backups: Vec<String> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(BACKUP_SUFFIX))
        .filter_map(|entry| {
            let relative = entry.path().strip_prefix(root).ok()?;
            let parts: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            Some(parts.join("/"))
        })
        .collect();
    backups.sort();
    backups
}

/// A backup path must stay inside the templates directory.
fn validate_backup_path(backup_path: &str) -> TemplateResult<PathBuf> {
    let trimmed = backup_path.trim();
    if !trimmed.ends_with(BACKUP_SUFFIX) {
        return Err(TemplateError::InvalidBackupPath);
    }

    let path = Path::new(trimmed);
    let mut relative = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            _ => return Err(TemplateError::InvalidBackupPath),
        }
    }

    if relative.as_os_str().is_empty() {
        return Err(TemplateError::InvalidBackupPath);
    }
    Ok(relative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> (tempfile::TempDir, TemplateStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = TemplateStore::new(dir.path());
        (dir, store)
    }

    #[tokio::test]
    async fn test_ensure_defaults_only_fills_gaps() {
        let (_dir, store) = store();
        std::fs::create_dir_all(store.root().join("fields")).unwrap();
        std::fs::write(
            store.root().join("fields/contactRoles.json"),
            r#"{"roles": [{"value": "MENTOR"}]}"#,
        )
        .unwrap();

        let created = store.ensure_defaults().await.unwrap();
        assert_eq!(
            created,
            vec![TemplateKind::EvidenceTypes, TemplateKind::KanbanColumns]
        );

        let roles = store.read(TemplateKind::ContactRoles).await.unwrap();
        assert_eq!(roles["roles"][0]["value"], "MENTOR");
        assert!(store.ensure_defaults().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_read_missing_template() {
        let (_dir, store) = store();
        let err = store.read(TemplateKind::EvidenceTypes).await.unwrap_err();
        assert!(matches!(err, TemplateError::NotFound(TemplateKind::EvidenceTypes)));
        assert_eq!(err.to_string(), "Evidence types template not found");
    }

    #[tokio::test]
    async fn test_write_rejects_missing_array() {
        let (_dir, store) = store();
        let err = store
            .write(TemplateKind::KanbanColumns, &json!({"columns": "todo"}))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid template structure: columns array is required"
        );
    }

    #[tokio::test]
    async fn test_write_backs_up_and_restore_reproduces_bytes() {
        let (_dir, store) = store();
        std::fs::create_dir_all(store.root().join("fields")).unwrap();
        let original = "{\"roles\":[{\"value\":\"CLIENT\"}],  \"note\": \"hand edited\"}\n";
        let live = store.root().join("fields/contactRoles.json");
        std::fs::write(&live, original).unwrap();

        store
            .write(TemplateKind::ContactRoles, &json!({"roles": [{"value": "PARENT"}]}))
            .await
            .unwrap();

        let written = std::fs::read_to_string(&live).unwrap();
        assert_eq!(
            written,
            "{\n  \"roles\": [\n    {\n      \"value\": \"PARENT\"\n    }\n  ]\n}"
        );
        assert_eq!(
            store.list_backups().await.unwrap(),
            vec!["fields/contactRoles.backup.json".to_string()]
        );

        let restored = store
            .restore("fields/contactRoles.backup.json")
            .await
            .unwrap();
        assert_eq!(restored, "fields/contactRoles.json");
        assert_eq!(std::fs::read_to_string(&live).unwrap(), original);
    }

    #[tokio::test]
    async fn test_first_write_creates_no_backup() {
        let (_dir, store) = store();
        store
            .write(TemplateKind::EvidenceTypes, &json!({"types": []}))
            .await
            .unwrap();
        assert!(store.list_backups().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_restore_rejects_bad_paths() {
        let (_dir, store) = store();
        for path in ["../secrets.backup.json", "/etc/passwd", "fields/contactRoles.json", ""] {
            assert!(
                matches!(
                    store.restore(path).await,
                    Err(TemplateError::InvalidBackupPath)
                ),
                "{path} should be rejected"
            );
        }
        assert!(matches!(
            store.restore("fields/kanbanColumns.backup.json").await,
            Err(TemplateError::BackupNotFound)
        ));
    }

    #[tokio::test]
    async fn test_kanban_columns_fall_back_to_defaults() {
        let (_dir, store) = store();
        assert_eq!(store.kanban_columns().await, ColumnDef::defaults());

        store
            .write(
                TemplateKind::KanbanColumns,
                &json!({"columns": [{"id": "backlog", "title": "Backlog"}]}),
            )
            .await
            .unwrap();
        assert_eq!(
            store.kanban_columns().await,
            vec![ColumnDef::new("backlog", "Backlog")]
        );
    }

    #[tokio::test]
    async fn test_info_lists_templates_by_key() {
        let (_dir, store) = store();
        store.ensure_defaults().await.unwrap();

        let info = serde_json::to_value(store.info().await).unwrap();
        let available = info["availableTemplates"].as_object().unwrap();
        assert_eq!(
            available.keys().collect::<Vec<_>>(),
            vec!["contactRoles", "evidenceTypes", "kanbanColumns"]
        );
        assert_eq!(
            info["availableTemplates"]["kanbanColumns"]["file"],
            "fields/kanbanColumns.json"
        );
        assert_eq!(info["availableTemplates"]["contactRoles"]["exists"], true);
        assert_eq!(info["features"]["automaticBackups"], true);
        assert_eq!(info["features"]["validation"], true);
    }
}
