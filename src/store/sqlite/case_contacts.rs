use anyhow::{Context, Result};

use super::cases::CASE_CONTACTS_SQL;
use super::SqliteStore;
use crate::model::{CaseContact, CrossCaseRole, Id, NewCaseContact};
use crate::store::traits::CaseContactStore;

#[async_trait::async_trait]
impl CaseContactStore for SqliteStore {
    async fn list_case_contacts(&self, case_id: Id) -> Result<Vec<CaseContact>> {
        self.db
            .query(CASE_CONTACTS_SQL, &[case_id.into()])
            .await
            .context("Failed to list case contacts")
    }

    async fn case_contact_exists(&self, case_id: Id, contact_id: Id, role: &str) -> Result<bool> {
        self.db
            .exists(
                "SELECT id FROM case_contacts WHERE case_id = ? AND contact_id = ? AND role = ?",
                &[case_id.into(), contact_id.into(), role.trim().into()],
            )
            .await
            .context("Failed to check case contact")
    }

    async fn link_contact(&self, case_id: Id, link: &NewCaseContact) -> Result<CaseContact> {
        let result = self
            .db
            .run(
                "INSERT INTO case_contacts (case_id, contact_id, role, role_notes) VALUES (?, ?, ?, ?)",
                &[
                    case_id.into(),
                    link.contact_id.into(),
                    link.role.trim().into(),
                    link.role_notes.as_deref().into(),
                ],
            )
            .await
            .context("Failed to link contact to case")?;

        let sql = CASE_CONTACTS_SQL.replace("WHERE cc.case_id = ?", "WHERE cc.id = ?");
        self.db
            .get(&sql, &[result.last_insert_rowid.into()])
            .await?
            .context("Created case contact disappeared")
    }

    async fn unlink_contact(&self, case_id: Id, link_id: Id) -> Result<bool> {
        let result = self
            .db
            .run(
                "DELETE FROM case_contacts WHERE id = ? AND case_id = ?",
                &[link_id.into(), case_id.into()],
            )
            .await
            .context("Failed to unlink contact")?;
        Ok(result.changes > 0)
    }

    async fn cross_case_roles(&self, contact_id: Id) -> Result<Vec<CrossCaseRole>> {
        self.db
            .query(
                r#"
                SELECT
                    c.id AS case_id,
                    c.case_name,
                    c.status,
                    cc.role,
                    cc.role_notes,
                    cc.created_at AS relationship_date
                FROM cases c
                JOIN case_contacts cc ON c.id = cc.case_id
                WHERE cc.contact_id = ?
                ORDER BY c.case_name
                "#,
                &[contact_id.into()],
            )
            .await
            .context("Failed to fetch cross-case contacts")
    }
}
