use anyhow::{Context, Result};

use super::cases::LOGS_WITH_NAMES_SQL;
use super::SqliteStore;
use crate::model::{
    ContactLog, ContactLogFilter, ContactLogUpdate, ContactLogWithNames, Id, NewContactLog,
};
use crate::store::db::{Conditions, SqlParam, UpdateSet};
use crate::store::traits::ContactLogStore;

#[async_trait::async_trait]
impl ContactLogStore for SqliteStore {
    async fn list_contact_logs(&self, filter: &ContactLogFilter) -> Result<Vec<ContactLogWithNames>> {
        let mut sql = LOGS_WITH_NAMES_SQL.to_string();
        let mut conditions = Conditions::new();

        if let Some(case_id) = filter.case_id {
            conditions.push("cl.case_id = ?", [SqlParam::from(case_id)]);
        }
        if let Some(contact_id) = filter.contact_id {
            conditions.push("cl.contact_id = ?", [SqlParam::from(contact_id)]);
        }

        let params = conditions.apply(&mut sql);
        sql.push_str(" ORDER BY cl.contact_date DESC, cl.id DESC");

        self.db
            .query(&sql, &params)
            .await
            .context("Failed to list contact logs")
    }

    async fn get_contact_log(&self, id: Id) -> Result<Option<ContactLogWithNames>> {
        self.db
            .get(&format!("{} WHERE cl.id = ?", LOGS_WITH_NAMES_SQL), &[id.into()])
            .await
            .context("Failed to fetch contact log")
    }

    async fn contact_log_exists(&self, id: Id) -> Result<bool> {
        self.db
            .exists("SELECT id FROM contact_logs WHERE id = ?", &[id.into()])
            .await
            .context("Failed to check contact log")
    }

    async fn count_contact_logs_for_contact(&self, contact_id: Id) -> Result<i64> {
        let (count,): (i64,) = self
            .db
            .get(
                "SELECT COUNT(*) FROM contact_logs WHERE contact_id = ?",
                &[contact_id.into()],
            )
            .await?
            .unwrap_or((0,));
        Ok(count)
    }

    async fn create_contact_log(&self, new_log: &NewContactLog) -> Result<ContactLog> {
        let result = self
            .db
            .run(
                r#"
                INSERT INTO contact_logs (
                    case_id,
                    contact_id,
                    description,
                    duration_minutes,
                    hours_spent,
                    contact_date,
                    contact_type,
                    notes
                )
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
                &[
                    new_log.case_id.into(),
                    new_log.contact_id.into(),
                    new_log.description.as_str().into(),
                    new_log.duration_minutes.into(),
                    new_log.hours_spent.into(),
                    new_log.contact_date.as_str().into(),
                    new_log.contact_type.as_str().into(),
                    new_log.notes.as_deref().into(),
                ],
            )
            .await
            .context("Failed to create contact log")?;

        self.get_plain_log(result.last_insert_rowid)
            .await?
            .context("Created contact log disappeared")
    }

    async fn update_contact_log(&self, id: Id, update: &ContactLogUpdate) -> Result<Option<ContactLog>> {
        let mut set = UpdateSet::new();
        set.set_if("description", update.description.clone())
            .set_if("duration_minutes", update.duration_minutes)
            .set_if("hours_spent", update.hours_spent)
            .set_if("contact_date", update.contact_date.clone())
            .set_if("contact_type", update.contact_type.map(|t| t.as_str()))
            .set_if("notes", update.notes.clone());

        if !set.is_empty() {
            let (sql, params) = set.into_statement("contact_logs", id);
            self.db
                .run(&sql, &params)
                .await
                .context("Failed to update contact log")?;
        }

        self.get_plain_log(id).await
    }

    async fn delete_contact_log(&self, id: Id) -> Result<bool> {
        let result = self
            .db
            .run("DELETE FROM contact_logs WHERE id = ?", &[id.into()])
            .await
            .context("Failed to delete contact log")?;
        Ok(result.changes > 0)
    }
}

impl SqliteStore {
    async fn get_plain_log(&self, id: Id) -> Result<Option<ContactLog>> {
        self.db
            .get("SELECT * FROM contact_logs WHERE id = ?", &[id.into()])
            .await
            .context("Failed to fetch contact log")
    }
}
