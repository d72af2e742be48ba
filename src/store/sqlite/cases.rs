use anyhow::{Context, Result};

use super::SqliteStore;
use crate::model::{
    Case, CaseContact, CaseDetail, CaseFilter, CaseStatus, CaseSummary, CaseUpdate,
    ContactLogWithNames, CourtDate, EvidenceReview, Id, KanbanTask, NewCase,
};
use crate::store::db::{like_pattern, Conditions, SqlParam, UpdateSet};
use crate::store::traits::CaseStore;

const LIST_CASES_SQL: &str = r#"
    SELECT
        c.*,
        COUNT(DISTINCT k.id) AS task_count,
        COUNT(DISTINCT cc.id) AS contact_count,
        MIN(cd.court_date) AS next_court_date
    FROM cases c
    LEFT JOIN kanban_tasks k ON c.id = k.case_id
    LEFT JOIN case_contacts cc ON c.id = cc.case_id
    LEFT JOIN court_dates cd ON c.id = cd.case_id AND datetime(cd.court_date) > datetime('now')
"#;

pub(super) const CASE_CONTACTS_SQL: &str = r#"
    SELECT
        cc.id,
        cc.case_id,
        cc.contact_id,
        cc.role,
        cc.role_notes,
        cc.created_at,
        c.name,
        c.email,
        c.phone
    FROM case_contacts cc
    JOIN contacts c ON cc.contact_id = c.id
    WHERE cc.case_id = ?
    ORDER BY c.name, cc.id
"#;

pub(super) const LOGS_WITH_NAMES_SQL: &str = r#"
    SELECT
        cl.*,
        c.name AS contact_name,
        cs.case_name
    FROM contact_logs cl
    JOIN contacts c ON cl.contact_id = c.id
    JOIN cases cs ON cl.case_id = cs.id
"#;

#[async_trait::async_trait]
impl CaseStore for SqliteStore {
    async fn list_cases(&self, filter: &CaseFilter) -> Result<Vec<CaseSummary>> {
        let mut sql = LIST_CASES_SQL.to_string();
        let mut conditions = Conditions::new();

        if let Some(status) = filter.status {
            conditions.push("c.status = ?", [SqlParam::from(status.as_str())]);
        }
        if let Some(pattern) = like_pattern(filter.search.as_deref()) {
            conditions.push(
                "(c.case_name LIKE ? OR c.case_number LIKE ?)",
                [SqlParam::from(&pattern), SqlParam::from(pattern)],
            );
        }

        let params = conditions.apply(&mut sql);
        sql.push_str(" GROUP BY c.id ORDER BY c.updated_at DESC, c.id DESC");

        self.db
            .query(&sql, &params)
            .await
            .context("Failed to list cases")
    }

    async fn get_case(&self, id: Id) -> Result<Option<Case>> {
        self.db
            .get("SELECT * FROM cases WHERE id = ?", &[id.into()])
            .await
            .context("Failed to fetch case")
    }

    async fn case_exists(&self, id: Id) -> Result<bool> {
        self.db
            .exists("SELECT id FROM cases WHERE id = ?", &[id.into()])
            .await
            .context("Failed to check case")
    }

    async fn case_number_taken(&self, case_number: &str, excluding: Option<Id>) -> Result<bool> {
        let taken = match excluding {
            Some(id) => {
                self.db
                    .exists(
                        "SELECT id FROM cases WHERE case_number = ? AND id != ?",
                        &[case_number.into(), id.into()],
                    )
                    .await
            }
            None => {
                self.db
                    .exists("SELECT id FROM cases WHERE case_number = ?", &[case_number.into()])
                    .await
            }
        };
        taken.context("Failed to check case number")
    }

    async fn create_case(&self, new_case: &NewCase) -> Result<Case> {
        let result = self
            .db
            .run(
                r#"
                INSERT INTO cases (case_name, case_number, case_description, status)
                VALUES (?, ?, ?, ?)
                "#,
                &[
                    new_case.case_name.trim().into(),
                    new_case.normalized_number().into(),
                    new_case.case_description.as_deref().into(),
                    new_case.status.as_str().into(),
                ],
            )
            .await
            .context("Failed to create case")?;

        self.get_case(result.last_insert_rowid)
            .await?
            .context("Created case disappeared")
    }

    async fn update_case(&self, id: Id, update: &CaseUpdate) -> Result<Option<Case>> {
        let mut set = UpdateSet::new();
        set.set_if("case_name", update.case_name.as_deref().map(str::trim));
        if let Some(number) = &update.case_number {
            let number = number.as_deref().map(str::trim).filter(|n| !n.is_empty());
            set.set("case_number", number);
        }
        set.set_if("case_description", update.case_description.clone());
        set.set_if("status", update.status.map(|s| s.as_str()));

        if !set.is_empty() {
            let (sql, params) = set.into_statement("cases", id);
            self.db
                .run(&sql, &params)
                .await
                .context("Failed to update case")?;
        }

        self.get_case(id).await
    }

    async fn archive_case(&self, id: Id) -> Result<bool> {
        let result = self
            .db
            .run(
                "UPDATE cases SET status = ? WHERE id = ?",
                &[CaseStatus::Closed.as_str().into(), id.into()],
            )
            .await
            .context("Failed to archive case")?;
        Ok(result.changes > 0)
    }

    async fn get_case_detail(&self, id: Id) -> Result<Option<CaseDetail>> {
        let Some(case) = self.get_case(id).await? else {
            return Ok(None);
        };
        let case_id: [SqlParam; 1] = [id.into()];

        let contacts: Vec<CaseContact> = self
            .db
            .query(CASE_CONTACTS_SQL, &case_id)
            .await
            .context("Failed to fetch case contacts")?;

        let tasks: Vec<KanbanTask> = self
            .db
            .query(
                "SELECT * FROM kanban_tasks WHERE case_id = ? ORDER BY position, created_at",
                &case_id,
            )
            .await
            .context("Failed to fetch case tasks")?;

        let contact_logs: Vec<ContactLogWithNames> = self
            .db
            .query(
                &format!("{} WHERE cl.case_id = ? ORDER BY cl.contact_date DESC", LOGS_WITH_NAMES_SQL),
                &case_id,
            )
            .await
            .context("Failed to fetch case contact logs")?;

        let evidence_reviews: Vec<EvidenceReview> = self
            .db
            .query(
                "SELECT * FROM evidence_reviews WHERE case_id = ? ORDER BY review_date DESC",
                &case_id,
            )
            .await
            .context("Failed to fetch case evidence reviews")?;

        let court_dates: Vec<CourtDate> = self
            .db
            .query(
                "SELECT * FROM court_dates WHERE case_id = ? ORDER BY court_date",
                &case_id,
            )
            .await
            .context("Failed to fetch case court dates")?;

        Ok(Some(CaseDetail {
            case,
            contacts,
            tasks,
            contact_logs,
            evidence_reviews,
            court_dates,
        }))
    }
}
