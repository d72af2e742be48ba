use anyhow::{Context, Result};

use super::SqliteStore;
use crate::model::{CourtDate, CourtDateFilter, CourtDateUpdate, Id, NewCourtDate};
use crate::store::db::{Conditions, SqlParam, UpdateSet};
use crate::store::traits::CourtDateStore;

#[async_trait::async_trait]
impl CourtDateStore for SqliteStore {
    async fn list_court_dates(&self, filter: &CourtDateFilter) -> Result<Vec<CourtDate>> {
        let mut sql = "SELECT * FROM court_dates".to_string();
        let mut conditions = Conditions::new();
        if let Some(case_id) = filter.case_id {
            conditions.push("case_id = ?", [SqlParam::from(case_id)]);
        }
        if filter.upcoming {
            conditions.push("datetime(court_date) > datetime('now')", None::<SqlParam>);
        }
        let params = conditions.apply(&mut sql);
        sql.push_str(" ORDER BY court_date, id");

        self.db
            .query(&sql, &params)
            .await
            .context("Failed to list court dates")
    }

    async fn get_court_date(&self, id: Id) -> Result<Option<CourtDate>> {
        self.db
            .get("SELECT * FROM court_dates WHERE id = ?", &[id.into()])
            .await
            .context("Failed to fetch court date")
    }

    async fn create_court_date(&self, new_date: &NewCourtDate) -> Result<CourtDate> {
        let result = self
            .db
            .run(
                r#"
                INSERT INTO court_dates (case_id, court_date, court_type, description, location, notes)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
                &[
                    new_date.case_id.into(),
                    new_date.court_date.trim().into(),
                    new_date.court_type.as_deref().into(),
                    new_date.description.as_deref().into(),
                    new_date.location.as_deref().into(),
                    new_date.notes.as_deref().into(),
                ],
            )
            .await
            .context("Failed to create court date")?;

        self.get_court_date(result.last_insert_rowid)
            .await?
            .context("Created court date disappeared")
    }

    async fn update_court_date(&self, id: Id, update: &CourtDateUpdate) -> Result<Option<CourtDate>> {
        let mut set = UpdateSet::new();
        set.set_if("court_date", update.court_date.as_deref().map(str::trim))
            .set_if("court_type", update.court_type.clone())
            .set_if("description", update.description.clone())
            .set_if("location", update.location.clone())
            .set_if("outcome", update.outcome.clone())
            .set_if("notes", update.notes.clone());

        if !set.is_empty() {
            let (sql, params) = set.into_statement("court_dates", id);
            self.db
                .run(&sql, &params)
                .await
                .context("Failed to update court date")?;
        }

        self.get_court_date(id).await
    }

    async fn delete_court_date(&self, id: Id) -> Result<bool> {
        let result = self
            .db
            .run("DELETE FROM court_dates WHERE id = ?", &[id.into()])
            .await
            .context("Failed to delete court date")?;
        Ok(result.changes > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support;
    use super::*;

    fn hearing(case_id: Id, when: &str) -> NewCourtDate {
        NewCourtDate {
            case_id: Some(case_id),
            court_date: when.to_string(),
            location: Some("Family Court Room 3".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_upcoming_filter() {
        let store = test_support::store().await;
        let case = test_support::case(&store, "Johnson Family", None).await;

        store.create_court_date(&hearing(case.id, "2000-03-01T10:00")).await.unwrap();
        let future = store.create_court_date(&hearing(case.id, "2999-03-01T10:00")).await.unwrap();

        let all = store
            .list_court_dates(&CourtDateFilter {
                case_id: Some(case.id),
                upcoming: false,
            })
            .await
            .unwrap();
        assert_eq!(all.len(), 2);

        let upcoming = store
            .list_court_dates(&CourtDateFilter {
                case_id: None,
                upcoming: true,
            })
            .await
            .unwrap();
        assert_eq!(upcoming, vec![future]);
    }

    #[tokio::test]
    async fn test_record_outcome() {
        let store = test_support::store().await;
        let case = test_support::case(&store, "Johnson Family", None).await;
        let date = store.create_court_date(&hearing(case.id, "2024-11-15 09:30:00")).await.unwrap();

        let update: CourtDateUpdate =
            serde_json::from_value(serde_json::json!({"outcome": "Continued to January"})).unwrap();
        let updated = store.update_court_date(date.id, &update).await.unwrap().unwrap();

        assert_eq!(updated.outcome.as_deref(), Some("Continued to January"));
        assert_eq!(updated.location, date.location);
        assert!(store.delete_court_date(date.id).await.unwrap());
    }
}
