use anyhow::{Context, Result};

use super::SqliteStore;
use crate::model::{EvidenceFilter, EvidenceReview, EvidenceReviewUpdate, Id, NewEvidenceReview};
use crate::store::db::{Conditions, SqlParam, UpdateSet};
use crate::store::traits::EvidenceStore;

#[async_trait::async_trait]
impl EvidenceStore for SqliteStore {
    async fn list_evidence(&self, filter: &EvidenceFilter) -> Result<Vec<EvidenceReview>> {
        let mut sql = "SELECT * FROM evidence_reviews".to_string();
        let mut conditions = Conditions::new();
        if let Some(case_id) = filter.case_id {
            conditions.push("case_id = ?", [SqlParam::from(case_id)]);
        }
        let params = conditions.apply(&mut sql);
        sql.push_str(" ORDER BY review_date DESC, id DESC");

        self.db
            .query(&sql, &params)
            .await
            .context("Failed to list evidence reviews")
    }

    async fn get_evidence(&self, id: Id) -> Result<Option<EvidenceReview>> {
        self.db
            .get("SELECT * FROM evidence_reviews WHERE id = ?", &[id.into()])
            .await
            .context("Failed to fetch evidence review")
    }

    async fn create_evidence(&self, new_review: &NewEvidenceReview) -> Result<EvidenceReview> {
        let result = self
            .db
            .run(
                r#"
                INSERT INTO evidence_reviews (
                    case_id, evidence_type, title, description, review_date, reviewer, findings, status
                )
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
                &[
                    new_review.case_id.into(),
                    new_review.evidence_type.trim().into(),
                    new_review.title.trim().into(),
                    new_review.description.as_deref().into(),
                    new_review.review_date.as_deref().into(),
                    new_review.reviewer.as_deref().into(),
                    new_review.findings.as_deref().into(),
                    new_review.status.as_str().into(),
                ],
            )
            .await
            .context("Failed to create evidence review")?;

        self.get_evidence(result.last_insert_rowid)
            .await?
            .context("Created evidence review disappeared")
    }

    async fn update_evidence(&self, id: Id, update: &EvidenceReviewUpdate) -> Result<Option<EvidenceReview>> {
        let mut set = UpdateSet::new();
        set.set_if("evidence_type", update.evidence_type.as_deref().map(str::trim))
            .set_if("title", update.title.as_deref().map(str::trim))
            .set_if("description", update.description.clone())
            .set_if("review_date", update.review_date.clone())
            .set_if("reviewer", update.reviewer.clone())
            .set_if("findings", update.findings.clone())
            .set_if("status", update.status.map(|s| s.as_str()));

        if !set.is_empty() {
            let (sql, params) = set.into_statement("evidence_reviews", id);
            self.db
                .run(&sql, &params)
                .await
                .context("Failed to update evidence review")?;
        }

        self.get_evidence(id).await
    }

    async fn delete_evidence(&self, id: Id) -> Result<bool> {
        let result = self
            .db
            .run("DELETE FROM evidence_reviews WHERE id = ?", &[id.into()])
            .await
            .context("Failed to delete evidence review")?;
        Ok(result.changes > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support;
    use super::*;
    use crate::model::EvidenceStatus;

    #[tokio::test]
    async fn test_evidence_lifecycle() {
        let store = test_support::store().await;
        let case = test_support::case(&store, "Johnson Family", None).await;

        let review = store
            .create_evidence(&NewEvidenceReview {
                case_id: Some(case.id),
                evidence_type: "REPORT".to_string(),
                title: "School attendance records".to_string(),
                review_date: Some("2024-10-02".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(review.status, EvidenceStatus::Pending);

        let update: EvidenceReviewUpdate = serde_json::from_value(
            serde_json::json!({"status": "REVIEWED", "findings": "Attendance above 95%"}),
        )
        .unwrap();
        let updated = store.update_evidence(review.id, &update).await.unwrap().unwrap();
        assert_eq!(updated.status, EvidenceStatus::Reviewed);
        assert_eq!(updated.findings.as_deref(), Some("Attendance above 95%"));
        assert_eq!(updated.title, review.title);

        let listed = store
            .list_evidence(&EvidenceFilter {
                case_id: Some(case.id),
            })
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);

        assert!(store.delete_evidence(review.id).await.unwrap());
        assert!(store.get_evidence(review.id).await.unwrap().is_none());
    }
}
