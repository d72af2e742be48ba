use crate::model::{blank_as_none, patch, Id, Patch};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvidenceStatus {
    #[default]
    Pending,
    InReview,
    Reviewed,
}

impl EvidenceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvidenceStatus::Pending => "PENDING",
            EvidenceStatus::InReview => "IN_REVIEW",
            EvidenceStatus::Reviewed => "REVIEWED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct EvidenceReview {
    pub id: Id,
    pub case_id: Id,
    pub evidence_type: String,
    pub title: String,
    pub description: Option<String>,
    pub review_date: Option<String>,
    pub reviewer: Option<String>,
    pub findings: Option<String>,
    pub status: EvidenceStatus,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EvidenceFilter {
    #[serde(default, alias = "caseId", deserialize_with = "blank_as_none")]
    pub case_id: Option<Id>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewEvidenceReview {
    pub case_id: Option<Id>,
    #[serde(default)]
    pub evidence_type: String,
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub review_date: Option<String>,
    pub reviewer: Option<String>,
    pub findings: Option<String>,
    #[serde(default)]
    pub status: EvidenceStatus,
}

impl NewEvidenceReview {
    pub fn has_required_fields(&self) -> bool {
        self.case_id.is_some_and(|id| id > 0)
            && !self.evidence_type.trim().is_empty()
            && !self.title.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EvidenceReviewUpdate {
    pub evidence_type: Option<String>,
    pub title: Option<String>,
    #[serde(default, deserialize_with = "patch")]
    pub description: Patch<String>,
    #[serde(default, deserialize_with = "patch")]
    pub review_date: Patch<String>,
    #[serde(default, deserialize_with = "patch")]
    pub reviewer: Patch<String>,
    #[serde(default, deserialize_with = "patch")]
    pub findings: Patch<String>,
    pub status: Option<EvidenceStatus>,
}

impl EvidenceReviewUpdate {
    pub fn is_empty(&self) -> bool {
        self.evidence_type.is_none()
            && self.title.is_none()
            && self.description.is_none()
            && self.review_date.is_none()
            && self.reviewer.is_none()
            && self.findings.is_none()
            && self.status.is_none()
    }
}
