use crate::model::{blank_as_none, patch, Id, Patch};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CourtDate {
    pub id: Id,
    pub case_id: Id,
    pub court_date: String,
    pub court_type: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub outcome: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourtDateFilter {
    #[serde(default, alias = "caseId", deserialize_with = "blank_as_none")]
    pub case_id: Option<Id>,
    /// Only dates after now
    #[serde(default)]
    pub upcoming: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCourtDate {
    pub case_id: Option<Id>,
    #[serde(default)]
    pub court_date: String,
    pub court_type: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

impl NewCourtDate {
    pub fn has_required_fields(&self) -> bool {
        self.case_id.is_some_and(|id| id > 0) && !self.court_date.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourtDateUpdate {
    pub court_date: Option<String>,
    #[serde(default, deserialize_with = "patch")]
    pub court_type: Patch<String>,
    #[serde(default, deserialize_with = "patch")]
    pub description: Patch<String>,
    #[serde(default, deserialize_with = "patch")]
    pub location: Patch<String>,
    #[serde(default, deserialize_with = "patch")]
    pub outcome: Patch<String>,
    #[serde(default, deserialize_with = "patch")]
    pub notes: Patch<String>,
}

impl CourtDateUpdate {
    pub fn is_empty(&self) -> bool {
        self.court_date.is_none()
            && self.court_type.is_none()
            && self.description.is_none()
            && self.location.is_none()
            && self.outcome.is_none()
            && self.notes.is_none()
    }
}
