use crate::model::{blank_as_none, patch, Id, Patch};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContactType {
    Phone,
    Email,
    InPerson,
    Video,
    Court,
    #[default]
    Other,
}

impl ContactType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactType::Phone => "PHONE",
            ContactType::Email => "EMAIL",
            ContactType::InPerson => "IN_PERSON",
            ContactType::Video => "VIDEO",
            ContactType::Court => "COURT",
            ContactType::Other => "OTHER",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ContactLog {
    pub id: Id,
    pub case_id: Id,
    pub contact_id: Id,
    pub description: String,
    pub duration_minutes: i64,
    pub hours_spent: f64,
    pub contact_date: String,
    pub contact_type: ContactType,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// A contact log joined with the names of its contact and case.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct ContactLogWithNames {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub log: ContactLog,
    pub contact_name: String,
    pub case_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactLogFilter {
    #[serde(default, alias = "caseId", deserialize_with = "blank_as_none")]
    pub case_id: Option<Id>,
    #[serde(default, alias = "contactId", deserialize_with = "blank_as_none")]
    pub contact_id: Option<Id>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewContactLog {
    pub case_id: Option<Id>,
    pub contact_id: Option<Id>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub duration_minutes: i64,
    #[serde(default)]
    pub hours_spent: f64,
    #[serde(default)]
    pub contact_date: String,
    #[serde(default)]
    pub contact_type: ContactType,
    pub notes: Option<String>,
}

impl NewContactLog {
    /// Case, contact, description and date must all be present.
    pub fn has_required_fields(&self) -> bool {
        self.case_id.is_some_and(|id| id > 0)
            && self.contact_id.is_some_and(|id| id > 0)
            && !self.description.trim().is_empty()
            && !self.contact_date.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactLogUpdate {
    pub description: Option<String>,
    pub duration_minutes: Option<i64>,
    pub hours_spent: Option<f64>,
    pub contact_date: Option<String>,
    pub contact_type: Option<ContactType>,
    #[serde(default, deserialize_with = "patch")]
    pub notes: Patch<String>,
}

impl ContactLogUpdate {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.duration_minutes.is_none()
            && self.hours_spent.is_none()
            && self.contact_date.is_none()
            && self.contact_type.is_none()
            && self.notes.is_none()
    }
}
