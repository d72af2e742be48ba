use crate::model::{blank_as_none, patch, ContactLogWithNames, CourtDate, EvidenceReview, Id, KanbanTask, Patch};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaseStatus {
    #[default]
    Active,
    Pending,
    OnHold,
    Closed,
}

impl CaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::Active => "ACTIVE",
            CaseStatus::Pending => "PENDING",
            CaseStatus::OnHold => "ON_HOLD",
            CaseStatus::Closed => "CLOSED",
        }
    }
}

impl FromStr for CaseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(CaseStatus::Active),
            "PENDING" => Ok(CaseStatus::Pending),
            "ON_HOLD" => Ok(CaseStatus::OnHold),
            "CLOSED" => Ok(CaseStatus::Closed),
            other => Err(format!("unknown case status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Case {
    pub id: Id,
    pub case_name: String,
    pub case_number: Option<String>,
    pub case_description: Option<String>,
    pub status: CaseStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// A case row as shown in the case list, with related counts.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CaseSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub case: Case,
    pub task_count: i64,
    pub contact_count: i64,
    /// Earliest court date still in the future
    pub next_court_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaseFilter {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub status: Option<CaseStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCase {
    #[serde(default)]
    pub case_name: String,
    pub case_number: Option<String>,
    pub case_description: Option<String>,
    #[serde(default)]
    pub status: CaseStatus,
}

impl NewCase {
    /// Case numbers are optional; an empty one is stored as NULL so it never
    /// collides with the unique index.
    pub fn normalized_number(&self) -> Option<&str> {
        self.case_number.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaseUpdate {
    pub case_name: Option<String>,
    #[serde(default, deserialize_with = "patch")]
    pub case_number: Patch<String>,
    #[serde(default, deserialize_with = "patch")]
    pub case_description: Patch<String>,
    pub status: Option<CaseStatus>,
}

impl CaseUpdate {
    pub fn is_empty(&self) -> bool {
        self.case_name.is_none()
            && self.case_number.is_none()
            && self.case_description.is_none()
            && self.status.is_none()
    }

    /// The new case number when the update sets a non-empty one.
    pub fn new_number(&self) -> Option<&str> {
        match &self.case_number {
            Some(Some(number)) if !number.trim().is_empty() => Some(number.trim()),
            _ => None,
        }
    }
}

/// A contact linked to a case, with the contact's details.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct CaseContact {
    pub id: Id,
    pub case_id: Id,
    pub contact_id: Id,
    pub role: String,
    pub role_notes: Option<String>,
    pub created_at: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCaseContact {
    pub contact_id: Option<Id>,
    #[serde(default)]
    pub role: String,
    pub role_notes: Option<String>,
}

/// One case a contact takes part in.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct CrossCaseRole {
    pub case_id: Id,
    pub case_name: String,
    pub status: CaseStatus,
    pub role: String,
    pub role_notes: Option<String>,
    pub relationship_date: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseDetail {
    pub case: Case,
    pub contacts: Vec<CaseContact>,
    pub tasks: Vec<KanbanTask>,
    pub contact_logs: Vec<ContactLogWithNames>,
    pub evidence_reviews: Vec<EvidenceReview>,
    pub court_dates: Vec<CourtDate>,
}
