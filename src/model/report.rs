use crate::model::{blank_as_none, Case, CaseStatus, ContactLogWithNames, Id};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct StatusCount {
    pub status: CaseStatus,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct UpcomingCourtDate {
    pub id: Id,
    pub case_id: Id,
    pub case_name: String,
    pub court_date: String,
    pub description: Option<String>,
    pub location: Option<String>,
    /// Whole days from today until the hearing
    pub days_until: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub cases_by_status: Vec<StatusCount>,
    pub active_cases: i64,
    pub upcoming_court_dates: Vec<UpcomingCourtDate>,
    pub recent_activity: Vec<ContactLogWithNames>,
    pub total_hours: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, FromRow)]
pub struct CaseTotals {
    pub contact_count: i64,
    pub open_task_count: i64,
    pub done_task_count: i64,
    pub contact_log_count: i64,
    pub total_hours: f64,
    pub total_minutes: i64,
    pub evidence_count: i64,
    pub court_date_count: i64,
    pub next_court_date: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CaseSummaryReport {
    pub case: Case,
    #[serde(flatten)]
    pub totals: CaseTotals,
    pub generated_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactHoursQuery {
    #[serde(default, alias = "caseId", deserialize_with = "blank_as_none")]
    pub case_id: Option<Id>,
    #[serde(alias = "startDate")]
    pub start_date: Option<String>,
    #[serde(alias = "endDate")]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct ContactHours {
    pub contact_id: Id,
    pub contact_name: String,
    pub case_id: Id,
    pub case_name: String,
    pub log_count: i64,
    pub total_minutes: i64,
    pub total_hours: f64,
}
