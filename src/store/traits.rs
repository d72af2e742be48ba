use crate::model::{
    Case, CaseContact, CaseDetail, CaseFilter, CaseSummary, CaseSummaryReport, CaseUpdate, Contact,
    ContactDetail, ContactFilter, ContactHours, ContactHoursQuery, ContactLog, ContactLogFilter,
    ContactLogUpdate, ContactLogWithNames, ContactSummary, ContactUpdate, CourtDate,
    CourtDateFilter, CourtDateUpdate, DashboardReport, EvidenceFilter, EvidenceReview,
    EvidenceReviewUpdate, Id, KanbanTask, KanbanTaskUpdate, NewCase, NewCaseContact, NewContact,
    NewContactLog, NewCourtDate, NewEvidenceReview, NewKanbanTask, CrossCaseRole,
};
use anyhow::Result;

#[async_trait::async_trait]
pub trait CaseStore: Send + Sync {
    /// Cases with related counts, newest activity first
    async fn list_cases(&self, filter: &CaseFilter) -> Result<Vec<CaseSummary>>;
    async fn get_case(&self, id: Id) -> Result<Option<Case>>;
    async fn case_exists(&self, id: Id) -> Result<bool>;
    /// Whether another case (other than `excluding`) already uses `case_number`
    async fn case_number_taken(&self, case_number: &str, excluding: Option<Id>) -> Result<bool>;
    async fn create_case(&self, new_case: &NewCase) -> Result<Case>;
    async fn update_case(&self, id: Id, update: &CaseUpdate) -> Result<Option<Case>>;
    /// Soft delete: flips the status to CLOSED
    async fn archive_case(&self, id: Id) -> Result<bool>;
    /// The case with contacts, tasks, logs, evidence and court dates
    async fn get_case_detail(&self, id: Id) -> Result<Option<CaseDetail>>;
}

#[async_trait::async_trait]
pub trait CaseContactStore: Send + Sync {
    async fn list_case_contacts(&self, case_id: Id) -> Result<Vec<CaseContact>>;
    async fn case_contact_exists(&self, case_id: Id, contact_id: Id, role: &str) -> Result<bool>;
    async fn link_contact(&self, case_id: Id, link: &NewCaseContact) -> Result<CaseContact>;
    async fn unlink_contact(&self, case_id: Id, link_id: Id) -> Result<bool>;
    /// Every case the contact is linked to, with the role held in each
    async fn cross_case_roles(&self, contact_id: Id) -> Result<Vec<CrossCaseRole>>;
}

#[async_trait::async_trait]
pub trait ContactStore: Send + Sync {
    async fn list_contacts(&self, filter: &ContactFilter) -> Result<Vec<ContactSummary>>;
    async fn get_contact(&self, id: Id) -> Result<Option<Contact>>;
    async fn contact_exists(&self, id: Id) -> Result<bool>;
    async fn create_contact(&self, new_contact: &NewContact) -> Result<Contact>;
    async fn update_contact(&self, id: Id, update: &ContactUpdate) -> Result<Option<Contact>>;
    async fn delete_contact(&self, id: Id) -> Result<bool>;
    async fn get_contact_detail(&self, id: Id) -> Result<Option<ContactDetail>>;
}

#[async_trait::async_trait]
pub trait ContactLogStore: Send + Sync {
    async fn list_contact_logs(&self, filter: &ContactLogFilter) -> Result<Vec<ContactLogWithNames>>;
    async fn get_contact_log(&self, id: Id) -> Result<Option<ContactLogWithNames>>;
    async fn contact_log_exists(&self, id: Id) -> Result<bool>;
    async fn count_contact_logs_for_contact(&self, contact_id: Id) -> Result<i64>;
    async fn create_contact_log(&self, new_log: &NewContactLog) -> Result<ContactLog>;
    async fn update_contact_log(&self, id: Id, update: &ContactLogUpdate) -> Result<Option<ContactLog>>;
    async fn delete_contact_log(&self, id: Id) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait KanbanStore: Send + Sync {
    /// Tasks of a case ordered by column position
    async fn list_tasks_for_case(&self, case_id: Id) -> Result<Vec<KanbanTask>>;
    async fn get_task(&self, id: Id) -> Result<Option<KanbanTask>>;
    /// Appends the task at the end of its column
    async fn create_task(&self, new_task: &NewKanbanTask) -> Result<KanbanTask>;
    async fn update_task(&self, id: Id, update: &KanbanTaskUpdate) -> Result<Option<KanbanTask>>;
    /// Moves a task to `status` at `position`, keeping both columns dense
    async fn move_task(&self, id: Id, status: &str, position: Option<i64>) -> Result<Option<KanbanTask>>;
    async fn delete_task(&self, id: Id) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait EvidenceStore: Send + Sync {
    async fn list_evidence(&self, filter: &EvidenceFilter) -> Result<Vec<EvidenceReview>>;
    async fn get_evidence(&self, id: Id) -> Result<Option<EvidenceReview>>;
    async fn create_evidence(&self, new_review: &NewEvidenceReview) -> Result<EvidenceReview>;
    async fn update_evidence(&self, id: Id, update: &EvidenceReviewUpdate) -> Result<Option<EvidenceReview>>;
    async fn delete_evidence(&self, id: Id) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait CourtDateStore: Send + Sync {
    async fn list_court_dates(&self, filter: &CourtDateFilter) -> Result<Vec<CourtDate>>;
    async fn get_court_date(&self, id: Id) -> Result<Option<CourtDate>>;
    async fn create_court_date(&self, new_date: &NewCourtDate) -> Result<CourtDate>;
    async fn update_court_date(&self, id: Id, update: &CourtDateUpdate) -> Result<Option<CourtDate>>;
    async fn delete_court_date(&self, id: Id) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait ReportStore: Send + Sync {
    async fn dashboard(&self) -> Result<DashboardReport>;
    async fn case_summary(&self, case_id: Id) -> Result<Option<CaseSummaryReport>>;
    async fn contact_hours(&self, query: &ContactHoursQuery) -> Result<Vec<ContactHours>>;
}

pub trait Store:
    CaseStore
    + CaseContactStore
    + ContactStore
    + ContactLogStore
    + KanbanStore
    + EvidenceStore
    + CourtDateStore
    + ReportStore
    + Send
    + Sync
{
}

impl<T> Store for T where
    T: CaseStore
        + CaseContactStore
        + ContactStore
        + ContactLogStore
        + KanbanStore
        + EvidenceStore
        + CourtDateStore
        + ReportStore
        + Send
        + Sync
{
}
