use anyhow::{Context, Result};

use super::cases::LOGS_WITH_NAMES_SQL;
use super::SqliteStore;
use crate::model::{
    CaseStatus, CaseSummaryReport, CaseTotals, ContactHours, ContactHoursQuery, ContactLogWithNames,
    DashboardReport, Id, StatusCount, UpcomingCourtDate,
};
use crate::store::db::{Conditions, SqlParam};
use crate::store::traits::{CaseStore, ReportStore};

const UPCOMING_WINDOW_DAYS: i64 = 30;
const RECENT_ACTIVITY_LIMIT: i64 = 10;

const UPCOMING_COURT_DATES_SQL: &str = r#"
    SELECT
        cd.id,
        cd.case_id,
        c.case_name,
        cd.court_date,
        cd.description,
        cd.location,
        CAST(julianday(date(cd.court_date)) - julianday(date('now')) AS INTEGER) AS days_until
    FROM court_dates cd
    JOIN cases c ON cd.case_id = c.id
    WHERE datetime(cd.court_date) > datetime('now')
      AND datetime(cd.court_date) <= datetime('now', ?)
    ORDER BY datetime(cd.court_date), cd.id
"#;

const CASE_TOTALS_SQL: &str = r#"
    SELECT
        (SELECT COUNT(DISTINCT contact_id) FROM case_contacts WHERE case_id = ?) AS contact_count,
        (SELECT COUNT(*) FROM kanban_tasks WHERE case_id = ? AND status != 'done') AS open_task_count,
        (SELECT COUNT(*) FROM kanban_tasks WHERE case_id = ? AND status = 'done') AS done_task_count,
        (SELECT COUNT(*) FROM contact_logs WHERE case_id = ?) AS contact_log_count,
        (SELECT TOTAL(hours_spent) FROM contact_logs WHERE case_id = ?) AS total_hours,
        (SELECT COALESCE(SUM(duration_minutes), 0) FROM contact_logs WHERE case_id = ?) AS total_minutes,
        (SELECT COUNT(*) FROM evidence_reviews WHERE case_id = ?) AS evidence_count,
        (SELECT COUNT(*) FROM court_dates WHERE case_id = ?) AS court_date_count,
        (SELECT MIN(court_date) FROM court_dates
            WHERE case_id = ? AND datetime(court_date) > datetime('now')) AS next_court_date
"#;

#[async_trait::async_trait]
impl ReportStore for SqliteStore {
    async fn dashboard(&self) -> Result<DashboardReport> {
        let cases_by_status: Vec<StatusCount> = self
            .db
            .query(
                "SELECT status, COUNT(*) AS count FROM cases GROUP BY status ORDER BY status",
                &[],
            )
            .await
            .context("Failed to count cases by status")?;

        let active_cases: i64 = cases_by_status
            .iter()
            .filter(|row| row.status == CaseStatus::Active)
            .map(|row| row.count)
            .sum();

        let upcoming_court_dates: Vec<UpcomingCourtDate> = self
            .db
            .query(
                UPCOMING_COURT_DATES_SQL,
                &[format!("+{} days", UPCOMING_WINDOW_DAYS).into()],
            )
            .await
            .context("Failed to fetch upcoming court dates")?;

        let recent_activity: Vec<ContactLogWithNames> = self
            .db
            .query(
                &format!(
                    "{} ORDER BY cl.contact_date DESC, cl.id DESC LIMIT ?",
                    LOGS_WITH_NAMES_SQL
                ),
                &[RECENT_ACTIVITY_LIMIT.into()],
            )
            .await
            .context("Failed to fetch recent activity")?;

        let (total_hours,): (f64,) = self
            .db
            .get("SELECT TOTAL(hours_spent) FROM contact_logs", &[])
            .await
            .context("Failed to total logged hours")?
            .unwrap_or((0.0,));

        Ok(DashboardReport {
            cases_by_status,
            active_cases,
            upcoming_court_dates,
            recent_activity,
            total_hours,
        })
    }

    async fn case_summary(&self, case_id: Id) -> Result<Option<CaseSummaryReport>> {
        let Some(case) = self.get_case(case_id).await? else {
            return Ok(None);
        };

        let params = vec![SqlParam::from(case_id); 9];
        let totals: CaseTotals = self
            .db
            .get(CASE_TOTALS_SQL, &params)
            .await
            .context("Failed to compute case totals")?
            .unwrap_or_default();

        Ok(Some(CaseSummaryReport {
            case,
            totals,
            generated_at: chrono::Utc::now().to_rfc3339(),
        }))
    }

    async fn contact_hours(&self, query: &ContactHoursQuery) -> Result<Vec<ContactHours>> {
        let mut sql = r#"
            SELECT
                c.id AS contact_id,
                c.name AS contact_name,
                cs.id AS case_id,
                cs.case_name,
                COUNT(cl.id) AS log_count,
                COALESCE(SUM(cl.duration_minutes), 0) AS total_minutes,
                TOTAL(cl.hours_spent) AS total_hours
            FROM contact_logs cl
            JOIN contacts c ON cl.contact_id = c.id
            JOIN cases cs ON cl.case_id = cs.id
        "#
        .to_string();

        let mut conditions = Conditions::new();
        if let Some(case_id) = query.case_id {
            conditions.push("cl.case_id = ?", [SqlParam::from(case_id)]);
        }
        if let Some(start) = non_blank(query.start_date.as_deref()) {
            conditions.push("date(cl.contact_date) >= date(?)", [SqlParam::from(start)]);
        }
        if let Some(end) = non_blank(query.end_date.as_deref()) {
            conditions.push("date(cl.contact_date) <= date(?)", [SqlParam::from(end)]);
        }
        let params = conditions.apply(&mut sql);
        sql.push_str(" GROUP BY c.id, cs.id ORDER BY total_hours DESC, c.name");

        self.db
            .query(&sql, &params)
            .await
            .context("Failed to compute contact hours")
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::super::test_support;
    use super::*;
    use crate::model::{Case, Contact, NewContactLog, NewCourtDate, NewKanbanTask};
    use crate::store::traits::{ContactLogStore, CourtDateStore, KanbanStore};

    async fn log(store: &SqliteStore, case: &Case, contact: &Contact, date: &str, minutes: i64, hours: f64) {
        store
            .create_contact_log(&NewContactLog {
                case_id: Some(case.id),
                contact_id: Some(contact.id),
                description: "Supervised visit".to_string(),
                duration_minutes: minutes,
                hours_spent: hours,
                contact_date: date.to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
    }

    fn days_from_now(days: i64) -> String {
        (chrono::Utc::now() + chrono::Duration::days(days))
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
    }

    #[tokio::test]
    async fn test_dashboard() {
        let store = test_support::store().await;
        let case = test_support::case(&store, "Johnson Family", None).await;
        test_support::case(&store, "Martinez Custody", None).await;
        let closed = test_support::case(&store, "Closed Matter", None).await;
        store.archive_case(closed.id).await.unwrap();
        let contact = test_support::contact(&store, "Sarah Johnson").await;

        log(&store, &case, &contact, "2024-10-01", 60, 1.0).await;
        log(&store, &case, &contact, "2024-10-03", 90, 1.5).await;

        for days in [5, 45] {
            store
                .create_court_date(&NewCourtDate {
                    case_id: Some(case.id),
                    court_date: days_from_now(days),
                    ..Default::default()
                })
                .await
                .unwrap();
        }

        let report = store.dashboard().await.unwrap();

        assert_eq!(report.active_cases, 2);
        assert!(report
            .cases_by_status
            .contains(&StatusCount { status: CaseStatus::Closed, count: 1 }));
        assert_eq!(report.upcoming_court_dates.len(), 1);
        assert_eq!(report.upcoming_court_dates[0].case_name, "Johnson Family");
        assert!((4..=5).contains(&report.upcoming_court_dates[0].days_until));
        assert_eq!(report.recent_activity.len(), 2);
        assert_eq!(report.recent_activity[0].log.contact_date, "2024-10-03");
        assert!((report.total_hours - 2.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_case_summary_totals() {
        let store = test_support::store().await;
        let case = test_support::case(&store, "Johnson Family", None).await;
        let contact = test_support::contact(&store, "Sarah Johnson").await;
        log(&store, &case, &contact, "2024-10-01", 45, 0.75).await;

        for status in ["todo", "done", "done"] {
            store
                .create_task(&NewKanbanTask {
                    case_id: Some(case.id),
                    title: "Task".to_string(),
                    status: Some(status.to_string()),
                    ..Default::default()
                })
                .await
                .unwrap();
        }

        let summary = store.case_summary(case.id).await.unwrap().unwrap();
        assert_eq!(summary.case.id, case.id);
        assert_eq!(summary.totals.open_task_count, 1);
        assert_eq!(summary.totals.done_task_count, 2);
        assert_eq!(summary.totals.contact_log_count, 1);
        assert_eq!(summary.totals.total_minutes, 45);
        assert_eq!(summary.totals.next_court_date, None);

        assert!(store.case_summary(9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_contact_hours_date_range_is_inclusive() {
        let store = test_support::store().await;
        let case = test_support::case(&store, "Johnson Family", None).await;
        let sarah = test_support::contact(&store, "Sarah Johnson").await;
        let mike = test_support::contact(&store, "Mike Johnson").await;

        log(&store, &case, &sarah, "2024-10-01", 60, 1.0).await;
        log(&store, &case, &sarah, "2024-10-31T16:00", 120, 2.0).await;
        log(&store, &case, &sarah, "2024-11-02", 60, 1.0).await;
        log(&store, &case, &mike, "2024-10-15", 30, 0.5).await;

        let rows = store
            .contact_hours(&ContactHoursQuery {
                case_id: Some(case.id),
                start_date: Some("2024-10-01".to_string()),
                end_date: Some("2024-10-31".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].contact_name, "Sarah Johnson");
        assert_eq!(rows[0].log_count, 2);
        assert_eq!(rows[0].total_minutes, 180);
        assert!((rows[0].total_hours - 3.0).abs() < f64::EPSILON);
        assert_eq!(rows[1].contact_id, mike.id);
    }
}
