use crate::model::{
    CaseFilter, CaseStatus, ContactType, Id, NewCase, NewCaseContact, NewContact, NewContactLog,
    NewCourtDate, NewEvidenceReview, NewKanbanTask, TaskPriority,
};
use crate::store::traits::Store;
use anyhow::Result;

/// Loads the sample cases shown in the demo screens. Does nothing when the
/// database already holds cases; returns whether data was loaded.
pub async fn load_seed_data<S: Store>(store: &S) -> Result<bool> {
    if !store.list_cases(&CaseFilter::default()).await?.is_empty() {
        log::info!("Database already contains cases, skipping seed data");
        return Ok(false);
    }

    let johnson = create_case(
        store,
        "Johnson Family Reunification",
        "2024-FR-0915",
        "Reunification plan for the Johnson children following temporary placement.",
        CaseStatus::Active,
    )
    .await?;
    let smith = create_case(
        store,
        "Smith Therapeutic Intervention",
        "2024-TI-0820",
        "Court-ordered family therapy and progress reporting.",
        CaseStatus::Pending,
    )
    .await?;
    let williams = create_case(
        store,
        "Williams Parenting Assessment",
        "2024-PA-1001",
        "Parenting capacity assessment requested by the court.",
        CaseStatus::OnHold,
    )
    .await?;

    let sarah = create_contact(store, "Sarah Johnson", Some("sarah.j@example.com"), Some("555-0101")).await?;
    let dr_smith = create_contact(store, "Dr. Smith", Some("dr.smith@court.gov"), Some("555-0102")).await?;
    let michael = create_contact(store, "Michael Johnson", None, None).await?;

    link(store, johnson, sarah, "Parent").await?;
    link(store, johnson, dr_smith, "Guardian Ad Litem").await?;
    link(store, williams, dr_smith, "Expert Witness").await?;
    link(store, johnson, michael, "Child").await?;

    for (case_id, contact_id, description, minutes, date, contact_type) in [
        (johnson, sarah, "Supervised visit at family center", 90, "2024-10-08", ContactType::InPerson),
        (johnson, dr_smith, "Case conference call", 30, "2024-10-09", ContactType::Phone),
        (williams, dr_smith, "Assessment scheduling", 15, "2024-10-07", ContactType::Email),
    ] {
        store
            .create_contact_log(&NewContactLog {
                case_id: Some(case_id),
                contact_id: Some(contact_id),
                description: description.to_string(),
                duration_minutes: minutes,
                hours_spent: minutes as f64 / 60.0,
                contact_date: date.to_string(),
                contact_type,
                notes: None,
            })
            .await?;
    }

    for (case_id, title, status, priority) in [
        (johnson, "Prepare court report", "todo", TaskPriority::High),
        (johnson, "Schedule home visit", "todo", TaskPriority::Medium),
        (johnson, "Conduct parent assessment", "in-progress", TaskPriority::High),
        (johnson, "Review school records", "review", TaskPriority::Low),
        (smith, "Collect therapist progress notes", "todo", TaskPriority::Medium),
        (williams, "Interview extended family", "done", TaskPriority::Medium),
    ] {
        store
            .create_task(&NewKanbanTask {
                case_id: Some(case_id),
                title: title.to_string(),
                status: Some(status.to_string()),
                priority,
                ..Default::default()
            })
            .await?;
    }

    store
        .create_evidence(&NewEvidenceReview {
            case_id: Some(johnson),
            evidence_type: "REPORT".to_string(),
            title: "School attendance records".to_string(),
            review_date: Some("2024-10-05".to_string()),
            ..Default::default()
        })
        .await?;

    for (case_id, date, court_type) in [
        (johnson, "2024-11-15 09:30:00", "Review hearing"),
        (smith, "2024-10-30 10:00:00", "Status conference"),
        (williams, "2024-11-08 13:30:00", "Evidentiary hearing"),
    ] {
        store
            .create_court_date(&NewCourtDate {
                case_id: Some(case_id),
                court_date: date.to_string(),
                court_type: Some(court_type.to_string()),
                location: Some("Family Court".to_string()),
                ..Default::default()
            })
            .await?;
    }

    log::info!("Seed data loaded: 3 cases, 3 contacts");
    Ok(true)
}

async fn create_case<S: Store>(
    store: &S,
    name: &str,
    number: &str,
    description: &str,
    status: CaseStatus,
) -> Result<Id> {
    let case = store
        .create_case(&NewCase {
            case_name: name.to_string(),
            case_number: Some(number.to_string()),
            case_description: Some(description.to_string()),
            status,
        })
        .await?;
    Ok(case.id)
}

async fn create_contact<S: Store>(
    store: &S,
    name: &str,
    email: Option<&str>,
    phone: Option<&str>,
) -> Result<Id> {
    let contact = store
        .create_contact(&NewContact {
            name: name.to_string(),
            email: email.map(str::to_string),
            phone: phone.map(str::to_string),
            ..Default::default()
        })
        .await?;
    Ok(contact.id)
}

async fn link<S: Store>(store: &S, case_id: Id, contact_id: Id, role: &str) -> Result<()> {
    store
        .link_contact(
            case_id,
            &NewCaseContact {
                contact_id: Some(contact_id),
                role: role.to_string(),
                role_notes: None,
            },
        )
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContactFilter, ContactLogFilter};
    use crate::store::{CaseStore, ContactLogStore, ContactStore, SqliteStore};

    #[tokio::test]
    async fn test_seed_loads_once() {
        let store = SqliteStore::in_memory().await.unwrap();
        store.migrate().await.unwrap();

        assert!(load_seed_data(&store).await.unwrap());
        assert!(!load_seed_data(&store).await.unwrap());

        let cases = store.list_cases(&CaseFilter::default()).await.unwrap();
        assert_eq!(cases.len(), 3);
        let contacts = store.list_contacts(&ContactFilter::default()).await.unwrap();
        assert_eq!(contacts.len(), 3);
        let logs = store
            .list_contact_logs(&ContactLogFilter::default())
            .await
            .unwrap();
        assert_eq!(logs.len(), 3);
    }
}
