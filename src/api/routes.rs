use axum::{
    routing::{get, post, put},
    Router,
};

use crate::api::handlers::{self, AppState};
use crate::api::{cases, contact_logs, contacts, court_dates, evidence, kanban, reports, templates};
use crate::store::traits::Store;

pub fn create_router<S: Store + 'static>() -> Router<AppState<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Cases
        .route(
            "/api/cases",
            get(cases::list_cases::<S>).post(cases::create_case::<S>),
        )
        .route(
            "/api/cases/:id",
            get(cases::get_case::<S>)
                .put(cases::update_case::<S>)
                .delete(cases::archive_case::<S>),
        )
        .route(
            "/api/cases/:id/contacts",
            get(cases::list_case_contacts::<S>).post(cases::link_case_contact::<S>),
        )
        // The second segment is a link id here and a contact id below; the
        // router requires one parameter name per position.
        .route(
            "/api/cases/:id/contacts/:target_id",
            axum::routing::delete(cases::unlink_case_contact::<S>),
        )
        .route(
            "/api/cases/:id/contacts/:target_id/cross-case",
            get(cases::cross_case_roles::<S>),
        )
        // Contacts
        .route(
            "/api/contacts",
            get(contacts::list_contacts::<S>).post(contacts::create_contact::<S>),
        )
        .route(
            "/api/contacts/:id",
            get(contacts::get_contact::<S>)
                .put(contacts::update_contact::<S>)
                .delete(contacts::delete_contact::<S>),
        )
        // Contact logs
        .route(
            "/api/contact-logs",
            get(contact_logs::list_contact_logs::<S>).post(contact_logs::create_contact_log::<S>),
        )
        .route(
            "/api/contact-logs/:id",
            get(contact_logs::get_contact_log::<S>)
                .put(contact_logs::update_contact_log::<S>)
                .delete(contact_logs::delete_contact_log::<S>),
        )
        // Kanban
        .route("/api/kanban/cases/:case_id", get(kanban::get_board::<S>))
        .route("/api/kanban/tasks", post(kanban::create_task::<S>))
        .route(
            "/api/kanban/tasks/:id",
            put(kanban::update_task::<S>).delete(kanban::delete_task::<S>),
        )
        .route("/api/kanban/tasks/:id/move", put(kanban::move_task::<S>))
        // Evidence reviews
        .route(
            "/api/evidence",
            get(evidence::list_evidence::<S>).post(evidence::create_evidence::<S>),
        )
        .route(
            "/api/evidence/:id",
            get(evidence::get_evidence::<S>)
                .put(evidence::update_evidence::<S>)
                .delete(evidence::delete_evidence::<S>),
        )
        // Court dates
        .route(
            "/api/court-dates",
            get(court_dates::list_court_dates::<S>).post(court_dates::create_court_date::<S>),
        )
        .route(
            "/api/court-dates/:id",
            get(court_dates::get_court_date::<S>)
                .put(court_dates::update_court_date::<S>)
                .delete(court_dates::delete_court_date::<S>),
        )
        // Reports
        .route("/api/reports/dashboard", get(reports::dashboard::<S>))
        .route(
            "/api/reports/case-summary/:id",
            get(reports::case_summary::<S>),
        )
        .route("/api/reports/contact-hours", get(reports::contact_hours::<S>))
        // Field templates
        .route(
            "/api/templates/fields/:kind",
            get(templates::get_template::<S>).put(templates::update_template::<S>),
        )
        .route("/api/templates/backup", get(templates::list_backups::<S>))
        .route("/api/templates/restore", post(templates::restore_backup::<S>))
        .route("/api/templates/info", get(templates::template_info::<S>))
}
