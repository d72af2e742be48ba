pub mod cases;
pub mod contact_logs;
pub mod contacts;
pub mod court_dates;
pub mod evidence;
pub mod extract;
pub mod handlers;
pub mod kanban;
pub mod middleware;
pub mod reports;
pub mod response;
pub mod routes;
pub mod templates;

pub use handlers::*;
pub use response::*;
pub use routes::*;
