pub mod case;
pub mod common;
pub mod contact;
pub mod contact_log;
pub mod court_date;
pub mod evidence;
pub mod kanban;
pub mod report;
pub mod template;

pub use case::*;
pub use common::*;
pub use contact::*;
pub use contact_log::*;
pub use court_date::*;
pub use evidence::*;
pub use kanban::*;
pub use report::*;
pub use template::*;
