pub mod db;
pub mod sqlite;
pub mod traits;

pub use db::Db;
pub use sqlite::*;
pub use traits::*;
