mod sqlite;
mod traits;

pub use sqlite::SqliteHistoryStore;
pub use traits::*;
