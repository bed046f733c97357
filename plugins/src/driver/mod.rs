//! Database drivers shipped with sqlload.

mod sqlite;

pub use sqlite::SqliteDriver;
