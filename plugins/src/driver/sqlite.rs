//! SQLite driver on top of `rusqlite` with the bundled library.
//!
//! `database_name` is the path of an existing database file. Host, port,
//! credentials and TLS have no meaning for SQLite and are ignored apart
//! from logging.

use std::path::Path;
use std::time::Duration;

use rusqlite::{Batch, Connection, OpenFlags};

use sqlload_core::config::DatabaseConfig;
use sqlload_core::executor::types::DriverError;
use sqlload_core::executor::{DatabaseConnection, DatabaseDriver};

/// Map a rusqlite error into a statement failure.
macro_rules! stmt_err {
    ($result:expr) => {
        $result.map_err(|e| DriverError::Statement(e.to_string()))
    };
}

/// How long a statement waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Default)]
pub struct SqliteDriver;

impl SqliteDriver {
    pub fn new() -> Self {
        Self
    }
}

impl DatabaseDriver for SqliteDriver {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn aliases(&self) -> &[&'static str] {
        &["sqlite3", "org.sqlite.JDBC"]
    }

    fn connect(&self, db: &DatabaseConfig) -> Result<Box<dyn DatabaseConnection>, DriverError> {
        let url = db.connection_url(self.name());
        let connect_err = |reason: String| DriverError::Connect {
            url: url.clone(),
            reason,
        };

        // No CREATE flag: a missing file is a connection failure, not a
        // fresh empty database.
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(Path::new(&db.database_name), flags)
            .map_err(|e| connect_err(e.to_string()))?;
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(|e| connect_err(e.to_string()))?;

        tracing::trace!(path = %db.database_name, "sqlite connection opened");
        Ok(Box::new(SqliteConnection { conn }))
    }
}

struct SqliteConnection {
    conn: Connection,
}

impl DatabaseConnection for SqliteConnection {
    /// Runs every statement in `sql` in order, draining each one's rows.
    /// Text with no statement at all (blank or comments only) is an error.
    fn execute(&mut self, sql: &str) -> Result<(), DriverError> {
        let mut batch = Batch::new(&self.conn, sql);
        let mut statements = 0usize;
        let mut drained = 0usize;
        while let Some(mut stmt) = stmt_err!(batch.next())? {
            statements += 1;
            let mut rows = stmt_err!(stmt.query([]))?;
            while stmt_err!(rows.next())?.is_some() {
                drained += 1;
            }
        }

        if statements == 0 {
            return Err(DriverError::Statement(
                "file contains no SQL statement".to_string(),
            ));
        }
        tracing::trace!(statements, rows = drained, "statements drained");
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<(), DriverError> {
        self.conn
            .close()
            .map_err(|(_, e)| DriverError::Close(e.to_string()))
    }
}
