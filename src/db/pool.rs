//! SQLite connection wrapper (one connection per operation).

use rusqlite::{Connection, Result};
use std::path::Path;
use std::time::Duration;

pub struct DbPool {
    pub conn: Connection,
}

impl DbPool {
    pub fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(Path::new(path))?;
        // The reminder job and the foreground command may write concurrently.
        conn.busy_timeout(Duration::from_secs(5))?;
        Ok(Self { conn })
    }
}
