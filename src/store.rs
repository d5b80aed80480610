//! Session persistence for innersense-rs.
//!
//! One SQLite table, one r2d2 pool created at startup. Each operation
//! checks out a pooled connection for a single statement.

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDateTime;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection, OpenFlags};
use thiserror::Error;

use crate::config::DatabaseConfig;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database pool error: {0}")]
    Pool(#[from] r2d2::Error),
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// One persisted meditation session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub id: i64,
    pub mood: String,
    pub transcript: String,
    pub created_at: NaiveDateTime,
}

/// Storage location for the session database.
#[derive(Debug, Clone)]
enum DbLocation {
    File(PathBuf),
    Memory,
}

impl DbLocation {
    fn to_manager(&self) -> SqliteConnectionManager {
        match self {
            DbLocation::File(path) => {
                SqliteConnectionManager::file(path).with_flags(Self::open_flags())
            }
            DbLocation::Memory => SqliteConnectionManager::memory().with_flags(Self::open_flags()),
        }
    }

    fn open_flags() -> OpenFlags {
        OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_FULL_MUTEX
    }
}

/// Handle to the pooled session database. Cheap to clone.
#[derive(Clone)]
pub struct SessionStore {
    pool: Pool<SqliteConnectionManager>,
}

impl SessionStore {
    /// Open the file-backed store and run the schema bootstrap.
    ///
    /// Safe to call on every process start; the schema is created with
    /// `IF NOT EXISTS` and an existing database is left untouched.
    pub fn open(config: &DatabaseConfig) -> Result<Self, StoreError> {
        Self::bootstrap(
            DbLocation::File(config.path.clone()),
            config.pool_size,
            Duration::from_millis(config.busy_timeout_ms),
        )
    }

    /// Open a private in-memory store. Pool size is pinned to one so every
    /// checkout sees the same database.
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::bootstrap(DbLocation::Memory, 1, Duration::from_millis(250))
    }

    fn bootstrap(
        location: DbLocation,
        pool_size: u32,
        busy_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let manager = location
            .to_manager()
            .with_init(move |conn| Self::configure_connection(conn, busy_timeout));

        let pool = Pool::builder()
            .max_size(pool_size)
            .connection_timeout(Duration::from_secs(5))
            .build(manager)?;

        {
            let conn = pool.get()?;
            Self::run_migrations(&conn)?;
        }

        Ok(Self { pool })
    }

    fn configure_connection(conn: &mut Connection, busy_timeout: Duration) -> rusqlite::Result<()> {
        conn.busy_timeout(busy_timeout)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch("PRAGMA synchronous=NORMAL;")?;
        Ok(())
    }

    fn run_migrations(conn: &Connection) -> rusqlite::Result<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                mood TEXT NOT NULL,
                transcript TEXT NOT NULL,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            );
            "#,
        )
    }

    fn connection(&self) -> Result<PooledConnection<SqliteConnectionManager>, StoreError> {
        Ok(self.pool.get()?)
    }

    /// Insert one session record. `created_at` is assigned by the database.
    pub fn insert_session(&self, mood: &str, transcript: &str) -> Result<i64, StoreError> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO sessions (mood, transcript) VALUES (?1, ?2)",
            params![mood, transcript],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// The most recent sessions, newest first.
    ///
    /// `created_at` has one-second resolution, so `id` breaks ties between
    /// inserts that land in the same second.
    pub fn recent_sessions(&self, limit: usize) -> Result<Vec<SessionRecord>, StoreError> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT id, mood, transcript, created_at FROM sessions
             ORDER BY created_at DESC, id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(SessionRecord {
                id: row.get(0)?,
                mood: row.get(1)?,
                transcript: row.get(2)?,
                created_at: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Total number of stored sessions.
    pub fn session_count(&self) -> Result<i64, StoreError> {
        let conn = self.connection()?;
        Ok(conn.query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_creates_schema() {
        let store = SessionStore::in_memory().expect("bootstrap");
        assert_eq!(store.session_count().unwrap(), 0);
        assert!(store.recent_sessions(10).unwrap().is_empty());
    }

    #[test]
    fn migrations_are_idempotent() {
        let store = SessionStore::in_memory().expect("bootstrap");
        store.insert_session("calm", "Breathe in.").unwrap();

        let conn = store.connection().unwrap();
        SessionStore::run_migrations(&conn).expect("second run");
        drop(conn);

        // Existing rows survive a re-run.
        assert_eq!(store.session_count().unwrap(), 1);
    }

    #[test]
    fn insert_assigns_increasing_ids() {
        let store = SessionStore::in_memory().expect("bootstrap");
        let first = store.insert_session("calm", "Settle into your seat.").unwrap();
        let second = store.insert_session("anxious", "Notice your breath.").unwrap();
        assert!(second > first);
    }

    #[test]
    fn recent_sessions_returns_newest_first() {
        let store = SessionStore::in_memory().expect("bootstrap");
        // created_at has one-second resolution; the id tiebreaker keeps
        // back-to-back inserts ordered.
        store.insert_session("calm", "t1").unwrap();
        store.insert_session("stressed", "t2").unwrap();
        store.insert_session("anxious", "t3").unwrap();

        let records = store.recent_sessions(10).unwrap();
        let moods: Vec<&str> = records.iter().map(|r| r.mood.as_str()).collect();
        assert_eq!(moods, ["anxious", "stressed", "calm"]);
    }

    #[test]
    fn recent_sessions_honors_limit() {
        let store = SessionStore::in_memory().expect("bootstrap");
        for i in 0..12 {
            store.insert_session(&format!("mood-{i}"), "script").unwrap();
        }

        let records = store.recent_sessions(10).unwrap();
        assert_eq!(records.len(), 10);
        assert_eq!(records[0].mood, "mood-11");
        assert_eq!(records[9].mood, "mood-2");
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = DatabaseConfig {
            path: dir.path().join("sessions.db"),
            ..DatabaseConfig::default()
        };

        {
            let store = SessionStore::open(&config).expect("first open");
            store.insert_session("hopeful", "You are safe here.").unwrap();
        }

        let reopened = SessionStore::open(&config).expect("second open");
        let records = reopened.recent_sessions(10).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].mood, "hopeful");
        assert_eq!(records[0].transcript, "You are safe here.");
    }
}
