//! Shared handler state.
//!
//! SQLite access is synchronous, so every store call runs on the blocking
//! pool behind a single connection mutex. Requests are serialized; writers
//! never interleave.

use crate::error::ApiError;
use notebook_core::db::{open_db, open_db_in_memory, DbResult};
use notebook_core::{SqliteSubjectRepository, StoreError, StoreResult, SubjectService};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Store service bound to one borrowed connection.
pub type ConnService<'conn> = SubjectService<SqliteSubjectRepository<'conn>>;

#[derive(Clone)]
pub struct AppState {
    conn: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Wraps an already migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Opens (and migrates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    pub fn in_memory() -> DbResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    /// Runs one store operation on the blocking pool.
    pub async fn with_store<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&ConnService<'_>) -> StoreResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| ApiError::Internal("connection mutex poisoned".to_string()))?;
            let repo = SqliteSubjectRepository::try_new(&guard).map_err(StoreError::from)?;
            let service = SubjectService::new(repo);
            op(&service).map_err(ApiError::from)
        })
        .await
        .map_err(|err| ApiError::Internal(format!("store task failed: {err}")))?
    }
}
