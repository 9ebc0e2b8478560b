//! Subject repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide whole-document CRUD over the `subjects` table.
//! - Keep SQL and JSON document encoding inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `Subject::validate()` before SQL mutations.
//! - Listing order is storage order (`seq ASC`); replace keeps `seq`.
//! - Read paths reject undecodable documents instead of masking them.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::subject::{Subject, SubjectId, SubjectValidationError, Topic};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const SUBJECT_SELECT_SQL: &str = "SELECT uuid, name, document FROM subjects";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for subject persistence.
#[derive(Debug)]
pub enum RepoError {
    Validation(SubjectValidationError),
    Db(DbError),
    NotFound(SubjectId),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "subject not found: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "subject repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted subject data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::UninitializedConnection { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<SubjectValidationError> for RepoError {
    fn from(value: SubjectValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for whole-document subject persistence.
pub trait SubjectRepository {
    /// Returns every subject, full depth, in storage order.
    fn list_subjects(&self) -> RepoResult<Vec<Subject>>;
    /// Loads one subject by id.
    fn get_subject(&self, id: SubjectId) -> RepoResult<Option<Subject>>;
    /// Persists a new subject under its own id.
    fn insert_subject(&self, subject: &Subject) -> RepoResult<()>;
    /// Overwrites the stored document with the same id.
    fn replace_subject(&self, subject: &Subject) -> RepoResult<()>;
    /// Removes one subject and its whole tree.
    fn delete_subject(&self, id: SubjectId) -> RepoResult<()>;
}

/// SQLite-backed subject repository.
pub struct SqliteSubjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSubjectRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_user_version(conn)?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }
}

impl SubjectRepository for SqliteSubjectRepository<'_> {
    fn list_subjects(&self) -> RepoResult<Vec<Subject>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SUBJECT_SELECT_SQL} ORDER BY seq ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut subjects = Vec::new();

        while let Some(row) = rows.next()? {
            subjects.push(parse_subject_row(row)?);
        }

        Ok(subjects)
    }

    fn get_subject(&self, id: SubjectId) -> RepoResult<Option<Subject>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SUBJECT_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_subject_row(row)?));
        }

        Ok(None)
    }

    fn insert_subject(&self, subject: &Subject) -> RepoResult<()> {
        subject.validate()?;
        let document = encode_topics(&subject.topics)?;

        self.conn.execute(
            "INSERT INTO subjects (uuid, name, document) VALUES (?1, ?2, ?3);",
            params![subject.id.to_string(), subject.name.as_str(), document],
        )?;

        Ok(())
    }

    fn replace_subject(&self, subject: &Subject) -> RepoResult<()> {
        subject.validate()?;
        let document = encode_topics(&subject.topics)?;

        let changed = self.conn.execute(
            "UPDATE subjects
             SET
                name = ?1,
                document = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?3;",
            params![subject.name.as_str(), document, subject.id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(subject.id));
        }

        Ok(())
    }

    fn delete_subject(&self, id: SubjectId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM subjects WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn encode_topics(topics: &[Topic]) -> RepoResult<String> {
    serde_json::to_string(topics)
        .map_err(|err| RepoError::InvalidData(format!("cannot encode subject document: {err}")))
}

fn parse_subject_row(row: &Row<'_>) -> RepoResult<Subject> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in subjects.uuid"))
    })?;

    let document: String = row.get("document")?;
    let topics: Vec<Topic> = serde_json::from_str(&document).map_err(|err| {
        RepoError::InvalidData(format!("undecodable document for subject {id}: {err}"))
    })?;

    Ok(Subject {
        id,
        name: row.get("name")?,
        topics,
    })
}
