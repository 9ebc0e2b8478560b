//! Subject store use-case service.
//!
//! # Responsibility
//! - Expose list/create/replace/delete over whole subject documents.
//! - Assign identities and detail timestamps before persistence.
//! - Collapse repository failures into the store error taxonomy.
//!
//! # Invariants
//! - Replace is a full overwrite, never a merge.
//! - The caller-supplied id wins over anything carried in the payload.
//! - Log lines carry ids and node counts only, never note text.

use crate::model::subject::{now_epoch_ms, Subject, SubjectId, SubjectInput, SubjectValidationError};
use crate::repo::subject_repo::{RepoError, SubjectRepository};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Result type for store use-cases.
pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level error taxonomy surfaced to callers.
#[derive(Debug)]
pub enum StoreError {
    /// Payload is malformed or violates subject invariants.
    Validation(SubjectValidationError),
    /// Identifier does not name a stored subject.
    NotFound(SubjectId),
    /// Underlying persistence failure.
    Storage(RepoError),
    /// A remote store could not be reached or failed server-side.
    Remote(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "subject not found: {id}"),
            Self::Storage(err) => write!(f, "storage failure: {err}"),
            Self::Remote(message) => write!(f, "remote store failure: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Storage(err) => Some(err),
            Self::Remote(_) => None,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Storage(other),
        }
    }
}

impl From<SubjectValidationError> for StoreError {
    fn from(value: SubjectValidationError) -> Self {
        Self::Validation(value)
    }
}

impl StoreError {
    /// Short stable code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::Storage(_) => "storage",
            Self::Remote(_) => "remote",
        }
    }
}

/// Use-case service over one subject repository.
pub struct SubjectService<R: SubjectRepository> {
    repo: R,
}

impl<R: SubjectRepository> SubjectService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns all subjects, full depth, in storage order.
    pub fn list_subjects(&self) -> StoreResult<Vec<Subject>> {
        let result = self.repo.list_subjects().map_err(StoreError::from);
        match &result {
            Ok(subjects) => info!(
                "event=subject_list module=store status=ok count={}",
                subjects.len()
            ),
            Err(err) => log_failure("subject_list", None, err),
        }
        result
    }

    /// Loads one subject by id.
    pub fn get_subject(&self, id: SubjectId) -> StoreResult<Subject> {
        self.repo
            .get_subject(id)?
            .ok_or(StoreError::NotFound(id))
    }

    /// Creates a subject from `input` under a freshly generated id.
    ///
    /// # Contract
    /// - Missing detail timestamps are stamped with the current time.
    /// - Returns the stored form.
    pub fn create_subject(&self, input: SubjectInput) -> StoreResult<Subject> {
        let mut subject = input.into_subject(Uuid::new_v4());
        subject.stamp_details(now_epoch_ms());

        let result = self
            .repo
            .insert_subject(&subject)
            .map_err(StoreError::from)
            .and_then(|()| self.get_subject(subject.id));
        log_write("subject_create", subject.id, &result);
        result
    }

    /// Overwrites the subject at `id` with `input` and returns the new form.
    ///
    /// Validation runs before the existence check, so a malformed payload
    /// aimed at an unknown id reports `Validation`.
    pub fn replace_subject(&self, id: SubjectId, input: SubjectInput) -> StoreResult<Subject> {
        let mut subject = input.into_subject(id);
        subject.stamp_details(now_epoch_ms());

        let result = subject
            .validate()
            .map_err(StoreError::from)
            .and_then(|()| self.repo.replace_subject(&subject).map_err(StoreError::from))
            .and_then(|()| self.get_subject(id));
        log_write("subject_replace", id, &result);
        result
    }

    /// Deletes the subject at `id` together with its whole tree.
    pub fn delete_subject(&self, id: SubjectId) -> StoreResult<()> {
        let result = self.repo.delete_subject(id).map_err(StoreError::from);
        match &result {
            Ok(()) => info!("event=subject_delete module=store status=ok subject_id={id}"),
            Err(err) => log_failure("subject_delete", Some(id), err),
        }
        result
    }
}

fn log_write(event: &str, id: SubjectId, result: &StoreResult<Subject>) {
    match result {
        Ok(subject) => {
            let counts = subject.node_counts();
            info!(
                "event={} module=store status=ok subject_id={} topics={} categories={} sub_categories={} details={}",
                event,
                id,
                counts.topics,
                counts.categories,
                counts.sub_categories,
                counts.details
            );
        }
        Err(err) => log_failure(event, Some(id), err),
    }
}

fn log_failure(event: &str, id: Option<SubjectId>, err: &StoreError) {
    let subject_id = id.map_or_else(|| "-".to_string(), |id| id.to_string());
    warn!(
        "event={} module=store status=error subject_id={} error_code={} error={}",
        event,
        subject_id,
        err.code(),
        err
    );
}
