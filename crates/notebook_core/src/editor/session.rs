//! Tree editor session over a subject store.
//!
//! # Responsibility
//! - Keep the local copy of the subject list that the user edits.
//! - Turn every edit into one whole-document replace followed by a refresh.
//!
//! # Invariants
//! - Blank labels are rejected before any store call.
//! - Deletes run only after the confirmation collaborator agrees.
//! - A failed refresh keeps the previous list.
//! - Last writer wins; there is no conflict detection.

use super::expansion::ExpansionState;
use super::mutation::{apply_edit, delete_node, normalize_label, rename_subject, EditError, TreeEdit};
use super::path::NodePath;
use crate::model::subject::{now_epoch_ms, Subject, SubjectId, SubjectInput};
use crate::repo::subject_repo::SubjectRepository;
use crate::search::filter::filter_subjects;
use crate::service::subject_service::{StoreError, StoreResult, SubjectService};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Whole-document store operations the editor depends on.
pub trait SubjectStore {
    fn list_subjects(&self) -> StoreResult<Vec<Subject>>;
    fn create_subject(&self, input: SubjectInput) -> StoreResult<Subject>;
    fn replace_subject(&self, id: SubjectId, input: SubjectInput) -> StoreResult<Subject>;
    fn delete_subject(&self, id: SubjectId) -> StoreResult<()>;
}

impl<R: SubjectRepository> SubjectStore for SubjectService<R> {
    fn list_subjects(&self) -> StoreResult<Vec<Subject>> {
        SubjectService::list_subjects(self)
    }

    fn create_subject(&self, input: SubjectInput) -> StoreResult<Subject> {
        SubjectService::create_subject(self, input)
    }

    fn replace_subject(&self, id: SubjectId, input: SubjectInput) -> StoreResult<Subject> {
        SubjectService::replace_subject(self, id, input)
    }

    fn delete_subject(&self, id: SubjectId) -> StoreResult<()> {
        SubjectService::delete_subject(self, id)
    }
}

/// Confirmation step required before destructive edits.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Whether a confirmed action actually ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Applied,
    Cancelled,
}

/// Errors from editor actions.
#[derive(Debug)]
pub enum EditorError {
    /// Rejected locally; no request was made.
    Edit(EditError),
    /// Subject is not in the local copy.
    UnknownSubject(SubjectId),
    /// Store call failed.
    Store(StoreError),
}

impl Display for EditorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Edit(err) => write!(f, "{err}"),
            Self::UnknownSubject(id) => write!(f, "subject not loaded: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EditorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Edit(err) => Some(err),
            Self::UnknownSubject(_) => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<EditError> for EditorError {
    fn from(value: EditError) -> Self {
        Self::Edit(value)
    }
}

impl From<StoreError> for EditorError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Client-side editing session.
pub struct TreeEditor<S: SubjectStore> {
    store: S,
    subjects: Vec<Subject>,
    expansion: ExpansionState,
}

impl<S: SubjectStore> TreeEditor<S> {
    /// Creates a session with an empty local copy. Call [`Self::refresh`]
    /// to load.
    pub fn new(store: S) -> Self {
        Self {
            store,
            subjects: Vec::new(),
            expansion: ExpansionState::new(),
        }
    }

    /// Creates a session and loads the current subject list.
    pub fn open(store: S) -> Self {
        let mut editor = Self::new(store);
        editor.refresh();
        editor
    }

    /// Local copy as of the last successful refresh.
    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn subject(&self, id: SubjectId) -> Option<&Subject> {
        self.subjects.iter().find(|subject| subject.id == id)
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    pub fn expansion_mut(&mut self) -> &mut ExpansionState {
        &mut self.expansion
    }

    /// Read-side projection of the local copy for a search query.
    pub fn visible_subjects(&self, query: &str) -> Vec<Subject> {
        filter_subjects(&self.subjects, query)
    }

    /// Reloads the local copy. Returns `false` and keeps the stale list when
    /// the store fails.
    pub fn refresh(&mut self) -> bool {
        match self.store.list_subjects() {
            Ok(subjects) => {
                self.expansion.retain_subjects(&subjects);
                self.subjects = subjects;
                true
            }
            Err(err) => {
                warn!(
                    "event=editor_refresh module=editor status=error error_code={} error={}",
                    err.code(),
                    err
                );
                false
            }
        }
    }

    /// Creates a subject with no topics.
    pub fn add_subject(&mut self, name: &str) -> Result<Subject, EditorError> {
        let name = normalize_label(name)?;
        let created = self.store.create_subject(SubjectInput::new(name))?;
        info!(
            "event=editor_edit module=editor status=ok action=add_subject subject_id={}",
            created.id
        );
        self.refresh();
        Ok(created)
    }

    pub fn rename_subject(&mut self, id: SubjectId, name: &str) -> Result<(), EditorError> {
        let mut subject = self.local_copy(id)?;
        rename_subject(&mut subject, name)?;
        self.persist(subject, "rename_subject")
    }

    /// Applies one non-destructive edit below the subject root.
    pub fn apply(&mut self, id: SubjectId, edit: &TreeEdit) -> Result<(), EditorError> {
        let mut subject = self.local_copy(id)?;
        apply_edit(&mut subject, edit, now_epoch_ms())?;
        self.persist(subject, edit.name())
    }

    /// Deletes a whole subject after confirmation.
    pub fn delete_subject(
        &mut self,
        id: SubjectId,
        confirm: &impl Confirm,
    ) -> Result<EditOutcome, EditorError> {
        if !confirm.confirm("Delete this subject?") {
            return Ok(EditOutcome::Cancelled);
        }
        self.store.delete_subject(id)?;
        info!(
            "event=editor_edit module=editor status=ok action=delete_subject subject_id={id}"
        );
        self.refresh();
        Ok(EditOutcome::Applied)
    }

    /// Deletes the node at `path` after confirmation.
    pub fn delete_node(
        &mut self,
        id: SubjectId,
        path: NodePath,
        confirm: &impl Confirm,
    ) -> Result<EditOutcome, EditorError> {
        let mut subject = self.local_copy(id)?;
        if !confirm.confirm(&format!("Delete this {}?", path.kind_label())) {
            return Ok(EditOutcome::Cancelled);
        }
        delete_node(&mut subject, path)?;
        self.persist(subject, "delete_node")?;
        Ok(EditOutcome::Applied)
    }

    fn local_copy(&self, id: SubjectId) -> Result<Subject, EditorError> {
        self.subject(id)
            .cloned()
            .ok_or(EditorError::UnknownSubject(id))
    }

    fn persist(&mut self, subject: Subject, action: &str) -> Result<(), EditorError> {
        let id = subject.id;
        if let Err(err) = self.store.replace_subject(id, SubjectInput::from(subject)) {
            warn!(
                "event=editor_edit module=editor status=error action={} subject_id={} error_code={}",
                action,
                id,
                err.code()
            );
            return Err(err.into());
        }
        info!("event=editor_edit module=editor status=ok action={action} subject_id={id}");
        self.refresh();
        Ok(())
    }
}
