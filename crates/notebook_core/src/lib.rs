//! Core domain logic for the notebook.
//! This crate is the single source of truth for subject tree invariants.

pub mod db;
pub mod editor;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use editor::expansion::{ExpansionKey, ExpansionState, Level};
pub use editor::mutation::{label_at, EditError, TreeEdit};
pub use editor::outline::render_outline;
pub use editor::path::{DetailParent, NodePath, PathParseError};
pub use editor::session::{Confirm, EditOutcome, EditorError, SubjectStore, TreeEditor};
pub use logging::{default_log_level, init_logging, init_stderr_logging, logging_status, LogTarget};
pub use model::subject::{
    Category, Detail, SubCategory, Subject, SubjectId, SubjectInput, SubjectValidationError, Topic,
};
pub use repo::subject_repo::{RepoError, RepoResult, SqliteSubjectRepository, SubjectRepository};
pub use search::filter::filter_subjects;
pub use service::subject_service::{StoreError, StoreResult, SubjectService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
