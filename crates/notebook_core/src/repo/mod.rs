//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define whole-document data access contracts for subjects.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `Subject::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod subject_repo;
