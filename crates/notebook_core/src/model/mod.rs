//! Domain model for the subject note tree.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep one nested document shape per subject for storage and transport.
//!
//! # Invariants
//! - Every subject is identified by a stable `SubjectId`.
//! - Deletion is a hard delete of the whole aggregate.

pub mod subject;
