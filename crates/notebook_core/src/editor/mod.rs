//! Client-side tree editing.
//!
//! # Responsibility
//! - Address nodes below a subject by structured index paths.
//! - Apply add/rename/delete edits to an owned copy of one subject.
//! - Persist each edit as a whole-document replace through [`SubjectStore`].
//! - Track display-only expansion flags and render text outlines.
//!
//! # Invariants
//! - Descendant nodes have no identity; paths are positional and only valid
//!   against the tree they were read from.

pub mod expansion;
pub mod mutation;
pub mod outline;
pub mod path;
pub mod session;

pub use session::SubjectStore;
