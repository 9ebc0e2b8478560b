//! Read-side search projection.
//!
//! # Responsibility
//! - Narrow a loaded subject list by a free-text query for display.
//! - Never touch storage.

pub mod filter;
