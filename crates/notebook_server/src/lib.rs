//! HTTP surface for the notebook subject store.
//!
//! # Endpoints
//!
//! - `GET /` - Welcome banner
//! - `GET /health` - Health check
//! - `GET|POST /api/subjects` - List and create subjects
//! - `PUT|DELETE /api/subjects/:id` - Replace and delete one subject

pub mod client;
pub mod config;
pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use client::HttpSubjectStore;
pub use config::ServerConfig;
pub use error::ApiError;
pub use server::NotebookServer;
pub use state::AppState;
