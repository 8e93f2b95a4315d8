//! Lectern API crate - axum HTTP server and route handlers.
//!
//! Exposes the two pipeline entrypoints (`POST /api/submit-link`,
//! `POST /api/chat`) plus a health check, and maps pipeline failures to
//! HTTP responses.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
