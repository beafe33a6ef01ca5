//! HTTP API for users, assessments and uploads
//!
//! - GET  /                 - Welcome message
//! - GET  /health           - Health check
//! - POST /users/save       - Create-or-get a user by email
//! - GET  /users            - List all users
//! - GET  /assessments/all  - List the caller's assessments
//! - POST /assessments/save - Persist an assessment payload
//! - GET  /assessments/:id  - Fetch one assessment (owner only)
//! - DELETE /assessments/:id - Delete one assessment (owner only)
//! - GET  /upload           - Upload service status
//! - POST /upload           - Upload one answer video
//!
//! Identity is the x-user-email header, taken at face value.

mod error;
mod handlers;
mod routes;
mod state;

pub use error::{ApiError, ErrorResponse};
pub use routes::create_router;
pub use state::AppState;
