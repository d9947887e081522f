//! HTTP API layer for studyhub.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: questions, comments, reports, courses, users, dashboards
//! - **Extractors**: bearer-authenticated user
//! - **Middleware**: token resolution into request extensions
//!
//! Built on Axum 0.8; responses are plain JSON bodies and errors are
//! `{"error": message}` with the matching status code.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
