//! Core business logic for studyhub.

pub mod authz;
pub mod services;

pub use services::*;
