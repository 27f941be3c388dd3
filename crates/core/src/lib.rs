//! Core business logic for formhub.

pub mod services;

pub use services::*;
