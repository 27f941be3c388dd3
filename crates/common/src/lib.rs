//! Common utilities and shared types for formhub.
//!
//! This crate provides foundational components used across all formhub crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **Passwords**: Argon2 hashing via [`hash_password`] and [`verify_password`]

pub mod config;
pub mod error;
pub mod password;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use password::{hash_password, verify_password};
