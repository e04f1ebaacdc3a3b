//! Shared errors and configuration for Fintrack.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error types with CLI exit codes
//! - Configuration management

pub mod config;
pub mod error;

pub use config::{AppConfig, redact_url};
pub use error::{AppError, AppResult};
