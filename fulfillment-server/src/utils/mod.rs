//! Utility module
//!
//! # Contents
//!
//! - [`AppError`] / [`ApiResponse`] - unified error and response types (from shared::error)
//! - Logging setup

pub mod logger;

// Re-export error types from shared so handlers import from one place
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
