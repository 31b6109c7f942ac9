// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types shared by the store client, screens and CLI.

use crate::config::ConfigError;

/// Application error type.
///
/// None of these are retried automatically; they surface to the nearest
/// caller, which either shows a notice (screens) or logs and exits (CLI).
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Write failed: {0}")]
    Write(String),

    #[error("Read failed: {0}")]
    Read(String),
}

impl AppError {
    /// Stable machine-readable code for logs.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "config_error",
            AppError::Auth(_) => "auth_error",
            AppError::Write(_) => "write_error",
            AppError::Read(_) => "read_error",
        }
    }

    /// Short message suitable for an in-app notice.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(_) => "The app is not configured correctly.".to_string(),
            AppError::Auth(reason) => format!("Sign-in failed: {}", reason),
            AppError::Write(_) => "Your changes could not be saved. Please try again.".to_string(),
            AppError::Read(_) => "Your data could not be loaded. Please try again.".to_string(),
        }
    }

    /// Build a write error from failed field validation.
    pub fn invalid_write(errors: validator::ValidationErrors) -> Self {
        AppError::Write(format!("validation failed: {}", errors))
    }
}

/// Result type alias for store and screen operations
pub type Result<T> = std::result::Result<T, AppError>;
