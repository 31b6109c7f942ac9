// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Screen form state and submit handlers.
//!
//! Rendering is out of scope; each screen only holds its form fields and
//! turns a submit into an [`Outcome`]. Failures never redirect: the user
//! stays on the screen and sees a notice.

pub mod journal;
pub mod login;
pub mod onboarding;
pub mod profile;

pub use journal::JournalForm;
pub use login::{ForgotPasswordForm, LoginForm};
pub use onboarding::{QuizForm, WelcomeScreen};
pub use profile::PreferencesForm;

use crate::error::AppError;
use crate::navigation::Route;

/// Local notification (an alert dialog in the app).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

impl From<&AppError> for Notice {
    fn from(err: &AppError) -> Self {
        tracing::warn!(code = err.code(), error = %err, "Screen action failed");
        Notice::new("Error", err.user_message())
    }
}

/// Result of submitting a screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Stay on the current screen and show a notice.
    Stay(Notice),
    /// Move to another screen, optionally with a notice.
    Navigate { to: Route, notice: Option<Notice> },
}

impl Outcome {
    pub fn navigate(to: Route) -> Self {
        Outcome::Navigate { to, notice: None }
    }

    pub fn destination(&self) -> Option<Route> {
        match self {
            Outcome::Navigate { to, .. } => Some(*to),
            Outcome::Stay(_) => None,
        }
    }
}

/// Check that every labelled field has non-blank content.
///
/// Returns a notice naming the first empty field.
pub(crate) fn require_filled(fields: &[(&str, &str)]) -> Result<(), Notice> {
    match fields.iter().find(|(_, value)| value.trim().is_empty()) {
        Some((label, _)) => Err(Notice::new(
            "Missing information",
            format!("Please enter your {}.", label),
        )),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_filled_names_first_blank_field() {
        let err = require_filled(&[("email", "a@b.c"), ("password", "  "), ("name", "")])
            .unwrap_err();
        assert_eq!(err.message, "Please enter your password.");
        assert!(require_filled(&[("email", "a@b.c")]).is_ok());
    }

    #[test]
    fn test_notice_from_error_uses_user_message() {
        let notice = Notice::from(&AppError::Write("deadline exceeded".to_string()));
        assert_eq!(notice.title, "Error");
        assert!(!notice.message.contains("deadline"));
    }
}
