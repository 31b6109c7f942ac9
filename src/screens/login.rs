// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login and forgot-password screens.

use super::{require_filled, Notice, Outcome};
use crate::db::DocumentStore;
use crate::error::Result;
use crate::models::UserFields;
use crate::navigation::Route;
use crate::services::identity::UserIdentity;

/// Email/password login form.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// Sign in and go to the home tab. Failures keep the user here.
    pub async fn submit(&self, store: &DocumentStore) -> Outcome {
        let required = [
            ("email", self.email.as_str()),
            ("password", self.password.as_str()),
        ];
        if let Err(notice) = require_filled(&required) {
            return Outcome::Stay(notice);
        }

        let email = self.email.trim();
        let result = async {
            let identity = store.sign_in_with_password(email, self.password.as_str()).await?;
            start_session(store, &identity, Some(email)).await
        }
        .await;

        match result {
            Ok(()) => Outcome::navigate(Route::Home),
            Err(err) => Outcome::Stay(Notice::from(&err)),
        }
    }

    /// Skip credentials and use an anonymous session.
    pub async fn continue_anonymously(store: &DocumentStore) -> Outcome {
        let result = async {
            let identity = store.authenticate_anonymously().await?;
            start_session(store, &identity, None).await
        }
        .await;

        match result {
            Ok(()) => Outcome::navigate(Route::Home),
            Err(err) => Outcome::Stay(Notice::from(&err)),
        }
    }
}

/// Session start bookkeeping: stamp `lastLogin`, then merge the email (if
/// any). The merge always runs so a first login also gets `createdAt`.
async fn start_session(
    store: &DocumentStore,
    identity: &UserIdentity,
    email: Option<&str>,
) -> Result<()> {
    store.record_login(&identity.user_id).await?;

    let fields = match email {
        Some(email) => UserFields::default().email(email),
        None => UserFields::default(),
    };
    store.upsert_user(&identity.user_id, &fields, true).await
}

/// Password reset request form.
#[derive(Debug, Clone, Default)]
pub struct ForgotPasswordForm {
    pub email: String,
}

impl ForgotPasswordForm {
    /// Send the reset email and return to the login screen.
    pub async fn submit(&self, store: &DocumentStore) -> Outcome {
        if let Err(notice) = require_filled(&[("email", self.email.as_str())]) {
            return Outcome::Stay(notice);
        }

        match store.send_password_reset(self.email.trim()).await {
            Ok(()) => Outcome::Navigate {
                to: Route::Login,
                notice: Some(Notice::new(
                    "Check your email",
                    "If an account exists for that address, a reset link is on its way.",
                )),
            },
            Err(err) => Outcome::Stay(Notice::from(&err)),
        }
    }
}
