// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firebase Authentication REST client.
//!
//! Handles:
//! - Anonymous sign-up
//! - Email/password sign-in
//! - Password reset emails
//! - ID token refresh (same user ID, new token)

use crate::config::Config;
use crate::error::AppError;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::Deserialize;
use std::time::Duration;

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";
const SECURE_TOKEN_URL: &str = "https://securetoken.googleapis.com/v1";
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);
/// Refresh ID tokens this long before they actually expire.
const REFRESH_MARGIN_SECS: i64 = 300;

/// Identity of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    /// Opaque, stable user ID (document ID under `users/`)
    pub user_id: String,
    pub email: Option<String>,
    pub is_anonymous: bool,
}

/// Signed-in session with its tokens.
#[derive(Clone)]
pub struct AuthSession {
    pub user_id: String,
    pub email: Option<String>,
    pub is_anonymous: bool,
    pub expires_at: DateTime<Utc>,
    id_token: String,
    refresh_token: String,
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("is_anonymous", &self.is_anonymous)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

impl AuthSession {
    pub fn identity(&self) -> UserIdentity {
        UserIdentity {
            user_id: self.user_id.clone(),
            email: self.email.clone(),
            is_anonymous: self.is_anonymous,
        }
    }

    /// Bearer token for Firestore requests.
    pub fn id_token(&self) -> &str {
        &self.id_token
    }

    /// Whether the ID token expires within the refresh margin.
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        now + ChronoDuration::seconds(REFRESH_MARGIN_SECS) >= self.expires_at
    }
}

#[derive(Clone)]
struct Endpoints {
    identity_toolkit: String,
    secure_token: String,
}

impl Endpoints {
    fn for_config(config: &Config) -> Self {
        match &config.auth_emulator_host {
            Some(host) => Self {
                identity_toolkit: format!("http://{}/identitytoolkit.googleapis.com/v1", host),
                secure_token: format!("http://{}/securetoken.googleapis.com/v1", host),
            },
            None => Self {
                identity_toolkit: IDENTITY_TOOLKIT_URL.to_string(),
                secure_token: SECURE_TOKEN_URL.to_string(),
            },
        }
    }
}

/// Firebase Authentication client.
#[derive(Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    api_key: String,
    endpoints: Option<Endpoints>,
}

impl IdentityClient {
    /// Create a client for the configured project (or the auth emulator).
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| AppError::Auth(format!("failed building HTTP client: {}", e)))?;

        if let Some(host) = &config.auth_emulator_host {
            tracing::info!(host = %host, "Using Firebase Auth emulator");
        }

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            endpoints: Some(Endpoints::for_config(config)),
        })
    }

    /// Create a client that fails every call (offline mode, for tests).
    pub fn offline() -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: String::new(),
            endpoints: None,
        }
    }

    fn endpoints(&self) -> Result<&Endpoints, AppError> {
        self.endpoints
            .as_ref()
            .ok_or_else(|| AppError::Auth("auth service not connected (offline mode)".to_string()))
    }

    /// Start an anonymous session.
    pub async fn sign_up_anonymously(&self) -> Result<AuthSession, AppError> {
        let url = format!("{}/accounts:signUp", self.endpoints()?.identity_toolkit);
        let body = serde_json::json!({ "returnSecureToken": true });

        let response: SignInResponse = self.post_json(&url, &body).await?;
        let session = response.into_session(true)?;
        tracing::info!(user_id = %session.user_id, "Anonymous session started");
        Ok(session)
    }

    /// Sign in with email and password.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AppError> {
        let url = format!(
            "{}/accounts:signInWithPassword",
            self.endpoints()?.identity_toolkit
        );
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });

        let response: SignInResponse = self.post_json(&url, &body).await?;
        let session = response.into_session(false)?;
        tracing::info!(user_id = %session.user_id, "Password sign-in succeeded");
        Ok(session)
    }

    /// Ask the auth service to send a password reset email.
    pub async fn send_password_reset(&self, email: &str) -> Result<(), AppError> {
        let url = format!("{}/accounts:sendOobCode", self.endpoints()?.identity_toolkit);
        let body = serde_json::json!({
            "requestType": "PASSWORD_RESET",
            "email": email,
        });

        let _: serde_json::Value = self.post_json(&url, &body).await?;
        tracing::info!("Password reset email requested");
        Ok(())
    }

    /// Exchange the refresh token for a new ID token.
    pub async fn refresh(&self, session: &AuthSession) -> Result<AuthSession, AppError> {
        let url = format!("{}/token", self.endpoints()?.secure_token);

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", session.refresh_token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::Auth(format!("token refresh request failed: {}", e)))?;

        let refreshed: RefreshResponse = check_response_json(response).await?;
        if refreshed.user_id != session.user_id {
            return Err(AppError::Auth(
                "token refresh returned a different user".to_string(),
            ));
        }

        tracing::debug!(user_id = %session.user_id, "ID token refreshed");
        Ok(AuthSession {
            user_id: refreshed.user_id,
            email: session.email.clone(),
            is_anonymous: session.is_anonymous,
            expires_at: expiry_from_now(&refreshed.expires_in)?,
            id_token: refreshed.id_token,
            refresh_token: refreshed.refresh_token,
        })
    }

    async fn post_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<T, AppError> {
        let response = self
            .http
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Auth(format!("auth request failed: {}", e)))?;

        check_response_json(response).await
    }
}

/// Check response status and parse the JSON body.
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, AppError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let code = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| format!("HTTP {}", status));

        tracing::warn!(status = status.as_u16(), code = %code, "Auth service rejected request");
        return Err(AppError::Auth(describe_auth_error(&code)));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::Auth(format!("JSON parse error: {}", e)))
}

/// Turn an auth service error code into a readable reason.
///
/// Codes sometimes carry a detail suffix (`TOO_MANY_ATTEMPTS_TRY_LATER : ...`).
pub fn describe_auth_error(code: &str) -> String {
    let code = code.split(" : ").next().unwrap_or(code).trim();
    match code {
        "OPERATION_NOT_ALLOWED" | "ADMIN_ONLY_OPERATION" => {
            "this sign-in method is disabled for the project".to_string()
        }
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
            "incorrect email or password".to_string()
        }
        "INVALID_EMAIL" | "MISSING_EMAIL" => "invalid email address".to_string(),
        "USER_DISABLED" => "this account has been disabled".to_string(),
        "TOO_MANY_ATTEMPTS_TRY_LATER" => "too many attempts, try again later".to_string(),
        "TOKEN_EXPIRED" | "INVALID_REFRESH_TOKEN" | "USER_NOT_FOUND" => {
            "session expired, please sign in again".to_string()
        }
        other => other.to_string(),
    }
}

fn expiry_from_now(expires_in: &str) -> Result<DateTime<Utc>, AppError> {
    let secs: i64 = expires_in
        .trim()
        .parse()
        .map_err(|_| AppError::Auth(format!("invalid token lifetime '{}'", expires_in)))?;
    Ok(Utc::now() + ChronoDuration::seconds(secs))
}

/// Response of `accounts:signUp` and `accounts:signInWithPassword`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    id_token: String,
    refresh_token: String,
    expires_in: String,
    local_id: String,
    #[serde(default)]
    email: Option<String>,
}

impl SignInResponse {
    fn into_session(self, is_anonymous: bool) -> Result<AuthSession, AppError> {
        Ok(AuthSession {
            expires_at: expiry_from_now(&self.expires_in)?,
            user_id: self.local_id,
            email: self.email.filter(|e| !e.is_empty()),
            is_anonymous,
            id_token: self.id_token,
            refresh_token: self.refresh_token,
        })
    }
}

/// Response of the secure token endpoint (snake_case, unlike the rest).
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    expires_in: String,
    user_id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}
