//! User document model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Field names of the `users/{userId}` document.
pub mod fields {
    pub const EMAIL: &str = "email";
    pub const DISPLAY_NAME: &str = "displayName";
    pub const PREFERENCES: &str = "preferences";
    pub const PREFERENCES_THEME: &str = "preferences.theme";
    pub const PREFERENCES_NOTIFICATIONS: &str = "preferences.notifications";
    pub const CREATED_AT: &str = "createdAt";
    pub const LAST_LOGIN: &str = "lastLogin";
}

/// Colour theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub enum Theme {
    Light,
    Dark,
}

/// Stored preferences. Fields are optional because merge writes may have
/// populated only one of them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub struct Preferences {
    #[serde(default)]
    pub theme: Option<Theme>,
    #[serde(default)]
    pub notifications: Option<bool>,
}

/// User profile as read back from Firestore (`users/{userId}`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub struct UserProfile {
    /// Document ID (the opaque user identifier)
    #[serde(alias = "_firestore_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Set by the server when the document is first created
    #[serde(default, with = "firestore::serialize_as_optional_timestamp")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string | null"))]
    pub created_at: Option<DateTime<Utc>>,
    /// Set by the server on every session start
    #[serde(default, with = "firestore::serialize_as_optional_timestamp")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string | null"))]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default)]
    pub preferences: Preferences,
}

/// Preference fields to write. `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferenceFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications: Option<bool>,
}

impl PreferenceFields {
    pub fn is_empty(&self) -> bool {
        self.theme.is_none() && self.notifications.is_none()
    }
}

/// Client-owned user fields passed to `upsert_user`.
///
/// Only the fields that are `Some` are serialized and listed in the
/// update mask, so a merge write leaves everything else untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100))]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "PreferenceFields::is_empty")]
    pub preferences: PreferenceFields,
}

impl UserFields {
    /// Top-level fields owned by the client; a non-merge write replaces all of them.
    pub const CLIENT_OWNED: [&'static str; 3] =
        [fields::EMAIL, fields::DISPLAY_NAME, fields::PREFERENCES];

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.preferences.theme = Some(theme);
        self
    }

    pub fn notifications(mut self, enabled: bool) -> Self {
        self.preferences.notifications = Some(enabled);
        self
    }

    /// Field paths present in this value, for a merge update mask.
    pub fn field_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        if self.email.is_some() {
            paths.push(fields::EMAIL.to_string());
        }
        if self.display_name.is_some() {
            paths.push(fields::DISPLAY_NAME.to_string());
        }
        if self.preferences.theme.is_some() {
            paths.push(fields::PREFERENCES_THEME.to_string());
        }
        if self.preferences.notifications.is_some() {
            paths.push(fields::PREFERENCES_NOTIFICATIONS.to_string());
        }
        paths
    }

    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.display_name.is_none() && self.preferences.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_paths_only_lists_present_fields() {
        let fields = UserFields::default().email("test@x.com").theme(Theme::Dark);
        assert_eq!(fields.field_paths(), vec!["email", "preferences.theme"]);

        let fields = UserFields::default().notifications(false);
        assert_eq!(fields.field_paths(), vec!["preferences.notifications"]);

        assert!(UserFields::default().field_paths().is_empty());
        assert!(UserFields::default().is_empty());
    }

    #[test]
    fn test_serialization_skips_unset_fields() {
        let fields = UserFields::default().display_name("T").theme(Theme::Dark);
        let json = serde_json::to_value(&fields).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "displayName": "T", "preferences": { "theme": "dark" } })
        );

        let json = serde_json::to_value(UserFields::default()).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn test_validation() {
        assert!(UserFields::default()
            .email("test@x.com")
            .display_name("T")
            .validate()
            .is_ok());
        assert!(UserFields::default().email("not-an-email").validate().is_err());
        assert!(UserFields::default().display_name("").validate().is_err());
        assert!(UserFields::default().validate().is_ok());
    }

    #[test]
    fn test_preferences_tolerate_partial_documents() {
        let prefs: Preferences = serde_json::from_str(r#"{"theme":"light"}"#).unwrap();
        assert_eq!(prefs.theme, Some(Theme::Light));
        assert_eq!(prefs.notifications, None);
    }
}
