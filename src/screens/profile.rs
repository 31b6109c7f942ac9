// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile tab preference toggles.

use super::{Notice, Outcome};
use crate::db::DocumentStore;
use crate::error::AppError;
use crate::models::{Preferences, Theme, UserFields};

/// Toggle state for the profile tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreferencesForm {
    pub dark_mode: bool,
    pub notifications: bool,
}

impl Default for PreferencesForm {
    fn default() -> Self {
        Self {
            dark_mode: false,
            notifications: true,
        }
    }
}

impl PreferencesForm {
    /// Initial toggle state from stored preferences.
    pub fn from_stored(prefs: &Preferences) -> Self {
        let defaults = Self::default();
        Self {
            dark_mode: prefs.theme.map_or(defaults.dark_mode, |t| t == Theme::Dark),
            notifications: prefs.notifications.unwrap_or(defaults.notifications),
        }
    }

    pub fn to_fields(self) -> UserFields {
        let theme = if self.dark_mode { Theme::Dark } else { Theme::Light };
        UserFields::default()
            .theme(theme)
            .notifications(self.notifications)
    }

    /// Merge the toggles into the signed-in user's preferences.
    pub async fn submit(&self, store: &DocumentStore) -> Outcome {
        let Some(identity) = store.current_identity().await else {
            return Outcome::Stay(Notice::from(&AppError::Auth(
                "please sign in first".to_string(),
            )));
        };

        match store
            .upsert_user(&identity.user_id, &self.to_fields(), true)
            .await
        {
            Ok(()) => Outcome::Stay(Notice::new("Saved", "Your preferences were updated.")),
            Err(err) => Outcome::Stay(Notice::from(&err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_preferences() {
        let prefs = Preferences {
            theme: Some(Theme::Dark),
            notifications: None,
        };
        let form = PreferencesForm::from_stored(&prefs);
        assert!(form.dark_mode);
        assert!(form.notifications);

        let fields = form.to_fields();
        assert_eq!(
            fields.field_paths(),
            vec!["preferences.theme", "preferences.notifications"]
        );
    }
}
