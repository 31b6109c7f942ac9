// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Journal (dream) entry form.

use super::{require_filled, Notice, Outcome};
use crate::db::DocumentStore;
use crate::error::AppError;
use crate::models::{NewJournalEntry, SleepQuality};
use crate::navigation::Route;
use std::collections::BTreeSet;

/// Form state for a new journal entry.
#[derive(Debug, Clone, Default)]
pub struct JournalForm {
    pub title: String,
    pub description: String,
    pub mood: String,
    pub sleep_quality: Option<SleepQuality>,
    /// Comma-separated, as typed
    pub tags: String,
}

impl JournalForm {
    /// Split the typed tags into a set, dropping blanks.
    pub fn parsed_tags(&self) -> BTreeSet<String> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect()
    }

    /// Build the entry, or a notice describing what is missing.
    pub fn to_entry(&self) -> Result<NewJournalEntry, Notice> {
        require_filled(&[("title", self.title.as_str()), ("mood", self.mood.as_str())])?;
        let sleep_quality = self.sleep_quality.ok_or_else(|| {
            Notice::new("Missing information", "Please choose how you slept.")
        })?;

        Ok(NewJournalEntry::new(self.title.trim(), self.mood.trim(), sleep_quality)
            .description(self.description.trim())
            .tags(self.parsed_tags()))
    }

    /// Save the entry for the signed-in user and show the journal tab.
    pub async fn submit(&self, store: &DocumentStore) -> Outcome {
        let entry = match self.to_entry() {
            Ok(entry) => entry,
            Err(notice) => return Outcome::Stay(notice),
        };

        let Some(identity) = store.current_identity().await else {
            return Outcome::Stay(Notice::from(&AppError::Auth(
                "please sign in first".to_string(),
            )));
        };

        match store.add_journal_entry(&identity.user_id, &entry).await {
            Ok(_) => Outcome::Navigate {
                to: Route::Journal,
                notice: Some(Notice::new("Saved", "Your entry was added to your journal.")),
            },
            Err(err) => Outcome::Stay(Notice::from(&err)),
        }
    }
}
