// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Journal entry model for storage and display.
//!
//! Entries live at `users/{userId}/journalEntries/{entryId}`.

use crate::time_utils::local_display_date;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::{Validate, ValidationError};

pub const MAX_TITLE_CHARS: u64 = 200;
pub const MAX_DESCRIPTION_CHARS: u64 = 10_000;
pub const MAX_MOOD_CHARS: u64 = 16;
pub const MAX_TAG_CHARS: usize = 50;

/// Field names of a journal entry document.
pub mod fields {
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const MOOD: &str = "mood";
    pub const SLEEP_QUALITY: &str = "sleepQuality";
    pub const TAGS: &str = "tags";
    pub const DATE: &str = "date";
    pub const ENTRY_DATE: &str = "entryDate";
    pub const USER_ID: &str = "userId";
    pub const CREATED_AT: &str = "createdAt";
    pub const UPDATED_AT: &str = "updatedAt";
}

/// Self-reported sleep quality. Stored as the variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub enum SleepQuality {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl SleepQuality {
    pub const ALL: [SleepQuality; 4] = [
        SleepQuality::Poor,
        SleepQuality::Fair,
        SleepQuality::Good,
        SleepQuality::Excellent,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SleepQuality::Poor => "Poor",
            SleepQuality::Fair => "Fair",
            SleepQuality::Good => "Good",
            SleepQuality::Excellent => "Excellent",
        }
    }
}

impl std::fmt::Display for SleepQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SleepQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SleepQuality::ALL
            .into_iter()
            .find(|q| q.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown sleep quality '{}'", s))
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn valid_tags(tags: &BTreeSet<String>) -> Result<(), ValidationError> {
    for tag in tags {
        if tag.trim().is_empty() {
            return Err(ValidationError::new("blank_tag"));
        }
        if tag.chars().count() > MAX_TAG_CHARS {
            return Err(ValidationError::new("tag_too_long"));
        }
    }
    Ok(())
}

/// A journal entry to be created. Owner and server timestamps are
/// filled in by the store.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct NewJournalEntry {
    #[validate(length(max = MAX_TITLE_CHARS), custom(function = not_blank))]
    pub title: String,
    #[validate(length(max = MAX_DESCRIPTION_CHARS))]
    pub description: String,
    #[validate(length(max = MAX_MOOD_CHARS), custom(function = not_blank))]
    pub mood: String,
    pub sleep_quality: SleepQuality,
    #[validate(custom(function = valid_tags))]
    pub tags: BTreeSet<String>,
    /// Display date on the device's calendar, e.g. `October 16, 2026`
    #[validate(custom(function = not_blank))]
    pub date: String,
    /// Canonical sortable timestamp for `date`
    pub entry_date: DateTime<Utc>,
}

impl NewJournalEntry {
    /// New entry dated now, with no description or tags.
    pub fn new(
        title: impl Into<String>,
        mood: impl Into<String>,
        sleep_quality: SleepQuality,
    ) -> Self {
        let now = Utc::now();
        Self {
            title: title.into(),
            description: String::new(),
            mood: mood.into(),
            sleep_quality,
            tags: BTreeSet::new(),
            date: local_display_date(now),
            entry_date: now,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Date the entry, keeping the display string and timestamp in step.
    pub fn dated(mut self, when: DateTime<Utc>) -> Self {
        self.date = local_display_date(when);
        self.entry_date = when;
        self
    }
}

/// Serialized form of a new entry. `createdAt`/`updatedAt` are absent on
/// purpose: they are applied as server transforms.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JournalEntryDocument<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub mood: &'a str,
    pub sleep_quality: SleepQuality,
    pub tags: &'a BTreeSet<String>,
    pub date: &'a str,
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub entry_date: DateTime<Utc>,
    pub user_id: &'a str,
}

impl<'a> JournalEntryDocument<'a> {
    pub(crate) fn new(user_id: &'a str, entry: &'a NewJournalEntry) -> Self {
        Self {
            title: &entry.title,
            description: &entry.description,
            mood: &entry.mood,
            sleep_quality: entry.sleep_quality,
            tags: &entry.tags,
            date: &entry.date,
            entry_date: entry.entry_date,
            user_id,
        }
    }
}

/// Partial update of an existing entry. `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = MAX_TITLE_CHARS), custom(function = not_blank))]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = MAX_DESCRIPTION_CHARS))]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = MAX_MOOD_CHARS), custom(function = not_blank))]
    pub mood: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_quality: Option<SleepQuality>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = valid_tags))]
    pub tags: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "firestore::serialize_as_optional_timestamp"
    )]
    pub entry_date: Option<DateTime<Utc>>,
}

impl JournalEntryPatch {
    /// Re-date the entry, keeping the display string and timestamp in step.
    pub fn redate(mut self, when: DateTime<Utc>) -> Self {
        self.date = Some(local_display_date(when));
        self.entry_date = Some(when);
        self
    }

    /// Field paths present in this patch, for the update mask.
    pub fn field_paths(&self) -> Vec<String> {
        [
            (self.title.is_some(), fields::TITLE),
            (self.description.is_some(), fields::DESCRIPTION),
            (self.mood.is_some(), fields::MOOD),
            (self.sleep_quality.is_some(), fields::SLEEP_QUALITY),
            (self.tags.is_some(), fields::TAGS),
            (self.date.is_some(), fields::DATE),
            (self.entry_date.is_some(), fields::ENTRY_DATE),
        ]
        .into_iter()
        .filter(|(present, _)| *present)
        .map(|(_, name)| name.to_string())
        .collect()
    }
}

/// Stored journal entry as read back from Firestore.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub struct JournalEntry {
    /// Document ID
    #[serde(alias = "_firestore_id", default)]
    pub id: Option<String>,
    /// Full document name; the owner is the `users/{userId}` segment in it
    #[serde(alias = "_firestore_full_id", default)]
    #[cfg_attr(feature = "binding-generation", ts(skip))]
    pub document_path: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub mood: String,
    pub sleep_quality: SleepQuality,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub date: String,
    /// Missing on entries written before the sortable timestamp existed
    #[serde(default, with = "firestore::serialize_as_optional_timestamp")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string | null"))]
    pub entry_date: Option<DateTime<Utc>>,
    pub user_id: String,
    #[serde(default, with = "firestore::serialize_as_optional_timestamp")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string | null"))]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "firestore::serialize_as_optional_timestamp")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string | null"))]
    pub updated_at: Option<DateTime<Utc>>,
}

impl JournalEntry {
    /// Document ID, or an empty string if the document had none.
    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }

    /// Whether the caller-supplied content of `entry` was stored unchanged.
    pub fn matches(&self, entry: &NewJournalEntry) -> bool {
        self.title == entry.title
            && self.description == entry.description
            && self.mood == entry.mood
            && self.sleep_quality == entry.sleep_quality
            && self.tags == entry.tags
            && self.date == entry.date
            && self
                .entry_date
                .is_some_and(|d| d.timestamp_micros() == entry.entry_date.timestamp_micros())
    }

    /// Timestamp used for chronological ordering.
    pub fn sort_time(&self) -> Option<DateTime<Utc>> {
        self.entry_date.or(self.created_at)
    }
}

/// Sort entries oldest first. Entries with no usable timestamp go last.
pub fn sort_chronologically(entries: &mut [JournalEntry]) {
    entries.sort_by(|a, b| match (a.sort_time(), b.sort_time()) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
