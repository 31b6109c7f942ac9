// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Document models for the application.

pub mod journal;
pub mod user;

pub use journal::{JournalEntry, JournalEntryPatch, NewJournalEntry, SleepQuality};
pub use user::{PreferenceFields, Preferences, Theme, UserFields, UserProfile};
