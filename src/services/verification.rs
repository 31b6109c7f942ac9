// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! End-to-end store verification.
//!
//! Straight-line workflow:
//! 1. Authenticate anonymously
//! 2. Stamp the login and upsert a known test user (merge)
//! 3. Add one sample journal entry
//! 4. Read back the user and their entries
//! 5. Optionally read every user's entries (admin fan-out)

use crate::db::DocumentStore;
use crate::error::Result;
use crate::models::journal::sort_chronologically;
use crate::models::{JournalEntry, NewJournalEntry, SleepQuality, Theme, UserFields, UserProfile};
use crate::services::identity::UserIdentity;

/// What the verification run writes.
#[derive(Debug, Clone)]
pub struct VerificationPlan {
    pub user: UserFields,
    pub sample_entry: NewJournalEntry,
    pub include_all_users: bool,
}

impl VerificationPlan {
    /// Plan with the given test user and the standard sample entry.
    pub fn new(email: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            user: UserFields::default()
                .email(email)
                .display_name(display_name)
                .theme(Theme::Light)
                .notifications(true),
            sample_entry: NewJournalEntry::new("D1", "😊", SleepQuality::Good)
                .description("Sample entry written by the store verification")
                .tags(["test"]),
            include_all_users: false,
        }
    }
}

impl Default for VerificationPlan {
    fn default() -> Self {
        Self::new("test@x.com", "T")
    }
}

/// Progress notifications, in the order they happen.
#[derive(Debug)]
pub enum Step<'a> {
    Authenticated(&'a UserIdentity),
    UserSaved { user_id: &'a str },
    EntryAdded { entry_id: &'a str },
    UserRead(Option<&'a UserProfile>),
    EntriesRead(&'a [JournalEntry]),
    AllEntriesRead(&'a [(String, JournalEntry)]),
}

/// Everything read back by a successful run.
#[derive(Debug)]
pub struct VerificationReport {
    pub identity: UserIdentity,
    pub entry_id: String,
    pub user: Option<UserProfile>,
    /// The user's entries, oldest first
    pub entries: Vec<JournalEntry>,
    pub all_entries: Option<Vec<(String, JournalEntry)>>,
}

impl VerificationReport {
    /// Whether the sample entry was read back exactly once and unchanged.
    pub fn sample_entry_found(&self, plan: &VerificationPlan) -> bool {
        self.entries
            .iter()
            .filter(|e| e.id() == self.entry_id && e.matches(&plan.sample_entry))
            .count()
            == 1
    }
}

/// Run the verification against `store`. Stops at the first failure.
pub async fn run<F>(
    store: &DocumentStore,
    plan: &VerificationPlan,
    mut on_step: F,
) -> Result<VerificationReport>
where
    F: FnMut(Step<'_>),
{
    let identity = store.authenticate_anonymously().await?;
    on_step(Step::Authenticated(&identity));
    let user_id = identity.user_id.as_str();

    store.record_login(user_id).await?;
    store.upsert_user(user_id, &plan.user, true).await?;
    on_step(Step::UserSaved { user_id });

    let entry_id = store.add_journal_entry(user_id, &plan.sample_entry).await?;
    on_step(Step::EntryAdded {
        entry_id: &entry_id,
    });

    let user = store.get_user(user_id).await?;
    on_step(Step::UserRead(user.as_ref()));

    let mut entries = store.list_journal_entries(user_id).await?;
    sort_chronologically(&mut entries);
    on_step(Step::EntriesRead(&entries));

    let all_entries = if plan.include_all_users {
        let all = store.list_all_journal_entries_across_users().await?;
        on_step(Step::AllEntriesRead(&all));
        Some(all)
    } else {
        None
    };

    tracing::info!(
        user_id,
        entry_id = %entry_id,
        entries = entries.len(),
        "Verification complete"
    );

    Ok(VerificationReport {
        identity,
        entry_id,
        user,
        entries,
        all_entries,
    })
}
