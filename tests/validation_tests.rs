// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Input validation runs before any network I/O, so these run offline.

use wellness_journal::models::journal::MAX_TITLE_CHARS;
use wellness_journal::models::{JournalEntryPatch, NewJournalEntry, SleepQuality, UserFields};

mod common;
use common::test_store_offline;

fn valid_entry() -> NewJournalEntry {
    NewJournalEntry::new("D1", "😊", SleepQuality::Good).tags(["test"])
}

#[tokio::test]
async fn test_missing_title_is_rejected_before_write() {
    let store = test_store_offline();
    let mut entry = valid_entry();
    entry.title = "   ".to_string();

    let err = store.add_journal_entry("user123", &entry).await.unwrap_err();

    assert_eq!(err.code(), "write_error");
    assert!(
        err.to_string().contains("validation"),
        "Expected a validation failure, got: {}",
        err
    );
}

#[tokio::test]
async fn test_overlong_fields_are_rejected() {
    let store = test_store_offline();

    let mut entry = valid_entry();
    entry.title = "x".repeat(MAX_TITLE_CHARS as usize + 1);
    let err = store.add_journal_entry("user123", &entry).await.unwrap_err();
    assert!(err.to_string().contains("validation"));

    let entry = valid_entry().tags(["ok".to_string(), "t".repeat(51)]);
    let err = store.add_journal_entry("user123", &entry).await.unwrap_err();
    assert!(err.to_string().contains("validation"));
}

#[tokio::test]
async fn test_invalid_document_ids_are_rejected() {
    let store = test_store_offline();

    for bad in ["", "a/b", ".", "..", "__reserved__"] {
        let err = store.add_journal_entry(bad, &valid_entry()).await.unwrap_err();
        assert_eq!(err.code(), "write_error", "user id {:?}", bad);

        let err = store.get_user(bad).await.unwrap_err();
        assert_eq!(err.code(), "read_error", "user id {:?}", bad);
    }
}

#[tokio::test]
async fn test_valid_entry_fails_only_on_connection() {
    let store = test_store_offline();

    let err = store.add_journal_entry("user123", &valid_entry()).await.unwrap_err();

    assert_eq!(err.code(), "write_error");
    assert!(
        err.to_string().contains("not connected"),
        "Offline store should fail at the connection, got: {}",
        err
    );
}

#[tokio::test]
async fn test_empty_patch_is_rejected() {
    let store = test_store_offline();

    let err = store
        .update_journal_entry("user123", "entry123", &JournalEntryPatch::default())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("no fields"));

    let patch = JournalEntryPatch {
        mood: Some(String::new()),
        ..Default::default()
    };
    let err = store
        .update_journal_entry("user123", "entry123", &patch)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("validation"));
}

#[tokio::test]
async fn test_invalid_user_fields_are_rejected() {
    let store = test_store_offline();

    let fields = UserFields::default().email("not-an-email");
    let err = store.upsert_user("user123", &fields, true).await.unwrap_err();

    assert_eq!(err.code(), "write_error");
    assert!(err.to_string().contains("validation"));
}

#[tokio::test]
async fn test_offline_reads_fail_with_read_error() {
    let store = test_store_offline();

    let err = store.list_journal_entries("user123").await.unwrap_err();
    assert_eq!(err.code(), "read_error");

    let err = store.list_all_journal_entries_across_users().await.unwrap_err();
    assert_eq!(err.code(), "read_error");

    let err = store.get_journal_entry("user123", "a/b").await.unwrap_err();
    assert_eq!(err.code(), "read_error");
}

#[tokio::test]
async fn test_offline_auth_fails_without_session() {
    let store = test_store_offline();

    let err = store.authenticate_anonymously().await.unwrap_err();
    assert_eq!(err.code(), "auth_error");
    assert!(store.current_identity().await.is_none());
}
