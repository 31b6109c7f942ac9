// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use wellness_journal::config::Config;
use wellness_journal::db::DocumentStore;

/// Check if both emulators are available via environment variables.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
        && std::env::var("FIREBASE_AUTH_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulators not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST / FIREBASE_AUTH_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Emulator config, taking hosts and project from the environment when set.
#[allow(dead_code)]
pub fn test_config() -> Config {
    let mut config = Config::test_default();
    if let Ok(host) = std::env::var("FIRESTORE_EMULATOR_HOST") {
        config.firestore_emulator_host = Some(host);
    }
    if let Ok(host) = std::env::var("FIREBASE_AUTH_EMULATOR_HOST") {
        config.auth_emulator_host = Some(host);
    }
    if let Ok(project) = std::env::var("FIREBASE_PROJECT_ID") {
        config.project_id = project;
    }
    config
}

/// Create a store connected to the emulators.
#[allow(dead_code)]
pub async fn test_store() -> DocumentStore {
    DocumentStore::connect(&test_config())
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a signed-in store and return it with the anonymous user's ID.
#[allow(dead_code)]
pub async fn signed_in_store() -> (DocumentStore, String) {
    let store = test_store().await;
    let identity = store
        .authenticate_anonymously()
        .await
        .expect("Anonymous sign-in against the auth emulator failed");
    (store, identity.user_id)
}

/// Create a mock store (offline).
#[allow(dead_code)]
pub fn test_store_offline() -> DocumentStore {
    DocumentStore::new_mock()
}
