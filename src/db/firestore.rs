// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Authentication (anonymous and email/password sessions)
//! - Users (`users/{userId}` profile documents)
//! - Journal entries (`users/{userId}/journalEntries/{entryId}`)
//!
//! Every write is a single-document commit so that server timestamps can be
//! applied as field transforms. Nothing is retried.

use crate::config::{Config, CredentialsMode};
use crate::db::collections;
use crate::db::ids::{generate_document_id, validate_document_id};
use crate::error::{AppError, Result};
use crate::models::journal::{self, JournalEntryDocument};
use crate::models::user;
use crate::models::{JournalEntry, JournalEntryPatch, NewJournalEntry, UserFields, UserProfile};
use crate::services::identity::{AuthSession, IdentityClient, UserIdentity};
use firestore::{
    FirestoreConsistencySelector, FirestoreFieldTransform, FirestoreFieldTransformType,
    FirestoreTransactionOps, FirestoreTransformServerValue, FirestoreWritePrecondition,
};
use futures_util::TryStreamExt;
use ring::rand::SystemRandom;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{OnceCell, RwLock};

/// Unsigned token sent before anyone has signed in. The emulator accepts it;
/// production Firestore rejects it, which surfaces as a read/write error.
const UNSIGNED_TOKEN: &str = "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJhbm9ueW1vdXMifQ.";

/// Connection handle to the document store and its auth service.
///
/// Cheap to clone; clones share the same session.
#[derive(Clone)]
pub struct DocumentStore {
    client: Option<firestore::FirestoreDb>,
    identity: IdentityClient,
    session: Arc<RwLock<Option<AuthSession>>>,
    rng: Arc<SystemRandom>,
}

impl DocumentStore {
    /// Connect to Firestore.
    ///
    /// Fails with a configuration error when the API key or project ID is
    /// missing. For local development set FIRESTORE_EMULATOR_HOST.
    pub async fn connect(config: &Config) -> Result<Self> {
        config.validate()?;

        let identity = IdentityClient::new(config)?;
        let session = Arc::new(RwLock::new(None));

        let client = if config.credentials == CredentialsMode::ServiceAccount
            && !config.uses_firestore_emulator()
        {
            let client = firestore::FirestoreDb::new(&config.project_id)
                .await
                .map_err(|e| AppError::Read(format!("Failed to connect to Firestore: {}", e)))?;
            tracing::info!(
                project = %config.project_id,
                "Connected to Firestore (application default credentials)"
            );
            client
        } else {
            Self::create_session_client(config, identity.clone(), session.clone()).await?
        };

        Ok(Self {
            client: Some(client),
            identity,
            session,
            rng: Arc::new(SystemRandom::new()),
        })
    }

    /// Create a Firestore client authorized by the signed-in user's ID token.
    ///
    /// The token is looked up on every request so sign-in, sign-out and
    /// refreshes take effect immediately.
    async fn create_session_client(
        config: &Config,
        identity: IdentityClient,
        session: Arc<RwLock<Option<AuthSession>>>,
    ) -> Result<firestore::FirestoreDb> {
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(move || {
            let identity = identity.clone();
            let session = session.clone();
            async move {
                let token = current_token(&identity, &session).await;
                Ok(gcloud_sdk::Token {
                    token_type: "Bearer".to_string(),
                    token: gcloud_sdk::SecretValue::new(token.into()),
                    expiry: chrono::Utc::now(),
                })
            }
        });

        let mut options = firestore::FirestoreDbOptions::new(config.project_id.clone());
        if let Some(host) = &config.firestore_emulator_host {
            options = options.with_firebase_api_url(format!("http://{}", host));
        }

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| AppError::Read(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(
            project = %config.project_id,
            emulator = config.uses_firestore_emulator(),
            "Connected to Firestore (user session credentials)"
        );

        Ok(client)
    }

    /// Create a mock store for testing (offline mode).
    ///
    /// Validation still runs; every remote call returns an error.
    pub fn new_mock() -> Self {
        Self {
            client: None,
            identity: IdentityClient::offline(),
            session: Arc::new(RwLock::new(None)),
            rng: Arc::new(SystemRandom::new()),
        }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> std::result::Result<&firestore::FirestoreDb, String> {
        self.client
            .as_ref()
            .ok_or_else(|| "Database not connected (offline mode)".to_string())
    }

    // ─── Authentication ──────────────────────────────────────────

    /// Start an anonymous session and make it the current one.
    pub async fn authenticate_anonymously(&self) -> Result<UserIdentity> {
        let session = self.identity.sign_up_anonymously().await?;
        Ok(self.install_session(session).await)
    }

    /// Sign in with email and password and make it the current session.
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<UserIdentity> {
        let session = self.identity.sign_in_with_password(email, password).await?;
        Ok(self.install_session(session).await)
    }

    /// Send a password reset email. Does not change the current session.
    pub async fn send_password_reset(&self, email: &str) -> Result<()> {
        self.identity.send_password_reset(email).await
    }

    /// Refresh the current session's ID token (same user ID).
    pub async fn refresh_session(&self) -> Result<UserIdentity> {
        let current = self
            .session
            .read()
            .await
            .clone()
            .ok_or_else(|| AppError::Auth("no active session".to_string()))?;

        let refreshed = self.identity.refresh(&current).await?;
        Ok(self.install_session(refreshed).await)
    }

    /// Identity of the current session, if any.
    pub async fn current_identity(&self) -> Option<UserIdentity> {
        self.session.read().await.as_ref().map(AuthSession::identity)
    }

    /// Drop the current session.
    pub async fn sign_out(&self) {
        if let Some(session) = self.session.write().await.take() {
            tracing::info!(user_id = %session.user_id, "Signed out");
        }
    }

    async fn install_session(&self, session: AuthSession) -> UserIdentity {
        let identity = session.identity();
        *self.session.write().await = Some(session);
        identity
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user profile by ID.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<UserProfile>> {
        validate_document_id(user_id).map_err(AppError::Read)?;

        self.get_client()
            .map_err(AppError::Read)?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Read(e.to_string()))
    }

    /// Create or update a user document.
    ///
    /// With `merge`, only the fields present in `fields` are written. Without
    /// it, every client-owned field is replaced and the ones not passed are
    /// removed. Server-managed timestamps survive either way; `createdAt` is
    /// stamped only when the stored document does not have one yet (a login
    /// stamp may have created the document first).
    pub async fn upsert_user(&self, user_id: &str, fields: &UserFields, merge: bool) -> Result<()> {
        validate_document_id(user_id).map_err(AppError::Write)?;
        validator::Validate::validate(fields).map_err(AppError::invalid_write)?;
        let client = self.get_client().map_err(AppError::Write)?;

        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Write(format!("Failed to begin write: {}", e)))?;

        // Read through the transaction: racing first upserts then conflict at
        // commit, so `createdAt` is stamped exactly once.
        let existing: Option<UserProfile> = client
            .clone_with_consistency_selector(FirestoreConsistencySelector::Transaction(
                transaction.transaction_id().clone(),
            ))
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Write(format!("could not check existing user: {}", e)))?;
        let stamp_created = existing.as_ref().is_none_or(|u| u.created_at.is_none());

        let mask: Vec<String> = if merge {
            fields.field_paths()
        } else {
            UserFields::CLIENT_OWNED.iter().map(|p| p.to_string()).collect()
        };

        if mask.is_empty() && !stamp_created {
            tracing::debug!(user_id, "Empty merge on existing user, nothing to write");
            let _ = transaction.rollback().await;
            return Ok(());
        }

        if mask.is_empty() {
            client
                .fluent()
                .update()
                .in_col(collections::USERS)
                .document_id(user_id)
                .transforms(|t| {
                    t.fields([t
                        .field(user::fields::CREATED_AT)
                        .server_value(FirestoreTransformServerValue::RequestTime)])
                })
                .only_transform()
                .add_to_transaction(&mut transaction)
                .map_err(|e| AppError::Write(e.to_string()))?;
        } else {
            client
                .fluent()
                .update()
                .fields(mask)
                .in_col(collections::USERS)
                .document_id(user_id)
                .object(fields)
                .transforms(|t| {
                    t.fields([stamp_created.then(|| t.field(user::fields::CREATED_AT)).and_then(
                        |f| f.server_value(FirestoreTransformServerValue::RequestTime),
                    )])
                })
                .add_to_transaction(&mut transaction)
                .map_err(|e| AppError::Write(e.to_string()))?;
        }

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Write(format!("Commit failed: {}", e)))?;

        tracing::info!(
            user_id,
            merge,
            created = existing.is_none(),
            "User upserted"
        );
        Ok(())
    }

    /// Stamp `lastLogin` with the server time (called on each session start).
    pub async fn record_login(&self, user_id: &str) -> Result<()> {
        validate_document_id(user_id).map_err(AppError::Write)?;
        let client = self.get_client().map_err(AppError::Write)?;

        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Write(format!("Failed to begin write: {}", e)))?;

        client
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(user_id)
            .transforms(|t| {
                t.fields([t
                    .field(user::fields::LAST_LOGIN)
                    .server_value(FirestoreTransformServerValue::RequestTime)])
            })
            .only_transform()
            .add_to_transaction(&mut transaction)
            .map_err(|e| AppError::Write(e.to_string()))?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Write(format!("Commit failed: {}", e)))?;

        tracing::debug!(user_id, "Login recorded");
        Ok(())
    }

    // ─── Journal Entry Operations ────────────────────────────────

    /// Add a journal entry under a user and return its generated ID.
    ///
    /// The entry is validated before any network I/O; `userId`,
    /// `createdAt` and `updatedAt` are filled in here, never by the caller.
    pub async fn add_journal_entry(
        &self,
        user_id: &str,
        entry: &NewJournalEntry,
    ) -> Result<String> {
        validate_document_id(user_id).map_err(AppError::Write)?;
        validator::Validate::validate(entry).map_err(AppError::invalid_write)?;
        let client = self.get_client().map_err(AppError::Write)?;

        let entry_id = generate_document_id(self.rng.as_ref())
            .map_err(|_| AppError::Write("failed to generate entry ID".to_string()))?;
        let parent_path = client
            .parent_path(collections::USERS, user_id)
            .map_err(|e| AppError::Write(e.to_string()))?;
        let document = JournalEntryDocument::new(user_id, entry);

        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Write(format!("Failed to begin write: {}", e)))?;

        // The fluent `.object()` requires `for<'de> Deserialize<'de>`, which the
        // borrowing `JournalEntryDocument` cannot satisfy; this is the call
        // `.add_to_transaction()` makes.
        transaction
            .update_object_at(
                parent_path.as_ref(),
                collections::JOURNAL_ENTRIES,
                &entry_id,
                &document,
                None,
                Some(FirestoreWritePrecondition::Exists(false)),
                vec![
                    FirestoreFieldTransform::new(
                        journal::fields::CREATED_AT.to_string(),
                        FirestoreFieldTransformType::SetToServerValue(
                            FirestoreTransformServerValue::RequestTime,
                        ),
                    ),
                    FirestoreFieldTransform::new(
                        journal::fields::UPDATED_AT.to_string(),
                        FirestoreFieldTransformType::SetToServerValue(
                            FirestoreTransformServerValue::RequestTime,
                        ),
                    ),
                ],
            )
            .map_err(|e| AppError::Write(e.to_string()))?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Write(format!("Commit failed: {}", e)))?;

        tracing::info!(user_id, entry_id = %entry_id, "Journal entry added");
        Ok(entry_id)
    }

    /// Update fields of an existing entry.
    ///
    /// `updatedAt` is re-stamped; `createdAt` and `userId` are never touched.
    /// Fails if the entry does not exist.
    pub async fn update_journal_entry(
        &self,
        user_id: &str,
        entry_id: &str,
        patch: &JournalEntryPatch,
    ) -> Result<()> {
        validate_document_id(user_id).map_err(AppError::Write)?;
        validate_document_id(entry_id).map_err(AppError::Write)?;
        validator::Validate::validate(patch).map_err(AppError::invalid_write)?;

        let mask = patch.field_paths();
        if mask.is_empty() {
            return Err(AppError::Write("update has no fields".to_string()));
        }

        let client = self.get_client().map_err(AppError::Write)?;
        let parent_path = client
            .parent_path(collections::USERS, user_id)
            .map_err(|e| AppError::Write(e.to_string()))?;

        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Write(format!("Failed to begin write: {}", e)))?;

        client
            .fluent()
            .update()
            .fields(mask)
            .in_col(collections::JOURNAL_ENTRIES)
            .precondition(FirestoreWritePrecondition::Exists(true))
            .document_id(entry_id)
            .parent(&parent_path)
            .object(patch)
            .transforms(|t| {
                t.fields([t
                    .field(journal::fields::UPDATED_AT)
                    .server_value(FirestoreTransformServerValue::RequestTime)])
            })
            .add_to_transaction(&mut transaction)
            .map_err(|e| AppError::Write(e.to_string()))?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Write(format!("Commit failed: {}", e)))?;

        tracing::info!(user_id, entry_id, "Journal entry updated");
        Ok(())
    }

    /// Get a single entry.
    pub async fn get_journal_entry(
        &self,
        user_id: &str,
        entry_id: &str,
    ) -> Result<Option<JournalEntry>> {
        validate_document_id(user_id).map_err(AppError::Read)?;
        validate_document_id(entry_id).map_err(AppError::Read)?;
        let client = self.get_client().map_err(AppError::Read)?;
        let parent_path = client
            .parent_path(collections::USERS, user_id)
            .map_err(|e| AppError::Read(e.to_string()))?;

        let entry: Option<JournalEntry> = client
            .fluent()
            .select()
            .by_id_in(collections::JOURNAL_ENTRIES)
            .parent(&parent_path)
            .obj()
            .one(entry_id)
            .await
            .map_err(|e| AppError::Read(e.to_string()))?;

        Ok(entry.filter(|e| owned_by(e, user_id)))
    }

    /// List all entries of a user, in server order.
    ///
    /// Use [`journal::sort_chronologically`] for a date ordering; the
    /// display `date` string does not sort.
    pub async fn list_journal_entries(&self, user_id: &str) -> Result<Vec<JournalEntry>> {
        validate_document_id(user_id).map_err(AppError::Read)?;
        let client = self.get_client().map_err(AppError::Read)?;
        let parent_path = client
            .parent_path(collections::USERS, user_id)
            .map_err(|e| AppError::Read(e.to_string()))?;

        let entries: Vec<JournalEntry> = client
            .fluent()
            .select()
            .from(collections::JOURNAL_ENTRIES)
            .parent(&parent_path)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Read(e.to_string()))?;

        let total = entries.len();
        let entries: Vec<JournalEntry> = entries
            .into_iter()
            .filter(|e| owned_by(e, user_id))
            .collect();
        tracing::debug!(
            user_id,
            count = entries.len(),
            skipped = total - entries.len(),
            "Listed journal entries"
        );

        Ok(entries)
    }

    /// List every user's entries (collection group read, admin tooling only).
    ///
    /// Returns `(userId, entry)` pairs keyed by the owner in the document
    /// path. Entries whose `userId` disagrees are skipped, as in
    /// [`DocumentStore::list_journal_entries`].
    pub async fn list_all_journal_entries_across_users(
        &self,
    ) -> Result<Vec<(String, JournalEntry)>> {
        let client = self.get_client().map_err(AppError::Read)?;

        let stream = client
            .fluent()
            .select()
            .from(collections::JOURNAL_ENTRIES)
            .all_descendants()
            .obj::<JournalEntry>()
            .stream_query_with_errors()
            .await
            .map_err(|e| AppError::Read(e.to_string()))?;

        let entries: Vec<JournalEntry> = stream
            .try_collect()
            .await
            .map_err(|e| AppError::Read(e.to_string()))?;

        let total = entries.len();
        let pairs = pair_with_owners(entries);

        tracing::info!(
            count = pairs.len(),
            skipped = total - pairs.len(),
            "Listed journal entries across users"
        );
        Ok(pairs)
    }
}

/// Entries whose `userId` disagrees with their owner path are skipped.
fn owned_by(entry: &JournalEntry, user_id: &str) -> bool {
    if entry.user_id == user_id {
        return true;
    }
    tracing::warn!(
        user_id,
        entry_id = entry.id(),
        entry_user_id = %entry.user_id,
        "Skipping journal entry owned by a different user"
    );
    false
}

/// Owner `userId` from a full document name
/// (`.../documents/users/{userId}/journalEntries/{entryId}`).
fn owner_from_path(path: &str) -> Option<&str> {
    let segments: Vec<&str> = path.split('/').collect();
    match segments.as_slice() {
        [.., users, owner, entries, _entry_id]
            if *users == collections::USERS && *entries == collections::JOURNAL_ENTRIES =>
        {
            Some(*owner)
        }
        _ => None,
    }
}

/// Key each entry by the owner in its path, dropping entries that are not
/// under `users/{userId}` or whose `userId` disagrees with it.
fn pair_with_owners(entries: Vec<JournalEntry>) -> Vec<(String, JournalEntry)> {
    entries
        .into_iter()
        .filter_map(|entry| {
            let Some(owner) = entry.document_path.as_deref().and_then(owner_from_path) else {
                tracing::warn!(
                    entry_id = entry.id(),
                    path = entry.document_path.as_deref().unwrap_or_default(),
                    "Skipping journal entry outside users/{{userId}}"
                );
                return None;
            };
            let owner = owner.to_string();
            owned_by(&entry, &owner).then_some((owner, entry))
        })
        .collect()
}

/// Current bearer token for Firestore, refreshing it first if it is about
/// to expire. Falls back to the unsigned token when nobody is signed in.
async fn current_token(
    identity: &IdentityClient,
    session: &RwLock<Option<AuthSession>>,
) -> String {
    let current = session.read().await.clone();
    let Some(current) = current else {
        return UNSIGNED_TOKEN.to_string();
    };

    if !current.needs_refresh(chrono::Utc::now()) {
        return current.id_token().to_string();
    }

    match identity.refresh(&current).await {
        Ok(refreshed) => {
            let token = refreshed.id_token().to_string();
            let mut slot = session.write().await;
            // Only replace the session we refreshed; a sign-in may have raced us.
            if slot.as_ref().is_some_and(|s| s.user_id == refreshed.user_id) {
                *slot = Some(refreshed);
            }
            token
        }
        Err(e) => {
            tracing::warn!(user_id = %current.user_id, error = %e, "ID token refresh failed");
            current.id_token().to_string()
        }
    }
}

/// Process-wide connection cell.
///
/// `connect` builds the store the first time and hands back the same
/// handle afterwards instead of connecting twice.
#[derive(Default)]
pub struct SharedStore {
    cell: OnceCell<DocumentStore>,
}

impl SharedStore {
    pub fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Connect once; later calls return the existing handle.
    pub async fn connect(&self, config: &Config) -> Result<&DocumentStore> {
        self.get_or_connect_with(|| DocumentStore::connect(config)).await
    }

    /// Like [`SharedStore::connect`] with a custom constructor.
    pub async fn get_or_connect_with<F, Fut>(&self, connect: F) -> Result<&DocumentStore>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<DocumentStore>>,
    {
        if self.cell.initialized() {
            tracing::debug!("Reusing existing document store connection");
        }
        self.cell.get_or_try_init(connect).await
    }

    /// The handle, if already connected.
    pub fn get(&self) -> Option<&DocumentStore> {
        self.cell.get()
    }
}
