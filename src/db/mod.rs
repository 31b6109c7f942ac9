//! Database layer (Firestore).

pub mod firestore;
pub mod ids;

pub use firestore::{DocumentStore, SharedStore};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Sub-collection under each `users/{userId}` document
    pub const JOURNAL_ENTRIES: &str = "journalEntries";
}
