// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wellness journal store diagnostics
//!
//! Verifies a deployment end to end (anonymous sign-in, user upsert,
//! sample entry, read back) and dumps stored journal entries.
//!
//! # Usage
//!
//! ```bash
//! wellness-journal                       # same as `verify`
//! wellness-journal verify --all-users
//! wellness-journal list --user <USER_ID>
//! JOURNAL_CREDENTIALS=service-account wellness-journal list-all
//! ```
//!
//! Connection settings come from the environment (`FIREBASE_API_KEY`,
//! `FIREBASE_PROJECT_ID`, optional emulator hosts); see `config.rs`.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wellness_journal::{
    config::Config,
    db::DocumentStore,
    error::AppError,
    models::{journal::sort_chronologically, JournalEntry, UserProfile},
    services::verification::{self, Step, VerificationPlan},
};

const DEFAULT_EMAIL: &str = "test@x.com";
const DEFAULT_DISPLAY_NAME: &str = "T";

#[derive(Parser)]
#[command(name = "wellness-journal")]
#[command(version)]
#[command(about = "Wellness journal document store diagnostics")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in anonymously, write a test user and sample entry, read them back
    Verify(VerifyArgs),
    /// List one user's journal entries
    List {
        /// User ID (document ID under `users/`)
        #[arg(long, short)]
        user: String,
    },
    /// List journal entries of every user (needs admin credentials)
    ListAll,
}

#[derive(Args)]
struct VerifyArgs {
    /// Email stored on the test user
    #[arg(long, default_value = DEFAULT_EMAIL)]
    email: String,
    /// Display name stored on the test user
    #[arg(long, default_value = DEFAULT_DISPLAY_NAME)]
    display_name: String,
    /// Also read every user's entries
    #[arg(long)]
    all_users: bool,
}

impl Default for VerifyArgs {
    fn default() -> Self {
        Self {
            email: DEFAULT_EMAIL.to_string(),
            display_name: DEFAULT_DISPLAY_NAME.to_string(),
            all_users: false,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = error_code(&err);
            tracing::error!(code, error = ?err, "Diagnostic run failed");

            println!("❌ {} [{}]", err, code);
            for cause in err.chain().skip(1) {
                println!("   caused by: {}", cause);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config()?;
    tracing::info!(project = %config.project_id, "Starting diagnostics");

    let store = DocumentStore::connect(&config)
        .await
        .context("connecting to the document store")?;
    println!("🔌 Connected to project {}", config.project_id);

    match cli.command.unwrap_or(Commands::Verify(VerifyArgs::default())) {
        Commands::Verify(args) => verify(&store, args).await,
        Commands::List { user } => {
            let mut entries = store
                .list_journal_entries(&user)
                .await
                .with_context(|| format!("listing entries of user {}", user))?;
            sort_chronologically(&mut entries);

            println!("📖 {} journal entries for {}", entries.len(), user);
            for entry in &entries {
                print_entry(entry);
            }
            Ok(())
        }
        Commands::ListAll => {
            let all = store
                .list_all_journal_entries_across_users()
                .await
                .context("listing entries across users")?;

            println!("📖 {} journal entries across all users", all.len());
            for (user_id, entry) in &all {
                print!("   [{}]", user_id);
                print_entry(entry);
            }
            Ok(())
        }
    }
}

fn load_config() -> anyhow::Result<Config> {
    Config::from_env()
        .map_err(AppError::from)
        .context("loading configuration")
}

/// Stable code of the underlying `AppError`, for logs and the status line.
fn error_code(err: &anyhow::Error) -> &'static str {
    err.downcast_ref::<AppError>()
        .map_or("internal_error", AppError::code)
}

async fn verify(store: &DocumentStore, args: VerifyArgs) -> anyhow::Result<()> {
    let mut plan = VerificationPlan::new(args.email, args.display_name);
    plan.include_all_users = args.all_users;

    let report = verification::run(store, &plan, print_step)
        .await
        .context("verification failed")?;

    if !report.sample_entry_found(&plan) {
        anyhow::bail!(
            "sample entry {} was not read back exactly once",
            report.entry_id
        );
    }

    println!(
        "✅ Verification passed for user {} (entry {})",
        report.identity.user_id, report.entry_id
    );
    Ok(())
}

fn print_step(step: Step<'_>) {
    match step {
        Step::Authenticated(identity) => {
            println!("✅ Signed in anonymously as {}", identity.user_id)
        }
        Step::UserSaved { user_id } => println!("✅ Saved users/{}", user_id),
        Step::EntryAdded { entry_id } => println!("📝 Added journal entry {}", entry_id),
        Step::UserRead(Some(user)) => print_user(user),
        Step::UserRead(None) => println!("⚠️  User document not found after upsert"),
        Step::EntriesRead(entries) => {
            println!("📖 {} journal entries", entries.len());
            for entry in entries {
                print_entry(entry);
            }
        }
        Step::AllEntriesRead(all) => {
            println!("📖 {} journal entries across all users", all.len());
            for (user_id, entry) in all {
                print!("   [{}]", user_id);
                print_entry(entry);
            }
        }
    }
}

fn print_user(user: &UserProfile) {
    println!(
        "📖 User {}: email={} displayName={} theme={:?} notifications={:?} createdAt={:?} lastLogin={:?}",
        user.id.as_deref().unwrap_or("?"),
        user.email.as_deref().unwrap_or("-"),
        user.display_name.as_deref().unwrap_or("-"),
        user.preferences.theme,
        user.preferences.notifications,
        user.created_at,
        user.last_login,
    );
}

fn print_entry(entry: &JournalEntry) {
    let tags: Vec<&str> = entry.tags.iter().map(String::as_str).collect();
    println!(
        "   • {} {} {} [{}] sleep={} tags=[{}] id={}",
        entry.date,
        entry.mood,
        entry.title,
        entry
            .updated_at
            .map(wellness_journal::time_utils::format_utc_rfc3339)
            .unwrap_or_default(),
        entry.sleep_quality,
        tags.join(", "),
        entry.id(),
    );
}

/// Initialize structured JSON logging on stderr (stdout carries status lines).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("wellness_journal=info,warn"));

    tracing_subscriber::registry().with(filter).with(format).init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_reports_config_error() {
        std::env::remove_var("FIREBASE_API_KEY");
        std::env::set_var("FIREBASE_PROJECT_ID", "journal-test");

        let err = load_config().unwrap_err();
        assert_eq!(error_code(&err), "config_error");
        assert!(format!("{:#}", err).contains("FIREBASE_API_KEY"));
    }

    #[test]
    fn test_store_errors_keep_their_code_through_context() {
        let err = anyhow::Error::from(AppError::Write("Commit failed".to_string()))
            .context("verification failed");
        assert_eq!(error_code(&err), "write_error");

        let err = anyhow::anyhow!("sample entry missing");
        assert_eq!(error_code(&err), "internal_error");
    }

    #[test]
    fn test_no_subcommand_defaults_to_verify() {
        let cli = Cli::try_parse_from(["wellness-journal"]).unwrap();
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["wellness-journal", "verify", "--all-users"]).unwrap();
        match cli.command {
            Some(Commands::Verify(args)) => {
                assert!(args.all_users);
                assert_eq!(args.email, DEFAULT_EMAIL);
            }
            _ => panic!("expected verify"),
        }
    }
}
