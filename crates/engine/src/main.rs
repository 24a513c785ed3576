//! Storykin - command line entry point.
//!
//! `storykin submit <draft.json> [--user <uuid>]` takes a saved draft through
//! the review gate and the submission pipeline against an in-memory store
//! seeded with the option catalogs, then prints the report.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use storykin_domain::{Draft, UserId, WizardStep};
use storykin_engine::infrastructure::{
    config::AppConfig,
    memory_store::InMemoryStore,
    notifications::{LoggingNavigator, StaticSession, TracingNotifier},
    storage::FileKeyValueStore,
};
use storykin_engine::use_cases::{SubmissionOutcome, SubmissionRepos, WizardOptions};
use storykin_engine::App;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "Usage: storykin submit <draft.json> [--user <uuid>]";

enum Command {
    Submit { draft_path: PathBuf, user_id: UserId },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root.
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storykin_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();
    tracing::debug!(?config, "Configuration loaded");

    match parse_args(std::env::args().skip(1))? {
        Command::Submit {
            draft_path,
            user_id,
        } => submit(config, draft_path, user_id).await,
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<Command> {
    match args.next().as_deref() {
        Some("submit") => {
            let draft_path = args
                .next()
                .map(PathBuf::from)
                .with_context(|| format!("Missing draft path\n\n{USAGE}"))?;
            let mut user_id = None;
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--user" => {
                        let raw = args.next().context("--user needs a value")?;
                        let parsed = raw
                            .parse::<UserId>()
                            .with_context(|| format!("Invalid user id: {raw}"))?;
                        user_id = Some(parsed);
                    }
                    other => anyhow::bail!("Unknown argument: {other}\n\n{USAGE}"),
                }
            }
            Ok(Command::Submit {
                draft_path,
                user_id: user_id.unwrap_or_default(),
            })
        }
        Some(cmd) => anyhow::bail!("Unknown command: {cmd}\n\n{USAGE}"),
        None => anyhow::bail!(USAGE),
    }
}

async fn submit(config: AppConfig, draft_path: PathBuf, user_id: UserId) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(&draft_path)
        .with_context(|| format!("reading {}", draft_path.display()))?;
    let draft: Draft = serde_json::from_str(&raw)
        .with_context(|| format!("parsing draft {}", draft_path.display()))?;
    draft
        .validate_all(chrono::Utc::now().date_naive())
        .context("draft is incomplete")?;

    let storage = FileKeyValueStore::open(config.storage_path.clone());
    tracing::info!(path = %storage.path().display(), user_id = %user_id, "Submitting draft");

    let app = App::new(
        config,
        SubmissionRepos::from_store(InMemoryStore::with_catalog_lookups()),
        Arc::new(storage),
        Arc::new(StaticSession::signed_in(user_id)),
        Arc::new(TracingNotifier),
        Arc::new(LoggingNavigator::new()),
    );

    let mode = draft.mode;
    let mut session = app.open_wizard(
        WizardOptions::new(mode)
            .hydrated(draft)
            .with_initial_step(WizardStep::Review),
    );
    let outcome = session.submit(&app.use_cases.submit_child_profile).await;
    session.close();

    match outcome? {
        SubmissionOutcome::Completed(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        SubmissionOutcome::AlreadyInFlight => tracing::warn!("A submission is already running"),
    }
    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
