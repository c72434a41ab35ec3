//! Onboarding questionnaire against a hosted record store.
//!
//! Reads the store location from `ONBOARD_STORE_URL` / `ONBOARD_STORE_KEY`
//! (or the `SUPABASE_*` / `VITE_SUPABASE_*` equivalents).
//!
//! Run with: cargo run -p onboard-wizard-dialoguer --example onboard -- <token>

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use onboard::{AccessGate, Flow, QuestionCatalog};
use onboard_store_rest::{RestConfig, RestStore};
use onboard_wizard_dialoguer::{DialoguerError, DialoguerFrontend};
use tracing_subscriber::EnvFilter;

/// Answer the onboarding questionnaire for a magic link.
#[derive(Parser, Debug)]
#[command(name = "onboard", version, about)]
struct Cli {
    /// Magic link token
    #[arg(env = "ONBOARD_TOKEN")]
    token: String,

    /// Load the question catalog from a JSON file instead of the built-in one
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Use the extended built-in catalog
    #[arg(long, conflicts_with = "catalog")]
    extended: bool,

    /// Disable colors
    #[arg(long)]
    plain: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_catalog(cli: &Cli) -> Result<QuestionCatalog> {
    match &cli.catalog {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading catalog {}", path.display()))?;
            QuestionCatalog::from_json(&json)
                .with_context(|| format!("parsing catalog {}", path.display()))
        }
        None if cli.extended => Ok(onboard_catalogs::learning_journey_extended()),
        None => Ok(onboard_catalogs::learning_journey()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let catalog = Arc::new(load_catalog(&cli)?);
    let config = RestConfig::from_env().context("record store configuration")?;
    let store = Arc::new(RestStore::new(config)?);
    store.ping().await.context("record store unreachable")?;

    let mut flow = Flow::new(catalog, AccessGate::new(store.clone()), store);
    let frontend = if cli.plain {
        DialoguerFrontend::plain()
    } else {
        DialoguerFrontend::new()
    };

    match frontend.run(&mut flow, &cli.token).await {
        Ok(_) if flow.is_submitted() => Ok(()),
        Ok(state) => anyhow::bail!("questionnaire ended in state {state}"),
        Err(DialoguerError::Rejected(message)) => {
            eprintln!("{message}");
            std::process::exit(2);
        }
        Err(DialoguerError::Cancelled) => {
            eprintln!("Cancelled.");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
