#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

use clap::{Parser, Subcommand};
use riftbot_config::Config;
use riftbot_conversation::{ChatOrchestrator, HistoryStore, documents};
use riftbot_league::{MatchContextEnricher, RiotClient};
use riftbot_providers::GeminiBackend;
use riftbot_telegram::RiftBot;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "riftbot")]
#[command(about = "League-savvy chat assistant for Telegram", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the bot
    Run,
    /// Initialize configuration
    Init,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => run().await?,
        Commands::Init => Config::create_config()?,
        Commands::Version => println!("riftbot {}", env!("CARGO_PKG_VERSION")),
    }

    Ok(())
}

async fn run() -> anyhow::Result<()> {
    let config = Config::load()?;
    info!("Loaded config from ~/riftbot/config.json");

    // Documents must be in place before any chat event is accepted.
    let history = Arc::new(HistoryStore::new());
    let docs = documents::load_documents(&config.documents.dir)?;
    info!("Seeding history with {} reference documents", docs.len());
    documents::seed_history(&history, docs).await;

    let gemini = config.providers.gemini;
    let deadline = Duration::from_secs(gemini.deadline_secs);
    let backend = GeminiBackend::new(gemini.api_key, gemini.system_instruction)
        .with_model(gemini.model)
        .with_safety(gemini.safety);
    let orchestrator = Arc::new(ChatOrchestrator::new(
        Arc::new(backend),
        Arc::clone(&history),
        deadline,
    ));

    let riot = RiotClient::new(config.league.api_key).with_base_url(config.league.routing_host);
    let enricher = Arc::new(MatchContextEnricher::new(Arc::new(riot)));

    let bot = RiftBot::new(
        config.telegram.token,
        orchestrator,
        enricher,
        config.chat.triggers,
        config.chat.notices,
    );
    bot.run().await?;

    Ok(())
}
