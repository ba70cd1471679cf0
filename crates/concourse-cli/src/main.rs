//! concourse - chat assistant demos over an OpenAI-compatible endpoint

mod config;
mod prompts;
mod repl;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use concourse_ai::ChatClient;
use concourse_chat::tools::airline_catalog;
use concourse_chat::{ChatTurn, SessionHandle, SessionStore};

/// concourse - tool-augmented chat assistants
#[derive(Parser, Debug)]
#[command(name = "concourse")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Model to use (default: gemini-2.5-flash)
    #[arg(short, long)]
    model: Option<String>,

    /// OpenAI-compatible base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Path to the session store database
    #[arg(long)]
    store: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Initialize config file
    #[arg(long)]
    init_config: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// FlightAI: ticket prices and saved conversations
    Airline,
    /// White Nights professor: questions about the Second Night
    Companion {
        /// Text file with the passage the professor is grounded in
        #[arg(long)]
        passage: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Setup tracing
    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("concourse=debug")
            .init();
    }

    // Initialize config and exit
    if args.init_config {
        match config::Config::init() {
            Ok(path) => {
                println!("Config file created at: {}", path.display());
                println!("\nExample config:\n{}", config::example_config());
            }
            Err(e) => {
                eprintln!("Error creating config: {}", e);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    let Some(command) = args.command else {
        eprintln!("No command given; try 'concourse airline' or 'concourse companion'.");
        std::process::exit(1);
    };

    let config = config::Config::load();
    let api_key = config
        .api_key()
        .context("no API key: set GOOGLE_API_KEY (or api_key in the config file)")?;
    let model = config.model(args.model.as_deref());
    let base_url = config.base_url(args.base_url.as_deref());

    let provider = Arc::new(ChatClient::new(api_key, base_url));

    match command {
        Command::Airline => {
            let store_path = config.store_path(args.store.as_deref());
            if let Some(dir) = store_path.parent() {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("failed to create {}", dir.display()))?;
            }
            let store = Arc::new(
                SessionStore::open(&store_path.to_string_lossy())
                    .context("failed to open session store")?,
            );

            let handle = SessionHandle::new();
            let turn = ChatTurn::new(provider, model, prompts::AIRLINE_SYSTEM_PROMPT)
                .with_catalog(airline_catalog(handle.clone(), store.clone()))
                .with_session(handle.clone(), store.clone());

            repl::run_airline(&turn, &handle, &store).await
        }
        Command::Companion { passage } => {
            let text = std::fs::read_to_string(&passage)
                .with_context(|| format!("failed to read {}", passage.display()))?;

            let turn = ChatTurn::new(provider, model, prompts::professor_prompt(&text))
                .with_temperature(0.3);

            repl::run_companion(&turn).await
        }
    }
}
