use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docq::{Config, OpenAiClientBuilder, PineconeClientBuilder, QueryEngine, QueryEngineBuilder};

/// docq - terminal client for a hosted document query index
#[derive(Parser)]
#[command(name = "docq")]
#[command(about = "Ask questions against a hosted document index")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Ask a single question and print the answer
    Ask(AskCommand),
    /// Check configuration and connectivity to the backing services
    Doctor,
}

/// Ask a single question
#[derive(Parser)]
struct AskCommand {
    /// The question to ask
    #[arg(value_name = "QUESTION")]
    question: String,

    /// Number of chunks to retrieve as context
    #[arg(short = 'k', long, value_name = "N")]
    top_k: Option<usize>,
}

fn main() {
    let cli = Cli::parse();

    let result = match &cli.command {
        Some(Commands::Ask(cmd)) => handle_ask(cmd),
        Some(Commands::Doctor) => docq::doctor::run(),
        None => handle_tui(),
    };

    if let Err(e) = result {
        // Determine exit code based on error type
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e}");
        std::process::exit(exit_code);
    }
}

/// Determines if an error is a user error (vs internal error).
///
/// User errors include validation failures like an empty question.
/// Internal errors include configuration and service failures.
fn is_user_error(error: &anyhow::Error) -> bool {
    let error_msg = error.to_string();
    error_msg.contains("cannot be empty")
}

/// Builds the query engine from configuration.
///
/// Binds the remote index exactly once, before any query runs. Order
/// matters here: client first, then the bound index handle, then the
/// engine on top of it. A bad key or unknown index fails right here,
/// before any UI is shown.
fn build_engine(config: &Config, top_k: Option<usize>) -> Result<QueryEngine> {
    let llm = OpenAiClientBuilder::new()
        .api_key(config.openai_api_key())
        .build()
        .context("Failed to create language model client")?;

    let pinecone = PineconeClientBuilder::new()
        .api_key(config.pinecone_api_key())
        .build()
        .context("Failed to create vector database client")?;

    let index = pinecone
        .connect(config.index_name(), config.namespace())
        .with_context(|| format!("Failed to bind index '{}'", config.index_name()))?;

    let mut builder = QueryEngineBuilder::new()
        .llm(Arc::new(llm))
        .index(Arc::new(index));
    if let Some(top_k) = top_k {
        builder = builder.top_k(top_k);
    }

    Ok(builder.build())
}

/// Handles the ask command: one question, one printed answer.
fn handle_ask(cmd: &AskCommand) -> Result<()> {
    // Validate the question is not empty or whitespace-only before any
    // network traffic.
    if cmd.question.trim().is_empty() {
        anyhow::bail!("Question cannot be empty");
    }

    let config = Config::load().context("Failed to load configuration")?;
    let engine = build_engine(&config, cmd.top_k)?;

    match engine.answer(&cmd.question).context("Query failed")? {
        Some(response) => {
            println!("{}", response.answer());
            if let Some(caption) = response.source_caption() {
                println!();
                println!("{caption}");
            }
        }
        None => {
            println!("No results found.");
        }
    }

    Ok(())
}

/// Handles the default invocation: run the interactive TUI.
fn handle_tui() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let engine = build_engine(&config, None)?;

    docq::tui::run(&engine)
}
