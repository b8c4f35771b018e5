//! quizgen - Prediction quiz generator
//!
//! CLI entry point for generating quizzes and collections from papers.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use eyre::{Context, Result};
use tracing::info;

use quizgen::artifact::QuizStore;
use quizgen::cli::{Cli, Command};
use quizgen::config::Config;
use quizgen::domain::QuizId;
use quizgen::llm;
use quizgen::pipeline;
use quizgen::scrape::Fetcher;

fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quizgen")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Setup tracing subscriber - write to log file, not stdout/stderr
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(log_dir.join("quizgen.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!(
        "quizgen loaded config: provider={}, model={}",
        config.llm.provider, config.llm.model
    );

    match cli.command {
        Command::Generate {
            pdf_url,
            quiz_id,
            api_key,
            no_stream,
        } => {
            config.llm.api_key_override = api_key;
            config.validate()?;

            let quiz_id: QuizId = quiz_id.parse()?;
            let llm = llm::create_client(&config.llm)?;
            let store = QuizStore::new(&config.store.data_dir);

            pipeline::generate_quiz(&config, &llm, &store, &pdf_url, &quiz_id, !no_stream).await?;
            Ok(())
        }
        Command::Collection {
            source_url,
            collection_id,
            title,
            api_key,
            dry_run,
        } => {
            config.llm.api_key_override = api_key;
            config.validate()?;

            let collection_id: QuizId = collection_id.parse()?;
            let llm = llm::create_client(&config.llm)?;
            let store = QuizStore::new(&config.store.data_dir);
            let fetcher = Fetcher::from_config(&config.fetch)?;

            pipeline::generate_collection(
                &config,
                &llm,
                &store,
                &fetcher,
                &source_url,
                &collection_id,
                title,
                dry_run,
            )
            .await?;
            Ok(())
        }
        Command::Register { id, collection } => {
            let id: QuizId = id.parse()?;
            let store = QuizStore::new(&config.store.data_dir);

            if collection {
                store.register_collection(&id)?;
                println!("Collection registry updated to include '{}'", id);
            } else {
                store.register_quiz(&id)?;
                println!("Quiz registry updated to include '{}'", id);
            }
            Ok(())
        }
    }
}
