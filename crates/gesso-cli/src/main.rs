//! Gesso CLI - Free-text financial message classifier
//!
//! Usage:
//!   gesso classify "Quinta recebi 2.500 da Ana."   Print the events found
//!   gesso record "Comprei tinta por 250 reais."    Append events to the ledger
//!   gesso ledger init                              Create ledger sheets
//!   gesso ai test                                  Check the AI backend

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.config.as_deref(), cli.ledger_dir.as_deref())?;

    match cli.command {
        Commands::Classify {
            text,
            json,
            offline,
        } => {
            let message = commands::read_message(text.as_deref(), std::io::stdin().lock())?;
            commands::cmd_classify(&config, &message, json, offline).await
        }
        Commands::Record { text, offline } => {
            let message = commands::read_message(text.as_deref(), std::io::stdin().lock())?;
            commands::cmd_record(&config, &message, offline).await
        }
        Commands::Ledger { action } => match action {
            LedgerAction::Init => commands::cmd_ledger_init(&config),
        },
        Commands::Ai { action } => match action {
            AiAction::Test { message } => commands::cmd_ai_test(&config, message.as_deref()).await,
        },
        Commands::Prompts { action } => match action {
            None | Some(PromptsAction::List) => commands::cmd_prompts_list(),
            Some(PromptsAction::Show { prompt_id, message }) => {
                commands::cmd_prompts_show(&prompt_id, message.as_deref())
            }
            Some(PromptsAction::Path) => commands::cmd_prompts_path(),
        },
    }
}
