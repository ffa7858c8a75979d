//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Gesso - Turn free-text money messages into ledger entries
#[derive(Parser)]
#[command(name = "gesso")]
#[command(about = "Classify Portuguese financial messages into ledger events", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config override file (default: ~/.local/share/gesso/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Ledger directory (overrides config and GESSO_LEDGER_DIR)
    #[arg(long, global = true)]
    pub ledger_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify a message and print the events found
    Classify {
        /// Message text (read from stdin when omitted)
        text: Option<String>,

        /// Print events as JSON
        #[arg(long)]
        json: bool,

        /// Rules only, never call the AI backend
        #[arg(long)]
        offline: bool,
    },

    /// Classify a message and append its events to the ledger
    Record {
        /// Message text (read from stdin when omitted)
        text: Option<String>,

        /// Rules only, never call the AI backend
        #[arg(long)]
        offline: bool,
    },

    /// Manage the ledger
    Ledger {
        #[command(subcommand)]
        action: LedgerAction,
    },

    /// Test the configured AI backend
    Ai {
        #[command(subcommand)]
        action: AiAction,
    },

    /// Manage AI prompts (list, show, customize)
    Prompts {
        #[command(subcommand)]
        action: Option<PromptsAction>,
    },
}

#[derive(Subcommand)]
pub enum LedgerAction {
    /// Create every sheet with its header
    Init,
}

#[derive(Subcommand)]
pub enum AiAction {
    /// Check the backend and run a sample extraction
    Test {
        /// Message to extract events from
        #[arg(long)]
        message: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum PromptsAction {
    /// List all available prompts and their override status
    List,

    /// Show the content of a specific prompt
    Show {
        /// Prompt ID (e.g., extract_events)
        prompt_id: String,

        /// Render the prompt as it would be sent for this message
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Show the path where prompt overrides should be placed
    Path,
}
