//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `classify` - Classify a message, optionally recording it (classify, record)
//! - `ledger` - Ledger management (init)
//! - `ai` - AI backend commands (test)
//! - `prompts` - Prompt library management commands

pub mod ai;
pub mod classify;
pub mod ledger;
pub mod prompts;

// Re-export command functions for main.rs
pub use ai::*;
pub use classify::*;
pub use ledger::*;
pub use prompts::*;

use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use gesso_core::config::Config;
use gesso_core::models::{EventKind, FinancialEvent};
use gesso_core::AIClient;

/// Resolve configuration layers plus the `--ledger-dir` flag
pub fn load_config(config_path: Option<&Path>, ledger_dir: Option<&Path>) -> Result<Config> {
    let mut config = Config::load(config_path).context("Failed to load configuration")?;
    if let Some(dir) = ledger_dir {
        config.ledger.dir = dir.to_path_buf();
    }
    Ok(config)
}

/// Message from the argument, else everything on `input`
pub fn read_message(text: Option<&str>, mut input: impl Read) -> Result<String> {
    let message = match text {
        Some(text) => text.to_string(),
        None => {
            let mut buf = String::new();
            input
                .read_to_string(&mut buf)
                .context("Failed to read message from stdin")?;
            buf
        }
    };

    if message.trim().is_empty() {
        bail!("Empty message");
    }
    Ok(message)
}

/// Configured AI client, unless running offline or no backend is set up
pub fn ai_client(config: &Config, offline: bool) -> Option<AIClient> {
    if offline {
        return None;
    }
    let client = AIClient::from_config(&config.ai);
    if client.is_none() {
        tracing::debug!("No AI backend configured, using rules only");
    }
    client
}

fn kind_emoji(kind: EventKind) -> &'static str {
    match kind {
        EventKind::Receita => "💰",
        EventKind::DespesaServico => "🔧",
        EventKind::DespesaPessoal => "🏠",
        EventKind::Despesa => "❓",
        EventKind::NaoClassificado => "⚠️",
    }
}

/// Confirmation block for one event (1-based `idx`)
pub fn format_event(event: &FinancialEvent, idx: usize) -> String {
    let mut lines = vec![format!(
        "{} Evento {} - {}",
        kind_emoji(event.kind),
        idx,
        event.kind.label()
    )];

    if let Some(amount) = &event.amount {
        lines.push(format!("  💵 Valor: R$ {}", amount));
    }
    if let Some(counterparty) = &event.counterparty {
        lines.push(format!("  👤 Cliente: {}", counterparty));
    }
    if !event.tags.is_empty() {
        lines.push(format!("  🏷  Tags: {}", event.tags.join(" · ")));
    }
    if !event.weekdays.is_empty() {
        lines.push(format!("  📅 Dia(s): {}", event.weekdays.join(", ")));
    }
    if !event.description.is_empty() {
        lines.push(format!("  📝 Desc: {}", event.description));
    }
    if let Some(advisory) = &event.advisory {
        lines.push(format!("  ⚠️  Aviso: {}", advisory));
    }

    lines.join("\n")
}
