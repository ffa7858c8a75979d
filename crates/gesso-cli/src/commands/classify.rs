//! Classification command implementations

use anyhow::{Context, Result};
use gesso_core::config::Config;
use gesso_core::ledger::{record_events, CsvLedger};
use gesso_core::models::{FinancialEvent, RawMessage};
use gesso_core::Engine;

use super::{ai_client, format_event};

/// Run the full pipeline on one message
pub async fn classify_message(
    config: &Config,
    message: &RawMessage,
    offline: bool,
) -> Result<Vec<FinancialEvent>> {
    let engine = Engine::portuguese().context("Failed to build classification engine")?;
    let ai = ai_client(config, offline);
    Ok(engine.classify(message, ai.as_ref()).await)
}

/// Classify a message and print the events
pub async fn cmd_classify(config: &Config, text: &str, json: bool, offline: bool) -> Result<()> {
    let message = RawMessage::new(text);
    let events = classify_message(config, &message, offline).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&events)?);
        return Ok(());
    }

    if events.is_empty() {
        println!("⚠️  Nenhuma informação financeira reconhecida.");
        return Ok(());
    }

    let blocks: Vec<String> = events
        .iter()
        .enumerate()
        .map(|(i, e)| format_event(e, i + 1))
        .collect();
    println!("{}", blocks.join("\n\n"));

    Ok(())
}

/// Classify a message and append its events to the ledger
pub async fn cmd_record(config: &Config, text: &str, offline: bool) -> Result<()> {
    let message = RawMessage::new(text);
    let events = classify_message(config, &message, offline).await?;

    if events.is_empty() {
        println!("⚠️  Nenhuma informação financeira reconhecida.");
        return Ok(());
    }

    for (i, event) in events.iter().enumerate() {
        println!("{}\n", format_event(event, i + 1));
    }

    let ledger = CsvLedger::new(&config.ledger.dir);
    let summary = record_events(&ledger, &events, &message);

    if summary.is_complete() {
        println!(
            "✅ {} registro(s) salvo(s) em {}",
            summary.saved.len(),
            ledger.dir().display()
        );
    } else {
        println!("❌ Erro ao salvar no livro-caixa:");
        for error in &summary.errors {
            println!("   {}", error);
        }
        if !summary.saved.is_empty() {
            println!("   ({} registro(s) salvo(s))", summary.saved.len());
        }
    }

    Ok(())
}
