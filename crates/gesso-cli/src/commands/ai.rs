//! AI backend command implementations

use anyhow::{Context, Result};
use gesso_core::ai::{AIBackend, AIClient};
use gesso_core::config::{BackendKind, Config};
use gesso_core::Engine;

const SAMPLE_MESSAGE: &str =
    "Paguei 500 hoje e segunda marquei visita com o cliente, comprei uns 80 de material";

/// Check the configured backend and run one extraction
pub async fn cmd_ai_test(config: &Config, message: Option<&str>) -> Result<()> {
    println!("🔍 Testing AI backend...\n");
    println!("  Backend: {}", config.ai.backend);

    let Some(client) = AIClient::from_config(&config.ai) else {
        match config.ai.backend {
            BackendKind::None => println!("\n⚠️  AI backend disabled (backend = none)"),
            kind => {
                let var = match kind {
                    BackendKind::OpenAICompatible => "OPENAI_COMPATIBLE_HOST",
                    _ => "OLLAMA_HOST",
                };
                println!("\n⚠️  No host configured for {}", kind);
                println!("\nSet [ai] host in the config file or export {}", var);
            }
        }
        return Ok(());
    };

    println!("  Host: {}", client.host());
    println!("  Model: {}", client.model());
    println!("  Timeout: {}s\n", config.ai.timeout_secs);

    print!("Checking availability... ");
    if client.health_check().await {
        println!("✅ Connected");
    } else {
        println!("❌ Failed");
        println!("\n⚠️  Could not reach {}", client.host());
        if client.kind() == BackendKind::Ollama {
            println!("\nTo set up Ollama:");
            println!("  1. Install Ollama: https://ollama.ai/download");
            println!("  2. Start the server: ollama serve");
            println!("  3. Pull the model: ollama pull {}", client.model());
        }
        return Ok(());
    }

    let message = message.unwrap_or(SAMPLE_MESSAGE);
    let engine = Engine::portuguese().context("Failed to build classification engine")?;
    let rules = engine.classify_rules(message);
    let flagged: Vec<String> = rules
        .inconclusive
        .iter()
        .filter_map(|&i| rules.spans.get(i).map(|s| s.text.clone()))
        .collect();

    println!("\n📋 Extracting events from \"{}\"", message);
    println!("   {} inconclusive span(s) by rules\n", flagged.len());

    match client.extract_events(message, &flagged).await {
        Ok(events) if events.is_empty() => println!("  (no events returned)"),
        Ok(events) => {
            for (i, event) in events.iter().enumerate() {
                println!(
                    "  {}. {} valor={} tags=[{}] desc={}",
                    i + 1,
                    event.kind,
                    event.amount.as_deref().unwrap_or("-"),
                    event.tags.join(", "),
                    event.description.as_deref().unwrap_or("-")
                );
            }
        }
        Err(e) => println!("  ❌ Error: {}", e),
    }

    println!("\n✅ AI test complete!");
    Ok(())
}
