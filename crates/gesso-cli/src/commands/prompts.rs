//! Prompts-related command implementations

use anyhow::{Context, Result};
use gesso_core::ai::render_extraction_prompt;
use gesso_core::prompts::{default_prompts_dir, PromptId, PromptLibrary};
use gesso_core::Engine;

/// List prompts with their source and any placeholders nobody fills in
pub fn cmd_prompts_list() -> Result<()> {
    let mut library = PromptLibrary::new();

    println!("📝 Prompts\n");
    println!("{:<16} {:>7}  {:<8}  {}", "ID", "VERSION", "SOURCE", "VARIABLES");
    println!("{}", "-".repeat(60));

    for info in library.list() {
        let source = if info.has_override { "override" } else { "default" };
        let supplied = info
            .id
            .parse::<PromptId>()
            .map(|id| id.supplied_variables().join(", "))
            .unwrap_or_default();

        println!(
            "{:<16} {:>7}  {:<8}  {}",
            info.id, info.version, source, supplied
        );
        if let Some(path) = &info.override_path {
            println!("{:<16} ↳ {}", "", path.display());
        }
        if !info.unknown_variables.is_empty() {
            println!(
                "{:<16} ⚠️  unknown placeholders sent verbatim: {}",
                "",
                info.unknown_variables.join(", ")
            );
        }
    }

    println!();
    match default_prompts_dir() {
        Some(dir) => println!("Overrides: {}/<id>.md", dir.display()),
        None => println!("Overrides: (data directory not available)"),
    }

    Ok(())
}

/// Show a prompt, or render it for `message` the way a backend would send it
pub fn cmd_prompts_show(prompt_id: &str, message: Option<&str>) -> Result<()> {
    let mut library = PromptLibrary::new();

    let id: PromptId = match prompt_id.parse() {
        Ok(id) => id,
        Err(_) => {
            eprintln!("Unknown prompt ID: {}", prompt_id);
            eprintln!();
            eprintln!("Available prompts:");
            for id in PromptId::all() {
                eprintln!("  - {}", id.as_str());
            }
            return Ok(());
        }
    };

    let Some(message) = message else {
        let prompt = library.get(id)?;
        println!(
            "Prompt: {} v{} ({})",
            prompt.metadata.id,
            prompt.metadata.version,
            if prompt.is_override { "override" } else { "default" }
        );
        if let Some(path) = &prompt.override_path {
            println!("Path: {}", path.display());
        }
        println!("Variables: {}", prompt.variables().join(", "));
        println!();
        println!("{}", prompt.content);
        return Ok(());
    };

    let engine = Engine::portuguese().context("Failed to build classification engine")?;
    let rules = engine.classify_rules(message);
    let flagged: Vec<String> = rules
        .inconclusive
        .iter()
        .filter_map(|&i| rules.spans.get(i).map(|s| s.text.clone()))
        .collect();

    if flagged.is_empty() {
        println!("ℹ️  Every span is conclusive; no request would be sent for this message.\n");
    }

    let rendered = render_extraction_prompt(&mut library, message, &flagged)?;
    if let Some(system) = &rendered.system {
        println!("--- System ---");
        println!("{}\n", system);
    }
    println!("--- User ---");
    println!("{}", rendered.user);

    Ok(())
}

/// Show the path where prompt overrides should be placed
pub fn cmd_prompts_path() -> Result<()> {
    match default_prompts_dir() {
        Some(path) => {
            println!("{}", path.display());

            if !path.exists() {
                eprintln!();
                eprintln!("Note: This directory does not exist yet.");
                eprintln!("Create it to start adding custom prompts.");
            }
        }
        None => {
            eprintln!("Could not determine prompts directory.");
            eprintln!("The data directory is not available on this system.");
        }
    }

    Ok(())
}
