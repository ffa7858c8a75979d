//! Ledger command implementations

use anyhow::{Context, Result};
use gesso_core::config::Config;
use gesso_core::ledger::{CsvLedger, LedgerSheet, LedgerStore};

/// Create every ledger sheet with its header
pub fn cmd_ledger_init(config: &Config) -> Result<()> {
    let ledger = CsvLedger::new(&config.ledger.dir);
    ledger.initialize().with_context(|| {
        format!(
            "Failed to initialize ledger at {}",
            config.ledger.dir.display()
        )
    })?;

    println!("✅ Ledger ready at {}", ledger.dir().display());
    for sheet in LedgerSheet::all() {
        println!("   {:<18} {}", sheet.title(), ledger.path(*sheet).display());
    }

    Ok(())
}
