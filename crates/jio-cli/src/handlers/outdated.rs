use anyhow::Result;
use owo_colors::OwoColorize;

use jio_core::{Config, Orchestrator};

pub struct OutdatedHandler;

impl OutdatedHandler {
    pub fn handle_outdated() -> Result<()> {
        let rt = tokio::runtime::Runtime::new()?;
        let orchestrator = Orchestrator::new(Config::load(std::path::Path::new(".")));
        let entries = rt.block_on(orchestrator.outdated(std::path::Path::new(".")))?;

        if entries.is_empty() {
            jio_logger::info("No direct dependencies declared.");
            return Ok(());
        }

        println!(
            "{:<30} {:<15} {:<15} {:<15}",
            "Package".bold(),
            "Current".bold(),
            "Wanted".bold(),
            "Latest".bold()
        );
        for entry in entries {
            let current = entry.current.as_deref().unwrap_or("-");
            let wanted = entry.wanted.as_deref().unwrap_or("-");
            let latest = entry.latest.as_deref().unwrap_or("-");
            let is_outdated = entry.current.as_deref() != entry.latest.as_deref();
            let name = if is_outdated { entry.name.yellow().to_string() } else { entry.name.clone() };
            println!("{name:<30} {current:<15} {wanted:<15} {latest:<15}");
        }
        Ok(())
    }
}
