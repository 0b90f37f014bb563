use anyhow::Result;
use owo_colors::OwoColorize;

use jio_core::{Config, Orchestrator};

pub struct PruneHandler;

impl PruneHandler {
    pub fn handle_prune(production: bool) -> Result<()> {
        println!("{} {}", "jio".bright_cyan().bold(), "prune".bright_white());
        println!();

        let orchestrator = Orchestrator::new(Config::load(std::path::Path::new(".")));
        orchestrator.prune(std::path::Path::new("."), production)?;
        Ok(())
    }
}
