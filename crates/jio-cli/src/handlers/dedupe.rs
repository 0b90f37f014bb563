use anyhow::Result;
use owo_colors::OwoColorize;

use jio_core::{Config, Orchestrator};

pub struct DedupeHandler;

impl DedupeHandler {
    pub fn handle_dedupe() -> Result<()> {
        println!("{} {}", "jio".bright_cyan().bold(), "dedupe".bright_white());
        println!();

        let orchestrator = Orchestrator::new(Config::load(std::path::Path::new(".")));
        orchestrator.dedupe(std::path::Path::new("."))?;
        Ok(())
    }
}
