use anyhow::Result;
use owo_colors::OwoColorize;

use jio_core::{Config, Orchestrator};

pub struct CiHandler;

impl CiHandler {
    pub fn handle_ci(debug: bool) -> Result<()> {
        println!("{} {}", "jio".bright_cyan().bold(), "ci".bright_white());
        println!();
        jio_logger::debug("installing strictly from lock file", debug);

        let rt = tokio::runtime::Runtime::new()?;
        let orchestrator = Orchestrator::new(Config::load(std::path::Path::new(".")));
        rt.block_on(orchestrator.ci(std::path::Path::new(".")))?;
        Ok(())
    }
}
