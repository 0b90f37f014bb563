use anyhow::Result;
use owo_colors::OwoColorize;

use jio_core::{Config, Orchestrator};

pub struct UpdateHandler;

impl UpdateHandler {
    pub fn handle_update_packages(packages: &[String], latest: bool, debug: bool) -> Result<()> {
        Self::print_update_header();
        jio_logger::debug(&format!("updating {:?} (latest={latest})", packages), debug);

        let rt = tokio::runtime::Runtime::new()?;
        let orchestrator = Orchestrator::new(Config::load(std::path::Path::new(".")));
        rt.block_on(orchestrator.update(std::path::Path::new("."), packages, latest))?;
        Ok(())
    }

    fn print_update_header() {
        println!("{} {}", "jio".bright_cyan().bold(), "update".bright_white());
        println!();
    }
}
