use anyhow::Result;
use owo_colors::OwoColorize;

use jio_core::{Config, Orchestrator};

pub struct RemoveHandler;

impl RemoveHandler {
    pub fn handle_remove_packages(packages: &[String], debug: bool) -> Result<()> {
        if packages.is_empty() {
            return Ok(());
        }

        Self::print_remove_header(packages);
        jio_logger::debug(&format!("removing {}", packages.join(", ")), debug);

        let orchestrator = Orchestrator::new(Config::load(std::path::Path::new(".")));
        for pkg in packages {
            orchestrator.uninstall(std::path::Path::new("."), pkg)?;
        }

        Ok(())
    }

    fn print_remove_header(packages: &[String]) {
        println!(
            "{} {} {}",
            "jio".bright_cyan().bold(),
            "remove".bright_white(),
            packages.join(" ").bright_white()
        );
        println!();
    }
}
