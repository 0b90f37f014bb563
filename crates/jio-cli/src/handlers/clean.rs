use anyhow::Result;
use owo_colors::OwoColorize;

use jio_core::{Config, CleanManager};
use jio_store::ContentStore;

pub struct CleanHandler;

impl CleanHandler {
    pub fn handle_clean(cache: bool, modules: bool, yes: bool, debug: bool) -> Result<()> {
        if !cache && !modules {
            jio_logger::error("Please specify what to clean: --cache, --modules, or both");
            return Ok(());
        }

        Self::print_clean_header();
        let config = Config::load(std::path::Path::new("."));
        let manager = CleanManager::new();

        if cache {
            Self::clean_cache(&manager, &config, yes, debug)?;
        }

        if modules {
            Self::clean_node_modules(&manager, yes, debug)?;
        }

        Ok(())
    }

    fn clean_cache(manager: &CleanManager, config: &Config, yes: bool, debug: bool) -> Result<()> {
        if !yes {
            println!();
            println!(
                "{} {}",
                "⚠️ ".bright_yellow(),
                "CACHE CLEANING WARNING".bright_yellow().bold()
            );
            println!();
            println!(
                "{}",
                "This will remove ALL cached packages from the global store.".bright_red()
            );
            println!(
                "{}",
                "You will need to re-download packages for future installations.".bright_red()
            );
            println!();

            jio_logger::info("Proceeding with cache cleaning...");
        }

        jio_logger::debug("cleaning content store", debug);
        let store = ContentStore::new(config.store_directory.clone());
        Ok(manager.clean_cache(&store)?)
    }

    fn clean_node_modules(manager: &CleanManager, yes: bool, debug: bool) -> Result<()> {
        if !yes {
            println!();
            println!(
                "{} {}",
                "⚠️ ".bright_yellow(),
                "NODE_MODULES CLEANING WARNING".bright_yellow().bold()
            );
            println!();
            println!(
                "{}",
                "This will remove the local node_modules directory.".bright_red()
            );
            println!(
                "{}",
                "You will need to run 'jio install' to restore dependencies.".bright_red()
            );
            println!();

            jio_logger::info("Proceeding with node_modules cleaning...");
        }

        jio_logger::debug("cleaning node_modules", debug);
        Ok(manager.clean_node_modules(".")?)
    }

    fn print_clean_header() {
        println!("{} {}", "jio".bright_cyan().bold(), "clean".bright_white());
        println!();
    }
}
