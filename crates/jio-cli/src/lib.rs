pub mod commands;
pub mod handlers;

use anyhow::Result;
use clap::Parser;

use commands::{Cli, Commands};
use handlers::*;

pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logger (quiet mode for now, could be a flag later)
    jio_logger::init_logger(false);

    match &cli.command {
        Commands::Install {
            packages,
            dev,
            optional,
            peer,
            save_exact,
            debug,
        } => {
            if packages.is_empty() {
                InstallHandler::handle_install_all(*debug)
            } else {
                InstallHandler::handle_install_packages(packages, *dev, *optional, *peer, *save_exact, *debug)
            }
        }
        Commands::Ci { debug } => CiHandler::handle_ci(*debug),
        Commands::Init { yes } => InitHandler::handle_init_project(yes),
        Commands::Run { script } => RunHandler::handle_run_script(script),
        Commands::Start => StartHandler::handle_start(),
        Commands::Remove { packages, debug } => RemoveHandler::handle_remove_packages(packages, *debug),
        Commands::Update { packages, latest, debug } => {
            UpdateHandler::handle_update_packages(packages, *latest, *debug)
        }
        Commands::List { tree, depth } => ListHandler::handle_list_dependencies(*tree, *depth),
        Commands::Dedupe => DedupeHandler::handle_dedupe(),
        Commands::Prune { production } => PruneHandler::handle_prune(*production),
        Commands::Outdated => OutdatedHandler::handle_outdated(),
        Commands::Clean { cache, modules, yes } => CleanHandler::handle_clean(*cache, *modules, *yes, false),
    }
}
