use anyhow::Result;
use owo_colors::OwoColorize;

use jio_core::{Config, Orchestrator};
use jio_manifest::DependencyType;
use jio_utils::parse_package_spec;

pub struct InstallHandler;

impl InstallHandler {
    pub fn handle_install_all(debug: bool) -> Result<()> {
        println!("{} {}", "jio".bright_cyan().bold(), "install".bright_white());
        println!();
        jio_logger::debug("running fresh install", debug);

        let rt = tokio::runtime::Runtime::new()?;
        let orchestrator = Orchestrator::new(Config::load(std::path::Path::new(".")));
        rt.block_on(orchestrator.install(std::path::Path::new(".")))?;
        Ok(())
    }

    pub fn handle_install_packages(
        packages: &[String],
        dev: bool,
        optional: bool,
        peer: bool,
        save_exact: bool,
        debug: bool,
    ) -> Result<()> {
        let dep_type = Self::determine_dependency_type(dev, optional, peer);
        let rt = tokio::runtime::Runtime::new()?;
        let orchestrator = Orchestrator::new(Config::load(std::path::Path::new(".")));

        for pkg in packages {
            let (name, version_range) = parse_package_spec(pkg);
            Self::print_install_header(pkg);
            jio_logger::debug(&format!("adding {name}@{version_range}"), debug);

            rt.block_on(orchestrator.install_add(
                std::path::Path::new("."),
                &name,
                &version_range,
                dep_type,
                save_exact,
            ))?;
        }

        Ok(())
    }

    fn determine_dependency_type(dev: bool, optional: bool, peer: bool) -> DependencyType {
        if dev {
            DependencyType::DevDependencies
        } else if optional {
            DependencyType::OptionalDependencies
        } else if peer {
            DependencyType::PeerDependencies
        } else {
            DependencyType::Dependencies
        }
    }

    fn print_install_header(package: &str) {
        println!("{} {} {}", "jio".bright_cyan().bold(), "add".bright_white(), package.bright_white());
        println!();
    }
}
