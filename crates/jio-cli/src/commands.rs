use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "jio")]
#[command(version = "0.1.0")]
#[command(propagate_version = true)]
#[command(about = "A fast package manager for JavaScript/TypeScript", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Installs all dependencies from package.json, or adds named packages
    #[command(aliases = ["i", "add"])]
    Install {
        /// List of packages to install (e.g. chalk@2.0.0)
        #[arg()]
        packages: Vec<String>,
        /// Install as devDependency
        #[arg(short = 'D', long = "dev", alias = "save-dev")]
        dev: bool,
        /// Install as optionalDependency
        #[arg(short = 'O', long = "optional")]
        optional: bool,
        /// Install as peerDependency
        #[arg(short = 'P', long = "peer")]
        peer: bool,
        /// Save exact version (no caret prefix)
        #[arg(short = 'E', long = "save-exact")]
        save_exact: bool,
        /// Enable debug/verbose logging
        #[arg(long)]
        debug: bool,
    },
    /// Installs strictly from the lock file, without touching the registry
    /// except for blobs the content store is missing
    Ci {
        #[arg(long)]
        debug: bool,
    },
    /// Initializes a new package.json file
    #[command(alias = "new")]
    Init {
        /// Skips interactive prompts and uses defaults
        #[arg(short = 'y', long = "yes")]
        yes: Option<bool>,
    },
    /// Runs a script defined in package.json
    #[command(alias = "r")]
    Run {
        /// The name of the script (e.g. build, test, etc.)
        script: String,
    },
    /// Runs the package's `start` script
    Start,
    /// Removes packages
    #[command(aliases = ["rm", "uninstall"])]
    Remove {
        /// List of packages to remove
        #[arg(required = true)]
        packages: Vec<String>,
        #[arg(long)]
        debug: bool,
    },
    /// Updates packages to the highest version satisfying their declared range
    #[command(aliases = ["up", "upgrade"])]
    Update {
        /// List of packages to update (if empty, updates all direct dependencies)
        #[arg()]
        packages: Vec<String>,
        /// Ignore the current range and jump to each package's latest version
        #[arg(long)]
        latest: bool,
        #[arg(long)]
        debug: bool,
    },
    /// Lists installed packages
    #[command(alias = "ls")]
    List {
        /// Show dependency tree
        #[arg(long)]
        tree: bool,
        /// Limit tree depth
        #[arg(long)]
        depth: Option<u32>,
    },
    /// Collapses duplicate placements in node_modules down to one per name
    Dedupe,
    /// Removes node_modules placements with no corresponding lock entry
    Prune {
        /// Exclude devDependencies from the required set
        #[arg(long)]
        production: bool,
    },
    /// Reports (current, wanted, latest) for each direct dependency
    Outdated,
    /// Removes cached packages and/or the local node_modules directory
    Clean {
        #[arg(long)]
        cache: bool,
        #[arg(long)]
        modules: bool,
        #[arg(short = 'y', long)]
        yes: bool,
    },
}
