pub const USER_AGENT: &str = "jio/0.1.0";
pub const MAX_ATTEMPTS: u32 = 4;
pub const DEFAULT_REGISTRY: &str = "https://registry.npmjs.org";
pub const DEFAULT_MAX_CONCURRENT_DOWNLOADS: usize = 10;
pub const NATIVE_LOCKFILE_NAME: &str = "jio-lock.json";
pub const STORE_DIRNAME: &str = ".jio/store";

/// Exit codes, per the orchestrator convention.
pub const EXIT_OK: i32 = 0;
pub const EXIT_GENERIC_ERROR: i32 = 1;
pub const EXIT_TIMEOUT: i32 = 124;
pub const EXIT_CANCELLED: i32 = 130;

pub const BIN_NAME: &str = "jio";
pub const VERSION: &str = "0.1.0";
pub const DESCRIPTION: &str = "jio - a fast package manager for JavaScript/TypeScript";
pub const REPOSITORY_URL: &str = "https://github.com/jio-pm/jio";

/// `(command, description, aliases)`, rendered by the CLI's custom help text.
pub const COMMANDS: &[(&str, &str, &[&str])] = &[
    ("install", "Installs all dependencies, or adds named packages", &["i", "add"]),
    ("ci", "Installs strictly from the lock file", &[]),
    ("init", "Initializes a new package.json file", &["new"]),
    ("run", "Runs a script defined in package.json", &["r"]),
    ("start", "Runs the package's start script", &[]),
    ("remove", "Removes packages", &["rm", "uninstall"]),
    ("update", "Updates packages to the highest satisfying version", &["up", "upgrade"]),
    ("list", "Lists installed packages", &["ls"]),
    ("dedupe", "Collapses duplicate placements in node_modules", &[]),
    ("prune", "Removes node_modules placements with no lock entry", &[]),
    ("outdated", "Reports current/wanted/latest for each dependency", &[]),
    ("clean", "Removes cached packages and/or node_modules", &[]),
];

/// `(example invocation, description)`.
pub const EXAMPLES: &[(&str, &str)] = &[
    ("jio install", "Install every dependency from package.json"),
    ("jio add lodash", "Add lodash as a dependency"),
    ("jio add -D typescript", "Add typescript as a devDependency"),
    ("jio ci", "Reproducible install straight from the lock file"),
    ("jio update --latest", "Update every dependency to its latest version"),
    ("jio remove lodash", "Remove lodash"),
];

pub const POPULAR_PACKAGES: &[&str] = &[
    "react",
    "vue",
    "angular",
    "express",
    "lodash",
    "axios",
    "typescript",
    "webpack",
    "babel-core",
    "eslint",
    "prettier",
    "jest",
    "mocha",
    "chai",
    "moment",
    "dotenv",
    "cors",
    "helmet",
    "bcrypt",
    "jsonwebtoken",
];
