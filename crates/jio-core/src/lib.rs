pub mod clean;
pub mod config;
pub mod download;
pub mod init;
pub mod layout;
pub mod list;
pub mod orchestrator;

pub use clean::CleanManager;
pub use config::Config;
pub use init::InitManager;
pub use jio_error::{PackageManagerError, Result};
pub use list::ListManager;
pub use orchestrator::Orchestrator;
pub use orchestrator::outdated::OutdatedEntry;
