pub mod ci;
pub mod clean;
pub mod dedupe;
pub mod init;
pub mod install;
pub mod list;
pub mod outdated;
pub mod prune;
pub mod remove;
pub mod run;
pub mod start;
pub mod update;

pub use ci::CiHandler;
pub use clean::CleanHandler;
pub use dedupe::DedupeHandler;
pub use init::InitHandler;
pub use install::InstallHandler;
pub use list::ListHandler;
pub use outdated::OutdatedHandler;
pub use prune::PruneHandler;
pub use remove::RemoveHandler;
pub use run::RunHandler;
pub use start::StartHandler;
pub use update::UpdateHandler;
