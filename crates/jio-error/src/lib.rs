use std::fmt;

/// The error taxonomy shared by every component. Each component boundary returns
/// `Result<T>` rather than propagating library errors (`reqwest`, `serde_json`,
/// `std::io`) directly; those are wrapped into a variant here at the point they
/// cross into this crate's API.
#[derive(Debug)]
pub enum PackageManagerError {
    /// `package.json` fails to parse or is missing a required field.
    BadManifest(String),
    /// A version string does not match the accepted grammar.
    BadVersion(String),
    /// A range string does not match the accepted grammar.
    BadRange(String),
    /// No such package name on the registry.
    NotFound(String),
    /// The registry knows the package but not the requested version.
    NoVersion(String, String),
    /// No published version satisfies a range.
    NoMatch(String, String),
    /// Transport-level failure talking to the registry.
    Network(String),
    /// 401/403 from the registry; not retried.
    Auth(String),
    /// Recomputed digest does not match the recorded integrity string.
    Integrity(String, String),
    /// Filesystem failure.
    Io(String),
    /// Lock file failed to parse, or is internally inconsistent.
    Lock(String),
    /// Failed to acquire the per-key store lock.
    Concurrent(String),
    /// Operation was cancelled by the caller.
    Cancelled,
    /// `package.json` already exists where `init` was asked to create one.
    PackageJsonExists(String),
    /// A requested package/version spec could not be parsed.
    InvalidPackageSpec(String),
    /// Linking a resolved package into `node_modules/` failed.
    LinkingFailed(String, String),
}

impl fmt::Display for PackageManagerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadManifest(msg) => write!(f, "bad manifest: {msg}"),
            Self::BadVersion(v) => write!(f, "bad version: {v}"),
            Self::BadRange(r) => write!(f, "bad range: {r}"),
            Self::NotFound(name) => write!(f, "package '{name}' not found"),
            Self::NoVersion(name, version) => {
                write!(f, "no version '{version}' for package '{name}'")
            }
            Self::NoMatch(name, range) => {
                write!(f, "no version of '{name}' satisfies '{range}'")
            }
            Self::Network(msg) => write!(f, "network error: {msg}"),
            Self::Auth(msg) => write!(f, "authentication error: {msg}"),
            Self::Integrity(name, version) => {
                write!(f, "integrity check failed for {name}@{version}")
            }
            Self::Io(msg) => write!(f, "io error: {msg}"),
            Self::Lock(msg) => write!(f, "lock file error: {msg}"),
            Self::Concurrent(msg) => write!(f, "could not acquire store lock: {msg}"),
            Self::Cancelled => write!(f, "operation cancelled"),
            Self::PackageJsonExists(path) => {
                write!(f, "package.json already exists at {path}")
            }
            Self::InvalidPackageSpec(spec) => {
                write!(f, "invalid package specification: {spec}")
            }
            Self::LinkingFailed(name, reason) => {
                write!(f, "failed to link package '{name}': {reason}")
            }
        }
    }
}

impl std::error::Error for PackageManagerError {}

impl From<anyhow::Error> for PackageManagerError {
    fn from(err: anyhow::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<std::io::Error> for PackageManagerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PackageManagerError {
    fn from(err: serde_json::Error) -> Self {
        Self::BadManifest(err.to_string())
    }
}

/// Process exit code this error should map to, per the orchestrator convention.
impl PackageManagerError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Cancelled => 130,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, PackageManagerError>;
