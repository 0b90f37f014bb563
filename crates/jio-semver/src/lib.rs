//! Version parsing and npm-compatible range evaluation.
//!
//! A `Version` is `semver::Version` reused as-is (it already implements the
//! triple/prerelease/build-metadata model and ordering this component needs).
//! `VersionRange` is a union of AND-clauses (`Range`), matching the grammar's
//! `||` union over comma/whitespace-joined comparator clauses.

pub mod comparators;
pub mod version_utils;

pub use comparators::{Comparator, Range};
pub use semver::Version;

use jio_error::{PackageManagerError, Result};

/// A full range expression: a union (`||`) of AND-clauses.
#[derive(Debug, Clone)]
pub struct VersionRange {
    pub clauses: Vec<Range>,
    source: String,
}

impl VersionRange {
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn matches(&self, version: &Version) -> bool {
        self.clauses.iter().any(|clause| clause.matches(version))
    }
}

/// Ranges that are not ordinary semver grammar and must be resolved by a
/// higher layer (the registry's dist-tags, or the resolver's workspace map)
/// before a `VersionRange` can even be constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialRange {
    /// The `latest` dist-tag.
    Latest,
    /// `workspace:<spec>` — an in-repo workspace reference.
    Workspace(String),
}

/// Recognise `latest` and `workspace:<spec>` before attempting grammar parsing.
#[must_use]
pub fn parse_special(range_str: &str) -> Option<SpecialRange> {
    let trimmed = range_str.trim();
    if trimmed == "latest" {
        return Some(SpecialRange::Latest);
    }
    trimmed
        .strip_prefix("workspace:")
        .map(|spec| SpecialRange::Workspace(spec.to_string()))
}

/// Parse a single version string. Does not accept partial versions or
/// wildcards — use [`version_utils::parse_partial_version`] for those.
pub fn parse_version(version_str: &str) -> Result<Version> {
    Version::parse(version_str.trim())
        .map_err(|e| PackageManagerError::BadVersion(format!("{version_str}: {e}")))
}

/// Parse an npm-compatible range expression.
pub fn parse_range(range_str: &str) -> Result<VersionRange> {
    let trimmed = range_str.trim();

    if parse_special(trimmed).is_some() {
        return Err(PackageManagerError::BadRange(format!(
            "'{trimmed}' is a special range and must be resolved before semver parsing"
        )));
    }

    if trimmed.is_empty() || trimmed == "*" {
        return Ok(VersionRange {
            clauses: vec![Range::wildcard()],
            source: trimmed.to_string(),
        });
    }

    let clauses = trimmed
        .split("||")
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(comparators::parse_range_clause)
        .collect::<Result<Vec<_>>>()?;

    if clauses.is_empty() {
        return Ok(VersionRange {
            clauses: vec![Range::wildcard()],
            source: trimmed.to_string(),
        });
    }

    Ok(VersionRange {
        clauses,
        source: trimmed.to_string(),
    })
}

#[must_use]
pub fn satisfies(range: &VersionRange, version: &Version) -> bool {
    range.matches(version)
}

/// Total ordering, deferring to `semver::Version`'s own `Ord`, which already
/// implements: lexicographic triple order; a release outranks any prerelease
/// of the same triple; prerelease segments compare numerically when both
/// numeric, else lexicographically.
#[must_use]
pub fn compare(a: &Version, b: &Version) -> std::cmp::Ordering {
    a.cmp(b)
}

/// A prerelease candidate is eligible only when the range explicitly names
/// the *same* `(major, minor, patch)` triple with a prerelease segment
/// somewhere in its source text, or the caller passes `allow_prerelease`.
fn prerelease_eligible(range: &VersionRange, version: &Version, allow_prerelease: bool) -> bool {
    if version.pre.is_empty() {
        return true;
    }
    if allow_prerelease {
        return true;
    }
    range.source.contains('-')
        && range.clauses.iter().any(|clause| {
            clause.comparators.iter().any(|c| {
                matches!(
                    c,
                    Comparator::Exact(v)
                    | Comparator::GreaterThanOrEqual(v)
                    | Comparator::LessThanOrEqual(v)
                    | Comparator::GreaterThan(v)
                    | Comparator::LessThan(v)
                    | Comparator::Compatible(v)
                    | Comparator::Tilde(v)
                        if v.major == version.major
                            && v.minor == version.minor
                            && v.patch == version.patch
                )
            })
        })
}

/// Highest version satisfying `range` among `candidates`, applying the
/// prerelease-eligibility rule above. Ties (there are none among distinct
/// versions) are impossible since `Version` totally orders; when candidates
/// carry equal precedence the first encountered wins.
#[must_use]
pub fn max_satisfying(
    range: &VersionRange,
    candidates: &[Version],
    allow_prerelease: bool,
) -> Option<Version> {
    candidates
        .iter()
        .filter(|v| range.matches(v) && prerelease_eligible(range, v, allow_prerelease))
        .max_by(|a, b| compare(a, b))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        parse_version(s).expect("valid literal")
    }

    #[test]
    fn boundary_caret_0x() {
        let r = parse_range("^0.0.3").expect("parses");
        assert!(satisfies(&r, &v("0.0.3")));
        assert!(!satisfies(&r, &v("0.0.4")));
    }

    #[test]
    fn boundary_tilde_partial() {
        let r = parse_range("~1.2").expect("parses");
        assert!(satisfies(&r, &v("1.2.9")));
        assert!(!satisfies(&r, &v("1.3.0")));
    }

    #[test]
    fn prerelease_ordering() {
        assert_eq!(compare(&v("1.0.0-alpha"), &v("1.0.0-alpha.1")), std::cmp::Ordering::Less);
        assert_eq!(compare(&v("1.0.0-alpha.1"), &v("1.0.0")), std::cmp::Ordering::Less);
    }

    #[test]
    fn max_satisfying_prefers_highest_non_prerelease() {
        let r = parse_range("^1.3.0").expect("parses");
        let candidates = vec![v("1.1.0"), v("1.2.0"), v("1.3.0"), v("1.3.1"), v("2.0.0")];
        assert_eq!(max_satisfying(&r, &candidates, false), Some(v("1.3.1")));
    }

    #[test]
    fn max_satisfying_excludes_prerelease_unless_named() {
        let r = parse_range("^1.0.0").expect("parses");
        let candidates = vec![v("1.0.0"), v("1.1.0-beta.1")];
        assert_eq!(max_satisfying(&r, &candidates, false), Some(v("1.0.0")));

        let r2 = parse_range("1.1.0-beta").expect("parses");
        let candidates2 = vec![v("1.0.0"), v("1.1.0-beta.1")];
        assert_eq!(max_satisfying(&r2, &candidates2, false), Some(v("1.1.0-beta.1")));
    }

    #[test]
    fn special_ranges_recognised() {
        assert_eq!(parse_special("latest"), Some(SpecialRange::Latest));
        assert_eq!(
            parse_special("workspace:^1.0.0"),
            Some(SpecialRange::Workspace("^1.0.0".to_string()))
        );
        assert_eq!(parse_special("^1.0.0"), None);
    }
}
