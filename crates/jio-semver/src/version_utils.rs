use jio_error::{PackageManagerError, Result};
use semver::Version;

/// Parse a version string that may be partial (`"1"`, `"1.2"`) or use an `x`/`X`
/// wildcard component (`"1.x"`, `"1.2.x"`). Missing/wildcard components default
/// to zero; callers that need the original specificity (to compute an upper
/// bound for tilde/caret-style ranges) should inspect the string themselves
/// before calling this.
pub fn parse_partial_version(version_str: &str) -> Result<Version> {
    let cleaned = version_str.trim();

    if cleaned.is_empty() || cleaned == "*" {
        return Ok(Version::new(0, 0, 0));
    }

    if let Ok(version) = Version::parse(cleaned) {
        return Ok(version);
    }

    let parts: Vec<&str> = cleaned.split('.').collect();
    let parse_component = |s: &str| -> Result<u64> {
        if s.eq_ignore_ascii_case("x") || s == "*" {
            Ok(0)
        } else {
            s.parse::<u64>()
                .map_err(|_| PackageManagerError::BadVersion(version_str.to_string()))
        }
    };

    match parts.as_slice() {
        [major] => Ok(Version::new(parse_component(major)?, 0, 0)),
        [major, minor] => Ok(Version::new(parse_component(major)?, parse_component(minor)?, 0)),
        [major, minor, patch, ..] => {
            let patch_clean = patch.split(['-', '+']).next().unwrap_or(patch);
            let suffix = &patch[patch_clean.len()..];
            let base = format!(
                "{}.{}.{}{}",
                parse_component(major)?,
                parse_component(minor)?,
                parse_component(patch_clean)?,
                suffix
            );
            Version::parse(&base)
                .map_err(|e| PackageManagerError::BadVersion(format!("{version_str}: {e}")))
        }
        [] => Ok(Version::new(0, 0, 0)),
    }
}

/// True when a version component string is a wildcard (`x`, `X`, `*`, or absent).
pub fn is_wildcard_component(s: &str) -> bool {
    s.is_empty() || s.eq_ignore_ascii_case("x") || s == "*"
}

/// How many leading dot-separated components of `version_str` are concrete
/// (non-wildcard) numbers, capped at 3. `"1"` -> 1, `"1.2"` -> 2, `"1.2.3"` -> 3,
/// `"1.x"` -> 1, `"*"` -> 0.
pub fn specificity(version_str: &str) -> usize {
    version_str
        .trim()
        .split('.')
        .take(3)
        .take_while(|p| !is_wildcard_component(p))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_components() {
        assert_eq!(parse_partial_version("1").unwrap(), Version::new(1, 0, 0));
        assert_eq!(parse_partial_version("1.2").unwrap(), Version::new(1, 2, 0));
        assert_eq!(
            parse_partial_version("1.2.3").unwrap(),
            Version::new(1, 2, 3)
        );
    }

    #[test]
    fn wildcard_components_default_to_zero() {
        assert_eq!(parse_partial_version("1.x").unwrap(), Version::new(1, 0, 0));
        assert_eq!(parse_partial_version("*").unwrap(), Version::new(0, 0, 0));
    }

    #[test]
    fn specificity_counts_concrete_components() {
        assert_eq!(specificity("1.2.3"), 3);
        assert_eq!(specificity("1.2"), 2);
        assert_eq!(specificity("1.x"), 1);
        assert_eq!(specificity("*"), 0);
    }
}
