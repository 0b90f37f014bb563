use semver::Version;

use crate::version_utils::{is_wildcard_component, parse_partial_version, specificity};
use jio_error::{PackageManagerError, Result};

#[derive(Debug, Clone)]
pub enum Comparator {
    Exact(Version),
    GreaterThan(Version),
    GreaterThanOrEqual(Version),
    LessThan(Version),
    LessThanOrEqual(Version),
    Compatible(Version), // ^
    Tilde(Version),      // ~
    Wildcard,            // *
}

impl Comparator {
    #[must_use]
    pub fn matches(&self, version: &Version) -> bool {
        match self {
            Self::Exact(v) => version == v,
            Self::GreaterThan(v) => version > v,
            Self::GreaterThanOrEqual(v) => version >= v,
            Self::LessThan(v) => version < v,
            Self::LessThanOrEqual(v) => version <= v,
            Self::Wildcard => true,
            Self::Compatible(v) => {
                // ^1.2.3 := >=1.2.3 <2.0.0
                // ^0.2.3 := >=0.2.3 <0.3.0 (major == 0)
                // ^0.0.3 := >=0.0.3 <0.0.4 (major == 0 && minor == 0)
                if version < v {
                    return false;
                }
                if v.major > 0 {
                    version.major == v.major
                } else if v.minor > 0 {
                    version.major == 0 && version.minor == v.minor
                } else {
                    version.major == 0 && version.minor == 0 && version.patch == v.patch
                }
            }
            Self::Tilde(v) => {
                // ~1.2.3 := >=1.2.3 <1.3.0; ~1.2 := >=1.2.0 <1.3.0; ~1 := >=1.0.0 <2.0.0
                if version < v {
                    return false;
                }
                version.major == v.major && version.minor == v.minor
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Range {
    pub comparators: Vec<Comparator>,
}

impl Range {
    #[must_use]
    pub fn new(comparators: Vec<Comparator>) -> Self {
        Self { comparators }
    }

    #[must_use]
    pub fn wildcard() -> Self {
        Self::new(vec![Comparator::Wildcard])
    }

    /// AND-semantics over this clause's comparators.
    #[must_use]
    pub fn matches(&self, version: &Version) -> bool {
        if self.comparators.is_empty() {
            return true;
        }
        self.comparators.iter().all(|comp| comp.matches(version))
    }
}

/// Parse a single range clause (AND logic within the clause), e.g. `">=1.2.3 <2.0.0"`,
/// `"^1.2.3"`, `"1.x"`, `"1.2.3 - 2.0.0"`.
pub fn parse_range_clause(clause: &str) -> Result<Range> {
    let clause = clause.trim();

    if clause.is_empty() || clause == "*" {
        return Ok(Range::wildcard());
    }

    if let Some((low, high)) = split_hyphen_range(clause) {
        return parse_hyphen_range(low, high);
    }

    // A bare wildcard-bearing token with no operator prefix, e.g. "1.x", "1.2.x".
    if !clause.contains(char::is_whitespace)
        && !['>', '<', '=', '^', '~'].contains(&clause.chars().next().unwrap_or(' '))
        && clause.split('.').any(is_wildcard_component)
    {
        return Ok(wildcard_bounds(clause)?);
    }

    let mut comparators = Vec::new();
    let mut remaining = clause;

    while !remaining.is_empty() {
        remaining = remaining.trim();
        if remaining.is_empty() {
            break;
        }

        if let Some(rest) = remaining.strip_prefix(">=") {
            let (version_str, next) = extract_version_and_remaining(rest)?;
            comparators.push(Comparator::GreaterThanOrEqual(parse_partial_version(
                &version_str,
            )?));
            remaining = next;
        } else if let Some(rest) = remaining.strip_prefix("<=") {
            let (version_str, next) = extract_version_and_remaining(rest)?;
            comparators.push(Comparator::LessThanOrEqual(parse_partial_version(
                &version_str,
            )?));
            remaining = next;
        } else if let Some(rest) = remaining.strip_prefix('>') {
            let (version_str, next) = extract_version_and_remaining(rest)?;
            comparators.push(Comparator::GreaterThan(parse_partial_version(
                &version_str,
            )?));
            remaining = next;
        } else if let Some(rest) = remaining.strip_prefix('<') {
            let (version_str, next) = extract_version_and_remaining(rest)?;
            comparators.push(Comparator::LessThan(parse_partial_version(&version_str)?));
            remaining = next;
        } else if let Some(rest) = remaining.strip_prefix('^') {
            let (version_str, next) = extract_version_and_remaining(rest)?;
            comparators.extend(caret_bounds(&version_str)?.comparators);
            remaining = next;
        } else if let Some(rest) = remaining.strip_prefix('~') {
            let (version_str, next) = extract_version_and_remaining(rest)?;
            comparators.extend(tilde_bounds(&version_str)?.comparators);
            remaining = next;
        } else if let Some(rest) = remaining.strip_prefix('=') {
            let (version_str, next) = extract_version_and_remaining(rest)?;
            comparators.push(Comparator::Exact(parse_partial_version(&version_str)?));
            remaining = next;
        } else {
            let (version_str, next) = extract_version_and_remaining(remaining)?;
            if version_str.split('.').any(is_wildcard_component) {
                comparators.extend(wildcard_bounds(&version_str)?.comparators);
            } else {
                comparators.push(Comparator::Exact(parse_partial_version(&version_str)?));
            }
            remaining = next;
        }
    }

    if comparators.is_empty() {
        return Ok(Range::wildcard());
    }

    Ok(Range::new(comparators))
}

/// `^1.2.3`/`^1.2`/`^0.2` expand to an explicit `[>=, <)` bound pair so the
/// caret's "same leading non-zero component" rule holds even when the caller
/// gave a partial version.
fn caret_bounds(version_str: &str) -> Result<Range> {
    let v = parse_partial_version(version_str)?;
    let upper = if v.major > 0 {
        Version::new(v.major + 1, 0, 0)
    } else if v.minor > 0 {
        Version::new(0, v.minor + 1, 0)
    } else {
        Version::new(0, 0, v.patch + 1)
    };
    Ok(Range::new(vec![
        Comparator::GreaterThanOrEqual(v),
        Comparator::LessThan(upper),
    ]))
}

fn tilde_bounds(version_str: &str) -> Result<Range> {
    let spec = specificity(version_str);
    let v = parse_partial_version(version_str)?;
    let upper = if spec <= 1 {
        Version::new(v.major + 1, 0, 0)
    } else {
        Version::new(v.major, v.minor + 1, 0)
    };
    Ok(Range::new(vec![
        Comparator::GreaterThanOrEqual(v),
        Comparator::LessThan(upper),
    ]))
}

/// `1.x`, `1.2.x`, `*` — wildcard at the first non-concrete component.
fn wildcard_bounds(version_str: &str) -> Result<Range> {
    let spec = specificity(version_str);
    let v = parse_partial_version(version_str)?;
    let upper = match spec {
        0 => return Ok(Range::wildcard()),
        1 => Version::new(v.major + 1, 0, 0),
        _ => Version::new(v.major, v.minor + 1, 0),
    };
    Ok(Range::new(vec![
        Comparator::GreaterThanOrEqual(v),
        Comparator::LessThan(upper),
    ]))
}

fn split_hyphen_range(clause: &str) -> Option<(&str, &str)> {
    // " - " must be surrounded by whitespace to avoid colliding with prerelease
    // identifiers, which may themselves contain hyphens (e.g. "1.0.0-alpha").
    let idx = clause.find(" - ")?;
    Some((clause[..idx].trim(), clause[idx + 3..].trim()))
}

fn parse_hyphen_range(low: &str, high: &str) -> Result<Range> {
    let low_v = parse_partial_version(low)?;
    let high_spec = specificity(high);
    let high_v = parse_partial_version(high)?;

    let upper = if high_spec >= 3 {
        Comparator::LessThanOrEqual(high_v)
    } else if high_spec == 2 {
        Comparator::LessThan(Version::new(high_v.major, high_v.minor + 1, 0))
    } else {
        Comparator::LessThan(Version::new(high_v.major + 1, 0, 0))
    };

    Ok(Range::new(vec![
        Comparator::GreaterThanOrEqual(low_v),
        upper,
    ]))
}

/// Consume a version token from `input`, stopping at whitespace or the start
/// of a new comparator operator. Returns the token and what's left to parse.
fn extract_version_and_remaining(input: &str) -> Result<(String, &str)> {
    let input = input.trim_start();

    if input.is_empty() {
        return Err(PackageManagerError::BadRange(
            "expected version, found end of input".to_string(),
        ));
    }

    let chars: Vec<char> = input.chars().collect();
    let mut end_pos = 0;

    while end_pos < chars.len() {
        let c = chars[end_pos];
        if c.is_whitespace() {
            break;
        }
        if end_pos > 0 && ['>', '<', '=', '^', '~'].contains(&c) {
            break;
        }
        end_pos += 1;
    }

    let version_str = input[..end_pos].trim().to_string();
    let remaining = &input[end_pos..];

    if version_str.is_empty() {
        return Err(PackageManagerError::BadRange(
            "empty version token".to_string(),
        ));
    }

    Ok((version_str, remaining))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).expect("valid literal")
    }

    #[test]
    fn caret_0x_matches_only_patch() {
        let r = parse_range_clause("^0.0.3").expect("parses");
        assert!(r.matches(&v("0.0.3")));
        assert!(!r.matches(&v("0.0.4")));
        assert!(!r.matches(&v("0.1.0")));
    }

    #[test]
    fn tilde_partial_is_tilde_zero() {
        let full = parse_range_clause("~1.2.0").expect("parses");
        let partial = parse_range_clause("~1.2").expect("parses");
        assert!(full.matches(&v("1.2.5")));
        assert!(partial.matches(&v("1.2.5")));
        assert!(!partial.matches(&v("1.3.0")));
    }

    #[test]
    fn hyphen_range_is_inclusive_both_ends() {
        let r = parse_range_clause("1.2.3 - 2.0.0").expect("parses");
        assert!(r.matches(&v("1.2.3")));
        assert!(r.matches(&v("2.0.0")));
        assert!(!r.matches(&v("2.0.1")));
    }

    #[test]
    fn wildcard_major_only() {
        let r = parse_range_clause("1.x").expect("parses");
        assert!(r.matches(&v("1.9.9")));
        assert!(!r.matches(&v("2.0.0")));
    }
}
