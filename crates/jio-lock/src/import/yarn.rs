use indexmap::IndexMap;

use jio_error::{PackageManagerError, Result};
use jio_resolver::ResolvedPackage;

/// Parse a Yarn classic `yarn.lock`'s bespoke text grammar:
///
/// ```text
/// "left-pad@^1.3.0", "left-pad@^1.3.1":
///   version "1.3.1"
///   resolved "https://registry.yarnpkg.com/left-pad/-/left-pad-1.3.1.tgz#...""
///   integrity sha512-...
///   dependencies:
///     foo "^1.0.0"
/// ```
///
/// Each block header names one or more `name@range` specs that all resolved
/// to the same entry; we key the result by `name@version` (the identity key
/// spec §4.6 uses), ignoring which particular range specs were satisfied.
pub fn parse(content: &str) -> Result<IndexMap<String, ResolvedPackage>> {
    let mut out = IndexMap::new();
    let mut lines = content.lines().peekable();

    while let Some(line) = lines.next() {
        let trimmed = line.trim_end();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        // A block header starts at column 0 and ends with ':'.
        if line.starts_with(char::is_whitespace) || !trimmed.ends_with(':') {
            continue;
        }

        let specs = parse_header_specs(trimmed);
        let Some(name) = specs.first().and_then(|s| spec_name(s)) else {
            continue;
        };

        let mut version = String::new();
        let mut resolved = String::new();
        let mut integrity = String::new();
        let mut dependencies = IndexMap::new();

        while let Some(next) = lines.peek() {
            if !next.starts_with(char::is_whitespace) {
                break;
            }
            let body = lines.next().expect("peeked").trim();

            if let Some(rest) = body.strip_prefix("version ") {
                version = unquote(rest);
            } else if let Some(rest) = body.strip_prefix("resolved ") {
                resolved = unquote(rest);
            } else if let Some(rest) = body.strip_prefix("integrity ") {
                integrity = rest.trim().to_string();
            } else if body == "dependencies:" || body == "optionalDependencies:" {
                while let Some(dep_line) = lines.peek() {
                    if !dep_line.starts_with("    ") {
                        break;
                    }
                    let dep_line = lines.next().expect("peeked").trim();
                    if let Some((dep_name, dep_range)) = dep_line.split_once(' ') {
                        dependencies.insert(dep_name.trim_matches('"').to_string(), unquote(dep_range));
                    }
                }
            }
        }

        if version.is_empty() {
            continue;
        }
        let identity_key = format!("{name}@{version}");
        out.insert(
            identity_key,
            ResolvedPackage {
                name,
                version,
                resolved,
                integrity,
                dependencies,
                dev: false,
                optional: false,
            },
        );
    }

    if out.is_empty() && !content.trim().is_empty() {
        return Err(PackageManagerError::Lock(
            "yarn.lock did not contain any recognisable package blocks".to_string(),
        ));
    }
    Ok(out)
}

fn parse_header_specs(header: &str) -> Vec<String> {
    header
        .trim_end_matches(':')
        .split(',')
        .map(|s| s.trim().trim_matches('"').to_string())
        .collect()
}

/// `left-pad@^1.3.0` -> `left-pad`; handles scoped names (`@types/node@^1.0.0`).
fn spec_name(spec: &str) -> Option<String> {
    let at_positions: Vec<usize> = spec.match_indices('@').map(|(i, _)| i).collect();
    let split_at = at_positions.into_iter().filter(|&i| i != 0).next_back()?;
    Some(spec[..split_at].to_string())
}

fn unquote(s: &str) -> String {
    s.trim().trim_matches('"').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_block() {
        let content = concat!(
            "left-pad@^1.3.0, left-pad@^1.3.1:\n",
            "  version \"1.3.1\"\n",
            "  resolved \"https://registry.yarnpkg.com/left-pad/-/left-pad-1.3.1.tgz\"\n",
            "  integrity sha512-abc\n",
        );
        let parsed = parse(content).expect("parses");
        let entry = parsed.get("left-pad@1.3.1").expect("present");
        assert_eq!(entry.integrity, "sha512-abc");
    }

    #[test]
    fn parses_scoped_name_with_dependencies() {
        let content = concat!(
            "\"@types/node@^18.0.0\":\n",
            "  version \"18.0.0\"\n",
            "  resolved \"https://registry.yarnpkg.com/@types/node/-/node-18.0.0.tgz\"\n",
            "  integrity sha512-xyz\n",
            "  dependencies:\n",
            "    undici-types \"~5.26.4\"\n",
        );
        let parsed = parse(content).expect("parses");
        let entry = parsed.get("@types/node@18.0.0").expect("present");
        assert_eq!(entry.dependencies.get("undici-types").map(String::as_str), Some("~5.26.4"));
    }
}
