/// Split a CLI-style package spec (`name`, `name@range`, `@scope/name@range`)
/// into `(name, range)`. Defaults the range to `"latest"` when none is given.
#[must_use]
pub fn parse_package_spec(spec: &str) -> (String, String) {
    if let Some(scope_end) = spec.strip_prefix('@').and_then(|rest| rest.find('/')) {
        let name_end = scope_end + 2; // account for the leading '@'
        return match spec[name_end..].find('@') {
            Some(at) => (
                spec[..name_end + at].to_string(),
                spec[name_end + at + 1..].to_string(),
            ),
            None => (spec.to_string(), "latest".to_string()),
        };
    }

    match spec.split_once('@') {
        Some((n, v)) if !n.is_empty() => (n.to_string(), v.to_string()),
        _ => (spec.to_string(), "latest".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_name_defaults_to_latest() {
        assert_eq!(parse_package_spec("lodash"), ("lodash".into(), "latest".into()));
    }

    #[test]
    fn name_with_range() {
        assert_eq!(
            parse_package_spec("lodash@^4.17.0"),
            ("lodash".into(), "^4.17.0".into())
        );
    }

    #[test]
    fn scoped_name_with_range() {
        assert_eq!(
            parse_package_spec("@types/node@^20.0.0"),
            ("@types/node".into(), "^20.0.0".into())
        );
    }

    #[test]
    fn scoped_name_without_range() {
        assert_eq!(
            parse_package_spec("@types/node"),
            ("@types/node".into(), "latest".into())
        );
    }
}
