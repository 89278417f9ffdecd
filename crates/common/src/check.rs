//! Name classification helpers shared by rules and the scope resolver

use crate::constants::CONTAINER_TYPE_ALIASES;

/// Check if a (possibly qualified) type name is a known component container
/// alias such as `FC` or `React.FunctionComponent`
pub fn is_container_type_alias(type_name: &str) -> bool {
    let normalized: String = type_name.chars().filter(|c| !c.is_whitespace()).collect();
    CONTAINER_TYPE_ALIASES.contains(normalized.as_str())
}

/// Check if a type name ends with one of the given suffixes.
///
/// A name equal to the suffix itself (`Props`) does not count.
pub fn has_ignored_suffix<S: AsRef<str>>(name: &str, suffixes: &[S]) -> bool {
    suffixes.iter().any(|suffix| {
        let suffix = suffix.as_ref();
        !suffix.is_empty() && name.len() > suffix.len() && name.ends_with(suffix)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_alias() {
        assert!(is_container_type_alias("FC"));
        assert!(is_container_type_alias("React.FC"));
        assert!(is_container_type_alias("React . FC"));
        assert!(!is_container_type_alias("Props"));
    }

    #[test]
    fn test_ignored_suffix() {
        assert!(has_ignored_suffix("ButtonProps", &["Props"]));
        assert!(!has_ignored_suffix("Props", &["Props"]));
        assert!(!has_ignored_suffix("Button", &["Props", "State"]));
        assert!(!has_ignored_suffix::<&str>("ButtonProps", &[]));
    }
}
