//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in `value`.
///
/// # Errors
///
/// Returns [`ConfigError::EnvVar`] naming `field` when a referenced variable
/// is unset and has no default.
///
/// Values without `${` are returned unchanged, so a bare `$name` stays literal.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env(value)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.var_name),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_value_unchanged() {
        assert_eq!(
            expand_env("https://api.iconify.design", "iconify.api_url").unwrap(),
            "https://api.iconify.design"
        );
    }

    #[test]
    fn test_default_used_when_unset() {
        let value = expand_env("${ICONS_TEST_SURELY_UNSET_VAR:-/fallback}", "base_url").unwrap();
        assert_eq!(value, "/fallback");
    }

    #[test]
    fn test_unset_without_default_errors() {
        let err = expand_env("${ICONS_TEST_SURELY_UNSET_VAR}", "base_url").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { ref field, .. } if field == "base_url"));
    }

    #[test]
    fn test_bare_dollar_not_expanded() {
        assert_eq!(
            expand_env("/srv/$release/web", "root").unwrap(),
            "/srv/$release/web"
        );
    }

    #[test]
    fn test_url_with_dollar_not_expanded() {
        assert_eq!(
            expand_env("https://cdn.example.com/$icons", "iconify.api_url").unwrap(),
            "https://cdn.example.com/$icons"
        );
    }
}
