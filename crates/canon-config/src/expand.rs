//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Variable that was referenced but is not set.
struct MissingVar {
    name: String,
}

/// Expand `${VAR}` and `${VAR:-default}` references in `value`.
///
/// An unset `${VAR}` without default is an error naming `field`. Only braced
/// references are expanded: bare `$VAR` and an unterminated `${` are copied
/// verbatim, so URLs and tokens containing `$` need no escaping.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        let close = start + len;
        out.push_str(&rest[..start]);
        out.push_str(&expand_reference(&rest[start..=close], field)?);
        rest = &rest[close + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Expand a single `${...}` reference.
fn expand_reference(reference: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::env_with_context(reference, |name| -> Result<Option<String>, MissingVar> {
        std::env::var(name).map(Some).map_err(|_| MissingVar {
            name: name.to_owned(),
        })
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.name),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_expand_set_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("CANON_TEST_EXPAND_SET", "token-1");
        }
        assert_eq!(
            expand_env("${CANON_TEST_EXPAND_SET}", "confluence.api_token").unwrap(),
            "token-1"
        );
        unsafe {
            std::env::remove_var("CANON_TEST_EXPAND_SET");
        }
    }

    #[test]
    fn test_expand_default_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("CANON_TEST_EXPAND_UNSET");
        }
        assert_eq!(
            expand_env("https://${CANON_TEST_EXPAND_UNSET:-wiki.local}/x", "f").unwrap(),
            "https://wiki.local/x"
        );
    }

    #[test]
    fn test_expand_missing_var_names_field() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("CANON_TEST_EXPAND_MISSING");
        }
        let err = expand_env("${CANON_TEST_EXPAND_MISSING}", "confluence.username").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        let message = err.to_string();
        assert!(message.contains("CANON_TEST_EXPAND_MISSING"));
        assert!(message.contains("confluence.username"));
    }

    #[test]
    fn test_bare_dollar_kept() {
        assert_eq!(expand_env("pa$$word", "f").unwrap(), "pa$$word");
    }

    #[test]
    fn test_bare_dollar_kept_next_to_braced_reference() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("CANON_TEST_EXPAND_BARE", "leaked");
            std::env::set_var("CANON_TEST_EXPAND_BRACED", "x");
        }
        assert_eq!(
            expand_env("tok$CANON_TEST_EXPAND_BARE-${CANON_TEST_EXPAND_BRACED}", "f").unwrap(),
            "tok$CANON_TEST_EXPAND_BARE-x"
        );
        unsafe {
            std::env::remove_var("CANON_TEST_EXPAND_BARE");
            std::env::remove_var("CANON_TEST_EXPAND_BRACED");
        }
    }

    #[test]
    fn test_unterminated_reference_kept() {
        assert_eq!(expand_env("a${b", "f").unwrap(), "a${b");
    }
}
