//! Environment variable expansion for configuration strings.
//!
//! Supports `${VAR}` (required) and `${VAR:-default}` (with fallback).

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in a string.
///
/// Text outside references is passed through unchanged. An unset
/// variable without a default is an error; the `field` name is carried
/// in the error for diagnostics.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    let mut result = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            return Err(ConfigError::EnvVar {
                field: field.to_owned(),
                message: "unterminated ${ reference".to_owned(),
            });
        };
        let reference = &after[..end];
        let (name, default) = match reference.split_once(":-") {
            Some((name, default)) => (name, Some(default)),
            None => (reference, None),
        };
        if name.is_empty() {
            return Err(ConfigError::EnvVar {
                field: field.to_owned(),
                message: "empty variable name".to_owned(),
            });
        }
        match std::env::var(name) {
            Ok(v) => result.push_str(&v),
            Err(_) => match default {
                Some(d) => result.push_str(d),
                None => {
                    return Err(ConfigError::EnvVar {
                        field: field.to_owned(),
                        message: format!("${{{name}}} not set"),
                    });
                }
            },
        }
        rest = &after[end + 1..];
    }

    result.push_str(rest);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_literal_passthrough() {
        assert_eq!(expand_env("plain text", "f").unwrap(), "plain text");
    }

    #[test]
    fn test_expand_set_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("TT_EXPAND_TEST", "value");
        }
        assert_eq!(
            expand_env("pre-${TT_EXPAND_TEST}-post", "f").unwrap(),
            "pre-value-post"
        );
        unsafe {
            std::env::remove_var("TT_EXPAND_TEST");
        }
    }

    #[test]
    fn test_default_used_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("TT_EXPAND_UNSET");
        }
        assert_eq!(
            expand_env("${TT_EXPAND_UNSET:-fallback}", "f").unwrap(),
            "fallback"
        );
    }

    #[test]
    fn test_default_ignored_when_set() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("TT_EXPAND_SET", "real");
        }
        assert_eq!(expand_env("${TT_EXPAND_SET:-fallback}", "f").unwrap(), "real");
        unsafe {
            std::env::remove_var("TT_EXPAND_SET");
        }
    }

    #[test]
    fn test_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("TT_EXPAND_MISSING");
        }
        let err = expand_env("${TT_EXPAND_MISSING}", "sync.user").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("sync.user"));
    }

    #[test]
    fn test_unterminated_reference() {
        let err = expand_env("${TT_OOPS", "f").unwrap_err();
        assert!(err.to_string().contains("unterminated"));
    }

    #[test]
    fn test_multiple_references() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("TT_EXPAND_A", "a");
            std::env::set_var("TT_EXPAND_B", "b");
        }
        assert_eq!(
            expand_env("${TT_EXPAND_A}/${TT_EXPAND_B}", "f").unwrap(),
            "a/b"
        );
        unsafe {
            std::env::remove_var("TT_EXPAND_A");
            std::env::remove_var("TT_EXPAND_B");
        }
    }
}
