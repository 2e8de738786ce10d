//! Environment variable helpers.
//!
//! Blank values are treated as unset so that an empty line in a `.env` file
//! does not override a default.

use std::env;
use std::str::FromStr;

/// Read a variable, ignoring unset and blank values.
pub(super) fn var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Read and parse a variable.
pub(super) fn parse<T>(name: &str) -> Result<Option<T>, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match var(name) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|e| format!("Invalid value for {name} '{raw}': {e}")),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_var_ignores_blank() {
        unsafe {
            env::set_var("CALL_RELAY_TEST_VAR", "   ");
        }
        assert_eq!(var("CALL_RELAY_TEST_VAR"), None);

        unsafe {
            env::set_var("CALL_RELAY_TEST_VAR", " value ");
        }
        assert_eq!(var("CALL_RELAY_TEST_VAR"), Some("value".to_string()));

        unsafe {
            env::remove_var("CALL_RELAY_TEST_VAR");
        }
        assert_eq!(var("CALL_RELAY_TEST_VAR"), None);
    }

    #[test]
    #[serial]
    fn test_parse_reports_variable_name() {
        unsafe {
            env::set_var("CALL_RELAY_TEST_PORT", "not-a-port");
        }
        let err = parse::<u16>("CALL_RELAY_TEST_PORT").unwrap_err();
        assert!(err.contains("CALL_RELAY_TEST_PORT"));
        assert!(err.contains("not-a-port"));

        unsafe {
            env::set_var("CALL_RELAY_TEST_PORT", "8080");
        }
        assert_eq!(parse::<u16>("CALL_RELAY_TEST_PORT").unwrap(), Some(8080));

        unsafe {
            env::remove_var("CALL_RELAY_TEST_PORT");
        }
        assert_eq!(parse::<u16>("CALL_RELAY_TEST_PORT").unwrap(), None);
    }
}
