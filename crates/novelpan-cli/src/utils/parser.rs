use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid --set format: '{0}'. Expected KEY=VALUE.")]
    MissingSeparator(String),

    #[error("Key cannot be empty in '{0}'.")]
    EmptyKey(String),

    #[error("Invalid {expected} value for {key}: '{value}'")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },
}

/// Splits `KEY=VALUE` at the first `=`, trimming whitespace around both halves.
pub fn parse_key_value(pair: &str) -> Result<(&str, &str), ParseError> {
    let (key, value) = pair
        .split_once('=')
        .ok_or_else(|| ParseError::MissingSeparator(pair.to_string()))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(ParseError::EmptyKey(pair.to_string()));
    }
    Ok((key, value.trim()))
}

pub fn parse_usize(key: &str, value: &str) -> Result<usize, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        expected: "integer",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_at_first_equals_sign() {
        assert_eq!(
            parse_key_value("predictor.executable=/opt/bin/netMHCIIpan"),
            Ok(("predictor.executable", "/opt/bin/netMHCIIpan"))
        );
        assert_eq!(parse_key_value("a.b = x=y"), Ok(("a.b", "x=y")));
    }

    #[test]
    fn rejects_missing_separator_and_empty_key() {
        assert_eq!(
            parse_key_value("analysis.window-size"),
            Err(ParseError::MissingSeparator("analysis.window-size".into()))
        );
        assert_eq!(
            parse_key_value("=15"),
            Err(ParseError::EmptyKey("=15".into()))
        );
    }

    #[test]
    fn parse_usize_names_the_key() {
        assert_eq!(parse_usize("analysis.window-size", "15"), Ok(15));
        let err = parse_usize("analysis.window-size", "fifteen").unwrap_err();
        assert!(err.to_string().contains("analysis.window-size"));
    }
}
