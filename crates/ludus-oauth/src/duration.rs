//! Human-readable duration parsing for the refresh threshold.

use crate::error::{OAuthError, Result};

/// Parse a duration string into milliseconds.
///
/// Accepts a bare digit string (milliseconds) or digits followed by one of
/// `ms`, `s`, `m`, `h`: `"500ms"`, `"10s"`, `"15m"`, `"2h"`.
pub fn parse_duration_ms(input: &str) -> Result<u64> {
    let trimmed = input.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, unit) = trimmed.split_at(split);

    if digits.is_empty() {
        return Err(OAuthError::Config(format!(
            "Invalid duration format: {input:?}. Expected formats: \"15m\", \"10s\", etc."
        )));
    }

    let value: u64 = digits
        .parse()
        .map_err(|_| OAuthError::Config(format!("Invalid duration value: {input:?}")))?;

    let factor = match unit {
        "" | "ms" => 1,
        "s" => 1_000,
        "m" => 60_000,
        "h" => 3_600_000,
        other => {
            return Err(OAuthError::Config(format!(
                "Unknown duration unit: {other:?}. Use \"ms\", \"s\", \"m\", or \"h\"."
            )));
        }
    };

    Ok(value * factor)
}

/// A refresh threshold supplied either as a raw millisecond count or as a
/// duration string.
#[derive(Debug, Clone)]
pub enum Threshold {
    Millis(u64),
    Text(String),
}

impl Threshold {
    /// Resolve to milliseconds.
    pub fn as_millis(&self) -> Result<u64> {
        match self {
            Threshold::Millis(ms) => Ok(*ms),
            Threshold::Text(text) => parse_duration_ms(text),
        }
    }
}

impl From<u64> for Threshold {
    fn from(ms: u64) -> Self {
        Threshold::Millis(ms)
    }
}

impl From<&str> for Threshold {
    fn from(text: &str) -> Self {
        Threshold::Text(text.to_string())
    }
}

impl From<String> for Threshold {
    fn from(text: String) -> Self {
        Threshold::Text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_units() {
        assert_eq!(parse_duration_ms("15m").unwrap(), 900_000);
        assert_eq!(parse_duration_ms("10s").unwrap(), 10_000);
        assert_eq!(parse_duration_ms("500ms").unwrap(), 500);
        assert_eq!(parse_duration_ms("2h").unwrap(), 7_200_000);
    }

    #[test]
    fn bare_digits_are_milliseconds() {
        assert_eq!(parse_duration_ms("500").unwrap(), 500);
        assert_eq!(parse_duration_ms("0").unwrap(), 0);
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(parse_duration_ms("abc").is_err());
        assert!(parse_duration_ms("").is_err());
        assert!(parse_duration_ms("10d").is_err());
        assert!(parse_duration_ms("ms").is_err());
    }

    #[test]
    fn threshold_resolves_both_forms() {
        assert_eq!(Threshold::from(500u64).as_millis().unwrap(), 500);
        assert_eq!(Threshold::from("15m").as_millis().unwrap(), 900_000);
        assert!(Threshold::from("nope").as_millis().is_err());
    }
}
