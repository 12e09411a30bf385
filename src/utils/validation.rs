use crate::utils::error::{CensusError, Result};
use chrono::{Datelike, NaiveDate, Utc};
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(CensusError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(CensusError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(CensusError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(CensusError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CensusError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

fn quarter_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d{4})-Q([1-4])$").expect("static quarter pattern"))
}

/// Checks `YYYY-Q#` format and rejects quarters after the one containing `today`.
pub fn validate_quarter_on(value: &str, today: NaiveDate) -> Result<()> {
    let caps = quarter_pattern()
        .captures(value)
        .ok_or_else(|| CensusError::InvalidQuarter {
            value: value.to_string(),
            reason: "The quarter must be in the format YYYY-Q# (e.g., 2023-Q4).".to_string(),
        })?;

    // Both groups are all digits, so parsing cannot fail.
    let year: i32 = caps[1].parse().unwrap_or_default();
    let quarter: u32 = caps[2].parse().unwrap_or_default();

    let current_year = today.year();
    let current_quarter = (today.month() - 1) / 3 + 1;

    if year > current_year || (year == current_year && quarter > current_quarter) {
        return Err(CensusError::InvalidQuarter {
            value: value.to_string(),
            reason: "The quarter cannot be in the future.".to_string(),
        });
    }

    Ok(())
}

pub fn validate_quarter(value: &str) -> Result<()> {
    validate_quarter_on(value, Utc::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("census.base_url", "https://example.com").is_ok());
        assert!(validate_url("census.base_url", "http://example.com").is_ok());
        assert!(validate_url("census.base_url", "").is_err());
        assert!(validate_url("census.base_url", "invalid-url").is_err());
        assert!(validate_url("census.base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("concurrent_requests", 5, 1).is_ok());
        assert!(validate_positive_number("concurrent_requests", 0, 1).is_err());
    }

    #[test]
    fn test_quarter_format() {
        let today = day(2024, 5, 10);
        assert!(validate_quarter_on("2023-Q4", today).is_ok());
        assert!(validate_quarter_on("2024-Q2", today).is_ok());
        assert!(validate_quarter_on("2024-Q5", today).is_err());
        assert!(validate_quarter_on("2024Q1", today).is_err());
        assert!(validate_quarter_on("24-Q1", today).is_err());
        assert!(validate_quarter_on("", today).is_err());
    }

    #[test]
    fn test_quarter_not_in_future() {
        let today = day(2024, 5, 10);
        assert!(validate_quarter_on("2024-Q3", today).is_err());
        assert!(validate_quarter_on("2025-Q1", today).is_err());

        // quarter boundaries
        assert!(validate_quarter_on("2024-Q4", day(2024, 10, 1)).is_ok());
        assert!(validate_quarter_on("2025-Q1", day(2024, 12, 31)).is_err());
    }

    #[test]
    fn test_quarter_error_message() {
        let err = validate_quarter_on("2099-Q1", day(2024, 1, 1)).unwrap_err();
        assert_eq!(err.user_friendly_message(), "The quarter cannot be in the future.");
    }
}
