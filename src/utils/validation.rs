use crate::utils::error::{CalcError, Result};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(CalcError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(CalcError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// 本金等金額必須為有限正數
pub fn validate_positive_f64(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(CalcError::invalid_input(
            field_name,
            value,
            "Value must be a finite number",
        ));
    }
    if value <= 0.0 {
        return Err(CalcError::invalid_input(
            field_name,
            value,
            "Value must be greater than zero",
        ));
    }
    Ok(())
}

pub fn validate_non_negative_f64(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(CalcError::invalid_input(
            field_name,
            value,
            "Value must be a finite number",
        ));
    }
    if value < 0.0 {
        return Err(CalcError::invalid_input(
            field_name,
            value,
            "Value cannot be negative",
        ));
    }
    Ok(())
}

pub fn validate_output_formats(field_name: &str, formats: &[String], allowed: &[&str]) -> Result<()> {
    if formats.is_empty() {
        return Err(CalcError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: String::new(),
            reason: "At least one output format is required".to_string(),
        });
    }

    let allowed_set: HashSet<&str> = allowed.iter().copied().collect();
    for format in formats {
        if !allowed_set.contains(format.as_str()) {
            return Err(CalcError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: format.clone(),
                reason: format!(
                    "Unsupported format. Valid formats: {}",
                    allowed.join(", ")
                ),
            });
        }
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CalcError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(CalcError::invalid_input(
            field_name,
            value,
            &format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_positive_f64() {
        assert!(validate_positive_f64("principal", 250_000.0).is_ok());
        assert!(validate_positive_f64("principal", 0.0).is_err());
        assert!(validate_positive_f64("principal", -1.0).is_err());
        assert!(validate_positive_f64("principal", f64::NAN).is_err());
        assert!(validate_positive_f64("principal", f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_non_negative_f64() {
        assert!(validate_non_negative_f64("annual_rate_percent", 0.0).is_ok());
        assert!(validate_non_negative_f64("annual_rate_percent", 6.5).is_ok());
        assert!(validate_non_negative_f64("annual_rate_percent", -0.1).is_err());
    }

    #[test]
    fn test_validate_output_formats() {
        let formats = vec!["csv".to_string(), "json".to_string()];
        assert!(validate_output_formats("output.formats", &formats, &["csv", "json"]).is_ok());

        let invalid = vec!["xlsx".to_string()];
        assert!(validate_output_formats("output.formats", &invalid, &["csv", "json"]).is_err());
        assert!(validate_output_formats("output.formats", &[], &["csv", "json"]).is_err());
    }

    #[test]
    fn test_validate_range_and_strings() {
        assert!(validate_range("years", 30u32, 1, 100).is_ok());
        assert!(validate_range("years", 100u32, 1, 100).is_ok());
        assert!(validate_range("years", 0u32, 1, 100).is_err());
        assert!(validate_range("years", 101u32, 1, 100).is_err());

        assert!(validate_non_empty_string("batch.name", "  ").is_err());
        assert!(validate_path("output.path", "").is_err());
    }
}
