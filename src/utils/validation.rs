use crate::utils::error::{Result, VerifyError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(VerifyError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(VerifyError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(VerifyError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(VerifyError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(VerifyError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(VerifyError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(VerifyError::InvalidConfigValueError {
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
        return Err(VerifyError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// An unexpanded `${VAR}` left by TOML substitution means the variable was unset.
pub fn validate_no_placeholder(field_name: &str, value: &str) -> Result<()> {
    if value.contains("${") {
        return Err(VerifyError::MissingConfigError {
            field: format!("{} (unresolved environment variable in '{}')", field_name, value),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("base_url", "https://secure.shippingapis.com/ShippingAPI.dll?API=Verify&XML=").is_ok());
        assert!(validate_url("base_url", "http://127.0.0.1:8080/verify").is_ok());
        assert!(validate_url("base_url", "").is_err());
        assert!(validate_url("base_url", "not a url").is_err());
        assert!(validate_url("base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("concurrency_limit", 1, 1).is_ok());
        assert!(validate_positive_number("concurrency_limit", 0, 1).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("concurrency_limit", 100, 1, 1000).is_ok());
        assert!(validate_range("concurrency_limit", 1001, 1, 1000).is_err());
    }

    #[test]
    fn test_validate_non_empty_and_placeholder() {
        assert!(validate_non_empty_string("user_id", "  ").is_err());
        assert!(validate_non_empty_string("user_id", "123ABC").is_ok());
        assert!(validate_no_placeholder("user_id", "${USPS_USER_ID}").is_err());
        assert!(validate_no_placeholder("user_id", "123ABC").is_ok());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("input", "addresses.csv").is_ok());
        assert!(validate_path("input", "").is_err());
        assert!(validate_path("input", "a\0b").is_err());
    }
}
