use crate::utils::error::{MoverError, Result};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: &str, reason: impl Into<String>) -> MoverError {
    MoverError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(invalid(
                field_name,
                url_str,
                format!("Unsupported URL scheme: {}", scheme),
            )),
        },
        Err(e) => Err(invalid(
            field_name,
            url_str,
            format!("Invalid URL format: {}", e),
        )),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(invalid(field_name, path, "Path cannot be empty"));
    }

    if path.contains('\0') {
        return Err(invalid(field_name, path, "Path contains null bytes"));
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
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
        return Err(invalid(
            field_name,
            &value.to_string(),
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

/// Cloud Storage bucket naming rules, minus the dotted-name length exception.
pub fn validate_bucket_name(field_name: &str, bucket_name: &str) -> Result<()> {
    static BUCKET: OnceLock<Regex> = OnceLock::new();
    let pattern = BUCKET.get_or_init(|| {
        Regex::new(r"^[a-z0-9][a-z0-9._-]{1,61}[a-z0-9]$").expect("bucket pattern compiles")
    });

    if bucket_name.is_empty() {
        return Err(invalid(field_name, bucket_name, "Bucket name cannot be empty"));
    }

    if !pattern.is_match(bucket_name) {
        return Err(invalid(
            field_name,
            bucket_name,
            "Bucket name must be 3-63 characters of lowercase letters, digits, '-', '_' or '.', \
             starting and ending with a letter or digit",
        ));
    }

    if bucket_name.starts_with("goog") {
        return Err(invalid(
            field_name,
            bucket_name,
            "Bucket name cannot begin with the \"goog\" prefix",
        ));
    }

    Ok(())
}

pub fn validate_folder_id(field_name: &str, folder_id: &str) -> Result<()> {
    static FOLDER: OnceLock<Regex> = OnceLock::new();
    let pattern =
        FOLDER.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("folder pattern compiles"));

    validate_non_empty_string(field_name, folder_id)?;
    if !pattern.is_match(folder_id) {
        return Err(invalid(
            field_name,
            folder_id,
            "Drive folder id may only contain letters, digits, '-' and '_'",
        ));
    }
    Ok(())
}

pub fn validate_unique_names<'a>(
    field_name: &str,
    names: impl IntoIterator<Item = &'a str>,
) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(invalid(field_name, name, "Duplicate name"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("endpoints.storage", "https://storage.googleapis.com").is_ok());
        assert!(validate_url("endpoints.storage", "http://127.0.0.1:8080").is_ok());
        assert!(validate_url("endpoints.storage", "").is_err());
        assert!(validate_url("endpoints.storage", "invalid-url").is_err());
        assert!(validate_url("endpoints.storage", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_bucket_name() {
        assert!(validate_bucket_name("source.bucket", "easydev-image").is_ok());
        assert!(validate_bucket_name("source.bucket", "my_bucket.v2").is_ok());
        assert!(validate_bucket_name("source.bucket", "").is_err());
        assert!(validate_bucket_name("source.bucket", "ab").is_err());
        assert!(validate_bucket_name("source.bucket", "Upper-Case").is_err());
        assert!(validate_bucket_name("source.bucket", "-leading").is_err());
        assert!(validate_bucket_name("source.bucket", "trailing-").is_err());
        assert!(validate_bucket_name("source.bucket", "google-things").is_err());
    }

    #[test]
    fn test_validate_folder_id() {
        assert!(validate_folder_id("rules.folder_id", "1ExA39KIUe2X6IxS3KwFO5JXhwHMJc_wH").is_ok());
        assert!(validate_folder_id("rules.folder_id", "  ").is_err());
        assert!(validate_folder_id("rules.folder_id", "folder/../x").is_err());
    }

    #[test]
    fn test_validate_unique_names() {
        assert!(validate_unique_names("rules.name", ["plates", "exports"]).is_ok());
        assert!(validate_unique_names("rules.name", ["plates", "plates"]).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("http.request_timeout_secs", 60u64, 1, 3600).is_ok());
        assert!(validate_range("http.request_timeout_secs", 0u64, 1, 3600).is_err());
    }
}
