use crate::domain::model::RelocationRule;
use crate::utils::error::{MoverError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_BUCKET: &str = "easydev-image";
pub const DEFAULT_CREDENTIALS_FILE: &str = "service-uploader.json";
pub const DEFAULT_STORAGE_ENDPOINT: &str = "https://storage.googleapis.com";
pub const DEFAULT_UPLOAD_ENDPOINT: &str = "https://www.googleapis.com";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoverConfig {
    pub source: SourceConfig,
    #[serde(default)]
    pub endpoints: EndpointConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default = "RelocationRule::defaults")]
    pub rules: Vec<RelocationRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub bucket: String,
    #[serde(default = "default_credentials_file")]
    pub credentials_file: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_storage_endpoint")]
    pub storage: String,
    #[serde(default = "default_upload_endpoint")]
    pub upload: String,
    /// Overrides the `token_uri` from the service-account key.
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_credentials_file() -> String {
    DEFAULT_CREDENTIALS_FILE.to_string()
}

fn default_storage_endpoint() -> String {
    DEFAULT_STORAGE_ENDPOINT.to_string()
}

fn default_upload_endpoint() -> String {
    DEFAULT_UPLOAD_ENDPOINT.to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_BUCKET.to_string(),
            credentials_file: default_credentials_file(),
        }
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            storage: default_storage_endpoint(),
            upload: default_upload_endpoint(),
            token: None,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for MoverConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            endpoints: EndpointConfig::default(),
            http: HttpConfig::default(),
            rules: RelocationRule::defaults(),
        }
    }
}

impl MoverConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| MoverError::ConfigError {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: MoverConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Loads `path` when it exists. A missing file falls back to the built-in
    /// defaults unless `required` is set.
    pub fn load<P: AsRef<Path>>(path: P, required: bool) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            tracing::debug!("Loading config from {}", path.display());
            Self::from_file(path)
        } else if required {
            Err(MoverError::ConfigError {
                message: format!("Config file not found: {}", path.display()),
            })
        } else {
            tracing::info!(
                "No config file at {}, using built-in rules",
                path.display()
            );
            Ok(Self::default())
        }
    }

    pub fn rule(&self, name: &str) -> Option<&RelocationRule> {
        self.rules.iter().find(|r| r.name == name)
    }
}

impl Validate for MoverConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_bucket_name("source.bucket", &self.source.bucket)?;
        validation::validate_path("source.credentials_file", &self.source.credentials_file)?;

        validation::validate_url("endpoints.storage", &self.endpoints.storage)?;
        validation::validate_url("endpoints.upload", &self.endpoints.upload)?;
        if let Some(token) = &self.endpoints.token {
            validation::validate_url("endpoints.token", token)?;
        }

        validation::validate_range(
            "http.request_timeout_secs",
            self.http.request_timeout_secs,
            1,
            3600,
        )?;

        if self.rules.is_empty() {
            return Err(MoverError::MissingConfigError {
                field: "rules".to_string(),
            });
        }
        validation::validate_unique_names("rules.name", self.rules.iter().map(|r| r.name.as_str()))?;

        for rule in &self.rules {
            validation::validate_non_empty_string("rules.name", &rule.name)?;
            validation::validate_non_empty_string("rules.label", &rule.label)?;
            validation::validate_non_empty_string("rules.noun", &rule.noun)?;
            validation::validate_non_empty_string("rules.prefix", &rule.prefix)?;
            validation::validate_folder_id("rules.folder_id", &rule.folder_id)?;
            if rule.min_age.is_zero() {
                return Err(MoverError::InvalidConfigValueError {
                    field: "rules.min_age".to_string(),
                    value: "0s".to_string(),
                    reason: format!("Rule '{}' must have a positive minimum age", rule.name),
                });
            }
        }

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    const SAMPLE: &str = r#"
[source]
bucket = "scan-uploads"
credentials_file = "/secrets/sa.json"

[endpoints]
token = "http://127.0.0.1:9000/token"

[http]
request_timeout_secs = 30

[[rules]]
name = "receipts"
label = "Receipt"
icon = "🧾"
noun = "receipt"
prefix = "receipts/"
folder_id = "1abcDEF_ghi-jkl"
min_age = "2h"
"#;

    #[test]
    fn test_parse_full_config() {
        let config = MoverConfig::from_toml_str(SAMPLE).unwrap();

        assert_eq!(config.source.bucket, "scan-uploads");
        assert_eq!(config.source.credentials_file, "/secrets/sa.json");
        assert_eq!(config.endpoints.storage, DEFAULT_STORAGE_ENDPOINT);
        assert_eq!(
            config.endpoints.token.as_deref(),
            Some("http://127.0.0.1:9000/token")
        );
        assert_eq!(config.http.request_timeout_secs, 30);
        assert_eq!(config.rules.len(), 1);

        let rule = config.rule("receipts").unwrap();
        assert_eq!(rule.min_age, Duration::from_secs(7200));
        assert_eq!(rule.folder_id, "1abcDEF_ghi-jkl");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_rules_uses_defaults() {
        let config = MoverConfig::from_toml_str("[source]\nbucket = \"easydev-image\"\n").unwrap();

        assert_eq!(config.source.credentials_file, DEFAULT_CREDENTIALS_FILE);
        assert_eq!(config.rules, RelocationRule::defaults());
        assert_eq!(config.http.request_timeout_secs, 60);
    }

    #[test]
    fn test_invalid_age_is_parse_error() {
        let content = SAMPLE.replace("min_age = \"2h\"", "min_age = \"soon\"");
        let err = MoverConfig::from_toml_str(&content).unwrap_err();
        assert!(matches!(err, MoverError::TomlError(_)));
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(MoverConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_duplicate_rules() {
        let mut config = MoverConfig::default();
        config.rules.push(RelocationRule::plate_images());
        assert!(matches!(
            config.validate(),
            Err(MoverError::InvalidConfigValueError { ref field, .. }) if field == "rules.name"
        ));
    }

    #[test]
    fn test_validation_rejects_zero_age() {
        let mut config = MoverConfig::default();
        config.rules[1].min_age = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_empty_rule_set() {
        let mut config = MoverConfig::default();
        config.rules.clear();
        assert!(matches!(
            config.validate(),
            Err(MoverError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = MoverConfig::load(file.path(), true).unwrap();
        assert_eq!(config.source.bucket, "scan-uploads");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("mover.toml");

        assert_eq!(MoverConfig::load(&path, false).unwrap(), MoverConfig::default());
        assert!(matches!(
            MoverConfig::load(&path, true),
            Err(MoverError::ConfigError { .. })
        ));
    }
}
