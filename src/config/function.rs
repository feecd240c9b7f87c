use crate::config::MoverConfig;
use crate::utils::error::{MoverError, Result};
use std::env;

pub const DEFAULT_PORT: u16 = 8080;

/// Settings read from the cloud function's environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionConfig {
    pub config_path: Option<String>,
    pub bucket: Option<String>,
    pub credentials_file: Option<String>,
    pub port: u16,
}

impl FunctionConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match non_empty("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| MoverError::InvalidConfigValueError {
                    field: "PORT".to_string(),
                    value: raw.clone(),
                    reason: "PORT must be a number between 0 and 65535".to_string(),
                })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            config_path: non_empty("MOVER_CONFIG"),
            bucket: non_empty("GCS_BUCKET"),
            credentials_file: non_empty("SERVICE_ACCOUNT_FILE"),
            port,
        })
    }

    /// Builds the relocation config for one invocation.
    pub fn resolve(&self) -> Result<MoverConfig> {
        let mut config = match &self.config_path {
            Some(path) => MoverConfig::load(path, true)?,
            None => MoverConfig::default(),
        };

        if let Some(bucket) = &self.bucket {
            config.source.bucket = bucket.clone();
        }
        if let Some(credentials) = &self.credentials_file {
            config.source.credentials_file = credentials.clone();
        }

        Ok(config)
    }
}
