use crate::config::MoverConfig;
use crate::utils::error::{MoverError, Result};
use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_CONFIG_FILE: &str = "mover.toml";

#[derive(Debug, Clone, Parser)]
#[command(name = "gcs-drive-mover")]
#[command(about = "Move aged files from a Cloud Storage bucket into Google Drive folders")]
pub struct CliConfig {
    #[arg(long, help = "Config file (defaults to ./mover.toml, or built-in rules if absent)")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Override the source bucket")]
    pub bucket: Option<String>,

    #[arg(long, help = "Override the service-account key file")]
    pub credentials: Option<String>,

    #[arg(long = "only", value_delimiter = ',', help = "Run only the named rules")]
    pub only: Vec<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Loads the config file and applies command-line overrides.
    pub fn resolve(&self) -> Result<MoverConfig> {
        let mut config = match &self.config {
            Some(path) => MoverConfig::load(path, true)?,
            None => MoverConfig::load(DEFAULT_CONFIG_FILE, false)?,
        };

        if let Some(bucket) = &self.bucket {
            config.source.bucket = bucket.clone();
        }
        if let Some(credentials) = &self.credentials {
            config.source.credentials_file = credentials.clone();
        }

        if !self.only.is_empty() {
            if let Some(unknown) = self.only.iter().find(|n| config.rule(n).is_none()) {
                return Err(MoverError::InvalidConfigValueError {
                    field: "only".to_string(),
                    value: unknown.clone(),
                    reason: "No rule with this name".to_string(),
                });
            }
            config.rules.retain(|r| self.only.contains(&r.name));
        }

        Ok(config)
    }
}
