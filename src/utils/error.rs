use thiserror::Error;

#[derive(Error, Debug)]
pub enum MoverError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Config file parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Token signing failed: {0}")]
    SigningError(#[from] jsonwebtoken::errors::Error),

    #[error("Authentication error: {message}")]
    AuthError { message: String },

    #[error("{service} API returned {status}: {message}")]
    ApiError {
        service: &'static str,
        status: u16,
        message: String,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Authentication,
    Network,
    RemoteService,
    LocalSystem,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MoverError {
    pub fn api(service: &'static str, status: u16, message: impl Into<String>) -> Self {
        MoverError::ApiError {
            service,
            status,
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            MoverError::HttpError(_) => ErrorCategory::Network,
            MoverError::IoError(_) => ErrorCategory::LocalSystem,
            MoverError::SerializationError(_) => ErrorCategory::Data,
            MoverError::TomlError(_)
            | MoverError::ConfigError { .. }
            | MoverError::MissingConfigError { .. }
            | MoverError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            MoverError::SigningError(_) | MoverError::AuthError { .. } => {
                ErrorCategory::Authentication
            }
            MoverError::ApiError { status, .. } if *status == 401 || *status == 403 => {
                ErrorCategory::Authentication
            }
            MoverError::ApiError { .. } => ErrorCategory::RemoteService,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::RemoteService => match self {
                MoverError::ApiError { status, .. } if *status == 404 => ErrorSeverity::Low,
                MoverError::ApiError { status, .. } if *status >= 500 || *status == 429 => {
                    ErrorSeverity::Medium
                }
                _ => ErrorSeverity::High,
            },
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration
            | ErrorCategory::Authentication
            | ErrorCategory::LocalSystem => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the config file and environment variables, then run again"
            }
            ErrorCategory::Authentication => {
                "Check the service-account key file and that the account can access both the bucket and the Drive folder"
            }
            ErrorCategory::Network => "Check network connectivity; the next scheduled run will pick up the remaining files",
            ErrorCategory::RemoteService => {
                "Check the bucket name and Drive folder ids; the next scheduled run will retry"
            }
            ErrorCategory::LocalSystem => "Check file permissions and available disk space",
            ErrorCategory::Data => "The service returned an unexpected payload; check the endpoint configuration",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            MoverError::MissingConfigError { field } => {
                format!("Required setting '{}' is missing", field)
            }
            MoverError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            MoverError::ApiError {
                service, status, ..
            } => format!("{} rejected the request (HTTP {})", service, status),
            MoverError::AuthError { .. } | MoverError::SigningError(_) => {
                "Could not authenticate with the service account".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MoverError>;
