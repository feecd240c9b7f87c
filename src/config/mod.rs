#[cfg(feature = "cli")]
pub mod cli;
pub mod function;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use function::FunctionConfig;
pub use toml_config::{EndpointConfig, HttpConfig, MoverConfig, SourceConfig};
