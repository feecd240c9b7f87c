pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::{handle_invocation, relocate, transfer_status};
pub use config::{FunctionConfig, MoverConfig};
pub use crate::core::{engine::RelocationEngine, mover::Mover};
pub use domain::model::{RelocationReport, RelocationRule, RuleOutcome, StoredObject};
pub use utils::error::{MoverError, Result};
