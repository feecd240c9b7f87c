pub mod engine;
pub mod mover;

pub use crate::domain::model::{
    RelocationReport, RelocationRule, RuleOutcome, StoredObject, UploadedFile,
};
pub use crate::domain::ports::{AccessTokenProvider, FileHost, ObjectStore};
pub use crate::utils::error::Result;
