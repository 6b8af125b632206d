pub mod formatter;
pub mod paths;
pub mod writer;

use std::path::PathBuf;

use indexmap::IndexMap;

pub use formatter::Formatter;
pub use paths::{OutputKind, file_id};
pub use writer::{FileWriter, PendingFile, WriteReport};

use crate::generator::{model_projector::ModelEntry, operation_projector::ApiDefinition};

/// What the model stage wrote, keyed by model file key.
#[derive(Debug, Clone, Default)]
pub struct ModelOutput {
  pub models: Vec<ModelEntry>,
  pub paths: IndexMap<String, PathBuf>,
  pub index_path: Option<PathBuf>,
}

/// What the API stage wrote, keyed by file stem.
#[derive(Debug, Clone, Default)]
pub struct ApiOutput {
  pub api: ApiDefinition,
  pub paths: IndexMap<String, PathBuf>,
}
