use thiserror::Error;

pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Failures that abort a single generation target.
#[derive(Debug, Error)]
pub enum GeneratorError {
  #[error("composition not supported in '{location}': {detail}")]
  UnsupportedComposition { location: String, detail: String },

  #[error("unsupported schema shape in '{location}': {detail}")]
  UnsupportedSchema { location: String, detail: String },

  #[error("type ref not found: {0}")]
  UnresolvedReference(String),

  #[error("generic type definition missing for '{0}'")]
  GenericDefinitionMissing(String),

  #[error("invalid type name '{name}': {reason}")]
  InvalidTypeName { name: String, reason: String },

  #[error("malformed operation {method} {path}: {detail}")]
  MalformedOperation {
    method: String,
    path: String,
    detail: String,
  },

  #[error("failed to load API document from {origin}: {message}")]
  Fetch { origin: String, message: String },

  #[error("invalid API document: {0}")]
  InvalidDocument(String),

  #[error("invalid configuration in {origin} at '{path}': {message}")]
  InvalidConfig {
    origin: String,
    path: String,
    message: String,
  },

  #[error("template rendering failed: {0}")]
  Template(#[from] minijinja::Error),
}

impl GeneratorError {
  pub(crate) fn unsupported_composition(location: impl Into<String>, detail: impl Into<String>) -> Self {
    Self::UnsupportedComposition {
      location: location.into(),
      detail: detail.into(),
    }
  }

  pub(crate) fn unsupported_schema(location: impl Into<String>, detail: impl Into<String>) -> Self {
    Self::UnsupportedSchema {
      location: location.into(),
      detail: detail.into(),
    }
  }

  pub(crate) fn fetch(origin: impl Into<String>, message: impl std::fmt::Display) -> Self {
    Self::Fetch {
      origin: origin.into(),
      message: message.to_string(),
    }
  }

  /// Unsupported shapes and dangling references, as opposed to I/O problems.
  #[must_use]
  pub fn is_unsupported_shape(&self) -> bool {
    matches!(
      self,
      Self::UnsupportedComposition { .. }
        | Self::UnsupportedSchema { .. }
        | Self::UnresolvedReference(_)
        | Self::GenericDefinitionMissing(_)
    )
  }
}
