use strum::Display;

use super::{
  model_projector::{Definition, ModelEntry},
  operation_projector::ApiDefinition,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationStats {
  pub types_resolved: usize,
  pub models_generated: usize,
  pub classes_generated: usize,
  pub interfaces_generated: usize,
  pub enums_generated: usize,
  pub actions_generated: usize,
  pub controllers_generated: usize,
  pub namespaces_generated: usize,
  pub files_written: usize,
  pub cyclic_references: usize,
  pub cyclic_reference_details: Vec<Vec<String>>,
  pub import_cycles: usize,
  pub import_cycle_details: Vec<Vec<String>>,
  pub warnings: Vec<GenerationWarning>,
}

impl GenerationStats {
  pub fn record_models(&mut self, models: &[ModelEntry]) {
    for model in models {
      self.models_generated += 1;
      match model.definition {
        Definition::Class => self.classes_generated += 1,
        Definition::Enum => self.enums_generated += 1,
        Definition::Interface | Definition::Type => self.interfaces_generated += 1,
      }
    }
  }

  pub fn record_api(&mut self, api: &ApiDefinition) {
    self.actions_generated += api.actions.len();
    self.controllers_generated += api.controllers.len();
    self.namespaces_generated += api.namespaces.len();
    for namespace in &api.namespaces {
      self.controllers_generated += namespace.controllers.len();
    }
    for controller in api.controllers.iter().chain(api.namespaces.iter().flat_map(|ns| &ns.controllers)) {
      self.actions_generated += controller.actions.len();
    }
  }

  pub fn record_cyclic_references(&mut self, cycles: &[Vec<String>]) {
    for cycle in cycles {
      self.cyclic_references += 1;
      self.cyclic_reference_details.push(cycle.clone());
      self.warnings.push(GenerationWarning::CyclicReference {
        path: cycle.join(" -> "),
      });
    }
  }

  pub fn record_import_cycles(&mut self, cycles: Vec<Vec<String>>) {
    self.import_cycles += cycles.len();
    self.import_cycle_details.extend(cycles);
  }

  pub fn record_file(&mut self) {
    self.files_written += 1;
  }

  pub fn record_warning(&mut self, warning: GenerationWarning) {
    self.warnings.push(warning);
  }

  pub fn record_warnings(&mut self, warnings: impl IntoIterator<Item = GenerationWarning>) {
    self.warnings.extend(warnings);
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum GenerationWarning {
  #[strum(to_string = "Cyclic reference {path} was replaced with 'any'")]
  CyclicReference { path: String },
  #[strum(to_string = "Action '{name}' already exists under '{path}', renamed to '{renamed}'")]
  DuplicateActionName {
    path: String,
    name: String,
    renamed: String,
  },
  #[strum(to_string = "Formatter failed for '{file}': {error}")]
  FormatterFailed { file: String, error: String },
  #[strum(to_string = "Formatter unavailable, writing unformatted output: {error}")]
  FormatterUnavailable { error: String },
  #[strum(to_string = "Could not clean output directory '{path}': {error}")]
  CleanFailed { path: String, error: String },
}

impl GenerationWarning {
  /// Warnings printed even without `--verbose`.
  #[must_use]
  pub fn is_prominent(&self) -> bool {
    matches!(
      self,
      Self::DuplicateActionName { .. } | Self::FormatterUnavailable { .. } | Self::CleanFailed { .. }
    )
  }
}
