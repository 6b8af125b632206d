use std::collections::HashSet;

use minijinja::{Environment, context};

use super::helpers;
use crate::{
  error::Result,
  generator::{model_projector::ModelEntry, operation_projector::ApiDefinition},
};

/// Template engine for one generation run, with the generator helpers installed.
pub struct TemplateRenderer {
  env: Environment<'static>,
}

impl Default for TemplateRenderer {
  fn default() -> Self {
    Self::new()
  }
}

impl TemplateRenderer {
  #[must_use]
  pub fn new() -> Self {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    helpers::register(&mut env);
    Self { env }
  }

  /// Renders `template` with `{ data: model }`.
  pub fn render_model(&self, template: &str, model: &ModelEntry) -> Result<String> {
    Ok(self.env.render_str(template, context! { data => model })?)
  }

  /// Renders `template` with `{ data: api }`.
  pub fn render_api(&self, template: &str, api: &ApiDefinition) -> Result<String> {
    Ok(self.env.render_str(template, context! { data => api })?)
  }
}

/// Concatenates sources that share one file, keeping the first copy of each
/// repeated `import` line.
#[must_use]
pub fn merge_sources(sources: &[String]) -> String {
  let mut seen_imports = HashSet::new();
  let mut merged: Vec<&str> = vec![];
  for source in sources {
    for line in source.lines() {
      let trimmed = line.trim();
      if trimmed.starts_with("import ") && !seen_imports.insert(trimmed) {
        continue;
      }
      merged.push(line);
    }
  }
  let mut text = merged.join("\n");
  text.push('\n');
  text
}
