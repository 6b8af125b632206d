use std::{
  collections::HashSet,
  path::{Path, PathBuf},
};

use indexmap::IndexMap;
use itertools::Itertools;

use super::{
  dependency_graph::ModelDependencyGraph,
  metrics::{GenerationStats, GenerationWarning},
  model_projector::{self, ModelEntry},
  operation_projector::{ApiDefinition, ApiDependency, OperationProjector, ResponseType},
  type_resolver::{ResolvedTypes, TypeResolver},
};
use crate::{
  config::{ActionHook, ApiOptions, ApiTransform, ModelOptions, ModelTransform, OutputPath, TargetSettings},
  error::Result,
  output::{ApiOutput, FileWriter, Formatter, ModelOutput, OutputKind, PendingFile, file_id, writer},
  render::{DEFAULT_API_TEMPLATE, DEFAULT_MODEL_TEMPLATE, TemplateRenderer, merge_sources},
  schema::{ApiDocument, SpecVersion},
  utils::spec::SpecLoader,
};

const API_FILE_NAME: &str = "index";

/// The in-memory result of one pass over a document: types, models and actions.
#[derive(Debug, Clone)]
pub struct Projection {
  pub types: ResolvedTypes,
  pub models: Vec<ModelEntry>,
  pub api: ApiDefinition,
  pub warnings: Vec<GenerationWarning>,
}

impl Projection {
  /// Resolves every named schema, projects the operations (resolving the inline
  /// schemas they carry) and finally projects the models.
  pub fn build(document: &ApiDocument, response_type: ResponseType, action_hook: Option<ActionHook>) -> Result<Self> {
    let mut resolver = TypeResolver::new(document);
    resolver.resolve_all()?;

    let (api, warnings) = OperationProjector::new(&mut resolver)
      .with_default_response_type(response_type)
      .with_action_hook(action_hook)
      .project()?;

    let types = resolver.finish();
    let models = model_projector::project(&types);
    Ok(Self {
      types,
      models,
      api,
      warnings,
    })
  }

  #[must_use]
  pub fn stats(&self) -> GenerationStats {
    let mut stats = GenerationStats {
      types_resolved: self.types.graph.len(),
      ..GenerationStats::default()
    };
    stats.record_cyclic_references(&self.types.cycles);
    stats.record_warnings(self.warnings.iter().cloned());
    stats.record_models(&self.models);
    stats.record_import_cycles(ModelDependencyGraph::from_models(&self.models).import_cycles());
    stats.record_api(&self.api);
    stats
  }
}

/// Outcome of one generation target.
#[derive(Debug, Clone)]
pub struct GenerationReport {
  pub source: String,
  pub base_path: PathBuf,
  pub version: SpecVersion,
  pub title: Option<String>,
  pub models: ModelOutput,
  pub api: Option<ApiOutput>,
  pub stats: GenerationStats,
}

/// Runs one generation target from document to files on disk.
pub struct Orchestrator {
  settings: TargetSettings,
  working_dir: PathBuf,
  writer: FileWriter,
}

impl Orchestrator {
  #[must_use]
  pub fn new(settings: TargetSettings) -> Self {
    Self {
      settings,
      working_dir: PathBuf::new(),
      writer: FileWriter::default(),
    }
  }

  /// Directory that a relative base path is resolved against.
  #[must_use]
  pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
    self.working_dir = dir.into();
    self
  }

  #[must_use]
  pub fn with_formatter(mut self, formatter: Formatter) -> Self {
    self.writer = FileWriter::new(formatter);
    self
  }

  #[must_use]
  pub fn base_path(&self) -> PathBuf {
    if self.settings.base_path.is_absolute() {
      self.settings.base_path.clone()
    } else {
      self.working_dir.join(&self.settings.base_path)
    }
  }

  pub async fn run(&self) -> anyhow::Result<GenerationReport> {
    let base_path = self.base_path();
    let mut clean_warning = None;
    if self.settings.clean
      && let Err(e) = writer::clean_dir(&base_path).await
    {
      clean_warning = Some(GenerationWarning::CleanFailed {
        path: base_path.display().to_string(),
        error: format!("{e:#}"),
      });
    }

    let document = SpecLoader::load(&self.settings.source).await?;
    let api_options = self.settings.api.as_ref();
    let projection = Projection::build(
      &document,
      api_options.map(|api| api.default_response_type).unwrap_or_default(),
      api_options.and_then(|api| api.on_before_write_action.clone()),
    )?;

    let mut stats = projection.stats();
    stats.record_warnings(clean_warning);

    let renderer = TemplateRenderer::new();
    let mut pending = vec![];

    let model_output = match &self.settings.models {
      Some(options) => self.stage_models(&renderer, options, projection.models.clone(), &base_path, &mut pending)?,
      None => ModelOutput::default(),
    };

    let api_output = match api_options {
      Some(options) => {
        let mut api = projection.api.clone();
        api.dependencies = api_dependencies(&model_output);
        Some(self.stage_api(&renderer, options, api, &base_path, &mut pending)?)
      }
      None => None,
    };

    let report = self.writer.write_all(pending).await?;
    for _ in &report.written {
      stats.record_file();
    }
    stats.record_warnings(report.warnings);

    if let Some(hook) = &self.settings.on_after_write {
      hook(&model_output, api_output.as_ref());
    }

    Ok(GenerationReport {
      source: self.settings.source.to_string(),
      base_path,
      version: document.version,
      title: document.title.clone(),
      models: model_output,
      api: api_output,
      stats,
    })
  }

  fn stage_models(
    &self,
    renderer: &TemplateRenderer,
    options: &ModelOptions,
    models: Vec<ModelEntry>,
    base_path: &Path,
    pending: &mut Vec<PendingFile>,
  ) -> Result<ModelOutput> {
    let models: Vec<ModelEntry> = match &options.on_before_write {
      Some(hook) => models.into_iter().map(|model| hook(model)).collect(),
      None => models,
    };
    let extension = options.extension();

    let mut sources: IndexMap<&str, Vec<String>> = IndexMap::new();
    for model in &models {
      let code = match &options.transform {
        Some(ModelTransform::Function(transform)) => transform(model),
        Some(ModelTransform::Template(template)) => renderer.render_model(template, model)?,
        None => renderer.render_model(DEFAULT_MODEL_TEMPLATE, model)?,
      };
      sources.entry(model.key.as_str()).or_default().push(code);
    }

    let mut paths = IndexMap::new();
    for (key, parts) in &sources {
      let path = file_id(base_path, options.output.as_ref(), key, OutputKind::Models, &extension, true);
      pending.push(PendingFile {
        path: path.clone(),
        code: merge_sources(parts),
        format: options.prettier,
      });
      paths.insert((*key).to_string(), path);
    }

    let index_path = options.index.file_name().map(|name| {
      let path = file_id(base_path, options.output.as_ref(), name, OutputKind::Models, &extension, false);
      pending.push(PendingFile {
        path: path.clone(),
        code: sources.keys().map(|key| format!("export * from \"./{key}\";")).join("\n"),
        format: false,
      });
      path
    });

    Ok(ModelOutput {
      models,
      paths,
      index_path,
    })
  }

  fn stage_api(
    &self,
    renderer: &TemplateRenderer,
    options: &ApiOptions,
    api: ApiDefinition,
    base_path: &Path,
    pending: &mut Vec<PendingFile>,
  ) -> Result<ApiOutput> {
    let extension = options.extension();
    let mut paths = IndexMap::new();

    match &options.transform {
      Some(ApiTransform::Function(transform)) => {
        let default_path = file_id(base_path, None, API_FILE_NAME, OutputKind::Apis, &extension, false);
        for file in transform(&api, &default_path) {
          let path = match &file.output {
            Some(OutputPath::Custom(resolve)) => resolve(&default_path),
            output => file_id(base_path, output.as_ref(), API_FILE_NAME, OutputKind::Apis, &extension, false),
          };
          paths.insert(file_stem(&path), path.clone());
          pending.push(PendingFile {
            path,
            code: file.code,
            format: options.prettier,
          });
        }
      }
      transform => {
        let template = match transform {
          Some(ApiTransform::Template(template)) => template.as_str(),
          _ => DEFAULT_API_TEMPLATE,
        };
        let code = renderer.render_api(template, &api)?;
        let path = file_id(base_path, options.output.as_ref(), API_FILE_NAME, OutputKind::Apis, &extension, false);
        paths.insert(API_FILE_NAME.to_string(), path.clone());
        pending.push(PendingFile {
          path,
          code,
          format: options.prettier,
        });
      }
    }

    Ok(ApiOutput { api, paths })
  }
}

/// One import per written model, pointing at the file it landed in.
fn api_dependencies(models: &ModelOutput) -> Vec<ApiDependency> {
  let mut seen = HashSet::new();
  models
    .models
    .iter()
    .filter(|model| seen.insert((model.key.clone(), model.export_name.clone())))
    .filter_map(|model| {
      let path = models.paths.get(&model.key)?;
      Some(ApiDependency {
        id: model.key.clone(),
        modules: model.export_name.clone(),
        file_id: path.display().to_string(),
      })
    })
    .collect()
}

fn file_stem(path: &Path) -> String {
  path
    .file_stem()
    .map(|stem| stem.to_string_lossy().into_owned())
    .unwrap_or_default()
}
