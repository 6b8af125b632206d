//! Generation targets: the JSON configuration file and the runtime settings built
//! from it (or assembled directly, closures included).

use std::{
  fmt,
  path::{Path, PathBuf},
  sync::Arc,
};

use serde::Deserialize;
use serde_json::Value;

use crate::{
  error::{GeneratorError, Result},
  generator::{
    model_projector::ModelEntry,
    operation_projector::{ApiAction, ApiDefinition, ResponseType},
  },
  output::{ApiOutput, ModelOutput},
};

pub const DEFAULT_EXTENSION: &str = ".ts";
pub const DEFAULT_INDEX_NAME: &str = "index";

pub type ModelHook = Arc<dyn Fn(ModelEntry) -> ModelEntry + Send + Sync>;
pub type ActionHook = Arc<dyn Fn(ApiAction) -> ApiAction + Send + Sync>;
pub type AfterWriteHook = Arc<dyn Fn(&ModelOutput, Option<&ApiOutput>) + Send + Sync>;
pub type OutputFn = Arc<dyn Fn(&Path) -> PathBuf + Send + Sync>;
pub type ModelTransformFn = Arc<dyn Fn(&ModelEntry) -> String + Send + Sync>;
pub type ApiTransformFn = Arc<dyn Fn(&ApiDefinition, &Path) -> Vec<TransformedFile> + Send + Sync>;
pub type ResolverResult = std::result::Result<Value, Box<dyn std::error::Error + Send + Sync>>;
pub type DocumentResolver = Arc<dyn Fn() -> ResolverResult + Send + Sync>;

/// Where a document comes from.
#[derive(Clone)]
pub enum DocumentSource {
  Url(String),
  File(PathBuf),
  Resolver(DocumentResolver),
}

impl DocumentSource {
  /// `http(s)://` locations are fetched, anything else is read from disk.
  #[must_use]
  pub fn parse(location: &str) -> Self {
    let lower = location.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
      Self::Url(location.to_string())
    } else {
      Self::File(PathBuf::from(location))
    }
  }
}

impl From<&str> for DocumentSource {
  fn from(location: &str) -> Self {
    Self::parse(location)
  }
}

impl fmt::Display for DocumentSource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Url(url) => f.write_str(url),
      Self::File(path) => write!(f, "{}", path.display()),
      Self::Resolver(_) => f.write_str("<resolver>"),
    }
  }
}

impl fmt::Debug for DocumentSource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "DocumentSource({self})")
  }
}

/// Output location for generated files.
#[derive(Clone)]
pub enum OutputPath {
  /// Directory; relative paths are taken from the target's base path.
  Dir(PathBuf),
  /// Receives the default file path and returns the one to use.
  Custom(OutputFn),
}

impl fmt::Debug for OutputPath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Dir(dir) => f.debug_tuple("Dir").field(dir).finish(),
      Self::Custom(_) => f.write_str("Custom(..)"),
    }
  }
}

#[derive(Clone)]
pub enum ModelTransform {
  Template(String),
  Function(ModelTransformFn),
}

#[derive(Clone)]
pub enum ApiTransform {
  Template(String),
  Function(ApiTransformFn),
}

/// One file produced by a function API transform.
#[derive(Clone, Debug)]
pub struct TransformedFile {
  pub output: Option<OutputPath>,
  pub code: String,
}

/// The aggregate `export *` file of the models directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum IndexFile {
  Disabled,
  #[default]
  Default,
  Named(String),
}

impl IndexFile {
  #[must_use]
  pub fn file_name(&self) -> Option<&str> {
    match self {
      Self::Disabled => None,
      Self::Default => Some(DEFAULT_INDEX_NAME),
      Self::Named(name) => Some(name),
    }
  }
}

#[derive(Clone, bon::Builder)]
pub struct ModelOptions {
  pub output: Option<OutputPath>,
  pub transform: Option<ModelTransform>,
  #[builder(default)]
  pub index: IndexFile,
  #[builder(default = true)]
  pub prettier: bool,
  #[builder(into)]
  pub extension: Option<String>,
  pub on_before_write: Option<ModelHook>,
}

impl Default for ModelOptions {
  fn default() -> Self {
    Self::builder().build()
  }
}

impl ModelOptions {
  #[must_use]
  pub fn extension(&self) -> String {
    normalize_extension(self.extension.as_deref())
  }
}

#[derive(Clone, bon::Builder)]
pub struct ApiOptions {
  pub output: Option<OutputPath>,
  pub transform: Option<ApiTransform>,
  #[builder(default = true)]
  pub prettier: bool,
  #[builder(into)]
  pub extension: Option<String>,
  #[builder(default)]
  pub default_response_type: ResponseType,
  pub on_before_write_action: Option<ActionHook>,
}

impl Default for ApiOptions {
  fn default() -> Self {
    Self::builder().build()
  }
}

impl ApiOptions {
  #[must_use]
  pub fn extension(&self) -> String {
    normalize_extension(self.extension.as_deref())
  }
}

/// Everything one generation target needs. `None` for `models` or `api` turns that
/// output off.
#[derive(Clone, bon::Builder)]
pub struct TargetSettings {
  #[builder(into)]
  pub source: DocumentSource,
  #[builder(into)]
  pub base_path: PathBuf,
  #[builder(default = true)]
  pub clean: bool,
  pub models: Option<ModelOptions>,
  pub api: Option<ApiOptions>,
  pub on_after_write: Option<AfterWriteHook>,
}

fn normalize_extension(extension: Option<&str>) -> String {
  match extension.map(str::trim).filter(|ext| !ext.is_empty()) {
    Some(ext) if ext.starts_with('.') => ext.to_string(),
    Some(ext) => format!(".{ext}"),
    None => DEFAULT_EXTENSION.to_string(),
  }
}

/// Root of an `api.config.json` file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDocsConfig {
  pub api_docs: Vec<ApiDocConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDocConfig {
  pub url: String,
  pub base_path: PathBuf,
  #[serde(default = "enabled")]
  pub clean: bool,
  #[serde(default)]
  pub template: TemplateConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateConfig {
  #[serde(default)]
  pub models: Toggle<ModelFileOptions>,
  #[serde(default)]
  pub api: Toggle<ApiFileOptions>,
}

/// `false` disables an output, `true` or an object enables it.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Toggle<T> {
  Flag(bool),
  Options(T),
}

impl<T> Default for Toggle<T> {
  fn default() -> Self {
    Self::Flag(true)
  }
}

impl<T: Default> Toggle<T> {
  pub fn into_options(self) -> Option<T> {
    match self {
      Self::Flag(false) => None,
      Self::Flag(true) => Some(T::default()),
      Self::Options(options) => Some(options),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IndexSetting {
  Flag(bool),
  Name(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelFileOptions {
  pub output: Option<PathBuf>,
  pub transform: Option<String>,
  pub transform_file: Option<PathBuf>,
  pub dts: Option<IndexSetting>,
  pub prettier: Option<bool>,
  pub extension: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFileOptions {
  pub output: Option<PathBuf>,
  pub transform: Option<String>,
  pub transform_file: Option<PathBuf>,
  pub prettier: Option<bool>,
  pub extension: Option<String>,
  pub default_response_type: Option<ResponseType>,
}

fn enabled() -> bool {
  true
}

impl ApiDocsConfig {
  /// Parses a configuration file, reporting the JSON path of the first bad field.
  pub fn from_slice(origin: &str, bytes: &[u8]) -> Result<Self> {
    let de = &mut serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(de).map_err(|e| GeneratorError::InvalidConfig {
      origin: origin.to_string(),
      path: e.path().to_string(),
      message: e.inner().to_string(),
    })
  }

  pub async fn load(path: &Path) -> Result<Self> {
    let origin = path.display().to_string();
    let bytes = tokio::fs::read(path)
      .await
      .map_err(|e| GeneratorError::InvalidConfig {
        origin: origin.clone(),
        path: ".".to_string(),
        message: e.to_string(),
      })?;
    Self::from_slice(&origin, &bytes)
  }
}

impl ApiDocConfig {
  /// Builds runtime settings. Relative `transformFile` paths are read from
  /// `config_dir`.
  pub async fn into_settings(self, config_dir: &Path) -> Result<TargetSettings> {
    let models = match self.template.models.into_options() {
      Some(options) => Some(model_options(options, config_dir).await?),
      None => None,
    };
    let api = match self.template.api.into_options() {
      Some(options) => Some(api_options(options, config_dir).await?),
      None => None,
    };

    Ok(
      TargetSettings::builder()
        .source(DocumentSource::parse(&self.url))
        .base_path(self.base_path)
        .clean(self.clean)
        .maybe_models(models)
        .maybe_api(api)
        .build(),
    )
  }
}

async fn model_options(options: ModelFileOptions, config_dir: &Path) -> Result<ModelOptions> {
  let transform = read_transform(options.transform, options.transform_file, config_dir).await?;
  let index = match options.dts {
    None | Some(IndexSetting::Flag(true)) => IndexFile::Default,
    Some(IndexSetting::Flag(false)) => IndexFile::Disabled,
    Some(IndexSetting::Name(name)) => IndexFile::Named(name),
  };
  Ok(
    ModelOptions::builder()
      .maybe_output(options.output.map(OutputPath::Dir))
      .maybe_transform(transform.map(ModelTransform::Template))
      .index(index)
      .prettier(options.prettier.unwrap_or(true))
      .maybe_extension(options.extension)
      .build(),
  )
}

async fn api_options(options: ApiFileOptions, config_dir: &Path) -> Result<ApiOptions> {
  let transform = read_transform(options.transform, options.transform_file, config_dir).await?;
  Ok(
    ApiOptions::builder()
      .maybe_output(options.output.map(OutputPath::Dir))
      .maybe_transform(transform.map(ApiTransform::Template))
      .prettier(options.prettier.unwrap_or(true))
      .maybe_extension(options.extension)
      .default_response_type(options.default_response_type.unwrap_or_default())
      .build(),
  )
}

async fn read_transform(inline: Option<String>, file: Option<PathBuf>, config_dir: &Path) -> Result<Option<String>> {
  if inline.is_some() {
    return Ok(inline);
  }
  let Some(file) = file else {
    return Ok(None);
  };
  let path = if file.is_absolute() { file } else { config_dir.join(file) };
  tokio::fs::read_to_string(&path)
    .await
    .map(Some)
    .map_err(|e| GeneratorError::InvalidConfig {
      origin: path.display().to_string(),
      path: "transformFile".to_string(),
      message: e.to_string(),
    })
}
