use std::path::Path;

use fmmap::tokio::{AsyncMmapFile, AsyncMmapFileExt};
use serde_json::Value;

use crate::{
  config::DocumentSource,
  error::{GeneratorError, Result},
  schema::ApiDocument,
};

/// Loads API documents from a URL, a local file or a resolver callback.
pub struct SpecLoader;

impl SpecLoader {
  pub async fn load(source: &DocumentSource) -> Result<ApiDocument> {
    let value = Self::fetch(source).await?;
    ApiDocument::from_value(&value)
  }

  /// Fetches the raw JSON without interpreting it.
  pub async fn fetch(source: &DocumentSource) -> Result<Value> {
    match source {
      DocumentSource::Url(url) => Self::fetch_url(url).await,
      DocumentSource::File(path) => Self::read_file(path).await,
      DocumentSource::Resolver(resolve) => resolve().map_err(|e| GeneratorError::fetch(source.to_string(), e)),
    }
  }

  async fn fetch_url(url: &str) -> Result<Value> {
    let response = reqwest::Client::new()
      .get(url)
      .send()
      .await
      .and_then(reqwest::Response::error_for_status)
      .map_err(|e| GeneratorError::fetch(url, e))?;
    let bytes = response.bytes().await.map_err(|e| GeneratorError::fetch(url, e))?;
    serde_json::from_slice(&bytes).map_err(|e| GeneratorError::fetch(url, format!("response is not valid JSON: {e}")))
  }

  async fn read_file(path: &Path) -> Result<Value> {
    let origin = path.display().to_string();
    let file = AsyncMmapFile::open(path)
      .await
      .map_err(|e| GeneratorError::fetch(origin.as_str(), e))?;
    serde_json::from_slice(file.as_slice())
      .map_err(|e| GeneratorError::fetch(origin.as_str(), format!("file is not valid JSON: {e}")))
  }
}
