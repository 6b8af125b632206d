use std::path::{Path, PathBuf};

use anyhow::Context;
use tokio::task::JoinSet;

use super::formatter::Formatter;
use crate::generator::metrics::GenerationWarning;

/// A rendered file waiting to be written.
#[derive(Debug, Clone)]
pub struct PendingFile {
  pub path: PathBuf,
  pub code: String,
  pub format: bool,
}

#[derive(Debug, Default)]
pub struct WriteReport {
  /// Written paths, in completion order.
  pub written: Vec<PathBuf>,
  pub warnings: Vec<GenerationWarning>,
}

/// Writes batches of files concurrently, formatting those that ask for it.
#[derive(Debug, Clone, Default)]
pub struct FileWriter {
  formatter: Formatter,
}

impl FileWriter {
  #[must_use]
  pub fn new(formatter: Formatter) -> Self {
    Self { formatter }
  }

  /// Writes every file of the batch. Completion order is unspecified; the first
  /// failed write fails the batch after all tasks have finished.
  pub async fn write_all(&self, files: Vec<PendingFile>) -> anyhow::Result<WriteReport> {
    let mut tasks = JoinSet::new();
    for file in files {
      let formatter = self.formatter.clone();
      tasks.spawn(async move {
        let (code, warning) = if file.format {
          formatter.format(&file.path, file.code).await
        } else {
          (file.code, None)
        };
        write_file(&file.path, &code).await?;
        Ok::<_, anyhow::Error>((file.path, warning))
      });
    }

    let mut report = WriteReport::default();
    let mut first_error = None;
    while let Some(joined) = tasks.join_next().await {
      match joined.context("file write task panicked")? {
        Ok((path, warning)) => {
          report.written.push(path);
          report.warnings.extend(warning);
        }
        Err(e) => {
          first_error.get_or_insert(e);
        }
      }
    }

    match first_error {
      Some(e) => Err(e),
      None => Ok(report),
    }
  }
}

pub async fn write_file(path: &Path, contents: &str) -> anyhow::Result<()> {
  if let Some(parent) = path.parent()
    && !parent.as_os_str().is_empty()
  {
    tokio::fs::create_dir_all(parent)
      .await
      .with_context(|| format!("Failed to create directory {}", parent.display()))?;
  }
  tokio::fs::write(path, contents)
    .await
    .with_context(|| format!("Failed to write {}", path.display()))
}

/// Empties `path`, creating it when missing.
pub async fn clean_dir(path: &Path) -> anyhow::Result<()> {
  if tokio::fs::try_exists(path).await? {
    tokio::fs::remove_dir_all(path)
      .await
      .with_context(|| format!("Failed to remove {}", path.display()))?;
  }
  tokio::fs::create_dir_all(path)
    .await
    .with_context(|| format!("Failed to create {}", path.display()))
}
