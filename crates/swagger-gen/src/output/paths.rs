use std::path::{Path, PathBuf};

use strum::Display;

use crate::config::OutputPath;

/// Default sub-directory of the base path for each kind of output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum OutputKind {
  Models,
  Apis,
}

/// Resolves the path of one generated file.
///
/// - no output: `<base>/<kind>/<name>`
/// - absolute directory: `<dir>/<name>`
/// - relative directory: `<base>/<dir>/<name>`
/// - custom function: called with `<base>/<kind>/<name>`
///
/// `extension` is appended when `force_extension` is set (model keys, which may
/// contain dots) or when the resulting path has no extension yet.
#[must_use]
pub fn file_id(
  base_path: &Path,
  output: Option<&OutputPath>,
  file_name: &str,
  kind: OutputKind,
  extension: &str,
  force_extension: bool,
) -> PathBuf {
  let default_path = base_path.join(kind.to_string()).join(file_name);
  let (path, force) = match output {
    None => (default_path, force_extension),
    Some(OutputPath::Dir(dir)) if dir.is_absolute() => (dir.join(file_name), force_extension),
    Some(OutputPath::Dir(dir)) => (base_path.join(dir).join(file_name), force_extension),
    Some(OutputPath::Custom(resolve)) => (resolve(&default_path), false),
  };

  if force || path.extension().is_none() {
    let mut raw = path.into_os_string();
    raw.push(extension);
    PathBuf::from(raw)
  } else {
    path
  }
}
