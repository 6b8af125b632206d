use std::{
  path::Path,
  process::Stdio,
  sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
  },
};

use tokio::{io::AsyncWriteExt, process::Command};

use crate::generator::metrics::GenerationWarning;

pub const DEFAULT_FORMATTER: &str = "prettier";

/// Pipes generated code through an external formatter.
///
/// Formatting never fails a run: on any problem the code is returned untouched
/// together with a warning. A formatter that cannot be started is reported once and
/// not tried again.
#[derive(Debug, Clone)]
pub struct Formatter {
  program: String,
  available: Arc<AtomicBool>,
}

impl Default for Formatter {
  fn default() -> Self {
    Self::new(DEFAULT_FORMATTER)
  }
}

impl Formatter {
  #[must_use]
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
      available: Arc::new(AtomicBool::new(true)),
    }
  }

  pub async fn format(&self, file: &Path, code: String) -> (String, Option<GenerationWarning>) {
    if !self.available.load(Ordering::Relaxed) {
      return (code, None);
    }

    let mut child = match Command::new(&self.program)
      .arg("--stdin-filepath")
      .arg(file)
      .stdin(Stdio::piped())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .kill_on_drop(true)
      .spawn()
    {
      Ok(child) => child,
      Err(e) => {
        let first = self.available.swap(false, Ordering::Relaxed);
        let warning = first.then(|| GenerationWarning::FormatterUnavailable {
          error: format!("{}: {e}", self.program),
        });
        return (code, warning);
      }
    };

    let result = async {
      if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(code.as_bytes()).await?;
      }
      let output = child.wait_with_output().await?;
      if !output.status.success() {
        anyhow::bail!("{}", String::from_utf8_lossy(&output.stderr).trim());
      }
      Ok::<_, anyhow::Error>(String::from_utf8(output.stdout)?)
    }
    .await;

    match result {
      Ok(formatted) if !formatted.trim().is_empty() => (formatted, None),
      Ok(_) => (code, None),
      Err(e) => (
        code,
        Some(GenerationWarning::FormatterFailed {
          file: file.display().to_string(),
          error: e.to_string(),
        }),
      ),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_missing_formatter_falls_back_once() {
    let formatter = Formatter::new("swagger-gen-no-such-formatter");
    let (code, warning) = formatter.format(Path::new("a.ts"), "let a=1".to_string()).await;
    assert_eq!(code, "let a=1");
    assert!(matches!(warning, Some(GenerationWarning::FormatterUnavailable { .. })));

    let (code, warning) = formatter.format(Path::new("b.ts"), "let b=2".to_string()).await;
    assert_eq!(code, "let b=2");
    assert!(warning.is_none());
  }

  #[cfg(unix)]
  #[tokio::test]
  async fn test_failing_formatter_keeps_source() {
    let formatter = Formatter::new("false");
    let (code, warning) = formatter.format(Path::new("a.ts"), "let a=1".to_string()).await;
    assert_eq!(code, "let a=1");
    assert!(matches!(warning, Some(GenerationWarning::FormatterFailed { .. })));
  }
}
