use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{Local, Timelike};
use crossterm::style::Stylize;
use swagger_gen::{
  ApiDocsConfig, ApiOptions, GenerationReport, ModelOptions, Orchestrator, TargetSettings,
  config::{ApiTransform, DocumentSource, IndexFile, ModelTransform},
  generator::{GenerationStats, ResponseType},
  output::Formatter,
};

use crate::ui::{Colors, cli::GenerateCommand};

fn format_timestamp() -> String {
  let now = Local::now();
  format!("[{:02}:{:02}:{:02}]", now.hour(), now.minute(), now.second())
}

pub struct GenerateConfig {
  pub targets: Vec<TargetSettings>,
  pub working_dir: PathBuf,
  pub verbose: bool,
  pub quiet: bool,
}

/// Flags that apply to every target, including those read from a config file.
#[derive(Debug, Clone, Default)]
struct Overrides {
  no_models: bool,
  no_api: bool,
  no_format: bool,
  no_index: bool,
  no_clean: bool,
  extension: Option<String>,
  response_type: Option<ResponseType>,
}

impl GenerateConfig {
  pub async fn from_command(command: GenerateCommand) -> anyhow::Result<Self> {
    let GenerateCommand {
      config,
      input,
      base_path,
      no_models,
      no_api,
      no_format,
      no_index,
      no_clean,
      extension,
      model_template,
      api_template,
      response_type,
      verbose,
      quiet,
    } = command;

    let overrides = Overrides {
      no_models,
      no_api,
      no_format,
      no_index,
      no_clean,
      extension,
      response_type,
    };
    let working_dir = std::env::current_dir().context("Cannot determine the current directory")?;

    let targets = match (config, input, base_path) {
      (Some(config_path), _, _) => {
        let file = ApiDocsConfig::load(&config_path).await?;
        let config_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
        let mut targets = Vec::with_capacity(file.api_docs.len());
        for doc in file.api_docs {
          targets.push(overrides.apply(doc.into_settings(config_dir).await?));
        }
        targets
      }
      (None, Some(input), Some(base_path)) => {
        let model_template = read_template(model_template.as_deref()).await?;
        let api_template = read_template(api_template.as_deref()).await?;
        let settings = TargetSettings::builder()
          .source(DocumentSource::parse(&input))
          .base_path(base_path)
          .models(
            ModelOptions::builder()
              .maybe_transform(model_template.map(ModelTransform::Template))
              .build(),
          )
          .api(
            ApiOptions::builder()
              .maybe_transform(api_template.map(ApiTransform::Template))
              .build(),
          )
          .build();
        vec![overrides.apply(settings)]
      }
      _ => anyhow::bail!("Either --config or both --input and --base-path are required"),
    };

    if targets.is_empty() {
      anyhow::bail!("No targets to generate: the configuration has an empty apiDocs list");
    }

    Ok(Self {
      targets,
      working_dir,
      verbose,
      quiet,
    })
  }
}

impl Overrides {
  fn apply(&self, mut settings: TargetSettings) -> TargetSettings {
    if self.no_clean {
      settings.clean = false;
    }
    if self.no_models {
      settings.models = None;
    }
    if self.no_api {
      settings.api = None;
    }
    if let Some(models) = settings.models.as_mut() {
      if self.no_format {
        models.prettier = false;
      }
      if self.no_index {
        models.index = IndexFile::Disabled;
      }
      if self.extension.is_some() {
        models.extension.clone_from(&self.extension);
      }
    }
    if let Some(api) = settings.api.as_mut() {
      if self.no_format {
        api.prettier = false;
      }
      if self.extension.is_some() {
        api.extension.clone_from(&self.extension);
      }
      if let Some(response_type) = self.response_type {
        api.default_response_type = response_type;
      }
    }
    settings
  }
}

async fn read_template(path: Option<&Path>) -> anyhow::Result<Option<String>> {
  let Some(path) = path else {
    return Ok(None);
  };
  let template = tokio::fs::read_to_string(path)
    .await
    .with_context(|| format!("Cannot read template file {}", path.display()))?;
  Ok(Some(template))
}

struct GenerateLogger<'a> {
  config: &'a GenerateConfig,
  colors: &'a Colors,
}

impl<'a> GenerateLogger<'a> {
  fn new(config: &'a GenerateConfig, colors: &'a Colors) -> Self {
    Self { config, colors }
  }

  fn info(&self, message: &str) {
    if !self.config.quiet {
      println!("{} {message}", format_timestamp().with(self.colors.timestamp()));
    }
  }

  fn stat(&self, label: &str, value: String) {
    if !self.config.quiet {
      println!(
        "            {:<25} {}",
        label.with(self.colors.label()),
        value.with(self.colors.value())
      );
    }
  }

  fn log_loading(&self, settings: &TargetSettings) {
    self.info(
      &format!("Loading API document from: {}", settings.source)
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn log_generated(&self, report: &GenerationReport) {
    let title = report.title.as_deref().unwrap_or("untitled document");
    self.info(
      &format!("Generated {title} ({})", report.version)
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn print_statistics(&self, stats: &GenerationStats) {
    if self.config.quiet {
      return;
    }

    self.stat("Types resolved:", stats.types_resolved.to_string());
    self.stat("Models generated:", stats.models_generated.to_string());
    self.stat(
      "",
      format!(
        "{} classes, {} interfaces, {} enums",
        stats.classes_generated, stats.interfaces_generated, stats.enums_generated
      ),
    );
    self.stat("Actions generated:", stats.actions_generated.to_string());
    if stats.controllers_generated > 0 || stats.namespaces_generated > 0 {
      self.stat(
        "",
        format!(
          "{} controllers, {} namespaces",
          stats.controllers_generated, stats.namespaces_generated
        ),
      );
    }
    self.stat("Files written:", stats.files_written.to_string());
    if !stats.warnings.is_empty() {
      self.stat("Warnings:", stats.warnings.len().to_string());
    }

    self.print_cycles("Cyclic references:", "Reference", &stats.cyclic_reference_details);
    self.print_cycles("Import cycles:", "Import cycle", &stats.import_cycle_details);
    self.print_warnings(stats);
  }

  fn print_cycles(&self, label: &str, item: &str, cycles: &[Vec<String>]) {
    if cycles.is_empty() {
      return;
    }

    self.stat(label, cycles.len().to_string());

    if self.config.verbose {
      for (i, cycle) in cycles.iter().enumerate() {
        println!(
          "              {}: {}",
          format!("{item} {}", i + 1).with(self.colors.accent()),
          cycle.join(" -> ").with(self.colors.info())
        );
      }
    }
  }

  fn print_warnings(&self, stats: &GenerationStats) {
    let mut printed_header = false;
    for warning in &stats.warnings {
      if !warning.is_prominent() && !self.config.verbose {
        continue;
      }

      if !printed_header {
        println!();
        printed_header = true;
      }

      eprintln!(
        "{} {}",
        "Warning:".with(self.colors.accent()),
        format!("{warning}").with(self.colors.primary())
      );
    }
  }

  fn log_written(&self, report: &GenerationReport) {
    self.info(
      &format!("Wrote to: {}", report.base_path.display())
        .with(self.colors.primary())
        .to_string(),
    );
    if self.config.verbose && !self.config.quiet {
      let api_paths = report.api.iter().flat_map(|api| api.paths.values());
      for path in report.models.paths.values().chain(report.models.index_path.iter()).chain(api_paths) {
        println!("              {}", path.display().to_string().with(self.colors.info()));
      }
    }
  }

  fn log_failure(&self, settings: &TargetSettings, error: &anyhow::Error) {
    eprintln!(
      "{} {} {}",
      format_timestamp().with(self.colors.timestamp()),
      format!("Failed to generate {}:", settings.source).with(self.colors.accent()),
      format!("{error:#}").with(self.colors.primary())
    );
  }

  fn log_success(&self, succeeded: usize) {
    if !self.config.quiet {
      let noun = if succeeded == 1 { "target" } else { "targets" };
      println!();
      println!(
        "{} {}",
        format_timestamp().with(self.colors.timestamp()),
        format!("Successfully generated {succeeded} {noun}").with(self.colors.success())
      );
    }
  }
}

/// Runs every target in order. A failing target is reported and the rest still run.
pub async fn generate_code(config: GenerateConfig, colors: &Colors) -> anyhow::Result<()> {
  let logger = GenerateLogger::new(&config, colors);
  let formatter = Formatter::default();
  let mut failed = 0usize;

  for settings in &config.targets {
    logger.log_loading(settings);
    let orchestrator = Orchestrator::new(settings.clone())
      .with_working_dir(&config.working_dir)
      .with_formatter(formatter.clone());

    match orchestrator.run().await {
      Ok(report) => {
        logger.log_generated(&report);
        logger.print_statistics(&report.stats);
        logger.log_written(&report);
      }
      Err(e) => {
        logger.log_failure(settings, &e);
        failed += 1;
      }
    }
  }

  if failed > 0 {
    anyhow::bail!("{failed} of {} targets failed", config.targets.len());
  }
  logger.log_success(config.targets.len());
  Ok(())
}
