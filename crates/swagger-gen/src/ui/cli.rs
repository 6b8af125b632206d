use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use swagger_gen::generator::ResponseType;

use crate::ui::colors::{ColorMode, Colors, ThemeMode};

#[derive(Parser, Debug)]
#[command(name = "swagger-gen")]
#[command(author, version, about = "Generates TypeScript models and API clients from OpenAPI v2/v3 documents")]
#[command(styles = Colors::clap_styles())]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  /// Control color output
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub color: ColorMode,

  /// Terminal theme (dark or light background)
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub theme: ThemeMode,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Inspect an API document without writing anything
  List {
    #[command(subcommand)]
    list_command: ListCommands,
  },
  /// Generate TypeScript models and API functions
  Generate(GenerateCommand),
}

#[derive(Args, Debug)]
pub struct GenerateCommand {
  /// JSON configuration file with an `apiDocs` list of targets
  #[arg(short, long, value_name = "FILE", conflicts_with_all = ["input", "base_path"])]
  pub config: Option<PathBuf>,

  /// URL or file path of the OpenAPI/Swagger document
  #[arg(short, long, value_name = "URL|FILE", required_unless_present = "config")]
  pub input: Option<String>,

  /// Directory the `models/` and `apis/` folders are written to
  #[arg(short = 'o', long, value_name = "DIR", required_unless_present = "config")]
  pub base_path: Option<PathBuf>,

  /// Skip model generation
  #[arg(long, default_value_t = false)]
  pub no_models: bool,

  /// Skip API generation
  #[arg(long, default_value_t = false)]
  pub no_api: bool,

  /// Do not run prettier on generated files
  #[arg(long, default_value_t = false)]
  pub no_format: bool,

  /// Do not write the models index file
  #[arg(long, default_value_t = false)]
  pub no_index: bool,

  /// Keep existing files in the base path
  #[arg(long, default_value_t = false)]
  pub no_clean: bool,

  /// Extension for generated files (default: .ts)
  #[arg(long, value_name = "EXT")]
  pub extension: Option<String>,

  /// Template file used for each model
  #[arg(long, value_name = "FILE")]
  pub model_template: Option<PathBuf>,

  /// Template file used for the API file
  #[arg(long, value_name = "FILE")]
  pub api_template: Option<PathBuf>,

  /// Response type for actions whose success response is neither JSON nor binary
  #[arg(long, value_name = "TYPE", value_parser = parse_response_type)]
  pub response_type: Option<ResponseType>,

  /// Enable verbose output with detailed progress information
  #[arg(short, long, default_value_t = false)]
  pub verbose: bool,

  /// Suppress non-essential output (errors only)
  #[arg(short, long, default_value_t = false, conflicts_with = "verbose")]
  pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
  /// List every action the API file would contain
  Actions {
    /// URL or file path of the OpenAPI/Swagger document
    #[arg(short, long, value_name = "URL|FILE")]
    input: String,
  },
}

fn parse_response_type(value: &str) -> Result<ResponseType, String> {
  value
    .parse()
    .map_err(|_| format!("expected one of json, blob, text; got '{value}'"))
}
