#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::too_many_lines)]
//! Generates TypeScript models and API clients from OpenAPI v2/v3 documents.
//!
//! A generation pass loads a document, normalizes it into a [`schema::ApiDocument`],
//! resolves every schema into a [`generator::TypeGraph`], projects models and actions
//! out of that graph and renders them through a [`render::TemplateRenderer`].

pub mod config;
pub mod error;
pub mod generator;
pub mod naming;
pub mod output;
pub mod render;
pub mod schema;
pub mod utils;

pub use config::{ApiDocsConfig, ApiOptions, ModelOptions, TargetSettings};
pub use error::{GeneratorError, Result};
pub use generator::orchestrator::{GenerationReport, Orchestrator};

#[cfg(test)]
mod tests;
