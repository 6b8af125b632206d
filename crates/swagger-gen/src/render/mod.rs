pub mod engine;
pub(crate) mod helpers;
pub mod presets;

pub use engine::{TemplateRenderer, merge_sources};
pub use presets::{DEFAULT_API_TEMPLATE, DEFAULT_MODEL_TEMPLATE};

#[cfg(test)]
mod tests;
