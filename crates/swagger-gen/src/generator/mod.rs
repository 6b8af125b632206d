pub mod dependency_graph;
pub mod metrics;
pub mod model_projector;
pub mod operation_projector;
pub mod orchestrator;
pub mod type_resolver;
pub mod types;

pub use metrics::{GenerationStats, GenerationWarning};
pub use model_projector::{Definition, ModelEntry, ModelProperty};
pub use operation_projector::{ApiAction, ApiController, ApiDefinition, ApiNamespace, OperationProjector, ResponseType};
pub use orchestrator::Projection;
pub use type_resolver::{ResolvedTypes, TypeResolver};
pub use types::{ResolvedType, TypeGraph, TypeId};

#[cfg(test)]
mod tests;
