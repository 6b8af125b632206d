pub mod document;
pub mod node;
pub mod refs;
mod swagger2;

pub use document::{
  ApiDocument, Body, HttpMethod, LimitedOperations, LimitedResource, Operation, Parameter, ParameterLocation,
  SpecVersion, Tag,
};
pub use node::{
  AdditionalProperties, CompositionKind, EnumMember, NodeId, ObjectShape, Primitive, SchemaArena, SchemaKind,
  SchemaNode, TypeExtensions,
};

#[cfg(test)]
mod tests;
