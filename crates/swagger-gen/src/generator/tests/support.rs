use serde_json::{Value, json};

use crate::{
  generator::{ResolvedTypes, TypeResolver},
  schema::ApiDocument,
};

/// An OpenAPI 3 document with the given schemas and paths.
pub(super) fn document(schemas: Value, paths: Value) -> ApiDocument {
  ApiDocument::from_value(&json!({
    "openapi": "3.0.1",
    "info": { "title": "Test", "version": "1.0.0" },
    "paths": paths,
    "components": { "schemas": schemas }
  }))
  .unwrap()
}

pub(super) fn resolve(schemas: Value) -> ResolvedTypes {
  let doc = document(schemas, json!({}));
  let mut resolver = TypeResolver::new(&doc);
  resolver.resolve_all().unwrap();
  resolver.finish()
}

pub(super) fn type_name(types: &ResolvedTypes, schema: &str) -> String {
  types.graph.type_name(types.registry[schema])
}

pub(super) fn json_response(schema: Value) -> Value {
  json!({ "200": { "description": "ok", "content": { "application/json": { "schema": schema } } } })
}

pub(super) fn schema_ref(name: &str) -> Value {
  json!({ "$ref": format!("#/components/schemas/{name}") })
}
