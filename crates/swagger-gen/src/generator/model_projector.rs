use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;
use strum::Display;

use super::{
  type_resolver::ResolvedTypes,
  types::{TypeGraph, TypeId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Definition {
  Class,
  Interface,
  /// Never produced by the projector; available to model hooks and custom templates.
  Type,
  Enum,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Dependency {
  /// File key of the referenced model.
  pub id: String,
  /// Exported name to import from that file.
  pub modules: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelProperty {
  pub name: String,
  #[serde(rename = "type")]
  pub types: Vec<String>,
  pub value: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  pub required: bool,
}

/// One renderable model; entries sharing a `key` end up in the same file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelEntry {
  pub definition: Definition,
  /// Type reference as written in code, e.g. `PagedResult<T>`.
  pub name: String,
  /// Bare exported identifier, e.g. `PagedResult`.
  pub export_name: String,
  pub key: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  pub properties: Vec<ModelProperty>,
  #[serde(rename = "dependencys")]
  pub dependencies: Vec<Dependency>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub extends: Option<String>,
}

/// Projects every model-worthy registered type into [`ModelEntry`] values.
///
/// Entries come out grouped by file key, groups ordered by first appearance.
#[must_use]
pub fn project(types: &ResolvedTypes) -> Vec<ModelEntry> {
  let graph = &types.graph;
  let mut seen = HashSet::new();
  let mut groups: IndexMap<String, Vec<TypeId>> = IndexMap::new();

  for &id in types.registry.values() {
    if !seen.insert(id) {
      continue;
    }
    let ty = graph.get(id);
    if ty.is_model() {
      groups.entry(ty.file_key()).or_default().push(id);
    }
  }

  groups
    .into_iter()
    .flat_map(|(key, ids)| ids.into_iter().map(move |id| (key.clone(), id)))
    .map(|(key, id)| project_type(graph, id, key))
    .collect()
}

fn project_type(graph: &TypeGraph, id: TypeId, key: String) -> ModelEntry {
  let ty = graph.get(id);
  let is_class = ty.is_interface == Some(false);

  let mut entry = ModelEntry {
    definition: if is_class { Definition::Class } else { Definition::Interface },
    name: graph.type_name(id),
    export_name: ty.name.clone(),
    key,
    description: ty.description.clone(),
    properties: vec![],
    dependencies: vec![],
    extends: None,
  };

  if ty.is_enum {
    entry.definition = Definition::Enum;
    entry.properties = ty
      .enum_members
      .iter()
      .map(|member| ModelProperty {
        name: member.key.clone(),
        types: vec![],
        value: member.value.to_string(),
        description: None,
        required: true,
      })
      .collect();
    return entry;
  }

  entry.dependencies = dependencies_of(graph, id, &entry.key);
  entry.properties = properties_of(graph, id, is_class);
  entry.extends = ty.base_type.map(|base| graph.type_name(base));
  entry
}

/// Imports needed by the model for `id`, excluding its own file.
#[must_use]
pub fn dependencies_of(graph: &TypeGraph, id: TypeId, own_key: &str) -> Vec<Dependency> {
  let mut seen = HashSet::new();
  graph
    .dependencies(id)
    .into_iter()
    .map(|dep| {
      let ty = graph.get(dep);
      Dependency {
        id: ty.file_key(),
        modules: ty.name.clone(),
      }
    })
    .filter(|dep| dep.id != own_key && seen.insert(dep.clone()))
    .collect()
}

/// Property list of the type `id` with rendered default values.
///
/// Values only matter for classes: `[]` for arrays, `null` when nullable, a
/// literal for builtin scalars, `0` for enums and `null` otherwise. Interfaces get
/// `null` throughout.
#[must_use]
pub fn properties_of(graph: &TypeGraph, id: TypeId, is_class: bool) -> Vec<ModelProperty> {
  graph
    .get(id)
    .properties
    .values()
    .map(|property| {
      let property_ty = graph.get(property.type_id);
      let mut types = vec![graph.type_name(property.type_id)];
      if property.nullable {
        types.extend(["null".to_string(), "undefined".to_string()]);
      }

      let value = if !is_class {
        "null"
      } else if property_ty.is_array {
        "[]"
      } else if property.nullable {
        "null"
      } else if property_ty.is_builtin {
        builtin_default(&property_ty.name).unwrap_or("null")
      } else if property_ty.is_enum {
        "0"
      } else {
        "null"
      };

      ModelProperty {
        name: property.name.clone(),
        types,
        value: value.to_string(),
        description: property.description.clone(),
        required: !property.nullable,
      }
    })
    .collect()
}

fn builtin_default(name: &str) -> Option<&'static str> {
  match name {
    "string" => Some("''"),
    "number" => Some("0"),
    "boolean" => Some("false"),
    "Date" => Some("new Date()"),
    TypeGraph::RECORD => Some("{}"),
    _ => None,
  }
}
