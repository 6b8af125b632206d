use std::collections::{HashMap, HashSet};

use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

use super::types::{EnumMember, PropertyInfo, ResolvedType, TypeGraph, TypeId};
use crate::{
  error::{GeneratorError, Result},
  naming::identifiers::TypeName,
  schema::{
    AdditionalProperties, ApiDocument, CompositionKind, NodeId, ObjectShape, Primitive, SchemaKind, SchemaNode,
  },
};

const INLINE_LOCATION: &str = "<inline schema>";
const OBJECT_NAME: &str = "object";
const DATE_NAME: &str = "Date";

/// Everything the resolver produced for one document.
#[derive(Debug, Clone)]
pub struct ResolvedTypes {
  pub graph: TypeGraph,
  /// Named schemas in declaration order, mapped to their types. Aliases share ids.
  pub registry: IndexMap<String, TypeId>,
  /// Reference paths that were cut with `any`, e.g. `["Node", "Node"]`.
  pub cycles: Vec<Vec<String>>,
}

/// Converts schema nodes into a memoized [`TypeGraph`].
///
/// Each node is resolved at most once and each named schema is registered at most
/// once, so repeated lookups hand back the same [`TypeId`]. A `$ref` that is already
/// being resolved further up the stack resolves to `any` instead of recursing.
pub struct TypeResolver<'a> {
  document: &'a ApiDocument,
  graph: TypeGraph,
  registry: IndexMap<String, TypeId>,
  node_cache: HashMap<NodeId, TypeId>,
  /// Types that take the schema name when `node` turns out to be a named schema.
  nameable: HashMap<TypeId, NodeId>,
  visited: IndexSet<String>,
  cycles: Vec<Vec<String>>,
}

impl<'a> TypeResolver<'a> {
  #[must_use]
  pub fn new(document: &'a ApiDocument) -> Self {
    Self {
      document,
      graph: TypeGraph::new(),
      registry: IndexMap::new(),
      node_cache: HashMap::new(),
      nameable: HashMap::new(),
      visited: IndexSet::new(),
      cycles: vec![],
    }
  }

  #[must_use]
  pub fn document(&self) -> &'a ApiDocument {
    self.document
  }

  #[must_use]
  pub fn graph(&self) -> &TypeGraph {
    &self.graph
  }

  #[must_use]
  pub fn registry(&self) -> &IndexMap<String, TypeId> {
    &self.registry
  }

  pub fn intrinsic(&mut self, name: &str) -> TypeId {
    self.graph.intrinsic(name)
  }

  /// Resolves every named schema of the document in declaration order.
  pub fn resolve_all(&mut self) -> Result<()> {
    let document = self.document;
    for name in document.schemas.keys() {
      self.resolve_reference(name)?;
    }
    Ok(())
  }

  #[must_use]
  pub fn finish(self) -> ResolvedTypes {
    ResolvedTypes {
      graph: self.graph,
      registry: self.registry,
      cycles: self.cycles,
    }
  }

  /// Resolves a named schema, reusing the registered instance when there is one.
  pub fn resolve_reference(&mut self, ref_id: &str) -> Result<TypeId> {
    if let Some(&id) = self.registry.get(ref_id) {
      return Ok(id);
    }

    if self.visited.contains(ref_id) {
      let mut cycle: Vec<String> = self.visited.iter().skip_while(|name| *name != ref_id).cloned().collect();
      cycle.push(ref_id.to_string());
      self.cycles.push(cycle);
      return Ok(self.graph.any());
    }

    let document = self.document;
    let &node = document
      .schemas
      .get(ref_id)
      .ok_or_else(|| GeneratorError::UnresolvedReference(ref_id.to_string()))?;

    self.visited.insert(ref_id.to_string());
    let resolved = self.resolve(node);
    self.visited.shift_remove(ref_id);
    let id = resolved?;

    self.apply_schema_name(ref_id, node, id)?;
    self.registry.insert(ref_id.to_string(), id);
    Ok(id)
  }

  /// Resolves one schema node; later calls for the same node return the cached id.
  pub fn resolve(&mut self, node: NodeId) -> Result<TypeId> {
    if let Some(&id) = self.node_cache.get(&node) {
      return Ok(id);
    }
    let id = self.resolve_node(node)?;
    self.node_cache.insert(node, id);
    Ok(id)
  }

  fn resolve_node(&mut self, node: NodeId) -> Result<TypeId> {
    let document = self.document;
    let schema = document.arena.get(node);

    match &schema.kind {
      SchemaKind::Empty => Ok(self.graph.any()),
      SchemaKind::Reference(ref_id) => self.resolve_reference(ref_id),
      SchemaKind::Object(shape) => self.resolve_object(node, schema, shape),
      SchemaKind::Array { items } => self.resolve_array(schema, *items),
      SchemaKind::Primitive { primitive, format } => {
        Ok(self.graph.intrinsic(primitive_name(*primitive, format.as_deref())))
      }
      SchemaKind::Enum { primitive, literals } => self.resolve_enum(node, schema, *primitive, literals),
      SchemaKind::Composition { kind, members } => self.resolve_composition(node, schema, *kind, members),
    }
  }

  fn resolve_array(&mut self, schema: &SchemaNode, items: Option<NodeId>) -> Result<TypeId> {
    let element = match items {
      Some(items) => self.resolve(items)?,
      None => self.graph.any(),
    };
    let name = format!("{}[]", self.graph.get(element).name);
    Ok(self.graph.insert(ResolvedType {
      is_array: true,
      element_type: Some(element),
      description: schema.description.clone(),
      ..ResolvedType::builtin(name)
    }))
  }

  fn resolve_enum(&mut self, node: NodeId, schema: &SchemaNode, primitive: Primitive, literals: &[Value]) -> Result<TypeId> {
    let enum_members = match &schema.extensions.enum_values {
      Some(values) => values.clone(),
      None => Self::synthesize_enum_members(literals),
    };
    let id = self.graph.insert(ResolvedType {
      is_enum: true,
      enum_members,
      description: schema.description.clone(),
      ..ResolvedType::builtin(primitive_name(primitive, None))
    });
    self.nameable.insert(id, node);
    Ok(id)
  }

  /// String enums pair each literal with its position; integer enums pair
  /// `Item<position + 1>` with the literal. Any other literal set has no members.
  fn synthesize_enum_members(literals: &[Value]) -> Vec<EnumMember> {
    match literals.first() {
      Some(Value::String(_)) => literals
        .iter()
        .zip(0i64..)
        .map(|(literal, value)| EnumMember {
          key: literal.as_str().map_or_else(|| literal.to_string(), str::to_string),
          value,
        })
        .collect(),
      Some(Value::Number(_)) => literals
        .iter()
        .enumerate()
        .map(|(index, literal)| {
          Some(EnumMember {
            key: format!("Item{}", index + 1),
            value: literal.as_i64()?,
          })
        })
        .collect::<Option<Vec<_>>>()
        .unwrap_or_default(),
      _ => vec![],
    }
  }

  fn resolve_object(&mut self, node: NodeId, schema: &SchemaNode, shape: &ObjectShape) -> Result<TypeId> {
    let (base_type, inherited) = self.resolve_all_of(&shape.all_of)?;

    let mut required: HashSet<&str> = shape.required.iter().map(String::as_str).collect();
    let mut property_nodes: IndexMap<&str, NodeId> = IndexMap::new();
    for member in &inherited {
      required.extend(member.required.iter().map(String::as_str));
      property_nodes.extend(member.properties.iter().map(|(name, &id)| (name.as_str(), id)));
    }
    property_nodes.extend(shape.properties.iter().map(|(name, &id)| (name.as_str(), id)));

    let mut properties = IndexMap::new();
    for (name, property_node) in property_nodes {
      properties.insert(name.to_string(), self.resolve_property(name, property_node, required.contains(name))?);
    }

    let ext = &schema.extensions;
    let mut resolved = ResolvedType {
      properties,
      base_type,
      is_interface: ext.is_interface,
      is_generic_type: ext.is_generic_type,
      is_generic_type_definition: ext.is_generic_type_definition,
      is_generic_parameter: ext.is_generic_parameter,
      description: schema.description.clone(),
      ..ResolvedType::builtin(OBJECT_NAME)
    };
    let mut nameable = true;

    if ext.is_generic_type {
      if !ext.is_generic_type_definition {
        if let Some(definition) = ext.generic_type_definition {
          let definition = self.resolve(definition)?;
          let definition_ty = self.graph.get(definition);
          resolved.is_builtin = definition_ty.is_builtin;
          resolved.name.clone_from(&definition_ty.name);
          resolved.generic_type_definition = Some(definition);
          nameable = !resolved.is_builtin;
        } else if shape.additional_properties.is_some() {
          resolved.name = TypeGraph::RECORD.to_string();
          nameable = false;
        } else {
          return Err(GeneratorError::GenericDefinitionMissing(self.location()));
        }
      }
      resolved.generic_arguments = ext
        .generic_arguments
        .iter()
        .map(|&arg| self.resolve(arg))
        .collect::<Result<_>>()?;
    } else if let Some(additional) = &shape.additional_properties {
      let key = self.graph.intrinsic(TypeGraph::STRING);
      let value = match additional {
        AdditionalProperties::Any => key,
        AdditionalProperties::Schema(value) => self.resolve(*value)?,
      };
      resolved.name = TypeGraph::RECORD.to_string();
      resolved.is_generic_type = true;
      resolved.generic_arguments = vec![key, value];
      nameable = false;
    }

    resolved.full_name.clone_from(&resolved.name);
    let id = self.graph.insert(resolved);
    if nameable {
      self.nameable.insert(id, node);
    }
    Ok(id)
  }

  fn resolve_property(&mut self, name: &str, node: NodeId, required: bool) -> Result<PropertyInfo> {
    let document = self.document;
    let schema = document.arena.get(node);
    Ok(PropertyInfo {
      name: name.to_string(),
      type_id: self.resolve(node)?,
      nullable: schema.nullable && !required,
      required,
      description: schema.description.clone(),
    })
  }

  /// Applies the `allOf` policy shared by objects and bare compositions.
  ///
  /// One member becomes the base type. Several members are accepted when at most
  /// one of them is a `$ref` (the base) and all others are inline objects, whose
  /// properties are merged into the result. Anything else is rejected.
  fn resolve_all_of(&mut self, members: &[NodeId]) -> Result<(Option<TypeId>, Vec<&'a ObjectShape>)> {
    let document = self.document;
    match members {
      [] => Ok((None, vec![])),
      [single] => Ok((Some(self.resolve(*single)?), vec![])),
      _ => {
        let mut bases = vec![];
        let mut inline = vec![];
        for &member in members {
          match &document.arena.get(member).kind {
            SchemaKind::Reference(_) => bases.push(member),
            SchemaKind::Object(shape) if shape.all_of.is_empty() => inline.push(shape),
            other => {
              return Err(GeneratorError::unsupported_composition(
                self.location(),
                format!("allOf member of kind {}", kind_label(other)),
              ));
            }
          }
        }
        if bases.len() > 1 {
          return Err(GeneratorError::unsupported_composition(
            self.location(),
            format!("allOf with {} referenced members", bases.len()),
          ));
        }
        let base = bases.first().map(|&base| self.resolve(base)).transpose()?;
        Ok((base, inline))
      }
    }
  }

  fn resolve_composition(
    &mut self,
    node: NodeId,
    schema: &SchemaNode,
    kind: CompositionKind,
    members: &[NodeId],
  ) -> Result<TypeId> {
    let document = self.document;
    let members: Vec<NodeId> = members
      .iter()
      .copied()
      .filter(|&member| {
        let member = document.arena.get(member);
        !(member.nullable && member.kind == SchemaKind::Empty)
      })
      .collect();

    match (kind, members.as_slice()) {
      (_, []) => Ok(self.graph.any()),
      (_, [single]) => self.resolve(*single),
      (CompositionKind::AllOf, _) => {
        let shape = ObjectShape {
          all_of: members,
          ..ObjectShape::default()
        };
        self.resolve_object(node, schema, &shape)
      }
      (CompositionKind::AnyOf | CompositionKind::OneOf, many) => Err(GeneratorError::unsupported_composition(
        self.location(),
        format!("{kind} with {} members", many.len()),
      )),
    }
  }

  /// Gives a freshly built object, enum or generic type the name of the schema it
  /// was declared under. Aliases and builtins keep their own names.
  fn apply_schema_name(&mut self, ref_id: &str, node: NodeId, id: TypeId) -> Result<()> {
    if self.nameable.get(&id) != Some(&node) {
      return Ok(());
    }
    let parsed = TypeName::parse(ref_id)?;
    let ty = self.graph.get_mut(id);
    ty.name = parsed.name;
    ty.full_name = parsed.full_name;
    ty.namespace = parsed.namespace;
    ty.is_builtin = false;
    Ok(())
  }

  fn location(&self) -> String {
    self.visited.last().cloned().unwrap_or_else(|| INLINE_LOCATION.to_string())
  }
}

fn primitive_name(primitive: Primitive, format: Option<&str>) -> &'static str {
  match (primitive, format) {
    (Primitive::Integer | Primitive::Number, _) => "number",
    (Primitive::Boolean, _) => "boolean",
    (Primitive::String, Some("date-time")) => DATE_NAME,
    (Primitive::String, _) => TypeGraph::STRING,
  }
}

fn kind_label(kind: &SchemaKind) -> &'static str {
  match kind {
    SchemaKind::Empty => "empty",
    SchemaKind::Reference(_) => "reference",
    SchemaKind::Object(_) => "object with nested allOf",
    SchemaKind::Array { .. } => "array",
    SchemaKind::Enum { .. } => "enum",
    SchemaKind::Primitive { .. } => "primitive",
    SchemaKind::Composition { .. } => "composition",
  }
}
