use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};

use super::refs::ref_id;
use crate::error::{GeneratorError, Result};

/// Identity of a schema node inside its [`SchemaArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
  #[must_use]
  pub const fn index(self) -> usize {
    self.0
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Primitive {
  String,
  Number,
  Integer,
  Boolean,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum CompositionKind {
  #[strum(to_string = "allOf")]
  AllOf,
  #[strum(to_string = "anyOf")]
  AnyOf,
  #[strum(to_string = "oneOf")]
  OneOf,
}

/// One `(key, value)` pair of an enum model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumMember {
  pub key: String,
  pub value: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AdditionalProperties {
  Any,
  Schema(NodeId),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectShape {
  pub properties: IndexMap<String, NodeId>,
  pub required: Vec<String>,
  pub all_of: Vec<NodeId>,
  pub additional_properties: Option<AdditionalProperties>,
}

/// The single discriminant of a schema node.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
  Empty,
  Reference(String),
  Object(ObjectShape),
  Array {
    items: Option<NodeId>,
  },
  Enum {
    primitive: Primitive,
    literals: Vec<Value>,
  },
  Primitive {
    primitive: Primitive,
    format: Option<String>,
  },
  Composition {
    kind: CompositionKind,
    members: Vec<NodeId>,
  },
}

/// Code-generation hints carried by schemas emitted from typed backends.
///
/// Every key is also accepted with an `x-` prefix.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeExtensions {
  pub is_interface: Option<bool>,
  pub is_generic_type: bool,
  pub is_generic_type_definition: bool,
  pub is_generic_parameter: bool,
  pub generic_type_definition: Option<NodeId>,
  pub generic_arguments: Vec<NodeId>,
  pub enum_values: Option<Vec<EnumMember>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
  pub kind: SchemaKind,
  pub description: Option<String>,
  pub nullable: bool,
  pub extensions: TypeExtensions,
}

impl SchemaNode {
  #[must_use]
  pub fn is_reference(&self) -> bool {
    matches!(self.kind, SchemaKind::Reference(_))
  }
}

/// Owns every schema node of one document; nodes refer to each other by [`NodeId`].
#[derive(Debug, Clone, Default)]
pub struct SchemaArena {
  nodes: Vec<SchemaNode>,
}

impl SchemaArena {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  #[must_use]
  pub fn get(&self, id: NodeId) -> &SchemaNode {
    &self.nodes[id.0]
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  pub fn insert(&mut self, node: SchemaNode) -> NodeId {
    self.nodes.push(node);
    NodeId(self.nodes.len() - 1)
  }

  /// Classifies raw JSON into a [`SchemaNode`], recursively allocating children.
  ///
  /// Priority when several keywords are present: `$ref`, object, array, enum,
  /// primitive, composition. Anything else is [`SchemaKind::Empty`].
  pub fn classify(&mut self, value: &Value, location: &str) -> Result<NodeId> {
    let Some(obj) = value.as_object() else {
      return Ok(self.insert(SchemaNode {
        kind: SchemaKind::Empty,
        description: None,
        nullable: false,
        extensions: TypeExtensions::default(),
      }));
    };

    let (declared, type_nullable) = declared_type(obj, location)?;
    let nullable = type_nullable
      || obj.get("nullable").and_then(Value::as_bool).unwrap_or(false)
      || obj.get("x-nullable").and_then(Value::as_bool).unwrap_or(false);
    let description = obj.get("description").and_then(Value::as_str).map(str::to_string);
    let extensions = self.classify_extensions(obj, location)?;
    let kind = self.classify_kind(obj, declared.as_deref(), location)?;

    Ok(self.insert(SchemaNode {
      kind,
      description,
      nullable,
      extensions,
    }))
  }

  fn classify_kind(&mut self, obj: &Map<String, Value>, declared: Option<&str>, location: &str) -> Result<SchemaKind> {
    if let Some(reference) = obj.get("$ref").and_then(Value::as_str) {
      return Ok(SchemaKind::Reference(ref_id(reference)));
    }

    let untyped = declared.is_none();
    if declared == Some("object")
      || (untyped && (obj.contains_key("properties") || obj.contains_key("additionalProperties")))
    {
      return self.classify_object(obj, location).map(SchemaKind::Object);
    }

    if declared == Some("array") || (untyped && obj.contains_key("items")) {
      let items = match obj.get("items") {
        Some(items) => Some(self.classify(items, &format!("{location}[]"))?),
        None => None,
      };
      return Ok(SchemaKind::Array { items });
    }

    let literals: Vec<Value> = obj
      .get("enum")
      .and_then(Value::as_array)
      .map(|values| values.iter().filter(|v| !v.is_null()).cloned().collect())
      .unwrap_or_default();

    let primitive = match declared {
      Some("file") => Some(Primitive::String),
      Some(name) => name.parse::<Primitive>().ok(),
      None => literals.first().and_then(literal_primitive),
    };

    if let Some(primitive) = primitive {
      if !literals.is_empty() {
        return Ok(SchemaKind::Enum { primitive, literals });
      }
      let format = match declared {
        Some("file") => Some("binary".to_string()),
        _ => obj.get("format").and_then(Value::as_str).map(str::to_string),
      };
      return Ok(SchemaKind::Primitive { primitive, format });
    }

    for (key, kind) in [
      ("allOf", CompositionKind::AllOf),
      ("oneOf", CompositionKind::OneOf),
      ("anyOf", CompositionKind::AnyOf),
    ] {
      if let Some(members) = obj.get(key).and_then(Value::as_array)
        && !members.is_empty()
      {
        let members = self.classify_all(members, &format!("{location}.{kind}"))?;
        return Ok(SchemaKind::Composition { kind, members });
      }
    }

    Ok(SchemaKind::Empty)
  }

  fn classify_object(&mut self, obj: &Map<String, Value>, location: &str) -> Result<ObjectShape> {
    let mut properties = IndexMap::new();
    if let Some(props) = obj.get("properties").and_then(Value::as_object) {
      for (name, schema) in props {
        let id = self.classify(schema, &format!("{location}.{name}"))?;
        properties.insert(name.clone(), id);
      }
    }

    let required = obj
      .get("required")
      .and_then(Value::as_array)
      .map(|names| names.iter().filter_map(Value::as_str).map(str::to_string).collect())
      .unwrap_or_default();

    let all_of = match obj.get("allOf").and_then(Value::as_array) {
      Some(members) => self.classify_all(members, &format!("{location}.allOf"))?,
      None => vec![],
    };

    let additional_properties = match obj.get("additionalProperties") {
      None | Some(Value::Null | Value::Bool(false)) => None,
      Some(Value::Bool(true)) => Some(AdditionalProperties::Any),
      Some(schema) => Some(AdditionalProperties::Schema(
        self.classify(schema, &format!("{location}.additionalProperties"))?,
      )),
    };

    Ok(ObjectShape {
      properties,
      required,
      all_of,
      additional_properties,
    })
  }

  fn classify_all(&mut self, values: &[Value], location: &str) -> Result<Vec<NodeId>> {
    values
      .iter()
      .enumerate()
      .map(|(index, value)| self.classify(value, &format!("{location}[{index}]")))
      .collect()
  }

  fn classify_extensions(&mut self, obj: &Map<String, Value>, location: &str) -> Result<TypeExtensions> {
    let flag = |key: &str| extension(obj, key).and_then(Value::as_bool);

    let generic_type_definition = match extension(obj, "genericTypeDefinition") {
      Some(schema) => Some(self.classify(schema, &format!("{location}.genericTypeDefinition"))?),
      None => None,
    };
    let generic_arguments = match extension(obj, "genericArguments").and_then(Value::as_array) {
      Some(args) => self.classify_all(args, &format!("{location}.genericArguments"))?,
      None => vec![],
    };
    let enum_values = match extension(obj, "enumValues") {
      Some(values) => Some(
        serde_json::from_value::<Vec<EnumMember>>(values.clone())
          .map_err(|e| GeneratorError::unsupported_schema(location, format!("invalid enumValues: {e}")))?,
      ),
      None => None,
    };

    Ok(TypeExtensions {
      is_interface: flag("isInterface"),
      is_generic_type: flag("isGenericType").unwrap_or(false),
      is_generic_type_definition: flag("isGenericTypeDefinition").unwrap_or(false),
      is_generic_parameter: flag("isGenericParameter").unwrap_or(false),
      generic_type_definition,
      generic_arguments,
      enum_values,
    })
  }
}

fn extension<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
  obj.get(key).or_else(|| obj.get(&format!("x-{key}")))
}

/// Reads `type`, accepting the v3.1 array form where `"null"` marks nullability.
fn declared_type(obj: &Map<String, Value>, location: &str) -> Result<(Option<String>, bool)> {
  match obj.get("type") {
    Some(Value::String(name)) if name == "null" => Ok((None, true)),
    Some(Value::String(name)) => Ok((Some(name.clone()), false)),
    Some(Value::Array(names)) => {
      let names: Vec<&str> = names.iter().filter_map(Value::as_str).collect();
      let nullable = names.contains(&"null");
      let mut concrete = names.into_iter().filter(|name| *name != "null");
      let first = concrete.next().map(str::to_string);
      if concrete.next().is_some() {
        return Err(GeneratorError::unsupported_schema(
          location,
          "multiple non-null types in one schema",
        ));
      }
      Ok((first, nullable))
    }
    _ => Ok((None, false)),
  }
}

fn literal_primitive(literal: &Value) -> Option<Primitive> {
  match literal {
    Value::String(_) => Some(Primitive::String),
    Value::Number(n) if n.is_i64() || n.is_u64() => Some(Primitive::Integer),
    Value::Number(_) => Some(Primitive::Number),
    Value::Bool(_) => Some(Primitive::Boolean),
    _ => None,
  }
}
