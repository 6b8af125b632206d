use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};

use super::{
  node::{NodeId, SchemaArena},
  refs::follow_refs,
  swagger2,
};
use crate::error::{GeneratorError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SpecVersion {
  #[strum(to_string = "Swagger 2.0")]
  Swagger2,
  #[strum(to_string = "OpenAPI 3")]
  OpenApi3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
  Get,
  Put,
  Post,
  Delete,
  Options,
  Head,
  Patch,
  Trace,
}

impl HttpMethod {
  #[must_use]
  pub fn as_lower(self) -> String {
    self.to_string().to_ascii_lowercase()
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "camelCase")]
pub enum ParameterLocation {
  Path,
  Query,
  Header,
  Cookie,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LimitedOperations(u8);

impl LimitedOperations {
  pub const NONE: Self = Self(0);
  pub const READ: Self = Self(1);
  pub const WRITE: Self = Self(2);
  pub const DELETE: Self = Self(4);
  pub const INVOKE: Self = Self(8);
  pub const ALL: Self = Self(15);

  #[must_use]
  pub const fn contains(self, other: Self) -> bool {
    self.0 & other.0 == other.0
  }
}

/// Access-control metadata attached to an operation through `x-limit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitedResource {
  #[serde(default)]
  pub id: String,
  #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
  pub resource_type: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub display_name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default)]
  pub operations: LimitedOperations,
  #[serde(default)]
  pub log_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
  pub name: String,
  pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Parameter {
  pub name: String,
  pub location: ParameterLocation,
  pub required: bool,
  pub description: Option<String>,
  pub schema: NodeId,
}

/// A request or response payload keyed by media type.
#[derive(Debug, Clone, Default)]
pub struct Body {
  pub description: Option<String>,
  pub content: IndexMap<String, NodeId>,
}

#[derive(Debug, Clone)]
pub struct Operation {
  pub path: String,
  pub method: HttpMethod,
  pub operation_id: Option<String>,
  pub summary: Option<String>,
  pub description: Option<String>,
  pub tags: Vec<String>,
  pub parameters: Vec<Parameter>,
  pub request_body: Option<Body>,
  pub response: Option<Body>,
  pub limit: Option<LimitedResource>,
}

/// A version-independent view of one API document.
#[derive(Debug, Clone)]
pub struct ApiDocument {
  pub version: SpecVersion,
  pub title: Option<String>,
  pub doc_version: Option<String>,
  pub description: Option<String>,
  pub arena: SchemaArena,
  pub schemas: IndexMap<String, NodeId>,
  pub operations: Vec<Operation>,
  pub tags: Vec<Tag>,
}

impl ApiDocument {
  pub fn from_slice(bytes: &[u8]) -> Result<Self> {
    let value: Value =
      serde_json::from_slice(bytes).map_err(|e| GeneratorError::InvalidDocument(format!("not valid JSON: {e}")))?;
    Self::from_value(&value)
  }

  /// Normalizes a raw document. Swagger 2.0 input is upgraded to the OpenAPI 3
  /// layout first so both versions share one parser.
  pub fn from_value(value: &Value) -> Result<Self> {
    if value.get("swagger").is_some() {
      let upgraded = swagger2::upgrade(value)?;
      Parser::new(&upgraded).parse(SpecVersion::Swagger2)
    } else if value.get("openapi").is_some() {
      Parser::new(value).parse(SpecVersion::OpenApi3)
    } else {
      Err(GeneratorError::InvalidDocument(
        "missing top-level 'swagger' or 'openapi' key".to_string(),
      ))
    }
  }

  /// Tag description matched case-insensitively against a controller name.
  #[must_use]
  pub fn tag_description(&self, name: &str) -> Option<&str> {
    self
      .tags
      .iter()
      .find(|tag| tag.name.eq_ignore_ascii_case(name))
      .and_then(|tag| tag.description.as_deref())
  }
}

struct Parser<'a> {
  root: &'a Value,
  arena: SchemaArena,
}

impl<'a> Parser<'a> {
  fn new(root: &'a Value) -> Self {
    Self {
      root,
      arena: SchemaArena::new(),
    }
  }

  fn parse(mut self, version: SpecVersion) -> Result<ApiDocument> {
    let root = self.root;
    let info = root.get("info");
    let info_str = |key: &str| info.and_then(|i| i.get(key)).and_then(Value::as_str).map(str::to_string);

    let mut schemas = IndexMap::new();
    if let Some(raw) = root.pointer("/components/schemas").and_then(Value::as_object) {
      for (name, schema) in raw {
        let id = self.arena.classify(schema, name)?;
        schemas.insert(name.clone(), id);
      }
    }

    let mut operations = vec![];
    if let Some(paths) = root.get("paths").and_then(Value::as_object) {
      for (path, item) in paths {
        let item = follow_refs(root, item)?;
        self.parse_path_item(path, item, &mut operations)?;
      }
    }

    let tags = root
      .get("tags")
      .and_then(Value::as_array)
      .map(|tags| {
        tags
          .iter()
          .filter_map(|tag| {
            Some(Tag {
              name: tag.get("name")?.as_str()?.to_string(),
              description: tag.get("description").and_then(Value::as_str).map(str::to_string),
            })
          })
          .collect()
      })
      .unwrap_or_default();

    Ok(ApiDocument {
      version,
      title: info_str("title"),
      doc_version: info_str("version"),
      description: info_str("description"),
      arena: self.arena,
      schemas,
      operations,
      tags,
    })
  }

  fn parse_path_item(&mut self, path: &str, item: &Value, operations: &mut Vec<Operation>) -> Result<()> {
    let Some(item) = item.as_object() else {
      return Ok(());
    };
    let shared = item.get("parameters").and_then(Value::as_array).map(Vec::as_slice).unwrap_or_default();

    for (key, raw) in item {
      let Ok(method) = key.parse::<HttpMethod>() else {
        continue;
      };
      let Some(op) = raw.as_object() else {
        return Err(malformed(method, path, "operation is not an object"));
      };
      if !op.contains_key("responses") {
        continue;
      }
      operations.push(self.parse_operation(path, method, op, shared)?);
    }
    Ok(())
  }

  fn parse_operation(
    &mut self,
    path: &str,
    method: HttpMethod,
    op: &Map<String, Value>,
    shared: &[Value],
  ) -> Result<Operation> {
    let location = format!("{method} {path}");
    let text = |key: &str| op.get(key).and_then(Value::as_str).map(str::to_string);

    let own = op.get("parameters").and_then(Value::as_array).map(Vec::as_slice).unwrap_or_default();
    let mut merged: IndexMap<(String, String), &Value> = IndexMap::new();
    for raw in shared.iter().chain(own) {
      let param = follow_refs(self.root, raw)?;
      let name = param.get("name").and_then(Value::as_str).unwrap_or_default();
      let place = param.get("in").and_then(Value::as_str).unwrap_or_default();
      merged.insert((name.to_string(), place.to_string()), param);
    }
    let parameters = merged
      .into_values()
      .map(|param| self.parse_parameter(path, method, param, &location))
      .collect::<Result<Vec<_>>>()?;

    let request_body = match op.get("requestBody") {
      Some(raw) => Some(self.parse_body(follow_refs(self.root, raw)?, &format!("{location} requestBody"))?),
      None => None,
    };

    let response = match op.get("responses").and_then(|r| r.get("200")) {
      Some(raw) => Some(self.parse_body(follow_refs(self.root, raw)?, &format!("{location} 200"))?),
      None => None,
    };

    let limit = match op.get("x-limit") {
      Some(raw) => Some(
        serde_json::from_value::<LimitedResource>(raw.clone())
          .map_err(|e| malformed(method, path, &format!("invalid x-limit: {e}")))?,
      ),
      None => None,
    };

    let tags = op
      .get("tags")
      .and_then(Value::as_array)
      .map(|tags| tags.iter().filter_map(Value::as_str).map(str::to_string).collect())
      .unwrap_or_default();

    Ok(Operation {
      path: path.to_string(),
      method,
      operation_id: text("operationId"),
      summary: text("summary"),
      description: text("description"),
      tags,
      parameters,
      request_body,
      response,
      limit,
    })
  }

  fn parse_parameter(&mut self, path: &str, method: HttpMethod, param: &Value, location: &str) -> Result<Parameter> {
    let name = param
      .get("name")
      .and_then(Value::as_str)
      .ok_or_else(|| malformed(method, path, "parameter without a name"))?;
    let place = param.get("in").and_then(Value::as_str).unwrap_or_default();
    let place = place
      .parse::<ParameterLocation>()
      .map_err(|_| malformed(method, path, &format!("parameter '{name}' has unsupported location '{place}'")))?;

    let schema = param.get("schema").or_else(|| {
      param
        .get("content")
        .and_then(Value::as_object)
        .and_then(|content| content.values().next())
        .and_then(|media| media.get("schema"))
    });
    let Some(schema) = schema else {
      return Err(malformed(
        method,
        path,
        &format!("parameter '{name}' has neither schema nor content"),
      ));
    };

    Ok(Parameter {
      name: name.to_string(),
      location: place,
      required: param.get("required").and_then(Value::as_bool).unwrap_or(false),
      description: param.get("description").and_then(Value::as_str).map(str::to_string),
      schema: self.arena.classify(schema, &format!("{location} {name}"))?,
    })
  }

  fn parse_body(&mut self, raw: &Value, location: &str) -> Result<Body> {
    let mut content = IndexMap::new();
    if let Some(media) = raw.get("content").and_then(Value::as_object) {
      for (media_type, entry) in media {
        let schema = entry.get("schema").unwrap_or(&Value::Null);
        let id = self.arena.classify(schema, &format!("{location} {media_type}"))?;
        content.insert(media_type.clone(), id);
      }
    }
    Ok(Body {
      description: raw.get("description").and_then(Value::as_str).map(str::to_string),
      content,
    })
  }
}

fn malformed(method: HttpMethod, path: &str, detail: &str) -> GeneratorError {
  GeneratorError::MalformedOperation {
    method: method.to_string(),
    path: path.to_string(),
    detail: detail.to_string(),
  }
}
