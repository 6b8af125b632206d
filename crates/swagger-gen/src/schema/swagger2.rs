//! Swagger 2.0 → OpenAPI 3 layout conversion.
//!
//! Only the parts the generator reads are carried over: definitions, tags, and for
//! every operation its parameters, request body and `200` response.

use indexmap::IndexMap;
use serde_json::{Map, Value, json};

use super::{document::HttpMethod, refs::follow_refs};
use crate::error::Result;

const DEFAULT_MEDIA_TYPE: &str = "application/json";
const FORM_MEDIA_TYPE: &str = "multipart/form-data";
const COPIED_OPERATION_KEYS: [&str; 6] = ["operationId", "summary", "description", "tags", "deprecated", "x-limit"];
const PARAMETER_ONLY_KEYS: [&str; 6] = ["name", "in", "required", "description", "collectionFormat", "allowEmptyValue"];

pub(crate) fn upgrade(doc: &Value) -> Result<Value> {
  let consumes = media_types(doc.get("consumes"));
  let produces = media_types(doc.get("produces"));

  let mut paths = Map::new();
  if let Some(raw_paths) = doc.get("paths").and_then(Value::as_object) {
    for (path, item) in raw_paths {
      let item = follow_refs(doc, item)?;
      paths.insert(path.clone(), upgrade_path_item(doc, item, &consumes, &produces)?);
    }
  }

  Ok(json!({
    "openapi": "3.0.0",
    "info": doc.get("info").cloned().unwrap_or_else(|| json!({})),
    "tags": doc.get("tags").cloned().unwrap_or_else(|| json!([])),
    "paths": paths,
    "components": {
      "schemas": doc.get("definitions").cloned().unwrap_or_else(|| json!({})),
    },
  }))
}

fn upgrade_path_item(doc: &Value, item: &Value, consumes: &[String], produces: &[String]) -> Result<Value> {
  let Some(item) = item.as_object() else {
    return Ok(item.clone());
  };
  let shared = item.get("parameters").and_then(Value::as_array).map(Vec::as_slice).unwrap_or_default();

  let mut upgraded = Map::new();
  for (key, op) in item {
    if key.parse::<HttpMethod>().is_err() {
      continue;
    }
    let Some(op) = op.as_object() else {
      upgraded.insert(key.clone(), op.clone());
      continue;
    };
    upgraded.insert(key.clone(), upgrade_operation(doc, op, shared, consumes, produces)?);
  }
  Ok(Value::Object(upgraded))
}

fn upgrade_operation(
  doc: &Value,
  op: &Map<String, Value>,
  shared: &[Value],
  consumes: &[String],
  produces: &[String],
) -> Result<Value> {
  let own = op.get("parameters").and_then(Value::as_array).map(Vec::as_slice).unwrap_or_default();
  let mut merged: IndexMap<(String, String), &Value> = IndexMap::new();
  for raw in shared.iter().chain(own) {
    let param = follow_refs(doc, raw)?;
    let name = param.get("name").and_then(Value::as_str).unwrap_or_default().to_string();
    let place = param.get("in").and_then(Value::as_str).unwrap_or_default().to_string();
    merged.insert((name, place), param);
  }

  let mut parameters = vec![];
  let mut body: Option<&Value> = None;
  let mut form_properties = Map::new();
  let mut form_required = vec![];

  for ((name, place), param) in merged {
    match place.as_str() {
      "body" => body = Some(param),
      "formData" => {
        form_properties.insert(name.clone(), parameter_schema(param));
        if param.get("required").and_then(Value::as_bool).unwrap_or(false) {
          form_required.push(Value::String(name));
        }
      }
      _ => {
        let mut upgraded = Map::new();
        for key in ["name", "in", "required", "description"] {
          if let Some(value) = param.get(key) {
            upgraded.insert(key.to_string(), value.clone());
          }
        }
        upgraded.insert("schema".to_string(), parameter_schema(param));
        parameters.push(Value::Object(upgraded));
      }
    }
  }

  let mut upgraded = Map::new();
  for key in COPIED_OPERATION_KEYS {
    if let Some(value) = op.get(key) {
      upgraded.insert(key.to_string(), value.clone());
    }
  }
  upgraded.insert("parameters".to_string(), Value::Array(parameters));

  let op_consumes = op.get("consumes").map_or_else(|| consumes.to_vec(), |v| media_types(Some(v)));
  if let Some(body) = body {
    let schema = body.get("schema").cloned().unwrap_or(Value::Null);
    let content: Map<String, Value> = op_consumes
      .iter()
      .map(|media| (media.clone(), json!({ "schema": schema })))
      .collect();
    let mut request = json!({ "content": content });
    if let Some(description) = body.get("description") {
      request["description"] = description.clone();
    }
    upgraded.insert("requestBody".to_string(), request);
  } else if !form_properties.is_empty() {
    upgraded.insert(
      "requestBody".to_string(),
      json!({
        "content": {
          FORM_MEDIA_TYPE: {
            "schema": { "type": "object", "properties": form_properties, "required": form_required }
          }
        }
      }),
    );
  }

  let op_produces = op.get("produces").map_or_else(|| produces.to_vec(), |v| media_types(Some(v)));
  let mut responses = Map::new();
  if let Some(raw) = op.get("responses").and_then(Value::as_object) {
    for (code, response) in raw {
      let response = follow_refs(doc, response)?;
      let mut upgraded_response = Map::new();
      if let Some(description) = response.get("description") {
        upgraded_response.insert("description".to_string(), description.clone());
      }
      if let Some(schema) = response.get("schema") {
        let content: Map<String, Value> = op_produces
          .iter()
          .map(|media| (media.clone(), json!({ "schema": schema })))
          .collect();
        upgraded_response.insert("content".to_string(), Value::Object(content));
      }
      responses.insert(code.clone(), Value::Object(upgraded_response));
    }
  }
  upgraded.insert("responses".to_string(), Value::Object(responses));

  Ok(Value::Object(upgraded))
}

/// The inline type keywords of a non-body parameter, which double as its schema.
fn parameter_schema(param: &Value) -> Value {
  let Some(obj) = param.as_object() else {
    return Value::Null;
  };
  if let Some(schema) = obj.get("schema") {
    return schema.clone();
  }
  let schema: Map<String, Value> = obj
    .iter()
    .filter(|(key, _)| !PARAMETER_ONLY_KEYS.contains(&key.as_str()))
    .map(|(key, value)| (key.clone(), value.clone()))
    .collect();
  Value::Object(schema)
}

fn media_types(value: Option<&Value>) -> Vec<String> {
  let types: Vec<String> = value
    .and_then(Value::as_array)
    .map(|types| types.iter().filter_map(Value::as_str).map(str::to_string).collect())
    .unwrap_or_default();
  if types.is_empty() {
    vec![DEFAULT_MEDIA_TYPE.to_string()]
  } else {
    types
  }
}
