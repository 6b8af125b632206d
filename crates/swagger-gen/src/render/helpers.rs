use minijinja::{Environment, Error, ErrorKind, Value, value::ValueKind};

use crate::naming::identifiers::is_identifier;

const ANY: &str = "any";

pub(crate) fn register(env: &mut Environment<'_>) {
  env.add_function("properties", properties);
  env.add_filter("enum_key", enum_key);
  env.add_filter("type_union", type_union);
}

/// Renders a property list as an object type literal.
///
/// Strings pass through unchanged and a missing or empty list renders as `any`.
/// With `with_values` (the default) each member also carries ` = <value>`.
pub(crate) fn properties(data: Value, with_values: Option<bool>) -> Result<String, Error> {
  let with_values = with_values.unwrap_or(true);
  match data.kind() {
    ValueKind::Undefined | ValueKind::None => return Ok(ANY.to_string()),
    ValueKind::String => return Ok(data.to_string()),
    _ => {}
  }

  let mut members = vec![];
  for item in data.try_iter()? {
    let name = item.get_attr("name")?;
    let Some(name) = name.as_str() else {
      return Err(Error::new(ErrorKind::InvalidOperation, "property without a name"));
    };

    let mut member = String::new();
    let description = item.get_attr("description")?;
    if let Some(description) = description.as_str().filter(|d| !d.is_empty()) {
      member.push_str(&format!("/** {} */\n", single_line(description)));
    }
    member.push_str(&quote_key(name));
    if !item.get_attr("required")?.is_true() {
      member.push('?');
    }
    member.push_str(": ");
    member.push_str(&type_union(item.get_attr("type")?)?);
    if with_values {
      let value = item.get_attr("value")?;
      if !value.is_undefined() && !value.is_none() {
        member.push_str(" = ");
        member.push_str(&value.to_string());
      }
    }
    members.push(member);
  }

  if members.is_empty() {
    return Ok(ANY.to_string());
  }
  Ok(format!("{{\n{};\n}}", members.join(";\n")))
}

/// Quotes keys that are not valid identifiers.
pub(crate) fn enum_key(key: &str) -> String {
  quote_key(key)
}

/// Joins type alternatives with ` | `.
pub(crate) fn type_union(types: Value) -> Result<String, Error> {
  match types.kind() {
    ValueKind::Undefined | ValueKind::None => Ok(ANY.to_string()),
    ValueKind::String => Ok(types.to_string()),
    _ => {
      let parts: Vec<String> = types.try_iter()?.map(|ty| ty.to_string()).collect();
      if parts.is_empty() {
        Ok(ANY.to_string())
      } else {
        Ok(parts.join(" | "))
      }
    }
  }
}

fn quote_key(key: &str) -> String {
  if is_identifier(key) {
    key.to_string()
  } else {
    format!("'{}'", key.replace('\\', "\\\\").replace('\'', "\\'"))
  }
}

fn single_line(text: &str) -> String {
  text.lines().map(str::trim).filter(|line| !line.is_empty()).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn test_properties_renders_object_literal() {
    let data = Value::from_serialize(json!([
      { "name": "id", "type": ["number"], "value": "0", "required": true },
      { "name": "display-name", "type": ["string", "null"], "value": "null", "required": false, "description": "Shown\nin lists" },
    ]));
    let rendered = properties(data.clone(), None).unwrap();
    assert_eq!(
      rendered,
      "{\nid: number = 0;\n/** Shown in lists */\n'display-name'?: string | null = null;\n}"
    );

    let without_values = properties(data, Some(false)).unwrap();
    assert_eq!(
      without_values,
      "{\nid: number;\n/** Shown in lists */\n'display-name'?: string | null;\n}"
    );
  }

  #[test]
  fn test_properties_fallbacks() {
    assert_eq!(properties(Value::UNDEFINED, None).unwrap(), "any");
    assert_eq!(properties(Value::from(()), None).unwrap(), "any");
    assert_eq!(properties(Value::from_serialize(json!([])), None).unwrap(), "any");
    assert_eq!(properties(Value::from("FormData"), None).unwrap(), "FormData");
  }

  #[test]
  fn test_enum_key_quotes_non_identifiers() {
    assert_eq!(enum_key("Active"), "Active");
    assert_eq!(enum_key("$ref"), "$ref");
    assert_eq!(enum_key("in-progress"), "'in-progress'");
    assert_eq!(enum_key("2xx"), "'2xx'");
  }

  #[test]
  fn test_type_union() {
    assert_eq!(type_union(Value::from_serialize(json!(["Pet", "null"]))).unwrap(), "Pet | null");
    assert_eq!(type_union(Value::from("string")).unwrap(), "string");
    assert_eq!(type_union(Value::UNDEFINED).unwrap(), "any");
  }
}
