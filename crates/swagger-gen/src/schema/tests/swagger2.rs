use serde_json::json;

use crate::schema::{ApiDocument, ParameterLocation, Primitive, SchemaKind, SpecVersion};

fn swagger() -> serde_json::Value {
  json!({
    "swagger": "2.0",
    "info": { "title": "Legacy", "version": "2" },
    "produces": ["application/json"],
    "parameters": {
      "PageSize": { "name": "size", "in": "query", "type": "integer", "required": false }
    },
    "paths": {
      "/pets": {
        "get": {
          "parameters": [{ "$ref": "#/parameters/PageSize" }],
          "responses": {
            "200": { "description": "ok", "schema": { "type": "array", "items": { "$ref": "#/definitions/Pet" } } }
          }
        },
        "post": {
          "parameters": [{ "name": "pet", "in": "body", "required": true, "schema": { "$ref": "#/definitions/Pet" } }],
          "responses": { "200": { "description": "created" } }
        }
      },
      "/pets/{id}/photo": {
        "post": {
          "consumes": ["multipart/form-data"],
          "produces": ["application/octet-stream"],
          "parameters": [
            { "name": "id", "in": "path", "required": true, "type": "string" },
            { "name": "file", "in": "formData", "required": true, "type": "file" },
            { "name": "caption", "in": "formData", "type": "string" }
          ],
          "responses": { "200": { "description": "ok", "schema": { "type": "string", "format": "binary" } } }
        }
      }
    },
    "definitions": {
      "Pet": { "type": "object", "required": ["name"], "properties": { "name": { "type": "string" } } }
    }
  })
}

#[test]
fn test_definitions_become_schemas() {
  let doc = ApiDocument::from_value(&swagger()).unwrap();
  assert_eq!(doc.version, SpecVersion::Swagger2);
  assert!(doc.schemas.contains_key("Pet"));
}

#[test]
fn test_inline_parameters_keep_their_type() {
  let doc = ApiDocument::from_value(&swagger()).unwrap();
  let param = &doc.operations[0].parameters[0];
  assert_eq!(param.name, "size");
  assert_eq!(param.location, ParameterLocation::Query);
  assert!(matches!(
    doc.arena.get(param.schema).kind,
    SchemaKind::Primitive {
      primitive: Primitive::Integer,
      ..
    }
  ));
}

#[test]
fn test_response_schema_keyed_by_produces() {
  let doc = ApiDocument::from_value(&swagger()).unwrap();
  let response = doc.operations[0].response.as_ref().unwrap();
  let schema = response.content["application/json"];
  assert!(matches!(doc.arena.get(schema).kind, SchemaKind::Array { .. }));

  let photo = &doc.operations[2];
  let response = photo.response.as_ref().unwrap();
  assert!(response.content.contains_key("application/octet-stream"));
}

#[test]
fn test_response_without_schema_has_no_content() {
  let doc = ApiDocument::from_value(&swagger()).unwrap();
  let response = doc.operations[1].response.as_ref().unwrap();
  assert!(response.content.is_empty());
}

#[test]
fn test_body_parameter_becomes_json_request_body() {
  let doc = ApiDocument::from_value(&swagger()).unwrap();
  let op = &doc.operations[1];
  assert!(op.parameters.is_empty());
  let body = op.request_body.as_ref().unwrap();
  let schema = body.content["application/json"];
  assert_eq!(doc.arena.get(schema).kind, SchemaKind::Reference("Pet".to_string()));
}

#[test]
fn test_form_data_becomes_multipart_object() {
  let doc = ApiDocument::from_value(&swagger()).unwrap();
  let op = &doc.operations[2];
  assert_eq!(op.parameters.len(), 1);
  let body = op.request_body.as_ref().unwrap();
  let schema = body.content["multipart/form-data"];
  let SchemaKind::Object(shape) = &doc.arena.get(schema).kind else {
    panic!("expected object form schema");
  };
  assert_eq!(shape.required, ["file"]);
  assert_eq!(
    doc.arena.get(shape.properties["file"]).kind,
    SchemaKind::Primitive {
      primitive: Primitive::String,
      format: Some("binary".to_string())
    }
  );
}
