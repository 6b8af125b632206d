use serde_json::json;

use super::support::{document, resolve, schema_ref, type_name};
use crate::{
  error::GeneratorError,
  generator::{TypeGraph, TypeResolver},
  schema::EnumMember,
};

#[test]
fn test_named_schema_resolves_once() {
  let doc = document(
    json!({
      "Pet": { "type": "object", "properties": { "name": { "type": "string" } } },
      "Owner": { "type": "object", "properties": { "pet": schema_ref("Pet"), "other": schema_ref("Pet") } }
    }),
    json!({}),
  );
  let mut resolver = TypeResolver::new(&doc);
  let first = resolver.resolve_reference("Pet").unwrap();
  let second = resolver.resolve_reference("Pet").unwrap();
  assert_eq!(first, second);

  resolver.resolve_all().unwrap();
  let types = resolver.finish();
  let owner = types.graph.get(types.registry["Owner"]);
  assert_eq!(owner.properties["pet"].type_id, first);
  assert_eq!(owner.properties["other"].type_id, first);
}

#[test]
fn test_alias_shares_the_target_type() {
  let types = resolve(json!({
    "PetAlias": schema_ref("Pet"),
    "Pet": { "type": "object", "properties": { "name": { "type": "string" } } }
  }));
  assert_eq!(types.registry["PetAlias"], types.registry["Pet"]);
  assert_eq!(type_name(&types, "PetAlias"), "Pet");
}

#[test]
fn test_self_reference_becomes_any() {
  let types = resolve(json!({
    "Node": { "type": "object", "properties": { "next": schema_ref("Node") } }
  }));
  let node = types.graph.get(types.registry["Node"]);
  assert_eq!(node.properties["next"].type_id, types.graph.any());
  assert_eq!(types.cycles, vec![vec!["Node".to_string(), "Node".to_string()]]);
}

#[test]
fn test_mutual_reference_records_the_path() {
  let types = resolve(json!({
    "A": { "type": "object", "properties": { "b": schema_ref("B") } },
    "B": { "type": "object", "properties": { "a": schema_ref("A") } }
  }));
  assert_eq!(types.cycles, vec![vec!["A".to_string(), "B".to_string(), "A".to_string()]]);
  let b = types.graph.get(types.registry["B"]);
  assert_eq!(b.properties["a"].type_id, types.graph.any());
  let a = types.graph.get(types.registry["A"]);
  assert_eq!(a.properties["b"].type_id, types.registry["B"]);
}

#[test]
fn test_required_overrides_nullable() {
  let types = resolve(json!({
    "Owner": {
      "type": "object",
      "required": ["name"],
      "properties": {
        "name": { "type": "string", "nullable": true },
        "nick": { "type": "string", "nullable": true },
        "age": { "type": "integer" }
      }
    }
  }));
  let owner = types.graph.get(types.registry["Owner"]);
  assert!(!owner.properties["name"].nullable);
  assert!(owner.properties["name"].required);
  assert!(owner.properties["nick"].nullable);
  assert!(!owner.properties["age"].nullable);
  assert!(!owner.properties["age"].required);
}

#[test]
fn test_arrays_and_primitives() {
  let types = resolve(json!({
    "Pet": { "type": "object" },
    "Pets": { "type": "array", "items": schema_ref("Pet") },
    "Grid": { "type": "array", "items": { "type": "array", "items": { "type": "number" } } },
    "Stamp": { "type": "string", "format": "date-time" },
    "Loose": { "type": "array" }
  }));
  assert_eq!(type_name(&types, "Pets"), "Pet[]");
  assert_eq!(type_name(&types, "Grid"), "number[][]");
  assert_eq!(type_name(&types, "Stamp"), "Date");
  assert_eq!(type_name(&types, "Loose"), "any[]");
  assert!(types.graph.get(types.registry["Pets"]).is_builtin);
}

#[test]
fn test_string_enum_members_use_positions() {
  let types = resolve(json!({
    "Status": { "type": "string", "enum": ["available", "sold", null] }
  }));
  let status = types.graph.get(types.registry["Status"]);
  assert!(status.is_enum);
  assert!(!status.is_builtin);
  assert_eq!(status.name, "Status");
  assert_eq!(
    status.enum_members,
    vec![
      EnumMember {
        key: "available".to_string(),
        value: 0,
      },
      EnumMember {
        key: "sold".to_string(),
        value: 1,
      },
    ]
  );
}

#[test]
fn test_numeric_enum_members_are_numbered() {
  let types = resolve(json!({
    "Level": { "type": "integer", "enum": [1, 5] }
  }));
  let level = types.graph.get(types.registry["Level"]);
  let keys: Vec<(&str, i64)> = level.enum_members.iter().map(|m| (m.key.as_str(), m.value)).collect();
  assert_eq!(keys, [("Item1", 1), ("Item2", 5)]);
}

#[test]
fn test_boolean_and_fractional_enums_have_no_members() {
  let types = resolve(json!({
    "Flag": { "type": "boolean", "enum": [true, false] },
    "Ratio": { "type": "number", "enum": [0.5, 1.5] }
  }));
  let flag = types.graph.get(types.registry["Flag"]);
  assert!(flag.is_enum);
  assert_eq!(flag.name, "Flag");
  assert!(flag.enum_members.is_empty());

  let ratio = types.graph.get(types.registry["Ratio"]);
  assert!(ratio.is_enum);
  assert!(ratio.enum_members.is_empty());
}

#[test]
fn test_enum_values_extension_wins() {
  let types = resolve(json!({
    "Level": {
      "type": "integer",
      "enum": [1, 5],
      "x-enumValues": [{ "key": "Low", "value": 1 }, { "key": "High", "value": 5 }]
    }
  }));
  let level = types.graph.get(types.registry["Level"]);
  let keys: Vec<&str> = level.enum_members.iter().map(|m| m.key.as_str()).collect();
  assert_eq!(keys, ["Low", "High"]);
}

#[test]
fn test_additional_properties_become_record() {
  let types = resolve(json!({
    "Counts": { "type": "object", "additionalProperties": { "type": "integer" } },
    "Bag": { "type": "object", "additionalProperties": true }
  }));
  assert_eq!(type_name(&types, "Counts"), "Record<string,number>");
  assert_eq!(type_name(&types, "Bag"), "Record<string,string>");
  assert!(types.graph.get(types.registry["Counts"]).is_builtin);
}

#[test]
fn test_generic_definition_and_instance() {
  let types = resolve(json!({
    "T": { "type": "object", "x-isGenericParameter": true },
    "Pet": { "type": "object", "properties": { "name": { "type": "string" } } },
    "PagedResult<T>": {
      "type": "object",
      "x-isGenericType": true,
      "x-isGenericTypeDefinition": true,
      "x-genericArguments": [schema_ref("T")],
      "properties": {
        "items": { "type": "array", "items": schema_ref("T") },
        "total": { "type": "integer" }
      }
    },
    "PagedResult<Pet>": {
      "type": "object",
      "x-isGenericType": true,
      "x-genericTypeDefinition": schema_ref("PagedResult<T>"),
      "x-genericArguments": [schema_ref("Pet")]
    }
  }));

  assert_eq!(type_name(&types, "PagedResult<T>"), "PagedResult<T>");
  assert_eq!(type_name(&types, "PagedResult<Pet>"), "PagedResult<Pet>");

  let instance = types.graph.get(types.registry["PagedResult<Pet>"]);
  assert_eq!(instance.generic_type_definition, Some(types.registry["PagedResult<T>"]));
  assert!(!instance.is_model());
  assert!(types.graph.get(types.registry["PagedResult<T>"]).is_model());
  assert!(!types.graph.get(types.registry["T"]).is_model());
}

#[test]
fn test_generic_instance_without_definition_is_rejected() {
  let doc = document(
    json!({ "Page": { "type": "object", "x-isGenericType": true } }),
    json!({}),
  );
  let mut resolver = TypeResolver::new(&doc);
  let err = resolver.resolve_all().unwrap_err();
  assert!(matches!(err, GeneratorError::GenericDefinitionMissing(ref name) if name == "Page"));
}

#[test]
fn test_all_of_with_one_reference_and_inline_objects() {
  let types = resolve(json!({
    "Pet": { "type": "object", "properties": { "name": { "type": "string" } } },
    "Dog": {
      "allOf": [
        schema_ref("Pet"),
        { "type": "object", "required": ["bark"], "properties": { "bark": { "type": "boolean" } } },
        { "type": "object", "properties": { "breed": { "type": "string" } } }
      ]
    }
  }));
  let dog = types.graph.get(types.registry["Dog"]);
  assert_eq!(dog.name, "Dog");
  assert_eq!(dog.base_type, Some(types.registry["Pet"]));
  assert_eq!(dog.properties.keys().collect::<Vec<_>>(), ["bark", "breed"]);
  assert!(dog.properties["bark"].required);
}

#[test]
fn test_all_of_with_two_references_is_rejected() {
  let doc = document(
    json!({
      "A": { "type": "object" },
      "B": { "type": "object" },
      "C": { "allOf": [schema_ref("A"), schema_ref("B")] }
    }),
    json!({}),
  );
  let mut resolver = TypeResolver::new(&doc);
  let err = resolver.resolve_all().unwrap_err();
  assert!(matches!(err, GeneratorError::UnsupportedComposition { ref location, .. } if location == "C"));
  assert!(err.is_unsupported_shape());
}

#[test]
fn test_one_of_keeps_single_non_null_member() {
  let types = resolve(json!({
    "Pet": { "type": "object" },
    "MaybePet": { "oneOf": [schema_ref("Pet"), { "type": "null" }] }
  }));
  assert_eq!(types.registry["MaybePet"], types.registry["Pet"]);
}

#[test]
fn test_one_of_with_several_members_is_rejected() {
  let doc = document(
    json!({ "Either": { "oneOf": [{ "type": "string" }, { "type": "integer" }] } }),
    json!({}),
  );
  let mut resolver = TypeResolver::new(&doc);
  assert!(matches!(
    resolver.resolve_all(),
    Err(GeneratorError::UnsupportedComposition { .. })
  ));
}

#[test]
fn test_missing_reference_is_an_error() {
  let doc = document(json!({ "Owner": { "type": "object", "properties": { "pet": schema_ref("Pet") } } }), json!({}));
  let mut resolver = TypeResolver::new(&doc);
  assert!(matches!(
    resolver.resolve_all(),
    Err(GeneratorError::UnresolvedReference(ref name)) if name == "Pet"
  ));
}

#[test]
fn test_empty_schema_is_any() {
  let types = resolve(json!({ "Anything": {} }));
  assert_eq!(type_name(&types, "Anything"), TypeGraph::ANY);
}

#[test]
fn test_namespaced_schema_name() {
  let types = resolve(json!({ "Shop.Models.Order": { "type": "object" } }));
  let order = types.graph.get(types.registry["Shop.Models.Order"]);
  assert_eq!(order.name, "Order");
  assert_eq!(order.namespace, "Shop.Models");
  assert_eq!(order.file_key(), "Shop.Models.Order");
}
