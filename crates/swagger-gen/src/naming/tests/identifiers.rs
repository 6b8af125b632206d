use crate::{
  error::GeneratorError,
  naming::identifiers::{TypeName, is_identifier, sanitize, to_pascal_case},
};

#[test]
fn test_parse_plain_name() {
  let parsed = TypeName::parse("Pet").unwrap();
  assert_eq!(parsed.name, "Pet");
  assert_eq!(parsed.namespace, "");
  assert_eq!(parsed.full_name, "Pet");
  assert!(!parsed.is_generic);
  assert!(parsed.generic_arguments.is_empty());
}

#[test]
fn test_parse_dotted_name() {
  let parsed = TypeName::parse("Shop.Models.Order").unwrap();
  assert_eq!(parsed.name, "Order");
  assert_eq!(parsed.namespace, "Shop.Models");
  assert_eq!(parsed.root_namespace(), "Shop");
}

#[test]
fn test_parse_generic_name_ignores_dots_inside_arguments() {
  let parsed = TypeName::parse("Shop.PagedResult<Shop.Models.Order,System.Int32>").unwrap();
  assert_eq!(parsed.name, "PagedResult");
  assert_eq!(parsed.namespace, "Shop");
  assert!(parsed.is_generic);
  let args: Vec<_> = parsed.generic_arguments.iter().map(|a| a.full_name.as_str()).collect();
  assert_eq!(args, ["Shop.Models.Order", "System.Int32"]);
  assert_eq!(parsed.generic_arguments[0].name, "Order");
}

#[test]
fn test_parse_nested_generic_arguments() {
  let parsed = TypeName::parse("Result<Dictionary<String,List<Pet>>, Error>").unwrap();
  assert_eq!(parsed.generic_arguments.len(), 2);
  assert_eq!(parsed.generic_arguments[0].name, "Dictionary");
  assert_eq!(parsed.generic_arguments[0].generic_arguments.len(), 2);
  assert_eq!(parsed.generic_arguments[1].full_name, "Error");
}

#[test]
fn test_parse_single_character_argument() {
  let parsed = TypeName::parse("Envelope<T>").unwrap();
  assert_eq!(parsed.generic_arguments.len(), 1);
  assert_eq!(parsed.generic_arguments[0].name, "T");
}

#[test]
fn test_parse_square_brackets_nest() {
  let parsed = TypeName::parse("Ns.Table[Ns.Row]").unwrap();
  assert_eq!(parsed.namespace, "Ns");
  assert_eq!(parsed.name, "Table[Ns.Row]");
}

#[test]
fn test_parse_rejects_unbalanced_brackets() {
  for input in ["Result<Pet", "Result<Pet>>", "List[Pet", "Pet]"] {
    let err = TypeName::parse(input).unwrap_err();
    assert!(
      matches!(err, GeneratorError::InvalidTypeName { .. }),
      "expected InvalidTypeName for {input}, got {err:?}"
    );
  }
}

#[test]
fn test_to_pascal_case() {
  assert_eq!(to_pascal_case("pets"), "Pets");
  assert_eq!(to_pascal_case("user-profile"), "UserProfile");
  assert_eq!(to_pascal_case("user_profile"), "UserProfile");
  assert_eq!(to_pascal_case("petsById"), "PetsById");
  assert_eq!(to_pascal_case("GET"), "Get");
  assert_eq!(to_pascal_case("post"), "Post");
  assert_eq!(to_pascal_case("café"), "Cafe");
  assert_eq!(to_pascal_case(""), "");
}

#[test]
fn test_sanitize() {
  assert_eq!(sanitize("--foo..bar--"), "foo_bar");
  assert_eq!(sanitize(""), "");
}

#[test]
fn test_is_identifier() {
  assert!(is_identifier("available"));
  assert!(is_identifier("_private"));
  assert!(is_identifier("$ref"));
  assert!(!is_identifier("in-stock"));
  assert!(!is_identifier("1st"));
  assert!(!is_identifier(""));
}
