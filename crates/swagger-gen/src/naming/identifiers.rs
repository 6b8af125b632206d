use std::sync::LazyLock;

use any_ascii::any_ascii;
use inflections::Inflect;
use regex::Regex;

use crate::error::{GeneratorError, Result};

static INVALID_CHARS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").unwrap());
static MULTI_UNDERSCORE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_+").unwrap());
static TS_IDENTIFIER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap());

/// A parsed type reference such as `Namespace.Sub.TypeName<Arg1,Arg2>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeName {
  pub name: String,
  pub namespace: String,
  pub full_name: String,
  pub is_generic: bool,
  pub generic_arguments: Vec<TypeName>,
}

impl TypeName {
  /// Splits a dotted, possibly generic, type reference into its parts.
  ///
  /// Angle and square brackets both open a nesting level; `.` and `,` only split at
  /// depth zero. Unbalanced brackets are rejected.
  pub fn parse(type_ref: &str) -> Result<Self> {
    check_balanced(type_ref)?;

    let is_generic = type_ref.ends_with('>');
    let generic_arguments = match type_ref.find('<') {
      Some(open) if is_generic => parse_generic_arguments(&type_ref[open + 1..type_ref.len() - 1])?,
      _ => vec![],
    };

    let (namespace, name) = match find_last_top_level(type_ref, '.') {
      Some(pos) => (&type_ref[..pos], &type_ref[pos + 1..]),
      None => ("", type_ref),
    };
    let name = match name.find('<') {
      Some(open) if open > 0 => &name[..open],
      _ => name,
    };

    Ok(Self {
      name: name.to_string(),
      namespace: namespace.to_string(),
      full_name: type_ref.to_string(),
      is_generic,
      generic_arguments,
    })
  }

  /// First component of the namespace, empty when there is none.
  #[must_use]
  pub fn root_namespace(&self) -> &str {
    self.namespace.split('.').next().unwrap_or_default()
  }
}

fn check_balanced(type_ref: &str) -> Result<()> {
  let mut depth = 0i32;
  for ch in type_ref.chars() {
    match ch {
      '<' | '[' => depth += 1,
      '>' | ']' => depth -= 1,
      _ => {}
    }
    if depth < 0 {
      break;
    }
  }
  if depth == 0 {
    Ok(())
  } else {
    Err(GeneratorError::InvalidTypeName {
      name: type_ref.to_string(),
      reason: "unbalanced brackets".to_string(),
    })
  }
}

fn find_last_top_level(type_ref: &str, separator: char) -> Option<usize> {
  let mut depth = 0i32;
  for (pos, ch) in type_ref.char_indices().rev() {
    match ch {
      '>' | ']' => depth += 1,
      '<' | '[' => depth -= 1,
      c if c == separator && depth == 0 => return Some(pos),
      _ => {}
    }
  }
  None
}

fn parse_generic_arguments(args: &str) -> Result<Vec<TypeName>> {
  let mut results = vec![];
  let mut depth = 0i32;
  let mut start = 0;
  for (pos, ch) in args.char_indices() {
    match ch {
      '<' | '[' => depth += 1,
      '>' | ']' => depth -= 1,
      ',' if depth == 0 => {
        push_argument(&mut results, &args[start..pos])?;
        start = pos + 1;
      }
      _ => {}
    }
  }
  push_argument(&mut results, &args[start..])?;
  Ok(results)
}

fn push_argument(results: &mut Vec<TypeName>, raw: &str) -> Result<()> {
  let trimmed = raw.trim();
  if !trimmed.is_empty() {
    results.push(TypeName::parse(trimmed)?);
  }
  Ok(())
}

/// Transliterates to ASCII, replaces invalid characters with underscores, collapses
/// consecutive underscores and trims them from both ends.
pub(crate) fn sanitize(input: &str) -> String {
  if input.is_empty() {
    return String::new();
  }

  let ascii = any_ascii(input);
  let replaced = INVALID_CHARS_RE.replace_all(&ascii, "_");
  let collapsed = MULTI_UNDERSCORE_RE.replace_all(&replaced, "_");

  collapsed.trim_matches('_').to_string()
}

/// Converts a route segment or HTTP method into `PascalCase`.
///
/// Words that already carry lowercase letters keep their inner capitalization, so
/// `petsByID` becomes `PetsByID` while `GET` and `get` both become `Get`.
#[must_use]
pub fn to_pascal_case(input: &str) -> String {
  sanitize(input)
    .split('_')
    .filter(|word| !word.is_empty())
    .map(capitalize_word)
    .collect()
}

fn capitalize_word(word: &str) -> String {
  let has_lower = word.chars().any(|c| c.is_ascii_lowercase());
  let has_upper = word.chars().any(|c| c.is_ascii_uppercase());
  if !(has_lower && has_upper) {
    return word.to_lowercase().to_pascal_case();
  }

  let mut chars = word.chars();
  match chars.next() {
    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
    None => String::new(),
  }
}

/// Whether `value` can be used unquoted as a TypeScript member name.
#[must_use]
pub fn is_identifier(value: &str) -> bool {
  TS_IDENTIFIER_RE.is_match(value)
}
