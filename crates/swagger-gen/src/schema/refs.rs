use percent_encoding::percent_decode_str;
use serde_json::Value;

use crate::error::{GeneratorError, Result};

const MAX_REF_HOPS: usize = 32;

/// Extracts the referenced component name from a `$ref` pointer.
///
/// The name is the last pointer segment, percent-decoded with `~1` and `~0`
/// unescaped, so `#/definitions/PagedResult%3CPet%3E` yields `PagedResult<Pet>`.
#[must_use]
pub fn ref_id(reference: &str) -> String {
  let segment = reference.rsplit('/').next().unwrap_or(reference);
  let decoded = percent_decode_str(segment).decode_utf8_lossy();
  decoded.replace("~1", "/").replace("~0", "~")
}

/// Looks up a local `#/...` pointer inside `root`. External references yield `None`.
#[must_use]
pub fn lookup_local<'a>(root: &'a Value, reference: &str) -> Option<&'a Value> {
  let pointer = reference.strip_prefix('#')?;
  let decoded = percent_decode_str(pointer).decode_utf8().ok()?;
  root.pointer(&decoded)
}

/// Follows `$ref` chains of non-schema components (parameters, request bodies,
/// responses) until an inline object is reached.
pub fn follow_refs<'a>(root: &'a Value, value: &'a Value) -> Result<&'a Value> {
  let mut current = value;
  for _ in 0..MAX_REF_HOPS {
    let Some(reference) = current.get("$ref").and_then(Value::as_str) else {
      return Ok(current);
    };
    current = lookup_local(root, reference).ok_or_else(|| GeneratorError::UnresolvedReference(reference.to_string()))?;
  }
  Err(GeneratorError::InvalidDocument(format!(
    "reference chain longer than {MAX_REF_HOPS} hops"
  )))
}
