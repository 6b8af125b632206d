use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::identifiers::to_pascal_case;

static PATH_PARAM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{([^{}/]+)\}").unwrap());
static PURE_PATH_PARAM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\{([^{}/]+)\}$").unwrap());

/// Turns a URL template into PascalCase route segments.
///
/// A `{param}` segment is folded into the segment before it: the first one as
/// `By<Param>`, any further ones as `<Param>`. Parameters with no preceding segment
/// are dropped.
///
/// ```text
/// /pets/{petId}            -> ["PetsByPetId"]
/// /store/order/{id}/{rev}  -> ["Store", "OrderByIdRev"]
/// /files/report.{format}   -> ["Files", "ReportByFormat"]
/// /{tenant}/users          -> ["Users"]
/// ```
#[must_use]
pub fn route_segments(path: &str) -> Vec<String> {
  let mut segments: Vec<(String, bool)> = vec![];

  for raw in path.split(['/', '\\']).map(str::trim).filter(|s| !s.is_empty()) {
    if let Some(caps) = PURE_PATH_PARAM_RE.captures(raw) {
      let param = to_pascal_case(&caps[1]);
      if let Some((name, has_param)) = segments.last_mut() {
        if !*has_param {
          name.push_str("By");
          *has_param = true;
        }
        name.push_str(&param);
      }
      continue;
    }

    let mut embedded = false;
    let replaced = PATH_PARAM_RE.replace_all(raw, |caps: &Captures<'_>| {
      let param = to_pascal_case(&caps[1]);
      if embedded {
        param
      } else {
        embedded = true;
        format!("_By{param}")
      }
    });
    let name = to_pascal_case(&replaced);
    if !name.is_empty() {
      segments.push((name, embedded));
    }
  }

  segments.into_iter().map(|(name, _)| name).collect()
}

/// Builds the client function name for one operation.
///
/// The method is appended as `_<Method>` unless the segment already starts or ends
/// with it, and `Async` is appended unless the name already ends with it. An
/// operation without a usable segment is named after its method.
#[must_use]
pub fn action_name(segment: Option<&str>, method: &str) -> String {
  let method_lower = method.to_ascii_lowercase();
  let segment = segment.filter(|s| !s.is_empty()).unwrap_or(&method_lower);
  let segment_lower = segment.to_ascii_lowercase();

  let mut name = to_pascal_case(segment);
  if !(segment_lower.starts_with(&method_lower) || segment_lower.ends_with(&method_lower)) {
    name.push('_');
    name.push_str(&to_pascal_case(&method_lower));
  }
  if !name.to_ascii_lowercase().ends_with("async") {
    name.push_str("Async");
  }
  name
}
