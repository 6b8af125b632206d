use indexmap::IndexMap;
use mediatype::MediaType;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::{
  metrics::GenerationWarning,
  model_projector::{ModelProperty, properties_of},
  type_resolver::TypeResolver,
  types::TypeGraph,
};
use crate::{
  config::ActionHook,
  error::Result,
  naming::operations::{action_name, route_segments},
  schema::{Body, HttpMethod, LimitedResource, NodeId, Operation, Parameter, ParameterLocation},
};

const BLOB: &str = "Blob";
const UNKNOWN: &str = "unknown";

/// How the generated client should read the response body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ResponseType {
  #[default]
  Json,
  Blob,
  Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MediaCategory {
  Json,
  Binary,
  FormData,
  Wildcard,
  Other,
}

impl MediaCategory {
  pub(crate) fn from_content_type(content_type: &str) -> Self {
    if content_type.trim() == "*/*" {
      return Self::Wildcard;
    }
    let Ok(media) = MediaType::parse(content_type) else {
      return Self::Other;
    };
    let suffix = media.suffix.as_ref().map(mediatype::Name::as_str);

    match (media.ty.as_str(), media.subty.as_str(), suffix) {
      (_, "json", _) | (_, _, Some("json")) => Self::Json,
      (_, "octet-stream", _) => Self::Binary,
      ("multipart", "form-data", _) => Self::FormData,
      _ => Self::Other,
    }
  }
}

/// A path or query parameter, or a header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiProperty {
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  pub required: bool,
  #[serde(rename = "type")]
  pub types: Vec<String>,
  pub is_path: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAction {
  pub url: String,
  pub method: HttpMethod,
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  pub response_type: ResponseType,
  pub parameters: Vec<ApiProperty>,
  pub header: Vec<ApiProperty>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub request_body: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub request_body_form_data: Option<Vec<ModelProperty>>,
  pub return_type: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub limit: Option<LimitedResource>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub operation_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiController {
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  pub actions: Vec<ApiAction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiNamespace {
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  pub controllers: Vec<ApiController>,
}

/// A model the API file imports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDependency {
  pub id: String,
  pub modules: String,
  pub file_id: String,
}

/// The projected action tree. Depending on how deep the document's paths go, any of
/// the three lists may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApiDefinition {
  pub namespaces: Vec<ApiNamespace>,
  pub controllers: Vec<ApiController>,
  pub actions: Vec<ApiAction>,
  #[serde(rename = "dependencys")]
  pub dependencies: Vec<ApiDependency>,
}

impl ApiDefinition {
  /// Every action with the name of the group it was placed in.
  pub fn iter_actions(&self) -> impl Iterator<Item = (String, &ApiAction)> {
    let top = self.actions.iter().map(|action| (String::new(), action));
    let controllers = self
      .controllers
      .iter()
      .flat_map(|controller| controller.actions.iter().map(move |action| (controller.name.clone(), action)));
    let namespaced = self.namespaces.iter().flat_map(|namespace| {
      namespace.controllers.iter().flat_map(move |controller| {
        controller
          .actions
          .iter()
          .map(move |action| (format!("{}.{}", namespace.name, controller.name), action))
      })
    });
    top.chain(controllers).chain(namespaced)
  }
}

#[derive(Debug, Default)]
struct RouteNode {
  groups: IndexMap<String, RouteNode>,
  actions: IndexMap<String, ApiAction>,
}

/// Walks the document's operations into namespaces, controllers and actions,
/// resolving parameter and payload types on the way.
pub struct OperationProjector<'r, 'a> {
  resolver: &'r mut TypeResolver<'a>,
  default_response_type: ResponseType,
  action_hook: Option<ActionHook>,
  warnings: Vec<GenerationWarning>,
}

impl<'r, 'a> OperationProjector<'r, 'a> {
  pub fn new(resolver: &'r mut TypeResolver<'a>) -> Self {
    Self {
      resolver,
      default_response_type: ResponseType::default(),
      action_hook: None,
      warnings: vec![],
    }
  }

  #[must_use]
  pub fn with_default_response_type(mut self, response_type: ResponseType) -> Self {
    self.default_response_type = response_type;
    self
  }

  #[must_use]
  pub fn with_action_hook(mut self, hook: Option<ActionHook>) -> Self {
    self.action_hook = hook;
    self
  }

  pub fn project(mut self) -> Result<(ApiDefinition, Vec<GenerationWarning>)> {
    let document = self.resolver.document();
    let mut root = RouteNode::default();

    for operation in &document.operations {
      let mut segments = route_segments(&operation.path);
      let action_segment = segments.pop();
      let name = action_name(action_segment.as_deref(), &operation.method.as_lower());
      let action = self.build_action(operation, name)?;

      let mut node = &mut root;
      for segment in &segments {
        node = node.groups.entry(segment.clone()).or_default();
      }
      let action = match &self.action_hook {
        Some(hook) => hook(action),
        None => action,
      };
      let name = self.unique_name(&node.actions, &segments, action.name.clone());
      node.actions.insert(name.clone(), ApiAction { name, ..action });
    }

    let definition = self.arrange(root);
    Ok((definition, self.warnings))
  }

  /// Appends a counter before the `Async` suffix until the name is free.
  fn unique_name(&mut self, taken: &IndexMap<String, ApiAction>, path: &[String], name: String) -> String {
    if !taken.contains_key(&name) {
      return name;
    }
    let split = if name.to_ascii_lowercase().ends_with("async") {
      name.len() - "async".len()
    } else {
      name.len()
    };
    let (stem, suffix) = name.split_at(split);
    let renamed = (2..)
      .map(|counter| format!("{stem}{counter}{suffix}"))
      .find(|candidate| !taken.contains_key(candidate))
      .unwrap_or_default();

    self.warnings.push(GenerationWarning::DuplicateActionName {
      path: if path.is_empty() { "/".to_string() } else { path.join(".") },
      name: name.clone(),
      renamed: renamed.clone(),
    });
    renamed
  }

  fn build_action(&mut self, operation: &Operation, name: String) -> Result<ApiAction> {
    let parameters = self.properties_in(&operation.parameters, &[ParameterLocation::Path, ParameterLocation::Query])?;
    let header = self.properties_in(&operation.parameters, &[ParameterLocation::Header])?;
    let (request_body, request_body_form_data) = match &operation.request_body {
      Some(body) => self.request_body(body)?,
      None => (None, None),
    };

    Ok(ApiAction {
      url: operation.path.clone(),
      method: operation.method,
      name,
      description: operation.summary.clone().or_else(|| operation.description.clone()),
      response_type: self.response_type(operation.response.as_ref()),
      parameters,
      header,
      request_body,
      request_body_form_data,
      return_type: self.return_type(operation.response.as_ref())?,
      limit: operation.limit.clone(),
      operation_id: operation.operation_id.clone(),
    })
  }

  fn properties_in(&mut self, parameters: &[Parameter], locations: &[ParameterLocation]) -> Result<Vec<ApiProperty>> {
    parameters
      .iter()
      .filter(|param| locations.contains(&param.location))
      .map(|param| {
        let type_id = self.resolver.resolve(param.schema)?;
        Ok(ApiProperty {
          name: param.name.clone(),
          description: param.description.clone(),
          required: param.required,
          types: vec![self.resolver.graph().type_name(type_id)],
          is_path: param.location == ParameterLocation::Path,
        })
      })
      .collect()
  }

  /// JSON content wins; `multipart/form-data` becomes `FormData` plus its field
  /// list; any other content is `unknown`.
  fn request_body(&mut self, body: &Body) -> Result<(Option<String>, Option<Vec<ModelProperty>>)> {
    if let Some(&node) = find_content(body, &[MediaCategory::Json]) {
      let type_id = self.resolver.resolve(node)?;
      return Ok((Some(self.resolver.graph().type_name(type_id)), None));
    }
    if let Some(&node) = find_content(body, &[MediaCategory::FormData]) {
      let type_id = self.resolver.resolve(node)?;
      let fields = properties_of(self.resolver.graph(), type_id, false);
      let fields = (!fields.is_empty()).then_some(fields);
      return Ok((Some(TypeGraph::FORM_DATA.to_string()), fields));
    }
    Ok((Some(UNKNOWN.to_string()), None))
  }

  fn response_type(&self, response: Option<&Body>) -> ResponseType {
    let Some(response) = response else {
      return self.default_response_type;
    };
    if find_content(response, &[MediaCategory::Binary]).is_some() {
      ResponseType::Blob
    } else if find_content(response, &[MediaCategory::Json]).is_some() {
      ResponseType::Json
    } else {
      self.default_response_type
    }
  }

  /// `octet-stream` content is a `Blob`; JSON or `*/*` content gives its schema's
  /// type; a missing 200 response or any other content is `any`.
  fn return_type(&mut self, response: Option<&Body>) -> Result<String> {
    let Some(response) = response else {
      return Ok(TypeGraph::ANY.to_string());
    };
    if find_content(response, &[MediaCategory::Binary]).is_some() {
      return Ok(BLOB.to_string());
    }
    if let Some(&node) = find_content(response, &[MediaCategory::Json, MediaCategory::Wildcard]) {
      let type_id = self.resolver.resolve(node)?;
      return Ok(self.resolver.graph().type_name(type_id));
    }
    Ok(TypeGraph::ANY.to_string())
  }

  /// Lays the route tree out as top-level actions, controllers and namespaces.
  ///
  /// Leading groups that only hold a single subtree are skipped, so a common
  /// prefix such as `/api` does not become a namespace of its own.
  fn arrange(&self, mut root: RouteNode) -> ApiDefinition {
    loop {
      let collapsible = root.actions.is_empty()
        && root.groups.len() == 1
        && root.groups.values().all(|only| only.actions.is_empty() && !only.groups.is_empty());
      if !collapsible {
        break;
      }
      match root.groups.pop() {
        Some((_, only)) => root = only,
        None => break,
      }
    }

    let mut definition = ApiDefinition {
      actions: root.actions.into_values().collect(),
      ..ApiDefinition::default()
    };

    for (name, group) in root.groups {
      if group.groups.is_empty() {
        definition.controllers.push(self.controller(name, group.actions));
        continue;
      }
      let mut controllers = vec![];
      if !group.actions.is_empty() {
        controllers.push(self.controller(name.clone(), group.actions));
      }
      for (child_name, child) in group.groups {
        self.flatten_controllers(child_name, child, &mut controllers);
      }
      definition.namespaces.push(ApiNamespace {
        description: self.description(&name),
        name,
        controllers,
      });
    }
    definition
  }

  fn flatten_controllers(&self, name: String, node: RouteNode, controllers: &mut Vec<ApiController>) {
    if !node.actions.is_empty() {
      controllers.push(self.controller(name.clone(), node.actions));
    }
    for (child_name, child) in node.groups {
      self.flatten_controllers(format!("{name}{child_name}"), child, controllers);
    }
  }

  fn controller(&self, name: String, actions: IndexMap<String, ApiAction>) -> ApiController {
    ApiController {
      description: self.description(&name),
      name,
      actions: actions.into_values().collect(),
    }
  }

  fn description(&self, name: &str) -> Option<String> {
    self.resolver.document().tag_description(name).map(str::to_string)
  }
}

fn find_content<'b>(body: &'b Body, categories: &[MediaCategory]) -> Option<&'b NodeId> {
  categories.iter().find_map(|category| {
    body
      .content
      .iter()
      .find(|(media, _)| MediaCategory::from_content_type(media) == *category)
      .map(|(_, node)| node)
  })
}
