use std::path::Path;

use crate::{
  ApiOptions, ModelOptions, Orchestrator, TargetSettings,
  config::DocumentSource,
  generator::{Definition, Projection, ResponseType},
  output::Formatter,
  render::{DEFAULT_API_TEMPLATE, DEFAULT_MODEL_TEMPLATE, TemplateRenderer},
  schema::{ApiDocument, SpecVersion},
};

const PETSTORE: &str = include_str!("../../fixtures/petstore.json");

fn projection() -> Projection {
  let document = ApiDocument::from_slice(PETSTORE.as_bytes()).unwrap();
  Projection::build(&document, ResponseType::Json, None).unwrap()
}

#[test]
fn test_petstore_document() {
  let document = ApiDocument::from_slice(PETSTORE.as_bytes()).unwrap();
  assert_eq!(document.version, SpecVersion::OpenApi3);
  assert_eq!(document.title.as_deref(), Some("Swagger Petstore"));
  assert_eq!(document.operations.len(), 11, "every operation with responses is kept");
}

#[test]
fn test_petstore_models() {
  let projection = projection();
  let names: Vec<&str> = projection.models.iter().map(|m| m.name.as_str()).collect();
  assert_eq!(
    names,
    ["Category", "Tag", "PetStatus", "Pet", "OrderStatus", "Order", "ApiResponse"]
  );

  let pet = &projection.models[3];
  assert_eq!(pet.definition, Definition::Interface);
  let deps: Vec<&str> = pet.dependencies.iter().map(|d| d.modules.as_str()).collect();
  assert_eq!(deps, ["Category", "Tag", "PetStatus"], "Pet imports its referenced models once");

  let order = &projection.models[5];
  assert_eq!(order.definition, Definition::Class);
  let values: Vec<&str> = order.properties.iter().map(|p| p.value.as_str()).collect();
  assert_eq!(values, ["0", "0", "0", "new Date()", "0", "false", "null"]);

  let status = &projection.models[4];
  assert_eq!(status.definition, Definition::Enum);
  let members: Vec<&str> = status.properties.iter().map(|p| p.name.as_str()).collect();
  assert_eq!(members, ["Placed", "Approved", "Delivered"]);
}

#[test]
fn test_petstore_actions() {
  let projection = projection();
  let api = &projection.api;

  let top: Vec<&str> = api.actions.iter().map(|a| a.name.as_str()).collect();
  assert_eq!(
    top,
    ["Pet_PutAsync", "Pet_PostAsync", "PetByPetId_GetAsync", "PetByPetId_DeleteAsync"]
  );

  let controllers: Vec<(&str, Option<&str>)> = api
    .controllers
    .iter()
    .map(|c| (c.name.as_str(), c.description.as_deref()))
    .collect();
  assert_eq!(
    controllers,
    [
      ("Pet", Some("Everything about your Pets")),
      ("PetByPetId", None),
      ("Store", Some("Access to Petstore orders")),
      ("User", Some("Operations about user")),
    ]
  );
  assert!(api.namespaces.is_empty());

  let store: Vec<(&str, &str)> = api.controllers[2]
    .actions
    .iter()
    .map(|a| (a.name.as_str(), a.return_type.as_str()))
    .collect();
  assert_eq!(
    store,
    [
      ("Inventory_GetAsync", "Record<string,number>"),
      ("Order_PostAsync", "Order"),
      ("OrderByOrderId_GetAsync", "Order"),
      ("ReceiptByOrderId_GetAsync", "Blob"),
    ]
  );

  let delete = &api.actions[3];
  assert_eq!(delete.return_type, "any");
  assert_eq!(delete.parameters[0].name, "petId");
  assert_eq!(delete.header[0].name, "api_key");

  let upload = &api.controllers[1].actions[0];
  assert_eq!(upload.request_body.as_deref(), Some("FormData"));
  assert_eq!(upload.return_type, "ApiResponse");

  let stats = projection.stats();
  assert_eq!(stats.actions_generated, 11);
  assert_eq!(stats.controllers_generated, 4);
  assert_eq!(stats.models_generated, 7);
  assert_eq!(stats.import_cycles, 0);
}

#[test]
fn test_petstore_renders() {
  let projection = projection();
  let renderer = TemplateRenderer::new();

  let api = renderer.render_api(DEFAULT_API_TEMPLATE, &projection.api).unwrap();
  assert!(api.contains("/** Everything about your Pets */\nexport class Pet {"));
  assert!(api.contains("static async FindByStatus_GetAsync(params: {\nstatus?: PetStatus;\n}, options?: AxiosRequestConfig)"));
  assert!(api.contains("url: `/pet/${params.petId}`,"));
  assert!(api.contains("responseType: 'blob',"));

  let pet = renderer.render_model(DEFAULT_MODEL_TEMPLATE, &projection.models[3]).unwrap();
  assert!(pet.contains("import { Category } from './Category';"));
  assert!(pet.contains("  photoUrls: string[];"));
}

#[tokio::test]
async fn test_petstore_generates_from_file() {
  let dir = tempfile::tempdir().unwrap();
  let fixture = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/petstore.json");
  let settings = TargetSettings::builder()
    .source(DocumentSource::File(fixture))
    .base_path(dir.path().join("src/api"))
    .models(ModelOptions::builder().prettier(false).build())
    .api(ApiOptions::builder().prettier(false).build())
    .build();

  let report = Orchestrator::new(settings)
    .with_formatter(Formatter::new("swagger-gen-no-such-formatter"))
    .run()
    .await
    .unwrap();

  assert_eq!(report.stats.files_written, 9, "seven models, the index and the API file");
  assert!(report.stats.warnings.is_empty());
  for model in ["Category", "Tag", "PetStatus", "Pet", "OrderStatus", "Order", "ApiResponse", "index"] {
    assert!(dir.path().join(format!("src/api/models/{model}.ts")).exists(), "{model}.ts");
  }
  let api = tokio::fs::read_to_string(dir.path().join("src/api/apis/index.ts")).await.unwrap();
  assert!(api.contains("export class Store {"));
}
