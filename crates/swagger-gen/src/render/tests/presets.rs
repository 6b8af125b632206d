use crate::{
  generator::{
    model_projector::{Definition, Dependency, ModelEntry, ModelProperty},
    operation_projector::{
      ApiAction, ApiController, ApiDefinition, ApiDependency, ApiNamespace, ApiProperty, ResponseType,
    },
  },
  render::{DEFAULT_API_TEMPLATE, DEFAULT_MODEL_TEMPLATE, TemplateRenderer, merge_sources},
  schema::HttpMethod,
};

fn property(name: &str, types: &[&str], value: &str, required: bool) -> ModelProperty {
  ModelProperty {
    name: name.to_string(),
    types: types.iter().map(|t| (*t).to_string()).collect(),
    value: value.to_string(),
    description: None,
    required,
  }
}

fn model(definition: Definition, name: &str, properties: Vec<ModelProperty>) -> ModelEntry {
  ModelEntry {
    definition,
    name: name.to_string(),
    export_name: name.to_string(),
    key: name.to_string(),
    description: None,
    properties,
    dependencies: vec![],
    extends: None,
  }
}

fn action(name: &str, method: HttpMethod, url: &str) -> ApiAction {
  ApiAction {
    url: url.to_string(),
    method,
    name: name.to_string(),
    description: None,
    response_type: ResponseType::Json,
    parameters: vec![],
    header: vec![],
    request_body: None,
    request_body_form_data: None,
    return_type: "void".to_string(),
    limit: None,
    operation_id: None,
  }
}

#[test]
fn test_class_model_renders_defaults_and_imports() {
  let mut entry = model(
    Definition::Class,
    "Order",
    vec![
      property("id", &["number"], "0", true),
      property("tags", &["Tag[]"], "[]", true),
      property("note", &["string", "null", "undefined"], "null", false),
    ],
  );
  entry.description = Some("A placed order".to_string());
  entry.dependencies = vec![Dependency {
    id: "Tag".to_string(),
    modules: "Tag".to_string(),
  }];
  entry.extends = Some("Entity".to_string());

  let code = TemplateRenderer::new().render_model(DEFAULT_MODEL_TEMPLATE, &entry).unwrap();
  assert!(code.contains("import { Tag } from './Tag';"), "{code}");
  assert!(code.contains("/** A placed order */"), "{code}");
  assert!(code.contains("export class Order extends Entity {"), "{code}");
  assert!(code.contains("id: number = 0;"), "{code}");
  assert!(code.contains("tags: Tag[] = [];"), "{code}");
  assert!(code.contains("note?: string | null | undefined = null;"), "{code}");
}

#[test]
fn test_interface_model_has_no_values() {
  let entry = model(
    Definition::Interface,
    "Pet",
    vec![property("name", &["string"], "null", true)],
  );
  let code = TemplateRenderer::new().render_model(DEFAULT_MODEL_TEMPLATE, &entry).unwrap();
  assert!(code.contains("export interface Pet {"), "{code}");
  assert!(code.contains("name: string;"), "{code}");
  assert!(!code.contains('='), "{code}");
}

#[test]
fn test_enum_model_quotes_keys() {
  let entry = model(
    Definition::Enum,
    "Status",
    vec![property("Active", &[], "0", true), property("on-hold", &[], "1", true)],
  );
  let code = TemplateRenderer::new().render_model(DEFAULT_MODEL_TEMPLATE, &entry).unwrap();
  assert!(code.contains("export enum Status {"), "{code}");
  assert!(code.contains("Active = 0,"), "{code}");
  assert!(code.contains("'on-hold' = 1,"), "{code}");
}

#[test]
fn test_type_model_renders_alias() {
  let entry = model(Definition::Type, "Point", vec![property("x", &["number"], "0", true)]);
  let code = TemplateRenderer::new().render_model(DEFAULT_MODEL_TEMPLATE, &entry).unwrap();
  assert!(code.contains("export type Point = {\nx: number;\n};"), "{code}");
}

#[test]
fn test_api_template_renders_every_level() {
  let mut get = action("PetsByPetId_GetAsync", HttpMethod::Get, "/pets/{petId}");
  get.parameters = vec![ApiProperty {
    name: "petId".to_string(),
    description: None,
    required: true,
    types: vec!["number".to_string()],
    is_path: true,
  }];
  get.return_type = "Pet".to_string();
  let mut post = action("Orders_PostAsync", HttpMethod::Post, "/store/orders");
  post.request_body = Some("Order".to_string());

  let api = ApiDefinition {
    namespaces: vec![ApiNamespace {
      name: "Store".to_string(),
      description: Some("Store access".to_string()),
      controllers: vec![ApiController {
        name: "Orders".to_string(),
        description: None,
        actions: vec![post],
      }],
    }],
    controllers: vec![ApiController {
      name: "Pets".to_string(),
      description: None,
      actions: vec![get],
    }],
    actions: vec![action("Health_GetAsync", HttpMethod::Get, "/health")],
    dependencies: vec![ApiDependency {
      id: "Pet".to_string(),
      modules: "Pet".to_string(),
      file_id: "gen/models/Pet.ts".to_string(),
    }],
  };

  let code = TemplateRenderer::new().render_api(DEFAULT_API_TEMPLATE, &api).unwrap();
  assert!(code.contains("  Pet,\n} from '../models';"), "{code}");
  assert!(code.contains("/** Store access */\nexport namespace Store {"), "{code}");
  assert!(code.contains("export class Orders {"), "{code}");
  assert!(code.contains("static async Orders_PostAsync(body: Order, options?: AxiosRequestConfig): Promise<void>"), "{code}");
  assert!(code.contains("export class Pets {"), "{code}");
  assert!(code.contains("static async PetsByPetId_GetAsync(params: {\npetId: number;\n}, options?: AxiosRequestConfig): Promise<Pet>"), "{code}");
  assert!(code.contains("url: `/pets/${params.petId}`,"), "{code}");
  assert!(code.contains("export async function Health_GetAsync(options?: AxiosRequestConfig): Promise<void>"), "{code}");
  assert!(code.contains("responseType: 'json',"), "{code}");
}

#[test]
fn test_custom_template_sees_helpers() {
  let entry = model(Definition::Interface, "Pet", vec![property("name", &["string"], "null", false)]);
  let code = TemplateRenderer::new()
    .render_model("type {{ data.name }} = {{ properties(data.properties, false) }}", &entry)
    .unwrap();
  assert_eq!(code, "type Pet = {\nname?: string;\n}");
}

#[test]
fn test_merge_sources_drops_repeated_imports() {
  let merged = merge_sources(&[
    "import { Tag } from './Tag';\nexport class A {}".to_string(),
    "import { Tag } from './Tag';\nexport class B {}".to_string(),
  ]);
  assert_eq!(merged.matches("import { Tag }").count(), 1);
  assert!(merged.contains("export class A {}"));
  assert!(merged.contains("export class B {}"));
}
