use crate::naming::operations::{action_name, route_segments};

#[test]
fn test_route_segments_plain() {
  assert_eq!(route_segments("/pets"), ["Pets"]);
  assert_eq!(route_segments("/api/user-profile/list"), ["Api", "UserProfile", "List"]);
  assert!(route_segments("/").is_empty());
}

#[test]
fn test_route_segments_merge_path_parameters() {
  assert_eq!(route_segments("/pets/{petId}"), ["PetsByPetId"]);
  assert_eq!(route_segments("/store/order/{id}/{rev}"), ["Store", "OrderByIdRev"]);
  assert_eq!(route_segments("/pets/{id}/photos"), ["PetsById", "Photos"]);
}

#[test]
fn test_route_segments_drop_leading_parameter() {
  assert_eq!(route_segments("/{tenant}/users"), ["Users"]);
}

#[test]
fn test_route_segments_embedded_parameters() {
  assert_eq!(route_segments("/files/report.{format}"), ["Files", "ReportByFormat"]);
}

#[test]
fn test_action_name_appends_method_and_async() {
  assert_eq!(action_name(Some("Pets"), "get"), "Pets_GetAsync");
  assert_eq!(action_name(Some("Widget"), "POST"), "Widget_PostAsync");
}

#[test]
fn test_action_name_skips_method_matching_segment_suffix() {
  assert_eq!(action_name(Some("Widget"), "get"), "WidgetAsync");
  assert_eq!(action_name(Some("Budget"), "GET"), "BudgetAsync");
}

#[test]
fn test_action_name_skips_method_when_segment_contains_it() {
  assert_eq!(action_name(Some("GetPets"), "get"), "GetPetsAsync");
  assert_eq!(action_name(Some("PetsDelete"), "delete"), "PetsDeleteAsync");
}

#[test]
fn test_action_name_skips_async_suffix_when_present() {
  assert_eq!(action_name(Some("GetAllAsync"), "get"), "GetAllAsync");
  assert_eq!(action_name(Some("RunAsync"), "post"), "RunAsync_PostAsync");
}

#[test]
fn test_action_name_without_segment() {
  assert_eq!(action_name(None, "get"), "GetAsync");
  assert_eq!(action_name(Some(""), "put"), "PutAsync");
}

#[test]
fn test_distinct_methods_on_same_segment_do_not_collide() {
  let get = action_name(Some("Widget"), "get");
  let post = action_name(Some("Widget"), "post");
  assert_ne!(get, post);
}
