use indexmap::IndexMap;

pub use crate::schema::EnumMember;

/// Handle to a [`ResolvedType`] in a [`TypeGraph`]. Equal ids mean the same type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(usize);

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyInfo {
  pub name: String,
  pub type_id: TypeId,
  pub nullable: bool,
  pub required: bool,
  pub description: Option<String>,
}

/// How a type came to be, used to decide whether a schema name may be applied to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeOrigin {
  /// Interned builtin such as `string` or `any`.
  Intrinsic,
  /// Built from one schema node: objects, enums, arrays, maps, generics.
  Schema,
}

/// The normalized form of a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedType {
  pub name: String,
  pub full_name: String,
  pub namespace: String,
  pub is_builtin: bool,
  pub is_array: bool,
  pub element_type: Option<TypeId>,
  pub is_enum: bool,
  pub enum_members: Vec<EnumMember>,
  pub properties: IndexMap<String, PropertyInfo>,
  pub base_type: Option<TypeId>,
  pub is_interface: Option<bool>,
  pub is_generic_type: bool,
  pub is_generic_type_definition: bool,
  pub is_generic_parameter: bool,
  pub generic_type_definition: Option<TypeId>,
  pub generic_arguments: Vec<TypeId>,
  pub description: Option<String>,
  pub origin: TypeOrigin,
}

impl ResolvedType {
  /// A type carrying only a name, with every flag cleared.
  #[must_use]
  pub fn named(name: impl Into<String>) -> Self {
    let name = name.into();
    Self {
      full_name: name.clone(),
      name,
      namespace: String::new(),
      is_builtin: false,
      is_array: false,
      element_type: None,
      is_enum: false,
      enum_members: vec![],
      properties: IndexMap::new(),
      base_type: None,
      is_interface: None,
      is_generic_type: false,
      is_generic_type_definition: false,
      is_generic_parameter: false,
      generic_type_definition: None,
      generic_arguments: vec![],
      description: None,
      origin: TypeOrigin::Schema,
    }
  }

  #[must_use]
  pub fn builtin(name: impl Into<String>) -> Self {
    Self {
      is_builtin: true,
      ..Self::named(name)
    }
  }

  /// File-grouping key: `namespace.name`, or the bare name without a namespace.
  #[must_use]
  pub fn file_key(&self) -> String {
    if self.namespace.is_empty() {
      self.name.clone()
    } else {
      format!("{}.{}", self.namespace, self.name)
    }
  }

  /// Whether this type gets its own model entry.
  ///
  /// Builtins and generic parameters never do; of a generic family only the
  /// definition does, never its instantiations.
  #[must_use]
  pub fn is_model(&self) -> bool {
    !self.is_builtin && !self.is_generic_parameter && (!self.is_generic_type || self.is_generic_type_definition)
  }
}

/// Arena owning every type produced during one generation pass.
#[derive(Debug, Clone)]
pub struct TypeGraph {
  types: Vec<ResolvedType>,
  intrinsics: IndexMap<String, TypeId>,
}

impl Default for TypeGraph {
  fn default() -> Self {
    Self::new()
  }
}

impl TypeGraph {
  pub const ANY: &'static str = "any";
  pub const STRING: &'static str = "string";
  pub const FORM_DATA: &'static str = "FormData";
  pub const RECORD: &'static str = "Record";

  #[must_use]
  pub fn new() -> Self {
    let mut graph = Self {
      types: vec![],
      intrinsics: IndexMap::new(),
    };
    graph.intrinsic(Self::ANY);
    graph
  }

  #[must_use]
  pub fn get(&self, id: TypeId) -> &ResolvedType {
    &self.types[id.0]
  }

  pub fn get_mut(&mut self, id: TypeId) -> &mut ResolvedType {
    &mut self.types[id.0]
  }

  pub fn insert(&mut self, resolved: ResolvedType) -> TypeId {
    self.types.push(resolved);
    TypeId(self.types.len() - 1)
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.types.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.types.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (TypeId, &ResolvedType)> {
    self.types.iter().enumerate().map(|(index, ty)| (TypeId(index), ty))
  }

  /// The universal fallback type.
  #[must_use]
  pub fn any(&self) -> TypeId {
    self.intrinsics[Self::ANY]
  }

  /// Interned builtin looked up by name; every call with the same name returns the same id.
  pub fn intrinsic(&mut self, name: &str) -> TypeId {
    if let Some(&id) = self.intrinsics.get(name) {
      return id;
    }
    let id = self.insert(ResolvedType {
      origin: TypeOrigin::Intrinsic,
      ..ResolvedType::builtin(name)
    });
    self.intrinsics.insert(name.to_string(), id);
    id
  }

  /// Renders a type reference the way it appears in generated code:
  /// `Pet[]`, `Record<string,number>`, `PagedResult<Pet>`.
  #[must_use]
  pub fn type_name(&self, id: TypeId) -> String {
    let ty = self.get(id);
    if ty.is_array {
      let element = ty.element_type.map_or_else(|| Self::ANY.to_string(), |el| self.type_name(el));
      return format!("{element}[]");
    }
    if ty.is_generic_type && !ty.generic_arguments.is_empty() {
      let args: Vec<String> = ty.generic_arguments.iter().map(|&arg| self.type_name(arg)).collect();
      return format!("{}<{}>", ty.name, args.join(","));
    }
    ty.name.clone()
  }

  /// Direct model dependencies of `id`, deduplicated by full name.
  ///
  /// Walks the base type, generic definition, array element, property types and
  /// generic arguments, flattening nested arrays and generic arguments. Builtins,
  /// generic parameters and the type itself are skipped.
  #[must_use]
  pub fn dependencies(&self, id: TypeId) -> Vec<TypeId> {
    let ty = self.get(id);
    let mut found: IndexMap<String, TypeId> = IndexMap::new();

    if let Some(base) = ty.base_type {
      self.collect_dependency(id, base, &mut found);
    }
    if let Some(definition) = ty.generic_type_definition {
      self.collect_dependency(id, definition, &mut found);
    }
    if ty.is_array
      && let Some(element) = ty.element_type
      && !self.get(element).is_builtin
    {
      self.collect_dependency(id, element, &mut found);
    }
    for property in ty.properties.values() {
      self.collect_dependency(id, property.type_id, &mut found);
    }
    if ty.is_generic_type && !ty.is_generic_type_definition {
      for &arg in &ty.generic_arguments {
        self.collect_dependency(id, arg, &mut found);
      }
    }

    found.into_values().collect()
  }

  fn collect_dependency(&self, owner: TypeId, target: TypeId, found: &mut IndexMap<String, TypeId>) {
    let ty = self.get(target);
    for &arg in &ty.generic_arguments {
      self.collect_dependency(owner, arg, found);
    }
    if ty.is_array
      && let Some(element) = ty.element_type
    {
      self.collect_dependency(owner, element, found);
    }

    let owner_ty = self.get(owner);
    if target != owner && ty.full_name != owner_ty.full_name && !ty.is_builtin && !ty.is_generic_parameter {
      found.entry(ty.full_name.clone()).or_insert(target);
    }
  }
}
