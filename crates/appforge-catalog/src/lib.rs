//! Component catalog for appforge.
//!
//! The catalog maps component type tags to their schemas. It is the single source
//! of truth for which properties a node may carry, which of them are bindable and
//! how many children it accepts. The standard catalog is built once per process
//! and shared read-only.

pub mod schema;
mod standard;

pub use schema::{
    BindMode, Category, ChildPolicy, ComponentBuilder, ComponentKind, ComponentMeta, PropKind, PropSchema,
};
pub use standard::{SliderSchema, StepperSchema, TableSchema};

use appforge_core::{CatalogError, Props, RawProps};
use indexmap::IndexMap;
use once_cell::sync::Lazy;

/// Schema of one component type.
///
/// The default `validate` and `defaults` are table-driven from [`ComponentMeta`];
/// implementors override `validate` to add cross-property checks.
pub trait ComponentSchema: Send + Sync {
    /// Static metadata for this component type.
    fn meta(&self) -> &ComponentMeta;

    /// Validate raw properties and fill declared defaults.
    fn validate(&self, raw: &RawProps) -> Result<Props, CatalogError> {
        self.meta().validate_props(raw)
    }

    /// Declared default values.
    fn defaults(&self) -> Props {
        self.meta().defaults()
    }
}

static STANDARD: Lazy<Catalog> = Lazy::new(Catalog::with_standard_components);

/// Registry of component schemas, keyed by type tag in registration order.
pub struct Catalog {
    components: IndexMap<String, Box<dyn ComponentSchema>>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("components", &self.components.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self {
            components: IndexMap::new(),
        }
    }

    /// The process-wide standard catalog.
    pub fn standard() -> &'static Catalog {
        &STANDARD
    }

    /// Build a fresh catalog holding every standard component.
    ///
    /// Use this to extend the standard set with custom components.
    pub fn with_standard_components() -> Self {
        let mut catalog = Self::new();
        for schema in standard::components() {
            catalog
                .register_boxed(schema)
                .expect("standard component tags are distinct");
        }
        catalog
    }

    /// Register a component schema.
    pub fn register<S: ComponentSchema + 'static>(&mut self, schema: S) -> Result<(), CatalogError> {
        self.register_boxed(Box::new(schema))
    }

    /// Register an already boxed component schema.
    pub fn register_boxed(&mut self, schema: Box<dyn ComponentSchema>) -> Result<(), CatalogError> {
        let tag = schema.meta().type_tag.clone();
        if self.components.contains_key(&tag) {
            return Err(CatalogError::DuplicateType(tag));
        }
        self.components.insert(tag, schema);
        Ok(())
    }

    /// Get the schema for a type tag.
    pub fn schema(&self, type_tag: &str) -> Result<&dyn ComponentSchema, CatalogError> {
        self.components
            .get(type_tag)
            .map(|s| s.as_ref())
            .ok_or_else(|| CatalogError::UnknownType(type_tag.to_string()))
    }

    /// Get the metadata for a type tag.
    pub fn lookup(&self, type_tag: &str) -> Result<&ComponentMeta, CatalogError> {
        self.schema(type_tag).map(|s| s.meta())
    }

    /// Validate raw properties for a type tag.
    pub fn validate(&self, type_tag: &str, raw: &RawProps) -> Result<Props, CatalogError> {
        self.schema(type_tag)?.validate(raw)
    }

    /// Declared defaults for a type tag.
    pub fn defaults(&self, type_tag: &str) -> Result<Props, CatalogError> {
        Ok(self.schema(type_tag)?.defaults())
    }

    /// Whether a type tag is registered.
    pub fn contains(&self, type_tag: &str) -> bool {
        self.components.contains_key(type_tag)
    }

    /// All registered type tags, in registration order.
    pub fn type_tags(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    /// All registered metadata, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ComponentMeta> {
        self.components.values().map(|s| s.meta())
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}
