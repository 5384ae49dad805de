//! Binding resolution against a screen's parameters, state and environment.

use crate::ir::{swift_type, Decl, ValueExpr};
use crate::naming;
use appforge_catalog::{BindMode, PropKind, PropSchema};
use appforge_core::{BindingSource, DataBinding, DataModel, PropertyType, Screen, VariableDecl};
use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

/// Member names the generated view struct already uses.
pub const RESERVED_NAMES: &[&str] = &["body", "router", "dismiss"];

/// Supported environment keys and whether each one is a `Bool`.
const ENVIRONMENT_KEYS: &[(&str, bool)] = &[
    ("colorScheme", false),
    ("locale", false),
    ("horizontalSizeClass", false),
    ("verticalSizeClass", false),
    ("isEnabled", true),
    ("dynamicTypeSize", false),
    ("scenePhase", false),
    ("calendar", false),
    ("timeZone", false),
];

/// A binding resolved to a member path of the view.
#[derive(Debug, Clone, PartialEq)]
pub struct Bound {
    pub source: BindingSource,
    pub path: String,
    /// `None` for opaque environment values.
    pub ty: Option<PropertyType>,
}

impl Bound {
    /// The value itself.
    pub fn read(&self) -> ValueExpr {
        ValueExpr::Ident(self.path.clone())
    }

    /// The value interpolated into a string literal.
    pub fn text(&self) -> ValueExpr {
        ValueExpr::Interpolation(self.path.clone())
    }

    /// A `Binding` to the value. Parameters are read-only inside the view.
    pub fn write(&self) -> ValueExpr {
        match self.source {
            BindingSource::State => ValueExpr::Binding(self.path.clone()),
            BindingSource::Parameter | BindingSource::Environment => {
                ValueExpr::Constant(Box::new(self.read()))
            }
        }
    }
}

/// Names and types visible to bindings on one screen.
///
/// Undeclared single-segment state roots are synthesized on first use with a
/// type inferred from the bound property.
#[derive(Debug, Clone)]
pub struct BindingContext<'a> {
    models: &'a [DataModel],
    parameters: IndexMap<&'a str, &'a VariableDecl>,
    state: IndexMap<&'a str, &'a VariableDecl>,
    synthesized: IndexMap<String, PropertyType>,
    environment: IndexSet<String>,
}

impl<'a> BindingContext<'a> {
    /// The first declaration of a name wins.
    pub fn new(screen: &'a Screen, models: &'a [DataModel]) -> Self {
        let mut parameters = IndexMap::new();
        for decl in &screen.parameters {
            parameters.entry(decl.name.as_str()).or_insert(decl);
        }
        let mut state = IndexMap::new();
        for decl in &screen.state {
            if !parameters.contains_key(decl.name.as_str()) {
                state.entry(decl.name.as_str()).or_insert(decl);
            }
        }
        Self {
            models,
            parameters,
            state,
            synthesized: IndexMap::new(),
            environment: IndexSet::new(),
        }
    }

    /// Resolve a binding for a property, synthesizing state where allowed.
    pub fn resolve(&mut self, binding: &DataBinding, prop: &PropSchema) -> Result<Bound, String> {
        let expected = expected_type(&prop.kind);
        let ty = match binding.source {
            BindingSource::State => Some(self.resolve_state(binding, expected.as_ref())?),
            BindingSource::Parameter => {
                let root = binding.root();
                let decl = self
                    .parameters
                    .get(root)
                    .ok_or_else(|| format!("`{root}` is not a parameter of this screen"))?;
                Some(self.traverse(&decl.ty, binding)?)
            }
            BindingSource::Environment => {
                if binding.segments().count() > 1 {
                    return Err("environment bindings take a single key".to_string());
                }
                let (key, is_bool) = ENVIRONMENT_KEYS
                    .iter()
                    .find(|(key, _)| *key == binding.path)
                    .ok_or_else(|| format!("`{}` is not a supported environment key", binding.path))?;
                self.environment.insert(key.to_string());
                is_bool.then_some(PropertyType::Bool)
            }
        };

        // String reads are interpolated, which accepts any type.
        let interpolated = prop.bind == BindMode::Read && prop.kind == PropKind::String;
        if let (false, Some(expected)) = (interpolated, &expected) {
            match &ty {
                Some(actual) if actual == expected => {}
                Some(actual) => {
                    return Err(format!(
                        "`{}` is {} but `{}` expects {}",
                        binding.path,
                        swift_type(actual),
                        prop.name,
                        swift_type(expected)
                    ));
                }
                None => {
                    return Err(format!(
                        "`{}` is not a {} value",
                        binding.path,
                        swift_type(expected)
                    ));
                }
            }
        }

        Ok(Bound {
            source: binding.source,
            path: binding.path.clone(),
            ty,
        })
    }

    fn resolve_state(&mut self, binding: &DataBinding, expected: Option<&PropertyType>) -> Result<PropertyType, String> {
        let root = binding.root();
        if let Some(decl) = self.state.get(root) {
            return self.traverse(&decl.ty, binding);
        }
        if binding.segments().count() > 1 {
            return Err(format!("`{root}` is not declared state"));
        }
        if self.parameters.contains_key(root) {
            return Err(format!("`{root}` is a parameter, not state"));
        }
        if RESERVED_NAMES.contains(&root) || naming::is_keyword(root) {
            return Err(format!("`{root}` is a reserved name"));
        }
        let ty = expected
            .cloned()
            .ok_or_else(|| format!("cannot infer a type for `{root}`"))?;
        match self.synthesized.get(root) {
            Some(existing) if *existing != ty => Err(format!(
                "`{root}` is used as both {} and {}",
                swift_type(existing),
                swift_type(&ty)
            )),
            Some(_) => Ok(ty),
            None => {
                self.synthesized.insert(root.to_string(), ty.clone());
                Ok(ty)
            }
        }
    }

    /// Follow the path below its root through model properties.
    fn traverse(&self, root: &PropertyType, binding: &DataBinding) -> Result<PropertyType, String> {
        let mut ty = root.clone();
        for segment in binding.segments().skip(1) {
            let PropertyType::Model(name) = &ty else {
                return Err(format!(
                    "cannot read `{segment}` from a value of type {}",
                    swift_type(&ty)
                ));
            };
            let model = self
                .models
                .iter()
                .find(|m| m.name == *name)
                .ok_or_else(|| format!("unknown data model `{name}`"))?;
            let property = model
                .properties
                .iter()
                .find(|p| p.name == segment)
                .ok_or_else(|| format!("data model `{name}` has no property `{segment}`"))?;
            ty = property.ty.clone();
        }
        Ok(ty)
    }

    /// Look up an existing state or parameter path without synthesizing.
    pub fn lookup(&self, path: &str) -> Result<Bound, String> {
        let root = path.split('.').next().unwrap_or_default();
        let binding = |source| DataBinding::new("", source, path);

        let (source, ty) = if let Some(decl) = self.state.get(root) {
            (BindingSource::State, self.traverse(&decl.ty, &binding(BindingSource::State))?)
        } else if let Some(ty) = self.synthesized.get(root).filter(|_| !path.contains('.')) {
            (BindingSource::State, ty.clone())
        } else if let Some(decl) = self.parameters.get(root) {
            (BindingSource::Parameter, self.traverse(&decl.ty, &binding(BindingSource::Parameter))?)
        } else {
            return Err(format!("`{root}` is not state or a parameter of this screen"));
        };
        Ok(Bound {
            source,
            path: path.to_string(),
            ty: Some(ty),
        })
    }

    /// Whether a stored member with this name exists.
    pub fn is_member(&self, name: &str) -> bool {
        self.parameters.contains_key(name)
            || self.state.contains_key(name)
            || self.synthesized.contains_key(name)
            || self.environment.contains(name)
    }

    /// Stored members: parameters, declared state, synthesized state, environment.
    pub fn decls(&self) -> Result<Vec<Decl>, (String, String)> {
        let mut decls = Vec::new();
        for decl in self.parameters.values() {
            decls.push(Decl::Parameter {
                name: decl.name.clone(),
                ty: swift_type(&decl.ty),
                default: default_value(&decl.ty, decl.default.as_ref()).map_err(|e| (decl.name.clone(), e))?,
            });
        }
        for decl in self.state.values() {
            decls.push(Decl::State {
                name: decl.name.clone(),
                ty: swift_type(&decl.ty),
                initial: default_value(&decl.ty, decl.default.as_ref()).map_err(|e| (decl.name.clone(), e))?,
            });
        }
        for (name, ty) in &self.synthesized {
            decls.push(Decl::State {
                name: name.clone(),
                ty: swift_type(ty),
                initial: zero_value(ty),
            });
        }
        for key in &self.environment {
            decls.push(Decl::Environment {
                key: key.clone(),
                name: key.clone(),
            });
        }
        Ok(decls)
    }
}

/// Type a bindable property expects.
pub fn expected_type(kind: &PropKind) -> Option<PropertyType> {
    match kind {
        PropKind::String => Some(PropertyType::String),
        PropKind::Number { .. } => Some(PropertyType::Double),
        PropKind::Integer { .. } => Some(PropertyType::Int),
        PropKind::Bool => Some(PropertyType::Bool),
        PropKind::Strings => Some(PropertyType::Array(Box::new(PropertyType::String))),
        PropKind::Enum(_)
        | PropKind::Token(_)
        | PropKind::Action
        | PropKind::Actions
        | PropKind::Screen
        | PropKind::Tabs => None,
    }
}

/// Literal for a declared default, or the type's zero value when absent.
pub fn default_value(ty: &PropertyType, value: Option<&Value>) -> Result<ValueExpr, String> {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return Ok(zero_value(ty));
    };
    let mismatch = || format!("expected a {} literal, found {value}", swift_type(ty));

    match ty {
        PropertyType::String => value.as_str().map(ValueExpr::str).ok_or_else(mismatch),
        PropertyType::Int => value.as_i64().map(ValueExpr::Int).ok_or_else(mismatch),
        PropertyType::Double => value.as_f64().map(ValueExpr::Number).ok_or_else(mismatch),
        PropertyType::Bool => value.as_bool().map(ValueExpr::Bool).ok_or_else(mismatch),
        PropertyType::Date => match value.as_str() {
            Some("now") => Ok(ValueExpr::member("now")),
            _ => Err("dates only accept \"now\" as a default".to_string()),
        },
        PropertyType::Array(inner) => value
            .as_array()
            .ok_or_else(mismatch)?
            .iter()
            .map(|item| default_value(inner, Some(item)))
            .collect::<Result<Vec<_>, _>>()
            .map(ValueExpr::Array),
        PropertyType::Optional(inner) => default_value(inner, Some(value)),
        PropertyType::Model(_) => Err("model values cannot have a literal default".to_string()),
    }
}

/// Zero value of a type.
pub fn zero_value(ty: &PropertyType) -> ValueExpr {
    match ty {
        PropertyType::String => ValueExpr::str(""),
        PropertyType::Int => ValueExpr::Int(0),
        PropertyType::Double => ValueExpr::Number(0.0),
        PropertyType::Bool => ValueExpr::Bool(false),
        PropertyType::Date => ValueExpr::member("now"),
        PropertyType::Array(_) => ValueExpr::Array(Vec::new()),
        PropertyType::Optional(_) => ValueExpr::Nil,
        PropertyType::Model(_) => ValueExpr::call(&swift_type(ty), Vec::new()),
    }
}
