//! Component metadata and property schemas.

use appforge_core::{Action, ActionItem, CatalogError, PropValue, Props, RawProps, TabItem, TokenKind, TokenRef};
use serde_json::Value;

/// Palette category of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Primitives,
    Layout,
    Navigation,
    Input,
    DataDisplay,
    Feedback,
    Patterns,
}

/// The closed set of component kinds the builder knows how to lower.
///
/// Each catalog entry maps its type tag to one of these, so the builder and
/// printer dispatch on an enum rather than on type-tag strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    // Layout
    VStack,
    HStack,
    ZStack,
    ScrollView,
    Grid,
    List,
    Section,
    Form,
    Spacer,
    Divider,
    Conditional,
    // Navigation
    NavigationStack,
    NavigationLink,
    TabView,
    Sheet,
    FullScreenCover,
    Alert,
    ConfirmationDialog,
    Menu,
    Toolbar,
    // Primitives and input
    Text,
    Label,
    Image,
    Button,
    Toggle,
    Picker,
    Slider,
    Stepper,
    TextField,
    SecureField,
    // Display, feedback, patterns
    ProgressView,
    Card,
    EmptyState,
}

impl ComponentKind {
    /// Kinds that attach to their parent as a presentation modifier instead of
    /// appearing in the parent's content.
    pub fn is_presentation(&self) -> bool {
        matches!(
            self,
            Self::Sheet | Self::FullScreenCover | Self::Alert | Self::ConfirmationDialog | Self::Toolbar
        )
    }

    /// Alerts, dialogs and toolbars lower to a single modifier on their parent
    /// and have no view of their own to modify.
    pub fn accepts_modifiers(&self) -> bool {
        !matches!(self, Self::Alert | Self::ConfirmationDialog | Self::Toolbar)
    }
}

/// How a property may be bound to a data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindMode {
    /// Literal only.
    None,
    /// May read from a source.
    Read,
    /// Reads and writes back (requires a settable source).
    TwoWay,
}

/// Expected shape of a property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropKind {
    String,
    Number { min: Option<f64>, max: Option<f64> },
    Integer { min: Option<i64>, max: Option<i64> },
    Bool,
    Enum(&'static [&'static str]),
    Token(TokenKind),
    Action,
    Actions,
    Screen,
    Tabs,
    Strings,
}

impl PropKind {
    pub const NUMBER: PropKind = PropKind::Number { min: None, max: None };
    pub const INTEGER: PropKind = PropKind::Integer { min: None, max: None };

    /// Check a raw value and convert it into a typed property value.
    pub fn coerce(&self, value: &Value) -> Result<PropValue, String> {
        match self {
            Self::String => value
                .as_str()
                .map(|s| PropValue::String(s.to_string()))
                .ok_or_else(|| expected("a string", value)),
            Self::Number { min, max } => {
                let n = value.as_f64().ok_or_else(|| expected("a number", value))?;
                check_range(n, *min, *max)?;
                Ok(PropValue::Number(n))
            }
            Self::Integer { min, max } => {
                let n = value.as_i64().ok_or_else(|| expected("an integer", value))?;
                check_range(n as f64, min.map(|m| m as f64), max.map(|m| m as f64))?;
                Ok(PropValue::Integer(n))
            }
            Self::Bool => value
                .as_bool()
                .map(PropValue::Bool)
                .ok_or_else(|| expected("a boolean", value)),
            Self::Enum(allowed) => {
                let s = value.as_str().ok_or_else(|| expected("a string", value))?;
                if allowed.contains(&s) {
                    Ok(PropValue::Enum(s.to_string()))
                } else {
                    Err(format!("`{s}` is not one of [{}]", allowed.join(", ")))
                }
            }
            Self::Token(kind) => {
                let slot = non_empty_str(value)?;
                if !kind.accepts(slot) {
                    return Err(format!("unknown {kind} token `{slot}`"));
                }
                Ok(PropValue::Token(TokenRef::new(*kind, slot)))
            }
            Self::Action => serde_json::from_value::<Action>(value.clone())
                .map(PropValue::Action)
                .map_err(|e| format!("malformed action: {e}")),
            Self::Actions => serde_json::from_value::<Vec<ActionItem>>(value.clone())
                .map(PropValue::Actions)
                .map_err(|e| format!("malformed action list: {e}")),
            Self::Screen => non_empty_str(value).map(|s| PropValue::Screen(s.to_string())),
            Self::Tabs => {
                let tabs = serde_json::from_value::<Vec<TabItem>>(value.clone())
                    .map_err(|e| format!("malformed tab list: {e}"))?;
                if tabs.is_empty() {
                    return Err("tab list must not be empty".to_string());
                }
                Ok(PropValue::Tabs(tabs))
            }
            Self::Strings => serde_json::from_value::<Vec<String>>(value.clone())
                .map(PropValue::Strings)
                .map_err(|_| expected("a list of strings", value)),
        }
    }
}

fn expected(what: &str, value: &Value) -> String {
    let found = match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    };
    format!("expected {what}, found {found}")
}

fn non_empty_str(value: &Value) -> Result<&str, String> {
    match value.as_str() {
        Some("") => Err("must not be empty".to_string()),
        Some(s) => Ok(s),
        None => Err(expected("a string", value)),
    }
}

fn check_range(n: f64, min: Option<f64>, max: Option<f64>) -> Result<(), String> {
    if let Some(min) = min {
        if n < min {
            return Err(format!("{n} is below the minimum {min}"));
        }
    }
    if let Some(max) = max {
        if n > max {
            return Err(format!("{n} is above the maximum {max}"));
        }
    }
    Ok(())
}

/// Schema of one property.
#[derive(Debug, Clone, PartialEq)]
pub struct PropSchema {
    pub name: &'static str,
    pub kind: PropKind,
    pub required: bool,
    pub default: Option<PropValue>,
    pub bind: BindMode,
}

/// Which children a component accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildPolicy {
    None,
    Any,
    Range { min: usize, max: usize },
}

impl ChildPolicy {
    /// Check a child count, returning a reason on violation.
    pub fn check(&self, count: usize) -> Result<(), String> {
        match *self {
            Self::Any => Ok(()),
            Self::None if count == 0 => Ok(()),
            Self::None => Err(format!("accepts no children, found {count}")),
            Self::Range { min, max } if (min..=max).contains(&count) => Ok(()),
            Self::Range { min, max } => Err(format!("expects {min} to {max} children, found {count}")),
        }
    }
}

/// Metadata and schema for one component type.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentMeta {
    pub type_tag: String,
    pub display_name: String,
    pub category: Category,
    pub kind: ComponentKind,
    pub props: Vec<PropSchema>,
    pub children: ChildPolicy,
}

impl ComponentMeta {
    /// Schema of a named property.
    pub fn prop(&self, name: &str) -> Option<&PropSchema> {
        self.props.iter().find(|p| p.name == name)
    }

    /// Declared defaults, in schema order.
    pub fn defaults(&self) -> Props {
        self.props
            .iter()
            .filter_map(|p| p.default.clone().map(|d| (p.name.to_string(), d)))
            .collect()
    }

    /// Validate raw properties against this schema and fill defaults.
    ///
    /// Unknown keys are reported first (in input order), then schema properties in
    /// declaration order. A JSON `null` counts as absent.
    pub fn validate_props(&self, raw: &RawProps) -> Result<Props, CatalogError> {
        if let Some(unknown) = raw.keys().find(|key| self.prop(key).is_none()) {
            return Err(self.invalid(unknown, "unknown property".to_string()));
        }

        let mut props = Props::new();
        for schema in &self.props {
            match raw.get(schema.name).filter(|v| !v.is_null()) {
                Some(value) => {
                    let typed = schema
                        .kind
                        .coerce(value)
                        .map_err(|reason| self.invalid(schema.name, reason))?;
                    props.insert(schema.name.to_string(), typed);
                }
                None => {
                    if let Some(default) = &schema.default {
                        props.insert(schema.name.to_string(), default.clone());
                    } else if schema.required {
                        return Err(self.invalid(schema.name, "required property is missing".to_string()));
                    }
                }
            }
        }
        Ok(props)
    }

    pub(crate) fn invalid(&self, field: &str, reason: String) -> CatalogError {
        CatalogError::InvalidProps {
            type_tag: self.type_tag.clone(),
            field: field.to_string(),
            reason,
        }
    }
}

/// Builder for component metadata.
pub struct ComponentBuilder {
    meta: ComponentMeta,
}

impl ComponentBuilder {
    /// Create a new builder; the display name defaults to the type tag.
    pub fn new(type_tag: &str, kind: ComponentKind, category: Category) -> Self {
        Self {
            meta: ComponentMeta {
                type_tag: type_tag.to_string(),
                display_name: type_tag.to_string(),
                category,
                kind,
                props: Vec::new(),
                children: ChildPolicy::None,
            },
        }
    }

    pub fn display_name(mut self, name: &str) -> Self {
        self.meta.display_name = name.to_string();
        self
    }

    pub fn children(mut self, policy: ChildPolicy) -> Self {
        self.meta.children = policy;
        self
    }

    /// Add a required property.
    pub fn required(self, name: &'static str, kind: PropKind) -> Self {
        self.push(name, kind, true, None)
    }

    /// Add an optional property without a default.
    pub fn optional(self, name: &'static str, kind: PropKind) -> Self {
        self.push(name, kind, false, None)
    }

    /// Add an optional property with a default value.
    pub fn default(self, name: &'static str, kind: PropKind, value: PropValue) -> Self {
        self.push(name, kind, false, Some(value))
    }

    /// Make the most recently added property bindable.
    pub fn bindable(mut self, mode: BindMode) -> Self {
        if let Some(last) = self.meta.props.last_mut() {
            last.bind = mode;
        }
        self
    }

    fn push(mut self, name: &'static str, kind: PropKind, required: bool, default: Option<PropValue>) -> Self {
        self.meta.props.push(PropSchema {
            name,
            kind,
            required,
            default,
            bind: BindMode::None,
        });
        self
    }

    pub fn build(self) -> ComponentMeta {
        self.meta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text_meta() -> ComponentMeta {
        ComponentBuilder::new("Text", ComponentKind::Text, Category::Primitives)
            .default("content", PropKind::String, PropValue::String(String::new()))
            .bindable(BindMode::Read)
            .optional("lineLimit", PropKind::Integer { min: Some(1), max: Some(10) })
            .build()
    }

    fn raw(value: Value) -> RawProps {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_unknown_property_rejected() {
        let err = text_meta().validate_props(&raw(json!({"colour": "red"}))).unwrap_err();
        assert_eq!(
            err,
            CatalogError::InvalidProps {
                type_tag: "Text".into(),
                field: "colour".into(),
                reason: "unknown property".into(),
            }
        );
    }

    #[test]
    fn test_integer_range_checked() {
        let err = text_meta().validate_props(&raw(json!({"lineLimit": 42}))).unwrap_err();
        assert!(err.to_string().contains("above the maximum"));
    }

    #[test]
    fn test_null_counts_as_absent() {
        let props = text_meta().validate_props(&raw(json!({"content": null}))).unwrap();
        assert_eq!(props.get("content"), Some(&PropValue::String(String::new())));
        assert!(props.get("lineLimit").is_none());
    }

    #[test]
    fn test_enum_coercion() {
        let kind = PropKind::Enum(&["leading", "center"]);
        assert_eq!(kind.coerce(&json!("center")), Ok(PropValue::Enum("center".into())));
        assert!(kind.coerce(&json!("middle")).unwrap_err().contains("not one of"));
        assert!(kind.coerce(&json!(3)).unwrap_err().contains("expected a string"));
    }

    #[test]
    fn test_action_coercion() {
        let value = PropKind::Action
            .coerce(&json!({"type": "presentSheet", "target": "compose"}))
            .unwrap();
        assert_eq!(value, PropValue::Action(Action::PresentSheet { target: "compose".into() }));
        assert!(PropKind::Action.coerce(&json!({"type": "teleport"})).is_err());
    }

    #[test]
    fn test_token_requires_known_slot() {
        assert!(PropKind::Token(TokenKind::Color).coerce(&json!("")).is_err());
        assert_eq!(
            PropKind::Token(TokenKind::Color).coerce(&json!("notASlot")),
            Err("unknown color token `notASlot`".to_string())
        );
        assert!(PropKind::Token(TokenKind::Spacing).coerce(&json!("primary")).is_err());
        assert_eq!(
            PropKind::Token(TokenKind::Color).coerce(&json!("primary")),
            Ok(PropValue::Token(TokenRef::new(TokenKind::Color, "primary")))
        );
    }

    #[test]
    fn test_child_policy() {
        assert!(ChildPolicy::None.check(0).is_ok());
        assert!(ChildPolicy::None.check(1).is_err());
        assert!(ChildPolicy::Range { min: 1, max: 2 }.check(3).is_err());
        assert!(ChildPolicy::Any.check(50).is_ok());
    }
}
