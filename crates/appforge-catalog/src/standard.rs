//! The standard component palette.

use crate::schema::{BindMode, Category, ChildPolicy, ComponentBuilder, ComponentKind, ComponentMeta, PropKind};
use crate::ComponentSchema;
use appforge_core::{CatalogError, PropValue, Props, RawProps, TokenKind, TokenRef};

const H_ALIGN: &[&str] = &["leading", "center", "trailing"];
const V_ALIGN: &[&str] = &["top", "center", "bottom", "firstTextBaseline", "lastTextBaseline"];
const Z_ALIGN: &[&str] = &[
    "topLeading",
    "top",
    "topTrailing",
    "leading",
    "center",
    "trailing",
    "bottomLeading",
    "bottom",
    "bottomTrailing",
];
const LIST_STYLES: &[&str] = &["automatic", "plain", "inset", "insetGrouped", "grouped", "sidebar"];
const TITLE_MODES: &[&str] = &["automatic", "inline", "large"];
const DETENTS: &[&str] = &["large", "medium", "mediumAndLarge"];
const TOOLBAR_PLACEMENTS: &[&str] = &[
    "automatic",
    "primaryAction",
    "secondaryAction",
    "confirmationAction",
    "cancellationAction",
    "principal",
    "topBarLeading",
    "topBarTrailing",
    "bottomBar",
];
const BUTTON_ROLES: &[&str] = &["none", "cancel", "destructive"];
const BUTTON_STYLES: &[&str] = &["automatic", "bordered", "borderedProminent", "borderless", "plain"];
const PICKER_STYLES: &[&str] = &["automatic", "menu", "segmented", "wheel", "inline"];
const KEYBOARDS: &[&str] = &["default", "emailAddress", "numberPad", "decimalPad", "URL", "phonePad"];
const CONTENT_MODES: &[&str] = &["fit", "fill"];
const AXES: &[&str] = &["vertical", "horizontal"];

fn s(value: &str) -> PropValue {
    PropValue::String(value.to_string())
}

fn e(value: &str) -> PropValue {
    PropValue::Enum(value.to_string())
}

fn token(kind: TokenKind, slot: &str) -> PropValue {
    PropValue::Token(TokenRef::new(kind, slot))
}

fn token_kind(kind: TokenKind) -> PropKind {
    PropKind::Token(kind)
}

/// A component whose validation is entirely described by its metadata table.
#[derive(Debug, Clone)]
pub struct TableSchema {
    meta: ComponentMeta,
}

impl TableSchema {
    pub fn new(meta: ComponentMeta) -> Self {
        Self { meta }
    }
}

impl ComponentSchema for TableSchema {
    fn meta(&self) -> &ComponentMeta {
        &self.meta
    }
}

/// Slider schema: `min` must be below `max` and `step` positive.
#[derive(Debug, Clone)]
pub struct SliderSchema {
    meta: ComponentMeta,
}

impl SliderSchema {
    pub fn new() -> Self {
        Self {
            meta: ComponentBuilder::new("Slider", ComponentKind::Slider, Category::Input)
                .default("value", PropKind::NUMBER, PropValue::Number(0.0))
                .bindable(BindMode::TwoWay)
                .default("min", PropKind::NUMBER, PropValue::Number(0.0))
                .default("max", PropKind::NUMBER, PropValue::Number(1.0))
                .optional("step", PropKind::NUMBER)
                .build(),
        }
    }
}

impl Default for SliderSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentSchema for SliderSchema {
    fn meta(&self) -> &ComponentMeta {
        &self.meta
    }

    fn validate(&self, raw: &RawProps) -> Result<Props, CatalogError> {
        let props = self.meta.validate_props(raw)?;
        let bound = |name: &str| props.get(name).and_then(PropValue::as_f64).unwrap_or_default();
        if bound("min") >= bound("max") {
            return Err(self.meta.invalid("min", "must be less than `max`".to_string()));
        }
        if let Some(step) = props.get("step").and_then(PropValue::as_f64) {
            if step <= 0.0 {
                return Err(self.meta.invalid("step", "must be positive".to_string()));
            }
        }
        Ok(props)
    }
}

/// Stepper schema: `min` must not exceed `max`.
#[derive(Debug, Clone)]
pub struct StepperSchema {
    meta: ComponentMeta,
}

impl StepperSchema {
    pub fn new() -> Self {
        Self {
            meta: ComponentBuilder::new("Stepper", ComponentKind::Stepper, Category::Input)
                .default("label", PropKind::String, s(""))
                .bindable(BindMode::Read)
                .default("value", PropKind::INTEGER, PropValue::Integer(0))
                .bindable(BindMode::TwoWay)
                .default("min", PropKind::INTEGER, PropValue::Integer(0))
                .default("max", PropKind::INTEGER, PropValue::Integer(100))
                .default(
                    "step",
                    PropKind::Integer { min: Some(1), max: None },
                    PropValue::Integer(1),
                )
                .build(),
        }
    }
}

impl Default for StepperSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentSchema for StepperSchema {
    fn meta(&self) -> &ComponentMeta {
        &self.meta
    }

    fn validate(&self, raw: &RawProps) -> Result<Props, CatalogError> {
        let props = self.meta.validate_props(raw)?;
        let bound = |name: &str| props.get(name).and_then(PropValue::as_i64).unwrap_or_default();
        if bound("min") > bound("max") {
            return Err(self.meta.invalid("min", "must not exceed `max`".to_string()));
        }
        Ok(props)
    }
}

fn table(builder: ComponentBuilder) -> Box<dyn ComponentSchema> {
    Box::new(TableSchema::new(builder.build()))
}

/// Every standard component, in palette order.
pub(crate) fn components() -> Vec<Box<dyn ComponentSchema>> {
    use Category::*;
    use ComponentKind as K;

    vec![
        // Layout
        table(
            ComponentBuilder::new("VStack", K::VStack, Layout)
                .display_name("Vertical Stack")
                .default("alignment", PropKind::Enum(H_ALIGN), e("center"))
                .optional("spacing", token_kind(TokenKind::Spacing))
                .children(ChildPolicy::Any),
        ),
        table(
            ComponentBuilder::new("HStack", K::HStack, Layout)
                .display_name("Horizontal Stack")
                .default("alignment", PropKind::Enum(V_ALIGN), e("center"))
                .optional("spacing", token_kind(TokenKind::Spacing))
                .children(ChildPolicy::Any),
        ),
        table(
            ComponentBuilder::new("ZStack", K::ZStack, Layout)
                .display_name("Layered Stack")
                .default("alignment", PropKind::Enum(Z_ALIGN), e("center"))
                .children(ChildPolicy::Any),
        ),
        table(
            ComponentBuilder::new("ScrollView", K::ScrollView, Layout)
                .display_name("Scroll View")
                .default("axis", PropKind::Enum(AXES), e("vertical"))
                .default("showsIndicators", PropKind::Bool, PropValue::Bool(true))
                .children(ChildPolicy::Any),
        ),
        table(
            ComponentBuilder::new("Grid", K::Grid, Layout)
                .default(
                    "columns",
                    PropKind::Integer { min: Some(1), max: Some(12) },
                    PropValue::Integer(2),
                )
                .default("spacing", token_kind(TokenKind::Spacing), token(TokenKind::Spacing, "md"))
                .children(ChildPolicy::Any),
        ),
        table(
            ComponentBuilder::new("List", K::List, Layout)
                .default("style", PropKind::Enum(LIST_STYLES), e("automatic"))
                .children(ChildPolicy::Any),
        ),
        table(
            ComponentBuilder::new("Section", K::Section, Layout)
                .optional("header", PropKind::String)
                .optional("footer", PropKind::String)
                .children(ChildPolicy::Any),
        ),
        table(ComponentBuilder::new("Form", K::Form, Layout).children(ChildPolicy::Any)),
        table(
            ComponentBuilder::new("Spacer", K::Spacer, Layout)
                .optional("minLength", token_kind(TokenKind::Spacing)),
        ),
        table(ComponentBuilder::new("Divider", K::Divider, Layout)),
        table(
            ComponentBuilder::new("Conditional", K::Conditional, Layout)
                .default("condition", PropKind::Bool, PropValue::Bool(false))
                .bindable(BindMode::Read)
                .children(ChildPolicy::Range { min: 1, max: 2 }),
        ),
        // Navigation
        table(
            ComponentBuilder::new("NavigationStack", K::NavigationStack, Navigation)
                .display_name("Navigation Stack")
                .optional("title", PropKind::String)
                .default("titleDisplayMode", PropKind::Enum(TITLE_MODES), e("automatic"))
                .children(ChildPolicy::Any),
        ),
        table(
            ComponentBuilder::new("NavigationLink", K::NavigationLink, Navigation)
                .display_name("Navigation Link")
                .required("target", PropKind::Screen)
                .optional("title", PropKind::String)
                .bindable(BindMode::Read)
                .children(ChildPolicy::Any),
        ),
        table(
            ComponentBuilder::new("TabView", K::TabView, Navigation)
                .display_name("Tab View")
                .required("tabs", PropKind::Tabs),
        ),
        table(
            ComponentBuilder::new("Sheet", K::Sheet, Navigation)
                .default("isPresented", PropKind::Bool, PropValue::Bool(false))
                .bindable(BindMode::TwoWay)
                .default("detents", PropKind::Enum(DETENTS), e("large"))
                .children(ChildPolicy::Any),
        ),
        table(
            ComponentBuilder::new("FullScreenCover", K::FullScreenCover, Navigation)
                .display_name("Full Screen Cover")
                .default("isPresented", PropKind::Bool, PropValue::Bool(false))
                .bindable(BindMode::TwoWay)
                .children(ChildPolicy::Any),
        ),
        table(
            ComponentBuilder::new("Alert", K::Alert, Navigation)
                .required("title", PropKind::String)
                .optional("message", PropKind::String)
                .bindable(BindMode::Read)
                .default("isPresented", PropKind::Bool, PropValue::Bool(false))
                .bindable(BindMode::TwoWay)
                .default("actions", PropKind::Actions, PropValue::Actions(Vec::new())),
        ),
        table(
            ComponentBuilder::new("ConfirmationDialog", K::ConfirmationDialog, Navigation)
                .display_name("Confirmation Dialog")
                .required("title", PropKind::String)
                .optional("message", PropKind::String)
                .bindable(BindMode::Read)
                .default("isPresented", PropKind::Bool, PropValue::Bool(false))
                .bindable(BindMode::TwoWay)
                .default("actions", PropKind::Actions, PropValue::Actions(Vec::new())),
        ),
        table(
            ComponentBuilder::new("Menu", K::Menu, Navigation)
                .required("title", PropKind::String)
                .optional("systemImage", PropKind::String)
                .children(ChildPolicy::Any),
        ),
        table(
            ComponentBuilder::new("Toolbar", K::Toolbar, Navigation)
                .default("placement", PropKind::Enum(TOOLBAR_PLACEMENTS), e("automatic"))
                .children(ChildPolicy::Any),
        ),
        // Primitives and input
        table(
            ComponentBuilder::new("Text", K::Text, Primitives)
                .default("content", PropKind::String, s(""))
                .bindable(BindMode::Read)
                .default("font", token_kind(TokenKind::Font), token(TokenKind::Font, "body"))
                .optional("color", token_kind(TokenKind::Color))
                .optional("alignment", PropKind::Enum(H_ALIGN))
                .optional("lineLimit", PropKind::Integer { min: Some(1), max: Some(100) }),
        ),
        table(
            ComponentBuilder::new("Label", K::Label, DataDisplay)
                .default("title", PropKind::String, s(""))
                .bindable(BindMode::Read)
                .required("systemImage", PropKind::String),
        ),
        table(
            ComponentBuilder::new("Image", K::Image, DataDisplay)
                .default("systemName", PropKind::String, s("photo"))
                .optional("name", PropKind::String)
                .default("resizable", PropKind::Bool, PropValue::Bool(false))
                .optional("contentMode", PropKind::Enum(CONTENT_MODES))
                .optional("color", token_kind(TokenKind::Color)),
        ),
        table(
            ComponentBuilder::new("Button", K::Button, Primitives)
                .optional("title", PropKind::String)
                .bindable(BindMode::Read)
                .optional("systemImage", PropKind::String)
                .default("role", PropKind::Enum(BUTTON_ROLES), e("none"))
                .default("style", PropKind::Enum(BUTTON_STYLES), e("automatic"))
                .optional("action", PropKind::Action)
                .optional("tint", token_kind(TokenKind::Color))
                .children(ChildPolicy::Any),
        ),
        table(
            ComponentBuilder::new("Toggle", K::Toggle, Input)
                .default("label", PropKind::String, s(""))
                .default("isOn", PropKind::Bool, PropValue::Bool(false))
                .bindable(BindMode::TwoWay),
        ),
        table(
            ComponentBuilder::new("Picker", K::Picker, Input)
                .default("label", PropKind::String, s(""))
                .default("selection", PropKind::String, s(""))
                .bindable(BindMode::TwoWay)
                .required("options", PropKind::Strings)
                .default("style", PropKind::Enum(PICKER_STYLES), e("automatic")),
        ),
        Box::new(SliderSchema::new()),
        Box::new(StepperSchema::new()),
        table(
            ComponentBuilder::new("TextField", K::TextField, Input)
                .display_name("Text Field")
                .default("placeholder", PropKind::String, s(""))
                .default("text", PropKind::String, s(""))
                .bindable(BindMode::TwoWay)
                .default("keyboard", PropKind::Enum(KEYBOARDS), e("default")),
        ),
        table(
            ComponentBuilder::new("SecureField", K::SecureField, Input)
                .display_name("Secure Field")
                .default("placeholder", PropKind::String, s(""))
                .default("text", PropKind::String, s(""))
                .bindable(BindMode::TwoWay),
        ),
        // Display, feedback, patterns
        table(
            ComponentBuilder::new("ProgressView", K::ProgressView, Feedback)
                .display_name("Progress")
                .optional("value", PropKind::Number { min: Some(0.0), max: None })
                .bindable(BindMode::Read)
                .default(
                    "total",
                    PropKind::Number { min: Some(f64::MIN_POSITIVE), max: None },
                    PropValue::Number(1.0),
                )
                .optional("label", PropKind::String),
        ),
        table(
            ComponentBuilder::new("Card", K::Card, Patterns)
                .default("padding", token_kind(TokenKind::Spacing), token(TokenKind::Spacing, "md"))
                .default("spacing", token_kind(TokenKind::Spacing), token(TokenKind::Spacing, "sm"))
                .default("background", token_kind(TokenKind::Color), token(TokenKind::Color, "surface"))
                .default("radius", token_kind(TokenKind::Radius), token(TokenKind::Radius, "lg"))
                .default("elevation", token_kind(TokenKind::Shadow), token(TokenKind::Shadow, "sm"))
                .children(ChildPolicy::Any),
        ),
        table(
            ComponentBuilder::new("EmptyState", K::EmptyState, Patterns)
                .display_name("Empty State")
                .required("title", PropKind::String)
                .optional("message", PropKind::String)
                .bindable(BindMode::Read)
                .default("systemImage", PropKind::String, s("tray")),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_tags_are_unique() {
        let all = components();
        let mut tags: Vec<_> = all.iter().map(|c| c.meta().type_tag.clone()).collect();
        let count = tags.len();
        tags.sort();
        tags.dedup();
        assert_eq!(tags.len(), count);
    }

    #[test]
    fn test_bindable_props_on_inputs() {
        let all = components();
        let toggle = all.iter().find(|c| c.meta().type_tag == "Toggle").unwrap();
        assert_eq!(toggle.meta().prop("isOn").unwrap().bind, BindMode::TwoWay);
        assert_eq!(toggle.meta().prop("label").unwrap().bind, BindMode::None);
    }

    #[test]
    fn test_stepper_rejects_inverted_bounds() {
        let raw: RawProps = serde_json::from_value(serde_json::json!({"min": 5, "max": 1})).unwrap();
        assert!(StepperSchema::new().validate(&raw).is_err());
    }
}
