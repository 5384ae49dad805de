//! The app definition model: the declarative input of code generation.
//!
//! Everything here is plain data. Raw component properties stay as JSON values
//! until the catalog validates them into [`Props`].

use crate::types::Oklch;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Unvalidated properties as delivered by the generation request.
pub type RawProps = IndexMap<String, serde_json::Value>;

/// Validated, default-filled properties in schema order.
pub type Props = IndexMap<String, PropValue>;

/// One node of a UI tree. A node exclusively owns its children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentNode {
    /// Identifier, unique within one tree.
    pub id: String,
    /// Component type tag, resolved through the catalog.
    #[serde(rename = "type")]
    pub type_tag: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub props: RawProps,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ComponentNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bindings: Vec<DataBinding>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<Modifier>,
}

impl ComponentNode {
    /// Create a new node with no properties or children.
    pub fn new(id: impl Into<String>, type_tag: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            type_tag: type_tag.into(),
            props: IndexMap::new(),
            children: Vec::new(),
            bindings: Vec::new(),
            modifiers: Vec::new(),
        }
    }

    /// Add a raw property.
    pub fn with_prop(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.props.insert(key.into(), value);
        self
    }

    /// Add a child node.
    pub fn with_child(mut self, child: ComponentNode) -> Self {
        self.children.push(child);
        self
    }

    /// Add a data binding.
    pub fn with_binding(mut self, binding: DataBinding) -> Self {
        self.bindings.push(binding);
        self
    }

    /// Append a modifier to the chain.
    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    /// Count of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(ComponentNode::node_count).sum::<usize>()
    }
}

/// Where a bound value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingSource {
    /// View-local state.
    State,
    /// A value from the framework environment.
    Environment,
    /// An input passed to the screen by its presenter.
    Parameter,
}

impl std::fmt::Display for BindingSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::State => write!(f, "state"),
            Self::Environment => write!(f, "environment"),
            Self::Parameter => write!(f, "parameter"),
        }
    }
}

/// Binds one property of a node to a path in a data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataBinding {
    pub property: String,
    pub source: BindingSource,
    /// Dot-separated path into the source, e.g. `profile.name`.
    pub path: String,
}

impl DataBinding {
    pub fn new(property: impl Into<String>, source: BindingSource, path: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            source,
            path: path.into(),
        }
    }

    /// Path segments, in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('.')
    }

    /// First path segment.
    pub fn root(&self) -> &str {
        self.path.split('.').next().unwrap_or_default()
    }
}

/// A named, order-sensitive transformation applied to a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modifier {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<serde_json::Value>,
}

impl Modifier {
    pub fn new(name: impl Into<String>, args: Vec<serde_json::Value>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

/// What an interactive node does when triggered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    /// Push a screen onto the navigation stack.
    Navigate { target: String },
    /// Present a screen modally as a sheet.
    PresentSheet { target: String },
    /// Dismiss the current presentation.
    Dismiss,
    /// Invoke a named handler on the screen.
    Custom {
        name: String,
        #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
        params: IndexMap<String, serde_json::Value>,
    },
}

impl Action {
    /// Target screen id, if this action refers to a screen.
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Navigate { target } | Self::PresentSheet { target } => Some(target.as_str()),
            Self::Dismiss | Self::Custom { .. } => None,
        }
    }
}

/// Role of a button inside an alert or confirmation dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonRole {
    Cancel,
    Destructive,
}

/// A labelled action, as listed by alerts and confirmation dialogs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionItem {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<ButtonRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
}

/// One tab of a tab bar or tab view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabItem {
    /// Target screen id.
    pub screen: String,
    pub title: String,
    /// SF Symbol name.
    pub icon: String,
}

/// The app-level tab bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabBar {
    pub items: Vec<TabItem>,
}

/// Category of design token a property or modifier argument refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenKind {
    Color,
    Spacing,
    Font,
    Radius,
    Shadow,
    Motion,
    LineHeight,
    LetterSpacing,
    BorderWidth,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Color => "color",
            Self::Spacing => "spacing",
            Self::Font => "font",
            Self::Radius => "radius",
            Self::Shadow => "shadow",
            Self::Motion => "motion",
            Self::LineHeight => "line height",
            Self::LetterSpacing => "letter spacing",
            Self::BorderWidth => "border width",
        };
        write!(f, "{name}")
    }
}

/// Color slots of every palette.
pub const COLOR_SLOTS: &[&str] = &[
    "primary",
    "onPrimary",
    "secondary",
    "accent",
    "background",
    "surface",
    "surfaceVariant",
    "border",
    "textPrimary",
    "textSecondary",
    "textDisabled",
    "success",
    "warning",
    "error",
    "info",
];

/// Interaction suffixes a color slot accepts, as in `primary.hover`.
pub const COLOR_ROLES: &[&str] = &["hover", "pressed", "disabled"];

/// Named text styles followed by the steps of the type ladder.
pub const FONT_SLOTS: &[&str] = &[
    "largeTitle",
    "title",
    "title2",
    "title3",
    "headline",
    "body",
    "callout",
    "subheadline",
    "footnote",
    "caption",
    "xs",
    "sm",
    "base",
    "lg",
    "xl",
    "2xl",
    "3xl",
    "4xl",
];

pub const MOTION_DURATIONS: &[&str] = &["instant", "fast", "normal", "slow", "slower"];
pub const MOTION_EASINGS: &[&str] = &["standard", "decelerate", "accelerate", "linear"];
pub const MOTION_SPRINGS: &[&str] = &["snappy", "smooth", "bouncy"];

const MOTION_SLOTS: &[&str] = &[
    "instant",
    "fast",
    "normal",
    "slow",
    "slower",
    "standard",
    "decelerate",
    "accelerate",
    "linear",
];

impl TokenKind {
    /// Plain slot names every generated token set defines for this kind.
    ///
    /// Motion lists bare durations and easings; the composed forms are only
    /// recognized by [`TokenKind::accepts`].
    pub fn slots(&self) -> &'static [&'static str] {
        match self {
            Self::Color => COLOR_SLOTS,
            Self::Spacing => &["none", "xs", "sm", "md", "lg", "xl", "xxl"],
            Self::Font => FONT_SLOTS,
            Self::Radius => &["none", "sm", "md", "lg", "xl", "full"],
            Self::Shadow => &["xs", "sm", "md", "lg", "xl"],
            Self::Motion => MOTION_SLOTS,
            Self::LineHeight => &["tight", "normal", "relaxed"],
            Self::LetterSpacing => &["tight", "normal", "wide"],
            Self::BorderWidth => &["hairline", "thin", "medium", "thick"],
        }
    }

    /// Whether `slot` names a token of this kind.
    ///
    /// Besides the plain slots, colors take a role suffix (`primary.pressed`)
    /// and motion takes `spring.<spring>` or `<easing>.<duration>`.
    pub fn accepts(&self, slot: &str) -> bool {
        if self.slots().contains(&slot) {
            return true;
        }
        match (self, slot.split_once('.')) {
            (Self::Color, Some((base, role))) => COLOR_SLOTS.contains(&base) && COLOR_ROLES.contains(&role),
            (Self::Motion, Some(("spring", spring))) => MOTION_SPRINGS.contains(&spring),
            (Self::Motion, Some((easing, duration))) => {
                MOTION_EASINGS.contains(&easing) && MOTION_DURATIONS.contains(&duration)
            }
            _ => false,
        }
    }
}

/// A reference to a named token slot, resolved at build time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenRef {
    pub kind: TokenKind,
    pub slot: String,
}

impl TokenRef {
    pub fn new(kind: TokenKind, slot: impl Into<String>) -> Self {
        Self {
            kind,
            slot: slot.into(),
        }
    }
}

/// A validated property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum PropValue {
    String(String),
    Number(f64),
    Integer(i64),
    Bool(bool),
    Enum(String),
    Token(TokenRef),
    Action(Action),
    Actions(Vec<ActionItem>),
    Screen(String),
    Tabs(Vec<TabItem>),
    Strings(Vec<String>),
}

impl PropValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Enum(s) | Self::Screen(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_token(&self) -> Option<&TokenRef> {
        match self {
            Self::Token(t) => Some(t),
            _ => None,
        }
    }
}

/// A screen of the app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Screen {
    pub id: String,
    /// Display name, used as the navigation title.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deep_link: Option<String>,
    /// Inputs the screen accepts, each with a default.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<VariableDecl>,
    /// Explicitly declared view-local state.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub state: Vec<VariableDecl>,
    pub root: ComponentNode,
}

impl Screen {
    pub fn new(id: impl Into<String>, name: impl Into<String>, root: ComponentNode) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            deep_link: None,
            parameters: Vec::new(),
            state: Vec::new(),
            root,
        }
    }
}

/// A typed variable declaration (screen parameter or state).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: PropertyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

/// Type of a model property or variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyType {
    String,
    Int,
    Double,
    Bool,
    Date,
    Array(Box<PropertyType>),
    Optional(Box<PropertyType>),
    Model(String),
}

impl PropertyType {
    /// Name of the data model this type refers to, if any.
    pub fn referenced_model(&self) -> Option<&str> {
        match self {
            Self::Model(name) => Some(name.as_str()),
            Self::Array(inner) | Self::Optional(inner) => inner.referenced_model(),
            Self::String | Self::Int | Self::Double | Self::Bool | Self::Date => None,
        }
    }
}

/// One stored property of a data model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelProperty {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: PropertyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    #[serde(default = "default_true")]
    pub persisted: bool,
}

/// A data model, emitted as its own file when persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataModel {
    pub name: String,
    pub properties: Vec<ModelProperty>,
    #[serde(default)]
    pub persisted: bool,
}

/// Device classes the app supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Phone,
    Tablet,
    Desktop,
    Vision,
}

/// Platform constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Platform {
    #[serde(default = "default_minimum_os")]
    pub minimum_os_version: String,
    #[serde(default = "default_devices")]
    pub devices: Vec<DeviceClass>,
}

impl Default for Platform {
    fn default() -> Self {
        Self {
            minimum_os_version: default_minimum_os(),
            devices: default_devices(),
        }
    }
}

/// Shadow alpha multiplier preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadowIntensity {
    Subtle,
    #[default]
    Normal,
    Strong,
}

impl ShadowIntensity {
    pub fn multiplier(&self) -> f64 {
        match self {
            Self::Subtle => 0.5,
            Self::Normal => 1.0,
            Self::Strong => 1.5,
        }
    }
}

/// Appearance inputs from which design tokens are derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appearance {
    pub primary_color: Oklch,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<Oklch>,
    /// Generate the dark palette instead of the light one.
    #[serde(default)]
    pub dark_theme: bool,
    #[serde(default = "default_true")]
    pub supports_dark_mode: bool,
    #[serde(default = "default_base_unit")]
    pub base_unit: f64,
    #[serde(default = "default_base_font_size")]
    pub base_font_size: f64,
    #[serde(default)]
    pub shadow_intensity: ShadowIntensity,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            primary_color: Oklch::new(0.623, 0.188, 259.8),
            accent_color: None,
            dark_theme: false,
            supports_dark_mode: true,
            base_unit: default_base_unit(),
            base_font_size: default_base_font_size(),
            shadow_intensity: ShadowIntensity::Normal,
        }
    }
}

/// App identity, platform and appearance configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub name: String,
    pub bundle_id: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub platform: Platform,
    #[serde(default)]
    pub appearance: Appearance,
    #[serde(default)]
    pub uses_persistence: bool,
    #[serde(default)]
    pub uses_cloud_sync: bool,
}

impl AppConfig {
    pub fn new(name: impl Into<String>, bundle_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bundle_id: bundle_id.into(),
            version: default_version(),
            platform: Platform::default(),
            appearance: Appearance::default(),
            uses_persistence: false,
            uses_cloud_sync: false,
        }
    }
}

/// The unit of generation: one complete app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppDefinition {
    pub config: AppConfig,
    pub screens: Vec<Screen>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub models: Vec<DataModel>,
    pub entry_screen: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_bar: Option<TabBar>,
}

impl AppDefinition {
    /// Look up a screen by id.
    pub fn screen(&self, id: &str) -> Option<&Screen> {
        self.screens.iter().find(|s| s.id == id)
    }

    /// Look up a data model by name.
    pub fn model(&self, name: &str) -> Option<&DataModel> {
        self.models.iter().find(|m| m.name == name)
    }

    /// Whether any data model is persisted.
    pub fn has_persisted_models(&self) -> bool {
        self.models.iter().any(|m| m.persisted)
    }
}

fn default_true() -> bool {
    true
}

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_minimum_os() -> String {
    "17.0".to_string()
}

fn default_devices() -> Vec<DeviceClass> {
    vec![DeviceClass::Phone]
}

fn default_base_unit() -> f64 {
    4.0
}

fn default_base_font_size() -> f64 {
    16.0
}
