//! Intermediate representation of generated SwiftUI source.
//!
//! Every shape the builder can produce is a variant here, and the printer
//! matches all of them without a fallback arm.

use appforge_core::{PropertyType, Rgba};

/// A view expression.
#[derive(Debug, Clone, PartialEq)]
pub enum UiExpr {
    /// A view with a content closure: `VStack(spacing: 8) { ... }`.
    Container {
        kind: ContainerKind,
        args: Vec<Arg>,
        children: Vec<UiExpr>,
        /// Extra labelled closures after the content, e.g. `header:`.
        trailing: Vec<Closure>,
    },
    /// A view constructed from arguments alone: `Text("Hi")`.
    Leaf { kind: LeafKind, args: Vec<Arg> },
    /// A view followed by a modifier chain, one modifier per line.
    Modified { inner: Box<UiExpr>, chain: Vec<ModifierExpr> },
    /// `if cond { ... } else { ... }`.
    Conditional {
        condition: ValueExpr,
        then: Vec<UiExpr>,
        otherwise: Vec<UiExpr>,
    },
}

impl UiExpr {
    pub fn leaf(kind: LeafKind, args: Vec<Arg>) -> Self {
        Self::Leaf { kind, args }
    }

    pub fn container(kind: ContainerKind, args: Vec<Arg>, children: Vec<UiExpr>) -> Self {
        Self::Container {
            kind,
            args,
            children,
            trailing: Vec::new(),
        }
    }

    /// Append modifiers, flattening into an existing chain.
    pub fn modified(self, modifiers: Vec<ModifierExpr>) -> Self {
        if modifiers.is_empty() {
            return self;
        }
        match self {
            Self::Modified { inner, mut chain } => {
                chain.extend(modifiers);
                Self::Modified { inner, chain }
            }
            other => Self::Modified {
                inner: Box::new(other),
                chain: modifiers,
            },
        }
    }
}

/// Views that take a content closure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    VStack,
    HStack,
    ZStack,
    ScrollView,
    LazyVGrid,
    List,
    Section,
    Form,
    Group,
    NavigationStack,
    NavigationLink,
    Menu,
    Button,
    Picker,
    ToolbarItemGroup,
    TabView,
}

impl ContainerKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::VStack => "VStack",
            Self::HStack => "HStack",
            Self::ZStack => "ZStack",
            Self::ScrollView => "ScrollView",
            Self::LazyVGrid => "LazyVGrid",
            Self::List => "List",
            Self::Section => "Section",
            Self::Form => "Form",
            Self::Group => "Group",
            Self::NavigationStack => "NavigationStack",
            Self::NavigationLink => "NavigationLink",
            Self::Menu => "Menu",
            Self::Button => "Button",
            Self::Picker => "Picker",
            Self::ToolbarItemGroup => "ToolbarItemGroup",
            Self::TabView => "TabView",
        }
    }
}

/// Views constructed from arguments only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeafKind {
    Text,
    Label,
    Image,
    Button,
    NavigationLink,
    Toggle,
    Slider,
    Stepper,
    TextField,
    SecureField,
    ProgressView,
    Spacer,
    Divider,
    EmptyView,
    ContentUnavailableView,
    /// Another generated view or a view-building function, e.g. `DetailView()`.
    Custom(String),
}

impl LeafKind {
    pub fn name(&self) -> &str {
        match self {
            Self::Text => "Text",
            Self::Label => "Label",
            Self::Image => "Image",
            Self::Button => "Button",
            Self::NavigationLink => "NavigationLink",
            Self::Toggle => "Toggle",
            Self::Slider => "Slider",
            Self::Stepper => "Stepper",
            Self::TextField => "TextField",
            Self::SecureField => "SecureField",
            Self::ProgressView => "ProgressView",
            Self::Spacer => "Spacer",
            Self::Divider => "Divider",
            Self::EmptyView => "EmptyView",
            Self::ContentUnavailableView => "ContentUnavailableView",
            Self::Custom(name) => name,
        }
    }
}

/// A call argument, optionally labelled.
#[derive(Debug, Clone, PartialEq)]
pub struct Arg {
    pub label: Option<String>,
    pub value: ValueExpr,
}

impl Arg {
    pub fn new(value: ValueExpr) -> Self {
        Self { label: None, value }
    }

    pub fn labeled(label: &str, value: ValueExpr) -> Self {
        Self {
            label: Some(label.to_string()),
            value,
        }
    }
}

/// One chained modifier: `.padding(16)` or `.sheet(isPresented: $x) { ... }`.
#[derive(Debug, Clone, PartialEq)]
pub struct ModifierExpr {
    pub name: String,
    pub args: Vec<Arg>,
    pub trailing: Vec<Closure>,
}

impl ModifierExpr {
    pub fn new(name: &str, args: Vec<Arg>) -> Self {
        Self {
            name: name.to_string(),
            args,
            trailing: Vec::new(),
        }
    }

    pub fn with_closure(mut self, closure: Closure) -> Self {
        self.trailing.push(closure);
        self
    }
}

/// A view-builder closure.
#[derive(Debug, Clone, PartialEq)]
pub struct Closure {
    /// Label when not the first trailing closure, e.g. `message`.
    pub label: Option<String>,
    /// Closure parameters, e.g. `route` in `{ route in ... }`.
    pub params: Vec<String>,
    pub body: Vec<UiExpr>,
}

impl Closure {
    pub fn new(body: Vec<UiExpr>) -> Self {
        Self {
            label: None,
            params: Vec::new(),
            body,
        }
    }

    pub fn labeled(label: &str, body: Vec<UiExpr>) -> Self {
        Self {
            label: Some(label.to_string()),
            params: Vec::new(),
            body,
        }
    }

    pub fn with_param(mut self, param: &str) -> Self {
        self.params.push(param.to_string());
        self
    }
}

/// A value expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueExpr {
    /// A string literal.
    Str(String),
    /// A string literal interpolating one expression: `"\(title)"`.
    Interpolation(String),
    Int(i64),
    Number(f64),
    Bool(bool),
    /// An implicit member such as `.leading`.
    Member(String),
    /// A plain identifier or property path.
    Ident(String),
    /// A two-way binding projection: `$title`.
    Binding(String),
    /// `.constant(value)`.
    Constant(Box<ValueExpr>),
    /// `Color(red:green:blue:opacity:)`.
    Color(Rgba),
    /// `.system(size:weight:design:)`.
    Font { size: f64, weight: String, design: String },
    /// `callee(args)`.
    Call { callee: String, args: Vec<Arg> },
    /// `receiver.name(args)`.
    Method {
        receiver: Box<ValueExpr>,
        name: String,
        args: Vec<Arg>,
    },
    /// `[a, b]`.
    Array(Vec<ValueExpr>),
    /// `lo...hi`.
    Range(Box<ValueExpr>, Box<ValueExpr>),
    /// An inline action closure: `{ dismiss() }`.
    Action(Vec<Stmt>),
    Nil,
}

impl ValueExpr {
    pub fn str(value: &str) -> Self {
        Self::Str(value.to_string())
    }

    pub fn member(name: &str) -> Self {
        Self::Member(name.to_string())
    }

    pub fn ident(name: &str) -> Self {
        Self::Ident(name.to_string())
    }

    pub fn call(callee: &str, args: Vec<Arg>) -> Self {
        Self::Call {
            callee: callee.to_string(),
            args,
        }
    }

    pub fn method(self, name: &str, args: Vec<Arg>) -> Self {
        Self::Method {
            receiver: Box::new(self),
            name: name.to_string(),
            args,
        }
    }
}

/// A statement inside an action closure.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `router.navigate(to: .case)`.
    Navigate { route: String },
    /// `flag = true`.
    Present { flag: String },
    /// `dismiss()`.
    Dismiss,
    /// `name(args)`.
    Invoke { name: String, args: Vec<Arg> },
}

/// A stored member of a view struct.
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    /// `@State private var name: Ty = initial`.
    State { name: String, ty: String, initial: ValueExpr },
    /// `@Environment(\.key) private var name`.
    Environment { key: String, name: String },
    /// `@EnvironmentObject private var router: Router`.
    Router,
    /// `var name: Ty = default`.
    Parameter { name: String, ty: String, default: ValueExpr },
}

/// A helper method on a view struct.
#[derive(Debug, Clone, PartialEq)]
pub enum Helper {
    /// A custom action handler stub.
    Handler { name: String, params: Vec<(String, String)> },
}

/// How one screen reaches another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    Push,
    Sheet,
    Tab,
}

/// A navigation edge recorded while building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEdge {
    pub from: String,
    pub to: String,
    pub node_id: String,
    pub kind: EdgeKind,
}

/// The IR of one screen view.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltScreen {
    pub screen_id: String,
    pub view_type: String,
    pub decls: Vec<Decl>,
    pub body: UiExpr,
    pub helpers: Vec<Helper>,
    pub edges: Vec<NavEdge>,
    pub uses_router: bool,
}

/// One stored property of a generated model type.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDecl {
    pub name: String,
    pub ty: String,
    pub default: ValueExpr,
    /// Excluded from persistence (`@Transient`).
    pub transient: bool,
}

/// The IR of a data model type.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDecl {
    pub type_name: String,
    pub persisted: bool,
    pub properties: Vec<PropertyDecl>,
}

/// One case of the generated `Route` enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDecl {
    /// Case name as written in source.
    pub case: String,
    pub view_type: String,
    pub deep_link: Option<String>,
}

/// How the persistent store is wired into the scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreDecl {
    None,
    Local(Vec<String>),
    CloudSynced(Vec<String>),
}

/// The IR of the app entry file.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryIr {
    pub app_type: String,
    pub routes: Vec<RouteDecl>,
    /// Body of `RootView`.
    pub root: UiExpr,
    /// Route case of the entry screen.
    pub root_case: String,
    /// Route cases of the tabs, in tab order. Empty without a tab bar.
    pub tabs: Vec<String>,
    /// Modifiers applied to `RootView()` inside the window group.
    pub scene_modifiers: Vec<ModifierExpr>,
    pub store: StoreDecl,
    /// Non-persisted models, emitted as value types in this file.
    pub value_models: Vec<ModelDecl>,
}

impl EntryIr {
    pub fn has_deep_links(&self) -> bool {
        self.routes.iter().any(|r| r.deep_link.is_some())
    }

    /// Tab selected on launch.
    pub fn initial_tab(&self) -> Option<&str> {
        self.tabs.first().map(String::as_str)
    }
}

/// Swift spelling of a property type.
pub fn swift_type(ty: &PropertyType) -> String {
    match ty {
        PropertyType::String => "String".to_string(),
        PropertyType::Int => "Int".to_string(),
        PropertyType::Double => "Double".to_string(),
        PropertyType::Bool => "Bool".to_string(),
        PropertyType::Date => "Date".to_string(),
        PropertyType::Array(inner) => format!("[{}]", swift_type(inner)),
        PropertyType::Optional(inner) => format!("{}?", swift_type(inner)),
        PropertyType::Model(name) => crate::naming::type_name(name).unwrap_or_else(|| name.clone()),
    }
}
