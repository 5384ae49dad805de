//! Per-component lowering and presentation hoisting.

use super::{shape, ScreenBuilder};
use crate::error::BuildError;
use crate::ir::{Arg, Closure, ContainerKind, EdgeKind, LeafKind, ModifierExpr, UiExpr, ValueExpr};
use crate::normalize::NormalizedNode;
use appforge_catalog::ComponentKind as K;
use appforge_core::{ActionItem, ButtonRole, PropValue, TabItem, TokenRef};

fn literal(value: &PropValue) -> Option<ValueExpr> {
    match value {
        PropValue::String(s) => Some(ValueExpr::str(s)),
        PropValue::Number(n) => Some(ValueExpr::Number(*n)),
        PropValue::Integer(i) => Some(ValueExpr::Int(*i)),
        PropValue::Bool(b) => Some(ValueExpr::Bool(*b)),
        PropValue::Strings(items) => Some(ValueExpr::Array(items.iter().map(|s| ValueExpr::str(s)).collect())),
        PropValue::Enum(_)
        | PropValue::Token(_)
        | PropValue::Action(_)
        | PropValue::Actions(_)
        | PropValue::Screen(_)
        | PropValue::Tabs(_) => None,
    }
}

fn token_prop<'n>(node: &'n NormalizedNode, name: &str) -> Option<&'n TokenRef> {
    node.prop(name).and_then(PropValue::as_token)
}

fn str_prop<'n>(node: &'n NormalizedNode, name: &str) -> Option<&'n str> {
    node.prop(name).and_then(PropValue::as_str)
}

/// An enum property, unless it holds the given default.
fn non_default<'n>(node: &'n NormalizedNode, name: &str, default: &str) -> Option<&'n str> {
    str_prop(node, name).filter(|v| *v != default)
}

fn text_leaf(value: ValueExpr) -> UiExpr {
    UiExpr::leaf(LeafKind::Text, vec![Arg::new(value)])
}

/// Several views as one, for closures that take a single view.
fn single_view(mut views: Vec<UiExpr>) -> UiExpr {
    match views.len() {
        0 => UiExpr::leaf(LeafKind::EmptyView, vec![]),
        1 => views.remove(0),
        _ => UiExpr::container(ContainerKind::VStack, vec![], views),
    }
}

fn partition(node: &NormalizedNode) -> (Vec<&NormalizedNode>, Vec<&NormalizedNode>) {
    node.children.iter().partition(|child| child.kind.is_presentation())
}

impl ScreenBuilder<'_> {
    /// Lower the root of a screen. A presentation at the root attaches to an
    /// empty carrier view.
    pub(super) fn root(&mut self, node: &NormalizedNode) -> Result<UiExpr, BuildError> {
        if node.kind.is_presentation() {
            let mut hoisted = Vec::new();
            self.presentation(node, &mut hoisted)?;
            return Ok(UiExpr::leaf(LeafKind::EmptyView, vec![]).modified(hoisted));
        }
        self.lower(node)
    }

    /// Component, then intrinsic modifiers, then user modifiers, then hoisted
    /// presentations.
    fn lower(&mut self, node: &NormalizedNode) -> Result<UiExpr, BuildError> {
        let (presented, content) = partition(node);
        let base = self.component(node, &content)?;
        let user = self.user_modifiers(node)?;
        let mut hoisted = Vec::new();
        for child in presented {
            self.presentation(child, &mut hoisted)?;
        }
        Ok(base.modified(user).modified(hoisted))
    }

    fn content(&mut self, nodes: &[&NormalizedNode]) -> Result<Vec<UiExpr>, BuildError> {
        nodes.iter().map(|node| self.lower(node)).collect()
    }

    fn text(&self, node: &NormalizedNode, name: &str) -> Option<ValueExpr> {
        match self.bound(node, name) {
            Some(bound) => Some(bound.text()),
            None => str_prop(node, name).map(ValueExpr::str),
        }
    }

    fn read(&self, node: &NormalizedNode, name: &str) -> Option<ValueExpr> {
        match self.bound(node, name) {
            Some(bound) => Some(bound.read()),
            None => node.prop(name).and_then(literal),
        }
    }

    /// A binding to the property, or a constant binding of its literal.
    fn write(&self, node: &NormalizedNode, name: &str) -> ValueExpr {
        match self.bound(node, name) {
            Some(bound) => bound.write(),
            None => ValueExpr::Constant(Box::new(
                node.prop(name).and_then(literal).unwrap_or(ValueExpr::Bool(false)),
            )),
        }
    }

    fn component(&mut self, node: &NormalizedNode, children: &[&NormalizedNode]) -> Result<UiExpr, BuildError> {
        let id = node.id.as_str();
        let mut chain = Vec::new();

        let expr = match node.kind {
            K::VStack | K::HStack => {
                let kind = if node.kind == K::VStack {
                    ContainerKind::VStack
                } else {
                    ContainerKind::HStack
                };
                let mut args = Vec::new();
                if let Some(alignment) = non_default(node, "alignment", "center") {
                    args.push(Arg::labeled("alignment", ValueExpr::member(alignment)));
                }
                if let Some(spacing) = token_prop(node, "spacing") {
                    args.push(Arg::labeled("spacing", ValueExpr::Number(self.dimension(id, spacing)?)));
                }
                UiExpr::container(kind, args, self.content(children)?)
            }
            K::ZStack => {
                let args = non_default(node, "alignment", "center")
                    .map(|a| vec![Arg::labeled("alignment", ValueExpr::member(a))])
                    .unwrap_or_default();
                UiExpr::container(ContainerKind::ZStack, args, self.content(children)?)
            }
            K::ScrollView => {
                let horizontal = str_prop(node, "axis") == Some("horizontal");
                let mut args = Vec::new();
                if horizontal {
                    args.push(Arg::new(ValueExpr::member("horizontal")));
                }
                if node.prop("showsIndicators").and_then(PropValue::as_bool) == Some(false) {
                    args.push(Arg::labeled("showsIndicators", ValueExpr::Bool(false)));
                }
                let mut views = self.content(children)?;
                if horizontal && views.len() > 1 {
                    views = vec![UiExpr::container(ContainerKind::HStack, vec![], views)];
                }
                UiExpr::container(ContainerKind::ScrollView, args, views)
            }
            K::Grid => {
                let columns = node.prop("columns").and_then(PropValue::as_i64).unwrap_or(2);
                let spacing = match token_prop(node, "spacing") {
                    Some(token) => self.dimension(id, token)?,
                    None => 0.0,
                };
                let item = ValueExpr::call(
                    "GridItem",
                    vec![
                        Arg::new(ValueExpr::call(".flexible", vec![])),
                        Arg::labeled("spacing", ValueExpr::Number(spacing)),
                    ],
                );
                let columns = ValueExpr::call(
                    "Array",
                    vec![Arg::labeled("repeating", item), Arg::labeled("count", ValueExpr::Int(columns))],
                );
                UiExpr::container(
                    ContainerKind::LazyVGrid,
                    vec![
                        Arg::labeled("columns", columns),
                        Arg::labeled("spacing", ValueExpr::Number(spacing)),
                    ],
                    self.content(children)?,
                )
            }
            K::List => {
                if let Some(style) = non_default(node, "style", "automatic") {
                    chain.push(ModifierExpr::new("listStyle", vec![Arg::new(ValueExpr::member(style))]));
                }
                UiExpr::container(ContainerKind::List, vec![], self.content(children)?)
            }
            K::Section => {
                let mut trailing = Vec::new();
                for label in ["header", "footer"] {
                    if let Some(title) = str_prop(node, label) {
                        trailing.push(Closure::labeled(label, vec![text_leaf(ValueExpr::str(title))]));
                    }
                }
                UiExpr::Container {
                    kind: ContainerKind::Section,
                    args: vec![],
                    children: self.content(children)?,
                    trailing,
                }
            }
            K::Form => UiExpr::container(ContainerKind::Form, vec![], self.content(children)?),
            K::Spacer => match token_prop(node, "minLength") {
                Some(token) => UiExpr::leaf(
                    LeafKind::Spacer,
                    vec![Arg::labeled("minLength", ValueExpr::Number(self.dimension(id, token)?))],
                ),
                None => UiExpr::leaf(LeafKind::Spacer, vec![]),
            },
            K::Divider => UiExpr::leaf(LeafKind::Divider, vec![]),
            K::Conditional => {
                let condition = self.read(node, "condition").unwrap_or(ValueExpr::Bool(false));
                let mut then = self.content(children)?;
                let otherwise = if then.len() > 1 { then.split_off(1) } else { Vec::new() };
                UiExpr::Conditional {
                    condition,
                    then,
                    otherwise,
                }
            }
            K::NavigationStack => {
                let mut views = self.content(children)?;
                let mut title_chain = Vec::new();
                if let Some(title) = self.text(node, "title") {
                    title_chain.push(ModifierExpr::new("navigationTitle", vec![Arg::new(title)]));
                }
                if let Some(mode) = non_default(node, "titleDisplayMode", "automatic") {
                    title_chain.push(ModifierExpr::new(
                        "navigationBarTitleDisplayMode",
                        vec![Arg::new(ValueExpr::member(mode))],
                    ));
                }
                if !title_chain.is_empty() {
                    let inner = match views.len() {
                        1 => views.remove(0),
                        _ => UiExpr::container(ContainerKind::Group, vec![], views),
                    };
                    views = vec![inner.modified(title_chain)];
                }
                UiExpr::container(ContainerKind::NavigationStack, vec![], views)
            }
            K::NavigationLink => {
                let target = str_prop(node, "target").unwrap_or_default();
                let names = self.target(id, target)?;
                self.edge(id, target, EdgeKind::Push);
                let value = Arg::labeled("value", ValueExpr::ident(&format!("Route.{}", names.route_case())));
                let views = self.content(children)?;
                if views.is_empty() {
                    let title = self.text(node, "title").unwrap_or_else(|| ValueExpr::str(&names.title));
                    UiExpr::leaf(LeafKind::NavigationLink, vec![Arg::new(title), value])
                } else {
                    UiExpr::container(ContainerKind::NavigationLink, vec![value], views)
                }
            }
            K::TabView => {
                let items: &[TabItem] = match node.prop("tabs") {
                    Some(PropValue::Tabs(items)) => items.as_slice(),
                    _ => &[],
                };
                let mut views = Vec::with_capacity(items.len());
                for item in items {
                    let names = self.target(id, &item.screen)?;
                    self.edge(id, &item.screen, EdgeKind::Tab);
                    let label = UiExpr::leaf(
                        LeafKind::Label,
                        vec![
                            Arg::new(ValueExpr::str(&item.title)),
                            Arg::labeled("systemImage", ValueExpr::str(&item.icon)),
                        ],
                    );
                    views.push(
                        UiExpr::leaf(LeafKind::Custom(names.view_type.clone()), vec![])
                            .modified(vec![ModifierExpr::new("tabItem", vec![]).with_closure(Closure::new(vec![label]))]),
                    );
                }
                UiExpr::container(ContainerKind::TabView, vec![], views)
            }
            K::Text => {
                let content = self.text(node, "content").unwrap_or_else(|| ValueExpr::str(""));
                if let Some(font) = token_prop(node, "font") {
                    chain.push(ModifierExpr::new("font", vec![Arg::new(self.font(id, font)?)]));
                }
                if let Some(color) = token_prop(node, "color") {
                    chain.push(ModifierExpr::new("foregroundStyle", vec![Arg::new(self.color(id, color)?)]));
                }
                if let Some(alignment) = str_prop(node, "alignment") {
                    chain.push(ModifierExpr::new(
                        "multilineTextAlignment",
                        vec![Arg::new(ValueExpr::member(alignment))],
                    ));
                }
                if let Some(limit) = node.prop("lineLimit").and_then(PropValue::as_i64) {
                    chain.push(ModifierExpr::new("lineLimit", vec![Arg::new(ValueExpr::Int(limit))]));
                }
                text_leaf(content)
            }
            K::Label => UiExpr::leaf(
                LeafKind::Label,
                vec![
                    Arg::new(self.text(node, "title").unwrap_or_else(|| ValueExpr::str(""))),
                    Arg::labeled("systemImage", ValueExpr::str(str_prop(node, "systemImage").unwrap_or_default())),
                ],
            ),
            K::Image => {
                let image = match str_prop(node, "name") {
                    Some(name) => UiExpr::leaf(LeafKind::Image, vec![Arg::new(ValueExpr::str(name))]),
                    None => UiExpr::leaf(
                        LeafKind::Image,
                        vec![Arg::labeled(
                            "systemName",
                            ValueExpr::str(str_prop(node, "systemName").unwrap_or("photo")),
                        )],
                    ),
                };
                if node.prop("resizable").and_then(PropValue::as_bool) == Some(true) {
                    chain.push(ModifierExpr::new("resizable", vec![]));
                }
                if let Some(mode) = str_prop(node, "contentMode") {
                    chain.push(ModifierExpr::new(
                        "aspectRatio",
                        vec![Arg::labeled("contentMode", ValueExpr::member(mode))],
                    ));
                }
                if let Some(color) = token_prop(node, "color") {
                    chain.push(ModifierExpr::new("foregroundStyle", vec![Arg::new(self.color(id, color)?)]));
                }
                image
            }
            K::Button => {
                let stmts = match node.prop("action") {
                    Some(PropValue::Action(action)) => self.action(id, action)?,
                    _ => Vec::new(),
                };
                let role = non_default(node, "role", "none").map(|r| Arg::labeled("role", ValueExpr::member(r)));
                let action = Arg::labeled("action", ValueExpr::Action(stmts));
                let views = self.content(children)?;

                if let Some(style) = non_default(node, "style", "automatic") {
                    chain.push(ModifierExpr::new("buttonStyle", vec![Arg::new(ValueExpr::member(style))]));
                }
                if let Some(tint) = token_prop(node, "tint") {
                    chain.push(ModifierExpr::new("tint", vec![Arg::new(self.color(id, tint)?)]));
                }

                if views.is_empty() {
                    let mut args = vec![Arg::new(self.text(node, "title").unwrap_or_else(|| ValueExpr::str("")))];
                    if let Some(icon) = str_prop(node, "systemImage") {
                        args.push(Arg::labeled("systemImage", ValueExpr::str(icon)));
                    }
                    args.extend(role);
                    args.push(action);
                    UiExpr::leaf(LeafKind::Button, args)
                } else {
                    let mut args: Vec<Arg> = role.into_iter().collect();
                    args.push(action);
                    UiExpr::container(ContainerKind::Button, args, views)
                }
            }
            K::Toggle => UiExpr::leaf(
                LeafKind::Toggle,
                vec![
                    Arg::new(self.text(node, "label").unwrap_or_else(|| ValueExpr::str(""))),
                    Arg::labeled("isOn", self.write(node, "isOn")),
                ],
            ),
            K::Picker => {
                let options: &[String] = match node.prop("options") {
                    Some(PropValue::Strings(options)) => options.as_slice(),
                    _ => &[],
                };
                let views = options
                    .iter()
                    .map(|option| {
                        text_leaf(ValueExpr::str(option))
                            .modified(vec![ModifierExpr::new("tag", vec![Arg::new(ValueExpr::str(option))])])
                    })
                    .collect();
                if let Some(style) = non_default(node, "style", "automatic") {
                    chain.push(ModifierExpr::new("pickerStyle", vec![Arg::new(ValueExpr::member(style))]));
                }
                UiExpr::container(
                    ContainerKind::Picker,
                    vec![
                        Arg::new(self.text(node, "label").unwrap_or_else(|| ValueExpr::str(""))),
                        Arg::labeled("selection", self.write(node, "selection")),
                    ],
                    views,
                )
            }
            K::Slider => {
                let bound = |name: &str| node.prop(name).and_then(PropValue::as_f64).unwrap_or_default();
                let mut args = vec![
                    Arg::labeled("value", self.write(node, "value")),
                    Arg::labeled(
                        "in",
                        ValueExpr::Range(
                            Box::new(ValueExpr::Number(bound("min"))),
                            Box::new(ValueExpr::Number(bound("max"))),
                        ),
                    ),
                ];
                if let Some(step) = node.prop("step").and_then(PropValue::as_f64) {
                    args.push(Arg::labeled("step", ValueExpr::Number(step)));
                }
                UiExpr::leaf(LeafKind::Slider, args)
            }
            K::Stepper => {
                let bound = |name: &str| node.prop(name).and_then(PropValue::as_i64).unwrap_or_default();
                let mut args = vec![
                    Arg::new(self.text(node, "label").unwrap_or_else(|| ValueExpr::str(""))),
                    Arg::labeled("value", self.write(node, "value")),
                    Arg::labeled(
                        "in",
                        ValueExpr::Range(
                            Box::new(ValueExpr::Int(bound("min"))),
                            Box::new(ValueExpr::Int(bound("max"))),
                        ),
                    ),
                ];
                let step = node.prop("step").and_then(PropValue::as_i64).unwrap_or(1);
                if step != 1 {
                    args.push(Arg::labeled("step", ValueExpr::Int(step)));
                }
                UiExpr::leaf(LeafKind::Stepper, args)
            }
            K::TextField | K::SecureField => {
                let kind = if node.kind == K::TextField {
                    LeafKind::TextField
                } else {
                    LeafKind::SecureField
                };
                if let Some(keyboard) = non_default(node, "keyboard", "default") {
                    chain.push(ModifierExpr::new("keyboardType", vec![Arg::new(ValueExpr::member(keyboard))]));
                }
                UiExpr::leaf(
                    kind,
                    vec![
                        Arg::new(self.text(node, "placeholder").unwrap_or_else(|| ValueExpr::str(""))),
                        Arg::labeled("text", self.write(node, "text")),
                    ],
                )
            }
            K::ProgressView => {
                let mut args = Vec::new();
                if let Some(label) = self.text(node, "label") {
                    args.push(Arg::new(label));
                }
                if let Some(value) = self.read(node, "value") {
                    args.push(Arg::labeled("value", value));
                    let total = node.prop("total").and_then(PropValue::as_f64).unwrap_or(1.0);
                    args.push(Arg::labeled("total", ValueExpr::Number(total)));
                }
                UiExpr::leaf(LeafKind::ProgressView, args)
            }
            K::Card => self.card(node, children)?,
            K::EmptyState => {
                let mut args = vec![
                    Arg::new(self.text(node, "title").unwrap_or_else(|| ValueExpr::str(""))),
                    Arg::labeled(
                        "systemImage",
                        ValueExpr::str(str_prop(node, "systemImage").unwrap_or("tray")),
                    ),
                ];
                if let Some(message) = self.text(node, "message") {
                    args.push(Arg::labeled("description", ValueExpr::call("Text", vec![Arg::new(message)])));
                }
                UiExpr::leaf(LeafKind::ContentUnavailableView, args)
            }
            K::Menu => {
                let mut args = vec![Arg::new(self.text(node, "title").unwrap_or_else(|| ValueExpr::str("")))];
                if let Some(icon) = str_prop(node, "systemImage") {
                    args.push(Arg::labeled("systemImage", ValueExpr::str(icon)));
                }
                UiExpr::container(ContainerKind::Menu, args, self.content(children)?)
            }
            // Hoisted onto the parent.
            K::Sheet | K::FullScreenCover | K::Alert | K::ConfirmationDialog | K::Toolbar => {
                UiExpr::leaf(LeafKind::EmptyView, vec![])
            }
        };

        Ok(expr.modified(chain))
    }

    fn card(&mut self, node: &NormalizedNode, children: &[&NormalizedNode]) -> Result<UiExpr, BuildError> {
        let id = node.id.as_str();
        let length = |name: &str| token_prop(node, name).map(|t| self.dimension(id, t)).transpose();
        let padding = length("padding")?.unwrap_or_default();
        let spacing = length("spacing")?.unwrap_or_default();
        let radius = length("radius")?.unwrap_or_default();

        let mut chain = vec![
            ModifierExpr::new("padding", vec![Arg::new(ValueExpr::Number(padding))]),
            ModifierExpr::new(
                "frame",
                vec![
                    Arg::labeled("maxWidth", ValueExpr::member("infinity")),
                    Arg::labeled("alignment", ValueExpr::member("leading")),
                ],
            ),
        ];
        if let Some(background) = token_prop(node, "background") {
            chain.push(ModifierExpr::new(
                "background",
                vec![Arg::new(self.color(id, background)?), Arg::labeled("in", shape(radius))],
            ));
        }
        if let Some(elevation) = token_prop(node, "elevation") {
            chain.push(self.shadow(id, elevation)?);
        }

        let stack = UiExpr::container(
            ContainerKind::VStack,
            vec![
                Arg::labeled("alignment", ValueExpr::member("leading")),
                Arg::labeled("spacing", ValueExpr::Number(spacing)),
            ],
            self.content(children)?,
        );
        Ok(stack.modified(chain))
    }

    /// Append the modifiers a presentation node contributes to its parent.
    /// Presentations nested in a toolbar attach to the same parent.
    fn presentation(&mut self, node: &NormalizedNode, out: &mut Vec<ModifierExpr>) -> Result<(), BuildError> {
        let id = node.id.as_str();
        match node.kind {
            K::Sheet | K::FullScreenCover => {
                let (presented, content) = partition(node);
                let view = single_view(self.content(&content)?);

                let mut chain = Vec::new();
                let detents: &[&str] = match str_prop(node, "detents") {
                    Some("medium") => &["medium"],
                    Some("mediumAndLarge") => &["medium", "large"],
                    _ => &[],
                };
                if !detents.is_empty() {
                    chain.push(ModifierExpr::new(
                        "presentationDetents",
                        vec![Arg::new(ValueExpr::Array(
                            detents.iter().map(|d| ValueExpr::member(d)).collect(),
                        ))],
                    ));
                }
                chain.extend(self.user_modifiers(node)?);
                for child in presented {
                    self.presentation(child, &mut chain)?;
                }

                let name = if node.kind == K::Sheet { "sheet" } else { "fullScreenCover" };
                out.push(
                    ModifierExpr::new(name, vec![Arg::labeled("isPresented", self.write(node, "isPresented"))])
                        .with_closure(Closure::new(vec![view.modified(chain)])),
                );
            }
            K::Alert | K::ConfirmationDialog => {
                self.reject_modifiers(node)?;
                let mut args = vec![
                    Arg::new(ValueExpr::str(str_prop(node, "title").unwrap_or_default())),
                    Arg::labeled("isPresented", self.write(node, "isPresented")),
                ];
                let name = if node.kind == K::Alert {
                    "alert"
                } else {
                    args.push(Arg::labeled("titleVisibility", ValueExpr::member("visible")));
                    "confirmationDialog"
                };

                let items: &[ActionItem] = match node.prop("actions") {
                    Some(PropValue::Actions(items)) => items.as_slice(),
                    _ => &[],
                };
                let mut buttons = Vec::with_capacity(items.len());
                for item in items {
                    buttons.push(self.action_button(id, item)?);
                }

                let mut modifier = ModifierExpr::new(name, args).with_closure(Closure::new(buttons));
                if let Some(message) = self.text(node, "message") {
                    modifier = modifier.with_closure(Closure::labeled("message", vec![text_leaf(message)]));
                }
                out.push(modifier);
            }
            K::Toolbar => {
                self.reject_modifiers(node)?;
                let (presented, content) = partition(node);
                let placement = str_prop(node, "placement").unwrap_or("automatic");
                let group = UiExpr::container(
                    ContainerKind::ToolbarItemGroup,
                    vec![Arg::labeled("placement", ValueExpr::member(placement))],
                    self.content(&content)?,
                );
                out.push(ModifierExpr::new("toolbar", vec![]).with_closure(Closure::new(vec![group])));
                for child in presented {
                    self.presentation(child, out)?;
                }
            }
            K::VStack
            | K::HStack
            | K::ZStack
            | K::ScrollView
            | K::Grid
            | K::List
            | K::Section
            | K::Form
            | K::Spacer
            | K::Divider
            | K::Conditional
            | K::NavigationStack
            | K::NavigationLink
            | K::TabView
            | K::Menu
            | K::Text
            | K::Label
            | K::Image
            | K::Button
            | K::Toggle
            | K::Picker
            | K::Slider
            | K::Stepper
            | K::TextField
            | K::SecureField
            | K::ProgressView
            | K::Card
            | K::EmptyState => {
                return Err(BuildError::NotPresentable {
                    node_id: node.id.clone(),
                    type_tag: node.type_tag.clone(),
                })
            }
        }
        Ok(())
    }

    fn action_button(&mut self, node_id: &str, item: &ActionItem) -> Result<UiExpr, BuildError> {
        let mut args = vec![Arg::new(ValueExpr::str(&item.label))];
        if let Some(role) = item.role {
            let role = match role {
                ButtonRole::Cancel => "cancel",
                ButtonRole::Destructive => "destructive",
            };
            args.push(Arg::labeled("role", ValueExpr::member(role)));
        }
        let stmts = match &item.action {
            Some(action) => self.action(node_id, action)?,
            None => Vec::new(),
        };
        args.push(Arg::labeled("action", ValueExpr::Action(stmts)));
        Ok(UiExpr::leaf(LeafKind::Button, args))
    }

    fn reject_modifiers(&self, node: &NormalizedNode) -> Result<(), BuildError> {
        match node.modifiers.first() {
            Some(modifier) => Err(BuildError::InvalidModifierArgs {
                node_id: node.id.clone(),
                name: modifier.name.clone(),
                reason: format!("`{}` nodes take no modifiers", node.type_tag),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::{build, BuildContext, ScreenBuilder};
    use crate::error::BuildError;
    use crate::config::Limits;
    use crate::naming;
    use crate::normalize::normalize;
    use crate::printer;
    use appforge_catalog::Catalog;
    use appforge_core::{BindingSource, ComponentNode, DataBinding, Modifier, Screen};
    use appforge_tokens::{DesignTokens, TokenInputs};
    use serde_json::json;

    fn render(root: ComponentNode) -> String {
        let screens = vec![
            Screen::new("home", "", root),
            Screen::new("detail", "Detail", ComponentNode::new("d", "Text")),
        ];
        let tokens = DesignTokens::generate("T", "1", &TokenInputs::from_appearance(&Default::default()));
        let index = naming::screen_index(&screens);
        let cx = BuildContext {
            catalog: Catalog::standard(),
            tokens: &tokens,
            screens: &index,
            models: &[],
        };
        let tree = normalize(&screens[0].root, cx.catalog, &Limits::default()).unwrap();
        let built = build(&screens[0], &tree, &cx).unwrap();
        printer::print(&built.body)
    }

    #[test]
    fn test_stack_arguments() {
        let out = render(
            ComponentNode::new("root", "VStack")
                .with_prop("alignment", json!("leading"))
                .with_prop("spacing", json!("md"))
                .with_child(ComponentNode::new("d", "Divider")),
        );
        insta::assert_snapshot!(out, @r###"
        VStack(alignment: .leading, spacing: 16) {
            Divider()
        }
        "###);
    }

    #[test]
    fn test_content_node_is_not_presentable() {
        let screen = Screen::new("home", "", ComponentNode::new("t", "Text"));
        let tokens = DesignTokens::generate("T", "1", &TokenInputs::from_appearance(&Default::default()));
        let index = naming::screen_index(std::slice::from_ref(&screen));
        let cx = BuildContext {
            catalog: Catalog::standard(),
            tokens: &tokens,
            screens: &index,
            models: &[],
        };
        let tree = normalize(&screen.root, cx.catalog, &Limits::default()).unwrap();
        let mut builder = ScreenBuilder::new(&screen, &cx);
        let mut out = Vec::new();
        assert_eq!(
            builder.presentation(&tree.root, &mut out),
            Err(BuildError::NotPresentable {
                node_id: "t".into(),
                type_tag: "Text".into(),
            })
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_slider_keeps_extreme_bounds() {
        let out = render(
            ComponentNode::new("s", "Slider")
                .with_prop("min", json!(0.0001))
                .with_prop("max", json!(1e307))
                .with_prop("step", json!(0.00001)),
        );
        assert!(out.starts_with("Slider(value: .constant(0), in: 0.0001...1e307, step: 0.00001)"), "{out}");
    }

    #[test]
    fn test_intrinsic_then_user_modifiers() {
        let out = render(
            ComponentNode::new("t", "Text")
                .with_prop("content", json!("Hi"))
                .with_prop("color", json!("primary"))
                .with_modifier(Modifier::new("padding", vec![json!("sm")]))
                .with_modifier(Modifier::new("bold", vec![])),
        );
        let font = out.find(".font(").unwrap();
        let color = out.find(".foregroundStyle(").unwrap();
        let padding = out.find(".padding(8)").unwrap();
        let bold = out.find(".bold()").unwrap();
        assert!(font < color && color < padding && padding < bold);
    }

    #[test]
    fn test_sheet_hoisted_onto_parent() {
        let out = render(
            ComponentNode::new("root", "VStack")
                .with_child(ComponentNode::new("t", "Text").with_prop("content", json!("Body")))
                .with_child(
                    ComponentNode::new("s", "Sheet")
                        .with_prop("detents", json!("medium"))
                        .with_binding(DataBinding::new("isPresented", BindingSource::State, "showSheet"))
                        .with_child(ComponentNode::new("st", "Text").with_prop("content", json!("Inside"))),
                ),
        );
        assert!(out.starts_with("VStack {\n    Text(\"Body\")"));
        assert!(out.contains("}\n    .sheet(isPresented: $showSheet) {\n        Text(\"Inside\")"));
        assert!(out.contains(".presentationDetents([.medium])"));
    }

    #[test]
    fn test_alert_with_actions_and_message() {
        let out = render(
            ComponentNode::new("root", "VStack").with_child(
                ComponentNode::new("a", "Alert")
                    .with_prop("title", json!("Delete note?"))
                    .with_prop("message", json!("This cannot be undone."))
                    .with_prop(
                        "actions",
                        json!([
                            {"label": "Delete", "role": "destructive", "action": {"type": "dismiss"}},
                            {"label": "Cancel", "role": "cancel"}
                        ]),
                    ),
            ),
        );
        assert!(out.contains(r#".alert("Delete note?", isPresented: .constant(false)) {"#));
        assert!(out.contains(r#"Button("Delete", role: .destructive, action: { dismiss() })"#));
        assert!(out.contains(r#"Button("Cancel", role: .cancel, action: {})"#));
        assert!(out.contains("} message: {"));
    }

    #[test]
    fn test_navigation_link_and_toolbar() {
        let out = render(
            ComponentNode::new("root", "List")
                .with_child(ComponentNode::new("link", "NavigationLink").with_prop("target", json!("detail")))
                .with_child(
                    ComponentNode::new("tb", "Toolbar").with_child(
                        ComponentNode::new("add", "Button")
                            .with_prop("systemImage", json!("plus"))
                            .with_prop("action", json!({"type": "navigate", "target": "detail"})),
                    ),
                ),
        );
        assert!(out.contains(r#"NavigationLink("Detail", value: Route.detail)"#));
        assert!(out.contains(".toolbar {\n        ToolbarItemGroup(placement: .automatic) {"));
        assert!(out.contains(r#"Button("", systemImage: "plus", action: { router.navigate(to: .detail) })"#));
    }

    #[test]
    fn test_inputs_bind_two_way() {
        let out = render(
            ComponentNode::new("root", "Form")
                .with_child(
                    ComponentNode::new("name", "TextField")
                        .with_prop("placeholder", json!("Name"))
                        .with_binding(DataBinding::new("text", BindingSource::State, "name")),
                )
                .with_child(ComponentNode::new("notify", "Toggle").with_prop("label", json!("Notify")))
                .with_child(
                    ComponentNode::new("count", "Stepper")
                        .with_prop("label", json!("Count"))
                        .with_prop("max", json!(10))
                        .with_binding(DataBinding::new("value", BindingSource::State, "count")),
                ),
        );
        assert!(out.contains(r#"TextField("Name", text: $name)"#));
        assert!(out.contains(r#"Toggle("Notify", isOn: .constant(false))"#));
        assert!(out.contains(r#"Stepper("Count", value: $count, in: 0...10)"#));
    }

    #[test]
    fn test_conditional_branches() {
        let out = render(
            ComponentNode::new("c", "Conditional")
                .with_binding(DataBinding::new("condition", BindingSource::State, "isReady"))
                .with_child(ComponentNode::new("yes", "Text").with_prop("content", json!("Ready")))
                .with_child(ComponentNode::new("no", "ProgressView")),
        );
        assert!(out.starts_with("if isReady {"));
        assert!(out.contains("} else {\n    ProgressView()\n}"));
    }

    #[test]
    fn test_card_pattern() {
        let out = render(ComponentNode::new("card", "Card").with_child(ComponentNode::new("d", "Divider")));
        assert!(out.starts_with("VStack(alignment: .leading, spacing: 8) {"));
        assert!(out.contains(".padding(16)"));
        assert!(out.contains(".background(Color("));
        assert!(out.contains("in: RoundedRectangle(cornerRadius: 12))"));
        assert!(out.contains(".shadow(color: Color("));
    }
}
