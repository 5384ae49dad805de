//! The top-level pipeline: one app definition in, an ordered file set out.

use crate::builder::{self, BuildContext};
use crate::config::GeneratorConfig;
use crate::error::{CodegenError, Result};
use crate::ir::BuiltScreen;
use crate::naming::{self, ScreenIndex};
use crate::normalize::{normalize, NormalizedTree};
use crate::printer::{self, GeneratedFile};
use crate::references::check_references;
use appforge_catalog::Catalog;
use appforge_core::{AppConfig, AppDefinition, DataModel, Oklch};
use appforge_tokens::{DesignTokens, TokenInputs};
use indexmap::IndexSet;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::VecDeque;
use tracing::{debug, info, instrument, warn};

/// Everything one generation run produces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CodegenResult {
    /// Screens in definition order, then persisted models, then the entry file.
    pub files: Vec<GeneratedFile>,
    /// Non-fatal findings, in a stable order.
    pub warnings: Vec<String>,
}

impl CodegenResult {
    /// Look up a file by its relative path.
    pub fn file(&self, path: &str) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.path == path)
    }
}

/// Generate an app with the standard catalog and default configuration.
pub fn generate(app: &AppDefinition) -> Result<CodegenResult> {
    generate_with(app, Catalog::standard(), &GeneratorConfig::default())
}

/// Generate an app.
///
/// Fails without producing any file when the configuration is unusable, a
/// screen tree does not match the catalog, or any cross-reference dangles. All
/// dangling references are reported together.
#[instrument(skip_all, fields(app = %app.config.name, screens = app.screens.len()))]
pub fn generate_with(app: &AppDefinition, catalog: &Catalog, config: &GeneratorConfig) -> Result<CodegenResult> {
    config.validate()?;
    validate_app_config(&app.config)?;

    let tokens = DesignTokens::generate(
        &app.config.name,
        &app.config.version,
        &TokenInputs::from_appearance(&app.config.appearance),
    );

    let models = app
        .models
        .iter()
        .map(|model| {
            builder::build_model(model, &app.models).map_err(|reason| CodegenError::InvalidModel {
                model: model.name.clone(),
                reason,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let trees = app
        .screens
        .iter()
        .map(|screen| {
            normalize(&screen.root, catalog, &config.limits).map_err(|source| CodegenError::Normalize {
                screen: screen.id.clone(),
                source,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    check_references(app, &trees, catalog)?;

    let index = naming::screen_index(&app.screens);
    let cx = BuildContext {
        catalog,
        tokens: &tokens,
        screens: &index,
        models: &app.models,
    };

    let built = app
        .screens
        .par_iter()
        .zip(trees.par_iter())
        .map(|(screen, tree)| {
            let built = builder::build(screen, tree, &cx).map_err(|source| CodegenError::Build {
                screen: screen.id.clone(),
                source,
            })?;
            debug!(screen = %screen.id, nodes = tree.node_count, "built screen");
            let content = printer::print_screen(&built, config.indent_width, config.emit_previews);
            Ok((built, content))
        })
        .collect::<Result<Vec<_>>>()?;

    let folder = naming::app_folder(&app.config.name);
    let mut files = Vec::with_capacity(built.len() + models.len() + 1);
    for (screen, content) in &built {
        files.push(GeneratedFile {
            path: printer::screen_path(&folder, &screen.view_type),
            content: content.clone(),
        });
    }

    let referenced = referenced_models(app);
    let mut value_models = Vec::new();
    for (model, decl) in app.models.iter().zip(models) {
        if model.persisted {
            files.push(GeneratedFile {
                path: printer::model_path(&folder, &decl.type_name),
                content: printer::print_model(&decl, config.indent_width),
            });
        } else if referenced.contains(model.name.as_str()) {
            value_models.push(decl);
        }
    }

    let entry = builder::build_entry(app, &tokens, &index, value_models).map_err(|source| CodegenError::Build {
        screen: app.entry_screen.clone(),
        source,
    })?;
    files.push(GeneratedFile {
        path: printer::entry_path(&folder, &entry.app_type),
        content: printer::print_entry(&entry, config.indent_width),
    });

    let warnings = collect_warnings(app, &trees, &built, &index, &referenced, &tokens, config);
    for warning in &warnings {
        warn!("{warning}");
    }
    info!(files = files.len(), warnings = warnings.len(), "generated app");

    Ok(CodegenResult { files, warnings })
}

/// Reject app configuration the emitted project could not carry.
fn validate_app_config(config: &AppConfig) -> Result<()> {
    let invalid = |reason: String| Err(CodegenError::InvalidConfig(reason));

    if naming::type_name(&config.name).is_none() {
        return invalid(format!("app name `{}` has no usable characters", config.name));
    }
    if !naming::is_bundle_id(&config.bundle_id) {
        return invalid(format!("`{}` is not a reverse-DNS bundle identifier", config.bundle_id));
    }
    if !naming::is_version(&config.version) {
        return invalid(format!("`{}` is not a semantic version", config.version));
    }
    if !naming::is_os_version(&config.platform.minimum_os_version) {
        return invalid(format!(
            "`{}` is not an OS version",
            config.platform.minimum_os_version
        ));
    }
    if config.platform.devices.is_empty() {
        return invalid("at least one device class is required".to_string());
    }

    let appearance = &config.appearance;
    check_color("primaryColor", &appearance.primary_color)?;
    if let Some(accent) = &appearance.accent_color {
        check_color("accentColor", accent)?;
    }
    for (name, value) in [
        ("baseUnit", appearance.base_unit),
        ("baseFontSize", appearance.base_font_size),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return invalid(format!("`{name}` must be a positive number, got {value}"));
        }
    }
    Ok(())
}

fn check_color(name: &str, color: &Oklch) -> Result<()> {
    let finite = [color.l, color.c, color.h, color.alpha].iter().all(|v| v.is_finite());
    if !finite || !(0.0..=1.0).contains(&color.l) || color.c < 0.0 || !(0.0..=1.0).contains(&color.alpha) {
        return Err(CodegenError::InvalidConfig(format!(
            "`{name}` is not a valid OKLCH color"
        )));
    }
    Ok(())
}

/// Names of models reachable from screen inputs and persisted models.
fn referenced_models(app: &AppDefinition) -> IndexSet<&str> {
    let mut queue: VecDeque<&str> = app
        .screens
        .iter()
        .flat_map(|s| s.parameters.iter().chain(&s.state))
        .filter_map(|v| v.ty.referenced_model())
        .chain(
            app.models
                .iter()
                .filter(|m| m.persisted)
                .flat_map(held_models),
        )
        .collect();

    let mut seen = IndexSet::new();
    while let Some(name) = queue.pop_front() {
        if !seen.insert(name) {
            continue;
        }
        if let Some(model) = app.model(name) {
            queue.extend(held_models(model));
        }
    }
    seen
}

fn held_models(model: &DataModel) -> impl Iterator<Item = &str> {
    model.properties.iter().filter_map(|p| p.ty.referenced_model())
}

/// Screens reachable from the entry screen, the tabs and deep links.
fn reachable_screens<'a>(app: &'a AppDefinition, built: &'a [(BuiltScreen, String)]) -> IndexSet<&'a str> {
    let mut queue: VecDeque<&str> = std::iter::once(app.entry_screen.as_str())
        .chain(app.tab_bar.iter().flat_map(|bar| bar.items.iter().map(|t| t.screen.as_str())))
        .chain(app.screens.iter().filter(|s| s.deep_link.is_some()).map(|s| s.id.as_str()))
        .collect();

    let mut seen = IndexSet::new();
    while let Some(id) = queue.pop_front() {
        if !seen.insert(id) {
            continue;
        }
        for (screen, _) in built.iter().filter(|(s, _)| s.screen_id == id) {
            queue.extend(screen.edges.iter().map(|e| e.to.as_str()));
        }
    }
    seen
}

fn collect_warnings(
    app: &AppDefinition,
    trees: &[NormalizedTree],
    built: &[(BuiltScreen, String)],
    index: &ScreenIndex,
    referenced: &IndexSet<&str>,
    tokens: &DesignTokens,
    config: &GeneratorConfig,
) -> Vec<String> {
    let mut warnings = Vec::new();

    for (screen, tree) in app.screens.iter().zip(trees) {
        if tree.max_depth > config.nesting_warning_depth {
            warnings.push(format!(
                "Screen `{}` nests containers {} levels deep (more than {})",
                screen.id, tree.max_depth, config.nesting_warning_depth
            ));
        }
    }

    let reachable = reachable_screens(app, built);
    for id in index.keys() {
        if !reachable.contains(id.as_str()) {
            warnings.push(format!(
                "Screen `{id}` is not reachable from the entry screen, a tab or a deep link"
            ));
        }
    }

    for model in &app.models {
        if !model.persisted && !referenced.contains(model.name.as_str()) {
            warnings.push(format!("Model `{}` is never used and was not emitted", model.name));
        }
    }
    if app.has_persisted_models() && !app.config.uses_persistence {
        let names: Vec<&str> = app.models.iter().filter(|m| m.persisted).map(|m| m.name.as_str()).collect();
        warnings.push(format!(
            "Persisted models ({}) were wired into a model container although persistence is disabled",
            names.join(", ")
        ));
    }

    for shortfall in tokens.contrast_shortfalls() {
        warnings.push(format!("Contrast: {shortfall}"));
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use appforge_core::{
        BindingSource, ComponentNode, DataBinding, DeviceClass, ModelProperty, PropertyType, Screen,
        TabBar, TabItem, VariableDecl,
    };
    use serde_json::json;

    fn screen(id: &str, name: &str, root: ComponentNode) -> Screen {
        Screen::new(id, name, root)
    }

    fn text(id: &str) -> ComponentNode {
        ComponentNode::new(id, "Text").with_prop("content", json!("Hi"))
    }

    fn button_to(id: &str, target: &str) -> ComponentNode {
        ComponentNode::new(id, "Button")
            .with_prop("title", json!("Go"))
            .with_prop("action", json!({"type": "navigate", "target": target}))
    }

    fn app(screens: Vec<Screen>) -> AppDefinition {
        let entry = screens[0].id.clone();
        AppDefinition {
            config: AppConfig::new("Notes", "com.example.notes"),
            screens,
            models: vec![],
            entry_screen: entry,
            tab_bar: None,
        }
    }

    fn paths(result: &CodegenResult) -> Vec<&str> {
        result.files.iter().map(|f| f.path.as_str()).collect()
    }

    #[test]
    fn test_screen_then_entry_order() {
        let app = app(vec![
            screen("home", "Home", ComponentNode::new("root", "VStack").with_child(button_to("go", "about"))),
            screen("about", "About", text("t")),
        ]);
        let result = generate(&app).unwrap();
        assert_eq!(
            paths(&result),
            vec!["Notes/Views/HomeView.swift", "Notes/Views/AboutView.swift", "Notes/NotesApp.swift"]
        );
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    }

    #[test]
    fn test_invalid_bundle_id() {
        let mut app = app(vec![screen("home", "Home", text("t"))]);
        app.config.bundle_id = "notes".to_string();
        assert!(matches!(generate(&app), Err(CodegenError::InvalidConfig(_))));
    }

    #[test]
    fn test_invalid_appearance() {
        let mut app = app(vec![screen("home", "Home", text("t"))]);
        app.config.appearance.base_unit = 0.0;
        assert!(matches!(generate(&app), Err(CodegenError::InvalidConfig(_))));

        let mut app = app.clone();
        app.config.appearance.base_unit = 4.0;
        app.config.appearance.primary_color.l = f64::NAN;
        assert!(matches!(generate(&app), Err(CodegenError::InvalidConfig(_))));
    }

    #[test]
    fn test_platform_checked() {
        let mut app = app(vec![screen("home", "Home", text("t"))]);
        app.config.platform.minimum_os_version = "seventeen".to_string();
        assert!(matches!(generate(&app), Err(CodegenError::InvalidConfig(_))));

        app.config.platform.minimum_os_version = "17.0".to_string();
        app.config.platform.devices = Vec::<DeviceClass>::new();
        assert!(matches!(generate(&app), Err(CodegenError::InvalidConfig(_))));
    }

    #[test]
    fn test_normalize_error_names_screen() {
        let app = app(vec![screen("home", "Home", ComponentNode::new("root", "Carousel"))]);
        match generate(&app) {
            Err(CodegenError::Normalize { screen, .. }) => assert_eq!(screen, "home"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_reference_errors_aggregate() {
        let mut app = app(vec![screen(
            "home",
            "Home",
            ComponentNode::new("root", "VStack")
                .with_child(button_to("a", "nowhere"))
                .with_child(button_to("b", "elsewhere")),
        )]);
        app.entry_screen = "missing".to_string();
        match generate(&app) {
            Err(CodegenError::References(errors)) => assert_eq!(errors.len(), 3),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_unreachable_screen_warning() {
        let app = app(vec![screen("home", "Home", text("t")), screen("orphan", "Orphan", text("u"))]);
        let result = generate(&app).unwrap();
        assert_eq!(result.files.len(), 3);
        assert_eq!(
            result.warnings,
            vec!["Screen `orphan` is not reachable from the entry screen, a tab or a deep link".to_string()]
        );
    }

    #[test]
    fn test_deep_link_makes_screen_reachable() {
        let mut orphan = screen("orphan", "Orphan", text("u"));
        orphan.deep_link = Some("/orphan".to_string());
        let app = app(vec![screen("home", "Home", text("t")), orphan]);
        assert!(generate(&app).unwrap().warnings.is_empty());
    }

    #[test]
    fn test_tab_screens_reachable() {
        let mut app = app(vec![screen("home", "Home", text("t")), screen("settings", "Settings", text("u"))]);
        app.tab_bar = Some(TabBar {
            items: vec![
                TabItem {
                    screen: "home".to_string(),
                    title: "Home".to_string(),
                    icon: "house".to_string(),
                },
                TabItem {
                    screen: "settings".to_string(),
                    title: "Settings".to_string(),
                    icon: "gear".to_string(),
                },
            ],
        });
        assert!(generate(&app).unwrap().warnings.is_empty());
    }

    #[test]
    fn test_nesting_warning() {
        let mut root = text("leaf");
        for depth in 0..4 {
            root = ComponentNode::new(format!("v{depth}"), "VStack").with_child(root);
        }
        let app = app(vec![screen("home", "Home", root)]);
        let config = GeneratorConfig {
            nesting_warning_depth: 2,
            ..GeneratorConfig::default()
        };
        let result = generate_with(&app, Catalog::standard(), &config).unwrap();
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].starts_with("Screen `home` nests containers"));
    }

    #[test]
    fn test_unused_value_model_warning() {
        let mut app = app(vec![screen("home", "Home", text("t"))]);
        app.models = vec![DataModel {
            name: "Draft".to_string(),
            properties: vec![],
            persisted: false,
        }];
        let result = generate(&app).unwrap();
        assert_eq!(result.files.len(), 2);
        assert_eq!(
            result.warnings,
            vec!["Model `Draft` is never used and was not emitted".to_string()]
        );
    }

    #[test]
    fn test_value_model_used_through_state() {
        let mut home = screen("home", "Home", text("t"));
        home.state.push(VariableDecl {
            name: "draft".to_string(),
            ty: PropertyType::Model("Draft".to_string()),
            default: None,
        });
        let mut app = app(vec![home]);
        app.models = vec![
            DataModel {
                name: "Draft".to_string(),
                properties: vec![ModelProperty {
                    name: "tag".to_string(),
                    ty: PropertyType::Model("Tag".to_string()),
                    default: None,
                    persisted: true,
                }],
                persisted: false,
            },
            DataModel {
                name: "Tag".to_string(),
                properties: vec![],
                persisted: false,
            },
        ];
        let result = generate(&app).unwrap();
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
        let entry = result.file("Notes/NotesApp.swift").unwrap();
        assert!(entry.content.contains("struct Draft"));
        assert!(entry.content.contains("struct Tag"));
    }

    #[test]
    fn test_persisted_model_without_persistence_warns() {
        let mut app = app(vec![screen("home", "Home", text("t"))]);
        app.models = vec![DataModel {
            name: "Note".to_string(),
            properties: vec![],
            persisted: true,
        }];
        let result = generate(&app).unwrap();
        assert_eq!(result.files.len(), 3);
        assert_eq!(result.files[1].path, "Notes/Models/Note.swift");
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("persistence is disabled"));

        app.config.uses_persistence = true;
        assert!(generate(&app).unwrap().warnings.is_empty());
    }

    #[test]
    fn test_invalid_model() {
        let mut app = app(vec![screen("home", "Home", text("t"))]);
        app.models = vec![DataModel {
            name: "Router".to_string(),
            properties: vec![],
            persisted: false,
        }];
        match generate(&app) {
            Err(CodegenError::InvalidModel { model, .. }) => assert_eq!(model, "Router"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_unresolved_binding_is_reference_error() {
        let node = text("t").with_binding(DataBinding::new("content", BindingSource::Parameter, "missing"));
        let app = app(vec![screen("home", "Home", node)]);
        assert!(matches!(generate(&app), Err(CodegenError::References(_))));
    }

    #[test]
    fn test_output_is_deterministic() {
        let app = app(vec![
            screen("home", "Home", ComponentNode::new("root", "VStack").with_child(button_to("go", "about"))),
            screen("about", "About", text("t")),
        ]);
        assert_eq!(generate(&app).unwrap(), generate(&app).unwrap());
    }
}
