//! End-to-end generation of small apps.

use appforge_codegen::{generate, CodegenError};
use appforge_core::{
    AppConfig, AppDefinition, BindingSource, ComponentNode, DataBinding, DataModel, ModelProperty, PropertyType,
    ReferenceError, Screen, TabBar, TabItem,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn app(screens: Vec<Screen>, entry: &str) -> AppDefinition {
    AppDefinition {
        config: AppConfig::new("Field Notes", "com.example.fieldnotes"),
        screens,
        models: vec![],
        entry_screen: entry.to_string(),
        tab_bar: None,
    }
}

fn navigate(target: &str) -> serde_json::Value {
    json!({"type": "navigate", "target": target})
}

fn detail_screen() -> Screen {
    let root = ComponentNode::new("root", "VStack")
        .with_child(
            ComponentNode::new("heading", "Text")
                .with_binding(DataBinding::new("content", BindingSource::State, "title")),
        )
        .with_child(
            ComponentNode::new("open", "Button")
                .with_prop("title", json!("Open"))
                .with_prop("action", navigate("detail")),
        );
    Screen::new("detail", "Detail", root)
}

fn text(id: &str, content: &str) -> ComponentNode {
    ComponentNode::new(id, "Text").with_prop("content", json!(content))
}

#[test]
fn test_one_screen_app() {
    let result = generate(&app(vec![detail_screen()], "detail")).unwrap();

    let paths: Vec<&str> = result.files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["FieldNotes/Views/DetailView.swift", "FieldNotes/FieldNotesApp.swift"]);
    assert!(result.warnings.is_empty(), "{:?}", result.warnings);

    let view = &result.files[0].content;
    assert!(view.contains("@State private var title: String = \"\""));
    assert!(view.contains(r#"Text("\(title)")"#));
    assert!(view.contains("router.navigate(to: .detail)"));
    assert!(view.contains("@EnvironmentObject private var router: Router"));

    let entry = &result.files[1].content;
    assert!(entry.starts_with("import SwiftUI\n\n@main\nstruct FieldNotesApp: App {"));
    assert!(!entry.contains("SwiftData"));
    assert!(entry.contains("case .detail:\n            DetailView()"));
}

#[test]
fn test_persisted_and_value_models() {
    let mut home = Screen::new("home", "Home", text("t", "Notes"));
    home.parameters.push(appforge_core::VariableDecl {
        name: "filter".to_string(),
        ty: PropertyType::Optional(Box::new(PropertyType::Model("Filter".to_string()))),
        default: None,
    });
    let mut app = app(vec![home], "home");
    app.config.uses_persistence = true;
    app.models = vec![
        DataModel {
            name: "Note".to_string(),
            properties: vec![
                ModelProperty {
                    name: "title".to_string(),
                    ty: PropertyType::String,
                    default: Some(json!("Untitled")),
                    persisted: true,
                },
                ModelProperty {
                    name: "isSelected".to_string(),
                    ty: PropertyType::Bool,
                    default: None,
                    persisted: false,
                },
            ],
            persisted: true,
        },
        DataModel {
            name: "Filter".to_string(),
            properties: vec![ModelProperty {
                name: "query".to_string(),
                ty: PropertyType::String,
                default: None,
                persisted: true,
            }],
            persisted: false,
        },
    ];

    let result = generate(&app).unwrap();
    assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    let paths: Vec<&str> = result.files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "FieldNotes/Views/HomeView.swift",
            "FieldNotes/Models/Note.swift",
            "FieldNotes/FieldNotesApp.swift",
        ]
    );

    let model = &result.files[1].content;
    assert!(model.starts_with("import Foundation\nimport SwiftData\n\n@Model\nfinal class Note {"));
    assert!(model.contains("    var title: String = \"Untitled\""));
    assert!(model.contains("    @Transient var isSelected: Bool = false"));

    let entry = &result.files[2].content;
    assert!(entry.starts_with("import SwiftUI\nimport SwiftData\n"));
    assert!(entry.contains(".modelContainer(for: [Note.self])"));
    assert!(entry.contains("struct Filter: Hashable, Codable {"));

    let view = &result.files[0].content;
    assert!(view.contains("var filter: Filter? = nil"));
}

#[test]
fn test_no_persistence_import_without_persisted_models() {
    let mut app = app(vec![Screen::new("home", "Home", text("t", "Hi"))], "home");
    app.models = vec![DataModel {
        name: "Draft".to_string(),
        properties: vec![],
        persisted: false,
    }];
    let result = generate(&app).unwrap();
    assert_eq!(result.files.len(), 2);
    assert!(result.files.iter().all(|f| !f.content.contains("SwiftData")));
}

#[test]
fn test_dangling_references_produce_no_files() {
    let root = ComponentNode::new("root", "VStack")
        .with_child(
            ComponentNode::new("a", "Button")
                .with_prop("title", json!("A"))
                .with_prop("action", navigate("settings")),
        )
        .with_child(ComponentNode::new("b", "NavigationLink").with_prop("target", json!("profile")));
    let mut app = app(vec![Screen::new("home", "Home", root)], "home");
    app.tab_bar = Some(TabBar {
        items: vec![TabItem {
            screen: "inbox".to_string(),
            title: "Inbox".to_string(),
            icon: "tray".to_string(),
        }],
    });

    let errors = match generate(&app) {
        Err(CodegenError::References(errors)) => errors,
        other => panic!("expected reference errors, got {other:?}"),
    };
    assert_eq!(errors.len(), 3);
    assert!(errors
        .iter()
        .any(|e| matches!(e, ReferenceError::DanglingTab { target, .. } if target == "inbox")));
    let message = CodegenError::References(errors).to_string();
    assert!(message.contains("settings"));
    assert!(message.contains("profile"));
}

#[test]
fn test_tabs_and_deep_links() {
    let mut inbox = Screen::new("inbox", "Inbox", text("t", "Inbox"));
    inbox.deep_link = Some("/inbox".to_string());
    let settings = Screen::new("settings", "Settings", text("u", "Settings"));
    let mut app = app(vec![inbox, settings], "inbox");
    app.tab_bar = Some(TabBar {
        items: vec![
            TabItem {
                screen: "inbox".to_string(),
                title: "Inbox".to_string(),
                icon: "tray".to_string(),
            },
            TabItem {
                screen: "settings".to_string(),
                title: "Settings".to_string(),
                icon: "gear".to_string(),
            },
        ],
    });

    let result = generate(&app).unwrap();
    assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    let entry = result.file("FieldNotes/FieldNotesApp.swift").unwrap();
    assert!(entry.content.contains("TabView(selection: $router.selectedTab) {"));
    assert!(entry.content.contains("@Published var selectedTab: Route = .inbox {"));
    assert!(entry.content.contains(".onOpenURL(perform: router.open)"));
    assert!(entry.content.contains("case \"/inbox\":\n            self = .inbox"));
    assert!(entry.content.contains("if [Route.inbox, Route.settings].contains(route) {"));
}

#[test]
fn test_sheet_presentation_between_screens() {
    let home = Screen::new(
        "home",
        "Home",
        ComponentNode::new("add", "Button")
            .with_prop("title", json!("Add"))
            .with_prop("action", json!({"type": "presentSheet", "target": "compose"})),
    );
    let compose = Screen::new(
        "compose",
        "Compose",
        ComponentNode::new("close", "Button")
            .with_prop("title", json!("Close"))
            .with_prop("action", json!({"type": "dismiss"})),
    );
    let result = generate(&app(vec![home, compose], "home")).unwrap();
    assert!(result.warnings.is_empty(), "{:?}", result.warnings);

    let home = &result.files[0].content;
    assert!(home.contains("@State private var isPresentingCompose: Bool = false"));
    assert!(home.contains("isPresentingCompose = true"));
    assert!(home.contains(".sheet(isPresented: $isPresentingCompose) {"));
    assert!(home.contains("ComposeView()"));

    let compose = &result.files[1].content;
    assert!(compose.contains("@Environment(\\.dismiss) private var dismiss"));
    assert!(compose.contains("dismiss()"));
}
