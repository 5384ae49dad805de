//! Whole-file assembly: imports, type declarations and previews.

use super::{swift, Printer};
use crate::ir::{BuiltScreen, Decl, EntryIr, Helper, ModelDecl, StoreDecl};
use serde::Serialize;

/// A generated source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedFile {
    /// File path relative to project root.
    pub path: String,
    /// File content.
    pub content: String,
}

pub fn screen_path(folder: &str, view_type: &str) -> String {
    format!("{folder}/Views/{view_type}.swift")
}

pub fn model_path(folder: &str, type_name: &str) -> String {
    format!("{folder}/Models/{type_name}.swift")
}

pub fn entry_path(folder: &str, app_type: &str) -> String {
    format!("{folder}/{app_type}.swift")
}

/// Print a screen view file.
pub fn print_screen(screen: &BuiltScreen, indent_width: usize, emit_preview: bool) -> String {
    let mut p = Printer::new(indent_width);
    p.line(0, "import SwiftUI");
    p.blank();
    p.line(0, format!("struct {}: View {{", screen.view_type));

    for decl in &screen.decls {
        p.line(1, decl_line(decl));
    }
    if !screen.decls.is_empty() {
        p.blank();
    }

    p.line(1, "var body: some View {");
    p.expr(&screen.body, 2);
    p.line(1, "}");

    for helper in &screen.helpers {
        p.blank();
        match helper {
            Helper::Handler { name, params } => {
                let params = params
                    .iter()
                    .map(|(name, ty)| format!("{name}: {ty}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                p.line(1, format!("private func {name}({params}) {{"));
                p.line(2, format!("// Implement `{name}`."));
                p.line(1, "}");
            }
        }
    }
    p.line(0, "}");

    if emit_preview {
        p.blank();
        p.line(0, "#Preview {");
        p.line(1, format!("{}()", screen.view_type));
        if screen.uses_router {
            p.line(2, ".environmentObject(Router())");
        }
        p.line(0, "}");
    }

    p.finish()
}

fn decl_line(decl: &Decl) -> String {
    match decl {
        Decl::State { name, ty, initial } => {
            format!("@State private var {name}: {ty} = {}", swift::value(initial))
        }
        Decl::Environment { key, name } => format!("@Environment(\\.{key}) private var {name}"),
        Decl::Router => "@EnvironmentObject private var router: Router".to_string(),
        Decl::Parameter { name, ty, default } => format!("var {name}: {ty} = {}", swift::value(default)),
    }
}

/// Print a persisted model file.
pub fn print_model(model: &ModelDecl, indent_width: usize) -> String {
    let mut p = Printer::new(indent_width);
    p.line(0, "import Foundation");
    p.line(0, "import SwiftData");
    p.blank();
    write_model(&mut p, model);
    p.finish()
}

fn write_model(p: &mut Printer, model: &ModelDecl) {
    if model.persisted {
        p.line(0, "@Model");
        p.line(0, format!("final class {} {{", model.type_name));
    } else {
        p.line(0, format!("struct {}: Hashable, Codable {{", model.type_name));
    }

    for prop in &model.properties {
        let attribute = if model.persisted && prop.transient { "@Transient " } else { "" };
        p.line(
            1,
            format!("{attribute}var {}: {} = {}", prop.name, prop.ty, swift::value(&prop.default)),
        );
    }

    // Structs get a memberwise initializer for free.
    if model.persisted {
        if !model.properties.is_empty() {
            p.blank();
        }
        let params = model
            .properties
            .iter()
            .map(|prop| format!("{}: {} = {}", prop.name, prop.ty, swift::value(&prop.default)))
            .collect::<Vec<_>>()
            .join(", ");
        if model.properties.is_empty() {
            p.line(1, "init() {}");
        } else {
            p.line(1, format!("init({params}) {{"));
            for prop in &model.properties {
                let bare = prop.name.trim_matches('`');
                p.line(2, format!("self.{bare} = {}", prop.name));
            }
            p.line(1, "}");
        }
    }
    p.line(0, "}");
}

/// Print the app entry file: the `@main` app, routes, router and root view.
pub fn print_entry(entry: &EntryIr, indent_width: usize) -> String {
    let mut p = Printer::new(indent_width);

    p.line(0, "import SwiftUI");
    if entry.store != StoreDecl::None {
        p.line(0, "import SwiftData");
    }
    p.blank();

    write_app(&mut p, entry);
    p.blank();
    write_routes(&mut p, entry);
    p.blank();
    write_router(&mut p, entry);
    p.blank();
    write_root_view(&mut p, entry);

    for model in &entry.value_models {
        p.blank();
        write_model(&mut p, model);
    }

    p.finish()
}

fn write_app(p: &mut Printer, entry: &EntryIr) {
    p.line(0, "@main");
    p.line(0, format!("struct {}: App {{", entry.app_type));
    p.line(1, "@StateObject private var router = Router()");

    if let StoreDecl::CloudSynced(models) = &entry.store {
        p.blank();
        p.line(1, "private let container: ModelContainer = {");
        p.line(2, format!("let schema = Schema([{}])", model_types(models)));
        p.line(
            2,
            "let configuration = ModelConfiguration(schema: schema, cloudKitDatabase: .automatic)",
        );
        p.line(2, "do {");
        p.line(3, "return try ModelContainer(for: schema, configurations: [configuration])");
        p.line(2, "} catch {");
        p.line(3, "fatalError(\"Could not create ModelContainer: \\(error)\")");
        p.line(2, "}");
        p.line(1, "}()");
    }

    p.blank();
    p.line(1, "var body: some Scene {");
    p.line(2, "WindowGroup {");
    p.line(3, "RootView()");
    for modifier in &entry.scene_modifiers {
        p.line(4, format!(".{}({})", modifier.name, swift::args(&modifier.args)));
    }
    p.line(2, "}");
    match &entry.store {
        StoreDecl::None => {}
        StoreDecl::Local(models) => p.line(2, format!(".modelContainer(for: [{}])", model_types(models))),
        StoreDecl::CloudSynced(_) => p.line(2, ".modelContainer(container)"),
    }
    p.line(1, "}");
    p.line(0, "}");
}

fn model_types(models: &[String]) -> String {
    models
        .iter()
        .map(|m| format!("{m}.self"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn write_routes(p: &mut Printer, entry: &EntryIr) {
    p.line(0, "enum Route: Hashable {");
    for route in &entry.routes {
        p.line(1, format!("case {}", route.case));
    }

    if entry.has_deep_links() {
        p.blank();
        p.line(1, "init?(url: URL) {");
        p.line(
            2,
            "let components = [url.host].compactMap { $0 } + url.pathComponents.filter { $0 != \"/\" }",
        );
        p.line(2, "switch \"/\" + components.joined(separator: \"/\") {");
        for route in &entry.routes {
            if let Some(link) = &route.deep_link {
                p.line(2, format!("case {}:", swift::string_literal(link)));
                p.line(3, format!("self = .{}", route.case));
            }
        }
        p.line(2, "default:");
        p.line(3, "return nil");
        p.line(2, "}");
        p.line(1, "}");
    }
    p.line(0, "}");
}

fn write_router(p: &mut Printer, entry: &EntryIr) {
    p.line(0, "final class Router: ObservableObject {");
    p.line(1, "@Published var path = NavigationPath()");
    if let Some(initial) = entry.initial_tab() {
        p.line(1, format!("@Published var selectedTab: Route = .{initial} {{"));
        p.line(2, "didSet { popToRoot() }");
        p.line(1, "}");
    }
    p.blank();

    p.line(1, "func navigate(to route: Route) {");
    p.line(2, "path.append(route)");
    p.line(1, "}");
    p.blank();

    p.line(1, "func goBack() {");
    p.line(2, "if !path.isEmpty {");
    p.line(3, "path.removeLast()");
    p.line(2, "}");
    p.line(1, "}");
    p.blank();

    p.line(1, "func popToRoot() {");
    p.line(2, "path = NavigationPath()");
    p.line(1, "}");

    if entry.has_deep_links() {
        p.blank();
        p.line(1, "func open(_ url: URL) {");
        p.line(2, "guard let route = Route(url: url) else { return }");
        p.line(2, "popToRoot()");
        if entry.tabs.is_empty() {
            p.line(2, format!("if route != .{} {{", entry.root_case));
            p.line(3, "navigate(to: route)");
            p.line(2, "}");
        } else {
            let tabs = entry
                .tabs
                .iter()
                .map(|case| format!("Route.{case}"))
                .collect::<Vec<_>>()
                .join(", ");
            p.line(2, format!("if [{tabs}].contains(route) {{"));
            p.line(3, "selectedTab = route");
            p.line(2, "} else {");
            p.line(3, "navigate(to: route)");
            p.line(2, "}");
        }
        p.line(1, "}");
    }
    p.line(0, "}");
}

fn write_root_view(p: &mut Printer, entry: &EntryIr) {
    p.line(0, "struct RootView: View {");
    p.line(1, "@EnvironmentObject private var router: Router");
    p.blank();
    p.line(1, "var body: some View {");
    p.expr(&entry.root, 2);
    p.line(1, "}");
    p.blank();
    p.line(1, "@ViewBuilder");
    p.line(1, "private func routeView(for route: Route) -> some View {");
    p.line(2, "switch route {");
    for route in &entry.routes {
        p.line(2, format!("case .{}:", route.case));
        p.line(3, format!("{}()", route.view_type));
    }
    p.line(2, "}");
    p.line(1, "}");
    p.line(0, "}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Arg, LeafKind, PropertyDecl, RouteDecl, UiExpr, ValueExpr};

    fn screen() -> BuiltScreen {
        BuiltScreen {
            screen_id: "home".into(),
            view_type: "HomeView".into(),
            decls: vec![
                Decl::State {
                    name: "title".into(),
                    ty: "String".into(),
                    initial: ValueExpr::str(""),
                },
                Decl::Router,
            ],
            body: UiExpr::leaf(LeafKind::Text, vec![Arg::new(ValueExpr::Interpolation("title".into()))]),
            helpers: vec![Helper::Handler {
                name: "share".into(),
                params: vec![("id".into(), "Int".into())],
            }],
            edges: vec![],
            uses_router: true,
        }
    }

    #[test]
    fn test_screen_file() {
        insta::assert_snapshot!(print_screen(&screen(), 4, true), @r###"
        import SwiftUI

        struct HomeView: View {
            @State private var title: String = ""
            @EnvironmentObject private var router: Router

            var body: some View {
                Text("\(title)")
            }

            private func share(id: Int) {
                // Implement `share`.
            }
        }

        #Preview {
            HomeView()
                .environmentObject(Router())
        }
        "###);
    }

    #[test]
    fn test_screen_without_preview() {
        let out = print_screen(&screen(), 4, false);
        assert!(!out.contains("#Preview"));
        assert!(out.ends_with("}\n"));
    }

    #[test]
    fn test_persisted_model_file() {
        let model = ModelDecl {
            type_name: "Note".into(),
            persisted: true,
            properties: vec![
                PropertyDecl {
                    name: "title".into(),
                    ty: "String".into(),
                    default: ValueExpr::str(""),
                    transient: false,
                },
                PropertyDecl {
                    name: "draft".into(),
                    ty: "String".into(),
                    default: ValueExpr::str(""),
                    transient: true,
                },
            ],
        };
        let out = print_model(&model, 4);
        assert!(out.starts_with("import Foundation\nimport SwiftData\n"));
        assert!(out.contains("@Model\nfinal class Note {"));
        assert!(out.contains("    @Transient var draft: String = \"\""));
        assert!(out.contains("    init(title: String = \"\", draft: String = \"\") {"));
        assert!(out.contains("        self.title = title"));
    }

    fn entry(store: StoreDecl, deep_link: Option<&str>) -> EntryIr {
        EntryIr {
            app_type: "NotesApp".into(),
            routes: vec![
                RouteDecl {
                    case: "home".into(),
                    view_type: "HomeView".into(),
                    deep_link: None,
                },
                RouteDecl {
                    case: "detail".into(),
                    view_type: "DetailView".into(),
                    deep_link: deep_link.map(String::from),
                },
            ],
            root: UiExpr::leaf(LeafKind::Custom("HomeView".into()), vec![]),
            root_case: "home".into(),
            tabs: vec![],
            scene_modifiers: vec![crate::ir::ModifierExpr::new(
                "environmentObject",
                vec![Arg::new(ValueExpr::ident("router"))],
            )],
            store,
            value_models: vec![],
        }
    }

    #[test]
    fn test_entry_without_persistence() {
        let out = print_entry(&entry(StoreDecl::None, None), 4);
        assert!(out.starts_with("import SwiftUI\n\n@main\nstruct NotesApp: App {"));
        assert!(!out.contains("SwiftData"));
        assert!(out.contains("            RootView()\n                .environmentObject(router)"));
        assert!(out.contains("enum Route: Hashable {\n    case home\n    case detail\n}"));
        assert!(out.contains("        case .detail:\n            DetailView()"));
        assert!(!out.contains("init?(url: URL)"));
    }

    #[test]
    fn test_entry_with_local_store_and_deep_link() {
        let out = print_entry(&entry(StoreDecl::Local(vec!["Note".into()]), Some("/notes/detail")), 4);
        assert!(out.contains("import SwiftData"));
        assert!(out.contains("        .modelContainer(for: [Note.self])"));
        assert!(out.contains("        case \"/notes/detail\":\n            self = .detail"));
        assert!(out.contains("func open(_ url: URL)"));
        assert!(out.contains("if route != .home {"));
    }

    #[test]
    fn test_entry_with_cloud_store() {
        let out = print_entry(&entry(StoreDecl::CloudSynced(vec!["Note".into()]), None), 4);
        assert!(out.contains("let schema = Schema([Note.self])"));
        assert!(out.contains("cloudKitDatabase: .automatic"));
        assert!(out.contains("        .modelContainer(container)"));
    }
}
