//! Swift identifier derivation and input format checks.

use appforge_core::Screen;
use convert_case::{Case, Casing};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex"));
static BUNDLE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9-]*(\.[A-Za-z][A-Za-z0-9-]*)+$").expect("valid regex"));
static VERSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+(\.\d+){0,2}$").expect("valid regex"));
static OS_VERSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+(\.\d+)?$").expect("valid regex"));
static DEEP_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(/[A-Za-z0-9_-]+)+$").expect("valid regex"));

const SWIFT_KEYWORDS: &[&str] = &[
    "as", "associatedtype", "break", "case", "catch", "class", "continue", "default", "defer", "deinit", "do",
    "else", "enum", "extension", "fallthrough", "false", "for", "func", "guard", "if", "import", "in", "init",
    "inout", "internal", "is", "let", "nil", "operator", "private", "protocol", "public", "repeat", "return",
    "self", "Self", "static", "struct", "subscript", "super", "switch", "throw", "throws", "true", "try",
    "typealias", "var", "where", "while",
];

/// Whether `name` is a plain identifier.
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

pub fn is_bundle_id(value: &str) -> bool {
    BUNDLE_ID.is_match(value)
}

/// `1`, `1.2` or `1.2.3`.
pub fn is_version(value: &str) -> bool {
    VERSION.is_match(value)
}

/// `17` or `17.0`.
pub fn is_os_version(value: &str) -> bool {
    OS_VERSION.is_match(value)
}

/// A slash-separated path such as `/notes/detail`.
pub fn is_deep_link(value: &str) -> bool {
    DEEP_LINK.is_match(value)
}

pub fn is_keyword(name: &str) -> bool {
    SWIFT_KEYWORDS.contains(&name)
}

fn words(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .trim()
        .to_string()
}

/// UpperCamelCase type name, or `None` if `raw` has no usable characters.
pub fn type_name(raw: &str) -> Option<String> {
    let pascal = words(raw).to_case(Case::Pascal);
    match pascal.chars().next() {
        None => None,
        Some(c) if c.is_ascii_digit() => Some(format!("N{pascal}")),
        Some(_) => Some(pascal),
    }
}

/// lowerCamelCase member name without keyword escaping.
pub fn member_name(raw: &str) -> String {
    let camel = words(raw).to_case(Case::Camel);
    match camel.chars().next() {
        None => "value".to_string(),
        Some(c) if c.is_ascii_digit() => format!("n{camel}"),
        Some(_) => camel,
    }
}

/// Escape a member name that collides with a keyword.
pub fn escape_member(name: &str) -> String {
    if is_keyword(name) {
        format!("`{name}`")
    } else {
        name.to_string()
    }
}

/// Name of the `@main` app type.
pub fn app_type_name(app_name: &str) -> String {
    format!("{}App", type_name(app_name).unwrap_or_else(|| "Generated".to_string()))
}

/// Folder the generated sources live in.
pub fn app_folder(app_name: &str) -> String {
    type_name(app_name).unwrap_or_else(|| "Generated".to_string())
}

/// Generated names for one screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenNames {
    /// The view struct, e.g. `NoteDetailView`.
    pub view_type: String,
    /// Unescaped route case, e.g. `noteDetail`.
    pub handle: String,
    /// Display name shown in titles.
    pub title: String,
}

impl ScreenNames {
    pub fn for_screen(screen: &Screen) -> Self {
        let base = type_name(&screen.name)
            .or_else(|| type_name(&screen.id))
            .unwrap_or_else(|| "Screen".to_string());
        Self {
            view_type: format!("{base}View"),
            handle: member_name(&screen.id),
            title: screen.name.clone(),
        }
    }

    /// Route case as written in source.
    pub fn route_case(&self) -> String {
        escape_member(&self.handle)
    }

    /// Name of the state flag that presents this screen as a sheet.
    pub fn presentation_flag(&self) -> String {
        format!("isPresenting{}", self.handle.to_case(Case::Pascal))
    }
}

/// Screen id to generated names, in screen order. The first screen wins on duplicate ids.
pub type ScreenIndex = IndexMap<String, ScreenNames>;

pub fn screen_index(screens: &[Screen]) -> ScreenIndex {
    let mut index = ScreenIndex::new();
    for screen in screens {
        index
            .entry(screen.id.clone())
            .or_insert_with(|| ScreenNames::for_screen(screen));
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use appforge_core::ComponentNode;

    #[test]
    fn test_type_names() {
        assert_eq!(type_name("Note Detail"), Some("NoteDetail".into()));
        assert_eq!(type_name("my-notes app!"), Some("MyNotesApp".into()));
        assert_eq!(type_name("2048"), Some("N2048".into()));
        assert_eq!(type_name("  !! "), None);
    }

    #[test]
    fn test_member_names() {
        assert_eq!(member_name("note_detail"), "noteDetail");
        assert_eq!(member_name("detail"), "detail");
        assert_eq!(escape_member("default"), "`default`");
        assert_eq!(escape_member("home"), "home");
    }

    #[test]
    fn test_screen_names() {
        let screen = Screen::new("note-detail", "Note Detail", ComponentNode::new("root", "VStack"));
        let names = ScreenNames::for_screen(&screen);
        assert_eq!(names.view_type, "NoteDetailView");
        assert_eq!(names.handle, "noteDetail");
        assert_eq!(names.presentation_flag(), "isPresentingNoteDetail");
    }

    #[test]
    fn test_format_checks() {
        assert!(is_bundle_id("com.example.notes"));
        assert!(!is_bundle_id("notes"));
        assert!(is_version("1.0.0"));
        assert!(!is_version("1.0.0-beta"));
        assert!(is_os_version("17.0"));
        assert!(!is_os_version("17.0.1"));
        assert!(is_deep_link("/notes/detail"));
        assert!(!is_deep_link("notes"));
        assert!(!is_deep_link("/notes/"));
        assert!(is_identifier("title"));
        assert!(!is_identifier("2title"));
    }
}
