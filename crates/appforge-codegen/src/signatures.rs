//! Argument signatures of the fixed modifier table and of custom actions.
//!
//! Normalization checks every user modifier and every action against these
//! shapes, so the builder only ever lowers modifiers with a known name, a
//! supported argument count, well-typed arguments and known token slots.

use crate::naming;
use appforge_core::{Action, Modifier, TokenKind};
use indexmap::IndexMap;
use serde_json::Value;

pub const EDGES: &[&str] = &["all", "horizontal", "vertical", "top", "bottom", "leading", "trailing"];
pub const ALIGNMENTS: &[&str] = &[
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
const FIXED_KEYS: &[&str] = &["width", "height"];
const FLEXIBLE_KEYS: &[&str] = &["minWidth", "maxWidth", "minHeight", "maxHeight"];

/// Expected shape of one modifier argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgShape {
    /// A token slot of the given kind.
    Token(TokenKind),
    /// A token slot of the given kind, or a literal number of points.
    Length(TokenKind),
    Number,
    /// A number between 0 and 1.
    Fraction,
    /// A positive integer.
    Count,
    Bool,
    Text,
    /// One of [`EDGES`].
    Edge,
    /// A frame object, see [`frame`].
    Frame,
    /// A dotted state or parameter path.
    Path,
    Action,
}

use self::ArgShape as A;
use appforge_core::TokenKind as T;

/// Every modifier name with its accepted argument lists.
const TABLE: &[(&str, &[&[ArgShape]])] = &[
    ("padding", &[&[], &[A::Length(T::Spacing)], &[A::Edge, A::Length(T::Spacing)]]),
    ("background", &[&[A::Token(T::Color)], &[A::Token(T::Color), A::Length(T::Radius)]]),
    ("foregroundStyle", &[&[A::Token(T::Color)]]),
    ("tint", &[&[A::Token(T::Color)]]),
    ("font", &[&[A::Token(T::Font)]]),
    ("cornerRadius", &[&[A::Length(T::Radius)]]),
    ("shadow", &[&[A::Token(T::Shadow)]]),
    ("opacity", &[&[A::Fraction]]),
    ("frame", &[&[A::Frame]]),
    ("fillWidth", &[&[]]),
    (
        "border",
        &[
            &[A::Token(T::Color), A::Length(T::BorderWidth)],
            &[A::Token(T::Color), A::Length(T::BorderWidth), A::Length(T::Radius)],
        ],
    ),
    ("animation", &[&[A::Token(T::Motion), A::Path]]),
    ("lineHeight", &[&[A::Token(T::LineHeight)]]),
    ("tracking", &[&[A::Length(T::LetterSpacing)]]),
    ("bold", &[&[]]),
    ("italic", &[&[]]),
    ("lineLimit", &[&[A::Count]]),
    ("scale", &[&[A::Number]]),
    ("rotation", &[&[A::Number]]),
    ("disabled", &[&[], &[A::Bool]]),
    ("hidden", &[&[]]),
    ("navigationTitle", &[&[A::Text]]),
    ("accessibilityLabel", &[&[A::Text]]),
    ("onTapGesture", &[&[A::Action]]),
    ("onAppear", &[&[A::Action]]),
];

/// Accepted argument lists of a modifier, or `None` for an unknown name.
pub fn signature(name: &str) -> Option<&'static [&'static [ArgShape]]> {
    TABLE.iter().find(|(known, _)| *known == name).map(|(_, forms)| *forms)
}

/// Names of every supported modifier, in table order.
pub fn modifier_names() -> impl Iterator<Item = &'static str> {
    TABLE.iter().map(|(name, _)| *name)
}

/// Check a modifier against its signature, returning the reason on failure.
pub fn check_modifier(modifier: &Modifier) -> Result<(), String> {
    let forms = signature(&modifier.name).ok_or_else(|| "not a supported modifier".to_string())?;
    let found = modifier.args.len();
    let Some(form) = forms.iter().find(|form| form.len() == found) else {
        let counts: Vec<String> = forms.iter().map(|form| form.len().to_string()).collect();
        return Err(format!("expects {} argument(s), found {found}", counts.join(" or ")));
    };
    for (index, (shape, value)) in form.iter().zip(&modifier.args).enumerate() {
        shape
            .check(value)
            .map_err(|reason| format!("argument {}: {reason}", index + 1))?;
    }
    Ok(())
}

impl ArgShape {
    fn check(&self, value: &Value) -> Result<(), String> {
        match self {
            Self::Token(kind) => token(*kind, value),
            Self::Length(kind) => match value {
                Value::Number(_) => finite(value).map(|_| ()),
                Value::String(_) => token(*kind, value),
                _ => Err(format!("expected a {kind} token or a number")),
            },
            Self::Number => finite(value).map(|_| ()),
            Self::Fraction => match finite(value)? {
                n if (0.0..=1.0).contains(&n) => Ok(()),
                _ => Err("must be between 0 and 1".to_string()),
            },
            Self::Count => match value.as_i64() {
                Some(n) if n >= 1 => Ok(()),
                _ => Err("expected a positive integer".to_string()),
            },
            Self::Bool => value.as_bool().map(|_| ()).ok_or_else(|| "expected a boolean".to_string()),
            Self::Text => value.as_str().map(|_| ()).ok_or_else(|| "expected a string".to_string()),
            Self::Edge => match value.as_str() {
                Some(edge) if EDGES.contains(&edge) => Ok(()),
                Some(edge) => Err(format!("unknown edge `{edge}`")),
                None => Err("expected an edge name".to_string()),
            },
            Self::Frame => frame(value).map(|_| ()),
            Self::Path => match value.as_str() {
                Some(path) if !path.is_empty() && path.split('.').all(naming::is_identifier) => Ok(()),
                _ => Err("expected a dotted state or parameter path".to_string()),
            },
            Self::Action => serde_json::from_value::<Action>(value.clone())
                .map_err(|e| format!("malformed action: {e}"))
                .and_then(|action| check_action(&action)),
        }
    }
}

fn token(kind: TokenKind, value: &Value) -> Result<(), String> {
    match value.as_str() {
        Some(slot) if kind.accepts(slot) => Ok(()),
        Some(slot) => Err(format!("unknown {kind} token `{slot}`")),
        None => Err(format!("expected a {kind} token")),
    }
}

fn finite(value: &Value) -> Result<f64, String> {
    value
        .as_f64()
        .filter(|n| n.is_finite())
        .ok_or_else(|| "expected a number".to_string())
}

/// A frame modifier's dimensions in emission order, plus its alignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame<'a> {
    /// `None` stands for `.infinity`.
    pub dimensions: Vec<(&'static str, Option<f64>)>,
    pub alignment: Option<&'a str>,
}

/// Parse a frame object such as `{"maxWidth": "infinity", "alignment": "leading"}`.
///
/// Fixed (`width`, `height`) and flexible (`min*`, `max*`) dimensions cannot
/// be combined, and at least one dimension is required.
pub fn frame(value: &Value) -> Result<Frame<'_>, String> {
    let object = value
        .as_object()
        .ok_or_else(|| "expects an object with at least one dimension".to_string())?;
    if let Some(key) = object
        .keys()
        .find(|k| !FIXED_KEYS.contains(&k.as_str()) && !FLEXIBLE_KEYS.contains(&k.as_str()) && k.as_str() != "alignment")
    {
        return Err(format!("unknown key `{key}`"));
    }

    let fixed = FIXED_KEYS.iter().any(|k| object.contains_key(*k));
    let flexible = FLEXIBLE_KEYS.iter().any(|k| object.contains_key(*k));
    if fixed && flexible {
        return Err("fixed and flexible dimensions cannot be combined".to_string());
    }

    let order = if flexible { FLEXIBLE_KEYS } else { FIXED_KEYS };
    let mut dimensions = Vec::new();
    for key in order {
        let Some(value) = object.get(*key) else {
            continue;
        };
        let dimension = match value {
            Value::String(s) if s == "infinity" => None,
            Value::Number(n) => match n.as_f64().filter(|v| v.is_finite() && *v >= 0.0) {
                Some(v) => Some(v),
                None => return Err(format!("`{key}` must be a non-negative number")),
            },
            _ => return Err(format!("`{key}` must be a number or \"infinity\"")),
        };
        dimensions.push((*key, dimension));
    }
    if dimensions.is_empty() {
        return Err("expects at least one dimension".to_string());
    }

    let alignment = match object.get("alignment") {
        None => None,
        Some(alignment) => match alignment.as_str() {
            Some(a) if ALIGNMENTS.contains(&a) => Some(a),
            _ => return Err("unknown alignment".to_string()),
        },
    };
    Ok(Frame { dimensions, alignment })
}

/// Check the parts of an action that do not depend on the rest of the app.
///
/// Screen targets are resolved by the reference checks; custom actions need a
/// usable handler name and primitive parameters.
pub fn check_action(action: &Action) -> Result<(), String> {
    match action {
        Action::Custom { name, params } => {
            if !naming::is_identifier(name) || naming::is_keyword(name) {
                return Err(format!("`{name}` is not a valid handler name"));
            }
            handler_params(params).map(|_| ())
        }
        Action::Navigate { .. } | Action::PresentSheet { .. } | Action::Dismiss => Ok(()),
    }
}

/// Swift parameter list of a custom action handler, as (label, type) pairs.
pub fn handler_params(params: &IndexMap<String, Value>) -> Result<Vec<(String, String)>, String> {
    params
        .iter()
        .map(|(key, value)| {
            if !naming::is_identifier(key) || naming::is_keyword(key) {
                return Err(format!("`{key}` is not a valid parameter name"));
            }
            let ty = match value {
                Value::String(_) => "String",
                Value::Bool(_) => "Bool",
                Value::Number(n) if n.is_i64() => "Int",
                Value::Number(_) => "Double",
                _ => return Err(format!("parameter `{key}` must be a string, number or boolean")),
            };
            Ok((key.clone(), ty.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(name: &str, args: Vec<Value>) -> Result<(), String> {
        check_modifier(&Modifier::new(name, args))
    }

    #[test]
    fn test_unknown_modifier() {
        assert_eq!(check("bogus", vec![]), Err("not a supported modifier".to_string()));
    }

    #[test]
    fn test_argument_counts() {
        assert!(check("padding", vec![]).is_ok());
        assert!(check("padding", vec![json!("md")]).is_ok());
        assert!(check("padding", vec![json!("horizontal"), json!(12)]).is_ok());
        assert_eq!(
            check("padding", vec![json!("top"), json!(1), json!(2)]),
            Err("expects 0 or 1 or 2 argument(s), found 3".to_string())
        );
        assert!(check("bold", vec![json!(true)]).is_err());
    }

    #[test]
    fn test_token_slots_checked() {
        assert!(check("foregroundStyle", vec![json!("textSecondary")]).is_ok());
        assert_eq!(
            check("foregroundStyle", vec![json!("notASlot")]),
            Err("argument 1: unknown color token `notASlot`".to_string())
        );
        assert!(check("animation", vec![json!("spring.bouncy"), json!("count")]).is_ok());
        assert!(check("animation", vec![json!("spring.wobbly"), json!("count")]).is_err());
        assert!(check("cornerRadius", vec![json!(12)]).is_ok());
        assert!(check("cornerRadius", vec![json!("huge")]).is_err());
    }

    #[test]
    fn test_argument_types() {
        assert!(check("opacity", vec![json!(1.5)]).is_err());
        assert!(check("lineLimit", vec![json!(0)]).is_err());
        assert!(check("padding", vec![json!("sideways"), json!(4)]).is_err());
        assert!(check("disabled", vec![json!("yes")]).is_err());
        assert!(check("animation", vec![json!("fast"), json!("a..b")]).is_err());
        assert!(check("onTapGesture", vec![json!({"type": "teleport"})]).is_err());
        assert!(check("onAppear", vec![json!({"type": "custom", "name": "load"})]).is_ok());
    }

    #[test]
    fn test_every_modifier_has_a_signature() {
        let names: Vec<_> = modifier_names().collect();
        assert_eq!(names.len(), 25);
        assert!(names.iter().all(|name| signature(name).is_some()));
    }

    #[test]
    fn test_frame_order_and_conflicts() {
        let value = json!({"maxWidth": "infinity", "minWidth": 10, "alignment": "leading"});
        let parsed = frame(&value).unwrap();
        assert_eq!(parsed.dimensions, vec![("minWidth", Some(10.0)), ("maxWidth", None)]);
        assert_eq!(parsed.alignment, Some("leading"));

        assert!(frame(&json!({"width": 10, "maxWidth": 20})).is_err());
        assert!(frame(&json!({"depth": 1})).is_err());
        assert!(frame(&json!({"alignment": "center"})).is_err());
        assert!(frame(&json!({"width": -1})).is_err());
    }

    #[test]
    fn test_custom_actions() {
        let action = |value: Value| serde_json::from_value::<Action>(value).unwrap();
        assert!(check_action(&action(json!({"type": "custom", "name": "save", "params": {"id": 1}}))).is_ok());
        assert!(check_action(&action(json!({"type": "custom", "name": "return"}))).is_err());
        assert!(check_action(&action(json!({"type": "custom", "name": "save", "params": {"x": [1]}}))).is_err());
        assert_eq!(
            handler_params(&serde_json::from_value(json!({"id": 1, "rate": 0.5, "tag": "a"})).unwrap()),
            Ok(vec![
                ("id".to_string(), "Int".to_string()),
                ("rate".to_string(), "Double".to_string()),
                ("tag".to_string(), "String".to_string()),
            ])
        );
    }
}
