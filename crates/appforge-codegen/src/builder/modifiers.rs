//! User modifier table.

use super::{shape, ScreenBuilder};
use crate::error::BuildError;
use crate::ir::{Arg, ModifierExpr, ValueExpr};
use crate::normalize::NormalizedNode;
use crate::signatures::{self, EDGES};
use appforge_core::{Action, Modifier, TokenKind, TokenRef};
use serde_json::Value;

/// Argument accessor that reports failures against one modifier.
struct Args<'m> {
    node_id: &'m str,
    modifier: &'m Modifier,
}

impl<'m> Args<'m> {
    fn invalid(&self, reason: impl Into<String>) -> BuildError {
        BuildError::InvalidModifierArgs {
            node_id: self.node_id.to_string(),
            name: self.modifier.name.clone(),
            reason: reason.into(),
        }
    }

    fn count(&self, allowed: std::ops::RangeInclusive<usize>) -> Result<(), BuildError> {
        let n = self.modifier.args.len();
        if allowed.contains(&n) {
            Ok(())
        } else if allowed.start() == allowed.end() {
            Err(self.invalid(format!("expects {} argument(s), found {n}", allowed.start())))
        } else {
            Err(self.invalid(format!(
                "expects {} to {} arguments, found {n}",
                allowed.start(),
                allowed.end()
            )))
        }
    }

    fn get(&self, index: usize) -> Option<&'m Value> {
        self.modifier.args.get(index)
    }

    fn str(&self, index: usize) -> Result<&'m str, BuildError> {
        self.get(index)
            .and_then(Value::as_str)
            .ok_or_else(|| self.invalid(format!("argument {} must be a string", index + 1)))
    }

    fn number(&self, index: usize) -> Result<f64, BuildError> {
        self.get(index)
            .and_then(Value::as_f64)
            .filter(|n| n.is_finite())
            .ok_or_else(|| self.invalid(format!("argument {} must be a number", index + 1)))
    }

    fn token(&self, index: usize, kind: TokenKind) -> Result<TokenRef, BuildError> {
        self.str(index).map(|slot| TokenRef::new(kind, slot))
    }

    fn bool_or_true(&self, index: usize) -> Result<bool, BuildError> {
        match self.get(index) {
            None => Ok(true),
            Some(value) => value
                .as_bool()
                .ok_or_else(|| self.invalid(format!("argument {} must be a boolean", index + 1))),
        }
    }
}

impl ScreenBuilder<'_> {
    /// The node's user modifiers, in declared order.
    pub(super) fn user_modifiers(&mut self, node: &NormalizedNode) -> Result<Vec<ModifierExpr>, BuildError> {
        node.modifiers
            .iter()
            .map(|modifier| self.modifier(&node.id, modifier))
            .collect()
    }

    fn modifier(&mut self, node_id: &str, modifier: &Modifier) -> Result<ModifierExpr, BuildError> {
        let args = Args { node_id, modifier };
        let single = |name: &str, value: ValueExpr| ModifierExpr::new(name, vec![Arg::new(value)]);

        let expr = match modifier.name.as_str() {
            "padding" => {
                args.count(0..=2)?;
                let mut out = Vec::new();
                let amount_at = match modifier.args.len() {
                    0 => None,
                    1 => Some(0),
                    _ => {
                        let edge = args.str(0)?;
                        if !EDGES.contains(&edge) {
                            return Err(args.invalid(format!("unknown edge `{edge}`")));
                        }
                        if edge != "all" {
                            out.push(Arg::new(ValueExpr::member(edge)));
                        }
                        Some(1)
                    }
                };
                if let Some(index) = amount_at {
                    out.push(Arg::new(ValueExpr::Number(self.length(&args, index, TokenKind::Spacing)?)));
                }
                ModifierExpr::new("padding", out)
            }
            "background" => {
                args.count(1..=2)?;
                let color = self.color(node_id, &args.token(0, TokenKind::Color)?)?;
                let mut out = vec![Arg::new(color)];
                if args.get(1).is_some() {
                    let radius = self.length(&args, 1, TokenKind::Radius)?;
                    out.push(Arg::labeled("in", shape(radius)));
                }
                ModifierExpr::new("background", out)
            }
            "foregroundStyle" | "tint" => {
                args.count(1..=1)?;
                single(&modifier.name, self.color(node_id, &args.token(0, TokenKind::Color)?)?)
            }
            "font" => {
                args.count(1..=1)?;
                single("font", self.font(node_id, &args.token(0, TokenKind::Font)?)?)
            }
            "cornerRadius" => {
                args.count(1..=1)?;
                single("clipShape", shape(self.length(&args, 0, TokenKind::Radius)?))
            }
            "shadow" => {
                args.count(1..=1)?;
                self.shadow(node_id, &args.token(0, TokenKind::Shadow)?)?
            }
            "opacity" => {
                args.count(1..=1)?;
                let value = args.number(0)?;
                if !(0.0..=1.0).contains(&value) {
                    return Err(args.invalid("opacity must be between 0 and 1"));
                }
                single("opacity", ValueExpr::Number(value))
            }
            "frame" => {
                args.count(1..=1)?;
                ModifierExpr::new("frame", frame_args(&args)?)
            }
            "fillWidth" => {
                args.count(0..=0)?;
                ModifierExpr::new("frame", vec![Arg::labeled("maxWidth", ValueExpr::member("infinity"))])
            }
            "border" => {
                args.count(2..=3)?;
                let color = self.color(node_id, &args.token(0, TokenKind::Color)?)?;
                let width = self.length(&args, 1, TokenKind::BorderWidth)?;
                if args.get(2).is_some() {
                    let radius = self.length(&args, 2, TokenKind::Radius)?;
                    let stroke = shape(radius).method(
                        "stroke",
                        vec![Arg::new(color), Arg::labeled("lineWidth", ValueExpr::Number(width))],
                    );
                    single("overlay", stroke)
                } else {
                    ModifierExpr::new(
                        "border",
                        vec![Arg::new(color), Arg::labeled("width", ValueExpr::Number(width))],
                    )
                }
            }
            "animation" => {
                args.count(2..=2)?;
                let curve = self.motion(node_id, &args.token(0, TokenKind::Motion)?)?;
                let path = args.str(1)?;
                let bound = self.bindings.lookup(path).map_err(|reason| args.invalid(reason))?;
                ModifierExpr::new(
                    "animation",
                    vec![Arg::new(curve), Arg::labeled("value", bound.read())],
                )
            }
            "lineHeight" => {
                args.count(1..=1)?;
                let token = args.token(0, TokenKind::LineHeight)?;
                let multiplier = match self.token(node_id, &token)? {
                    appforge_tokens::ResolvedToken::Number(n) => n,
                    other => return Err(self.wrong_kind(node_id, &token, &other)),
                };
                let spacing = self.cx.tokens.typography.base_size * (multiplier - 1.0);
                single("lineSpacing", ValueExpr::Number((spacing * 100.0).round() / 100.0))
            }
            "tracking" => {
                args.count(1..=1)?;
                single("tracking", ValueExpr::Number(self.length(&args, 0, TokenKind::LetterSpacing)?))
            }
            "bold" | "italic" => {
                args.count(0..=0)?;
                ModifierExpr::new(&modifier.name, vec![])
            }
            "lineLimit" => {
                args.count(1..=1)?;
                let limit = args
                    .get(0)
                    .and_then(Value::as_i64)
                    .filter(|n| *n >= 1)
                    .ok_or_else(|| args.invalid("line limit must be a positive integer"))?;
                single("lineLimit", ValueExpr::Int(limit))
            }
            "scale" => {
                args.count(1..=1)?;
                single("scaleEffect", ValueExpr::Number(args.number(0)?))
            }
            "rotation" => {
                args.count(1..=1)?;
                let degrees = ValueExpr::call(".degrees", vec![Arg::new(ValueExpr::Number(args.number(0)?))]);
                single("rotationEffect", degrees)
            }
            "disabled" => {
                args.count(0..=1)?;
                single("disabled", ValueExpr::Bool(args.bool_or_true(0)?))
            }
            "hidden" => {
                args.count(0..=0)?;
                ModifierExpr::new("hidden", vec![])
            }
            "navigationTitle" | "accessibilityLabel" => {
                args.count(1..=1)?;
                single(&modifier.name, ValueExpr::str(args.str(0)?))
            }
            "onTapGesture" | "onAppear" => {
                args.count(1..=1)?;
                let action: Action = args
                    .get(0)
                    .cloned()
                    .map(serde_json::from_value)
                    .transpose()
                    .map_err(|e| args.invalid(format!("invalid action: {e}")))?
                    .ok_or_else(|| args.invalid("missing action"))?;
                let stmts = self.action(node_id, &action)?;
                ModifierExpr::new(&modifier.name, vec![Arg::labeled("perform", ValueExpr::Action(stmts))])
            }
            other => {
                return Err(BuildError::UnknownModifier {
                    node_id: node_id.to_string(),
                    name: other.to_string(),
                })
            }
        };
        Ok(expr)
    }

    /// A length given either as a token slot or as literal points.
    fn length(&self, args: &Args<'_>, index: usize, kind: TokenKind) -> Result<f64, BuildError> {
        match args.get(index) {
            Some(Value::String(slot)) => self.dimension(args.node_id, &TokenRef::new(kind, slot.as_str())),
            Some(Value::Number(_)) => args.number(index),
            _ => Err(args.invalid(format!("argument {} must be a {kind} token or a number", index + 1))),
        }
    }
}

fn frame_args(args: &Args<'_>) -> Result<Vec<Arg>, BuildError> {
    let value = args.get(0).ok_or_else(|| args.invalid("missing frame object"))?;
    let frame = signatures::frame(value).map_err(|reason| args.invalid(reason))?;
    let mut out: Vec<Arg> = frame
        .dimensions
        .into_iter()
        .map(|(key, dimension)| {
            let expr = match dimension {
                Some(points) => ValueExpr::Number(points),
                None => ValueExpr::member("infinity"),
            };
            Arg::labeled(key, expr)
        })
        .collect();
    if let Some(alignment) = frame.alignment {
        out.push(Arg::labeled("alignment", ValueExpr::member(alignment)));
    }
    Ok(out)
}
