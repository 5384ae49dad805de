//! Deterministic SwiftUI source printer.
//!
//! The printer walks the IR in order and emits one line per view, one chained
//! line per modifier and one indentation level per closure. Output depends on
//! nothing but the IR and the indent width, so printing twice gives the same
//! bytes.

mod files;
pub mod swift;

pub use files::{entry_path, model_path, print_entry, print_model, print_screen, screen_path, GeneratedFile};

use crate::ir::{Closure, ModifierExpr, UiExpr};

/// Line-oriented source writer.
#[derive(Debug, Clone)]
pub struct Printer {
    indent_width: usize,
    lines: Vec<String>,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new(4)
    }
}

impl Printer {
    pub fn new(indent_width: usize) -> Self {
        Self {
            indent_width,
            lines: Vec::new(),
        }
    }

    /// Write one line at the given depth. Empty text yields an empty line.
    pub fn line(&mut self, depth: usize, text: impl AsRef<str>) {
        let text = text.as_ref();
        if text.is_empty() {
            self.lines.push(String::new());
        } else {
            self.lines.push(format!("{}{text}", " ".repeat(depth * self.indent_width)));
        }
    }

    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    /// Print a view expression starting at `depth`.
    pub fn expr(&mut self, expr: &UiExpr, depth: usize) {
        match expr {
            UiExpr::Leaf { kind, args } => {
                self.line(depth, format!("{}({})", kind.name(), swift::args(args)));
            }
            UiExpr::Container {
                kind,
                args,
                children,
                trailing,
            } => {
                let head = if args.is_empty() {
                    kind.name().to_string()
                } else {
                    format!("{}({})", kind.name(), swift::args(args))
                };
                self.line(depth, format!("{head} {{"));
                for child in children {
                    self.expr(child, depth + 1);
                }
                for closure in trailing {
                    self.closure_continuation(closure, depth);
                }
                self.line(depth, "}");
            }
            UiExpr::Modified { inner, chain } => {
                // Modifiers cannot follow an `if` statement directly.
                if let UiExpr::Conditional { .. } = inner.as_ref() {
                    self.line(depth, "Group {");
                    self.expr(inner, depth + 1);
                    self.line(depth, "}");
                } else {
                    self.expr(inner, depth);
                }
                for modifier in chain {
                    self.modifier(modifier, depth + 1);
                }
            }
            UiExpr::Conditional {
                condition,
                then,
                otherwise,
            } => {
                self.line(depth, format!("if {} {{", swift::value(condition)));
                for child in then {
                    self.expr(child, depth + 1);
                }
                if !otherwise.is_empty() {
                    self.line(depth, "} else {");
                    for child in otherwise {
                        self.expr(child, depth + 1);
                    }
                }
                self.line(depth, "}");
            }
        }
    }

    fn modifier(&mut self, modifier: &ModifierExpr, depth: usize) {
        let call = if modifier.args.is_empty() && !modifier.trailing.is_empty() {
            format!(".{}", modifier.name)
        } else {
            format!(".{}({})", modifier.name, swift::args(&modifier.args))
        };

        let Some((first, rest)) = modifier.trailing.split_first() else {
            self.line(depth, call);
            return;
        };

        self.line(depth, format!("{call} {}", open_brace(first)));
        for child in &first.body {
            self.expr(child, depth + 1);
        }
        for closure in rest {
            self.closure_continuation(closure, depth);
        }
        self.line(depth, "}");
    }

    /// `} label: {` followed by the closure body.
    fn closure_continuation(&mut self, closure: &Closure, depth: usize) {
        let label = closure.label.as_deref().unwrap_or("content");
        self.line(depth, format!("}} {label}: {}", open_brace(closure)));
        for child in &closure.body {
            self.expr(child, depth + 1);
        }
    }

    /// Consume the printer, returning the text with a trailing newline.
    pub fn finish(self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}

fn open_brace(closure: &Closure) -> String {
    if closure.params.is_empty() {
        "{".to_string()
    } else {
        format!("{{ {} in", closure.params.join(", "))
    }
}

/// Print one view expression at depth zero with the default indent.
pub fn print(expr: &UiExpr) -> String {
    let mut printer = Printer::default();
    printer.expr(expr, 0);
    printer.finish()
}
