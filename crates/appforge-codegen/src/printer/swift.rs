//! Rendering of value expressions and literals.

use crate::ir::{Arg, Stmt, ValueExpr};

/// Escape a string for use inside a Swift string literal.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c if c.is_control() => out.push_str(&format!("\\u{{{:X}}}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

pub fn string_literal(value: &str) -> String {
    format!("\"{}\"", escape(value))
}

/// Format a number as the shortest literal that reads back to the same value.
///
/// Integral values print without a fraction; very large or very small
/// magnitudes switch to exponent notation.
pub fn number(value: f64) -> String {
    if value.is_nan() {
        return "Double.nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { ".infinity" } else { "-.infinity" }.to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    let plain = value.to_string();
    if plain.len() <= 21 {
        plain
    } else {
        format!("{value:e}")
    }
}

pub fn args(args: &[Arg]) -> String {
    args.iter()
        .map(|arg| match &arg.label {
            Some(label) => format!("{label}: {}", value(&arg.value)),
            None => value(&arg.value),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn value(expr: &ValueExpr) -> String {
    match expr {
        ValueExpr::Str(s) => string_literal(s),
        ValueExpr::Interpolation(path) => format!("\"\\({path})\""),
        ValueExpr::Int(i) => i.to_string(),
        ValueExpr::Number(n) => number(*n),
        ValueExpr::Bool(b) => b.to_string(),
        ValueExpr::Member(name) => format!(".{name}"),
        ValueExpr::Ident(name) => name.clone(),
        ValueExpr::Binding(path) => format!("${path}"),
        ValueExpr::Constant(inner) => format!(".constant({})", value(inner)),
        ValueExpr::Color(rgba) => {
            let mut out = format!(
                "Color(red: {:.3}, green: {:.3}, blue: {:.3}",
                rgba.r, rgba.g, rgba.b
            );
            if rgba.a < 1.0 {
                out.push_str(&format!(", opacity: {:.3}", rgba.a));
            }
            out.push(')');
            out
        }
        ValueExpr::Font { size, weight, design } => {
            format!(".system(size: {}, weight: {weight}, design: {design})", number(*size))
        }
        ValueExpr::Call { callee, args: call_args } => format!("{callee}({})", args(call_args)),
        ValueExpr::Method {
            receiver,
            name,
            args: call_args,
        } => format!("{}.{name}({})", value(receiver), args(call_args)),
        ValueExpr::Array(items) => format!(
            "[{}]",
            items.iter().map(value).collect::<Vec<_>>().join(", ")
        ),
        ValueExpr::Range(lo, hi) => format!("{}...{}", value(lo), value(hi)),
        ValueExpr::Action(stmts) if stmts.is_empty() => "{}".to_string(),
        ValueExpr::Action(stmts) => format!(
            "{{ {} }}",
            stmts.iter().map(stmt).collect::<Vec<_>>().join("; ")
        ),
        ValueExpr::Nil => "nil".to_string(),
    }
}

pub fn stmt(stmt: &Stmt) -> String {
    match stmt {
        Stmt::Navigate { route } => format!("router.navigate(to: .{route})"),
        Stmt::Present { flag } => format!("{flag} = true"),
        Stmt::Dismiss => "dismiss()".to_string(),
        Stmt::Invoke { name, args: call_args } => format!("{name}({})", args(call_args)),
    }
}
