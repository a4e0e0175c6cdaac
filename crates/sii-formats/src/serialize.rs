//! Canonical rendering of resolved attributes back to the textual grammar.
//!
//! Output is canonical, not whitespace-preserving: one attribute per line,
//! arrays and lists as indexed entry lines, nested records as indented
//! blocks. Everything emitted here re-parses.

use std::fmt::Write;

use crate::unit::AttributeMap;
use crate::value::Value;

/// Tuple delimiters differ between the two dialects: SII placement data
/// uses parentheses, mat files use braces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TupleStyle {
    Parens,
    Braces,
}

/// Render every attribute of `attrs`, one entry per line, indented `depth`
/// levels using the `indent` unit.
pub(crate) fn write_attributes(
    out: &mut String,
    attrs: &AttributeMap,
    indent: &str,
    depth: usize,
    tuples: TupleStyle,
) {
    for (key, value) in attrs.iter() {
        match value {
            Value::Array(elems) => {
                for (i, slot) in elems.iter().enumerate() {
                    if let Some(element) = slot {
                        write_entry(out, &format!("{key}[{i}]"), element, indent, depth, tuples);
                    }
                }
            }
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    write_entry(out, &format!("{key}[{i}]"), item, indent, depth, tuples);
                }
            }
            _ => write_entry(out, key, value, indent, depth, tuples),
        }
    }
}

/// One `key: value` line, or an indented block for nested records.
fn write_entry(
    out: &mut String,
    key: &str,
    value: &Value,
    indent: &str,
    depth: usize,
    tuples: TupleStyle,
) {
    let pad = indent.repeat(depth);
    match value {
        Value::Nested(unit) => {
            let _ = writeln!(out, "{pad}{key}: \"{}\" {{", unit.instance_name);
            write_attributes(out, &unit.attributes, indent, depth + 1, tuples);
            let _ = writeln!(out, "{pad}}}");
        }
        _ => {
            let _ = writeln!(out, "{pad}{key}: {}", render_scalar(value, tuples));
        }
    }
}

/// Render a scalar value. Arrays, lists and nested records are handled a
/// level up because they span multiple lines.
fn render_scalar(value: &Value, tuples: TupleStyle) -> String {
    match value {
        Value::String(s) => format!("\"{s}\""),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Tuple2(t) => render_tuple(t, tuples),
        Value::Tuple3(t) => render_tuple(t, tuples),
        Value::Tuple4(t) => render_tuple(t, tuples),
        Value::Array(_) | Value::List(_) | Value::Nested(_) => String::new(),
    }
}

fn render_tuple(components: &[f64], tuples: TupleStyle) -> String {
    let joined = components
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    match tuples {
        TupleStyle::Parens => format!("({joined})"),
        TupleStyle::Braces => format!("{{{joined}}}"),
    }
}
