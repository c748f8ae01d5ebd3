//! Renders values as HCL text.
//!
//! Indentation is two spaces per level. Nested arrays and objects are rendered one level deeper
//! than their parent, with the closing bracket aligned to the parent's indentation.

use crate::error::{Error, Path, Result};
use crate::value::Value;
use std::fmt::Write;

const INDENT: &str = "  ";

/// Returns the indentation prefix for `depth`.
pub(crate) fn indent(depth: usize) -> String {
    INDENT.repeat(depth)
}

/// Renders `value` as HCL text at indentation `depth`.
///
/// The first line is not indented; the caller is expected to have written the prefix already
/// (e.g. `key = `). Subsequent lines of nested arrays and objects are indented relative to
/// `depth`.
///
/// ## Errors
///
/// Returns `Error::UnsupportedValue` if the value contains a float that is `NaN` or infinite.
///
/// ## Example
///
/// ```
/// use terraforge::{format::render_value, Value};
///
/// let value = Value::from(vec!["a", "b"]);
///
/// assert_eq!(render_value(&value, 1)?, "[\n    \"a\",\n    \"b\",\n  ]");
/// # Ok::<(), terraforge::Error>(())
/// ```
pub fn render_value(value: &Value, depth: usize) -> Result<String> {
    let mut path = Path::new();
    render_value_at(value, depth, &mut path)
}

pub(crate) fn render_value_at(value: &Value, depth: usize, path: &mut Path) -> Result<String> {
    let mut buf = String::new();
    write_value(&mut buf, value, depth, path)?;
    Ok(buf)
}

fn write_value(buf: &mut String, value: &Value, depth: usize, path: &mut Path) -> Result<()> {
    match value {
        Value::Null => buf.push_str("null"),
        Value::Bool(b) => buf.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) if !n.is_finite() => {
            return Err(Error::unsupported(path.clone(), value.kind()))
        }
        Value::Number(n) => push_display(buf, n),
        Value::String(s) => write_quoted(buf, s),
        Value::Raw(expr) => buf.push_str(expr.as_str()),
        Value::Array(array) if array.is_empty() => buf.push_str("[]"),
        Value::Array(array) => {
            let prefix = indent(depth + 1);
            buf.push_str("[\n");

            for (index, item) in array.iter().enumerate() {
                buf.push_str(&prefix);
                path.push(index);
                write_value(buf, item, depth + 1, path)?;
                path.pop();
                buf.push_str(",\n");
            }

            buf.push_str(&indent(depth));
            buf.push(']');
        }
        Value::Object(object) if object.is_empty() => buf.push_str("{}"),
        Value::Object(object) => {
            let prefix = indent(depth + 1);
            buf.push_str("{\n");

            for (key, item) in object {
                buf.push_str(&prefix);
                write_key(buf, key);
                buf.push_str(" = ");
                path.push(key.as_str());
                write_value(buf, item, depth + 1, path)?;
                path.pop();
                buf.push('\n');
            }

            buf.push_str(&indent(depth));
            buf.push('}');
        }
    }

    Ok(())
}

fn push_display<T>(buf: &mut String, value: T)
where
    T: std::fmt::Display,
{
    // Writing into a `String` cannot fail.
    let _ = write!(buf, "{}", value);
}

/// Writes `s` as a double quoted HCL string literal.
pub(crate) fn write_quoted(buf: &mut String, s: &str) {
    buf.reserve(s.len() + 2);
    buf.push('"');

    for ch in s.chars() {
        match ch {
            '"' => buf.push_str("\\\""),
            '\\' => buf.push_str("\\\\"),
            '\n' => buf.push_str("\\n"),
            '\r' => buf.push_str("\\r"),
            '\t' => buf.push_str("\\t"),
            ch => buf.push(ch),
        }
    }

    buf.push('"');
}

/// Object keys are written bare if they are valid identifiers and quoted otherwise.
pub(crate) fn write_key(buf: &mut String, key: &str) {
    if is_identifier(key) {
        buf.push_str(key);
    } else {
        write_quoted(buf, key);
    }
}

/// Returns `true` if `s` is a valid HCL identifier.
pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();

    match chars.next() {
        Some(ch) if ch.is_alphabetic() || ch == '_' => {}
        _ => return false,
    }

    chars.all(|ch| ch.is_alphanumeric() || ch == '_' || ch == '-')
}
