//! The value grammar for HCL attributes.

mod from;
mod ser;

pub use self::ser::to_value;
use crate::number::Number;
use std::fmt;

/// The map type used for objects. Keys keep their insertion order.
pub type Map<K, V> = indexmap::IndexMap<K, V>;

/// A raw HCL expression, for example a variable reference like `var.region` or a function call
/// like `file("user-data.sh")`.
///
/// Raw expressions are rendered verbatim: no quoting and no escaping takes place. The wrapped text
/// is not validated.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct RawExpression(String);

impl RawExpression {
    /// Creates a new `RawExpression` from something that can be converted to a `String`.
    pub fn new<E>(expr: E) -> Self
    where
        E: Into<String>,
    {
        RawExpression(expr.into())
    }

    /// Returns the raw expression as `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RawExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shorthand for `Value::Raw(RawExpression::new(expr))`.
pub fn raw<E>(expr: E) -> Value
where
    E: Into<String>,
{
    Value::Raw(RawExpression::new(expr))
}

/// Represents any value that can be rendered as the right hand side of a HCL attribute.
#[derive(Debug, PartialEq, Clone, Default)]
pub enum Value {
    /// Represents an absent value. Attributes holding `Null` are omitted from the output.
    #[default]
    Null,
    /// Represents a HCL boolean.
    Bool(bool),
    /// Represents a HCL number, either integer or float.
    Number(Number),
    /// Represents a HCL string.
    String(String),
    /// Represents a raw expression that is emitted verbatim.
    Raw(RawExpression),
    /// Represents a HCL tuple.
    Array(Vec<Value>),
    /// Represents a HCL object.
    Object(Map<String, Value>),
}

impl Value {
    /// Returns `true` if the value is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// If the value is a string, returns it as `&str`. Returns `None` otherwise.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is an object, returns a reference to it. Returns `None` otherwise.
    pub fn as_object(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Returns a name for the kind of the value, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(n) if !n.is_finite() => "non-finite float",
            Self::Number(Number::Float(_)) => "float",
            Self::Number(_) => "integer",
            Self::String(_) => "string",
            Self::Raw(_) => "raw expression",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }
}
