//! Defines the `Error` and `Result` types used by this crate.

use serde::ser;
use std::fmt::{self, Display};
use thiserror::Error;

/// A type alias for `Result<T, Error>`.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The error returned by all fallible operations within this crate.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    /// A generic error message, usually emitted by a custom `Serialize` implementation.
    #[error("{0}")]
    Message(String),

    /// Indicates that a value cannot be expressed in HCL.
    #[error("unsupported value of kind `{kind}` at `{path}`")]
    UnsupportedValue {
        /// Path of the attribute holding the value, e.g. `resource.aws_instance.web.tags`.
        path: Path,
        /// Human readable name of the offending value's kind.
        kind: String,
    },

    /// IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn new<T>(message: T) -> Self
    where
        T: AsRef<str>,
    {
        Self::Message(message.as_ref().to_string())
    }

    pub(crate) fn unsupported<K>(path: Path, kind: K) -> Self
    where
        K: AsRef<str>,
    {
        Self::UnsupportedValue {
            path,
            kind: kind.as_ref().to_string(),
        }
    }

    /// Prepends `segment` to the path of an `UnsupportedValue` error. Other errors are returned
    /// unchanged.
    pub(crate) fn within<S>(self, segment: S) -> Self
    where
        S: Into<PathSegment>,
    {
        match self {
            Self::UnsupportedValue { mut path, kind } => {
                path.segments.insert(0, segment.into());
                Self::UnsupportedValue { path, kind }
            }
            err => err,
        }
    }
}

impl ser::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::new(msg.to_string())
    }
}

/// A single step in a `Path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A block type, block label, attribute name or object key.
    Key(String),
    /// An array index.
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_owned())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// Location of a value within a document, used for diagnostics.
///
/// Displays as dotted keys with bracketed array indices, e.g. `variable.zones.default[1]`. The
/// empty path displays as `<root>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    /// Creates an empty `Path`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the path segments.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Returns `true` if the path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub(crate) fn push<S>(&mut self, segment: S)
    where
        S: Into<PathSegment>,
    {
        self.segments.push(segment.into());
    }

    pub(crate) fn pop(&mut self) {
        self.segments.pop();
    }
}

impl<S> FromIterator<S> for Path
where
    S: Into<PathSegment>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        Path {
            segments: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("<root>");
        }

        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => f.write_str(key)?,
                PathSegment::Key(key) => write!(f, ".{}", key)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }

        Ok(())
    }
}
