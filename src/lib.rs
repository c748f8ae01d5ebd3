#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub use document::Document;
pub use error::*;
pub use number::Number;
pub use structure::{Argument, Block, BlockArgs};
pub use value::{raw, to_value, Map, RawExpression, Value};

mod document;
mod error;
pub mod format;
mod number;
mod structure;
mod value;
