//! The HCL block model.

mod args;

pub use self::args::{Argument, BlockArgs};
use crate::error::{Path, Result};
use crate::format::{indent, render_value_at, write_key, write_quoted};
use crate::value::{to_value, Value};
use serde::Serialize;
use std::collections::BTreeMap;

/// A HCL block which has a type, zero or more labels, attributes and nested blocks.
///
/// Attributes are rendered sorted by key, so their insertion order does not matter. Nested blocks
/// are rendered in the order they were added.
#[derive(Debug, PartialEq, Clone)]
pub struct Block {
    ident: String,
    labels: Vec<String>,
    attributes: BTreeMap<String, Value>,
    blocks: Vec<Block>,
}

impl Block {
    /// Creates a new `Block` from a type, labels and named arguments.
    ///
    /// Arguments holding a [`BlockArgs`] become nested blocks (recursively, without labels), all
    /// other arguments become attributes.
    pub fn new<I, L>(ident: I, labels: L, args: BlockArgs) -> Block
    where
        I: Into<String>,
        L: IntoIterator,
        L::Item: Into<String>,
    {
        let mut block = Block {
            ident: ident.into(),
            labels: labels.into_iter().map(Into::into).collect(),
            attributes: BTreeMap::new(),
            blocks: Vec::new(),
        };

        for (key, arg) in args {
            match arg {
                Argument::Block(args) => {
                    block.add_block(Block::new(key, None::<String>, args));
                }
                Argument::Value(value) => {
                    block.set_attribute(key, value);
                }
            }
        }

        block
    }

    /// Creates a `Block` without labels, attributes and nested blocks.
    pub fn empty<I>(ident: I) -> Block
    where
        I: Into<String>,
    {
        Block::new(ident, None::<String>, BlockArgs::new())
    }

    /// Returns the block type.
    pub fn ident(&self) -> &str {
        &self.ident
    }

    /// Returns the block labels.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Returns the value of attribute `key`, if set.
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Returns an iterator over the attributes, sorted by key.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the nested blocks in insertion order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Sets attribute `key` to `value`, replacing any previous value.
    ///
    /// Attributes set to `Value::Null` are kept but omitted from the rendered output. Keys that
    /// are not valid HCL identifiers are rendered quoted.
    pub fn set_attribute<K, V>(&mut self, key: K, value: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Sets attribute `key` to the `Value` representation of `value`.
    ///
    /// ## Errors
    ///
    /// Returns `Error::UnsupportedValue` if `value` cannot be converted. The error path starts
    /// with this block's type and labels followed by `key`.
    pub fn try_set_attribute<K, T>(&mut self, key: K, value: &T) -> Result<&mut Self>
    where
        K: Into<String>,
        T: ?Sized + Serialize,
    {
        let key = key.into();

        let value = to_value(value).map_err(|err| {
            let err = err.within(key.as_str());

            self.path()
                .segments()
                .iter()
                .rev()
                .fold(err, |err, segment| err.within(segment.clone()))
        })?;

        Ok(self.set_attribute(key, value))
    }

    /// Appends a nested block. Blocks of the same type may be added multiple times.
    pub fn add_block(&mut self, block: Block) -> &mut Self {
        self.blocks.push(block);
        self
    }

    /// Returns the first nested block with type `ident`, if any.
    pub fn find_block(&self, ident: &str) -> Option<&Block> {
        self.blocks.iter().find(|block| block.ident == ident)
    }

    /// Returns a mutable reference to the first nested block with type `ident`, if any.
    pub fn find_block_mut(&mut self, ident: &str) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|block| block.ident == ident)
    }

    /// Returns the first nested block with type `ident`, appending an empty one if none exists.
    pub fn find_or_create_block(&mut self, ident: &str) -> &mut Block {
        let pos = match self.blocks.iter().position(|block| block.ident == ident) {
            Some(pos) => pos,
            None => {
                log::trace!("creating nested block `{}` in `{}`", ident, self.ident);
                self.blocks.push(Block::empty(ident));
                self.blocks.len() - 1
            }
        };

        &mut self.blocks[pos]
    }

    /// Renders the block as HCL text at indentation `depth`, without a trailing newline.
    ///
    /// ## Errors
    ///
    /// Returns `Error::UnsupportedValue` if any attribute value, including those of nested
    /// blocks, cannot be rendered.
    pub fn render(&self, depth: usize) -> Result<String> {
        let mut buf = String::new();
        self.write(&mut buf, depth, &mut Path::new())?;
        Ok(buf)
    }

    fn path(&self) -> Path {
        std::iter::once(self.ident.as_str())
            .chain(self.labels.iter().map(String::as_str))
            .collect()
    }

    fn write(&self, buf: &mut String, depth: usize, path: &mut Path) -> Result<()> {
        let prefix = indent(depth);
        let attr_prefix = indent(depth + 1);

        buf.push_str(&prefix);
        buf.push_str(&self.ident);

        for label in &self.labels {
            buf.push(' ');
            write_quoted(buf, label);
        }

        buf.push_str(" {\n");

        path.push(self.ident.as_str());
        for label in &self.labels {
            path.push(label.as_str());
        }

        let mut has_attributes = false;

        for (key, value) in self.attributes.iter().filter(|(_, v)| !v.is_null()) {
            path.push(key.as_str());
            let rendered = render_value_at(value, depth + 1, path)?;
            path.pop();

            buf.push_str(&attr_prefix);
            write_key(buf, key);
            buf.push_str(" = ");
            buf.push_str(&rendered);
            buf.push('\n');
            has_attributes = true;
        }

        if has_attributes && !self.blocks.is_empty() {
            buf.push('\n');
        }

        for block in &self.blocks {
            block.write(buf, depth + 1, path)?;
            buf.push('\n');
        }

        for _ in 0..=self.labels.len() {
            path.pop();
        }

        buf.push_str(&prefix);
        buf.push('}');
        Ok(())
    }
}
