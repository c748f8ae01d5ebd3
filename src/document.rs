//! A whole Terraform configuration file.

use crate::error::Result;
use crate::structure::{Block, BlockArgs};
use crate::value::Value;
use log::debug;
use std::io;
use std::path::Path;

/// An ordered collection of top-level blocks that renders to a Terraform configuration file.
///
/// ## Example
///
/// ```
/// use terraforge::{raw, BlockArgs, Document};
///
/// let mut doc = Document::new();
///
/// doc.add_required_provider("aws", "hashicorp/aws", "~> 5.0");
/// doc.add_provider("aws", BlockArgs::new().value("region", raw("var.region")));
///
/// let expected = r#"terraform {
///   required_providers {
///     aws = {
///       source = "hashicorp/aws"
///       version = "~> 5.0"
///     }
///   }
/// }
///
/// provider "aws" {
///   region = var.region
/// }"#;
///
/// assert_eq!(doc.render()?, expected);
/// # Ok::<(), terraforge::Error>(())
/// ```
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    /// Creates an empty `Document`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the top-level blocks in insertion order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Returns the number of top-level blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns `true` if the document has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Appends a top-level block.
    pub fn add_block(&mut self, block: Block) -> &mut Self {
        debug!(
            "adding block `{}` with labels {:?}",
            block.ident(),
            block.labels()
        );
        self.blocks.push(block);
        self
    }

    /// Returns the first top-level block with type `ident`, if any.
    pub fn find_block(&self, ident: &str) -> Option<&Block> {
        self.blocks.iter().find(|block| block.ident() == ident)
    }

    /// Returns a mutable reference to the first top-level block with type `ident`, if any.
    pub fn find_block_mut(&mut self, ident: &str) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|block| block.ident() == ident)
    }

    /// Returns the first top-level block with type `ident`, appending an empty one if none
    /// exists.
    ///
    /// Calling this repeatedly with the same `ident` always yields the same block.
    pub fn find_or_create_block(&mut self, ident: &str) -> &mut Block {
        let pos = match self.blocks.iter().position(|block| block.ident() == ident) {
            Some(pos) => pos,
            None => {
                log::trace!("creating top-level block `{}`", ident);
                self.blocks.push(Block::empty(ident));
                self.blocks.len() - 1
            }
        };

        &mut self.blocks[pos]
    }

    /// Declares a provider in `terraform { required_providers { ... } }`.
    ///
    /// The `terraform` and `required_providers` blocks are created on first use and reused
    /// afterwards. Declaring the same provider again replaces the earlier `source` and
    /// `version`.
    pub fn add_required_provider<N, S, V>(&mut self, name: N, source: S, version: V) -> &mut Self
    where
        N: Into<String>,
        S: Into<String>,
        V: Into<String>,
    {
        let name = name.into();
        let constraint = Value::from_iter([
            ("source", Value::String(source.into())),
            ("version", Value::String(version.into())),
        ]);

        debug!("declaring required provider `{}`", name);

        self.find_or_create_block("terraform")
            .find_or_create_block("required_providers")
            .set_attribute(name, constraint);
        self
    }

    /// Adds a `provider "<name>"` block.
    pub fn add_provider<N>(&mut self, name: N, args: BlockArgs) -> &mut Self
    where
        N: Into<String>,
    {
        self.add_block(Block::new("provider", [name], args))
    }

    /// Adds a `variable "<name>"` block.
    pub fn add_variable<N>(&mut self, name: N, args: BlockArgs) -> &mut Self
    where
        N: Into<String>,
    {
        self.add_block(Block::new("variable", [name], args))
    }

    /// Adds a `resource "<type>" "<name>"` block.
    pub fn add_resource<T, N>(&mut self, resource_type: T, name: N, args: BlockArgs) -> &mut Self
    where
        T: Into<String>,
        N: Into<String>,
    {
        let labels: [String; 2] = [resource_type.into(), name.into()];
        self.add_block(Block::new("resource", labels, args))
    }

    /// Adds a `data "<type>" "<name>"` block.
    pub fn add_data<T, N>(&mut self, data_type: T, name: N, args: BlockArgs) -> &mut Self
    where
        T: Into<String>,
        N: Into<String>,
    {
        let labels: [String; 2] = [data_type.into(), name.into()];
        self.add_block(Block::new("data", labels, args))
    }

    /// Adds a `module "<name>"` block.
    pub fn add_module<N>(&mut self, name: N, args: BlockArgs) -> &mut Self
    where
        N: Into<String>,
    {
        self.add_block(Block::new("module", [name], args))
    }

    /// Adds an `output "<name>"` block.
    pub fn add_output<N>(&mut self, name: N, args: BlockArgs) -> &mut Self
    where
        N: Into<String>,
    {
        self.add_block(Block::new("output", [name], args))
    }

    /// Adds a `locals` block.
    pub fn add_locals(&mut self, args: BlockArgs) -> &mut Self {
        self.add_block(Block::new("locals", None::<String>, args))
    }

    /// Renders all blocks separated by a blank line. An empty document renders to an empty
    /// string. The result has no trailing newline.
    ///
    /// ## Errors
    ///
    /// Returns `Error::UnsupportedValue` if any attribute value cannot be rendered. Rendering
    /// stops at the first error.
    pub fn render(&self) -> Result<String> {
        let rendered = self
            .blocks
            .iter()
            .map(|block| block.render(0))
            .collect::<Result<Vec<_>>>()?;

        Ok(rendered.join("\n\n"))
    }

    /// Renders the document and writes it to `writer`, followed by a final newline unless the
    /// document is empty.
    ///
    /// Nothing is written if rendering fails.
    pub fn to_writer<W>(&self, mut writer: W) -> Result<()>
    where
        W: io::Write,
    {
        let mut rendered = self.render()?;

        if !rendered.is_empty() {
            rendered.push('\n');
        }

        writer.write_all(rendered.as_bytes())?;
        Ok(writer.flush()?)
    }

    /// Renders the document and writes it to the file at `path`, replacing its contents.
    ///
    /// The document is fully rendered before the file is touched, so a rendering error leaves any
    /// existing file unchanged.
    ///
    /// ## Errors
    ///
    /// Returns `Error::UnsupportedValue` if rendering fails and `Error::Io` if the file cannot be
    /// written.
    pub fn save<P>(&self, path: P) -> Result<()>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let mut buf = Vec::new();
        self.to_writer(&mut buf)?;

        debug!("writing {} bytes to {}", buf.len(), path.display());

        Ok(std::fs::write(path, buf)?)
    }
}

impl Extend<Block> for Document {
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = Block>,
    {
        for block in iter {
            self.add_block(block);
        }
    }
}

impl FromIterator<Block> for Document {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Block>,
    {
        let mut doc = Document::new();
        doc.extend(iter);
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::value::raw;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_empty() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.render().unwrap(), "");

        let mut buf = Vec::new();
        doc.to_writer(&mut buf).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn test_render_separates_blocks_with_blank_line() {
        let mut doc = Document::new();
        doc.add_block(Block::empty("a")).add_block(Block::empty("b"));

        assert_eq!(doc.render().unwrap(), "a {\n}\n\nb {\n}");
    }

    #[test]
    fn test_find_or_create_block_is_idempotent() {
        let mut doc = Document::new();

        let first: *const Block = doc.find_or_create_block("terraform");
        let second: *const Block = doc.find_or_create_block("terraform");

        assert_eq!(first, second);
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_find_or_create_block_reuses_existing() {
        let mut doc = Document::new();
        doc.add_provider("aws", BlockArgs::new());

        let mut terraform = Block::empty("terraform");
        terraform.set_attribute("required_version", ">= 1.5");
        doc.add_block(terraform);

        doc.find_or_create_block("terraform")
            .set_attribute("experiments", Vec::<Value>::new());

        assert_eq!(doc.len(), 2);
        assert_eq!(
            doc.find_block("terraform").unwrap().attributes().count(),
            2
        );
    }

    #[test]
    fn test_find_block_mut() {
        let mut doc = Document::new();
        doc.add_variable("region", BlockArgs::new())
            .add_variable("zones", BlockArgs::new());

        assert!(doc.find_block_mut("output").is_none());

        doc.find_block_mut("variable")
            .unwrap()
            .set_attribute("default", "us-east-1");

        assert_eq!(
            doc.blocks()[0].attribute("default"),
            Some(&Value::from("us-east-1"))
        );
        assert!(doc.blocks()[1].attribute("default").is_none());
    }

    #[test]
    fn test_add_required_provider_overwrites() {
        let mut doc = Document::new();
        doc.add_required_provider("aws", "hashicorp/aws", "~> 4.0")
            .add_required_provider("random", "hashicorp/random", "3.6.0")
            .add_required_provider("aws", "hashicorp/aws", "~> 5.0");

        assert_eq!(doc.len(), 1);

        let terraform = doc.find_block("terraform").unwrap();
        assert_eq!(terraform.blocks().len(), 1);

        let providers = terraform.find_block("required_providers").unwrap();
        assert_eq!(providers.attributes().count(), 2);
        assert_eq!(
            providers.attribute("aws"),
            Some(&Value::from_iter([
                ("source", "hashicorp/aws"),
                ("version", "~> 5.0")
            ]))
        );
    }

    #[test]
    fn test_add_required_provider_keeps_existing_terraform_block() {
        let mut doc = Document::new();
        doc.add_block(Block::new(
            "terraform",
            None::<String>,
            BlockArgs::new()
                .value("required_version", ">= 1.5")
                .block("backend", BlockArgs::new()),
        ));
        doc.add_required_provider("aws", "hashicorp/aws", "~> 5.0");

        let expected = r#"terraform {
  required_version = ">= 1.5"

  backend {
  }
  required_providers {
    aws = {
      source = "hashicorp/aws"
      version = "~> 5.0"
    }
  }
}"#;

        assert_eq!(doc.render().unwrap(), expected);
    }

    #[test]
    fn test_helpers() {
        let mut doc = Document::new();
        doc.add_provider("aws", BlockArgs::new())
            .add_variable("region", BlockArgs::new())
            .add_resource("aws_instance", "web", BlockArgs::new())
            .add_data("aws_ami", "ubuntu", BlockArgs::new())
            .add_module("vpc", BlockArgs::new())
            .add_output("ip", BlockArgs::new())
            .add_locals(BlockArgs::new());

        let headers: Vec<(&str, Vec<&str>)> = doc
            .blocks()
            .iter()
            .map(|b| (b.ident(), b.labels().iter().map(String::as_str).collect()))
            .collect();

        assert_eq!(
            headers,
            vec![
                ("provider", vec!["aws"]),
                ("variable", vec!["region"]),
                ("resource", vec!["aws_instance", "web"]),
                ("data", vec!["aws_ami", "ubuntu"]),
                ("module", vec!["vpc"]),
                ("output", vec!["ip"]),
                ("locals", vec![]),
            ]
        );
    }

    #[test]
    fn test_render_aborts_on_unsupported_value() {
        let mut doc = Document::new();
        doc.add_variable("ok", BlockArgs::new().value("default", 1));
        doc.add_variable("bad", BlockArgs::new().value("default", f64::NAN));

        let err = doc.render().unwrap_err();
        assert!(matches!(err, Error::UnsupportedValue { .. }));
        assert_eq!(
            err.to_string(),
            "unsupported value of kind `non-finite float` at `variable.bad.default`"
        );
        assert!(doc.to_writer(Vec::new()).is_err());
    }

    #[test]
    fn test_render_unsupported_value_does_not_panic() {
        let mut doc = Document::new();
        doc.add_variable("bad", BlockArgs::new().value("default", f64::NAN));

        let result = std::panic::catch_unwind(|| doc.render());

        assert!(matches!(result, Ok(Err(Error::UnsupportedValue { .. }))));
    }

    #[test]
    fn test_from_iter() {
        let doc: Document = vec![Block::empty("a"), Block::empty("b")].into_iter().collect();
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_to_writer_appends_newline() {
        let mut doc = Document::new();
        doc.add_locals(BlockArgs::new().value("name", raw("var.name")));

        let mut buf = Vec::new();
        doc.to_writer(&mut buf).unwrap();

        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "locals {\n  name = var.name\n}\n"
        );
    }
}
