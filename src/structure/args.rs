use crate::value::{Map, Value};

/// A single named constructor argument of a [`Block`](super::Block).
#[derive(Debug, PartialEq, Clone)]
pub enum Argument {
    /// Becomes an attribute of the block under construction.
    Value(Value),
    /// Becomes a nested block whose type is the argument's name.
    Block(BlockArgs),
}

impl From<Value> for Argument {
    fn from(value: Value) -> Self {
        Argument::Value(value)
    }
}

impl From<BlockArgs> for Argument {
    fn from(args: BlockArgs) -> Self {
        Argument::Block(args)
    }
}

/// The named arguments a [`Block`](super::Block) is constructed from.
///
/// Each argument is either a plain value, which becomes an attribute, or another `BlockArgs`,
/// which becomes a nested block named after the argument. This is the only way to tell the two
/// apart: a `Value::Object` is always rendered as an object literal, never as a block.
///
/// Arguments keep their insertion order, which determines the order of the resulting nested
/// blocks. Setting the same name twice replaces the earlier argument.
///
/// ## Example
///
/// ```
/// use terraforge::{Block, BlockArgs};
///
/// let args = BlockArgs::new()
///     .value("ami", "ami-123")
///     .block("tags", BlockArgs::new().value("Name", "web"));
///
/// let block = Block::new("resource", ["aws_instance", "web"], args);
///
/// assert!(block.attribute("tags").is_none());
/// assert!(block.find_block("tags").is_some());
/// ```
#[derive(Debug, PartialEq, Clone, Default)]
pub struct BlockArgs(Map<String, Argument>);

impl BlockArgs {
    /// Creates an empty `BlockArgs`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an argument which becomes an attribute and returns the modified `BlockArgs`.
    pub fn value<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.insert(key, value.into());
        self
    }

    /// Adds an argument which becomes a nested block and returns the modified `BlockArgs`.
    pub fn block<K>(mut self, key: K, args: BlockArgs) -> Self
    where
        K: Into<String>,
    {
        self.insert(key, args);
        self
    }

    /// Inserts an argument, replacing any previous argument with the same name.
    pub fn insert<K, A>(&mut self, key: K, arg: A)
    where
        K: Into<String>,
        A: Into<Argument>,
    {
        self.0.insert(key.into(), arg.into());
    }

    /// Returns the argument with name `key`, if any.
    pub fn get(&self, key: &str) -> Option<&Argument> {
        self.0.get(key)
    }

    /// Returns the number of arguments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no arguments.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the arguments in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Argument)> {
        self.0.iter()
    }
}

impl IntoIterator for BlockArgs {
    type Item = (String, Argument);
    type IntoIter = indexmap::map::IntoIter<String, Argument>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<K, A> FromIterator<(K, A)> for BlockArgs
where
    K: Into<String>,
    A: Into<Argument>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, A)>,
    {
        BlockArgs(
            iter.into_iter()
                .map(|(k, a)| (k.into(), a.into()))
                .collect(),
        )
    }
}

impl<K, A> Extend<(K, A)> for BlockArgs
where
    K: Into<String>,
    A: Into<Argument>,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (K, A)>,
    {
        for (key, arg) in iter {
            self.insert(key, arg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builder_keeps_order_and_replaces() {
        let args = BlockArgs::new()
            .value("b", 1)
            .block("nested", BlockArgs::new())
            .value("a", 2)
            .value("b", 3);

        let keys: Vec<&str> = args.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["b", "nested", "a"]);
        assert_eq!(args.get("b"), Some(&Argument::Value(Value::from(3))));
        assert_eq!(args.len(), 3);
    }

    #[test]
    fn test_object_value_is_not_a_block() {
        let args = BlockArgs::new().value("tags", Value::from_iter([("Name", "web")]));
        assert!(matches!(args.get("tags"), Some(Argument::Value(Value::Object(_)))));
    }

    #[test]
    fn test_from_iter() {
        let args = BlockArgs::from_iter([
            ("count", Argument::from(Value::from(2))),
            ("lifecycle", Argument::from(BlockArgs::new())),
        ]);

        assert!(matches!(args.get("count"), Some(Argument::Value(_))));
        assert!(matches!(args.get("lifecycle"), Some(Argument::Block(_))));
        assert!(!args.is_empty());
    }
}
