//! Map-backed configuration instance
//!
//! Storage order is irrelevant: the navigator always walks in schema order.

use std::collections::BTreeMap;

use super::{ConfigNode, Field, LeafValue};

/// A stored field
#[derive(Debug, Clone, PartialEq)]
pub enum DataItem {
    Container(DataNode),
    List(Vec<DataNode>),
    Leaf(LeafValue),
}

/// Generic structural node: root, container or list entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataNode {
    fields: BTreeMap<String, DataItem>,
}

impl DataNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a leaf (or leaf-list) value.
    pub fn leaf(mut self, name: &str, value: impl Into<LeafValue>) -> Self {
        self.set_leaf(name, value);
        self
    }

    /// Set a child container.
    pub fn container(mut self, name: &str, node: DataNode) -> Self {
        self.fields
            .insert(name.to_string(), DataItem::Container(node));
        self
    }

    /// Append an entry to a list, creating the list if needed.
    pub fn entry(mut self, name: &str, node: DataNode) -> Self {
        self.push_entry(name, node);
        self
    }

    pub fn set_leaf(&mut self, name: &str, value: impl Into<LeafValue>) {
        self.fields
            .insert(name.to_string(), DataItem::Leaf(value.into()));
    }

    pub fn push_entry(&mut self, name: &str, node: DataNode) {
        match self.fields.get_mut(name) {
            Some(DataItem::List(entries)) => entries.push(node),
            _ => {
                self.fields.insert(name.to_string(), DataItem::List(vec![node]));
            }
        }
    }

    /// Unset a field, returning what it held.
    pub fn remove(&mut self, name: &str) -> Option<DataItem> {
        self.fields.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&DataItem> {
        self.fields.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl ConfigNode for DataNode {
    fn field(&self, name: &str) -> Option<Field<'_>> {
        let field = match self.fields.get(name)? {
            DataItem::Container(node) => Field::Container(node),
            DataItem::List(entries) => Field::List(entries),
            DataItem::Leaf(value) => Field::Leaf(value.clone()),
        };
        Some(field)
    }

    fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_lookup() {
        let node = DataNode::new()
            .leaf("leaf1a", "leaf1aval")
            .container("cont2a", DataNode::new().leaf("leaf2g", true))
            .entry("list2a", DataNode::new().leaf("name", "l2a1"))
            .entry("list2a", DataNode::new().leaf("name", "l2a2"));

        assert_eq!(node.field_names(), vec!["cont2a", "leaf1a", "list2a"]);
        assert!(matches!(
            node.field("leaf1a"),
            Some(Field::Leaf(LeafValue::String(s))) if s == "leaf1aval"
        ));
        match node.field("list2a") {
            Some(Field::List(entries)) => {
                assert_eq!(entries.len(), 2);
                assert!(entries.entry(1).is_some());
                assert!(entries.entry(2).is_none());
            }
            other => panic!("expected list, got {:?}", other),
        }
        assert!(node.field("leaf2c").is_none());
    }

    #[test]
    fn test_remove_unsets_field() {
        let mut node = DataNode::new().leaf("a", 1u8);
        assert!(node.remove("a").is_some());
        assert!(node.field("a").is_none());
        assert!(node.is_empty());
    }
}
