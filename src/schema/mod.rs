//! Schema Index - Arena-based YANG tree description
//!
//! Read-only description of the configuration tree shape:
//! - Arena of schema nodes indexed by `SchemaId`
//! - Declaration-ordered children per node
//! - Precomputed traversal order (list keys first)
//! - Module prefix and namespace per node
//!
//! Built once with [`SchemaBuilder`] and shared by every cursor.

pub mod builder;

pub use builder::{NodeBuilder, SchemaBuilder};

use std::collections::HashMap;

use crate::data::{ConfigNode, Field, LeafValue};
use crate::error::{Error, Result};

/// Compact schema node identifier (index into arena)
pub type SchemaId = u32;

/// Structural kind of a schema node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    /// Synthetic document root
    Root,
    Container,
    List,
    Leaf,
    LeafList,
}

/// A YANG module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub name: String,
    pub prefix: String,
    pub namespace: String,
}

/// A schema node in the arena
#[derive(Debug, Clone)]
pub struct SchemaNode {
    pub name: String,
    pub kind: SchemaKind,
    pub parent: Option<SchemaId>,
    /// Index into the module table, `None` for the root
    module: Option<usize>,
    /// Children in declaration order
    children: Vec<SchemaId>,
    /// Children in cursor order: keys first for lists
    traversal: Vec<SchemaId>,
    /// Key leaf names, declared order (lists only)
    keys: Vec<String>,
    is_key: bool,
}

/// Borrowed description of one declared child
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildDescriptor<'s> {
    pub id: SchemaId,
    pub name: &'s str,
    pub kind: SchemaKind,
    pub prefix: &'s str,
    pub is_key: bool,
}

/// Immutable schema arena
#[derive(Debug, Clone)]
pub struct SchemaIndex {
    nodes: Vec<SchemaNode>,
    modules: Vec<Module>,
    lookup: HashMap<(SchemaId, String), SchemaId>,
}

impl SchemaIndex {
    /// Start declaring a schema whose synthetic root is named `root_name`.
    pub fn builder(root_name: &str) -> SchemaBuilder {
        SchemaBuilder::new(root_name)
    }

    pub(crate) fn from_parts(nodes: Vec<SchemaNode>, modules: Vec<Module>) -> Self {
        let mut lookup = HashMap::with_capacity(nodes.len());
        for (id, node) in nodes.iter().enumerate() {
            if let Some(parent) = node.parent {
                lookup.insert((parent, node.name.clone()), id as SchemaId);
            }
        }
        SchemaIndex {
            nodes,
            modules,
            lookup,
        }
    }

    /// Root node ID
    pub fn root(&self) -> SchemaId {
        0
    }

    /// Number of schema nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a node by ID
    pub fn node(&self, id: SchemaId) -> &SchemaNode {
        &self.nodes[id as usize]
    }

    pub fn name(&self, id: SchemaId) -> &str {
        &self.node(id).name
    }

    pub fn kind(&self, id: SchemaId) -> SchemaKind {
        self.node(id).kind
    }

    pub fn parent(&self, id: SchemaId) -> Option<SchemaId> {
        self.node(id).parent
    }

    /// Prefix of the module declaring this node; empty for the root.
    pub fn module_prefix(&self, id: SchemaId) -> &str {
        self.module_of(id).map(|m| m.prefix.as_str()).unwrap_or("")
    }

    /// Namespace URI of the module declaring this node; empty for the root.
    pub fn namespace(&self, id: SchemaId) -> &str {
        self.module_of(id).map(|m| m.namespace.as_str()).unwrap_or("")
    }

    pub fn module_of(&self, id: SchemaId) -> Option<&Module> {
        self.node(id).module.map(|m| &self.modules[m])
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// Declared children in declaration order.
    pub fn children_of(&self, id: SchemaId) -> impl Iterator<Item = ChildDescriptor<'_>> + '_ {
        self.node(id).children.iter().map(move |&child| {
            let node = self.node(child);
            ChildDescriptor {
                id: child,
                name: &node.name,
                kind: node.kind,
                prefix: self.module_prefix(child),
                is_key: node.is_key,
            }
        })
    }

    /// Children in the order a cursor visits them: for a list, its keys in
    /// declared key order, then the remaining children in declaration order.
    pub fn traversal_order(&self, id: SchemaId) -> &[SchemaId] {
        &self.node(id).traversal
    }

    /// Key names of a list, in declared order.
    pub fn keys(&self, id: SchemaId) -> &[String] {
        &self.node(id).keys
    }

    /// Whether the node is a key leaf of its parent list.
    pub fn is_key(&self, id: SchemaId) -> bool {
        self.node(id).is_key
    }

    /// Look up a declared child by name.
    pub fn child(&self, id: SchemaId, name: &str) -> Result<SchemaId> {
        self.lookup
            .get(&(id, name.to_string()))
            .copied()
            .ok_or_else(|| {
                Error::mismatch(self.path(id), format!("unknown field '{}'", name))
            })
    }

    /// Whether `field` is a key of the list `id`.
    pub fn is_list_key(&self, id: SchemaId, field: &str) -> Result<bool> {
        let child = self.child(id, field)?;
        Ok(self.node(child).is_key)
    }

    /// Slash-separated schema path, used in diagnostics.
    pub fn path(&self, id: SchemaId) -> String {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id);
            if node.parent.is_some() {
                let prefix = self.module_prefix(node_id);
                names.push(format!("{}:{}", prefix, node.name));
            }
            current = node.parent;
        }
        names.reverse();
        format!("/{}", names.join("/"))
    }

    /// Check an instance tree against the schema.
    ///
    /// Reports the first unknown field, kind disagreement, list entry
    /// without a key, or unrenderable leaf value.
    pub fn validate(&self, root: &dyn ConfigNode) -> Result<()> {
        self.validate_node(self.root(), root)?;
        tracing::debug!(nodes = self.nodes.len(), "instance validated against schema");
        Ok(())
    }

    fn validate_node(&self, id: SchemaId, data: &dyn ConfigNode) -> Result<()> {
        for name in data.field_names() {
            self.child(id, name)?;
        }

        for &child in &self.node(id).children {
            let node = self.node(child);
            let Some(field) = data.field(&node.name) else {
                continue;
            };
            match (node.kind, field) {
                (SchemaKind::Container, Field::Container(inner)) => {
                    self.validate_node(child, inner)?;
                }
                (SchemaKind::List, Field::List(entries)) => {
                    for entry in (0..entries.len()).filter_map(|i| entries.entry(i)) {
                        for key in &node.keys {
                            if entry.field(key).is_none() {
                                return Err(Error::mismatch(
                                    self.path(child),
                                    format!("list entry missing key '{}'", key),
                                ));
                            }
                        }
                        self.validate_node(child, entry)?;
                    }
                }
                (SchemaKind::Leaf, Field::Leaf(value)) if !matches!(value, LeafValue::List(_)) => {
                    value.render().map_err(|e| e.at(self.path(child)))?;
                }
                (SchemaKind::LeafList, Field::Leaf(value @ LeafValue::List(_))) => {
                    value.render().map_err(|e| e.at(self.path(child)))?;
                }
                (kind, other) => {
                    return Err(Error::mismatch(
                        self.path(child),
                        format!("schema declares {:?}, instance holds {}", kind, other.describe()),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DataNode, LeafValue};
    use crate::fixtures;

    #[test]
    fn test_children_in_declaration_order() {
        let schema = fixtures::schema();
        let cont1a = schema.child(schema.root(), "cont1a").unwrap();
        let cont2a = schema.child(cont1a, "cont2a").unwrap();
        let names: Vec<_> = schema.children_of(cont2a).map(|c| c.name).collect();
        assert_eq!(
            names,
            vec!["leaf2a", "leaf2b", "leaf2c", "leaf2d", "leaf2e", "leaf2f", "leaf2g"]
        );
    }

    #[test]
    fn test_traversal_order_puts_keys_first() {
        let schema = fixtures::schema();
        let state = schema.child(schema.root(), "cont1b-state").unwrap();
        let list2b = schema.child(state, "list2b").unwrap();

        let declared: Vec<_> = schema.children_of(list2b).map(|c| c.name).collect();
        assert_eq!(declared, vec!["leaf3c", "index1", "leaf3d", "index2"]);

        let walked: Vec<_> = schema
            .traversal_order(list2b)
            .iter()
            .map(|&id| schema.name(id))
            .collect();
        assert_eq!(walked, vec!["index1", "index2", "leaf3c", "leaf3d"]);
    }

    #[test]
    fn test_list_keys() {
        let schema = fixtures::schema();
        let cont1a = schema.child(schema.root(), "cont1a").unwrap();
        let list2a = schema.child(cont1a, "list2a").unwrap();
        assert_eq!(schema.kind(list2a), SchemaKind::List);
        assert_eq!(schema.keys(list2a), ["name".to_string()]);
        assert!(schema.is_list_key(list2a, "name").unwrap());
        assert!(!schema.is_list_key(list2a, "rx-power").unwrap());
    }

    #[test]
    fn unknown_field_is_schema_mismatch() {
        let schema = fixtures::schema();
        let cont1a = schema.child(schema.root(), "cont1a").unwrap();
        let err = schema.is_list_key(cont1a, "bogus").unwrap_err();
        assert!(matches!(
            err,
            Error::SchemaMismatch { ref path, .. } if path == "/t1:cont1a"
        ));
    }

    #[test]
    fn test_module_prefix_and_namespace() {
        let schema = fixtures::schema();
        assert_eq!(schema.module_prefix(schema.root()), "");
        assert_eq!(schema.namespace(schema.root()), "");

        let cont1a = schema.child(schema.root(), "cont1a").unwrap();
        assert_eq!(schema.module_prefix(cont1a), "t1");
        assert_eq!(schema.namespace(cont1a), fixtures::T1_NAMESPACE);

        let state = schema.child(schema.root(), "cont1b-state").unwrap();
        let note = schema.child(state, "note").unwrap();
        assert_eq!(schema.module_prefix(note), "t2");
        assert_eq!(schema.path(note), "/t1:cont1b-state/t2:note");
    }

    #[test]
    fn test_validate_accepts_fixture() {
        let schema = fixtures::schema();
        schema.validate(&fixtures::device()).unwrap();
        schema.validate(&fixtures::device_tree()).unwrap();
    }

    #[test]
    fn validate_rejects_unknown_field() {
        let schema = fixtures::schema();
        let data = DataNode::new().container("cont1a", DataNode::new().leaf("bogus", 1u8));
        let err = schema.validate(&data).unwrap_err();
        assert!(matches!(
            err,
            Error::SchemaMismatch { ref reason, .. } if reason.contains("bogus")
        ));
    }

    #[test]
    fn validate_rejects_kind_mismatch() {
        let schema = fixtures::schema();
        let data = DataNode::new().leaf("cont1a", "not a container");
        let err = schema.validate(&data).unwrap_err();
        assert!(matches!(err, Error::SchemaMismatch { ref path, .. } if path == "/t1:cont1a"));
    }

    #[test]
    fn validate_rejects_leaf_vs_leaf_list_mismatch() {
        let schema = fixtures::schema();
        let cont2a = |leaf: &str, value: LeafValue| {
            let inner = DataNode::new().leaf(leaf, value);
            DataNode::new().container("cont1a", DataNode::new().container("cont2a", inner))
        };

        let list_in_leaf = cont2a("leaf2a", [1u8, 2].into_iter().collect());
        let err = schema.validate(&list_in_leaf).unwrap_err();
        assert!(matches!(
            err,
            Error::SchemaMismatch { ref path, ref reason }
                if path == "/t1:cont1a/t1:cont2a/t1:leaf2a" && reason.ends_with("holds leaf-list")
        ));

        let scalar_in_leaf_list = cont2a("leaf2e", 5i16.into());
        let err = schema.validate(&scalar_in_leaf_list).unwrap_err();
        assert!(matches!(
            err,
            Error::SchemaMismatch { ref path, ref reason }
                if path == "/t1:cont1a/t1:cont2a/t1:leaf2e" && reason.ends_with("holds leaf")
        ));
    }

    #[test]
    fn validate_rejects_entry_without_key() {
        let schema = fixtures::schema();
        let data = DataNode::new().container(
            "cont1a",
            DataNode::new().entry("list2a", DataNode::new().leaf("rx-power", 1u16)),
        );
        let err = schema.validate(&data).unwrap_err();
        assert!(matches!(
            err,
            Error::SchemaMismatch { ref reason, .. } if reason.contains("missing key 'name'")
        ));
    }

    #[test]
    fn validate_rejects_unrenderable_value() {
        let schema = fixtures::schema();
        let nested = LeafValue::List(vec![LeafValue::List(Vec::new())]);
        let data = DataNode::new().container(
            "cont1a",
            DataNode::new().container("cont2a", DataNode::new().leaf("leaf2e", nested)),
        );
        let err = schema.validate(&data).unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedValueType { ref path, .. } if path == "/t1:cont1a/t1:cont2a/t1:leaf2e"
        ));
    }
}
