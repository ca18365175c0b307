//! Schema declaration
//!
//! Declarations are collected as a nested tree through closures, then
//! flattened into the arena in one pass. Children inherit their parent's
//! module unless declared inside [`NodeBuilder::augment`].

use std::collections::HashSet;

use super::{Module, SchemaIndex, SchemaKind, SchemaNode, SchemaId};
use crate::error::{Error, Result};

#[derive(Debug)]
struct Decl {
    name: String,
    kind: SchemaKind,
    module: String,
    keys: Vec<String>,
    children: Vec<Decl>,
}

/// Builder for a [`SchemaIndex`]
#[derive(Debug)]
pub struct SchemaBuilder {
    root_name: String,
    modules: Vec<Module>,
    top: Vec<Decl>,
}

/// Declares the children of one node
#[derive(Debug)]
pub struct NodeBuilder {
    module: String,
    children: Vec<Decl>,
}

impl SchemaBuilder {
    pub fn new(root_name: &str) -> Self {
        SchemaBuilder {
            root_name: root_name.to_string(),
            modules: Vec::new(),
            top: Vec::new(),
        }
    }

    /// Register a module.
    pub fn module(mut self, name: &str, prefix: &str, namespace: &str) -> Self {
        self.modules.push(Module {
            name: name.to_string(),
            prefix: prefix.to_string(),
            namespace: namespace.to_string(),
        });
        self
    }

    /// Declare top-level nodes belonging to the module with `prefix`.
    pub fn define(mut self, prefix: &str, f: impl FnOnce(&mut NodeBuilder)) -> Self {
        let mut nb = NodeBuilder::new(prefix);
        f(&mut nb);
        self.top.extend(nb.children);
        self
    }

    /// Validate the declarations and flatten them into an arena.
    pub fn build(self) -> Result<SchemaIndex> {
        let mut nodes = vec![SchemaNode {
            name: self.root_name,
            kind: SchemaKind::Root,
            parent: None,
            module: None,
            children: Vec::new(),
            traversal: Vec::new(),
            keys: Vec::new(),
            is_key: false,
        }];

        let mut seen = HashSet::new();
        for module in &self.modules {
            if !seen.insert(module.prefix.as_str()) {
                return Err(Error::InvalidSchema(format!(
                    "duplicate module prefix '{}'",
                    module.prefix
                )));
            }
        }

        let children = flatten(&self.modules, &mut nodes, 0, self.top)?;
        nodes[0].traversal = children.clone();
        nodes[0].children = children;

        tracing::debug!(
            nodes = nodes.len(),
            modules = self.modules.len(),
            "schema index built"
        );
        Ok(SchemaIndex::from_parts(nodes, self.modules))
    }
}

impl NodeBuilder {
    fn new(module: &str) -> Self {
        NodeBuilder {
            module: module.to_string(),
            children: Vec::new(),
        }
    }

    fn push(&mut self, name: &str, kind: SchemaKind, keys: &[&str], children: Vec<Decl>) {
        self.children.push(Decl {
            name: name.to_string(),
            kind,
            module: self.module.clone(),
            keys: keys.iter().map(|k| k.to_string()).collect(),
            children,
        });
    }

    fn nested(&self, f: impl FnOnce(&mut NodeBuilder)) -> Vec<Decl> {
        let mut nb = NodeBuilder::new(&self.module);
        f(&mut nb);
        nb.children
    }

    pub fn container(&mut self, name: &str, f: impl FnOnce(&mut NodeBuilder)) -> &mut Self {
        let children = self.nested(f);
        self.push(name, SchemaKind::Container, &[], children);
        self
    }

    /// Declare a list keyed by `keys`, in key order.
    pub fn list(
        &mut self,
        name: &str,
        keys: &[&str],
        f: impl FnOnce(&mut NodeBuilder),
    ) -> &mut Self {
        let children = self.nested(f);
        self.push(name, SchemaKind::List, keys, children);
        self
    }

    pub fn leaf(&mut self, name: &str) -> &mut Self {
        self.push(name, SchemaKind::Leaf, &[], Vec::new());
        self
    }

    pub fn leaf_list(&mut self, name: &str) -> &mut Self {
        self.push(name, SchemaKind::LeafList, &[], Vec::new());
        self
    }

    /// Declare nodes from another module at this point of the tree.
    ///
    /// Siblings are identified by local name alone, both here and in
    /// [`ConfigNode::field`](crate::data::ConfigNode::field), so an augmented
    /// node may not share its name with a sibling from any module.
    pub fn augment(&mut self, prefix: &str, f: impl FnOnce(&mut NodeBuilder)) -> &mut Self {
        let mut nb = NodeBuilder::new(prefix);
        f(&mut nb);
        self.children.extend(nb.children);
        self
    }
}

fn flatten(
    modules: &[Module],
    nodes: &mut Vec<SchemaNode>,
    parent: SchemaId,
    decls: Vec<Decl>,
) -> Result<Vec<SchemaId>> {
    let mut ids = Vec::with_capacity(decls.len());
    let mut names = HashSet::new();

    for decl in decls {
        if !names.insert(decl.name.clone()) {
            return Err(Error::InvalidSchema(format!(
                "duplicate node '{}' under '{}'",
                decl.name, nodes[parent as usize].name
            )));
        }
        let module = modules
            .iter()
            .position(|m| m.prefix == decl.module)
            .ok_or_else(|| {
                Error::InvalidSchema(format!(
                    "node '{}' uses unknown module prefix '{}'",
                    decl.name, decl.module
                ))
            })?;
        if decl.kind == SchemaKind::List && decl.keys.is_empty() {
            return Err(Error::InvalidSchema(format!("list '{}' has no keys", decl.name)));
        }

        let id = nodes.len() as SchemaId;
        nodes.push(SchemaNode {
            name: decl.name,
            kind: decl.kind,
            parent: Some(parent),
            module: Some(module),
            children: Vec::new(),
            traversal: Vec::new(),
            keys: decl.keys,
            is_key: false,
        });

        let children = flatten(modules, nodes, id, decl.children)?;
        let traversal = traversal_order(nodes, id, &children)?;
        let node = &mut nodes[id as usize];
        node.children = children;
        node.traversal = traversal;
        ids.push(id);
    }

    Ok(ids)
}

/// Keys first in key order, then the rest in declaration order. Marks the
/// key leaves as it goes.
fn traversal_order(
    nodes: &mut [SchemaNode],
    id: SchemaId,
    children: &[SchemaId],
) -> Result<Vec<SchemaId>> {
    let keys = nodes[id as usize].keys.clone();
    if keys.is_empty() {
        return Ok(children.to_vec());
    }

    let mut order = Vec::with_capacity(children.len());
    for key in &keys {
        let found = children
            .iter()
            .copied()
            .find(|&c| nodes[c as usize].name == *key && nodes[c as usize].kind == SchemaKind::Leaf)
            .ok_or_else(|| {
                Error::InvalidSchema(format!(
                    "key '{}' of list '{}' is not a leaf of the list",
                    key, nodes[id as usize].name
                ))
            })?;
        nodes[found as usize].is_key = true;
        order.push(found);
    }
    order.extend(children.iter().copied().filter(|&c| !nodes[c as usize].is_key));
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> SchemaBuilder {
        SchemaBuilder::new("device").module("mod-a", "a", "urn:a")
    }

    #[test]
    fn test_build_assigns_modules() {
        let schema = base()
            .module("mod-b", "b", "urn:b")
            .define("a", |m| {
                m.container("top", |c| {
                    c.leaf("x").augment("b", |b| {
                        b.leaf("y");
                    });
                });
            })
            .build()
            .unwrap();

        let top = schema.child(schema.root(), "top").unwrap();
        let x = schema.child(top, "x").unwrap();
        let y = schema.child(top, "y").unwrap();
        assert_eq!(schema.module_prefix(x), "a");
        assert_eq!(schema.module_prefix(y), "b");
        assert_eq!(schema.namespace(y), "urn:b");
        assert_eq!(schema.len(), 4);
        let prefixes: Vec<_> = schema.modules().iter().map(|m| m.prefix.as_str()).collect();
        assert_eq!(prefixes, ["a", "b"]);
    }

    #[test]
    fn rejects_same_name_from_other_module() {
        let err = base()
            .module("mod-b", "b", "urn:b")
            .define("a", |m| {
                m.container("top", |c| {
                    c.leaf("x").augment("b", |b| {
                        b.leaf("x");
                    });
                });
            })
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidSchema(ref msg) if msg.contains("duplicate node 'x' under 'top'")
        ));
    }

    #[test]
    fn rejects_unknown_module() {
        let err = base()
            .define("zz", |m| {
                m.leaf("x");
            })
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSchema(ref msg) if msg.contains("'zz'")));
    }

    #[test]
    fn rejects_duplicate_sibling() {
        let err = base()
            .define("a", |m| {
                m.leaf("x").leaf("x");
            })
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSchema(ref msg) if msg.contains("duplicate node 'x'")));
    }

    #[test]
    fn rejects_missing_key_leaf() {
        let err = base()
            .define("a", |m| {
                m.list("l", &["id"], |l| {
                    l.leaf("other");
                });
            })
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSchema(ref msg) if msg.contains("key 'id'")));
    }

    #[test]
    fn rejects_keyless_list() {
        let err = base()
            .define("a", |m| {
                m.list("l", &[], |l| {
                    l.leaf("x");
                });
            })
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSchema(ref msg) if msg.contains("no keys")));
    }

    #[test]
    fn rejects_duplicate_module_prefix() {
        let err = base().module("mod-a2", "a", "urn:a2").build().unwrap_err();
        assert!(matches!(err, Error::InvalidSchema(ref msg) if msg.contains("prefix 'a'")));
    }
}
