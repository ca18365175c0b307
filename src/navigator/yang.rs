//! Schema-aware cursor over a configuration instance
//!
//! A position is a frame: the schema node, the instance node when the
//! position is structural, and where it sits in its parent (slot in the
//! parent's traversal order plus list entry index). Leaf values are never
//! stored; they are read from the owning frame on demand.
//!
//! Moves consult presence at every step, so unset leaves, empty
//! leaf-lists and empty lists never surface. Entering a list entry yields
//! its keys first because the schema's traversal order puts them there.

use std::fmt;
use std::iter;

use super::{NodeType, Navigator};
use crate::data::{ConfigNode, Field, LeafValue};
use crate::error::Result;
use crate::schema::{SchemaId, SchemaIndex, SchemaKind};

/// Configuration node kind at the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Container,
    /// One entry of a list; the list itself is never a position
    ListEntry,
    Leaf,
    LeafList,
    /// List key leaf, exposed as an attribute
    Key,
}

#[derive(Clone, Copy)]
struct Frame<'a> {
    id: SchemaId,
    /// Instance node for root, containers and list entries
    data: Option<&'a dyn ConfigNode>,
    /// Index into the parent's traversal order
    slot: usize,
    /// Entry index within a list, 0 otherwise
    entry: usize,
}

/// Cursor over one schema + instance pair
#[derive(Clone)]
pub struct YangNavigator<'a> {
    schema: &'a SchemaIndex,
    root: &'a dyn ConfigNode,
    current: Frame<'a>,
    ancestors: Vec<Frame<'a>>,
}

impl<'a> YangNavigator<'a> {
    /// Cursor at the document root. The instance is trusted to match the
    /// schema; disagreements are skipped and logged.
    pub fn new(schema: &'a SchemaIndex, root: &'a dyn ConfigNode) -> Self {
        YangNavigator {
            schema,
            root,
            current: Self::root_frame(schema, root),
            ancestors: Vec::new(),
        }
    }

    /// Cursor at the document root after validating the instance.
    pub fn checked(schema: &'a SchemaIndex, root: &'a dyn ConfigNode) -> Result<Self> {
        schema.validate(root)?;
        Ok(Self::new(schema, root))
    }

    fn root_frame(schema: &SchemaIndex, root: &'a dyn ConfigNode) -> Frame<'a> {
        Frame {
            id: schema.root(),
            data: Some(root),
            slot: 0,
            entry: 0,
        }
    }

    pub fn schema(&self) -> &'a SchemaIndex {
        self.schema
    }

    pub fn kind(&self) -> NodeKind {
        if self.ancestors.is_empty() {
            return NodeKind::Root;
        }
        match self.schema.kind(self.current.id) {
            SchemaKind::Root => NodeKind::Root,
            SchemaKind::Container => NodeKind::Container,
            SchemaKind::List => NodeKind::ListEntry,
            SchemaKind::Leaf if self.schema.is_key(self.current.id) => NodeKind::Key,
            SchemaKind::Leaf => NodeKind::Leaf,
            SchemaKind::LeafList => NodeKind::LeafList,
        }
    }

    /// Rendered value, reporting values that cannot be rendered.
    pub fn try_value(&self) -> Result<Option<String>> {
        if self.current.data.is_some() {
            return Ok(None);
        }
        let Some(owner) = self.ancestors.last().and_then(|f| f.data) else {
            return Ok(None);
        };
        match owner.field(self.schema.name(self.current.id)) {
            Some(Field::Leaf(value)) => value
                .render()
                .map(Some)
                .map_err(|e| e.at(self.schema.path(self.current.id))),
            _ => Ok(None),
        }
    }

    /// Frame for `entry` of `slot` under `parent`, if that node is present.
    fn slot_at(&self, parent: &Frame<'a>, slot: usize, entry: usize) -> Option<Frame<'a>> {
        let data = parent.data?;
        let id = *self.schema.traversal_order(parent.id).get(slot)?;
        let field = data.field(self.schema.name(id))?;

        let frame = |data: Option<&'a dyn ConfigNode>| Frame {
            id,
            data,
            slot,
            entry,
        };
        match (self.schema.kind(id), field) {
            (SchemaKind::Leaf, Field::Leaf(value)) if !matches!(value, LeafValue::List(_)) => {
                (entry == 0).then(|| frame(None))
            }
            (SchemaKind::LeafList, Field::Leaf(value @ LeafValue::List(_))) => {
                (entry == 0 && value.is_present()).then(|| frame(None))
            }
            (SchemaKind::Container, Field::Container(node)) => {
                (entry == 0).then(|| frame(Some(node)))
            }
            (SchemaKind::List, Field::List(entries)) => {
                entries.entry(entry).map(|node| frame(Some(node)))
            }
            (kind, field) => {
                tracing::warn!(
                    path = %self.schema.path(id),
                    expected = ?kind,
                    found = field.describe(),
                    "instance disagrees with schema, skipping node"
                );
                None
            }
        }
    }

    /// Number of nodes `slot` contributes under `parent`.
    fn slot_len(&self, parent: &Frame<'a>, slot: usize) -> usize {
        let Some(data) = parent.data else { return 0 };
        let Some(&id) = self.schema.traversal_order(parent.id).get(slot) else {
            return 0;
        };
        match data.field(self.schema.name(id)) {
            Some(Field::List(entries)) => entries.len(),
            Some(field) if field.is_present() => 1,
            _ => 0,
        }
    }

    fn first_from(&self, parent: &Frame<'a>, start: usize) -> Option<Frame<'a>> {
        let len = self.schema.traversal_order(parent.id).len();
        (start..len).find_map(|slot| self.slot_at(parent, slot, 0))
    }

    fn last_before(&self, parent: &Frame<'a>, end: usize) -> Option<Frame<'a>> {
        (0..end).rev().find_map(|slot| {
            let len = self.slot_len(parent, slot);
            if len == 0 {
                None
            } else {
                self.slot_at(parent, slot, len - 1)
            }
        })
    }

    fn is_list_entry(&self) -> bool {
        !self.ancestors.is_empty() && self.schema.kind(self.current.id) == SchemaKind::List
    }

    fn positions(&self) -> impl Iterator<Item = &Frame<'a>> + '_ {
        self.ancestors.iter().chain(iter::once(&self.current)).skip(1)
    }
}

impl<'a> Navigator for YangNavigator<'a> {
    fn node_type(&self) -> NodeType {
        match self.kind() {
            NodeKind::Root => NodeType::Root,
            NodeKind::Key => NodeType::Attribute,
            _ => NodeType::Element,
        }
    }

    fn local_name(&self) -> &str {
        self.schema.name(self.current.id)
    }

    fn prefix(&self) -> &str {
        self.schema.module_prefix(self.current.id)
    }

    fn namespace_uri(&self) -> &str {
        self.schema.namespace(self.current.id)
    }

    fn value(&self) -> Option<String> {
        match self.try_value() {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "leaf value has no rendering");
                None
            }
        }
    }

    fn move_to_root(&mut self) {
        self.ancestors.clear();
        self.current = Self::root_frame(self.schema, self.root);
    }

    fn move_to_parent(&mut self) -> bool {
        match self.ancestors.pop() {
            Some(parent) => {
                self.current = parent;
                true
            }
            None => false,
        }
    }

    fn move_to_child(&mut self) -> bool {
        if self.current.data.is_none() {
            return false;
        }
        match self.first_from(&self.current, 0) {
            Some(child) => {
                self.ancestors.push(self.current);
                self.current = child;
                true
            }
            None => false,
        }
    }

    fn move_to_first(&mut self) -> bool {
        let Some(parent) = self.ancestors.last().copied() else {
            return false;
        };
        match self.first_from(&parent, 0) {
            Some(first) => {
                self.current = first;
                true
            }
            None => false,
        }
    }

    fn move_to_next(&mut self) -> bool {
        let Some(parent) = self.ancestors.last().copied() else {
            return false;
        };
        let current = self.current;
        let next = if self.is_list_entry() {
            self.slot_at(&parent, current.slot, current.entry + 1)
                .or_else(|| self.first_from(&parent, current.slot + 1))
        } else {
            self.first_from(&parent, current.slot + 1)
        };
        match next {
            Some(frame) => {
                self.current = frame;
                true
            }
            None => false,
        }
    }

    fn move_to_previous(&mut self) -> bool {
        let Some(parent) = self.ancestors.last().copied() else {
            return false;
        };
        let current = self.current;
        let previous = if self.is_list_entry() && current.entry > 0 {
            self.slot_at(&parent, current.slot, current.entry - 1)
        } else {
            self.last_before(&parent, current.slot)
        };
        match previous {
            Some(frame) => {
                self.current = frame;
                true
            }
            None => false,
        }
    }

    fn is_same_node(&self, other: &Self) -> bool {
        std::ptr::eq(self.schema, other.schema)
            && std::ptr::addr_eq(self.root, other.root)
            && self.ancestors.len() == other.ancestors.len()
            && self
                .positions()
                .zip(other.positions())
                .all(|(a, b)| a.slot == b.slot && a.entry == b.entry)
    }

    fn document_position(&self) -> Vec<usize> {
        self.positions()
            .flat_map(|frame| [frame.slot, frame.entry])
            .collect()
    }
}

impl PartialEq for YangNavigator<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.is_same_node(other)
    }
}

impl fmt::Display for YangNavigator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value() {
            Some(value) => write!(f, "{}: {}", self.local_name(), value),
            None => f.write_str(self.local_name()),
        }
    }
}

impl fmt::Debug for YangNavigator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YangNavigator")
            .field("path", &self.schema.path(self.current.id))
            .field("kind", &self.kind())
            .field("position", &self.document_position())
            .finish()
    }
}
