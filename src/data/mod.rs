//! Configuration instance layer
//!
//! The navigator reads instance data only through [`ConfigNode`]. Generated
//! model types implement it with a `match` on field names; [`DataNode`] is a
//! generic map-backed implementation for trees assembled at runtime.
//!
//! The trait answers one question per field: is it set, and if so, what is
//! it. Field order, keys and namespaces come from the schema, never from
//! here.

pub mod tree;
pub mod value;

pub use tree::{DataItem, DataNode};
pub use value::{LeafValue, UnsupportedValue};

use std::fmt;

/// One structural node (root, container or list entry) of a configuration
/// instance.
pub trait ConfigNode: fmt::Debug + Send + Sync {
    /// The named field, or `None` when it holds no data.
    fn field(&self, name: &str) -> Option<Field<'_>>;

    /// Names of every field currently holding data. Used to detect fields
    /// the schema does not know about.
    fn field_names(&self) -> Vec<&str>;
}

/// Indexed access to the entries of one list, in stored order.
///
/// The cursor fetches a single entry per move, so `entry` must not build
/// the whole list.
pub trait ListField: fmt::Debug + Send + Sync {
    fn len(&self) -> usize;

    fn entry(&self, index: usize) -> Option<&dyn ConfigNode>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: ConfigNode> ListField for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn entry(&self, index: usize) -> Option<&dyn ConfigNode> {
        self.get(index).map(|e| e as &dyn ConfigNode)
    }
}

/// Borrowed view of a set field
#[derive(Debug)]
pub enum Field<'a> {
    Container(&'a dyn ConfigNode),
    List(&'a dyn ListField),
    /// Leaf or leaf-list value, produced on demand
    Leaf(LeafValue),
}

impl<'a> Field<'a> {
    /// Short description used in mismatch reports.
    pub fn describe(&self) -> &'static str {
        match self {
            Field::Container(_) => "container",
            Field::List(_) => "list",
            Field::Leaf(LeafValue::List(_)) => "leaf-list",
            Field::Leaf(_) => "leaf",
        }
    }

    /// Whether the field contributes at least one node.
    pub fn is_present(&self) -> bool {
        match self {
            Field::Container(_) => true,
            Field::List(entries) => !entries.is_empty(),
            Field::Leaf(value) => value.is_present(),
        }
    }
}
