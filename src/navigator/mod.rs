//! Cursor contract between a tree and the XPath engine
//!
//! The engine never sees the tree directly. It holds cursors, moves them
//! one step at a time and copies them whenever two branches of an
//! expression have to advance independently.

pub mod yang;

pub use yang::{NodeKind, YangNavigator};

/// XPath node type of the cursor position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// Document root
    Root,
    /// Container, list entry, leaf or leaf-list
    Element,
    /// List key, reachable only through the attribute axis
    Attribute,
}

/// A movable position in a tree.
///
/// Every `move_*` returns `false` and leaves the position unchanged when
/// the move is impossible. Cloning produces an independent cursor: moving
/// the clone never affects the original.
pub trait Navigator: Clone {
    fn node_type(&self) -> NodeType;

    /// Name without prefix
    fn local_name(&self) -> &str;

    /// Namespace prefix, empty when there is none
    fn prefix(&self) -> &str;

    fn namespace_uri(&self) -> &str {
        ""
    }

    /// Scalar value; `None` for structural nodes
    fn value(&self) -> Option<String>;

    /// Qualified name, `prefix:local` or just `local`
    fn name(&self) -> String {
        let prefix = self.prefix();
        if prefix.is_empty() {
            self.local_name().to_string()
        } else {
            format!("{}:{}", prefix, self.local_name())
        }
    }

    fn move_to_root(&mut self);

    fn move_to_parent(&mut self) -> bool;

    /// First child, attribute-kind children included
    fn move_to_child(&mut self) -> bool;

    /// First sibling under the same parent
    fn move_to_first(&mut self) -> bool;

    fn move_to_next(&mut self) -> bool;

    fn move_to_previous(&mut self) -> bool;

    /// Independent cursor at the same position
    fn copy(&self) -> Self {
        self.clone()
    }

    /// Whether both cursors point at the same logical node
    fn is_same_node(&self, other: &Self) -> bool;

    /// Sortable key: lexicographic order of keys is document order.
    ///
    /// The default walks the cursor (sibling index per level); implementors
    /// with cheaper position bookkeeping should override it.
    fn document_position(&self) -> Vec<usize> {
        let mut key = Vec::new();
        let mut cursor = self.clone();
        loop {
            let mut index = 0;
            let mut sibling = cursor.clone();
            while sibling.move_to_previous() {
                index += 1;
            }
            if !cursor.move_to_parent() {
                break;
            }
            key.push(index);
        }
        key.reverse();
        key
    }
}

/// String-value of the node under the cursor
pub fn string_value<N: Navigator>(node: &N) -> String {
    node.value().unwrap_or_default()
}
