//! XPath Axes
//!
//! Every axis is walked with cursor moves only. Nodes come back in
//! proximity order: document order for forward axes, nearest-first for
//! reverse axes. Attribute-kind nodes (list keys) appear only on the
//! attribute axis and as the context itself on `self`.

use super::parser::{Axis, NodeTest};
use crate::navigator::{Navigator, NodeType};

/// Nodes on `axis` from `node`, in proximity order
pub fn navigate<N: Navigator>(node: &N, axis: Axis) -> Vec<N> {
    let mut out = Vec::new();
    match axis {
        Axis::Child => children(node, &mut out),
        Axis::Attribute => attributes(node, &mut out),
        Axis::Descendant => descendants(node, &mut out),
        Axis::DescendantOrSelf => {
            out.push(node.copy());
            descendants(node, &mut out);
        }
        Axis::Parent => {
            let mut parent = node.copy();
            if parent.move_to_parent() {
                out.push(parent);
            }
        }
        Axis::Ancestor => ancestors(node, &mut out),
        Axis::AncestorOrSelf => {
            out.push(node.copy());
            ancestors(node, &mut out);
        }
        Axis::FollowingSibling => {
            if !is_attribute(node) {
                siblings(node, &mut out, N::move_to_next);
            }
        }
        Axis::PrecedingSibling => {
            if !is_attribute(node) {
                siblings(node, &mut out, N::move_to_previous);
            }
        }
        Axis::Following => following(node, &mut out),
        Axis::Preceding => preceding(node, &mut out),
        Axis::Self_ => out.push(node.copy()),
        // configuration trees carry no namespace nodes
        Axis::Namespace => {}
    }
    out
}

/// Whether `node` passes `test` on `axis`
pub fn matches_node_test<N: Navigator>(node: &N, axis: Axis, test: &NodeTest) -> bool {
    let principal = if axis == Axis::Attribute {
        NodeType::Attribute
    } else {
        NodeType::Element
    };
    match test {
        NodeTest::Node => true,
        NodeTest::Any => node.node_type() == principal,
        NodeTest::Name(name) => node.node_type() == principal && node.local_name() == name,
        NodeTest::QName(prefix, local) => {
            node.node_type() == principal && node.prefix() == prefix && node.local_name() == local
        }
        NodeTest::NamespaceWildcard(prefix) => {
            node.node_type() == principal && node.prefix() == prefix
        }
        NodeTest::Text | NodeTest::Comment | NodeTest::ProcessingInstruction(_) => false,
    }
}

fn is_attribute<N: Navigator>(node: &N) -> bool {
    node.node_type() == NodeType::Attribute
}

/// Raw children of `node` (attributes included), in document order
fn each_child<N: Navigator>(node: &N, mut f: impl FnMut(&N)) {
    let mut cursor = node.copy();
    if !cursor.move_to_child() {
        return;
    }
    loop {
        f(&cursor);
        if !cursor.move_to_next() {
            break;
        }
    }
}

fn children<N: Navigator>(node: &N, out: &mut Vec<N>) {
    each_child(node, |child| {
        if !is_attribute(child) {
            out.push(child.copy());
        }
    });
}

fn attributes<N: Navigator>(node: &N, out: &mut Vec<N>) {
    each_child(node, |child| {
        if is_attribute(child) {
            out.push(child.copy());
        }
    });
}

/// Pre-order descendants, attributes excluded
fn descendants<N: Navigator>(node: &N, out: &mut Vec<N>) {
    each_child(node, |child| {
        if !is_attribute(child) {
            out.push(child.copy());
            descendants(child, out);
        }
    });
}

fn ancestors<N: Navigator>(node: &N, out: &mut Vec<N>) {
    let mut cursor = node.copy();
    while cursor.move_to_parent() {
        out.push(cursor.copy());
    }
}

fn siblings<N: Navigator>(node: &N, out: &mut Vec<N>, step: fn(&mut N) -> bool) {
    let mut cursor = node.copy();
    while step(&mut cursor) {
        if !is_attribute(&cursor) {
            out.push(cursor.copy());
        }
    }
}

/// Everything after `node` in document order except its descendants.
///
/// For an attribute this includes its element's children, which follow
/// it in document order.
fn following<N: Navigator>(node: &N, out: &mut Vec<N>) {
    let mut cursor = node.copy();
    loop {
        let mut sibling = cursor.copy();
        while sibling.move_to_next() {
            if !is_attribute(&sibling) {
                out.push(sibling.copy());
                descendants(&sibling, out);
            }
        }
        if !cursor.move_to_parent() {
            break;
        }
    }
}

/// Everything before `node` in document order except its ancestors,
/// nearest first.
fn preceding<N: Navigator>(node: &N, out: &mut Vec<N>) {
    let mut cursor = node.copy();
    loop {
        let mut sibling = cursor.copy();
        while sibling.move_to_previous() {
            if !is_attribute(&sibling) {
                let mut subtree = vec![sibling.copy()];
                descendants(&sibling, &mut subtree);
                out.extend(subtree.into_iter().rev());
            }
        }
        if !cursor.move_to_parent() {
            break;
        }
    }
}
