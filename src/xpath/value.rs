//! XPath Value Types
//!
//! XPath 1.0 has four data types: node-set, boolean, number, and string.
//! Node-sets hold cursors, so string conversion reads through the
//! navigator and needs no separate document handle.

use crate::navigator::{string_value, Navigator};

/// XPath value types
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum XPathValue<N> {
    /// A set of nodes (document order, no duplicates)
    NodeSet(Vec<N>),
    /// Boolean value
    Boolean(bool),
    /// Floating-point number
    Number(f64),
    /// String value
    String(String),
}

impl<N: Navigator> XPathValue<N> {
    /// Create an empty node set
    pub fn empty_nodeset() -> Self {
        XPathValue::NodeSet(Vec::new())
    }

    /// Create a node set with a single node
    pub fn single_node(node: N) -> Self {
        XPathValue::NodeSet(vec![node])
    }

    /// Convert to boolean (XPath boolean() function semantics)
    pub fn to_boolean(&self) -> bool {
        match self {
            XPathValue::NodeSet(nodes) => !nodes.is_empty(),
            XPathValue::Boolean(b) => *b,
            XPathValue::Number(n) => *n != 0.0 && !n.is_nan(),
            XPathValue::String(s) => !s.is_empty(),
        }
    }

    /// Convert to number (XPath number() function semantics)
    pub fn to_number(&self) -> f64 {
        match self {
            XPathValue::NodeSet(_) => parse_number(&self.to_string_value()),
            XPathValue::Boolean(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            XPathValue::Number(n) => *n,
            XPathValue::String(s) => parse_number(s),
        }
    }

    /// Convert to string (XPath string() function semantics).
    ///
    /// The string-value of a node-set is the string-value of its first
    /// node in document order, or the empty string.
    pub fn to_string_value(&self) -> String {
        match self {
            XPathValue::NodeSet(nodes) => nodes.first().map(string_value).unwrap_or_default(),
            XPathValue::Boolean(b) => if *b { "true" } else { "false" }.to_string(),
            XPathValue::Number(n) => format_number(*n),
            XPathValue::String(s) => s.clone(),
        }
    }

    /// Check if this is a node set
    pub fn is_nodeset(&self) -> bool {
        matches!(self, XPathValue::NodeSet(_))
    }

    /// Get as node set, or None
    pub fn as_nodeset(&self) -> Option<&Vec<N>> {
        match self {
            XPathValue::NodeSet(nodes) => Some(nodes),
            _ => None,
        }
    }

    /// Take the node set, or None
    pub fn into_nodeset(self) -> Option<Vec<N>> {
        match self {
            XPathValue::NodeSet(nodes) => Some(nodes),
            _ => None,
        }
    }
}

/// XPath number(): optional whitespace around an optionally negative
/// decimal; anything else is NaN.
pub fn parse_number(s: &str) -> f64 {
    let t = s.trim();
    let digits = t.strip_prefix('-').unwrap_or(t);
    let valid = !digits.is_empty()
        && digits != "."
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        && digits.matches('.').count() <= 1;
    if valid {
        t.parse().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

/// XPath string() of a number
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == n.trunc() && n.abs() < 1e15 {
        // also folds -0 into "0"
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl<N> From<bool> for XPathValue<N> {
    fn from(b: bool) -> Self {
        XPathValue::Boolean(b)
    }
}

impl<N> From<f64> for XPathValue<N> {
    fn from(n: f64) -> Self {
        XPathValue::Number(n)
    }
}

impl<N> From<String> for XPathValue<N> {
    fn from(s: String) -> Self {
        XPathValue::String(s)
    }
}

impl<N> From<&str> for XPathValue<N> {
    fn from(s: &str) -> Self {
        XPathValue::String(s.to_string())
    }
}

impl<N> From<Vec<N>> for XPathValue<N> {
    fn from(nodes: Vec<N>) -> Self {
        XPathValue::NodeSet(nodes)
    }
}
