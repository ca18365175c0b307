//! Leaf values and their canonical text form.
//!
//! `LeafValue::render` is the only place a typed value becomes text. The
//! cursor, its `Display` impl and XPath string coercion all go through it.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::Error;

/// Typed value of a leaf or leaf-list
#[derive(Debug, Clone, PartialEq)]
pub enum LeafValue {
    Bool(bool),
    Int(i64),
    Uint(u64),
    /// decimal64 and other fractional types
    Float(f64),
    /// strings, enumerations and identityrefs
    String(String),
    /// YANG `binary`
    Binary(Vec<u8>),
    /// Leaf-list elements, in stored order
    List(Vec<LeafValue>),
}

/// A value with no canonical rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsupportedValue(pub &'static str);

impl UnsupportedValue {
    /// Attach the data path the value was read from.
    pub fn at(self, path: impl Into<String>) -> Error {
        Error::UnsupportedValueType {
            path: path.into(),
            reason: self.0.to_string(),
        }
    }
}

impl LeafValue {
    /// Render the canonical string form.
    ///
    /// Leaf-lists render as one bracketed, space-separated value:
    /// `[5 4 3 2 1]`.
    pub fn render(&self) -> Result<String, UnsupportedValue> {
        match self {
            LeafValue::Bool(b) => Ok(if *b { "true" } else { "false" }.to_string()),
            LeafValue::Int(n) => Ok(n.to_string()),
            LeafValue::Uint(n) => Ok(n.to_string()),
            // Display for f64 is the shortest round-trippable form
            LeafValue::Float(f) => Ok(f.to_string()),
            LeafValue::String(s) => Ok(s.clone()),
            LeafValue::Binary(bytes) => Ok(STANDARD.encode(bytes)),
            LeafValue::List(items) => {
                let mut out = String::from("[");
                for (i, item) in items.iter().enumerate() {
                    if matches!(item, LeafValue::List(_)) {
                        return Err(UnsupportedValue("nested leaf-list"));
                    }
                    if i > 0 {
                        out.push(' ');
                    }
                    out.push_str(&item.render()?);
                }
                out.push(']');
                Ok(out)
            }
        }
    }

    /// Whether the value counts as present. Empty leaf-lists do not.
    pub fn is_present(&self) -> bool {
        !matches!(self, LeafValue::List(items) if items.is_empty())
    }
}

impl fmt::Display for LeafValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.render() {
            Ok(s) => f.write_str(&s),
            Err(UnsupportedValue(reason)) => write!(f, "<{}>", reason),
        }
    }
}

impl From<bool> for LeafValue {
    fn from(b: bool) -> Self {
        LeafValue::Bool(b)
    }
}

macro_rules! from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for LeafValue {
            fn from(n: $t) -> Self {
                LeafValue::Int(n as i64)
            }
        })*
    };
}

macro_rules! from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for LeafValue {
            fn from(n: $t) -> Self {
                LeafValue::Uint(n as u64)
            }
        })*
    };
}

from_signed!(i8, i16, i32, i64);
from_unsigned!(u8, u16, u32, u64);

impl From<f64> for LeafValue {
    fn from(f: f64) -> Self {
        LeafValue::Float(f)
    }
}

impl From<String> for LeafValue {
    fn from(s: String) -> Self {
        LeafValue::String(s)
    }
}

impl From<&str> for LeafValue {
    fn from(s: &str) -> Self {
        LeafValue::String(s.to_string())
    }
}

impl From<Vec<u8>> for LeafValue {
    fn from(bytes: Vec<u8>) -> Self {
        LeafValue::Binary(bytes)
    }
}

impl<T: Into<LeafValue>> FromIterator<T> for LeafValue {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        LeafValue::List(iter.into_iter().map(Into::into).collect())
    }
}
