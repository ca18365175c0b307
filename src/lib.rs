//! yangpath - XPath 1.0 over YANG-modelled configuration trees
//!
//! Layers:
//! - `schema`: declared YANG structure (containers, lists with keys, leaves,
//!   module prefixes) indexed once and shared
//! - `data`: the instance contract, implemented by generated structs or by
//!   the map-backed [`DataNode`]
//! - `navigator`: the cursor contract and [`YangNavigator`], which presents
//!   a schema + instance pair as an XML-like document
//! - `xpath`: lexer, parser, compiler and stack evaluator generic over any
//!   [`Navigator`]
//! - `engine`: configured entry point with an expression cache and rayon
//!   batch evaluation
//!
//! List keys surface as attributes, so `/t1:cont1a/t1:list2a[@t1:name='l2a1']`
//! addresses a list entry by key.

pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod navigator;
pub mod schema;
pub mod xpath;

#[cfg(test)]
mod fixtures;

pub use config::EngineConfig;
pub use data::{ConfigNode, DataNode, Field, LeafValue, ListField};
pub use engine::Engine;
pub use error::{Error, Result};
pub use navigator::{Navigator, NodeKind, NodeType, YangNavigator};
pub use schema::{SchemaIndex, SchemaKind};
pub use xpath::{CompiledExpr, XPathValue};
