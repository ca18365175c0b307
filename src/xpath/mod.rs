//! XPath 1.0 Engine
//!
//! Generic over [`Navigator`](crate::navigator::Navigator):
//! - All 13 axes
//! - The core function library plus `ends-with()`
//! - Compile once, evaluate against any number of cursors

pub mod axes;
pub mod compiler;
pub mod eval;
pub mod functions;
pub mod lexer;
pub mod parser;
pub mod value;

pub use compiler::{compile, CompiledExpr};
pub use eval::{evaluate, select, EvalContext};
pub use value::XPathValue;
