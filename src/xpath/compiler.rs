//! XPath Expression Compiler
//!
//! Flattens the parsed tree into a postfix op sequence for the stack
//! evaluator. Function names, arities and variable references are
//! checked here, so a compiled expression only fails at run time on
//! argument types.

use std::fmt;

use super::functions;
use super::parser::{Axis, BinaryOp, Expr, NodeTest, Step};
use crate::error::{Error, Result};

/// Compiled XPath expression
#[derive(Clone)]
pub struct CompiledExpr {
    source: String,
    pub ops: Vec<Op>,
}

/// Compiled operation
#[derive(Debug, Clone)]
pub enum Op {
    /// Push the document root
    Root,
    /// Push the context node
    Context,
    /// Replace the node-set on top with the step result
    Step(Axis, NodeTest, Vec<CompiledExpr>),
    /// Filter the node-set on top, positions in document order
    Filter(CompiledExpr),
    /// Union two node sets
    Union,
    /// Push literal number
    Number(f64),
    /// Push literal string
    String(String),
    /// Call function
    Call(String, usize), // name, arg count
    /// Binary operation
    Binary(BinaryOp),
    /// Negate
    Negate,
}

impl CompiledExpr {
    /// Compile a parsed expression
    pub fn compile(source: &str, expr: &Expr) -> Result<Self> {
        let mut ops = Vec::new();
        Self::compile_expr(expr, &mut ops)?;
        Ok(CompiledExpr {
            source: source.to_string(),
            ops,
        })
    }

    /// Expression text this was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }

    fn nested(expr: &Expr) -> Result<Self> {
        let mut ops = Vec::new();
        Self::compile_expr(expr, &mut ops)?;
        Ok(CompiledExpr {
            source: String::new(),
            ops,
        })
    }

    fn compile_expr(expr: &Expr, ops: &mut Vec<Op>) -> Result<()> {
        match expr {
            Expr::Root => ops.push(Op::Root),
            Expr::Context => ops.push(Op::Context),
            Expr::Number(n) => ops.push(Op::Number(*n)),
            Expr::String(s) => ops.push(Op::String(s.clone())),
            Expr::Variable(name) => return Err(Error::UnboundVariable(name.clone())),
            Expr::Negate(inner) => {
                Self::compile_expr(inner, ops)?;
                ops.push(Op::Negate);
            }
            Expr::Binary(left, op, right) => {
                Self::compile_expr(left, ops)?;
                Self::compile_expr(right, ops)?;
                ops.push(Op::Binary(*op));
            }
            Expr::Union(left, right) => {
                Self::compile_expr(left, ops)?;
                Self::compile_expr(right, ops)?;
                ops.push(Op::Union);
            }
            Expr::Path(base, step) => {
                Self::compile_expr(base, ops)?;
                Self::compile_step(step, ops)?;
            }
            Expr::Filter(base, pred) => {
                Self::compile_expr(base, ops)?;
                ops.push(Op::Filter(Self::nested(pred)?));
            }
            Expr::Function(name, args) => {
                functions::check(name, args.len())?;
                for arg in args {
                    Self::compile_expr(arg, ops)?;
                }
                ops.push(Op::Call(name.clone(), args.len()));
            }
        }
        Ok(())
    }

    fn compile_step(step: &Step, ops: &mut Vec<Op>) -> Result<()> {
        let predicates = step
            .predicates
            .iter()
            .map(Self::nested)
            .collect::<Result<Vec<_>>>()?;
        ops.push(Op::Step(step.axis, step.node_test.clone(), predicates));
        Ok(())
    }
}

impl fmt::Debug for CompiledExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledExpr")
            .field("source", &self.source)
            .field("ops", &self.ops.len())
            .finish()
    }
}

/// Compile an XPath expression string
pub fn compile(xpath: &str) -> Result<CompiledExpr> {
    let expr = super::parser::parse(xpath)?;
    let compiled = CompiledExpr::compile(xpath, &expr)?;
    tracing::trace!(xpath, ops = compiled.ops.len(), "compiled expression");
    Ok(compiled)
}
