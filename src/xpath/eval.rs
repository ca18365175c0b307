//! XPath Evaluation Engine
//!
//! Runs a compiled op sequence on a value stack. Cursors are copied,
//! never shared, so every branch of an expression moves independently.

use super::axes::{matches_node_test, navigate};
use super::compiler::{self, CompiledExpr, Op};
use super::functions;
use super::parser::BinaryOp;
use super::value::XPathValue;
use crate::error::{Error, Result};
use crate::navigator::{string_value, Navigator};

/// Evaluation context: the context node with its position and size
#[derive(Debug, Clone)]
pub struct EvalContext<N> {
    pub node: N,
    pub position: usize,
    pub size: usize,
}

impl<N: Navigator> EvalContext<N> {
    pub fn new(node: N) -> Self {
        EvalContext {
            node,
            position: 1,
            size: 1,
        }
    }
}

impl CompiledExpr {
    /// Evaluate with `nav` as the context node. `nav` itself never moves.
    #[must_use = "XPath evaluation result should be used"]
    pub fn evaluate<N: Navigator>(&self, nav: &N) -> Result<XPathValue<N>> {
        evaluate_compiled(self, &EvalContext::new(nav.copy()))
    }

    /// Evaluate and require a node-set, returned in document order.
    pub fn select<N: Navigator>(&self, nav: &N) -> Result<Vec<N>> {
        self.evaluate(nav)?.into_nodeset().ok_or(Error::NotNodeSet)
    }
}

/// Compile and evaluate `xpath` with `nav` as the context node
#[must_use = "XPath evaluation result should be used"]
pub fn evaluate<N: Navigator>(nav: &N, xpath: &str) -> Result<XPathValue<N>> {
    compiler::compile(xpath)?.evaluate(nav)
}

/// Compile and evaluate `xpath`, requiring a node-set
pub fn select<N: Navigator>(nav: &N, xpath: &str) -> Result<Vec<N>> {
    compiler::compile(xpath)?.select(nav)
}

/// Evaluate a compiled expression
pub fn evaluate_compiled<N: Navigator>(
    expr: &CompiledExpr,
    ctx: &EvalContext<N>,
) -> Result<XPathValue<N>> {
    let mut stack: Vec<XPathValue<N>> = Vec::new();

    for op in &expr.ops {
        match op {
            Op::Root => {
                let mut root = ctx.node.copy();
                root.move_to_root();
                stack.push(XPathValue::single_node(root));
            }

            Op::Context => {
                stack.push(XPathValue::single_node(ctx.node.copy()));
            }

            Op::Step(axis, test, predicates) => {
                let nodes = pop_nodeset(&mut stack)?;
                let single = nodes.len() == 1;
                let mut result = Vec::new();
                for node in &nodes {
                    let mut selected: Vec<N> = navigate(node, *axis)
                        .into_iter()
                        .filter(|candidate| matches_node_test(candidate, *axis, test))
                        .collect();
                    for pred in predicates {
                        selected = apply_predicate(selected, pred)?;
                    }
                    result.extend(selected);
                }
                if single {
                    // one context node: axis order is document order or its reverse
                    if axis.is_reverse() {
                        result.reverse();
                    }
                } else {
                    document_order(&mut result);
                }
                stack.push(XPathValue::NodeSet(result));
            }

            Op::Filter(pred) => {
                let nodes = pop_nodeset(&mut stack)?;
                stack.push(XPathValue::NodeSet(apply_predicate(nodes, pred)?));
            }

            Op::Union => {
                let right = pop_nodeset(&mut stack)?;
                let mut left = pop_nodeset(&mut stack)?;
                left.extend(right);
                document_order(&mut left);
                stack.push(XPathValue::NodeSet(left));
            }

            Op::Number(n) => {
                stack.push(XPathValue::Number(*n));
            }

            Op::String(s) => {
                stack.push(XPathValue::String(s.clone()));
            }

            Op::Negate => {
                let val = stack.pop().unwrap_or(XPathValue::Number(0.0));
                stack.push(XPathValue::Number(-val.to_number()));
            }

            Op::Binary(op) => {
                let right = stack.pop().unwrap_or_else(XPathValue::empty_nodeset);
                let left = stack.pop().unwrap_or_else(XPathValue::empty_nodeset);

                let result = match op {
                    BinaryOp::Or => XPathValue::Boolean(left.to_boolean() || right.to_boolean()),
                    BinaryOp::And => XPathValue::Boolean(left.to_boolean() && right.to_boolean()),
                    BinaryOp::Eq
                    | BinaryOp::NotEq
                    | BinaryOp::Lt
                    | BinaryOp::LtEq
                    | BinaryOp::Gt
                    | BinaryOp::GtEq => XPathValue::Boolean(compare(&left, &right, *op)),
                    BinaryOp::Add => XPathValue::Number(left.to_number() + right.to_number()),
                    BinaryOp::Sub => XPathValue::Number(left.to_number() - right.to_number()),
                    BinaryOp::Mul => XPathValue::Number(left.to_number() * right.to_number()),
                    BinaryOp::Div => XPathValue::Number(left.to_number() / right.to_number()),
                    BinaryOp::Mod => XPathValue::Number(left.to_number() % right.to_number()),
                };

                stack.push(result);
            }

            Op::Call(name, arg_count) => {
                let split = stack.len().saturating_sub(*arg_count);
                let args = stack.split_off(split);
                stack.push(functions::call(name, args, ctx)?);
            }
        }
    }

    Ok(stack.pop().unwrap_or_else(XPathValue::empty_nodeset))
}

fn pop_nodeset<N: Navigator>(stack: &mut Vec<XPathValue<N>>) -> Result<Vec<N>> {
    match stack.pop() {
        Some(XPathValue::NodeSet(nodes)) => Ok(nodes),
        Some(_) => Err(Error::NotNodeSet),
        None => Ok(Vec::new()),
    }
}

/// Keep the nodes for which `pred` holds; `nodes` is in proximity order.
/// A numeric result is a position test.
fn apply_predicate<N: Navigator>(nodes: Vec<N>, pred: &CompiledExpr) -> Result<Vec<N>> {
    let size = nodes.len();
    let mut kept = Vec::with_capacity(size);
    for (i, node) in nodes.into_iter().enumerate() {
        let ctx = EvalContext {
            node,
            position: i + 1,
            size,
        };
        let include = match evaluate_compiled(pred, &ctx)? {
            XPathValue::Number(n) => n == (i + 1) as f64,
            other => other.to_boolean(),
        };
        if include {
            kept.push(ctx.node);
        }
    }
    Ok(kept)
}

/// Sort into document order and drop duplicates
pub fn document_order<N: Navigator>(nodes: &mut Vec<N>) {
    if nodes.len() < 2 {
        return;
    }
    nodes.sort_by_cached_key(|n| n.document_position());
    nodes.dedup_by(|a, b| a.is_same_node(b));
}

/// XPath 1.0 comparison. Node-sets compare existentially, node by node,
/// keeping the operand order for relational operators.
fn compare<N: Navigator>(left: &XPathValue<N>, right: &XPathValue<N>, op: BinaryOp) -> bool {
    use XPathValue::{Boolean, NodeSet};

    let node = |n: &N| XPathValue::<N>::String(string_value(n));
    match (left, right) {
        (NodeSet(l), NodeSet(r)) => {
            let r: Vec<XPathValue<N>> = r.iter().map(node).collect();
            l.iter()
                .any(|a| r.iter().any(|b| compare_atomic(&node(a), b, op)))
        }
        (NodeSet(l), Boolean(_)) => compare_atomic(&Boolean(!l.is_empty()), right, op),
        (Boolean(_), NodeSet(r)) => compare_atomic(left, &Boolean(!r.is_empty()), op),
        (NodeSet(l), _) => l.iter().any(|a| compare_atomic(&node(a), right, op)),
        (_, NodeSet(r)) => r.iter().any(|b| compare_atomic(left, &node(b), op)),
        _ => compare_atomic(left, right, op),
    }
}

/// Comparison of two non-node-set values
fn compare_atomic<N: Navigator>(left: &XPathValue<N>, right: &XPathValue<N>, op: BinaryOp) -> bool {
    use XPathValue::{Boolean, Number};

    let equal = || match (left, right) {
        (Boolean(_), _) | (_, Boolean(_)) => left.to_boolean() == right.to_boolean(),
        (Number(_), _) | (_, Number(_)) => left.to_number() == right.to_number(),
        _ => left.to_string_value() == right.to_string_value(),
    };
    let (l, r) = (left.to_number(), right.to_number());
    match op {
        BinaryOp::Eq => equal(),
        BinaryOp::NotEq => !equal(),
        BinaryOp::Lt => l < r,
        BinaryOp::LtEq => l <= r,
        BinaryOp::Gt => l > r,
        BinaryOp::GtEq => l >= r,
        _ => false,
    }
}
