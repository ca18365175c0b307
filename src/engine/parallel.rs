//! Parallel Evaluation
//!
//! Uses Rayon to run batches of expressions, or a mapper over a selected
//! node-set. Every task works on its own cursor copy.

use std::sync::Arc;

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::navigator::Navigator;
use crate::xpath::{CompiledExpr, XPathValue};

/// Compile and evaluate each expression against a copy of `nav`. Results
/// come back in input order; one failing expression does not affect the
/// others.
///
/// Batches shorter than `threshold` run on the calling thread.
pub fn evaluate_batch<N, C>(
    nav: &N,
    xpaths: &[&str],
    threshold: usize,
    compile: C,
) -> Vec<Result<XPathValue<N>>>
where
    N: Navigator + Send + Sync,
    C: Fn(&str) -> Result<Arc<CompiledExpr>> + Sync,
{
    let run = |xpath: &&str| compile(*xpath)?.evaluate(&nav.copy());

    if xpaths.len() >= threshold.max(1) {
        tracing::debug!(batch = xpaths.len(), "evaluating batch in parallel");
        xpaths.par_iter().map(run).collect()
    } else {
        xpaths.iter().map(run).collect()
    }
}

/// Select with `expr` and map every node in parallel, preserving document
/// order.
pub fn select_map<N, F, T>(nav: &N, expr: &CompiledExpr, mapper: F) -> Result<Vec<T>>
where
    N: Navigator + Send + Sync,
    F: Fn(&N) -> T + Sync + Send,
    T: Send,
{
    match expr.evaluate(nav)? {
        XPathValue::NodeSet(nodes) => Ok(nodes.par_iter().map(&mapper).collect()),
        _ => Err(Error::NotNodeSet),
    }
}
