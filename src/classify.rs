use swc_core::ecma::ast::*;

use crate::config::{CompiledConfig, RequestIdentifier};
use crate::path::PropertyPath;

/// What a call expression means to the transform.
#[derive(Debug, PartialEq)]
pub enum Classification<'c> {
    /// Hand-written module mock (`jest.mock("./x")`) for the given module.
    Ignore(String),
    /// A mock request handled according to the matched identifier entry.
    Request(&'c RequestIdentifier),
    None,
}

/// Full dotted name of a callee such as `jest.mockObj` or `a.b.c.d`.
pub fn callee_name(callee: &Callee) -> Option<String> {
    match callee {
        Callee::Expr(expr) => PropertyPath::resolve(expr).map(|p| p.dotted()),
        Callee::Super(_) | Callee::Import(_) => None,
    }
}

/// Module path given as the first argument, if it is a static string.
fn static_module_arg(call: &CallExpr) -> Option<String> {
    let first = call.args.first()?;
    if first.spread.is_some() {
        return None;
    }
    match &*first.expr {
        Expr::Lit(Lit::Str(s)) => Some(s.value.to_string()),
        Expr::Tpl(t) if t.exprs.is_empty() => t
            .quasis
            .first()
            .and_then(|q| q.cooked.as_ref())
            .map(|c| c.to_string()),
        _ => None,
    }
}

pub fn classify<'c>(call: &CallExpr, config: &'c CompiledConfig) -> Classification<'c> {
    let Some(name) = callee_name(&call.callee) else {
        return Classification::None;
    };
    if config.is_ignore_call(&name) {
        if let Some(module) = static_module_arg(call) {
            return Classification::Ignore(module);
        }
    }
    match config.request_for(&name) {
        Some(entry) => Classification::Request(entry),
        None => Classification::None,
    }
}
