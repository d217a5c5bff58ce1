use std::collections::HashMap;

use swc_core::ecma::ast::*;
use tracing::trace;

use crate::config::{RequestIdentifier, RequestKind};
use crate::path::PropertyPath;

/// Replacement value of a single mock request.
#[derive(Debug, Clone, PartialEq)]
pub enum MockValue {
    /// Expression supplied by the caller as second argument.
    Custom(Box<Expr>),
    /// String literal holding the mocked name.
    Name(String),
    /// `<global>.fn()` that gets `display_name` attached through `mockName`.
    Generated { display_name: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MockRequest {
    pub root: String,
    pub segments: Vec<String>,
    pub kind: RequestKind,
    pub value: MockValue,
    /// Position among all requests of the file.
    pub seq: usize,
}

/// Mock requests of the current file keyed by root binding name.
#[derive(Debug, Default)]
pub struct MockRegistry {
    by_root: HashMap<String, Vec<MockRequest>>,
    next_seq: usize,
}

impl MockRegistry {
    /// Records every request carried by a matched call. Returns how many were
    /// accepted; arguments that do not resolve to a property path are skipped.
    pub fn record_call(&mut self, call: &CallExpr, entry: &RequestIdentifier) -> usize {
        let args = &call.args;

        if let [target, replacement] = args.as_slice() {
            if replacement.spread.is_none() && PropertyPath::resolve(&replacement.expr).is_none() {
                let path = match target.spread {
                    None => PropertyPath::resolve(&target.expr),
                    Some(_) => None,
                };
                return match path {
                    Some(path) => {
                        self.push(path, entry.kind, MockValue::Custom(replacement.expr.clone()));
                        1
                    }
                    None => {
                        trace!("mock request target is not a property path, skipped");
                        0
                    }
                };
            }
        }

        let mut accepted = 0;
        for arg in args {
            if arg.spread.is_some() {
                trace!("spread argument in mock request skipped");
                continue;
            }
            let Some(path) = PropertyPath::resolve(&arg.expr) else {
                trace!("mock request argument is not a property path, skipped");
                continue;
            };
            let value = default_value(&path, entry.kind);
            self.push(path, entry.kind, value);
            accepted += 1;
        }
        accepted
    }

    fn push(&mut self, path: PropertyPath, kind: RequestKind, value: MockValue) {
        let seq = self.next_seq;
        self.next_seq += 1;
        trace!(root = %path.root, path = %path.dotted(), ?kind, seq, "mock request recorded");
        self.by_root.entry(path.root.clone()).or_default().push(MockRequest {
            root: path.root,
            segments: path.segments,
            kind,
            value,
            seq,
        });
    }

    /// Requests against `root`, in file order.
    pub fn requests_for(&self, root: &str) -> &[MockRequest] {
        self.by_root.get(root).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.next_seq
    }

    pub fn is_empty(&self) -> bool {
        self.next_seq == 0
    }
}

fn default_value(path: &PropertyPath, kind: RequestKind) -> MockValue {
    match kind {
        RequestKind::NameMock => MockValue::Name(path.leaf().to_string()),
        RequestKind::FunctionMock => MockValue::Generated { display_name: path.dotted() },
    }
}
