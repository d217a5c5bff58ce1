//! Joins the import table against the mock registry and produces one mock
//! factory definition per imported module.
//!
//! Export keys come from the binding kind:
//!
//! - default bindings map to `"default"`, named bindings to the imported name,
//!   and their first path segment (if any) becomes a sub-key;
//! - namespace bindings take the export key from the first segment and an
//!   optional sub-key from the second.
//!
//! Anything nested deeper than one level under the export key is dropped. The
//! entries of a key are replayed in file order: a flat value replaces whatever
//! was there, a sub-key value turns the export into an object (keeping earlier
//! sub-keys only if it already was one).

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::imports::{BindingKind, ImportBinding, ImportTable};
use crate::registry::{MockRegistry, MockValue};

#[derive(Debug, Clone, PartialEq)]
pub enum ExportValue {
    Flat(MockValue),
    /// Sub-key → value, in the order sub-keys were first set.
    Nested(Vec<(String, MockValue)>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportEntry {
    pub key: String,
    pub value: ExportValue,
}

/// Synthesized replacement for one module.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleMockFactory {
    pub module: String,
    pub exports: Vec<ExportEntry>,
}

impl ModuleMockFactory {
    pub fn has_nested(&self) -> bool {
        self.exports
            .iter()
            .any(|e| matches!(e.value, ExportValue::Nested(_)))
    }
}

struct SlotEntry<'r> {
    seq: usize,
    sub_key: Option<&'r str>,
    value: &'r MockValue,
}

/// Export key and optional sub-key a request lands on, or `None` when the path
/// cannot be expressed one level deep.
fn export_slot<'r>(binding: &ImportBinding, segments: &'r [String]) -> Option<(String, Option<&'r str>)> {
    match binding.kind {
        BindingKind::Namespace => match segments {
            [key] => Some((key.clone(), None)),
            [key, sub] => Some((key.clone(), Some(sub.as_str()))),
            _ => None,
        },
        BindingKind::Default | BindingKind::Named => match segments {
            [] => Some((binding.imported.clone(), None)),
            [sub] => Some((binding.imported.clone(), Some(sub.as_str()))),
            _ => None,
        },
    }
}

fn resolve_export(entries: &[SlotEntry<'_>]) -> Option<ExportValue> {
    let mut current: Option<ExportValue> = None;
    for entry in entries {
        match entry.sub_key {
            None => current = Some(ExportValue::Flat(entry.value.clone())),
            Some(sub) => match &mut current {
                Some(ExportValue::Nested(subs)) => {
                    match subs.iter_mut().find(|(k, _)| k == sub) {
                        Some(slot) => slot.1 = entry.value.clone(),
                        None => subs.push((sub.to_string(), entry.value.clone())),
                    }
                }
                _ => {
                    current = Some(ExportValue::Nested(vec![(sub.to_string(), entry.value.clone())]));
                }
            },
        }
    }
    current
}

pub fn aggregate(
    imports: &ImportTable,
    registry: &MockRegistry,
    suppressed: &HashSet<String>,
) -> Vec<ModuleMockFactory> {
    let mut factories = Vec::new();

    for module in imports.modules() {
        if suppressed.contains(&module.module) {
            debug!(module = %module.module, "module has an explicit mock, skipping");
            continue;
        }

        let mut slots: Vec<(String, Vec<SlotEntry<'_>>)> = Vec::new();
        for binding in &module.bindings {
            for request in registry.requests_for(&binding.local) {
                let Some((key, sub_key)) = export_slot(binding, &request.segments) else {
                    trace!(
                        module = %module.module,
                        root = %request.root,
                        depth = request.segments.len(),
                        "mock request path cannot be expressed, dropped"
                    );
                    continue;
                };
                let entry = SlotEntry { seq: request.seq, sub_key, value: &request.value };
                match slots.iter_mut().find(|(k, _)| *k == key) {
                    Some((_, entries)) => entries.push(entry),
                    None => slots.push((key, vec![entry])),
                }
            }
        }

        let exports: Vec<ExportEntry> = slots
            .into_iter()
            .filter_map(|(key, mut entries)| {
                entries.sort_by_key(|e| e.seq);
                resolve_export(&entries).map(|value| ExportEntry { key, value })
            })
            .collect();

        if exports.is_empty() {
            continue;
        }
        debug!(module = %module.module, exports = exports.len(), "module mock factory built");
        factories.push(ModuleMockFactory { module: module.module.clone(), exports });
    }

    factories
}
