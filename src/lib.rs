//! SWC transform that turns "mock this imported symbol" calls in test files
//! into explicit module mock registrations.
//!
//! ```js
//! import Api from "./api";
//! import { format } from "./format";
//!
//! jest.mockObj(Api);
//! jest.mockFn(format);
//! ```
//!
//! becomes
//!
//! ```js
//! jest.mock("./api", () => {
//!     const mockedModule = { __esModule: true, default: "Api" };
//!     return mockedModule;
//! });
//! jest.mock("./format", () => {
//!     const mockedModule = { __esModule: true, format: jest.fn() };
//!     mockedModule.format.mockName("format");
//!     return mockedModule;
//! });
//! import Api from "./api";
//! import { format } from "./format";
//! ```
//!
//! Modules that already have a hand-written `jest.mock("...")` (anywhere in the
//! file) are left alone.

use std::collections::HashSet;

use swc_core::{
    ecma::{
        ast::*,
        visit::{VisitMut, VisitMutWith},
    },
    plugin::{plugin_transform, proxies::TransformPluginProgramMetadata},
};
use tracing::{debug, error};

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod emit;
pub mod imports;
pub mod path;
pub mod registry;

#[cfg(test)]
mod test_utils;

#[cfg(test)]
mod transform_tests;

pub use aggregate::{aggregate, ExportEntry, ExportValue, ModuleMockFactory};
pub use classify::{classify, Classification};
pub use config::{CompiledConfig, Config, ConfigError, PreserveRealExports, RequestIdentifier, RequestKind};
pub use imports::{BindingKind, ImportBinding, ImportTable};
pub use path::PropertyPath;
pub use registry::{MockRegistry, MockRequest, MockValue};

// -----------------------------------------------------------------------------
// Transform state
// -----------------------------------------------------------------------------

/// Everything collected while walking one file. Created when a module is
/// entered and consumed when it is left.
#[derive(Debug, Default)]
struct FileContext {
    imports: ImportTable,
    registry: MockRegistry,
    /// Modules that already have an explicit mock registration.
    suppressed: HashSet<String>,
}

pub struct MockImportsTransform {
    config: CompiledConfig,
    file: FileContext,
}

impl MockImportsTransform {
    pub fn new(config: CompiledConfig) -> Self {
        Self { config, file: FileContext::default() }
    }

    /// Records a request call written as its own statement and reports whether
    /// the statement has to go.
    fn take_request_stmt(&mut self, stmt: &mut Stmt) -> bool {
        let Stmt::Expr(ExprStmt { expr, .. }) = stmt else {
            return false;
        };
        let Expr::Call(call) = expr.unwrap_parens_mut() else {
            return false;
        };
        let entry = match classify(call, &self.config) {
            Classification::Request(entry) if entry.remove => entry.clone(),
            _ => return false,
        };
        self.record_request(call, &entry);
        true
    }

    /// Arguments are visited first so that requests and explicit mocks nested
    /// inside them are handled before the values are captured.
    fn record_request(&mut self, call: &mut CallExpr, entry: &RequestIdentifier) {
        call.args.visit_mut_with(self);
        self.file.registry.record_call(call, entry);
    }

    fn finish_module(&mut self, m: &mut Module) {
        let file = std::mem::take(&mut self.file);
        if file.registry.is_empty() {
            return;
        }
        let factories = aggregate(&file.imports, &file.registry, &file.suppressed);
        debug!(
            requests = file.registry.len(),
            suppressed = file.suppressed.len(),
            factories = factories.len(),
            "mock requests aggregated"
        );
        let items = factories
            .iter()
            .map(|f| emit::registration(f, &self.config))
            .collect();
        emit::insert_registrations(m, items);
    }
}

impl VisitMut for MockImportsTransform {
    fn visit_mut_module(&mut self, m: &mut Module) {
        self.file = FileContext::default();
        m.visit_mut_children_with(self);
        self.finish_module(m);
    }

    // Scripts cannot import anything, so there is nothing to mock.
    fn visit_mut_script(&mut self, _: &mut Script) {}

    fn visit_mut_import_decl(&mut self, n: &mut ImportDecl) {
        self.file.imports.record(n);
    }

    fn visit_mut_module_items(&mut self, items: &mut Vec<ModuleItem>) {
        items.retain_mut(|item| {
            if let ModuleItem::Stmt(stmt) = item {
                if self.take_request_stmt(stmt) {
                    return false;
                }
            }
            item.visit_mut_with(self);
            true
        });
    }

    fn visit_mut_stmts(&mut self, stmts: &mut Vec<Stmt>) {
        stmts.retain_mut(|stmt| {
            if self.take_request_stmt(stmt) {
                return false;
            }
            stmt.visit_mut_with(self);
            true
        });
    }

    fn visit_mut_expr(&mut self, expr: &mut Expr) {
        if let Expr::Call(call) = expr {
            match classify(call, &self.config) {
                Classification::Request(entry) => {
                    let entry = entry.clone();
                    self.record_request(call, &entry);
                    if entry.remove {
                        *expr = emit::void_zero();
                    }
                    return;
                }
                Classification::Ignore(module) => {
                    self.file.suppressed.insert(module);
                }
                Classification::None => {}
            }
        }
        expr.visit_mut_children_with(self);
    }
}

// -----------------------------------------------------------------------------
// Entrypoint
// -----------------------------------------------------------------------------

fn load_config(raw: Option<&str>) -> CompiledConfig {
    let compiled = raw
        .map(Config::from_json)
        .unwrap_or_else(|| Ok(Config::default()))
        .and_then(|config| config.compile());
    match compiled {
        Ok(config) => config,
        Err(err) => {
            error!(%err, "invalid mock-imports configuration, using defaults");
            CompiledConfig::default()
        }
    }
}

#[plugin_transform]
pub fn process_transform(mut program: Program, metadata: TransformPluginProgramMetadata) -> Program {
    let config = load_config(metadata.get_transform_plugin_config().as_deref());
    program.visit_mut_with(&mut MockImportsTransform::new(config));
    program
}
