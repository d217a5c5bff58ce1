use swc_core::ecma::ast::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Default,
    Namespace,
    Named,
}

/// One local name introduced by an import declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBinding {
    pub local: String,
    /// Exported name the binding refers to: `"default"`, `"*"` or the named export.
    pub imported: String,
    pub kind: BindingKind,
}

/// All bindings imported from one module path, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleImports {
    pub module: String,
    pub bindings: Vec<ImportBinding>,
}

/// Import bindings of the current file, grouped by module in first-import order.
#[derive(Debug, Default)]
pub struct ImportTable {
    modules: Vec<ModuleImports>,
}

impl ImportTable {
    pub fn record(&mut self, decl: &ImportDecl) {
        if decl.type_only || decl.specifiers.is_empty() {
            return;
        }
        let bindings: Vec<ImportBinding> = decl
            .specifiers
            .iter()
            .filter_map(|s| match s {
                ImportSpecifier::Default(def) => Some(ImportBinding {
                    local: def.local.sym.to_string(),
                    imported: "default".into(),
                    kind: BindingKind::Default,
                }),
                ImportSpecifier::Namespace(ns) => Some(ImportBinding {
                    local: ns.local.sym.to_string(),
                    imported: "*".into(),
                    kind: BindingKind::Namespace,
                }),
                ImportSpecifier::Named(named) if named.is_type_only => None,
                ImportSpecifier::Named(named) => {
                    let imported = named
                        .imported
                        .as_ref()
                        .map(|i| match i {
                            ModuleExportName::Ident(i) => i.sym.to_string(),
                            ModuleExportName::Str(s) => s.value.to_string(),
                        })
                        .unwrap_or_else(|| named.local.sym.to_string());
                    let kind = if imported == "default" {
                        BindingKind::Default
                    } else {
                        BindingKind::Named
                    };
                    Some(ImportBinding { local: named.local.sym.to_string(), imported, kind })
                }
            })
            .collect();
        if bindings.is_empty() {
            return;
        }

        let module = decl.src.value.to_string();
        match self.modules.iter_mut().find(|m| m.module == module) {
            Some(existing) => existing.bindings.extend(bindings),
            None => self.modules.push(ModuleImports { module, bindings }),
        }
    }

    pub fn modules(&self) -> &[ModuleImports] {
        &self.modules
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
