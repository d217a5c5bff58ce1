//! Materializes [`ModuleMockFactory`] definitions as registration statements:
//!
//! ```js
//! jest.mock("./dep", () => {
//!     const mockedModule = {
//!         ...jest.requireActual("./dep"),
//!         __esModule: true,
//!         default: jest.fn(),
//!         util: { ...jest.requireActual("./dep").util, parse: "parse" },
//!     };
//!     mockedModule.default.mockName("Dep");
//!     return mockedModule;
//! });
//! ```
//!
//! The `requireActual` spreads only appear when real exports are preserved for
//! the factory.

use swc_core::{
    common::{SyntaxContext, DUMMY_SP},
    ecma::ast::*,
};

use crate::aggregate::{ExportValue, ModuleMockFactory};
use crate::config::{CompiledConfig, PreserveRealExports};
use crate::path::is_identifier_name;
use crate::registry::MockValue;

const MOCKED_MODULE: &str = "mockedModule";
const ES_MODULE_FLAG: &str = "__esModule";

// -----------------------------------------------------------------------------
// Node helpers
// -----------------------------------------------------------------------------

fn ident(name: &str) -> Ident {
    Ident::new(name.into(), DUMMY_SP, SyntaxContext::empty())
}

fn ident_expr(name: &str) -> Box<Expr> {
    Box::new(Expr::Ident(ident(name)))
}

fn str_expr(value: &str) -> Box<Expr> {
    Box::new(Expr::Lit(Lit::Str(Str {
        span: DUMMY_SP,
        value: value.into(),
        raw: None,
    })))
}

/// `obj.prop`, or `obj["prop"]` when `prop` is not an identifier name.
fn member(obj: Box<Expr>, prop: &str) -> Box<Expr> {
    let prop = if is_identifier_name(prop) {
        MemberProp::Ident(IdentName::new(prop.into(), DUMMY_SP))
    } else {
        MemberProp::Computed(ComputedPropName {
            span: DUMMY_SP,
            expr: str_expr(prop),
        })
    };
    Box::new(Expr::Member(MemberExpr { span: DUMMY_SP, obj, prop }))
}

fn call(callee: Box<Expr>, args: Vec<Box<Expr>>) -> Box<Expr> {
    Box::new(Expr::Call(CallExpr {
        span: DUMMY_SP,
        callee: Callee::Expr(callee),
        args: args
            .into_iter()
            .map(|expr| ExprOrSpread { spread: None, expr })
            .collect(),
        type_args: None,
        ctxt: SyntaxContext::empty(),
    }))
}

fn prop_name(key: &str) -> PropName {
    if is_identifier_name(key) {
        PropName::Ident(IdentName::new(key.into(), DUMMY_SP))
    } else {
        PropName::Str(Str {
            span: DUMMY_SP,
            value: key.into(),
            raw: None,
        })
    }
}

fn key_value(key: &str, value: Box<Expr>) -> PropOrSpread {
    PropOrSpread::Prop(Box::new(Prop::KeyValue(KeyValueProp {
        key: prop_name(key),
        value,
    })))
}

fn spread(expr: Box<Expr>) -> PropOrSpread {
    PropOrSpread::Spread(SpreadElement {
        dot3_token: DUMMY_SP,
        expr,
    })
}

fn object(props: Vec<PropOrSpread>) -> Box<Expr> {
    Box::new(Expr::Object(ObjectLit { span: DUMMY_SP, props }))
}

fn expr_stmt(expr: Box<Expr>) -> Stmt {
    Stmt::Expr(ExprStmt { span: DUMMY_SP, expr })
}

/// `void 0`, left behind where a request call was used as a value.
pub(crate) fn void_zero() -> Expr {
    Expr::Unary(UnaryExpr {
        span: DUMMY_SP,
        op: UnaryOp::Void,
        arg: Box::new(Expr::Lit(Lit::Num(Number {
            span: DUMMY_SP,
            value: 0.0,
            raw: None,
        }))),
    })
}

// -----------------------------------------------------------------------------
// Factory construction
// -----------------------------------------------------------------------------

struct FactoryBuilder<'a> {
    config: &'a CompiledConfig,
    factory: &'a ModuleMockFactory,
    preserve: bool,
}

impl<'a> FactoryBuilder<'a> {
    fn new(config: &'a CompiledConfig, factory: &'a ModuleMockFactory) -> Self {
        let preserve = match config.preserve_real_exports() {
            PreserveRealExports::Never => false,
            PreserveRealExports::Nested => factory.has_nested(),
            PreserveRealExports::Always => true,
        };
        Self { config, factory, preserve }
    }

    fn global_method(&self, method: &str) -> Box<Expr> {
        member(ident_expr(self.config.global()), method)
    }

    /// `<global>.requireActual("<module>")`
    fn require_actual(&self) -> Box<Expr> {
        call(self.global_method("requireActual"), vec![str_expr(&self.factory.module)])
    }

    fn value_expr(&self, value: &MockValue) -> Box<Expr> {
        match value {
            MockValue::Custom(expr) => expr.clone(),
            MockValue::Name(name) => str_expr(name),
            MockValue::Generated { .. } => call(self.global_method("fn"), vec![]),
        }
    }

    fn exports_object(&self) -> Box<Expr> {
        let mut props = Vec::with_capacity(self.factory.exports.len() + 2);
        if self.preserve {
            props.push(spread(self.require_actual()));
        }
        props.push(key_value(
            ES_MODULE_FLAG,
            Box::new(Expr::Lit(Lit::Bool(Bool { span: DUMMY_SP, value: true }))),
        ));

        for entry in &self.factory.exports {
            let value = match &entry.value {
                ExportValue::Flat(v) => self.value_expr(v),
                ExportValue::Nested(subs) => {
                    let mut inner = Vec::with_capacity(subs.len() + 1);
                    if self.preserve {
                        inner.push(spread(member(self.require_actual(), &entry.key)));
                    }
                    inner.extend(subs.iter().map(|(sub, v)| key_value(sub, self.value_expr(v))));
                    object(inner)
                }
            };
            props.push(key_value(&entry.key, value));
        }
        object(props)
    }

    /// `mockedModule.<key>[.<sub>].mockName("<display name>")` for every
    /// generated mock function present in the final object.
    fn naming_stmts(&self) -> Vec<Stmt> {
        let mock_name = |target: Box<Expr>, display_name: &str| {
            expr_stmt(call(member(target, "mockName"), vec![str_expr(display_name)]))
        };
        let mut out = vec![];
        for entry in &self.factory.exports {
            let key_target = || member(ident_expr(MOCKED_MODULE), &entry.key);
            match &entry.value {
                ExportValue::Flat(MockValue::Generated { display_name }) => {
                    out.push(mock_name(key_target(), display_name));
                }
                ExportValue::Flat(_) => {}
                ExportValue::Nested(subs) => {
                    for (sub, value) in subs {
                        if let MockValue::Generated { display_name } = value {
                            out.push(mock_name(member(key_target(), sub), display_name));
                        }
                    }
                }
            }
        }
        out
    }

    fn factory_body(&self) -> Vec<Stmt> {
        let mut stmts = vec![Stmt::Decl(Decl::Var(Box::new(VarDecl {
            span: DUMMY_SP,
            kind: VarDeclKind::Const,
            declare: false,
            decls: vec![VarDeclarator {
                span: DUMMY_SP,
                name: Pat::Ident(BindingIdent {
                    id: ident(MOCKED_MODULE),
                    type_ann: None,
                }),
                init: Some(self.exports_object()),
                definite: false,
            }],
            ctxt: SyntaxContext::empty(),
        })))];
        stmts.extend(self.naming_stmts());
        stmts.push(Stmt::Return(ReturnStmt {
            span: DUMMY_SP,
            arg: Some(ident_expr(MOCKED_MODULE)),
        }));
        stmts
    }

    fn build(&self) -> ModuleItem {
        let factory = Box::new(Expr::Arrow(ArrowExpr {
            span: DUMMY_SP,
            ctxt: SyntaxContext::empty(),
            params: vec![],
            body: Box::new(BlockStmtOrExpr::BlockStmt(BlockStmt {
                span: DUMMY_SP,
                ctxt: SyntaxContext::empty(),
                stmts: self.factory_body(),
            })),
            is_async: false,
            is_generator: false,
            type_params: None,
            return_type: None,
        }));
        ModuleItem::Stmt(expr_stmt(call(
            self.global_method("mock"),
            vec![str_expr(&self.factory.module), factory],
        )))
    }
}

/// `<global>.mock("<module>", () => { ... })` for one factory.
pub fn registration(factory: &ModuleMockFactory, config: &CompiledConfig) -> ModuleItem {
    FactoryBuilder::new(config, factory).build()
}

fn is_directive(item: &ModuleItem) -> bool {
    matches!(
        item,
        ModuleItem::Stmt(Stmt::Expr(ExprStmt { expr, .. })) if matches!(&**expr, Expr::Lit(Lit::Str(_)))
    )
}

/// Inserts `items` at the top of the module, after any directive prologue.
pub fn insert_registrations(module: &mut Module, items: Vec<ModuleItem>) {
    if items.is_empty() {
        return;
    }
    let at = module.body.iter().take_while(|item| is_directive(item)).count();
    module.body.splice(at..at, items);
}
