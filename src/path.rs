use swc_core::ecma::ast::*;

/// Root binding plus the static property chain hanging off it.
///
/// `Foo` resolves to `{ root: "Foo", segments: [] }` and `Foo.bar.baz` to
/// `{ root: "Foo", segments: ["bar", "baz"] }`. Computed access, calls and any
/// other expression shape do not resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyPath {
    pub root: String,
    pub segments: Vec<String>,
}

impl PropertyPath {
    pub fn resolve(expr: &Expr) -> Option<Self> {
        fn walk(e: &Expr, segments: &mut Vec<String>) -> Option<String> {
            match e {
                Expr::Ident(i) => Some(i.sym.to_string()),
                Expr::Member(m) => {
                    let root = walk(&m.obj, segments)?;
                    match &m.prop {
                        MemberProp::Ident(p) => {
                            segments.push(p.sym.to_string());
                            Some(root)
                        }
                        MemberProp::PrivateName(_) | MemberProp::Computed(_) => None,
                    }
                }
                _ => None,
            }
        }
        let mut segments = Vec::new();
        let root = walk(expr, &mut segments)?;
        Some(Self { root, segments })
    }

    /// Last segment, or the root when the path has none.
    pub fn leaf(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or(&self.root)
    }

    pub fn dotted(&self) -> String {
        let mut out = self.root.clone();
        for seg in &self.segments {
            out.push('.');
            out.push_str(seg);
        }
        out
    }
}

/// Whether `s` can be written as a bare identifier name (property keys, dotted
/// callee segments). Reserved words are fine in that position.
pub(crate) fn is_identifier_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}
