use swc_core::{
    common::{sync::Lrc, FileName, SourceMap, Span, DUMMY_SP, GLOBALS},
    ecma::{
        ast::{EsVersion, Module},
        codegen::to_code_default,
        parser::{parse_file_as_module, EsSyntax, Syntax, TsSyntax},
        visit::{VisitMut, VisitMutWith},
    },
};

use crate::{config::Config, MockImportsTransform};

fn parse_with(code: &str, syntax: Syntax) -> Module {
    GLOBALS.set(&Default::default(), || {
        let cm: Lrc<SourceMap> = Default::default();
        let fm = cm.new_source_file(Lrc::new(FileName::Anon), code.to_string());
        let mut errors = vec![];
        parse_file_as_module(&fm, syntax, EsVersion::latest(), None, &mut errors)
            .expect("failed to parse test source")
    })
}

pub(crate) fn parse_module(code: &str) -> Module {
    parse_with(code, Syntax::Es(EsSyntax::default()))
}

pub(crate) fn parse_ts_module(code: &str) -> Module {
    parse_with(code, Syntax::Typescript(TsSyntax::default()))
}

struct DropSpans;

impl VisitMut for DropSpans {
    fn visit_mut_span(&mut self, span: &mut Span) {
        *span = DUMMY_SP;
    }
}

/// Prints without position info so layout only depends on the tree shape.
pub(crate) fn print(module: &Module) -> String {
    let mut module = module.clone();
    module.visit_mut_with(&mut DropSpans);
    to_code_default(Default::default(), None, &module)
}

/// Runs the whole transform and prints the result.
pub(crate) fn transform_with(config: &Config, code: &str) -> String {
    let mut module = parse_module(code);
    let compiled = config.compile().expect("invalid test config");
    module.visit_mut_with(&mut MockImportsTransform::new(compiled));
    print(&module)
}

/// Printed form of hand-written source, for comparing against transform output.
pub(crate) fn normalize(code: &str) -> String {
    print(&parse_module(code))
}
