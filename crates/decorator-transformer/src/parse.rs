//! Parsing source files with swc.

use crate::error::TransformError;
use camino::Utf8Path;
use swc_common::{sync::Lrc, BytePos, FileName, SourceMap};
use swc_ecma_ast::Module;
use swc_ecma_parser::{EsSyntax, Parser, StringInput, Syntax, TsSyntax};

/// A parsed module and the source-map position of its first byte.
pub(crate) struct ParsedFile {
    pub module: Module,
    pub start: BytePos,
}

/// Parses `source` as a module, picking TypeScript or ECMAScript syntax from
/// the file extension. Decorators are enabled in both.
pub(crate) fn parse_file(path: &Utf8Path, source: &str) -> Result<ParsedFile, TransformError> {
    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(
        FileName::Custom(path.to_string()).into(),
        source.to_string(),
    );
    let mut parser = Parser::new(syntax_for(path), StringInput::from(&*fm), None);
    let module = parser
        .parse_module()
        .map_err(|err| TransformError::Parse {
            path: path.to_string(),
            message: format!("{:?}", err.kind()),
        })?;
    Ok(ParsedFile {
        module,
        start: fm.start_pos,
    })
}

fn syntax_for(path: &Utf8Path) -> Syntax {
    match path.extension() {
        Some("ts") | Some("mts") | Some("cts") => Syntax::Typescript(TsSyntax {
            tsx: false,
            decorators: true,
            ..Default::default()
        }),
        Some("tsx") => Syntax::Typescript(TsSyntax {
            tsx: true,
            decorators: true,
            ..Default::default()
        }),
        ext => Syntax::Es(EsSyntax {
            jsx: ext == Some("jsx"),
            decorators: true,
            decorators_before_export: true,
            ..Default::default()
        }),
    }
}
