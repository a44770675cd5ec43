//! The per-file pass.
//!
//! Classes are found with a single depth-first walk of the module. Each
//! top-level or exported class that carries the decorator is processed once,
//! in document order, and its subtree is not searched any further. Exported
//! classes inside namespaces are candidates too; classes nested in functions
//! or blocks are not. Edits are collected as text replacements and spliced
//! into the source at the end.

use crate::ast_utils::{decorator_argument, find_decorator, top_level_class};
use crate::error::TransformError;
use crate::hash::{file_scope_hash, module_hash};
use crate::hmr::{generate_glue, HmrRecord, HmrTable};
use crate::loader::LoaderContext;
use crate::node::{Node, PropNode};
use crate::options::{BuildSettings, LoaderOptions};
use crate::parse::parse_file;
use crate::rewrite::LiteralDraft;
use crate::source::SourceText;
use crate::styles::ComponentTransformer;
use crate::value::{ComponentParams, ParamNames, FILE_PROP, MODULE_ID_PROP};
use swc_common::Spanned;
use swc_ecma_ast::{
    Class, Decl, DefaultDecl, ExportDecl, ExportDefaultDecl, Ident, Module, ModuleDecl,
    ModuleItem, ObjectLit, TsModuleBlock, TsModuleDecl, TsModuleName, TsNamespaceDecl,
};
use swc_ecma_visit::{Visit, VisitWith};
use tracing::{debug, trace};

const BOM: char = '\u{feff}';

/// The outcome of transforming one file.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformResult {
    /// The transformed source text.
    pub code: String,
    /// Every processed component, by class name.
    pub hmr: HmrTable,
}

/// Transforms one file.
///
/// Files that never mention the decorator name are returned unchanged without
/// being parsed. Any other file is either fully transformed or rejected with
/// an error; partial output is never produced.
pub fn transform(
    source: &str,
    ctx: &LoaderContext,
    options: &LoaderOptions,
) -> Result<TransformResult, TransformError> {
    options.validate()?;
    let settings = BuildSettings::resolve(ctx, options);

    if !source.contains(settings.decorator_name.as_str()) {
        debug!(path = %ctx.resource_path, "decorator not mentioned, passing through");
        return Ok(TransformResult {
            code: source.to_string(),
            hmr: HmrTable::new(),
        });
    }

    let (bom, body) = match source.strip_prefix(BOM) {
        Some(rest) => (&source[..BOM.len_utf8()], rest),
        None => ("", source),
    };

    let parsed = parse_file(&ctx.resource_path, body)?;
    let file_hash = file_scope_hash(&settings.short_path, body, settings.production);
    let module_hash = module_hash(&ctx.request);

    let mut scanner = ComponentScanner {
        source: SourceText::new(body, parsed.start),
        settings: &settings,
        file_hash: &file_hash,
        module_hash: &module_hash,
        namespace: Vec::new(),
        state: FileState::default(),
    };
    parsed.module.visit_with(&mut scanner);
    let FileState { edits, hmr, .. } = scanner.state;

    let mut code = String::with_capacity(source.len());
    code.push_str(bom);
    code.push_str(&apply_edits(body, edits));

    if settings.emits_hot_reload() && !hmr.is_empty() {
        if !code.ends_with('\n') {
            code.push('\n');
        }
        code.push_str(&generate_glue(&hmr));
    }

    Ok(TransformResult { code, hmr })
}

/// Everything accumulated while walking one file.
#[derive(Debug, Default)]
struct FileState {
    /// Decorated classes seen so far, including skipped ones.
    ordinal: usize,
    edits: Vec<Edit>,
    hmr: HmrTable,
}

impl FileState {
    fn push_edit(&mut self, start: usize, end: usize, text: String) {
        let order = self.edits.len();
        self.edits.push(Edit {
            start,
            end,
            text,
            order,
        });
    }
}

/// Replaces `start..end` of the source with `text`; an insertion when empty.
#[derive(Debug)]
struct Edit {
    start: usize,
    end: usize,
    text: String,
    order: usize,
}

fn apply_edits(source: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by(|a, b| a.start.cmp(&b.start).then(a.order.cmp(&b.order)));
    let mut out = String::with_capacity(
        source.len() + edits.iter().map(|edit| edit.text.len()).sum::<usize>(),
    );
    let mut last = 0;
    for edit in edits {
        if edit.start < last || edit.end > source.len() {
            continue;
        }
        out.push_str(&source[last..edit.start]);
        out.push_str(&edit.text);
        last = edit.end;
    }
    out.push_str(&source[last..]);
    out
}

struct ComponentScanner<'a> {
    source: SourceText<'a>,
    settings: &'a BuildSettings,
    file_hash: &'a str,
    module_hash: &'a str,
    /// Names of the enclosing namespaces, outermost first.
    namespace: Vec<String>,
    state: FileState,
}

impl Visit for ComponentScanner<'_> {
    fn visit_module(&mut self, module: &Module) {
        for item in &module.body {
            match candidate_class(item) {
                Some((class, ident)) => self.visit_candidate(class, ident),
                None => item.visit_with(self),
            }
        }
    }

    fn visit_ts_module_decl(&mut self, decl: &TsModuleDecl) {
        match &decl.id {
            TsModuleName::Ident(id) => {
                self.namespace.push(id.sym.to_string());
                decl.body.visit_with(self);
                self.namespace.pop();
            }
            TsModuleName::Str(_) => decl.body.visit_with(self),
        }
    }

    // `namespace A.B {}` nests the `B` part as a namespace declaration.
    fn visit_ts_namespace_decl(&mut self, decl: &TsNamespaceDecl) {
        self.namespace.push(decl.id.sym.to_string());
        decl.body.visit_with(self);
        self.namespace.pop();
    }

    fn visit_ts_module_block(&mut self, block: &TsModuleBlock) {
        for item in &block.body {
            match exported_class(item) {
                Some((class, ident)) => self.visit_candidate(class, Some(ident)),
                None => item.visit_with(self),
            }
        }
    }
}

/// The class declared by a module-level item, if it is one the decorator may
/// apply to: a bare class declaration, `export class`, or `export default class`.
fn candidate_class(item: &ModuleItem) -> Option<(&Class, Option<&Ident>)> {
    if let Some(decl) = top_level_class(item) {
        return Some((decl.class.as_ref(), Some(&decl.ident)));
    }
    if let Some((class, ident)) = exported_class(item) {
        return Some((class, Some(ident)));
    }
    match item {
        ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(ExportDefaultDecl {
            decl: DefaultDecl::Class(expr),
            ..
        })) => Some((expr.class.as_ref(), expr.ident.as_ref())),
        _ => None,
    }
}

/// The class of an `export class` item, at module level or inside a namespace.
fn exported_class(item: &ModuleItem) -> Option<(&Class, &Ident)> {
    match item {
        ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(ExportDecl {
            decl: Decl::Class(decl),
            ..
        })) => Some((decl.class.as_ref(), &decl.ident)),
        _ => None,
    }
}

impl ComponentScanner<'_> {
    fn visit_candidate(&mut self, class: &Class, ident: Option<&Ident>) {
        let Some(call) = find_decorator(class, &self.settings.decorator_name) else {
            class.visit_with(self);
            return;
        };

        let ordinal = self.state.ordinal;
        self.state.ordinal += 1;

        let Some(literal) = decorator_argument(call) else {
            trace!(ordinal, "decorator has no object literal argument, skipping");
            return;
        };
        self.process_component(class, ident, literal, ordinal);
    }

    fn process_component(
        &mut self,
        class: &Class,
        ident: Option<&Ident>,
        literal: &ObjectLit,
        ordinal: usize,
    ) {
        let settings = self.settings;
        let names = ParamNames {
            template: &settings.template_param,
            styles: &settings.styles_param,
        };
        let class_name = match ident {
            Some(ident) => self.qualified_name(ident),
            None => format!("Component_{}_{}", self.file_hash, ordinal + 1),
        };
        let scope_id = format!("{}-{}", self.file_hash, ordinal);

        let params = ComponentParams::extract(literal, names);
        let transformation =
            ComponentTransformer::new(self.source, &scope_id, names).transform(&params);
        let scoped = transformation.scoped;

        self.state.hmr.insert(
            class_name.clone(),
            HmrRecord {
                scope_id: scope_id.clone(),
                template_request: transformation.template_request().map(str::to_owned),
            },
        );

        let mut draft = transformation
            .into_fragments(names)
            .into_iter()
            .fold(LiteralDraft::new(literal), |draft, (slot, prop)| {
                draft.replace_property(&slot, prop)
            });
        if settings.server {
            draft = draft.replace_property(
                MODULE_ID_PROP,
                string_prop(MODULE_ID_PROP, format!("{}-{}", self.module_hash, ordinal)),
            );
        }
        if !settings.production {
            draft = draft.replace_property(
                FILE_PROP,
                string_prop(FILE_PROP, settings.short_path.clone()),
            );
        }

        if draft.is_modified() {
            let range = self.source.range(draft.span());
            let text = draft.render(&self.source);
            self.state.push_edit(range.start, range.end, text);
        }

        if ident.is_none() && settings.emits_hot_reload() {
            self.name_anonymous_class(class, &class_name);
        }

        debug!(class = %class_name, scope_id = %scope_id, scoped, "rewrote component");
    }

    /// The name the glue uses to reach a class from module scope.
    fn qualified_name(&self, ident: &Ident) -> String {
        let mut name = self.namespace.join(".");
        if !name.is_empty() {
            name.push('.');
        }
        name.push_str(ident.sym.as_str());
        name
    }

    /// Gives an anonymous default-exported class a name the glue can refer to.
    fn name_anonymous_class(&mut self, class: &Class, name: &str) {
        let search_from = class
            .decorators
            .iter()
            .map(|decorator| decorator.span_hi())
            .fold(class.span.lo, std::cmp::max);
        let from = self.source.offset(search_from);
        let Some(keyword_end) = find_keyword(&self.source.text()[from..], "class") else {
            trace!(class = %name, "class keyword not found, leaving class anonymous");
            return;
        };
        let at = from + keyword_end;
        self.state.push_edit(at, at, format!(" {name}"));
    }
}

fn string_prop(name: &str, value: String) -> PropNode {
    PropNode::KeyValue(name.to_string(), Node::Str(value))
}

/// Byte offset just past the first standalone occurrence of `keyword`.
fn find_keyword(text: &str, keyword: &str) -> Option<usize> {
    let is_ident = |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '$';
    let mut from = 0;
    while let Some(found) = text[from..].find(keyword) {
        let start = from + found;
        let end = start + keyword.len();
        let before_ok = text[..start].chars().next_back().map_or(true, |c| !is_ident(c));
        let after_ok = text[end..].chars().next().map_or(true, |c| !is_ident(c));
        if before_ok && after_ok {
            return Some(end);
        }
        from = end;
    }
    None
}
