//! Template and styles classification.
//!
//! Styles may be written as a path string, a `require("<path>")` call, a
//! `{ scoped, style }` descriptor, or an array of those. Recognized shapes are
//! normalized into descriptors whose `style` is an import of the stylesheet
//! with a `?vue&type=style` query. Everything else is left exactly as written
//! and counts as unscoped.
//!
//! A template is only rewritten when it is `require("<path>")` with a single
//! string literal; it then becomes a spread of the compiled template import.

use crate::ast_utils::{import_path, is_style_descriptor, property_name};
use crate::node::{Node, PropNode};
use crate::source::SourceText;
use crate::value::{
    ComponentParams, Mapping, Opaque, ParamNames, Primitive, Value, COMPILED_PROP, SCOPE_ID_PROP,
};
use camino::Utf8Path;
use query_path::{encode_request, split_request, Query};
use swc_common::Spanned;

/// Replacement fragments computed for one decorator literal.
#[derive(Debug, Clone, PartialEq)]
pub struct Transformation {
    /// `_scopeId: "data-v-<id>"`, only when some style is scoped.
    pub scope_id: Option<PropNode>,
    /// `_compiled: true`, only when the template was rewritten.
    pub compiled: Option<PropNode>,
    /// The compiled template spread.
    pub template: Option<TemplateImport>,
    /// The normalized styles, only when classification changed something.
    pub styles: Option<PropNode>,
    /// Aggregate scoping of all styles.
    pub scoped: bool,
}

/// A rewritten template import.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateImport {
    /// The request the template is imported from, query included.
    pub request: String,
    /// `...require("<request>")`.
    pub spread: PropNode,
}

impl Transformation {
    /// The request of the rewritten template, if any.
    pub fn template_request(&self) -> Option<&str> {
        self.template.as_ref().map(|t| t.request.as_str())
    }

    /// Returns the fragments in splice order, each paired with the name of the
    /// property it supersedes.
    pub fn into_fragments(self, names: ParamNames<'_>) -> Vec<(String, PropNode)> {
        let mut fragments = Vec::with_capacity(4);
        if let Some(prop) = self.scope_id {
            fragments.push((SCOPE_ID_PROP.to_string(), prop));
        }
        if let Some(prop) = self.compiled {
            fragments.push((COMPILED_PROP.to_string(), prop));
        }
        if let Some(template) = self.template {
            fragments.push((names.template.to_string(), template.spread));
        }
        if let Some(prop) = self.styles {
            fragments.push((names.styles.to_string(), prop));
        }
        fragments
    }
}

struct StylesResult {
    node: Node,
    scoped: bool,
    changed: bool,
}

/// Computes [`Transformation`]s for the decorator literals of one file.
pub struct ComponentTransformer<'a> {
    source: SourceText<'a>,
    scope_id: &'a str,
    names: ParamNames<'a>,
}

impl<'a> ComponentTransformer<'a> {
    pub fn new(source: SourceText<'a>, scope_id: &'a str, names: ParamNames<'a>) -> Self {
        Self {
            source,
            scope_id,
            names,
        }
    }

    /// Classifies the styles and template of one decorator literal.
    ///
    /// Any `_scopeId` the author wrote is ignored; the computed scope id is
    /// always the one used.
    pub fn transform(&self, params: &ComponentParams<'_>) -> Transformation {
        let styles = params
            .styles
            .as_ref()
            .map(|value| self.transform_styles(value));
        let scoped = styles.as_ref().is_some_and(|result| result.scoped);

        let template = params
            .template
            .as_ref()
            .and_then(|value| self.transform_template(value, scoped));

        Transformation {
            scope_id: scoped.then(|| {
                PropNode::KeyValue(
                    SCOPE_ID_PROP.to_string(),
                    Node::Str(format!("data-v-{}", self.scope_id)),
                )
            }),
            compiled: template
                .as_ref()
                .map(|_| PropNode::KeyValue(COMPILED_PROP.to_string(), Node::Bool(true))),
            template,
            styles: styles
                .filter(|result| result.changed)
                .map(|result| PropNode::KeyValue(self.names.styles.to_string(), result.node)),
            scoped,
        }
    }

    fn transform_styles(&self, value: &Value<'_>) -> StylesResult {
        match value {
            Value::Primitive(Primitive::Str(path), _) => self.wrap_unscoped(path),
            Value::Mapping(mapping) if is_style_descriptor(mapping.node) => {
                self.transform_descriptor(value, mapping)
            }
            Value::Sequence(seq) => {
                let results: Vec<_> = seq
                    .items
                    .iter()
                    .map(|item| self.transform_styles(item))
                    .collect();
                if !results.iter().any(|result| result.changed) {
                    return self.unchanged(value);
                }
                let scoped = results.iter().any(|result| result.scoped);
                StylesResult {
                    node: Node::Array(results.into_iter().map(|result| result.node).collect()),
                    scoped,
                    changed: true,
                }
            }
            other => match other.as_expr().and_then(import_path) {
                Some(path) => self.wrap_unscoped(path),
                None => self.unchanged(other),
            },
        }
    }

    fn transform_descriptor(&self, value: &Value<'_>, mapping: &Mapping<'_>) -> StylesResult {
        let scoped = mapping
            .entries
            .get("scoped")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let path = mapping
            .entries
            .get("style")
            .and_then(|style| style.as_str().or_else(|| style.as_expr().and_then(import_path)));
        // An unrecognized `style` expression keeps the descriptor as written
        // and counts as unscoped, even under `scoped: true`.
        let Some(path) = path else {
            return self.unchanged(value);
        };

        let style = self.style_import(path, scoped);
        let props = mapping
            .node
            .props
            .iter()
            .map(|prop| match property_name(prop) {
                Some("style") => PropNode::KeyValue("style".to_string(), style.clone()),
                _ => PropNode::Source(self.source.slice(prop.span()).to_string()),
            })
            .collect();
        StylesResult {
            node: Node::Object(props),
            scoped,
            changed: true,
        }
    }

    fn wrap_unscoped(&self, path: &str) -> StylesResult {
        StylesResult {
            node: Node::Object(vec![
                PropNode::KeyValue("scoped".to_string(), Node::Bool(false)),
                PropNode::KeyValue("style".to_string(), self.style_import(path, false)),
            ]),
            scoped: false,
            changed: true,
        }
    }

    fn unchanged(&self, value: &Value<'_>) -> StylesResult {
        let node = match value {
            Value::Opaque(Opaque::Hole) => Node::Hole,
            other => Node::Source(self.source.slice(other.span()).to_string()),
        };
        StylesResult {
            node,
            scoped: false,
            changed: false,
        }
    }

    fn transform_template(&self, value: &Value<'_>, scoped: bool) -> Option<TemplateImport> {
        let path = value.as_expr().and_then(import_path)?;
        let request = encode_request(path, &self.resource_query("template", path, scoped));
        Some(TemplateImport {
            spread: PropNode::Spread(Node::Import(request.clone())),
            request,
        })
    }

    fn style_import(&self, path: &str, scoped: bool) -> Node {
        Node::Import(encode_request(
            path,
            &self.resource_query("style", path, scoped),
        ))
    }

    /// Builds `vue&type=<kind>&lang=<ext>[&index=0][&id=<scope>&scoped=true]`.
    fn resource_query(&self, kind: &str, path: &str, scoped: bool) -> Query {
        let mut query = Query::new().flag("vue").set("type", kind);
        if let Some(lang) = lang_of(path) {
            query = query.set("lang", lang);
        }
        if kind == "style" {
            query = query.set("index", "0");
        }
        if scoped {
            query = query.set("id", self.scope_id).set("scoped", "true");
        }
        query
    }
}

/// The language of a resource, taken from the extension of its path.
fn lang_of(request: &str) -> Option<&str> {
    let (path, _) = split_request(request);
    Utf8Path::new(path)
        .extension()
        .filter(|ext| !ext.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast_utils::{decorator_argument, find_decorator};
    use crate::parse::parse_file;
    use pretty_assertions::assert_eq;
    use swc_ecma_ast::{Decl, ModuleDecl, ModuleItem};

    const NAMES: ParamNames<'static> = ParamNames {
        template: "template",
        styles: "styles",
    };

    /// Runs the transformer on `@Component(<literal>) export class A {}` and
    /// renders every fragment.
    fn run(literal: &str) -> (Vec<(String, String)>, bool) {
        let source = format!("@Component({literal}) export class A {{}}");
        let parsed = parse_file(Utf8Path::new("A.ts"), &source).expect("should parse");
        let ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) = &parsed.module.body[0] else {
            panic!("expected export");
        };
        let Decl::Class(class_decl) = &export.decl else {
            panic!("expected class");
        };
        let call = find_decorator(&class_decl.class, "Component").expect("decorator");
        let literal = decorator_argument(call).expect("literal");
        let params = ComponentParams::extract(literal, NAMES);

        let text = SourceText::new(&source, parsed.start);
        let transformation = ComponentTransformer::new(text, "abc-0", NAMES).transform(&params);
        let scoped = transformation.scoped;
        let fragments = transformation
            .into_fragments(NAMES)
            .into_iter()
            .map(|(slot, prop)| (slot, prop.render()))
            .collect();
        (fragments, scoped)
    }

    fn pair(slot: &str, rendered: &str) -> (String, String) {
        (slot.to_string(), rendered.to_string())
    }

    #[test]
    fn test_string_style_is_wrapped_unscoped() {
        let (fragments, scoped) = run(r#"{ styles: "s.css" }"#);
        assert!(!scoped);
        assert_eq!(
            fragments,
            vec![pair(
                "styles",
                r#"styles: { scoped: false, style: require("s.css?vue&type=style&lang=css&index=0") }"#
            )]
        );
    }

    #[test]
    fn test_import_style_is_wrapped_unscoped() {
        let (fragments, scoped) = run(r#"{ styles: require("./a.scss") }"#);
        assert!(!scoped);
        assert_eq!(
            fragments,
            vec![pair(
                "styles",
                r#"styles: { scoped: false, style: require("./a.scss?vue&type=style&lang=scss&index=0") }"#
            )]
        );
    }

    #[test]
    fn test_scoped_descriptor_injects_scope_id() {
        let (fragments, scoped) = run(r#"{ styles: { scoped: true, style: require("s.css") } }"#);
        assert!(scoped);
        assert_eq!(
            fragments,
            vec![
                pair("_scopeId", r#"_scopeId: "data-v-abc-0""#),
                pair(
                    "styles",
                    r#"styles: { scoped: true, style: require("s.css?vue&type=style&lang=css&index=0&id=abc-0&scoped=true") }"#
                ),
            ]
        );
    }

    #[test]
    fn test_descriptor_with_string_style() {
        let (fragments, scoped) = run(r#"{ styles: { style: "b.less", scoped: false } }"#);
        assert!(!scoped);
        assert_eq!(
            fragments,
            vec![pair(
                "styles",
                r#"styles: { style: require("b.less?vue&type=style&lang=less&index=0"), scoped: false }"#
            )]
        );
    }

    #[test]
    fn test_scoped_descriptor_with_opaque_style_is_unscoped() {
        let (fragments, scoped) = run(r#"{ styles: { scoped: true, style: sheet } }"#);
        assert!(!scoped);
        assert!(fragments.is_empty());
    }

    #[test]
    fn test_sequence_scoping_is_any() {
        let (fragments, scoped) =
            run(r#"{ styles: ["a.css", { scoped: true, style: "b.scss" }, other] }"#);
        assert!(scoped);
        assert_eq!(
            fragments,
            vec![
                pair("_scopeId", r#"_scopeId: "data-v-abc-0""#),
                pair(
                    "styles",
                    concat!(
                        r#"styles: [{ scoped: false, style: require("a.css?vue&type=style&lang=css&index=0") }, "#,
                        r#"{ scoped: true, style: require("b.scss?vue&type=style&lang=scss&index=0&id=abc-0&scoped=true") }, "#,
                        "other]"
                    )
                ),
            ]
        );
    }

    #[test]
    fn test_unrecognized_styles_untouched() {
        let (fragments, scoped) = run("{ styles: [sheetA, sheetB], template: tpl }");
        assert!(!scoped);
        assert!(fragments.is_empty());

        let (fragments, _) = run("{ styles: { style: 'a.css' } }");
        assert!(fragments.is_empty());
    }

    #[test]
    fn test_template_import_becomes_spread() {
        let (fragments, _) = run(r#"{ template: require("./t.pug") }"#);
        assert_eq!(
            fragments,
            vec![
                pair("_compiled", "_compiled: true"),
                pair(
                    "template",
                    r#"...require("./t.pug?vue&type=template&lang=pug")"#
                ),
            ]
        );
    }

    #[test]
    fn test_template_carries_scope_when_styles_scoped() {
        let (fragments, _) = run(
            r#"{ template: require("./t.html?raw"), styles: [{ scoped: true, style: "s.css" }] }"#,
        );
        assert_eq!(
            fragments[2],
            pair(
                "template",
                r#"...require("./t.html?raw&vue&type=template&lang=html&id=abc-0&scoped=true")"#
            )
        );
    }

    #[test]
    fn test_other_template_shapes_untouched() {
        for literal in [
            r#"{ template: "<div></div>" }"#,
            r#"{ template: require("./a.html", "b") }"#,
            r#"{ template: require(name) }"#,
            r#"{ template: load("./t.html") }"#,
        ] {
            let (fragments, _) = run(literal);
            assert!(fragments.is_empty(), "{literal} should be untouched");
        }
    }

    #[test]
    fn test_lang_of() {
        assert_eq!(lang_of("./t.pug"), Some("pug"));
        assert_eq!(lang_of("./t.pug?raw"), Some("pug"));
        assert_eq!(lang_of("./template"), None);
    }
}
