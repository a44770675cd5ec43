//! Predicates and extractors over swc syntax nodes.
//!
//! Nothing here mutates the tree. Shapes that do not match exactly are
//! reported as `None`/`false` and left for callers to treat as opaque.

use swc_common::{Span, Spanned};
use swc_ecma_ast::{
    CallExpr, Callee, Class, ClassDecl, Decl, Decorator, Expr, ExprOrSpread, Lit, ModuleItem,
    ObjectLit, Prop, PropName, PropOrSpread, Stmt, Str,
};

/// The module-loading call recognized as a resource import.
pub const IMPORT_PRIMITIVE: &str = "require";

/// Returns the string value of a literal.
pub fn str_value(s: &Str) -> Option<&str> {
    s.value.as_str()
}

/// Returns the name of a property key known at compile time
/// (identifier or string literal).
pub fn prop_name_str(key: &PropName) -> Option<&str> {
    match key {
        PropName::Ident(ident) => Some(ident.sym.as_str()),
        PropName::Str(s) => str_value(s),
        _ => None,
    }
}

/// Returns the compile-time name of an object-literal entry.
///
/// Spreads and computed keys have no such name.
pub fn property_name(prop: &PropOrSpread) -> Option<&str> {
    let PropOrSpread::Prop(prop) = prop else {
        return None;
    };
    match prop.as_ref() {
        Prop::KeyValue(kv) => prop_name_str(&kv.key),
        Prop::Shorthand(ident) => Some(ident.sym.as_str()),
        Prop::Method(method) => prop_name_str(&method.key),
        Prop::Getter(getter) => prop_name_str(&getter.key),
        Prop::Setter(setter) => prop_name_str(&setter.key),
        Prop::Assign(assign) => Some(assign.key.sym.as_str()),
    }
}

/// Returns the class declared directly in the module body, if `item` is one.
///
/// Such classes count as exported even without an `export` keyword.
pub fn top_level_class(item: &ModuleItem) -> Option<&ClassDecl> {
    match item {
        ModuleItem::Stmt(Stmt::Decl(Decl::Class(class_decl))) => Some(class_decl),
        _ => None,
    }
}

/// Returns the call if `decorator` is `@name(...)` with a plain identifier callee.
pub fn decorator_call<'a>(decorator: &'a Decorator, name: &str) -> Option<&'a CallExpr> {
    let Expr::Call(call) = decorator.expr.as_ref() else {
        return None;
    };
    match &call.callee {
        Callee::Expr(callee) => match callee.as_ref() {
            Expr::Ident(ident) if ident.sym.as_str() == name => Some(call),
            _ => None,
        },
        _ => None,
    }
}

/// Finds the decorator call named `name` on a class.
///
/// Only class-level decorators are candidates; decorators on members and on
/// constructor parameters are never considered. When several applications
/// match, the last one wins.
pub fn find_decorator<'a>(class: &'a Class, name: &str) -> Option<&'a CallExpr> {
    class
        .decorators
        .iter()
        .rev()
        .find_map(|decorator| decorator_call(decorator, name))
}

/// Returns the object literal passed as the first argument of a decorator call.
pub fn decorator_argument(call: &CallExpr) -> Option<&ObjectLit> {
    match call.args.first() {
        Some(ExprOrSpread { spread: None, expr }) => match expr.as_ref() {
            Expr::Object(obj) => Some(obj),
            _ => None,
        },
        _ => None,
    }
}

/// Returns the path if `expr` is `require("<path>")` with exactly one
/// string-literal argument.
///
/// Member callees (`module.require(..)`), spreads, zero or several arguments,
/// and non-literal arguments all yield `None`.
pub fn import_path(expr: &Expr) -> Option<&str> {
    let Expr::Call(call) = expr else {
        return None;
    };
    let Callee::Expr(callee) = &call.callee else {
        return None;
    };
    let Expr::Ident(ident) = callee.as_ref() else {
        return None;
    };
    if ident.sym.as_str() != IMPORT_PRIMITIVE || call.args.len() != 1 {
        return None;
    }
    match &call.args[0] {
        ExprOrSpread { spread: None, expr } => match expr.as_ref() {
            Expr::Lit(Lit::Str(s)) => str_value(s),
            _ => None,
        },
        _ => None,
    }
}

/// Returns true for the `undefined` identifier.
pub fn is_undefined(expr: &Expr) -> bool {
    matches!(expr, Expr::Ident(ident) if ident.sym.as_str() == "undefined")
}

/// Returns true if an object literal has the shape `{ scoped: <bool>, style: <defined> }`.
pub fn is_style_descriptor(obj: &ObjectLit) -> bool {
    let mut has_scoped = false;
    let mut has_style = false;
    for prop in &obj.props {
        let PropOrSpread::Prop(inner) = prop else {
            continue;
        };
        let Prop::KeyValue(kv) = inner.as_ref() else {
            continue;
        };
        match prop_name_str(&kv.key) {
            Some("scoped") => has_scoped = matches!(kv.value.as_ref(), Expr::Lit(Lit::Bool(_))),
            Some("style") => has_style = !is_undefined(&kv.value),
            _ => {}
        }
    }
    has_scoped && has_style
}

/// Returns the span of an array element including its spread token.
pub fn element_span(element: &ExprOrSpread) -> Span {
    match element.spread {
        Some(dot3) => Span::new(dot3.lo, element.expr.span_hi()),
        None => element.expr.span(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_file;
    use camino::Utf8Path;
    use swc_ecma_ast::{Module, ModuleDecl};

    fn parse(source: &str) -> Module {
        parse_file(Utf8Path::new("test.ts"), source)
            .expect("test source should parse")
            .module
    }

    fn first_class(module: &Module) -> &Class {
        for item in &module.body {
            if let Some(decl) = top_level_class(item) {
                return decl.class.as_ref();
            }
            if let ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) = item {
                if let Decl::Class(decl) = &export.decl {
                    return decl.class.as_ref();
                }
            }
        }
        panic!("no class in test source");
    }

    fn expr_of(module: &Module) -> &Expr {
        match &module.body[0] {
            ModuleItem::Stmt(Stmt::Expr(stmt)) => stmt.expr.as_ref(),
            _ => panic!("expected expression statement"),
        }
    }

    #[test]
    fn test_top_level_class_counts_without_export() {
        let module = parse("class A {}\nfunction f() { class B {} }");
        assert!(top_level_class(&module.body[0]).is_some());
        assert!(top_level_class(&module.body[1]).is_none());
    }

    #[test]
    fn test_find_decorator_last_wins() {
        let module = parse("@Component({ a: 1 }) @Other() @Component({ b: 2 }) export class A {}");
        let class = first_class(&module);
        let call = find_decorator(class, "Component").unwrap();
        let obj = decorator_argument(call).unwrap();
        assert_eq!(property_name(&obj.props[0]), Some("b"));
    }

    #[test]
    fn test_decorator_must_be_called_identifier() {
        let module = parse("@Component export class A {}\n@ns.Component({}) export class B {}");
        for item in &module.body {
            let ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) = item else {
                continue;
            };
            let Decl::Class(decl) = &export.decl else {
                continue;
            };
            assert!(find_decorator(&decl.class, "Component").is_none());
        }
    }

    #[test]
    fn test_parameter_decorators_are_not_candidates() {
        let module = parse("export class A { constructor(@Component({}) x: number) {} }");
        assert!(find_decorator(first_class(&module), "Component").is_none());
    }

    #[test]
    fn test_decorator_argument_requires_object_literal() {
        let module = parse("@Component(options) export class A {}");
        let call = find_decorator(first_class(&module), "Component").unwrap();
        assert!(decorator_argument(call).is_none());
    }

    #[test]
    fn test_import_path() {
        assert_eq!(import_path(expr_of(&parse("require('./a.html')"))), Some("./a.html"));
        assert_eq!(import_path(expr_of(&parse("require()"))), None);
        assert_eq!(import_path(expr_of(&parse("require('a', 'b')"))), None);
        assert_eq!(import_path(expr_of(&parse("require(path)"))), None);
        assert_eq!(import_path(expr_of(&parse("module.require('a')"))), None);
        assert_eq!(import_path(expr_of(&parse("load('a')"))), None);
    }

    #[test]
    fn test_style_descriptor_shape() {
        let check = |source: &str| {
            let module = parse(source);
            match expr_of(&module) {
                Expr::Paren(paren) => match paren.expr.as_ref() {
                    Expr::Object(obj) => is_style_descriptor(obj),
                    _ => panic!("expected object"),
                },
                _ => panic!("expected parenthesized object"),
            }
        };
        assert!(check("({ scoped: true, style: 'a.css' })"));
        assert!(check("({ style: require('a.css'), scoped: false })"));
        assert!(!check("({ scoped: 'yes', style: 'a.css' })"));
        assert!(!check("({ scoped: true })"));
        assert!(!check("({ scoped: true, style: undefined })"));
    }

    #[test]
    fn test_property_names() {
        let module = parse("({ a: 1, 'b': 2, [c]: 3, d, ...e, f() {} })");
        let Expr::Paren(paren) = expr_of(&module) else {
            panic!("expected paren");
        };
        let Expr::Object(obj) = paren.expr.as_ref() else {
            panic!("expected object");
        };
        let names: Vec<_> = obj.props.iter().map(property_name).collect();
        assert_eq!(
            names,
            vec![Some("a"), Some("b"), None, Some("d"), None, Some("f")]
        );
    }
}
