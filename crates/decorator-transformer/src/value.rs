//! Reconstructs best-effort values from object-literal syntax.
//!
//! Literals, arrays and nested objects become plain data; every other
//! expression is kept as a reference to its syntax node and is never
//! stringified or evaluated.

use crate::ast_utils::{element_span, property_name, str_value};
use indexmap::IndexMap;
use swc_common::{Span, Spanned, DUMMY_SP};
use swc_ecma_ast::{ArrayLit, Expr, ExprOrSpread, Lit, ObjectLit, Prop, PropOrSpread};

/// Decorator property holding the style scope attribute.
pub const SCOPE_ID_PROP: &str = "_scopeId";
/// Decorator property marking a precompiled template.
pub const COMPILED_PROP: &str = "_compiled";
/// Decorator property identifying the module during server rendering.
pub const MODULE_ID_PROP: &str = "_moduleId";
/// Decorator property holding the short source path.
pub const FILE_PROP: &str = "__file";

/// A reconstructed primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Bool(bool),
    Num(f64),
    Str(String),
}

/// A value reconstructed from syntax, possibly embedding opaque nodes.
#[derive(Debug, Clone)]
pub enum Value<'a> {
    Primitive(Primitive, Span),
    Sequence(Sequence<'a>),
    Mapping(Mapping<'a>),
    Opaque(Opaque<'a>),
}

/// An array literal, element-wise.
#[derive(Debug, Clone)]
pub struct Sequence<'a> {
    pub node: &'a ArrayLit,
    pub items: Vec<Value<'a>>,
}

/// An object literal, keyed by compile-time property names in source order.
#[derive(Debug, Clone)]
pub struct Mapping<'a> {
    pub node: &'a ObjectLit,
    pub entries: IndexMap<String, Value<'a>>,
    /// Spreads and computed-key entries, in encounter order.
    pub additional: Vec<&'a PropOrSpread>,
}

/// A syntax node that is carried along without interpretation.
#[derive(Debug, Clone, Copy)]
pub enum Opaque<'a> {
    /// Any expression that is not a literal, array or object.
    Expr(&'a Expr),
    /// A named entry that is not `key: value` (shorthand, method, accessor).
    Prop(&'a Prop),
    /// A spread array element.
    Element(&'a ExprOrSpread),
    /// An array hole.
    Hole,
}

impl<'a> Value<'a> {
    /// The span of the syntax this value was reconstructed from.
    pub fn span(&self) -> Span {
        match self {
            Value::Primitive(_, span) => *span,
            Value::Sequence(seq) => seq.node.span,
            Value::Mapping(mapping) => mapping.node.span,
            Value::Opaque(opaque) => opaque.span(),
        }
    }

    /// Returns the string if this is a string primitive.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Primitive(Primitive::Str(value), _) => Some(value),
            _ => None,
        }
    }

    /// Returns the boolean if this is a boolean primitive.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Primitive(Primitive::Bool(value), _) => Some(*value),
            _ => None,
        }
    }

    /// Returns the expression if this is an opaque expression.
    pub fn as_expr(&self) -> Option<&'a Expr> {
        match self {
            Value::Opaque(Opaque::Expr(expr)) => Some(expr),
            _ => None,
        }
    }
}

impl Opaque<'_> {
    /// The span of the carried node; dummy for holes.
    pub fn span(&self) -> Span {
        match self {
            Opaque::Expr(expr) => expr.span(),
            Opaque::Prop(prop) => prop.span(),
            Opaque::Element(element) => element_span(element),
            Opaque::Hole => DUMMY_SP,
        }
    }
}

/// Parses an object literal.
///
/// When `filter` is given, named entries outside it are skipped. Entries
/// without a compile-time name always go to [`Mapping::additional`].
pub fn parse_object<'a>(obj: &'a ObjectLit, filter: Option<&[&str]>) -> Mapping<'a> {
    let mut entries = IndexMap::new();
    let mut additional = Vec::new();

    for prop in &obj.props {
        let Some(name) = property_name(prop) else {
            additional.push(prop);
            continue;
        };
        if filter.is_some_and(|names| !names.contains(&name)) {
            continue;
        }
        let PropOrSpread::Prop(inner) = prop else {
            continue;
        };
        let value = match inner.as_ref() {
            Prop::KeyValue(kv) => parse_expr(&kv.value),
            other => Value::Opaque(Opaque::Prop(other)),
        };
        entries.insert(name.to_string(), value);
    }

    Mapping {
        node: obj,
        entries,
        additional,
    }
}

/// Parses an arbitrary expression.
pub fn parse_expr(expr: &Expr) -> Value<'_> {
    match expr {
        Expr::Lit(Lit::Str(s)) => match str_value(s) {
            Some(value) => Value::Primitive(Primitive::Str(value.to_string()), s.span),
            None => Value::Opaque(Opaque::Expr(expr)),
        },
        Expr::Lit(Lit::Num(n)) => Value::Primitive(Primitive::Num(n.value), n.span),
        Expr::Lit(Lit::Bool(b)) => Value::Primitive(Primitive::Bool(b.value), b.span),
        Expr::Object(obj) => Value::Mapping(parse_object(obj, None)),
        Expr::Array(arr) => Value::Sequence(parse_array(arr)),
        _ => Value::Opaque(Opaque::Expr(expr)),
    }
}

fn parse_array(arr: &ArrayLit) -> Sequence<'_> {
    let items = arr
        .elems
        .iter()
        .map(|elem| match elem {
            None => Value::Opaque(Opaque::Hole),
            Some(element) if element.spread.is_some() => Value::Opaque(Opaque::Element(element)),
            Some(element) => parse_expr(&element.expr),
        })
        .collect();
    Sequence { node: arr, items }
}

/// Configurable names of the template and styles parameters.
#[derive(Debug, Clone, Copy)]
pub struct ParamNames<'n> {
    pub template: &'n str,
    pub styles: &'n str,
}

/// The decorator parameters the engine reads.
#[derive(Debug, Clone)]
pub struct ComponentParams<'a> {
    pub scope_id: Option<Value<'a>>,
    pub compiled: Option<Value<'a>>,
    pub template: Option<Value<'a>>,
    pub styles: Option<Value<'a>>,
    /// Entries that could not be associated with a name.
    pub additional: Vec<&'a PropOrSpread>,
}

impl<'a> ComponentParams<'a> {
    /// Extracts the known parameters from a decorator literal.
    pub fn extract(literal: &'a ObjectLit, names: ParamNames<'_>) -> Self {
        let filter = [SCOPE_ID_PROP, COMPILED_PROP, names.template, names.styles];
        let Mapping {
            mut entries,
            additional,
            ..
        } = parse_object(literal, Some(&filter[..]));
        Self {
            scope_id: entries.shift_remove(SCOPE_ID_PROP),
            compiled: entries.shift_remove(COMPILED_PROP),
            template: entries.shift_remove(names.template),
            styles: entries.shift_remove(names.styles),
            additional,
        }
    }
}
