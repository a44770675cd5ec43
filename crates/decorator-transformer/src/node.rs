//! Synthetic syntax fragments spliced into rewritten literals.
//!
//! Generated code never goes through a printer for the whole file. Instead each
//! fragment renders itself, and anything relocated from the original source is
//! carried as its exact source text.

use crate::ast_utils::IMPORT_PRIMITIVE;

/// A synthetic expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A string literal.
    Str(String),
    /// A boolean literal.
    Bool(bool),
    /// `require("<request>")`.
    Import(String),
    /// An object literal.
    Object(Vec<PropNode>),
    /// An array literal.
    Array(Vec<Node>),
    /// An array hole.
    Hole,
    /// Original source text, relocated verbatim.
    Source(String),
}

/// A synthetic object-literal entry.
#[derive(Debug, Clone, PartialEq)]
pub enum PropNode {
    /// `key: value`.
    KeyValue(String, Node),
    /// `...value`.
    Spread(Node),
    /// An original entry, relocated verbatim.
    Source(String),
}

impl Node {
    /// Renders the expression as source text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write(&mut out);
        out
    }

    fn write(&self, out: &mut String) {
        match self {
            Node::Str(value) => out.push_str(&quote(value)),
            Node::Bool(value) => out.push_str(if *value { "true" } else { "false" }),
            Node::Import(request) => {
                out.push_str(IMPORT_PRIMITIVE);
                out.push('(');
                out.push_str(&quote(request));
                out.push(')');
            }
            Node::Object(props) => {
                if props.is_empty() {
                    out.push_str("{}");
                    return;
                }
                out.push_str("{ ");
                for (i, prop) in props.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    prop.write(out);
                }
                out.push_str(" }");
            }
            Node::Array(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    item.write(out);
                }
                // `[a, ]` would drop a trailing hole
                if matches!(items.last(), Some(Node::Hole)) {
                    out.push(',');
                }
                out.push(']');
            }
            Node::Hole => {}
            Node::Source(text) => out.push_str(text),
        }
    }
}

impl PropNode {
    /// The compile-time name of this entry, if it has one.
    pub fn name(&self) -> Option<&str> {
        match self {
            PropNode::KeyValue(key, _) => Some(key),
            PropNode::Spread(_) | PropNode::Source(_) => None,
        }
    }

    /// Renders the entry as source text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write(&mut out);
        out
    }

    fn write(&self, out: &mut String) {
        match self {
            PropNode::KeyValue(key, value) => {
                out.push_str(&render_key(key));
                out.push_str(": ");
                value.write(out);
            }
            PropNode::Spread(value) => {
                out.push_str("...");
                value.write(out);
            }
            PropNode::Source(text) => out.push_str(text),
        }
    }
}

/// Renders a property key, quoting it unless it is a plain identifier.
pub fn render_key(key: &str) -> String {
    if is_valid_identifier(key) {
        key.to_string()
    } else {
        quote(key)
    }
}

/// Renders a double-quoted string literal.
pub fn quote(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

pub(crate) fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return false,
    };
    if !(first.is_ascii_alphabetic() || first == '_' || first == '$') {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
