//! Functional rewriting of decorator object literals.
//!
//! A [`LiteralDraft`] starts as the original property list of one literal.
//! Removals drop original entries, additions append synthetic ones, and the
//! finished draft renders to the replacement text for the literal's span.
//! Comments written before a kept property travel with it; comments after the
//! last property stay at the end. The parsed tree itself is never touched.

use crate::ast_utils::property_name;
use crate::node::PropNode;
use crate::source::SourceText;
use swc_common::{Span, Spanned};
use swc_ecma_ast::{ObjectLit, PropOrSpread};

#[derive(Debug, Clone)]
enum DraftProp<'a> {
    /// An entry of the original literal and its index there.
    Original(usize, &'a PropOrSpread),
    Added(PropNode),
}

impl DraftProp<'_> {
    fn name(&self) -> Option<&str> {
        match self {
            DraftProp::Original(_, prop) => property_name(prop),
            DraftProp::Added(prop) => prop.name(),
        }
    }
}

/// The property list of a literal under construction.
#[derive(Debug, Clone)]
pub struct LiteralDraft<'a> {
    node: &'a ObjectLit,
    props: Vec<DraftProp<'a>>,
    modified: bool,
}

impl<'a> LiteralDraft<'a> {
    pub fn new(node: &'a ObjectLit) -> Self {
        Self {
            node,
            props: node
                .props
                .iter()
                .enumerate()
                .map(|(index, prop)| DraftProp::Original(index, prop))
                .collect(),
            modified: false,
        }
    }

    /// Span of the literal this draft replaces.
    pub fn span(&self) -> Span {
        self.node.span
    }

    /// Removes the first property named `name`, if any.
    ///
    /// Spreads and computed keys never match.
    pub fn remove_property(mut self, name: &str) -> Self {
        if let Some(index) = self.props.iter().position(|prop| prop.name() == Some(name)) {
            self.props.remove(index);
            self.modified = true;
        }
        self
    }

    /// Appends a property after all existing ones.
    pub fn add_property_assignment(mut self, prop: PropNode) -> Self {
        self.props.push(DraftProp::Added(prop));
        self.modified = true;
        self
    }

    /// Appends several properties, keeping their order.
    pub fn add_property_assignments(self, props: impl IntoIterator<Item = PropNode>) -> Self {
        props
            .into_iter()
            .fold(self, |draft, prop| draft.add_property_assignment(prop))
    }

    /// Removes the property named `name`, then appends `prop` in its place at
    /// the end of the list.
    pub fn replace_property(self, name: &str, prop: PropNode) -> Self {
        self.remove_property(name).add_property_assignment(prop)
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Renders the literal.
    ///
    /// Kept properties are copied from `source` verbatim, together with the
    /// comments in front of them. A literal that was written across several
    /// lines stays one property per line.
    pub fn render(&self, source: &SourceText<'_>) -> String {
        if self.props.is_empty() {
            return "{}".to_string();
        }

        let original = source.slice(self.node.span);
        let inner = original
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'))
            .unwrap_or("");
        let (lead, trail) = if self.node.props.is_empty() {
            (" ", " ")
        } else {
            let body = inner.trim_start();
            let lead = &inner[..inner.len() - body.len()];
            let trail = &inner[inner.trim_end().len()..];
            (lead, trail)
        };
        let (lead, trail) = if lead.is_empty() { (" ", " ") } else { (lead, trail) };
        let separator = if lead.contains('\n') {
            format!(",{lead}")
        } else {
            ", ".to_string()
        };

        let (leading, trailing) = comments(self.node, source);
        let items: Vec<String> = self
            .props
            .iter()
            .map(|prop| match prop {
                DraftProp::Original(index, prop) => {
                    format!("{}{}", leading[*index], source.slice(prop.span()))
                }
                DraftProp::Added(prop) => prop.render(),
            })
            .collect();

        let mut out = String::with_capacity(original.len() + 64);
        out.push('{');
        out.push_str(lead);
        out.push_str(&items.join(&separator));
        if !trailing.is_empty() {
            out.push_str(if lead.contains('\n') { lead } else { " " });
            out.push_str(&trailing);
        }
        out.push_str(if trail.is_empty() { lead_trail(lead) } else { trail });
        out.push('}');
        out
    }
}

/// Comments in front of each original property, and after the last one.
///
/// Leading comments keep the whitespace that separates them from their
/// property. Separating commas are dropped.
fn comments(node: &ObjectLit, source: &SourceText<'_>) -> (Vec<String>, String) {
    let text = source.text();
    let literal = source.range(node.span);
    let mut from = (literal.start + 1).min(literal.end);
    let mut leading = Vec::with_capacity(node.props.len());
    for prop in &node.props {
        let range = source.range(prop.span());
        let gap = text.get(from..range.start).unwrap_or_default();
        let gap = drop_separator(gap);
        leading.push(if gap.trim().is_empty() {
            String::new()
        } else {
            gap.trim_start().to_string()
        });
        from = range.end.max(from);
    }
    let gap = text
        .get(from..literal.end.saturating_sub(1))
        .unwrap_or_default();
    let trailing = drop_separator(gap).trim().to_string();
    (leading, trailing)
}

/// Removes the first comma of `gap` that is not inside a comment.
fn drop_separator(gap: &str) -> String {
    let bytes = gap.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b',' => return format!("{}{}", &gap[..i], &gap[i + 1..]),
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                i = gap[i..].find('\n').map_or(bytes.len(), |end| i + end);
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = gap[i + 2..]
                    .find("*/")
                    .map_or(bytes.len(), |end| i + 2 + end + 2);
            }
            _ => i += 1,
        }
    }
    gap.to_string()
}

// `{ a }` closes with a space, `{\n  a\n}` with the newline before the brace.
fn lead_trail(lead: &str) -> &str {
    match lead.rfind('\n') {
        Some(index) => &lead[..=index],
        None => " ",
    }
}
