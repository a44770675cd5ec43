//! Nested query-string model.
//!
//! Parsing follows the bracket conventions bundlers use for loader queries:
//! repeated keys and `key[]` collapse into lists, `key[0]` addresses a list
//! slot, and `key[sub]` nests into a map. Repeated plain keys serialize back
//! as repeated plain keys. A key without `=` is a [`QueryValue::Flag`],
//! which is kept distinct from an absent key and from an empty value.

use indexmap::IndexMap;
use std::fmt;

/// A single query parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    /// A bare key without a value, e.g. `vue` in `?vue&type=style`.
    Flag,
    /// A key with a (possibly empty) value.
    Text(String),
    /// Bracket-indexed values, e.g. `a[]=1&a[]=2`.
    List(Vec<QueryValue>),
    /// A plain key given more than once, e.g. `a=1&a=2`.
    Repeated(Vec<QueryValue>),
    /// Bracket-nested values.
    Map(IndexMap<String, QueryValue>),
}

impl QueryValue {
    /// Appends another occurrence of the same key.
    fn push(&mut self, value: QueryValue) {
        match self {
            QueryValue::List(items) | QueryValue::Repeated(items) => items.push(value),
            other => {
                let first = std::mem::replace(other, QueryValue::Flag);
                *other = QueryValue::Repeated(vec![first, value]);
            }
        }
    }

    /// Returns the text value, if this is a [`QueryValue::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            QueryValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Text(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Text(value)
    }
}

/// An ordered set of query parameters.
///
/// Inserting a key that already exists replaces its value in place, so the
/// serialized order is: surviving original keys in their original order,
/// followed by new keys in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: IndexMap<String, QueryValue>,
}

impl Query {
    /// Creates an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a query string (without the leading `?`).
    ///
    /// Never fails: malformed escapes are kept literally and malformed bracket
    /// keys are treated as plain keys.
    pub fn parse(input: &str) -> Self {
        let mut query = Query::new();
        for pair in input.split('&') {
            if pair.is_empty() {
                continue;
            }
            let (raw_key, value) = match pair.split_once('=') {
                Some((key, value)) => (key, QueryValue::Text(decode(value))),
                None => (pair, QueryValue::Flag),
            };
            let key = decode(raw_key);
            if key.is_empty() {
                continue;
            }
            let (root, segments) = split_key(&key);
            insert_nested(&mut query.params, root, &segments, value);
        }
        query
    }

    /// Adds a bare-key parameter.
    pub fn flag(mut self, key: impl Into<String>) -> Self {
        self.insert(key, QueryValue::Flag);
        self
    }

    /// Adds a text parameter.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, QueryValue::Text(value.into()));
        self
    }

    /// Inserts a parameter, replacing an existing value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: QueryValue) -> Option<QueryValue> {
        self.params.insert(key.into(), value)
    }

    /// Returns the value for `key`.
    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.params.get(key)
    }

    /// Returns true if `key` is present (as a flag or with a value).
    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Merges `other` into this query; colliding keys take `other`'s value.
    pub fn merge(&mut self, other: &Query) {
        for (key, value) in &other.params {
            self.params.insert(key.clone(), value.clone());
        }
    }

    /// Returns the number of top-level parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns true if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterates over top-level parameters in serialization order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.params.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pairs = Vec::with_capacity(self.params.len());
        for (key, value) in &self.params {
            write_pair(&mut pairs, &encode(key), value);
        }
        f.write_str(&pairs.join("&"))
    }
}

/// Splits `a[b][]` into `("a", ["b", ""])`. Anything that is not a clean run
/// of bracket segments after the root is returned whole as the root.
fn split_key(key: &str) -> (&str, Vec<&str>) {
    let Some(open) = key.find('[') else {
        return (key, Vec::new());
    };
    if open == 0 {
        return (key, Vec::new());
    }

    let mut segments = Vec::new();
    let mut rest = &key[open..];
    while let Some(stripped) = rest.strip_prefix('[') {
        let Some(close) = stripped.find(']') else {
            return (key, Vec::new());
        };
        segments.push(&stripped[..close]);
        rest = &stripped[close + 1..];
    }
    if !rest.is_empty() {
        return (key, Vec::new());
    }
    (&key[..open], segments)
}

fn insert_nested(
    map: &mut IndexMap<String, QueryValue>,
    key: &str,
    segments: &[&str],
    value: QueryValue,
) {
    let Some((segment, rest)) = segments.split_first() else {
        match map.get_mut(key) {
            Some(existing) => existing.push(value),
            None => {
                map.insert(key.to_string(), value);
            }
        }
        return;
    };

    if is_list_segment(segment) {
        let slot = map
            .entry(key.to_string())
            .or_insert_with(|| QueryValue::List(Vec::new()));
        if let QueryValue::Repeated(items) = &mut *slot {
            let items = std::mem::take(items);
            *slot = QueryValue::List(items);
        } else if !matches!(slot, QueryValue::List(_)) {
            *slot = QueryValue::List(Vec::new());
        }
        if let QueryValue::List(items) = slot {
            insert_into_list(items, segment, rest, value);
        }
    } else {
        let slot = map
            .entry(key.to_string())
            .or_insert_with(|| QueryValue::Map(IndexMap::new()));
        if !matches!(slot, QueryValue::Map(_)) {
            *slot = QueryValue::Map(IndexMap::new());
        }
        if let QueryValue::Map(inner) = slot {
            insert_nested(inner, segment, rest, value);
        }
    }
}

fn insert_into_list(items: &mut Vec<QueryValue>, segment: &str, rest: &[&str], value: QueryValue) {
    let index = segment.parse::<usize>().ok();
    match index {
        Some(index) if index < items.len() && !rest.is_empty() => {
            if let QueryValue::Map(inner) = &mut items[index] {
                let (head, tail) = (rest[0], &rest[1..]);
                insert_nested(inner, head, tail, value);
            } else {
                items[index] = nest(rest, value);
            }
        }
        _ => items.push(nest(rest, value)),
    }
}

fn nest(segments: &[&str], value: QueryValue) -> QueryValue {
    match segments.split_first() {
        None => value,
        Some((segment, rest)) if is_list_segment(segment) => {
            QueryValue::List(vec![nest(rest, value)])
        }
        Some((segment, rest)) => {
            let mut map = IndexMap::new();
            map.insert(segment.to_string(), nest(rest, value));
            QueryValue::Map(map)
        }
    }
}

fn is_list_segment(segment: &str) -> bool {
    segment.bytes().all(|b| b.is_ascii_digit())
}

fn write_pair(pairs: &mut Vec<String>, key: &str, value: &QueryValue) {
    match value {
        QueryValue::Flag => pairs.push(key.to_string()),
        QueryValue::Text(text) => pairs.push(format!("{key}={}", encode(text))),
        QueryValue::List(items) => {
            let nested = items
                .iter()
                .any(|item| matches!(item, QueryValue::List(_) | QueryValue::Map(_)));
            for (index, item) in items.iter().enumerate() {
                if nested {
                    write_pair(pairs, &format!("{key}[{index}]"), item);
                } else {
                    write_pair(pairs, &format!("{key}[]"), item);
                }
            }
        }
        QueryValue::Repeated(items) => {
            for item in items {
                write_pair(pairs, key, item);
            }
        }
        QueryValue::Map(entries) => {
            for (sub, item) in entries {
                write_pair(pairs, &format!("{key}[{}]", encode(sub)), item);
            }
        }
    }
}

/// Escapes only the characters that would change how the query splits.
fn encode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '%' => out.push_str("%25"),
            '&' => out.push_str("%26"),
            '=' => out.push_str("%3D"),
            '#' => out.push_str("%23"),
            '+' => out.push_str("%2B"),
            ' ' => out.push_str("%20"),
            _ => out.push(ch),
        }
    }
    out
}

fn decode(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len() => {
                match (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        out.push((hi << 4) | lo);
                        i += 3;
                        continue;
                    }
                    _ => out.push(b'%'),
                }
            }
            byte => out.push(byte),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_flags_and_values() {
        let query = Query::parse("vue&type=style&lang=css");
        assert_eq!(query.get("vue"), Some(&QueryValue::Flag));
        assert_eq!(query.get("type"), Some(&QueryValue::from("style")));
        assert_eq!(query.len(), 3);
    }

    #[test]
    fn test_flag_distinct_from_empty_value() {
        let query = Query::parse("a&b=");
        assert_eq!(query.get("a"), Some(&QueryValue::Flag));
        assert_eq!(query.get("b"), Some(&QueryValue::from("")));
        assert_eq!(query.get("c"), None);
        assert_eq!(query.to_string(), "a&b=");
    }

    #[test]
    fn test_repeated_keys_keep_their_form() {
        let query = Query::parse("a=1&a=2&b&b");
        assert_eq!(
            query.get("a"),
            Some(&QueryValue::Repeated(vec!["1".into(), "2".into()]))
        );
        assert_eq!(query.to_string(), "a=1&a=2&b&b");
    }

    #[test]
    fn test_repeated_key_joins_bracket_list() {
        let query = Query::parse("a=1&a=2&a[]=3");
        assert_eq!(
            query.get("a"),
            Some(&QueryValue::List(vec!["1".into(), "2".into(), "3".into()]))
        );
        assert_eq!(query.to_string(), "a[]=1&a[]=2&a[]=3");
    }

    #[test]
    fn test_bracket_list_and_map() {
        let query = Query::parse("a[]=1&a[]=2&b[c]=3&b[d]=4");
        assert_eq!(
            query.get("a"),
            Some(&QueryValue::List(vec!["1".into(), "2".into()]))
        );
        let Some(QueryValue::Map(map)) = query.get("b") else {
            panic!("expected map");
        };
        assert_eq!(map.get("c"), Some(&QueryValue::from("3")));
        assert_eq!(query.to_string(), "a[]=1&a[]=2&b[c]=3&b[d]=4");
    }

    #[test]
    fn test_indexed_list_of_maps() {
        let query = Query::parse("a[0][x]=1&a[0][y]=2&a[1][x]=3");
        let Some(QueryValue::List(items)) = query.get("a") else {
            panic!("expected list");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(query.to_string(), "a[0][x]=1&a[0][y]=2&a[1][x]=3");
    }

    #[test]
    fn test_malformed_input_is_best_effort() {
        let query = Query::parse("a[b=1&&=2&%zz=3&c=%4");
        assert_eq!(query.get("a[b"), Some(&QueryValue::from("1")));
        assert_eq!(query.get("%zz"), Some(&QueryValue::from("3")));
        assert_eq!(query.get("c"), Some(&QueryValue::from("%4")));
    }

    #[test]
    fn test_decode_escapes() {
        let query = Query::parse("name=a%20b+c&x=%26");
        assert_eq!(query.get("name"), Some(&QueryValue::from("a b c")));
        assert_eq!(query.get("x"), Some(&QueryValue::from("&")));
        assert_eq!(query.to_string(), "name=a%20b%20c&x=%26");
    }

    #[test]
    fn test_merge_overrides_in_place() {
        let mut query = Query::parse("a=1&b=2");
        query.merge(&Query::new().set("c", "3").set("a", "9"));
        assert_eq!(query.to_string(), "a=9&b=2&c=3");
    }
}
