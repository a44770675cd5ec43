//! Resource requests: a path plus an optional query string.

use crate::query::Query;
use std::fmt;

/// Splits a request on the first `?`.
///
/// Everything after the first `?` belongs to the query, including further `?`s.
pub fn split_request(request: &str) -> (&str, Option<&str>) {
    match request.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (request, None),
    }
}

/// Serializes `path` with `existing` query parameters merged with `extra`.
///
/// Keys in `extra` override colliding keys in `existing` without changing their
/// position; new keys are appended in the order they were supplied.
pub fn encode(path: &str, existing: Option<&str>, extra: &Query) -> String {
    let mut query = existing.map(Query::parse).unwrap_or_default();
    query.merge(extra);
    Request {
        path: path.to_string(),
        query,
    }
    .to_string()
}

/// Merges `extra` into the query of a full request string.
pub fn encode_request(request: &str, extra: &Query) -> String {
    let (path, existing) = split_request(request);
    encode(path, existing, extra)
}

/// A parsed resource request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The resource path, without query.
    pub path: String,
    /// The query parameters.
    pub query: Query,
}

impl Request {
    /// Parses a request, splitting on the first `?`.
    pub fn parse(request: &str) -> Self {
        let (path, query) = split_request(request);
        Self {
            path: path.to_string(),
            query: query.map(Query::parse).unwrap_or_default(),
        }
    }

    /// Returns this request with `extra` merged into its query.
    pub fn with_params(mut self, extra: &Query) -> Self {
        self.query.merge(extra);
        self
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        if !self.query.is_empty() {
            write!(f, "?{}", self.query)?;
        }
        Ok(())
    }
}
