//! Resource request paths with mergeable query strings.
//!
//! Loader pipelines address sub-resources of a file with query strings such as
//! `./t.pug?vue&type=template&lang=pug`. This crate parses such requests, merges
//! additional parameters into them without duplicating keys, and serializes them
//! back deterministically.
//!
//! # Example
//!
//! ```
//! use query_path::{encode_request, Query};
//!
//! let extra = Query::new().flag("vue").set("type", "style");
//! assert_eq!(encode_request("./a.css?inline", &extra), "./a.css?inline&vue&type=style");
//! ```

mod query;
mod request;

pub use query::{Query, QueryValue};
pub use request::{encode, encode_request, split_request, Request};
