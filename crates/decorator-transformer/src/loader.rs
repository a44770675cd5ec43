//! The host pipeline contract.
//!
//! A bundler hands each file to the loader as `(source, context, options)` and
//! expects exactly one completion signal. The transformation itself is
//! synchronous; [`run_loader`] adapts it to callback-style completion.

use crate::error::TransformError;
use crate::options::LoaderOptions;
use crate::transform::transform;
use camino::{Utf8Path, Utf8PathBuf};

/// Per-file build context supplied by the host pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderContext {
    /// Absolute path of the file being transformed.
    pub resource_path: Utf8PathBuf,
    /// Project root that short paths are made relative to.
    pub root_context: Utf8PathBuf,
    /// Whether the build minifies output (implies production).
    pub minimize: bool,
    /// Declared build target, e.g. `web` or `node`.
    pub target: Option<String>,
    /// Full request string for the module, used to derive `_moduleId`.
    pub request: String,
}

impl LoaderContext {
    /// Creates a context for `resource_path` rooted at its parent directory.
    pub fn new(resource_path: impl Into<Utf8PathBuf>) -> Self {
        let resource_path = resource_path.into();
        let root_context = resource_path
            .parent()
            .map(Utf8Path::to_path_buf)
            .unwrap_or_default();
        let request = resource_path.to_string();
        Self {
            resource_path,
            root_context,
            minimize: false,
            target: None,
            request,
        }
    }

    /// Sets the project root.
    pub fn with_root(mut self, root: impl Into<Utf8PathBuf>) -> Self {
        self.root_context = root.into();
        self
    }

    /// The resource path relative to the project root, `/`-separated.
    ///
    /// Falls back to the full resource path when it is not under the root.
    pub fn short_path(&self) -> String {
        match self.resource_path.strip_prefix(&self.root_context) {
            Ok(relative) => relative
                .components()
                .map(|component| component.as_str())
                .collect::<Vec<_>>()
                .join("/"),
            Err(_) => self.resource_path.to_string(),
        }
    }

    /// Whether the build targets server-side rendering.
    pub fn is_server_target(&self) -> bool {
        self.target.as_deref() == Some("node")
    }
}

/// Runs the transformation and reports completion through `callback`.
///
/// The callback is invoked exactly once, with either an error or the
/// transformed text.
pub fn run_loader<F>(source: &str, ctx: &LoaderContext, options: &LoaderOptions, callback: F)
where
    F: FnOnce(Option<TransformError>, Option<String>),
{
    match transform(source, ctx, options) {
        Ok(result) => callback(None, Some(result.code)),
        Err(error) => callback(Some(error), None),
    }
}
