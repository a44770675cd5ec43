//! Rewrites `@Component({...})` decorator literals into self-contained classes.
//!
//! For every top-level or exported class carrying the decorator, the object
//! literal passed to it is rewritten so that:
//! - `styles` (a path, a `require` call, a `{ scoped, style }` descriptor, or an
//!   array of those) becomes descriptors importing each stylesheet with a
//!   `?vue&type=style` query
//! - `template: require("<path>")` becomes a spread of the compiled template
//!   import plus `_compiled: true`
//! - `_scopeId`, `_moduleId` and `__file` are injected as the build requires
//!
//! Development builds can also get hot-reload glue appended.
//!
//! # Example
//!
//! ```
//! use decorator_transformer::{transform, LoaderContext, LoaderOptions};
//!
//! let ctx = LoaderContext::new("/app/src/Hello.ts").with_root("/app");
//! let options = LoaderOptions {
//!     hot_reload: false,
//!     ..Default::default()
//! };
//! let source = r#"@Component({ styles: "s.css" }) export class Hello {}"#;
//!
//! let result = transform(source, &ctx, &options)?;
//! assert_eq!(
//!     result.code,
//!     concat!(
//!         r#"@Component({ styles: { scoped: false, style: require("s.css?vue&type=style&lang=css&index=0") }, "#,
//!         r#"__file: "src/Hello.ts" }) export class Hello {}"#,
//!     )
//! );
//! # Ok::<(), decorator_transformer::TransformError>(())
//! ```

pub mod ast_utils;
mod error;
mod hash;
mod hmr;
mod loader;
mod node;
mod options;
mod parse;
mod rewrite;
mod source;
mod styles;
mod transform;
mod value;

pub use error::TransformError;
pub use hash::{file_scope_hash, module_hash, short_hash};
pub use hmr::{generate_glue, HmrRecord, HmrTable, HOT_RELOAD_API};
pub use loader::{run_loader, LoaderContext};
pub use node::{Node, PropNode};
pub use options::LoaderOptions;
pub use rewrite::LiteralDraft;
pub use source::SourceText;
pub use styles::{ComponentTransformer, TemplateImport, Transformation};
pub use transform::{transform, TransformResult};
pub use value::{
    parse_expr, parse_object, ComponentParams, Mapping, Opaque, ParamNames, Primitive, Sequence,
    Value, COMPILED_PROP, FILE_PROP, MODULE_ID_PROP, SCOPE_ID_PROP,
};
