//! Hot-reload bookkeeping and the glue code appended to development builds.

use crate::node::quote;
use indexmap::IndexMap;

/// Runtime module that performs component hot reloading.
pub const HOT_RELOAD_API: &str = "vue-hot-reload-api";

/// What the glue needs to know about one component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HmrRecord {
    pub scope_id: String,
    /// Request of the compiled template, when the template was rewritten.
    pub template_request: Option<String>,
}

/// Components of one file, keyed by class name in document order.
pub type HmrTable = IndexMap<String, HmrRecord>;

/// Generates the hot-reload block for `table`.
///
/// Returns an empty string for an empty table.
pub fn generate_glue(table: &HmrTable) -> String {
    if table.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    out.push_str("/* hot reload */\n");
    out.push_str("if (module.hot) {\n");
    out.push_str(&format!("  var api = require({})\n", quote(HOT_RELOAD_API)));
    out.push_str("  api.install(require(\"vue\"))\n");
    out.push_str("  if (api.compatible) {\n");
    out.push_str("    module.hot.accept()\n");
    for (class_name, record) in table {
        let id = quote(&record.scope_id);
        out.push_str(&format!("    if (!api.isRecorded({id})) {{\n"));
        out.push_str(&format!("      api.createRecord({id}, {class_name}.options)\n"));
        out.push_str("    } else {\n");
        out.push_str(&format!("      api.reload({id}, {class_name}.options)\n"));
        out.push_str("    }\n");
        if let Some(request) = &record.template_request {
            let request = quote(request);
            out.push_str(&format!(
                "    module.hot.accept({request}, function () {{\n"
            ));
            out.push_str(&format!("      api.rerender({id}, require({request}))\n"));
            out.push_str("    })\n");
        }
    }
    out.push_str("  }\n");
    out.push_str("}\n");
    out
}
