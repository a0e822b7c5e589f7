//! The generated module registration source of an executable.
//!
//! When modules are linked statically, the module loader finds them through
//! a table defined in this file instead of loading DLLs. Developer-only
//! modules are declared and registered only in debug builds.

use crate::emit::TextBuilder;
use crate::resolver::ModuleExportSet;
use crate::util::config::ModuleListConfig;

/// Render the registration source for one executable's module set.
pub fn render_module_list(modules: &ModuleExportSet, glue: &ModuleListConfig) -> Vec<u8> {
    let symbol = |module: &str| format!("{}{}", glue.symbol_prefix, module);

    let mut cpp = TextBuilder::new();
    cpp.line(format!("#include \"{}\"", glue.glue_header));
    cpp.blank();
    cpp.line(format!("#if {}", glue.static_guard));
    cpp.blank();
    cpp.line(format!("namespace {}", glue.namespace));
    cpp.line("{");
    cpp.blank();

    cpp.line(format!("#if {}", glue.debug_guard));
    for module in &modules.developer_modules {
        cpp.line(format!("\textern const {} {};", glue.info_type, symbol(module)));
    }
    cpp.line("#endif");
    for module in &modules.release_modules {
        cpp.line(format!("\textern const {} {};", glue.info_type, symbol(module)));
    }

    cpp.blank();
    cpp.line(format!("\tstatic const {} *g_moduleInfo[] =", glue.info_type));
    cpp.line("\t{");
    cpp.line(format!("#if {}", glue.debug_guard));
    for module in &modules.developer_modules {
        cpp.line(format!("\t\t&{},", symbol(module)));
    }
    cpp.line("#endif");
    for module in &modules.release_modules {
        cpp.line(format!("\t\t&{},", symbol(module)));
    }
    cpp.line("\t};");
    cpp.blank();
    cpp.line(format!(
        "\tconst {} g_moduleList = {{ g_moduleInfo, sizeof(g_moduleInfo) / sizeof(g_moduleInfo[0]) }};",
        glue.list_type
    ));
    cpp.line("}");
    cpp.blank();
    cpp.line("#endif");

    cpp.into_string().into_bytes()
}
