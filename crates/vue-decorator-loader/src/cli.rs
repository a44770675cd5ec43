//! CLI argument parsing.

use camino::Utf8PathBuf;
use clap::{ArgAction, Parser};

/// Rewrites component decorator literals the way the bundler loader does.
#[derive(Debug, Parser)]
#[command(name = "vue-decorator-loader")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Files or directories to transform
    #[arg(required = true)]
    pub paths: Vec<Utf8PathBuf>,

    /// Project root that `__file` paths are relative to (defaults to the current directory)
    #[arg(long)]
    pub root: Option<Utf8PathBuf>,

    /// Build target; `node` enables server-rendering output
    #[arg(long)]
    pub target: Option<String>,

    /// Build for production
    #[arg(long)]
    pub production: bool,

    /// Do not append hot-reload glue
    #[arg(long = "no-hot-reload")]
    pub no_hot_reload: bool,

    /// Name of the class decorator
    #[arg(long = "decorator-name")]
    pub decorator_name: Option<String>,

    /// Name of the decorator property holding the template
    #[arg(long = "template-param")]
    pub template_param: Option<String>,

    /// Name of the decorator property holding the styles
    #[arg(long = "styles-param")]
    pub styles_param: Option<String>,

    /// JSON file with loader options; flags override its values
    #[arg(long)]
    pub config: Option<Utf8PathBuf>,

    /// Write results under this directory instead of printing them
    #[arg(long = "out-dir")]
    pub out_dir: Option<Utf8PathBuf>,

    /// Prefix of each file's module request, used to derive `_moduleId`
    #[arg(long, default_value = "./")]
    pub request: String,

    /// Increase logging verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
