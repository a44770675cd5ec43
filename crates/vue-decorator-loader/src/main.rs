//! vue-decorator-loader: rewrites component decorator literals from the command line.

mod cli;
mod config;
mod logging;
mod runner;

use clap::Parser;
use cli::Args;
use miette::Result;

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let summary = runner::run(&args)?;
    if summary.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
