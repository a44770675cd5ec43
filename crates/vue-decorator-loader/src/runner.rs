//! Runs the transformation over the requested files.

use crate::cli::Args;
use crate::config::resolve_options;
use camino::{Utf8Path, Utf8PathBuf};
use decorator_transformer::{transform, LoaderContext, LoaderOptions, TransformError};
use miette::{miette, IntoDiagnostic, Result, WrapErr};
use rayon::prelude::*;
use std::fs;
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Extensions picked up when walking a directory.
pub const SOURCE_EXTENSIONS: [&str; 5] = ["ts", "tsx", "js", "jsx", "mjs"];

/// Per-file errors. These are reported and counted, not propagated.
#[derive(Debug, Error)]
pub enum FileError {
    /// The input file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        source: std::io::Error,
    },

    /// The file could not be parsed or transformed.
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// The output file or its directory could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        path: Utf8PathBuf,
        source: std::io::Error,
    },
}

/// Totals for one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub files: usize,
    pub changed: usize,
    pub failed: usize,
}

struct FileOutput {
    code: String,
    changed: bool,
}

/// Transforms every file named by `args` and writes or prints the results.
pub fn run(args: &Args) -> Result<RunSummary> {
    let options = resolve_options(args).into_diagnostic()?;
    options.validate().into_diagnostic()?;

    let cwd = std::env::current_dir().into_diagnostic()?;
    let cwd = Utf8PathBuf::try_from(cwd)
        .into_diagnostic()
        .wrap_err("current directory is not valid UTF-8")?;
    let root = match &args.root {
        Some(root) => absolute(&cwd, root),
        None => cwd.clone(),
    };

    let files = collect_files(&cwd, &args.paths)?;
    debug!(count = files.len(), root = %root, "collected files");

    // Files are independent; results are emitted in input order afterwards.
    let results: Vec<Result<FileOutput, FileError>> = files
        .par_iter()
        .map(|path| transform_file(path, &root, args, &options))
        .collect();

    let print_headers = args.out_dir.is_none() && files.len() > 1;
    let mut summary = RunSummary::default();
    for (path, result) in files.iter().zip(results) {
        summary.files += 1;
        let emitted = result.and_then(|output| {
            emit(path, &root, &output, args.out_dir.as_deref(), print_headers)?;
            Ok(output.changed)
        });
        match emitted {
            Ok(true) => summary.changed += 1,
            Ok(false) => {}
            Err(e) => {
                summary.failed += 1;
                eprintln!("Error: {}", e);
            }
        }
    }

    info!(
        files = summary.files,
        changed = summary.changed,
        failed = summary.failed,
        "done"
    );
    Ok(summary)
}

/// Builds the loader context for one file.
pub fn context_for(path: &Utf8Path, root: &Utf8Path, args: &Args) -> LoaderContext {
    let mut ctx = LoaderContext::new(path.to_path_buf()).with_root(root.to_path_buf());
    ctx.target = args.target.clone();
    ctx.request = format!("{}{}", args.request, ctx.short_path());
    ctx
}

fn transform_file(
    path: &Utf8Path,
    root: &Utf8Path,
    args: &Args,
    options: &LoaderOptions,
) -> Result<FileOutput, FileError> {
    let source = fs::read_to_string(path).map_err(|source| FileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let ctx = context_for(path, root, args);
    let result = transform(&source, &ctx, options)?;
    debug!(path = %path, components = result.hmr.len(), "transformed");
    Ok(FileOutput {
        changed: result.code != source,
        code: result.code,
    })
}

fn emit(
    path: &Utf8Path,
    root: &Utf8Path,
    output: &FileOutput,
    out_dir: Option<&Utf8Path>,
    print_header: bool,
) -> Result<(), FileError> {
    let Some(out_dir) = out_dir else {
        if print_header {
            println!("// {}", path);
        }
        print!("{}", output.code);
        if !output.code.ends_with('\n') {
            println!();
        }
        return Ok(());
    };

    let target = out_dir.join(relative_to(path, root));
    let write_error = |source| FileError::Write {
        path: target.clone(),
        source,
    };
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    fs::write(&target, &output.code).map_err(write_error)?;
    debug!(path = %target, "wrote");
    Ok(())
}

/// Expands the given paths into the files to transform.
///
/// Files are taken as given; directories are walked for source files, skipping
/// `node_modules`.
pub fn collect_files(cwd: &Utf8Path, paths: &[Utf8PathBuf]) -> Result<Vec<Utf8PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        let path = absolute(cwd, path);
        if path.is_file() {
            files.push(path);
        } else if path.is_dir() {
            files.extend(
                WalkDir::new(&path)
                    .sort_by_file_name()
                    .into_iter()
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_type().is_file())
                    .filter_map(|e| Utf8PathBuf::try_from(e.into_path()).ok())
                    .filter(|p| is_source_file(p))
                    .filter(|p| {
                        let relative = p.strip_prefix(&path).unwrap_or(p);
                        !relative
                            .components()
                            .any(|component| component.as_str() == "node_modules")
                    }),
            );
        } else {
            return Err(miette!("no such file or directory: {}", path));
        }
    }
    Ok(files)
}

fn is_source_file(path: &Utf8Path) -> bool {
    path.extension()
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

fn absolute(cwd: &Utf8Path, path: &Utf8Path) -> Utf8PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

fn relative_to(path: &Utf8Path, root: &Utf8Path) -> Utf8PathBuf {
    match path.strip_prefix(root) {
        Ok(relative) => relative.to_path_buf(),
        Err(_) => Utf8PathBuf::from(path.file_name().unwrap_or(path.as_str())),
    }
}
