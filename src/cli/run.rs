//! Main entry point for the arbex CLI.
//!
//! Wires configuration, the extractor, and the console together: loads the
//! bundle, collects source files, runs the four passes, then writes (or
//! prints) the rewritten sources and the updated bundle.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use walkdir::WalkDir;

use super::args::Arguments;
use super::exit_status::ExitStatus;
use crate::config::Config;
use crate::core::{ExtractorOptions, ResourceExtractor, SourceUnit};
use crate::prompt::StdConsole;

/// Extensions picked up when a `--code` argument is a directory.
const SOURCE_EXTENSIONS: &[&str] = &["js", "html", "htm"];

pub fn run(args: Arguments) -> Result<ExitStatus> {
    let config = Config::load(Path::new("."))?;

    let options = ExtractorOptions {
        resource_var: args
            .resource_var
            .clone()
            .unwrap_or_else(|| config.resource_var.clone()),
        namespace: args.namespace.clone().or_else(|| config.namespace.clone()),
        silent: args.silent_mode,
    };
    let mut extractor = ResourceExtractor::new(options);
    extractor.load_bundle(&args.bundle);

    let mut read_failures = 0usize;
    for path in collect_source_files(&args.code)? {
        match SourceUnit::from_file(&path) {
            Ok(unit) => extractor.add_unit(unit),
            Err(err) => {
                eprintln!("{}", format!("{:#}", err).yellow());
                read_failures += 1;
            }
        }
    }

    let mut console = StdConsole::new();
    extractor.process(&mut console)?;

    if args.output_to_console {
        for unit in extractor.units() {
            if let Some(code) = unit.rewritten() {
                println!("{}", code);
            }
        }
        println!("{}", extractor.resource_content()?);
    } else {
        for unit in extractor.units() {
            unit.write_to_file(config.backup)?;
        }
        fs::write(&args.bundle, extractor.resource_content()?)
            .with_context(|| format!("failed to write bundle file: {}", args.bundle.display()))?;
    }

    if extractor.parse_failures() + read_failures > 0 {
        Ok(ExitStatus::Failure)
    } else {
        Ok(ExitStatus::Success)
    }
}

/// Expand `--code` arguments: files are taken as given, directories are
/// walked for JavaScript and HTML sources.
fn collect_source_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry
                    .with_context(|| format!("failed to scan directory: {}", path.display()))?;
                if entry.file_type().is_file() && has_source_extension(entry.path()) {
                    files.push(entry.path().to_path_buf());
                }
            }
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

fn has_source_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .is_some_and(|e| SOURCE_EXTENSIONS.contains(&e.as_str()))
}
