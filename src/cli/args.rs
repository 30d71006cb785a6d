//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::Parser;

/// Extract localizable strings from JavaScript and HTML files into an ARB
/// resource bundle, rewriting the sources to reference the extracted
/// entries.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    /// Resource bundle file where extracted resources are saved
    #[arg(long)]
    pub bundle: PathBuf,

    /// Source file (or directory) whose localizable strings are extracted;
    /// may be given multiple times
    #[arg(long = "code")]
    pub code: Vec<PathBuf>,

    /// Namespace used for registering the resource bundle
    #[arg(long)]
    pub namespace: Option<String>,

    /// Variable name used in JavaScript to reference the resource bundle
    #[arg(long = "resource_var")]
    pub resource_var: Option<String>,

    /// Print rewritten sources and the bundle to stdout instead of writing
    /// files
    #[arg(long = "output_to_console")]
    pub output_to_console: bool,

    /// Extract without prompting for confirmations
    #[arg(long = "silent_mode")]
    pub silent_mode: bool,
}
