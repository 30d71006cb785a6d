//! Configuration file loading and parsing.
//!
//! `arbex` runs fine without any configuration; an optional `.arbexrc.json`
//! in the working directory supplies defaults that command-line flags
//! override.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = ".arbexrc.json";

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Variable referencing the resource bundle in generated code.
    #[serde(default = "default_resource_var")]
    pub resource_var: String,
    /// Namespace for wrapping bundle output as JavaScript.
    #[serde(default)]
    pub namespace: Option<String>,
    /// Keep a `.bak` copy of every rewritten source file.
    #[serde(default = "default_backup")]
    pub backup: bool,
}

fn default_resource_var() -> String {
    "r$".to_string()
}

fn default_backup() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resource_var: default_resource_var(),
            namespace: None,
            backup: default_backup(),
        }
    }
}

impl Config {
    /// Load configuration from `dir`, falling back to defaults when no
    /// config file exists. A malformed config file is an error: silently
    /// ignoring it would extract with the wrong resource variable.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))
    }
}
