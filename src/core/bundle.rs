//! The resource bundle: an ordered id → text mapping.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::{Map, Value};

use crate::utils::LINE_ENDING;

/// Ordered mapping from resource id to resource text.
///
/// Backed by a `serde_json::Map` (with `preserve_order`), so bundle output
/// keeps ids in insertion order. Ids loaded from an existing bundle are never
/// overwritten and block generation of the same id.
#[derive(Debug, Default)]
pub struct ResourceBundle {
    entries: Map<String, Value>,
}

impl ResourceBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an existing bundle file. A missing file or malformed JSON
    /// recovers to an empty bundle with a warning, so a fresh run can start
    /// from nothing.
    pub fn load_or_default(path: &Path) -> Self {
        let Ok(content) = fs::read_to_string(path) else {
            return Self::new();
        };
        if content.trim().is_empty() {
            return Self::new();
        }
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(entries)) => Self { entries },
            _ => {
                eprintln!(
                    "{}",
                    format!(
                        "Warning: {} is not a valid resource bundle, starting empty",
                        path.display()
                    )
                    .yellow()
                );
                Self::new()
            }
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn insert(&mut self, id: &str, text: &str) {
        self.entries
            .insert(id.to_string(), Value::String(text.to_string()));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize the bundle: pretty JSON with 2-space indentation, optionally
    /// wrapped as `arb.register("<namespace>", <json>);` for direct use from
    /// JavaScript.
    pub fn serialize(&self, namespace: Option<&str>) -> Result<String> {
        let json = serde_json::to_string_pretty(&Value::Object(self.entries.clone()))
            .context("failed to serialize resource bundle")?;
        Ok(match namespace {
            Some(ns) => format!("arb.register(\"{}\", {});{}", ns, json, LINE_ENDING),
            None => json,
        })
    }

    /// Write the serialized bundle to `path`.
    pub fn write_to(&self, path: &Path, namespace: Option<&str>) -> Result<()> {
        let content = self.serialize(namespace)?;
        fs::write(path, content)
            .with_context(|| format!("failed to write bundle file: {}", path.display()))?;
        Ok(())
    }
}
