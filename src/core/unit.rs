//! Source units: one parsed source file (or in-memory string) plus its
//! pending replacements and, eventually, its rewritten text.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::replacement::{ReplacementRecord, SyntaxObject};
use crate::dom::{TagTree, parse_markup};
use crate::syntax::{ScriptParse, parse_script_source};

/// Source language of a unit, detected from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Javascript,
    Html,
}

impl Language {
    /// Javascript is the default for unknown extensions.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("html") | Some("htm") => Language::Html,
            _ => Language::Javascript,
        }
    }
}

/// The parsed representation, one of the two by language.
#[derive(Debug)]
pub enum Parsed {
    Script(ScriptParse),
    Markup(TagTree),
}

/// A single source unit moving through the extraction passes.
#[derive(Debug)]
pub struct SourceUnit {
    name: String,
    path: Option<PathBuf>,
    language: Language,
    source: String,
    /// `None` until [`parse`](Self::parse) succeeds; stays `None` for units
    /// excluded by a parse failure.
    pub(crate) parsed: Option<Parsed>,
    /// Committed replacements keyed by syntax-object identity.
    pub(crate) replacements: HashMap<SyntaxObject, ReplacementRecord>,
    rewritten: Option<String>,
}

impl SourceUnit {
    /// Create a unit from a file on disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read source file: {}", path.display()))?;
        Ok(Self {
            name: path.display().to_string(),
            path: Some(path.to_path_buf()),
            language: Language::from_path(path),
            source,
            parsed: None,
            replacements: HashMap::new(),
            rewritten: None,
        })
    }

    /// Create a unit from an in-memory string.
    pub fn from_source(name: &str, source: &str, language: Language) -> Self {
        Self {
            name: name.to_string(),
            path: None,
            language,
            source: source.to_string(),
            parsed: None,
            replacements: HashMap::new(),
            rewritten: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Parse the source according to its language. On error the unit stays
    /// unparsed and is excluded from all passes.
    pub fn parse(&mut self) -> Result<()> {
        self.parsed = Some(match self.language {
            Language::Javascript => Parsed::Script(parse_script_source(&self.source, &self.name)?),
            Language::Html => Parsed::Markup(parse_markup(&self.source)?),
        });
        Ok(())
    }

    pub fn is_parsed(&self) -> bool {
        self.parsed.is_some()
    }

    pub fn script(&self) -> Option<&ScriptParse> {
        match &self.parsed {
            Some(Parsed::Script(script)) => Some(script),
            _ => None,
        }
    }

    pub fn markup(&self) -> Option<&TagTree> {
        match &self.parsed {
            Some(Parsed::Markup(tree)) => Some(tree),
            _ => None,
        }
    }

    pub fn add_replacement(&mut self, record: ReplacementRecord) {
        self.replacements.insert(record.syntax_object(), record);
    }

    pub fn replacement(&self, key: SyntaxObject) -> Option<&ReplacementRecord> {
        self.replacements.get(&key)
    }

    pub fn remove_replacement(&mut self, key: SyntaxObject) {
        self.replacements.remove(&key);
    }

    pub fn replacement_count(&self) -> usize {
        self.replacements.len()
    }

    /// Keys of all committed replacements in syntax-tree pre-order. The
    /// replacement map itself is unordered; this traversal fixes the order in
    /// which records are reviewed and ids are assigned.
    pub fn replacement_keys_in_order(&self) -> Vec<SyntaxObject> {
        let mut keys = Vec::with_capacity(self.replacements.len());
        match &self.parsed {
            Some(Parsed::Script(script)) => {
                for node in script.tree.preorder() {
                    let key = SyntaxObject::Node(node);
                    if self.replacements.contains_key(&key) {
                        keys.push(key);
                    }
                }
            }
            Some(Parsed::Markup(tree)) => {
                for element in tree.elements_preorder() {
                    let key = SyntaxObject::Element(element);
                    if self.replacements.contains_key(&key) {
                        keys.push(key);
                    }
                }
            }
            None => {}
        }
        keys
    }

    pub fn set_rewritten(&mut self, text: String) {
        self.rewritten = Some(text);
    }

    /// The rewritten source, available after the rewrite pass.
    pub fn rewritten(&self) -> Option<&str> {
        self.rewritten.as_deref()
    }

    /// Write the rewritten source back to the unit's file, keeping a `.bak`
    /// copy of the original. No-op for in-memory units or units that were
    /// never rewritten.
    pub fn write_to_file(&self, backup: bool) -> Result<()> {
        let (Some(path), Some(rewritten)) = (&self.path, &self.rewritten) else {
            return Ok(());
        };
        if backup {
            let mut backup_path = path.clone().into_os_string();
            backup_path.push(".bak");
            fs::copy(path, &backup_path).with_context(|| {
                format!("failed to back up {} before rewriting", path.display())
            })?;
        }
        fs::write(path, rewritten)
            .with_context(|| format!("failed to write rewritten source: {}", path.display()))?;
        Ok(())
    }
}
