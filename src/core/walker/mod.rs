//! Language-specific traversal engines behind one capability interface.
//!
//! The orchestrator only ever talks to [`Walker`]; the variant is picked once
//! per source unit by detected language. New source languages slot in as new
//! variants.

use enum_dispatch::enum_dispatch;

use crate::core::bundle::ResourceBundle;
use crate::core::replacement::SyntaxObject;
use crate::core::unit::SourceUnit;

pub mod markup;
pub mod script;

pub use markup::MarkupWalker;
pub use script::ScriptWalker;

/// Capabilities shared by all walkers.
#[enum_dispatch]
pub trait TreeWalk {
    /// Whole-corpus identifier collection, run over every unit before
    /// extraction starts.
    fn preprocess(&mut self, unit: &SourceUnit);

    /// Produce committed replacement records for one unit. No ids yet.
    fn extract(&self, unit: &mut SourceUnit, bundle: &ResourceBundle);

    /// Whether a generated or user-typed resource id is free of collisions
    /// with the identifiers collected during preprocessing.
    fn is_id_acceptable(&self, id: &str) -> bool;

    /// Reconstruct the unit's final source text from its finalized records.
    fn rewrite(&self, unit: &mut SourceUnit) -> String;

    /// The generated code that stands in for one record.
    fn replacement_code(&self, unit: &mut SourceUnit, key: SyntaxObject) -> String;

    /// The record's surroundings as they are in the original source.
    fn original_context(&self, unit: &mut SourceUnit, key: SyntaxObject) -> String;

    /// The record's surroundings with the candidate replacement applied.
    fn new_context(&self, unit: &mut SourceUnit, key: SyntaxObject) -> String;
}

/// The two traversal strategies as one dispatchable type.
#[enum_dispatch(TreeWalk)]
#[derive(Debug)]
pub enum Walker {
    Script(ScriptWalker),
    Markup(MarkupWalker),
}
