//! Core extraction engine: data model, walkers, and the pass pipeline.

pub mod bundle;
pub mod extractor;
pub mod id_allocator;
pub mod replacement;
pub mod review;
pub mod unit;
pub mod walker;

pub use bundle::ResourceBundle;
pub use extractor::{ExtractorOptions, ResourceExtractor};
pub use id_allocator::{RESOURCE_ID_PREFIX, ResourceIdAllocator};
pub use replacement::{
    ElementData, ReplacementFlavor, ReplacementRecord, SyntaxObject, TokenSpanData,
};
pub use review::{ReviewOutcome, review_candidate};
pub use unit::{Language, Parsed, SourceUnit};
pub use walker::{MarkupWalker, ScriptWalker, TreeWalk, Walker};
