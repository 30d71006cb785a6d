//! The extraction orchestrator.
//!
//! Drives the walkers across all source units in four strictly ordered
//! whole-corpus passes: preprocess (identifier collection), extract
//! (replacement records, no ids), finalize (confirm and assign ids, fill the
//! bundle), rewrite (reconstruct source text). Later passes depend on global
//! state built by earlier ones (identifier sets, bundle ids claimed by
//! earlier units), so each pass completes over every unit before the next
//! begins, on a single thread.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use crate::core::bundle::ResourceBundle;
use crate::core::id_allocator::ResourceIdAllocator;
use crate::core::review::{ReviewOutcome, review_candidate};
use crate::core::unit::{Language, SourceUnit};
use crate::core::walker::{MarkupWalker, ScriptWalker, TreeWalk, Walker};
use crate::prompt::Console;

/// Options applying to one extraction run.
#[derive(Debug, Clone)]
pub struct ExtractorOptions {
    /// Variable referencing the resource bundle in generated script code.
    pub resource_var: String,
    /// Namespace for `arb.register(...)` bundle wrapping.
    pub namespace: Option<String>,
    /// Skip all confirmation prompts and auto-assign ids.
    pub silent: bool,
}

impl Default for ExtractorOptions {
    fn default() -> Self {
        Self {
            resource_var: "r$".to_string(),
            namespace: None,
            silent: true,
        }
    }
}

/// Coordinates extraction of localizable resources across many source units
/// into one resource bundle.
///
/// All mutable shared state (bundle, identifier sets, id counter) lives here
/// for the duration of one run; running again means constructing a new
/// extractor.
pub struct ResourceExtractor {
    units: Vec<SourceUnit>,
    bundle: ResourceBundle,
    allocator: ResourceIdAllocator,
    script_walker: Walker,
    markup_walker: Walker,
    namespace: Option<String>,
    silent: bool,
    parse_failures: usize,
}

impl ResourceExtractor {
    pub fn new(options: ExtractorOptions) -> Self {
        Self {
            units: Vec::new(),
            bundle: ResourceBundle::new(),
            allocator: ResourceIdAllocator::new(),
            script_walker: Walker::Script(ScriptWalker::new(&options.resource_var)),
            markup_walker: Walker::Markup(MarkupWalker::new()),
            namespace: options.namespace,
            silent: options.silent,
            parse_failures: 0,
        }
    }

    /// Load a pre-existing bundle file. Its ids are respected: never
    /// overwritten, never generated again.
    pub fn load_bundle(&mut self, path: &Path) {
        self.bundle = ResourceBundle::load_or_default(path);
    }

    /// Add and parse one source unit. A parse failure is reported and the
    /// unit is excluded from all passes; the run continues.
    pub fn add_unit(&mut self, mut unit: SourceUnit) {
        if let Err(err) = unit.parse() {
            eprintln!(
                "{}",
                format!("Error in parsing {}: {:#}", unit.name(), err).yellow()
            );
            self.parse_failures += 1;
        }
        self.units.push(unit);
    }

    pub fn units(&self) -> &[SourceUnit] {
        &self.units
    }

    pub fn bundle(&self) -> &ResourceBundle {
        &self.bundle
    }

    /// Units that could not be parsed and were skipped.
    pub fn parse_failures(&self) -> usize {
        self.parse_failures
    }

    /// The serialized bundle content (original entries plus newly extracted).
    pub fn resource_content(&self) -> Result<String> {
        self.bundle.serialize(self.namespace.as_deref())
    }

    /// Run the four extraction passes over all units.
    pub fn process(&mut self, console: &mut dyn Console) -> Result<()> {
        let Self {
            units,
            bundle,
            allocator,
            script_walker,
            markup_walker,
            silent,
            ..
        } = self;

        // pass 1: identifier collection
        for unit in units.iter() {
            if !unit.is_parsed() {
                continue;
            }
            walker_for(unit.language(), script_walker, markup_walker).preprocess(unit);
        }

        // pass 2: extraction
        for unit in units.iter_mut() {
            if !unit.is_parsed() {
                continue;
            }
            walker_for(unit.language(), script_walker, markup_walker).extract(unit, bundle);
        }

        // pass 3: confirm and assign ids
        for unit in units.iter_mut() {
            if !unit.is_parsed() {
                continue;
            }
            let walker = walker_for(unit.language(), script_walker, markup_walker);
            finalize_unit(unit, walker, bundle, allocator, console, *silent)?;
        }

        // pass 4: rewrite
        for unit in units.iter_mut() {
            if !unit.is_parsed() {
                continue;
            }
            let walker = walker_for(unit.language(), script_walker, markup_walker);
            let rewritten = walker.rewrite(unit);
            unit.set_rewritten(rewritten);
        }

        Ok(())
    }
}

fn walker_for<'a>(
    language: Language,
    script_walker: &'a mut Walker,
    markup_walker: &'a mut Walker,
) -> &'a mut Walker {
    match language {
        Language::Javascript => script_walker,
        Language::Html => markup_walker,
    }
}

fn finalize_unit(
    unit: &mut SourceUnit,
    walker: &mut Walker,
    bundle: &mut ResourceBundle,
    allocator: &mut ResourceIdAllocator,
    console: &mut dyn Console,
    silent: bool,
) -> Result<()> {
    for key in unit.replacement_keys_in_order() {
        if silent {
            let Some(record) = unit.replacements.get_mut(&key) else {
                continue;
            };
            if record.resource_id().is_none() {
                let id = allocator.next(bundle, &|id| walker.is_id_acceptable(id));
                record.set_resource_id(id);
            }
            if let Some(id) = record.resource_id().map(str::to_string) {
                bundle.insert(&id, record.resource_text());
            }
            continue;
        }

        // render the candidate with a temporary id when it has none yet; the
        // id is recycled right away so the review suggestion reuses its number
        let mut preview_id = None;
        {
            let Some(record) = unit.replacements.get_mut(&key) else {
                continue;
            };
            if record.resource_id().is_none() {
                let id = allocator.next(bundle, &|id| walker.is_id_acceptable(id));
                record.set_resource_id(id.clone());
                preview_id = Some(id);
            }
        }
        let original = walker.original_context(unit, key);
        let new = walker.new_context(unit, key);
        let existing_id = if preview_id.is_some() {
            None
        } else {
            unit.replacement(key)
                .and_then(|r| r.resource_id().map(str::to_string))
        };
        if let Some(preview) = &preview_id {
            if let Some(record) = unit.replacements.get_mut(&key) {
                record.clear_resource_id();
            }
            allocator.recycle(preview);
        }

        let outcome = review_candidate(
            console,
            &original,
            &new,
            existing_id,
            bundle,
            allocator,
            &|id| walker.is_id_acceptable(id),
        )?;
        match outcome {
            ReviewOutcome::Rejected => unit.remove_replacement(key),
            ReviewOutcome::Accepted(id) => {
                if let Some(record) = unit.replacements.get_mut(&key) {
                    record.set_resource_id(id.clone());
                    bundle.insert(&id, record.resource_text());
                }
            }
        }
    }
    Ok(())
}
