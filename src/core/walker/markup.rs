//! The markup extraction engine.
//!
//! Much simpler than the script walker: no merging, no token spans. Every
//! element owning text becomes a pure-literal record unless one of the two
//! reserved id attributes already points at a bundle entry. Rewriting sets
//! the chosen id attribute and serializes the tree; previews set it, render,
//! and remove it again so the live tree stays unmodified.

use std::collections::HashSet;

use crate::core::bundle::ResourceBundle;
use crate::core::replacement::{ReplacementFlavor, ReplacementRecord, SyntaxObject};
use crate::core::unit::{Parsed, SourceUnit};
use crate::core::walker::TreeWalk;
use crate::dom::{TagNodeId, TagTree};

/// Plain id attribute.
pub const ID_ATTR: &str = "id";
/// Namespaced id attribute; takes priority and is used for new ids.
pub const NAMESPACED_ID_ATTR: &str = "arb:id";

/// Tag-walker for HTML units.
#[derive(Debug, Default)]
pub struct MarkupWalker {
    /// All `id` attribute values seen across markup units.
    element_ids: HashSet<String>,
    /// All `arb:id` attribute values seen across markup units.
    namespaced_ids: HashSet<String>,
}

impl MarkupWalker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Existing resource id of an element, `arb:id` before `id`.
    fn element_resource_id(tree: &TagTree, element: TagNodeId) -> Option<String> {
        tree.attr(element, NAMESPACED_ID_ATTR)
            .or_else(|| tree.attr(element, ID_ATTR))
            .map(str::to_string)
    }

    fn attr_name(data_use_namespaced: bool) -> &'static str {
        if data_use_namespaced {
            NAMESPACED_ID_ATTR
        } else {
            ID_ATTR
        }
    }

    /// (element, needs-new-attr, attribute name, id) for a record, ready to
    /// apply to the tree.
    fn edit_of(record: &ReplacementRecord) -> Option<(TagNodeId, bool, &'static str, String)> {
        let ReplacementFlavor::Element(data) = &record.flavor else {
            return None;
        };
        let id = record.resource_id()?.to_string();
        Some((
            data.element,
            data.needs_new_attr,
            Self::attr_name(data.use_namespaced_attr),
            id,
        ))
    }
}

impl TreeWalk for MarkupWalker {
    fn preprocess(&mut self, unit: &SourceUnit) {
        let Some(Parsed::Markup(tree)) = &unit.parsed else {
            return;
        };
        for element in tree.elements_preorder() {
            if let Some(id) = tree.attr(element, ID_ATTR) {
                self.element_ids.insert(id.to_string());
            }
            if let Some(id) = tree.attr(element, NAMESPACED_ID_ATTR) {
                self.namespaced_ids.insert(id.to_string());
            }
        }
    }

    fn extract(&self, unit: &mut SourceUnit, bundle: &ResourceBundle) {
        let Some(Parsed::Markup(tree)) = &unit.parsed else {
            return;
        };
        let mut records = Vec::new();
        for element in tree.elements_preorder() {
            let own_text = tree.own_text(element);
            if own_text.is_empty() {
                continue;
            }
            let existing = Self::element_resource_id(tree, element);
            // elements already wired to a bundle entry are left alone
            if existing.as_deref().is_some_and(|id| bundle.contains(id)) {
                continue;
            }
            let needs_new = existing.is_none();
            records.push(ReplacementRecord::from_element(
                element, &own_text, existing, needs_new, needs_new,
            ));
        }
        for record in records {
            unit.add_replacement(record);
        }
    }

    fn is_id_acceptable(&self, id: &str) -> bool {
        !self.element_ids.contains(id) && !self.namespaced_ids.contains(id)
    }

    fn rewrite(&self, unit: &mut SourceUnit) -> String {
        let mut edits = Vec::new();
        for key in unit.replacement_keys_in_order() {
            if let Some(record) = unit.replacement(key) {
                if let Some((element, needs_new, attr, id)) = Self::edit_of(record) {
                    if needs_new {
                        edits.push((element, attr, id));
                    }
                }
            }
        }
        let Some(Parsed::Markup(tree)) = &mut unit.parsed else {
            return unit.source().to_string();
        };
        for (element, attr, id) in edits {
            tree.set_attr(element, attr, &id);
        }
        tree.serialize()
    }

    fn replacement_code(&self, unit: &mut SourceUnit, key: SyntaxObject) -> String {
        let Some(edit) = unit.replacement(key).and_then(Self::edit_of) else {
            let Some(record) = unit.replacement(key) else {
                return String::new();
            };
            // no id assigned yet: render the element as-is
            if let (ReplacementFlavor::Element(data), Some(Parsed::Markup(tree))) =
                (&record.flavor, &unit.parsed)
            {
                return tree.serialize_node(data.element);
            }
            return String::new();
        };
        let (element, needs_new, attr, id) = edit;
        let Some(Parsed::Markup(tree)) = &mut unit.parsed else {
            return String::new();
        };
        if needs_new {
            tree.set_attr(element, attr, &id);
        }
        let rendered = tree.serialize_node(element);
        if needs_new {
            tree.remove_attr(element, attr);
        }
        rendered
    }

    fn original_context(&self, unit: &mut SourceUnit, key: SyntaxObject) -> String {
        let Some(record) = unit.replacement(key) else {
            return String::new();
        };
        if let (ReplacementFlavor::Element(data), Some(Parsed::Markup(tree))) =
            (&record.flavor, &unit.parsed)
        {
            tree.serialize_node(data.element)
        } else {
            String::new()
        }
    }

    fn new_context(&self, unit: &mut SourceUnit, key: SyntaxObject) -> String {
        self.replacement_code(unit, key)
    }
}
