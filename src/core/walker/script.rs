//! The script-language extraction engine.
//!
//! Extraction runs bottom-up over the lowered syntax tree. A literal leaf
//! does not register itself; it returns an uncommitted record to its caller.
//! A `+` node that receives a record from one operand extends it over the
//! other operand (literal text merges into the template, anything else
//! becomes a `{N}` placeholder argument), re-anchors it to itself and keeps
//! bubbling it up. Any other node kind commits records returned by
//! its children, so a concatenation chain of arbitrary length collapses into
//! a single record committed at the chain's topmost node.

use std::collections::{HashMap, HashSet};

use crate::core::bundle::ResourceBundle;
use crate::core::replacement::{ReplacementRecord, SyntaxObject};
use crate::core::unit::{Parsed, SourceUnit};
use crate::core::walker::TreeWalk;
use crate::syntax::{NodeId, NodeKind, ScriptParse, SyntaxTree, TokenStream};
use crate::utils::file_label;

/// Lines of context shown on each side of a candidate replacement.
const CONTEXT_LINES: usize = 2;

type ReplacementMap = HashMap<SyntaxObject, ReplacementRecord>;

/// Tree-walker for JavaScript units.
#[derive(Debug)]
pub struct ScriptWalker {
    /// Variable referencing the resource bundle in generated code.
    resource_var: String,
    /// Declared names across all script units, collected in preprocessing.
    identifiers: HashSet<String>,
}

impl ScriptWalker {
    pub fn new(resource_var: &str) -> Self {
        Self {
            resource_var: resource_var.to_string(),
            identifiers: HashSet::new(),
        }
    }

    /// Variable declarator and function names. Scope is ignored on purpose:
    /// resources are referenced through the bundle variable, the set only
    /// guards against confusing id suggestions.
    fn collect_identifiers(&mut self, tree: &SyntaxTree, node: NodeId) {
        match tree.kind(node) {
            NodeKind::VarDeclarator | NodeKind::Function => {
                if let Some(&name) = tree.children(node).first() {
                    let text = tree.text(name);
                    if !text.is_empty() {
                        self.identifiers.insert(text.to_string());
                    }
                }
            }
            _ => {}
        }
        for &child in tree.children(node) {
            self.collect_identifiers(tree, child);
        }
    }

    fn extract_on_tree(
        &self,
        script: &ScriptParse,
        node: NodeId,
        file: &str,
        replacements: &mut ReplacementMap,
    ) -> Option<ReplacementRecord> {
        let tree = &script.tree;
        match tree.kind(node) {
            NodeKind::Str => {
                let leaf = tree.node(node);
                let mut record = ReplacementRecord::from_literal(
                    node,
                    leaf.start_token,
                    leaf.stop_token + 1,
                    tree.text(node),
                );
                record.add_attr("context", &format!("file:{}", file_label(file)));
                Some(record)
            }
            NodeKind::Add => {
                let (left, right) = match tree.children(node) {
                    [left, right] => (*left, *right),
                    _ => return None,
                };
                // A record bubbling out of the left operand absorbs the right
                // operand; one out of the right operand absorbs the left.
                if let Some(mut record) = self.extract_on_tree(script, left, file, replacements) {
                    self.combine_right(&mut record, right, tree);
                    record.re_anchor(node);
                    return Some(record);
                }
                if let Some(mut record) = self.extract_on_tree(script, right, file, replacements) {
                    self.combine_left(left, &mut record, tree);
                    record.re_anchor(node);
                    return Some(record);
                }
                None
            }
            _ => {
                for &child in tree.children(node) {
                    if let Some(record) = self.extract_on_tree(script, child, file, replacements) {
                        // literals nested inside placeholder arguments are
                        // extracted in their own right
                        let arguments = record.arguments().to_vec();
                        for argument in arguments {
                            if let Some(nested) =
                                self.extract_on_tree(script, argument, file, replacements)
                            {
                                replacements.insert(nested.syntax_object(), nested);
                            }
                        }
                        replacements.insert(record.syntax_object(), record);
                    }
                }
                None
            }
        }
    }

    fn combine_right(&self, record: &mut ReplacementRecord, right: NodeId, tree: &SyntaxTree) {
        record.extend_end_token(tree.node(right).stop_token + 1);
        if tree.kind(right) == NodeKind::Str {
            record.append_literal(tree.text(right));
        } else {
            record.append_argument(right);
        }
    }

    fn combine_left(&self, left: NodeId, record: &mut ReplacementRecord, tree: &SyntaxTree) {
        if tree.kind(left) == NodeKind::Str {
            record.prepend_literal(tree.text(left));
        } else {
            record.prepend_argument(left);
        }
        record.extend_start_token(tree.node(left).start_token);
    }

    fn rewrite_node(
        &self,
        script: &ScriptParse,
        replacements: &ReplacementMap,
        node: NodeId,
    ) -> String {
        if let Some(record) = replacements.get(&SyntaxObject::Node(node)) {
            return self.code_for(script, replacements, record);
        }
        let current = script.tree.node(node);
        let mut out = String::new();
        let mut index = current.start_token;
        for &child in &current.children {
            let child_node = script.tree.node(child);
            while index < child_node.start_token {
                out.push_str(script.tokens.text(index));
                index += 1;
            }
            out.push_str(&self.rewrite_node(script, replacements, child));
            index = child_node.stop_token + 1;
        }
        while index <= current.stop_token {
            out.push_str(script.tokens.text(index));
            index += 1;
        }
        out
    }

    fn code_for(
        &self,
        script: &ScriptParse,
        replacements: &ReplacementMap,
        record: &ReplacementRecord,
    ) -> String {
        // the orchestrator assigns a (possibly temporary) id before any
        // rendering happens
        let id = record.resource_id().unwrap_or("?");
        if record.is_pure_literal() {
            return format!("{}.{}", self.resource_var, id);
        }
        let mut out = format!("arb.msg({}.{}", self.resource_var, id);
        for &argument in record.arguments() {
            out.push_str(", ");
            out.push_str(&self.rewrite_node(script, replacements, argument));
        }
        out.push(')');
        out
    }

    /// First token index (inclusive) of the context window around `index`.
    fn context_start(tokens: &TokenStream, index: usize) -> usize {
        let start_line = tokens.line(index).saturating_sub(CONTEXT_LINES);
        let mut start = index;
        while start > 0 && tokens.line(start - 1) >= start_line {
            start -= 1;
        }
        start
    }

    /// Token index one past the context window around `index`.
    fn context_end(tokens: &TokenStream, index: usize) -> usize {
        let end_line = tokens.line(index) + CONTEXT_LINES;
        let mut end = index;
        while end + 1 < tokens.len() && tokens.line(end + 1) <= end_line {
            end += 1;
        }
        end + 1
    }

    /// The committed replacement whose token span covers `index`, if any.
    fn replacement_covering<'a>(
        &self,
        unit: &'a SourceUnit,
        index: usize,
    ) -> Option<&'a ReplacementRecord> {
        for key in unit.replacement_keys_in_order() {
            if let Some(record) = unit.replacement(key) {
                if let Some((start, end)) = record.token_span() {
                    if index >= start && index < end {
                        return Some(record);
                    }
                }
            }
        }
        None
    }

    /// Render the context window. `substitute_self` controls whether the
    /// record under review itself renders as its replacement code ("new"
    /// rendering) or as its original tokens ("original" rendering). Other
    /// committed records in the window always render as their code.
    fn render_context(&self, unit: &SourceUnit, key: SyntaxObject, substitute_self: bool) -> String {
        let (Some(Parsed::Script(script)), Some(record)) = (&unit.parsed, unit.replacement(key))
        else {
            return String::new();
        };
        let Some((span_start, span_end)) = record.token_span() else {
            return String::new();
        };
        if script.tokens.is_empty() {
            return String::new();
        }
        let last_covered = span_end.saturating_sub(1).max(span_start);
        let start = Self::context_start(&script.tokens, span_start);
        let end = Self::context_end(&script.tokens, last_covered.min(script.tokens.len() - 1));

        let mut out = String::new();
        let mut index = start;
        while index < end {
            if index < span_start {
                if let Some(other) = self.replacement_covering(unit, index) {
                    if let Some((_, other_end)) = other.token_span() {
                        out.push_str(&self.code_for(script, &unit.replacements, other));
                        index = other_end;
                        continue;
                    }
                }
            } else if substitute_self && index < span_end {
                out.push_str(&self.code_for(script, &unit.replacements, record));
                index = span_end;
                continue;
            }
            out.push_str(script.tokens.text(index));
            index += 1;
        }
        out
    }
}

impl TreeWalk for ScriptWalker {
    fn preprocess(&mut self, unit: &SourceUnit) {
        if let Some(Parsed::Script(script)) = &unit.parsed {
            self.collect_identifiers(&script.tree, script.tree.root());
        }
    }

    fn extract(&self, unit: &mut SourceUnit, _bundle: &ResourceBundle) {
        let file = unit.name().to_string();
        if let Some(Parsed::Script(script)) = &unit.parsed {
            // nothing bubbles out of the root: records are committed at the
            // first non-concatenation ancestor, and the root is never a `+`
            let _ =
                self.extract_on_tree(script, script.tree.root(), &file, &mut unit.replacements);
        }
    }

    fn is_id_acceptable(&self, id: &str) -> bool {
        !self.identifiers.contains(id)
    }

    fn rewrite(&self, unit: &mut SourceUnit) -> String {
        let Some(Parsed::Script(script)) = &unit.parsed else {
            return unit.source().to_string();
        };
        if script.tokens.is_empty() {
            return unit.source().to_string();
        }
        let root = script.tree.root();
        let root_node = script.tree.node(root);
        let mut out = script.tokens.slice_text(0, root_node.start_token);
        out.push_str(&self.rewrite_node(script, &unit.replacements, root));
        out.push_str(&script.tokens.slice_text(root_node.stop_token + 1, script.tokens.len()));
        out
    }

    fn replacement_code(&self, unit: &mut SourceUnit, key: SyntaxObject) -> String {
        let unit = &*unit;
        let (Some(Parsed::Script(script)), Some(record)) = (&unit.parsed, unit.replacement(key))
        else {
            return String::new();
        };
        self.code_for(script, &unit.replacements, record)
    }

    fn original_context(&self, unit: &mut SourceUnit, key: SyntaxObject) -> String {
        self.render_context(unit, key, false)
    }

    fn new_context(&self, unit: &mut SourceUnit, key: SyntaxObject) -> String {
        self.render_context(unit, key, true)
    }
}
