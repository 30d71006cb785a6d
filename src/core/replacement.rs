//! Replacement records: one pending source edit plus its resource metadata.
//!
//! A record is anchored to a syntax object (a script tree node or a markup
//! element), which is both the map key for lookup and the source position
//! for rewriting. Placeholders are numbered once, while concatenation
//! operands are combined; there is no later renumbering pass.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::dom::TagNodeId;
use crate::syntax::NodeId;

/// Stable identity of the syntax node a record is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxObject {
    Node(NodeId),
    Element(TagNodeId),
}

/// Script flavor: a token span plus the placeholder argument nodes.
#[derive(Debug, Clone)]
pub struct TokenSpanData {
    /// Node the record is anchored to; re-anchored to the topmost node of a
    /// concatenation chain as records merge upward.
    pub anchor: NodeId,
    /// First covered token, inclusive.
    pub start_token: usize,
    /// One past the last covered token.
    pub end_token: usize,
    /// Non-literal operands, left to right, matching placeholder indices.
    pub arguments: Vec<NodeId>,
}

/// Markup flavor: the element carrying the text.
#[derive(Debug, Clone)]
pub struct ElementData {
    pub element: TagNodeId,
    /// Write the id into the namespaced attribute rather than the plain one.
    pub use_namespaced_attr: bool,
    /// A new id attribute must be added on rewrite.
    pub needs_new_attr: bool,
}

#[derive(Debug, Clone)]
pub enum ReplacementFlavor {
    TokenSpan(TokenSpanData),
    Element(ElementData),
}

/// A resource candidate bound to a specific syntax object.
#[derive(Debug, Clone)]
pub struct ReplacementRecord {
    resource_id: Option<String>,
    /// Resource text template with `{N}` placeholders.
    template: String,
    /// True iff the template is the literal text verbatim (no placeholders).
    pure_literal: bool,
    /// String attributes collected during extraction, multiple values per key.
    attrs: BTreeMap<String, Vec<String>>,
    pub flavor: ReplacementFlavor,
}

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{(\d+)\}").expect("static pattern"))
}

impl ReplacementRecord {
    /// Pure-literal record spanning a script literal leaf.
    pub fn from_literal(anchor: NodeId, start_token: usize, end_token: usize, text: &str) -> Self {
        Self {
            resource_id: None,
            template: text.to_string(),
            pure_literal: true,
            attrs: BTreeMap::new(),
            flavor: ReplacementFlavor::TokenSpan(TokenSpanData {
                anchor,
                start_token,
                end_token,
                arguments: Vec::new(),
            }),
        }
    }

    /// Pure-literal record anchored to a markup element.
    pub fn from_element(
        element: TagNodeId,
        text: &str,
        resource_id: Option<String>,
        use_namespaced_attr: bool,
        needs_new_attr: bool,
    ) -> Self {
        Self {
            resource_id,
            template: text.to_string(),
            pure_literal: true,
            attrs: BTreeMap::new(),
            flavor: ReplacementFlavor::Element(ElementData {
                element,
                use_namespaced_attr,
                needs_new_attr,
            }),
        }
    }

    pub fn syntax_object(&self) -> SyntaxObject {
        match &self.flavor {
            ReplacementFlavor::TokenSpan(data) => SyntaxObject::Node(data.anchor),
            ReplacementFlavor::Element(data) => SyntaxObject::Element(data.element),
        }
    }

    pub fn resource_id(&self) -> Option<&str> {
        self.resource_id.as_deref()
    }

    pub fn set_resource_id(&mut self, id: String) {
        self.resource_id = Some(id);
    }

    pub fn clear_resource_id(&mut self) {
        self.resource_id = None;
    }

    /// The finalized resource text. Placeholders are already numbered in
    /// template order.
    pub fn resource_text(&self) -> &str {
        &self.template
    }

    pub fn is_pure_literal(&self) -> bool {
        self.pure_literal
    }

    pub fn placeholder_count(&self) -> usize {
        if self.pure_literal {
            0
        } else {
            placeholder_re().find_iter(&self.template).count()
        }
    }

    pub fn add_attr(&mut self, name: &str, value: &str) {
        self.attrs
            .entry(name.to_string())
            .or_default()
            .push(value.to_string());
    }

    pub fn attr_values(&self, name: &str) -> &[String] {
        self.attrs.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Covered token span (start inclusive, end exclusive) of the token-span
    /// flavor.
    pub fn token_span(&self) -> Option<(usize, usize)> {
        match &self.flavor {
            ReplacementFlavor::TokenSpan(data) => Some((data.start_token, data.end_token)),
            ReplacementFlavor::Element(_) => None,
        }
    }

    /// Arguments of the token-span flavor; empty for element records.
    pub fn arguments(&self) -> &[NodeId] {
        match &self.flavor {
            ReplacementFlavor::TokenSpan(data) => &data.arguments,
            ReplacementFlavor::Element(_) => &[],
        }
    }

    fn token_span_mut(&mut self) -> Option<&mut TokenSpanData> {
        match &mut self.flavor {
            ReplacementFlavor::TokenSpan(data) => Some(data),
            ReplacementFlavor::Element(_) => None,
        }
    }

    /// Append literal text; purity is unchanged.
    pub fn append_literal(&mut self, text: &str) {
        self.template.push_str(text);
    }

    /// Prepend literal text; purity is unchanged.
    pub fn prepend_literal(&mut self, text: &str) {
        self.template.insert_str(0, text);
    }

    /// Append a non-literal operand: adds `{N}` with the next index and pushes
    /// the node onto the argument list.
    pub fn append_argument(&mut self, node: NodeId) {
        let Some(data) = self.token_span_mut() else {
            return;
        };
        let index = data.arguments.len();
        data.arguments.push(node);
        self.template.push_str(&format!("{{{}}}", index));
        self.pure_literal = false;
    }

    /// Prepend a non-literal operand: existing placeholders shift up by one,
    /// `{0}` goes in front and the node to the head of the argument list.
    pub fn prepend_argument(&mut self, node: NodeId) {
        let shifted = placeholder_re()
            .replace_all(&self.template, |caps: &regex::Captures| {
                let n: usize = caps[1].parse().unwrap_or(0);
                format!("{{{}}}", n + 1)
            })
            .into_owned();
        self.template = format!("{{0}}{}", shifted);
        if let Some(data) = self.token_span_mut() {
            data.arguments.insert(0, node);
        }
        self.pure_literal = false;
    }

    /// Extend the covered token span to a new exclusive end.
    pub fn extend_end_token(&mut self, end_token: usize) {
        if let Some(data) = self.token_span_mut() {
            data.end_token = end_token;
        }
    }

    /// Extend the covered token span to a new inclusive start.
    pub fn extend_start_token(&mut self, start_token: usize) {
        if let Some(data) = self.token_span_mut() {
            data.start_token = start_token;
        }
    }

    /// Re-anchor the record to a parent node so identity lookup from above
    /// finds the combined record.
    pub fn re_anchor(&mut self, node: NodeId) {
        if let Some(data) = self.token_span_mut() {
            data.anchor = node;
        }
    }
}
