//! Markup parsing into a [`TagTree`] over quick-xml.
//!
//! The reader runs with end-tag name checking disabled and nesting handled
//! here, so common HTML looseness (void elements written as start tags,
//! misordered inline end tags) does not abort the unit. Input is expected to
//! be XHTML-shaped otherwise; real tag-soup is out of scope.

use anyhow::{Context, Result};
use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};

use super::tree::{Element, TagNode, TagNodeId, TagTree};

/// Elements that never have content and need no end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name.to_ascii_lowercase().as_str())
}

/// Parse markup source into a tag tree.
pub fn parse_markup(source: &str) -> Result<TagTree> {
    Builder::new(source).run()
}

struct Builder<'a> {
    source: &'a str,
    tree: TagTree,
    /// Open elements, innermost last.
    stack: Vec<TagNodeId>,
}

impl<'a> Builder<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            tree: TagTree::default(),
            stack: Vec::new(),
        }
    }

    fn run(mut self) -> Result<TagTree> {
        let source = self.source;
        let mut reader = Reader::from_str(source);
        reader.config_mut().check_end_names = false;

        loop {
            let before = reader.buffer_position() as usize;
            let event = reader
                .read_event()
                .context("failed to parse markup source")?;
            let after = reader.buffer_position() as usize;
            let raw = &source[before.min(after)..after];

            match event {
                Event::Start(start) => self.open_element(&start, raw),
                Event::Empty(start) => {
                    let id = self.element_node(&start, raw);
                    self.attach(id);
                }
                Event::End(end) => {
                    let name = String::from_utf8_lossy(end.name().as_ref()).to_string();
                    self.close_element(&name, raw);
                }
                Event::Text(_) => {
                    let decoded = unescape(raw)
                        .map(|cow| cow.into_owned())
                        .unwrap_or_else(|_| raw.to_string());
                    let id = self.push(TagNode::Text {
                        raw: raw.to_string(),
                        decoded,
                    });
                    self.attach(id);
                }
                Event::Eof => break,
                // comments, CDATA, doctype, PIs, entity refs: verbatim
                _ => {
                    let id = self.push(TagNode::Raw(raw.to_string()));
                    self.attach(id);
                }
            }
        }
        Ok(self.tree)
    }

    fn push(&mut self, node: TagNode) -> TagNodeId {
        let id = TagNodeId::new(self.tree.nodes.len());
        self.tree.nodes.push(node);
        id
    }

    fn attach(&mut self, id: TagNodeId) {
        match self.stack.last() {
            Some(&parent) => {
                if let TagNode::Element(e) = &mut self.tree.nodes[parent.index()] {
                    e.children.push(id);
                }
            }
            None => self.tree.roots.push(id),
        }
    }

    fn element_node(&mut self, start: &BytesStart, raw: &str) -> TagNodeId {
        let name = String::from_utf8_lossy(start.name().as_ref()).to_string();
        let mut attrs = Vec::new();
        for attr in start.html_attributes().flatten() {
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_ascii_lowercase();
            let value = attr
                .unescape_value()
                .map(|cow| cow.into_owned())
                .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
            attrs.push((key, value));
        }
        self.push(TagNode::Element(Element {
            name,
            attrs,
            extra_attrs: Vec::new(),
            children: Vec::new(),
            start_tag: raw.to_string(),
            end_tag: None,
        }))
    }

    fn open_element(&mut self, start: &BytesStart, raw: &str) {
        let id = self.element_node(start, raw);
        self.attach(id);
        let name = match &self.tree.nodes[id.index()] {
            TagNode::Element(e) => e.name.clone(),
            _ => return,
        };
        if !is_void(&name) {
            self.stack.push(id);
        }
    }

    fn close_element(&mut self, name: &str, raw: &str) {
        let matching = self.stack.iter().rposition(|&id| {
            self.tree
                .element(id)
                .is_some_and(|e| e.name.eq_ignore_ascii_case(name))
        });
        match matching {
            Some(position) => {
                // implicitly close anything opened after the match
                while self.stack.len() > position + 1 {
                    self.stack.pop();
                }
                if let Some(id) = self.stack.pop() {
                    if let TagNode::Element(e) = &mut self.tree.nodes[id.index()] {
                        e.end_tag = Some(raw.to_string());
                    }
                }
            }
            None => {
                // stray end tag, carried through verbatim
                let id = self.push(TagNode::Raw(raw.to_string()));
                self.attach(id);
            }
        }
    }
}
