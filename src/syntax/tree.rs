//! Homogeneous syntax tree lowered from the swc AST.
//!
//! Extraction and rewriting do not need the full typed AST. They need a
//! uniform tree whose nodes expose a kind, ordered children, and token
//! bounds, with a stable identity usable as a map key. Nodes live in an
//! arena and are addressed by [`NodeId`], so replacement records can be
//! re-anchored without aliasing hazards.

/// Stable handle of a syntax tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// The node kinds the walker distinguishes. Everything the extraction
/// algorithm does not care about is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// String literal leaf.
    Str,
    /// Binary `+` operator.
    Add,
    /// Identifier leaf.
    Ident,
    /// `var`/`let`/`const` declarator with a plain identifier name.
    VarDeclarator,
    /// Named function declaration or expression; child 0 is the name.
    Function,
    Other,
}

#[derive(Debug)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    /// Cooked string value for `Str`, symbol for `Ident`.
    pub text: Option<String>,
    pub children: Vec<NodeId>,
    /// Index of the node's first token, inclusive.
    pub start_token: usize,
    /// Index of the node's last token, inclusive.
    pub stop_token: usize,
}

/// Arena of syntax nodes plus the root handle.
#[derive(Debug)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
    root: NodeId,
}

impl SyntaxTree {
    pub(crate) fn build(nodes: Vec<SyntaxNode>, root: NodeId) -> Self {
        Self { nodes, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id.index()].kind
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    /// Cooked text of a `Str` or `Ident` leaf, empty otherwise.
    pub fn text(&self, id: NodeId) -> &str {
        self.nodes[id.index()].text.as_deref().unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Pre-order traversal from the root, parents before children.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            out.push(id);
            for &child in self.children(id).iter().rev() {
                stack.push(child);
            }
        }
        out
    }
}

/// Incremental arena builder used by the lowering pass.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<SyntaxNode>,
}

impl TreeBuilder {
    pub fn push(
        &mut self,
        kind: NodeKind,
        text: Option<String>,
        children: Vec<NodeId>,
        start_token: usize,
        stop_token: usize,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(SyntaxNode {
            kind,
            text,
            children,
            start_token,
            stop_token,
        });
        id
    }

    pub fn finish(self, root: NodeId) -> SyntaxTree {
        SyntaxTree::build(self.nodes, root)
    }
}
