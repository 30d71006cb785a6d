//! Script parser adapter: token stream plus homogeneous syntax tree.
//!
//! Wraps the swc lexer/parser behind the two capabilities the extraction
//! engine needs: a lossless random-access [`TokenStream`] and a lowered
//! [`SyntaxTree`] with arena node identity.

mod parse;
mod tokens;
mod tree;

pub use parse::{ScriptParse, parse_script_source};
pub use tokens::{Token, TokenStream};
pub use tree::{NodeId, NodeKind, SyntaxNode, SyntaxTree, TreeBuilder};
