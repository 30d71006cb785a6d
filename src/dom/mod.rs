//! DOM builder adapter: markup parsing and the arena tag tree.

mod builder;
mod tree;

pub use builder::parse_markup;
pub use tree::{Element, TagNode, TagNodeId, TagTree};
