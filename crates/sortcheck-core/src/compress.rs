//! Compressor - strips whitespace-only text nodes at every depth
//!
//! Comments, CDATA, processing instructions and text with any
//! non-whitespace character survive untouched.

use crate::element::{Element, Node};

/// Remove every whitespace-only text node from `tree` and its descendants
pub fn compress(tree: Element) -> Element {
    let (tag, attributes, children) = tree.into_parts();
    let children = children
        .into_iter()
        .filter(|child| !child.is_whitespace())
        .map(|child| match child {
            Node::Element(e) => Node::Element(compress(e)),
            other => other,
        })
        .collect();
    Element::from_parts(tag, attributes, children)
}

/// Drop whitespace-only text from one child list, without descending
pub(crate) fn strip_whitespace(children: Vec<Node>) -> Vec<Node> {
    children
        .into_iter()
        .filter(|child| !child.is_whitespace())
        .collect()
}
