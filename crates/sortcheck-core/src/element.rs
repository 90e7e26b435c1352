//! Element model - value types for a parsed XML configuration
//!
//! An [`Element`] owns its tag, an ordered attribute list and an ordered
//! child list. Tags never change after construction. Attribute and child
//! sequences can be read as slices and replaced wholesale, never edited
//! entry by entry, so every transform builds a new tree and the old one
//! stays available for comparison.

use serde::{Deserialize, Serialize};

// ── Attributes ─────────────────────────────────────────────

/// One `name="value"` pair. The value is stored unescaped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

// ── Nodes ──────────────────────────────────────────────────

/// A child of an element, or a top-level item of a document.
///
/// Everything except [`Node::Element`] is opaque and carried verbatim.
/// Text keeps its escaped source form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
    ProcessingInstruction(String),
    /// Content of `<?xml ...?>`, prolog only
    Declaration(String),
    /// Content of `<!DOCTYPE ...>`, prolog only
    DocType(String),
}

impl Node {
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text(content.into())
    }

    pub fn comment(content: impl Into<String>) -> Self {
        Node::Comment(content.into())
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    /// True for a text node made only of XML whitespace (including empty text)
    pub fn is_whitespace(&self) -> bool {
        match self {
            Node::Text(t) => t.chars().all(is_xml_whitespace),
            _ => false,
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

/// The four characters XML treats as whitespace
pub fn is_xml_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

// ── Elements ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    tag: String,
    attributes: Vec<Attribute>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Build an element from parts. Duplicate attribute names collapse onto
    /// the first occurrence, keeping the last value.
    pub fn from_parts(
        tag: impl Into<String>,
        attributes: Vec<Attribute>,
        children: Vec<Node>,
    ) -> Self {
        let mut element = Self::new(tag);
        for attr in attributes {
            element.set_attribute(attr);
        }
        element.children = children;
        element
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(Attribute::new(name, value));
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_child(Node::Text(text.into()))
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Value of the named attribute, if present
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Element children only, in document order
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Replace the whole attribute sequence.
    ///
    /// Callers pass a permutation or a filtered copy of the current list,
    /// so the uniqueness invariant is kept.
    pub fn replace_attributes(mut self, attributes: Vec<Attribute>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Replace the whole child sequence
    pub fn replace_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn into_parts(self) -> (String, Vec<Attribute>, Vec<Node>) {
        (self.tag, self.attributes, self.children)
    }

    pub(crate) fn push_child(&mut self, child: Node) {
        self.children.push(child);
    }

    fn set_attribute(&mut self, attr: Attribute) {
        match self.attributes.iter_mut().find(|a| a.name == attr.name) {
            Some(existing) => existing.value = attr.value,
            None => self.attributes.push(attr),
        }
    }
}

// ── Documents ──────────────────────────────────────────────

/// A whole XML document: prolog, a single root element, epilog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    prolog: Vec<Node>,
    root: Element,
    epilog: Vec<Node>,
}

impl Document {
    pub fn new(prolog: Vec<Node>, root: Element, epilog: Vec<Node>) -> Self {
        Self {
            prolog,
            root,
            epilog,
        }
    }

    pub fn from_root(root: Element) -> Self {
        Self::new(Vec::new(), root, Vec::new())
    }

    pub fn prolog(&self) -> &[Node] {
        &self.prolog
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn epilog(&self) -> &[Node] {
        &self.epilog
    }

    /// Swap the root for the result of `f`, keeping prolog and epilog
    pub fn map_root(self, f: impl FnOnce(Element) -> Element) -> Self {
        Self {
            prolog: self.prolog,
            root: f(self.root),
            epilog: self.epilog,
        }
    }
}
