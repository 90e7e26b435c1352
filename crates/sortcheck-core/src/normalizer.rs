//! Tree sorter - converts a configuration tree to its canonical form
//!
//! # Pipeline
//!
//! `XML text → parse → normalize → serialize` with the change detector
//! comparing the before and after serializations.
//!
//! # Guarantees
//!
//! - **Idempotent**: `normalize(normalize(x)) == normalize(x)`
//! - **Deterministic**: same input always produces same output
//! - **Order-insensitive**: permuting sibling attributes or element
//!   children does not change the result
//! - **Lossless**: nodes are only permuted, except whitespace-only text
//!   removed by compression

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::change::ChangeReport;
use crate::checkstyle::{collapse_values, CheckstyleOrder};
use crate::compare::{compare_attributes, distinguishing_name, ByTagAndName, ChildOrdering};
use crate::compress::strip_whitespace;
use crate::element::{Document, Element, Node};
use crate::parser::parse_document;
use crate::serializer::document_to_string;
use crate::Result;

// ── Options ────────────────────────────────────────────────

/// Which child ordering the sorter applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortProfile {
    /// Tag, then name attribute, then content
    #[default]
    Alphabetical,
    /// Property/module/message, then Checkstyle check category
    Checkstyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeOptions {
    pub sort_attributes: bool,
    pub sort_children: bool,
    /// Strip whitespace-only text nodes
    pub compress: bool,
    /// Collapse whitespace inside property/message values
    pub collapse_values: bool,
    pub profile: SortProfile,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            sort_attributes: true,
            sort_children: true,
            compress: false,
            collapse_values: false,
            profile: SortProfile::Alphabetical,
        }
    }
}

impl NormalizeOptions {
    /// Options under which `normalize` returns its input unchanged
    pub fn identity() -> Self {
        Self {
            sort_attributes: false,
            sort_children: false,
            compress: false,
            collapse_values: false,
            profile: SortProfile::Alphabetical,
        }
    }

    pub fn is_identity(&self) -> bool {
        !(self.sort_attributes || self.sort_children || self.compress || self.collapse_values)
    }

    /// Short description of the processing, for progress messages
    pub fn describe(&self) -> &'static str {
        let compressed = self.compress || self.collapse_values;
        match (self.sort_attributes, self.sort_children, compressed) {
            (true, true, true) => "compressed and sorted",
            (true, true, false) => "sorted",
            (true, false, true) | (false, true, true) => "compressed and partly sorted",
            (true, false, false) | (false, true, false) => "partly sorted",
            (false, false, true) => "compressed",
            (false, false, false) => "unsorted",
        }
    }
}

// ── Public API ─────────────────────────────────────────────

/// Normalize a tree according to `options`
pub fn normalize(tree: Element, options: &NormalizeOptions) -> Element {
    debug!(
        root = tree.tag(),
        processing = options.describe(),
        profile = ?options.profile,
        "normalizing tree"
    );
    if options.is_identity() {
        return tree;
    }

    let tree = if options.collapse_values {
        collapse_values(tree)
    } else {
        tree
    };

    match options.profile {
        SortProfile::Alphabetical => normalize_with(tree, options, &ByTagAndName),
        SortProfile::Checkstyle => {
            let order = CheckstyleOrder::from_tree(&tree);
            normalize_with(tree, options, &order)
        }
    }
}

/// Normalize the root of a document, keeping prolog and epilog as they are
pub fn normalize_document(doc: Document, options: &NormalizeOptions) -> Document {
    doc.map_root(|root| normalize(root, options))
}

/// Output of [`normalize_xml`]
#[derive(Debug, Clone)]
pub struct Normalized {
    pub document: Document,
    pub output: String,
    pub report: ChangeReport,
}

/// Parse XML text, normalize it and serialize the result
///
/// # Errors
/// Returns the parser's error for text that is not a well-formed
/// single-rooted document.
pub fn normalize_xml(xml: &str, options: &NormalizeOptions) -> Result<Normalized> {
    let original = parse_document(xml)?;
    let document = normalize_document(original.clone(), options);
    let report = ChangeReport::between(&original, &document, options);
    let output = document_to_string(&document);
    debug!(changed = report.changed, bytes = output.len(), "normalized document");
    Ok(Normalized {
        document,
        output,
        report,
    })
}

/// Post-order sorter over an arbitrary child ordering.
///
/// Collapsing values is a whole-tree pass done by [`normalize`] beforehand;
/// this only compresses and sorts.
pub fn normalize_with<O: ChildOrdering>(
    tree: Element,
    options: &NormalizeOptions,
    ordering: &O,
) -> Element {
    let (tag, attributes, children) = tree.into_parts();

    let mut children: Vec<Node> = children
        .into_iter()
        .map(|child| match child {
            Node::Element(e) => Node::Element(normalize_with(e, options, ordering)),
            other => other,
        })
        .collect();

    // Before ordering, so tie-break keys never see whitespace that is
    // about to disappear.
    if options.compress {
        children = strip_whitespace(children);
    }

    let mut element = Element::from_parts(tag, attributes, children);
    if options.sort_attributes {
        element = sort_attributes(element);
    }
    if options.sort_children {
        element = sort_children(element, ordering);
    }
    element
}

// ── Sorting steps ──────────────────────────────────────────

fn sort_attributes(element: Element) -> Element {
    let mut attributes = element.attributes().to_vec();
    attributes.sort_by(compare_attributes);
    element.replace_attributes(attributes)
}

/// Sort element children among themselves. Every other node is an anchor
/// that keeps its index; sorted elements refill the element slots in order.
fn sort_children<O: ChildOrdering>(element: Element, ordering: &O) -> Element {
    let (tag, attributes, children) = element.into_parts();

    let mut slots: Vec<Option<Node>> = Vec::with_capacity(children.len());
    let mut elements: Vec<Element> = Vec::new();
    for child in children {
        match child {
            Node::Element(e) => {
                elements.push(e);
                slots.push(None);
            }
            anchor => slots.push(Some(anchor)),
        }
    }

    elements.sort_by_cached_key(|e| ordering.key(e));
    for (index, e) in elements.iter().enumerate() {
        trace!(
            parent = %tag,
            index,
            tag = e.tag(),
            name = distinguishing_name(e).unwrap_or(""),
            "ordered child"
        );
    }

    let mut sorted = elements.into_iter();
    let children = slots
        .into_iter()
        .filter_map(|slot| slot.or_else(|| sorted.next().map(Node::Element)))
        .collect();
    Element::from_parts(tag, attributes, children)
}
