//! Serializer - writes the element model back to XML text
//!
//! Output is a pure function of the tree: attributes in stored order,
//! childless elements self-closed, opaque nodes written verbatim. The same
//! string doubles as the canonical form used for tie-breaks and change
//! detection.

use std::borrow::Cow;

use quick_xml::escape::escape;

use crate::element::{Document, Element, Node};

/// Serialize a whole document, prolog and epilog included
pub fn document_to_string(doc: &Document) -> String {
    let mut out = String::new();
    for node in doc.prolog() {
        write_node(&mut out, node);
    }
    write_element(&mut out, doc.root());
    for node in doc.epilog() {
        write_node(&mut out, node);
    }
    out
}

/// Serialize one element and its subtree
pub fn element_to_string(element: &Element) -> String {
    let mut out = String::new();
    write_element(&mut out, element);
    out
}

pub fn write_element(out: &mut String, element: &Element) {
    out.push('<');
    out.push_str(element.tag());
    for attr in element.attributes() {
        out.push(' ');
        out.push_str(&attr.name);
        out.push_str("=\"");
        out.push_str(&escape_attribute(&attr.value));
        out.push('"');
    }

    if element.children().is_empty() {
        out.push_str("/>");
        return;
    }

    out.push('>');
    for child in element.children() {
        write_node(out, child);
    }
    out.push_str("</");
    out.push_str(element.tag());
    out.push('>');
}

/// Escape markup characters, then write tab, newline and carriage return
/// as character references. A reader normalizes raw whitespace in an
/// attribute value to spaces, so only the references survive a reparse.
fn escape_attribute(value: &str) -> Cow<'_, str> {
    let escaped = escape(value);
    if !escaped.contains(['\t', '\n', '\r']) {
        return escaped;
    }
    let mut out = String::with_capacity(escaped.len() + 8);
    for c in escaped.chars() {
        match c {
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}

pub fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Element(e) => write_element(out, e),
        Node::Text(t) => out.push_str(t),
        Node::CData(c) => {
            out.push_str("<![CDATA[");
            out.push_str(c);
            out.push_str("]]>");
        }
        Node::Comment(c) => {
            out.push_str("<!--");
            out.push_str(c);
            out.push_str("-->");
        }
        Node::ProcessingInstruction(p) | Node::Declaration(p) => {
            out.push_str("<?");
            out.push_str(p);
            out.push_str("?>");
        }
        Node::DocType(d) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(d.trim_start());
            out.push('>');
        }
    }
}
