//! Parser - reads XML text into the element model
//!
//! Built on `quick-xml`'s pull reader with text trimming off, so every
//! whitespace run between tags survives as a text node. Text, comments,
//! CDATA, processing instructions, the XML declaration and the DOCTYPE are
//! kept verbatim. Attribute values get XML whitespace normalization and are
//! unescaped.

use std::borrow::Cow;

use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use crate::element::{Attribute, Document, Element, Node};
use crate::{Error, Result};

/// Parse a complete XML document
///
/// # Errors
/// Returns `Syntax` for reader errors (including mismatched end tags),
/// `Attribute` for malformed attributes, `Encoding` for non-UTF-8 names or
/// content, and `Structure` when the events do not form exactly one root
/// element.
pub fn parse_document(xml: &str) -> Result<Document> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);
    reader.expand_empty_elements(false);

    let mut builder = TreeBuilder::default();
    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(err) => {
                return Err(Error::Syntax {
                    position: reader.buffer_position(),
                    message: err.to_string(),
                })
            }
        };
        let position = reader.buffer_position();

        match event {
            Event::Start(start) => {
                let element = element_from_start(&start, position)?;
                builder.open.push(element);
            }
            Event::Empty(start) => {
                let element = element_from_start(&start, position)?;
                builder.attach(Node::Element(element))?;
            }
            Event::End(_) => {
                let element = builder.open.pop().ok_or_else(|| {
                    Error::Structure(format!("unexpected end tag at byte {}", position))
                })?;
                builder.attach(Node::Element(element))?;
            }
            Event::Text(text) => {
                builder.attach(Node::Text(utf8(&text)?.to_string()))?;
            }
            Event::CData(cdata) => {
                builder.attach(Node::CData(utf8(&cdata)?.to_string()))?;
            }
            Event::Comment(comment) => {
                builder.attach(Node::Comment(utf8(&comment)?.to_string()))?;
            }
            Event::PI(pi) => {
                builder.attach(Node::ProcessingInstruction(utf8(&pi)?.to_string()))?;
            }
            Event::Decl(decl) => {
                builder.attach(Node::Declaration(utf8(&decl)?.to_string()))?;
            }
            Event::DocType(doctype) => {
                builder.attach(Node::DocType(utf8(&doctype)?.trim_start().to_string()))?;
            }
            Event::Eof => break,
        }
    }

    builder.finish()
}

/// Parse a single element, ignoring anything around it
pub fn parse_element(xml: &str) -> Result<Element> {
    parse_document(xml).map(|doc| doc.root().clone())
}

fn utf8(bytes: &[u8]) -> Result<&str> {
    Ok(std::str::from_utf8(bytes)?)
}

fn element_from_start(start: &BytesStart, position: usize) -> Result<Element> {
    let tag = utf8(start.name().as_ref())?.to_string();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|err| Error::Attribute {
            position,
            message: err.to_string(),
        })?;
        let name = utf8(attr.key.as_ref())?.to_string();
        let raw = normalize_value_whitespace(utf8(&attr.value)?);
        let value = unescape(&raw).map_err(|err| Error::Attribute {
            position,
            message: format!("{}: {}", name, err),
        })?;
        attributes.push(Attribute::new(name, value));
    }
    Ok(Element::from_parts(tag, attributes, Vec::new()))
}

/// Attribute-value normalization: literal tab, newline and carriage return
/// (with CR LF counted once) read as a space. Character references are
/// expanded afterwards and keep the character they name.
fn normalize_value_whitespace(raw: &str) -> Cow<'_, str> {
    if !raw.contains(['\t', '\n', '\r']) {
        return Cow::Borrowed(raw);
    }
    Cow::Owned(raw.replace("\r\n", " ").replace(['\t', '\n', '\r'], " "))
}

// ── Tree assembly ──────────────────────────────────────────

#[derive(Default)]
struct TreeBuilder {
    prolog: Vec<Node>,
    root: Option<Element>,
    epilog: Vec<Node>,
    /// Elements whose end tag has not been seen yet, innermost last
    open: Vec<Element>,
}

impl TreeBuilder {
    fn attach(&mut self, node: Node) -> Result<()> {
        if let Some(parent) = self.open.last_mut() {
            parent.push_child(node);
            return Ok(());
        }

        let stray_text = matches!(node, Node::Text(_) | Node::CData(_)) && !node.is_whitespace();
        if stray_text {
            return Err(Error::Structure(
                "character data outside the root element".to_string(),
            ));
        }

        match node {
            Node::Element(element) => {
                if self.root.is_some() {
                    return Err(Error::Structure(format!(
                        "second root element <{}>",
                        element.tag()
                    )));
                }
                self.root = Some(element);
            }
            other => {
                if self.root.is_some() {
                    self.epilog.push(other);
                } else {
                    self.prolog.push(other);
                }
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<Document> {
        if let Some(unclosed) = self.open.last() {
            return Err(Error::Structure(format!(
                "unclosed element <{}>",
                unclosed.tag()
            )));
        }
        let root = self
            .root
            .ok_or_else(|| Error::Structure("no root element".to_string()))?;
        debug!(
            root = root.tag(),
            prolog = self.prolog.len(),
            epilog = self.epilog.len(),
            "parsed document"
        );
        Ok(Document::new(self.prolog, root, self.epilog))
    }
}
