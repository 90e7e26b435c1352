//! SortCheckstyle Core - canonical ordering engine for Checkstyle XML
//!
//! Rewrites a Checkstyle configuration (or any XML built from similarly
//! structured elements) into one reproducible form: attributes and child
//! elements in a fixed order, optionally without indentation whitespace.
//!
//! # Architecture
//!
//! ```text
//! XML Text → Parser → Element Tree → Normalizer → Serializer → XML Text
//!                          │            (sort + compress)
//!                          └──────→ Change Detector ←──────┘
//! ```
//!
//! # Guarantees
//!
//! - **Deterministic**: Same input always produces identical output
//! - **Idempotent**: Normalizing canonical output is a no-op
//! - **Lossless**: Nodes are permuted, never rewritten; only whitespace-only
//!   text can be dropped, and only when compression is requested
//! - **Infallible core**: Only parsing can fail

pub mod change;
pub mod checkstyle;
pub mod compare;
pub mod compress;
pub mod element;
pub mod error;
pub mod normalizer;
pub mod parser;
pub mod serializer;

pub use change::{changed, fingerprint, was_changed, ChangeReport};
pub use compress::compress;
pub use element::{Attribute, Document, Element, Node};
pub use error::{Error, Result};
pub use normalizer::{
    normalize, normalize_document, normalize_xml, NormalizeOptions, Normalized, SortProfile,
};
pub use parser::parse_document;
pub use serializer::document_to_string;

#[cfg(test)]
mod tests {
    use super::*;

    const UNSORTED: &str = r#"<module name="Checker">
  <module name="TreeWalker">
    <module name="JavadocMethod"/>
    <module severity="warning" name="Indentation"/>
    <module name="ConstantName"/>
  </module>
  <property name="charset" value="UTF-8"/>
</module>"#;

    #[test]
    fn test_end_to_end_sorted() {
        let result = normalize_xml(UNSORTED, &NormalizeOptions::default()).unwrap();
        assert_eq!(
            result.output,
            r#"<module name="Checker">
  <module name="TreeWalker">
    <module name="ConstantName"/>
    <module name="Indentation" severity="warning"/>
    <module name="JavadocMethod"/>
  </module>
  <property name="charset" value="UTF-8"/>
</module>"#
        );
        assert!(result.report.changed);
    }

    #[test]
    fn test_end_to_end_compressed() {
        let options = NormalizeOptions {
            compress: true,
            ..NormalizeOptions::default()
        };
        let result = normalize_xml(UNSORTED, &options).unwrap();
        assert_eq!(
            result.output,
            r#"<module name="Checker"><module name="TreeWalker"><module name="ConstantName"/><module name="Indentation" severity="warning"/><module name="JavadocMethod"/></module><property name="charset" value="UTF-8"/></module>"#
        );
        assert_eq!(result.report.processing, "compressed and sorted");
    }

    #[test]
    fn test_end_to_end_checkstyle_profile() {
        let options = NormalizeOptions {
            profile: SortProfile::Checkstyle,
            ..NormalizeOptions::default()
        };
        let result = normalize_xml(UNSORTED, &options).unwrap();
        assert_eq!(
            result.output,
            r#"<module name="Checker">
  <property name="charset" value="UTF-8"/>
  <module name="TreeWalker">
    <module name="JavadocMethod"/>
    <module name="Indentation" severity="warning"/>
    <module name="ConstantName"/>
  </module>
</module>"#
        );
    }

    #[test]
    fn test_unsorted_mode_reproduces_input() {
        let result = normalize_xml(UNSORTED, &NormalizeOptions::identity()).unwrap();
        assert_eq!(result.output, UNSORTED);
        assert!(!result.report.changed);
        assert_eq!(result.report.summary(), "already sorted");
    }

    #[test]
    fn test_unsorted_mode_keeps_whitespace_references() {
        let xml = r#"<module name="RegexpMultiline"><property name="format" value="a&#10;b&#9;c"/></module>"#;
        let result = normalize_xml(xml, &NormalizeOptions::identity()).unwrap();
        assert_eq!(result.output, xml);
        let property = result.document.root().child_elements().next().unwrap();
        assert_eq!(property.attribute("value"), Some("a\nb\tc"));
    }

    #[test]
    fn test_determinism_100_iterations() {
        let first = normalize_xml(UNSORTED, &NormalizeOptions::default()).unwrap();
        for i in 0..100 {
            let result = normalize_xml(UNSORTED, &NormalizeOptions::default()).unwrap();
            assert_eq!(first.output, result.output, "Non-determinism at iteration {}", i);
        }
    }
}
