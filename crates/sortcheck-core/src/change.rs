//! Change detector - did normalization rewrite anything?
//!
//! Both sides go through the same serializer, so purely lexical differences
//! in the source (quote style, `<a></a>` vs `<a/>`) never count as changes.
//! The verdict feeds reporting only.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::element::{Document, Element};
use crate::normalizer::NormalizeOptions;
use crate::serializer::{document_to_string, element_to_string};

/// True iff the two serialized forms differ
pub fn changed(before: &str, after: &str) -> bool {
    before != after
}

/// True iff `result` serializes differently from `original`
pub fn was_changed(original: &Element, result: &Element) -> bool {
    changed(&element_to_string(original), &element_to_string(result))
}

/// SHA-256 of a serialized form, lowercase hex
pub fn fingerprint(serialized: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(serialized.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Outcome of one normalization run, for humans and for `--json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeReport {
    pub changed: bool,
    /// What the run did, e.g. "compressed and sorted"
    pub processing: String,
    pub before_sha256: String,
    pub after_sha256: String,
}

impl ChangeReport {
    pub fn between(original: &Document, result: &Document, options: &NormalizeOptions) -> Self {
        let before = document_to_string(original);
        let after = document_to_string(result);
        Self {
            changed: changed(&before, &after),
            processing: options.describe().to_string(),
            before_sha256: fingerprint(&before),
            after_sha256: fingerprint(&after),
        }
    }

    pub fn summary(&self) -> &'static str {
        if self.changed {
            "document modified"
        } else {
            "already sorted"
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
