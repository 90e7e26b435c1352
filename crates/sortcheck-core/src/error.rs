//! Error types for SortCheckstyle
//!
//! Normalization itself cannot fail. Errors only arise while turning
//! XML text into the element model.

use thiserror::Error;

/// SortCheckstyle error types
#[derive(Debug, Error)]
pub enum Error {
    /// XML syntax violation reported by the reader
    #[error("XML syntax error at byte {position}: {message}")]
    Syntax { position: usize, message: String },

    /// Attribute that could not be split into name and value
    #[error("malformed attribute at byte {position}: {message}")]
    Attribute { position: usize, message: String },

    /// Document bytes that are not valid UTF-8
    #[error("invalid UTF-8 in document: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// Well-formed events that do not make up a single-rooted document
    #[error("malformed document: {0}")]
    Structure(String),
}

/// Result type alias for SortCheckstyle operations
pub type Result<T> = std::result::Result<T, Error>;
