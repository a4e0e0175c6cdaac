//! Error types for SII and mat parsing.

use thiserror::Error;

/// Result type for SII and mat operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing, resolving, or loading documents.
#[derive(Error, Debug)]
pub enum Error {
    /// The parser found a character it did not expect.
    #[error("Expected {expected} at byte {position}, found '{found}'")]
    UnexpectedChar {
        /// Description of what the grammar required at this point.
        expected: &'static str,
        /// The character actually present.
        found: char,
        /// Byte offset into the preprocessed input.
        position: usize,
    },

    /// Input ended in the middle of a declaration.
    #[error("Unexpected end of input at byte {position}")]
    UnexpectedEnd {
        /// Byte offset into the preprocessed input.
        position: usize,
    },

    /// A numeric literal could not be parsed.
    #[error("Invalid number '{text}' at byte {position}")]
    InvalidNumber {
        /// Byte offset of the literal.
        position: usize,
        /// The offending literal text.
        text: String,
    },

    /// A tuple literal had fewer than 2 or more than 4 components.
    #[error("Invalid tuple arity {arity} at byte {position}, must be 2-4")]
    InvalidTupleArity {
        /// Byte offset of the tuple literal.
        position: usize,
        /// Number of components found.
        arity: usize,
    },

    /// The same attribute name appeared twice and overriding is disabled.
    #[error("Duplicate attribute: {name}")]
    DuplicateAttribute {
        /// The attribute name.
        name: String,
    },

    /// A resolved document had a shape the resolver cannot normalize.
    #[error("Structural error: {reason}")]
    Structural {
        /// What the resolver found.
        reason: String,
    },

    /// A value shape the resolver does not know how to normalize.
    #[error("Unsupported value for attribute '{attribute}': {reason}")]
    UnsupportedValue {
        /// The attribute being normalized.
        attribute: String,
        /// Why the value shape is unsupported.
        reason: String,
    },

    /// An `@include`d file does not exist.
    #[error("Included file was not found: {path}")]
    IncludeNotFound {
        /// The resolved include path.
        path: String,
    },

    /// The buffer carries the `ScsC` encrypted-container magic. Decrypting
    /// that wrapper is up to the caller; this engine only detects it.
    #[error("Encrypted SII container (ScsC), decrypt before parsing")]
    EncryptedContainer,

    /// A file-system read failed.
    #[error("IO error reading {path}")]
    Io {
        /// The path the file system was asked for.
        path: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A 3nK payload carried a malformed header.
    #[error(transparent)]
    ThreeNk(#[from] sii_crypto::ThreeNkError),
}
