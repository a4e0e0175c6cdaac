//! Byte-level codecs for SCS asset payloads.
//!
//! The only codec implemented here is 3nK, the position-keyed XOR stream
//! cipher used to obfuscate on-disk SII and material payloads. The cipher
//! table is a fixed public constant; 3nK is obfuscation, not encryption,
//! and this crate performs no key management.
//!
//! # Quick Start
//!
//! ```rust
//! use sii_crypto::threenk;
//!
//! let encoded = threenk::encode(b"SiiNunit\n{\n}\n", 0x42);
//! assert!(threenk::is_threenk(&encoded));
//!
//! let decoded = threenk::decode(&encoded)?;
//! assert_eq!(decoded, b"SiiNunit\n{\n}\n");
//! # Ok::<(), sii_crypto::ThreeNkError>(())
//! ```

#![warn(missing_docs)]

pub mod threenk;

pub use threenk::{ThreeNkError, ThreeNkHeader, decode, encode, is_threenk, transcode};
