//! Parsers and serializers for the SII unit format and the mat material
//! dialect.
//!
//! Both formats share one grammar: records of `class : instance` headers
//! with brace-delimited attribute blocks. [`SiiFile`] handles multi-unit
//! documents with `@include` expansion and encrypted/encoded container
//! detection; [`MatFile`] handles single-record material definitions and
//! normalizes texture bindings across the current and legacy shapes.
//!
//! # Example
//!
//! ```
//! use sii_formats::{SiiFile, Value};
//!
//! let sii = SiiFile::parse(
//!     "SiiNunit {\n\
//!      economy : game.eco {\n\
//!      \tbank: game.bank\n\
//!      \ttotal_distance: 1500\n\
//!      }\n\
//!      }\n",
//! )?;
//!
//! let unit = &sii.units[0];
//! assert_eq!(unit.class_name, "economy");
//! assert_eq!(unit.attributes.get("total_distance"), Some(&Value::Number(1500.0)));
//! # Ok::<(), sii_formats::Error>(())
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod fs;
mod include;
pub mod mat;
pub mod parser;
pub mod preprocess;
mod resolver;
mod serialize;
pub mod sii;
pub mod unit;
pub mod value;

pub use error::{Error, Result};
pub use fs::{DiskFileSystem, FileSystem, MemoryFileSystem};
pub use mat::{MatFile, Texture};
pub use parser::{Parser, RawRecord, RawValue};
pub use sii::{ParseOptions, SiiFile, SCSC_MAGIC, SII_HEADER};
pub use unit::{AttributeMap, Unit};
pub use value::Value;
