//! SII files: parsing, loading and serialization entry points.

use std::fmt::Write;

use tracing::debug;

use crate::error::{Error, Result};
use crate::fs::{DiskFileSystem, FileSystem};
use crate::include::expand_includes;
use crate::parser::Parser;
use crate::preprocess::{strip_comments, trim_byte_order_mark};
use crate::resolver::resolve_record;
use crate::serialize::{TupleStyle, write_attributes};
use crate::unit::Unit;

/// Container header of a serialized SII file.
pub const SII_HEADER: &str = "SiiNunit";

/// Magic of the outer encrypted container. Detection only; decrypting it is
/// an external collaborator's job.
pub const SCSC_MAGIC: [u8; 4] = *b"ScsC";

/// Per-call parse behavior. Both leniency knobs the engine offers live
/// here; there is no process-global configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// When a unit declares the same attribute twice, keep the last write
    /// instead of failing. Game data relies on this, so it defaults to on.
    pub override_on_duplicate: bool,
    /// Drop `@include` directives whose target does not exist instead of
    /// failing.
    pub ignore_missing_includes: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            override_on_duplicate: true,
            ignore_missing_includes: false,
        }
    }
}

/// A parsed SII file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SiiFile {
    /// Units in declaration order.
    pub units: Vec<Unit>,
    /// Every include path resolved while loading, in encounter order.
    /// Provenance only; not consumed further.
    pub includes: Vec<String>,
}

impl SiiFile {
    /// Parse SII text with default options. `@include` targets resolve
    /// against the current directory via [`DiskFileSystem`]; use
    /// [`Self::parse_with`] when includes live elsewhere.
    pub fn parse(sii: &str) -> Result<Self> {
        Self::parse_with(sii, "", &DiskFileSystem, ParseOptions::default())
    }

    /// Parse SII text, resolving `@include` directives against `base_dir`
    /// through the given file system.
    pub fn parse_with(
        sii: &str,
        base_dir: &str,
        fs: &dyn FileSystem,
        options: ParseOptions,
    ) -> Result<Self> {
        let sii = trim_byte_order_mark(sii);
        let stripped = strip_comments(sii);
        let (expanded, includes) =
            expand_includes(&stripped, base_dir, fs, options.ignore_missing_includes)?;

        let raw_records = Parser::new(&expanded).parse_document()?;
        let units = raw_records
            .into_iter()
            .map(|record| resolve_record(record, options.override_on_duplicate))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { units, includes })
    }

    /// Parse an SII buffer, sniffing the container format first: `ScsC`
    /// payloads are rejected as [`Error::EncryptedContainer`], 3nK payloads
    /// are decoded transparently, anything else is treated as UTF-8 text.
    pub fn from_bytes(
        sii: &[u8],
        base_dir: &str,
        fs: &dyn FileSystem,
        options: ParseOptions,
    ) -> Result<Self> {
        if sii.len() >= SCSC_MAGIC.len() && sii[..SCSC_MAGIC.len()] == SCSC_MAGIC {
            debug!("buffer carries ScsC magic");
            return Err(Error::EncryptedContainer);
        }
        if sii_crypto::is_threenk(sii) {
            debug!("buffer carries 3nK magic, decoding");
            let decoded = sii_crypto::decode(sii)?;
            let text = String::from_utf8_lossy(&decoded).into_owned();
            return Self::parse_with(&text, base_dir, fs, options);
        }
        Self::parse_with(&String::from_utf8_lossy(sii), base_dir, fs, options)
    }

    /// Open an SII file through the given file system. The file's parent
    /// directory becomes the base directory for `@include` resolution.
    pub fn open(path: &str, fs: &dyn FileSystem, options: ParseOptions) -> Result<Self> {
        debug!(path, "opening SII file");
        let bytes = fs.read(path)?;
        let base_dir = fs.parent(path);
        Self::from_bytes(&bytes, &base_dir, fs, options)
    }

    /// Serialize to canonical SII text. `indentation` is the string used
    /// per nesting level inside units; game files use one tab.
    #[must_use]
    pub fn serialize(&self, indentation: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{SII_HEADER}\n{{\n");
        for unit in &self.units {
            let _ = writeln!(out, "{} : {}\n{{", unit.class_name, unit.instance_name);
            write_attributes(&mut out, &unit.attributes, indentation, 1, TupleStyle::Parens);
            let _ = writeln!(out, "}}\n");
        }
        let _ = writeln!(out, "}}");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFileSystem;
    use crate::value::Value;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_wrapped_document() {
        let sii = "SiiNunit\n{\ncity_data : .city.ber {\n\tcity_name: \"Berlin\"\n}\n}\n";
        let file = SiiFile::parse(sii).unwrap();
        assert_eq!(file.units.len(), 1);
        assert_eq!(file.units[0].attributes.get("city_name"), Some(&Value::from("Berlin")));
        assert!(file.includes.is_empty());
    }

    #[test]
    fn test_parse_strips_bom_and_comments() {
        let sii = "\u{feff}# header comment\nx : y { a: 1 /* mid */ }\n";
        let file = SiiFile::parse(sii).unwrap();
        assert_eq!(file.units[0].attributes.get("a"), Some(&Value::Number(1.0)));
    }

    #[test]
    fn test_includes_resolved_through_fs() {
        let mut fs = MemoryFileSystem::new();
        fs.insert("/def/extra.sui", "\tcity_name: \"Bern\"\n");
        let sii = "x : y {\n@include \"extra.sui\"\n}\n";

        let file = SiiFile::parse_with(sii, "/def", &fs, ParseOptions::default()).unwrap();
        assert_eq!(file.includes, ["/def/extra.sui"]);
        assert_eq!(file.units[0].attributes.get("city_name"), Some(&Value::from("Bern")));
    }

    #[test]
    fn test_missing_include_policy() {
        let fs = MemoryFileSystem::new();
        let sii = "x : y { }\n@include \"x.sii\"\n";

        let err = SiiFile::parse_with(sii, "/def", &fs, ParseOptions::default()).unwrap_err();
        assert!(matches!(err, Error::IncludeNotFound { path } if path == "/def/x.sii"));

        let lenient = ParseOptions {
            ignore_missing_includes: true,
            ..ParseOptions::default()
        };
        let file = SiiFile::parse_with(sii, "/def", &fs, lenient).unwrap();
        assert_eq!(file.units.len(), 1);
        assert_eq!(file.includes, ["/def/x.sii"]);
    }

    #[test]
    fn test_from_bytes_detects_scsc() {
        let err = SiiFile::from_bytes(
            b"ScsC\x00\x00\x00garbage",
            "",
            &MemoryFileSystem::new(),
            ParseOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::EncryptedContainer));
    }

    #[test]
    fn test_from_bytes_decodes_threenk() {
        let plain = b"SiiNunit\n{\nx : y {\n\ta: 1\n}\n}\n";
        let encoded = sii_crypto::encode(plain, 0x2A);

        let file = SiiFile::from_bytes(
            &encoded,
            "",
            &MemoryFileSystem::new(),
            ParseOptions::default(),
        )
        .unwrap();
        assert_eq!(file.units[0].attributes.get("a"), Some(&Value::Number(1.0)));
    }

    #[test]
    fn test_open_uses_parent_as_base_dir() {
        let mut fs = MemoryFileSystem::new();
        fs.insert("/def/city.sii", "x : y {\n@include \"names.sui\"\n}\n");
        fs.insert("/def/names.sui", "\tcity_name: \"Bern\"\n");

        let file = SiiFile::open("/def/city.sii", &fs, ParseOptions::default()).unwrap();
        assert_eq!(file.includes, ["/def/names.sui"]);
        assert_eq!(file.units[0].attributes.get("city_name"), Some(&Value::from("Bern")));
    }

    #[test]
    fn test_serialize_layout() {
        let sii = "SiiNunit\n{\nx : y {\n\ta: 1\n}\n}\n";
        let file = SiiFile::parse(sii).unwrap();
        assert_eq!(
            file.serialize("\t"),
            "SiiNunit\n{\n\nx : y\n{\n\ta: 1\n}\n\n}\n"
        );
    }

    #[test]
    fn test_serialized_output_reparses() {
        let sii = "SiiNunit\n{\nx : y {\n\tpos: (1, 2, 3)\n\tnames[]: \"a\"\n\tnames[]: \"b\"\n}\n}\n";
        let file = SiiFile::parse(sii).unwrap();
        let reparsed = SiiFile::parse(&file.serialize("\t")).unwrap();

        assert_eq!(reparsed.units[0].attributes.get("pos"), Some(&Value::Tuple3([1.0, 2.0, 3.0])));
        // lists serialize with explicit indices, so they reparse as arrays
        // with the same elements in the same order
        let Some(Value::Array(elems)) = reparsed.units[0].attributes.get("names") else {
            panic!("expected array after round trip");
        };
        assert_eq!(
            elems,
            &vec![Some(Value::from("a")), Some(Value::from("b"))]
        );
    }
}
