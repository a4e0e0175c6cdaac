//! `@include` directive expansion.
//!
//! Includes are textual splices performed before grammar parsing. Paths in
//! directives are not guaranteed to be filesystem-absolute even when they
//! look absolute, so resolution probes for existence first and falls back to
//! prefixing the base directory. Nested includes resolve against the same
//! base directory as the root document, matching observed single-root
//! resolution in game data.
//!
//! There is no cycle guard: a self-including chain will not terminate.
//! Callers are responsible for well-formed input.

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::fs::FileSystem;
use crate::preprocess::{strip_comments, trim_byte_order_mark};

/// The directive keyword, recognized only at line start.
const INCLUDE_KEYWORD: &str = "@include";

/// Expand every `@include` directive in `text`, returning the spliced text
/// and the list of resolved include paths in encounter order.
///
/// Every resolved path is recorded, including ones that turn out to be
/// missing. A missing file fails with [`Error::IncludeNotFound`] unless
/// `ignore_missing` is set, in which case the directive is dropped.
pub(crate) fn expand_includes(
    text: &str,
    base_dir: &str,
    fs: &dyn FileSystem,
    ignore_missing: bool,
) -> Result<(String, Vec<String>)> {
    let mut out = String::with_capacity(text.len());
    let mut includes = Vec::new();

    for line in text.split_inclusive('\n') {
        if !line.starts_with(INCLUDE_KEYWORD) {
            out.push_str(line);
            continue;
        }

        let Some(path) = quoted_path(line) else {
            warn!(line = line.trim_end(), "dropping malformed include directive");
            continue;
        };

        let resolved = if fs.exists(path) {
            path.to_string()
        } else {
            format!("{base_dir}/{path}")
        };
        includes.push(resolved.clone());

        if !fs.exists(&resolved) {
            if ignore_missing {
                debug!(path = resolved.as_str(), "skipping missing include");
                continue;
            }
            return Err(Error::IncludeNotFound { path: resolved });
        }

        debug!(path = resolved.as_str(), "expanding include");
        let contents = fs.read_to_string(&resolved)?;
        let contents = strip_comments(trim_byte_order_mark(&contents));
        let (expanded, inner) = expand_includes(&contents, base_dir, fs, ignore_missing)?;
        includes.extend(inner);

        out.push_str(&expanded);
        if !expanded.ends_with('\n') {
            out.push('\n');
        }
    }

    Ok((out, includes))
}

/// Extract the quoted path from a directive line.
fn quoted_path(line: &str) -> Option<&str> {
    let start = line.find('"')? + 1;
    let end = line[start..].find('"')? + start;
    Some(&line[start..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFileSystem;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_expands_relative_include() {
        let mut fs = MemoryFileSystem::new();
        fs.insert("/def/common.sui", "shared: 1\n");

        let (text, includes) =
            expand_includes("a: 0\n@include \"common.sui\"\nb: 2\n", "/def", &fs, false).unwrap();

        assert_eq!(text, "a: 0\nshared: 1\nb: 2\n");
        assert_eq!(includes, ["/def/common.sui"]);
    }

    #[test]
    fn test_existing_path_used_as_given() {
        let mut fs = MemoryFileSystem::new();
        fs.insert("def/common.sui", "x: 1\n");

        let (_, includes) =
            expand_includes("@include \"def/common.sui\"\n", "/base", &fs, false).unwrap();
        assert_eq!(includes, ["def/common.sui"]);
    }

    #[test]
    fn test_nested_includes_use_root_base_dir() {
        let mut fs = MemoryFileSystem::new();
        fs.insert("/def/outer.sui", "@include \"inner.sui\"\nouter: 1\n");
        fs.insert("/def/inner.sui", "inner: 1\n");

        let (text, includes) =
            expand_includes("@include \"outer.sui\"\n", "/def", &fs, false).unwrap();

        assert_eq!(text, "inner: 1\nouter: 1\n");
        assert_eq!(includes, ["/def/outer.sui", "/def/inner.sui"]);
    }

    #[test]
    fn test_missing_include_fails_with_resolved_path() {
        let fs = MemoryFileSystem::new();
        let err = expand_includes("@include \"x.sii\"\n", "/def", &fs, false).unwrap_err();
        assert!(matches!(err, Error::IncludeNotFound { path } if path == "/def/x.sii"));
    }

    #[test]
    fn test_missing_include_ignored_when_requested() {
        let fs = MemoryFileSystem::new();
        let (text, includes) =
            expand_includes("a: 1\n@include \"x.sii\"\nb: 2\n", "/def", &fs, true).unwrap();

        assert_eq!(text, "a: 1\nb: 2\n");
        // still recorded for provenance
        assert_eq!(includes, ["/def/x.sii"]);
    }

    #[test]
    fn test_included_comments_are_stripped() {
        let mut fs = MemoryFileSystem::new();
        fs.insert("/def/c.sui", "x: 1 # note\n");

        let (text, _) = expand_includes("@include \"c.sui\"\n", "/def", &fs, false).unwrap();
        assert_eq!(text, "x: 1 \n");
    }

    #[test]
    fn test_directive_not_at_line_start_is_text() {
        let fs = MemoryFileSystem::new();
        let (text, includes) =
            expand_includes("  @include \"x.sii\"\n", "/def", &fs, false).unwrap();
        assert_eq!(text, "  @include \"x.sii\"\n");
        assert!(includes.is_empty());
    }
}
