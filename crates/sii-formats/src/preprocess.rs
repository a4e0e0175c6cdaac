//! Comment stripping and byte-order-mark handling.
//!
//! Runs before include expansion and parsing. Stripping is line-count and
//! line-ending preserving so positions in later diagnostics stay meaningful,
//! and it never fails: an unterminated block comment simply consumes the
//! rest of the input.

use std::iter::Peekable;
use std::str::Chars;

/// Strip a leading U+FEFF byte order mark, if present.
#[must_use]
pub fn trim_byte_order_mark(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

/// Remove `#`, `//` and `/* */` comments from the input.
///
/// Quoted strings are respected: comment markers inside quotes pass through
/// unchanged. Quotes are balanced, not escape-aware. The output has the same
/// number of line terminators as the input, in the same style.
///
/// # Examples
///
/// ```
/// use sii_formats::preprocess::strip_comments;
///
/// let out = strip_comments("a: 1 # note\nb: \"#notacomment\"\n");
/// assert_eq!(out, "a: 1 \nb: \"#notacomment\"\n");
/// ```
#[must_use]
pub fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_quote = false;

    while let Some(c) = chars.next() {
        if in_quote {
            out.push(c);
            if c == '"' {
                in_quote = false;
            }
            continue;
        }
        match c {
            '"' => {
                in_quote = true;
                out.push(c);
            }
            '#' => skip_line_comment(&mut chars),
            '/' => match chars.peek() {
                Some('/') => {
                    chars.next();
                    skip_line_comment(&mut chars);
                }
                Some('*') => {
                    chars.next();
                    skip_block_comment(&mut chars, &mut out);
                }
                _ => out.push('/'),
            },
            _ => out.push(c),
        }
    }

    out
}

/// Consume up to, but not including, the line terminator, so the main loop
/// re-emits it and line numbering is preserved.
fn skip_line_comment(chars: &mut Peekable<Chars<'_>>) {
    while let Some(&c) = chars.peek() {
        if c == '\n' || c == '\r' {
            break;
        }
        chars.next();
    }
}

/// Consume through the closing `*/`, re-emitting any line terminators the
/// comment spans. An unterminated comment consumes to end of input.
fn skip_block_comment(chars: &mut Peekable<Chars<'_>>, out: &mut String) {
    while let Some(c) = chars.next() {
        match c {
            '*' if chars.peek() == Some(&'/') => {
                chars.next();
                return;
            }
            '\n' | '\r' => out.push(c),
            _ => {}
        }
    }
}
