//! First-pass grammar parser.
//!
//! Parses preprocessed, include-expanded text into raw records. This pass is
//! schema-free: duplicate keys are preserved as separate entries and bracket
//! suffixes on keys are opaque text. All interpretation happens in the
//! second pass ([`crate::resolver`]).

use crate::error::{Error, Result};
use crate::sii::SII_HEADER;

/// A first-pass attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// A quoted string or bare token.
    String(String),
    /// A numeric literal.
    Number(f64),
    /// A boolean literal.
    Bool(bool),
    /// A 2-component tuple.
    Tuple2([f64; 2]),
    /// A 3-component tuple.
    Tuple3([f64; 3]),
    /// A 4-component tuple.
    Tuple4([f64; 4]),
    /// A nested record, e.g. a material texture block.
    Record(RawRecord),
}

/// A first-pass record: ordered attributes, duplicates preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// Class name. For nested records this is the attribute key that
    /// introduced the block.
    pub class_name: String,
    /// Instance name; empty for anonymous nested blocks.
    pub instance_name: String,
    /// Attributes in source order. Keys may repeat and may carry a trailing
    /// `[...]` suffix, uninterpreted at this stage.
    pub attributes: Vec<(String, RawValue)>,
}

/// Recursive-descent parser over preprocessed text.
pub struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    /// Create a parser for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Parse a whole document: either a `SiiNunit { ... }` container or a
    /// bare sequence of units.
    pub fn parse_document(mut self) -> Result<Vec<RawRecord>> {
        self.skip_ws();

        let wrapped = self.eat_keyword(SII_HEADER);
        if wrapped {
            self.skip_ws();
            self.consume('{', "'{' after container header")?;
        }

        let mut records = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                None => {
                    if wrapped {
                        return Err(Error::UnexpectedEnd { position: self.pos });
                    }
                    break;
                }
                Some('}') if wrapped => {
                    self.bump();
                    self.skip_ws();
                    if let Some(found) = self.peek() {
                        return Err(Error::UnexpectedChar {
                            expected: "end of input",
                            found,
                            position: self.pos,
                        });
                    }
                    break;
                }
                Some(_) => records.push(self.parse_record()?),
            }
        }

        Ok(records)
    }

    /// Parse exactly one record and require end of input after it. Used by
    /// the mat dialect, which holds a single top-level record.
    pub fn parse_single(mut self) -> Result<RawRecord> {
        self.skip_ws();
        let record = self.parse_record()?;
        self.skip_ws();
        if let Some(found) = self.peek() {
            return Err(Error::UnexpectedChar {
                expected: "end of input",
                found,
                position: self.pos,
            });
        }
        Ok(record)
    }

    /// `class : name { attributes }`
    fn parse_record(&mut self) -> Result<RawRecord> {
        let class_name = self.require_token("unit class name")?;
        self.skip_ws();
        self.consume(':', "':' after class name")?;
        self.skip_ws();

        let instance_name = if self.peek() == Some('"') {
            self.quoted_string()?
        } else {
            self.require_token("unit instance name")?
        };

        self.skip_ws();
        self.consume('{', "'{' opening the attribute block")?;
        let attributes = self.parse_attributes()?;

        Ok(RawRecord {
            class_name,
            instance_name,
            attributes,
        })
    }

    /// Attribute lines up to and including the closing `}`.
    fn parse_attributes(&mut self) -> Result<Vec<(String, RawValue)>> {
        let mut attributes = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                None => return Err(Error::UnexpectedEnd { position: self.pos }),
                Some('}') => {
                    self.bump();
                    return Ok(attributes);
                }
                Some(_) => {
                    let key = self.parse_key()?;
                    self.skip_ws();
                    self.consume(':', "':' after attribute name")?;
                    let value = self.parse_value(&key)?;
                    attributes.push((key, value));
                }
            }
        }
    }

    /// An attribute name with an optional opaque `[...]` suffix.
    fn parse_key(&mut self) -> Result<String> {
        let mut key = self.require_token("attribute name")?;
        if self.peek() == Some('[') {
            loop {
                match self.peek() {
                    None => return Err(Error::UnexpectedEnd { position: self.pos }),
                    Some(c) => {
                        self.bump();
                        key.push(c);
                        if c == ']' {
                            break;
                        }
                    }
                }
            }
        }
        Ok(key)
    }

    fn parse_value(&mut self, key: &str) -> Result<RawValue> {
        self.skip_ws();
        match self.peek() {
            None => Err(Error::UnexpectedEnd { position: self.pos }),
            Some('"') => {
                let text = self.quoted_string()?;
                self.maybe_record(key, text)
            }
            Some('{') => {
                self.bump();
                self.skip_ws();
                if self.peek().is_some_and(|c| starts_number(c, self.lookahead2())) {
                    self.parse_tuple('}')
                } else {
                    let attributes = self.parse_attributes()?;
                    Ok(RawValue::Record(RawRecord {
                        class_name: key.to_string(),
                        instance_name: String::new(),
                        attributes,
                    }))
                }
            }
            Some('(') => {
                self.bump();
                self.parse_tuple(')')
            }
            Some(_) => {
                let start = self.pos;
                let token = self.require_token("attribute value")?;
                match token.as_str() {
                    "true" => Ok(RawValue::Bool(true)),
                    "false" => Ok(RawValue::Bool(false)),
                    _ if token_is_numeric(&token) => token
                        .parse::<f64>()
                        .map(RawValue::Number)
                        .map_err(|_| Error::InvalidNumber {
                            position: start,
                            text: token,
                        }),
                    _ => self.maybe_record(key, token),
                }
            }
        }
    }

    /// A name followed by `{` opens a nested record; otherwise the name is a
    /// plain string value.
    fn maybe_record(&mut self, key: &str, name: String) -> Result<RawValue> {
        self.skip_ws();
        if self.peek() == Some('{') {
            self.bump();
            let attributes = self.parse_attributes()?;
            return Ok(RawValue::Record(RawRecord {
                class_name: key.to_string(),
                instance_name: name,
                attributes,
            }));
        }
        Ok(RawValue::String(name))
    }

    /// Numeric components separated by commas, up to `close`.
    fn parse_tuple(&mut self, close: char) -> Result<RawValue> {
        let start = self.pos;
        let mut components = Vec::new();
        loop {
            self.skip_ws();
            let num_start = self.pos;
            let token = self.require_token("tuple component")?;
            let num = token.parse::<f64>().map_err(|_| Error::InvalidNumber {
                position: num_start,
                text: token,
            })?;
            components.push(num);

            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(c) if c == close => {
                    self.bump();
                    break;
                }
                Some(found) => {
                    return Err(Error::UnexpectedChar {
                        expected: "',' or tuple close",
                        found,
                        position: self.pos,
                    });
                }
                None => return Err(Error::UnexpectedEnd { position: self.pos }),
            }
        }

        match components.as_slice() {
            [a, b] => Ok(RawValue::Tuple2([*a, *b])),
            [a, b, c] => Ok(RawValue::Tuple3([*a, *b, *c])),
            [a, b, c, d] => Ok(RawValue::Tuple4([*a, *b, *c, *d])),
            _ => Err(Error::InvalidTupleArity {
                position: start,
                arity: components.len(),
            }),
        }
    }

    /// Consume the given keyword if it is the next token; restores the
    /// position otherwise.
    fn eat_keyword(&mut self, keyword: &str) -> bool {
        let saved = self.pos;
        if self.token() == keyword {
            true
        } else {
            self.pos = saved;
            false
        }
    }

    /// `"..."` with balanced quotes; not escape-aware.
    fn quoted_string(&mut self) -> Result<String> {
        self.consume('"', "'\"'")?;
        let start = self.pos;
        loop {
            match self.peek() {
                None => return Err(Error::UnexpectedEnd { position: self.pos }),
                Some('"') => {
                    let text = self.input[start..self.pos].to_string();
                    self.bump();
                    return Ok(text);
                }
                Some(_) => self.bump(),
            }
        }
    }

    /// A run of token characters; may be empty.
    fn token(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if is_token_char(c) {
                self.bump();
            } else {
                break;
            }
        }
        &self.input[start..self.pos]
    }

    /// Like [`Self::token`] but fails on an empty token.
    fn require_token(&mut self, expected: &'static str) -> Result<String> {
        let position = self.pos;
        let token = self.token();
        if token.is_empty() {
            return match self.peek() {
                Some(found) => Err(Error::UnexpectedChar {
                    expected,
                    found,
                    position,
                }),
                None => Err(Error::UnexpectedEnd { position }),
            };
        }
        Ok(token.to_string())
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// The character after the current one, if any.
    fn lookahead2(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn consume(&mut self, expected_char: char, expected: &'static str) -> Result<()> {
        match self.peek() {
            Some(c) if c == expected_char => {
                self.bump();
                Ok(())
            }
            Some(found) => Err(Error::UnexpectedChar {
                expected,
                found,
                position: self.pos,
            }),
            None => Err(Error::UnexpectedEnd { position: self.pos }),
        }
    }
}

/// Token characters cover class names, instance names (including leading-dot
/// unit references), bare enum values and numeric literals. `+` is included
/// so signed exponents like `1e+5` stay one token.
fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-' | '+')
}

/// Whether a token that starts this way must be a numeric literal.
fn token_is_numeric(token: &str) -> bool {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), _) if c.is_ascii_digit() => true,
        (Some('-'), Some(c)) => c.is_ascii_digit() || c == '.',
        (Some('.'), Some(c)) => c.is_ascii_digit(),
        _ => false,
    }
}

/// Whether a tuple component can start here (used to tell `{ 0.2, 0.9 }`
/// apart from a nested attribute block).
fn starts_number(c: char, next: Option<char>) -> bool {
    c.is_ascii_digit()
        || (c == '-' && next.is_some_and(|n| n.is_ascii_digit() || n == '.'))
        || (c == '.' && next.is_some_and(|n| n.is_ascii_digit()))
}
