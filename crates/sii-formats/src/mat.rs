//! The mat dialect: material definitions with texture sub-records.
//!
//! A mat file is a single record whose instance name is the effect name.
//! Texture bindings appear either as nested `texture : "name" { ... }`
//! blocks (current format) or as parallel `texture` / `texture_name`
//! attributes (legacy format); both normalize into [`Texture`] entries.

use std::collections::HashMap;
use std::fmt::Write;

use crate::error::{Error, Result};
use crate::fs::FileSystem;
use crate::parser::{Parser, RawRecord, RawValue};
use crate::preprocess::{strip_comments, trim_byte_order_mark};
use crate::resolver::{add_attribute, apply_bracket_write, resolve_value};
use crate::serialize::{TupleStyle, write_attributes};
use crate::unit::{AttributeMap, Unit};
use crate::value::Value;

/// A texture binding extracted from a material.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    /// The binding name, e.g. `texture_base`.
    pub name: String,
    /// Binding attributes; the texture path lives under `source`.
    pub attributes: AttributeMap,
}

/// A parsed material definition.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MatFile {
    /// The shader effect name, e.g. `eut2.dif.spec`.
    pub effect: String,
    /// Material attributes with all texture shapes extracted.
    pub attributes: AttributeMap,
    /// Texture bindings in declaration order.
    pub textures: Vec<Texture>,
}

impl MatFile {
    /// Parse mat text.
    pub fn parse(mat: &str) -> Result<Self> {
        let mat = trim_byte_order_mark(mat);
        let stripped = strip_comments(mat);
        let raw = Parser::new(&stripped).parse_single()?;

        let (unit, textures) = second_pass(raw)?;
        Ok(Self {
            effect: unit.instance_name,
            attributes: unit.attributes,
            textures,
        })
    }

    /// Read and parse a mat file through the given file system.
    pub fn open(path: &str, fs: &dyn FileSystem) -> Result<Self> {
        Self::parse(&fs.read_to_string(path)?)
    }

    /// Serialize to canonical mat text. `indentation` is the string used
    /// per nesting level.
    #[must_use]
    pub fn serialize(&self, indentation: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "effect : \"{}\" {{", self.effect);
        write_attributes(&mut out, &self.attributes, indentation, 1, TupleStyle::Braces);
        for texture in &self.textures {
            let _ = writeln!(out, "{indentation}texture: \"{}\" {{", texture.name);
            write_attributes(&mut out, &texture.attributes, indentation, 2, TupleStyle::Braces);
            let _ = writeln!(out, "{indentation}}}");
        }
        let _ = writeln!(out, "}}\n");
        out
    }
}

/// Resolve a raw mat record, pulling texture blocks out into first-class
/// entries. The mat dialect always overrides on duplicate keys.
fn second_pass(raw: RawRecord) -> Result<(Unit, Vec<Texture>)> {
    let mut unit = Unit::new(raw.class_name, raw.instance_name);
    let mut cursors: HashMap<String, usize> = HashMap::new();
    let mut textures = Vec::new();

    for (key, value) in raw.attributes {
        if key.ends_with(']') {
            let value = resolve_value(value, true)?;
            apply_bracket_write(&mut unit.attributes, &key, value, &mut cursors)?;
            continue;
        }
        match value {
            RawValue::Record(block) if key == "texture" => {
                let (resolved, _) = second_pass(block)?;
                textures.push(Texture {
                    name: resolved.instance_name,
                    attributes: resolved.attributes,
                });
            }
            value => {
                let value = resolve_value(value, true)?;
                add_attribute(&mut unit.attributes, key, value, true)?;
            }
        }
    }

    convert_legacy_textures(&mut unit.attributes, &mut textures)?;
    Ok((unit, textures))
}

/// Normalize the legacy `texture` / `texture_name` attribute pair into
/// texture entries, removing both keys.
fn convert_legacy_textures(
    attrs: &mut AttributeMap,
    textures: &mut Vec<Texture>,
) -> Result<()> {
    if !(attrs.contains_key("texture") && attrs.contains_key("texture_name")) {
        return Ok(());
    }
    let (Some(sources), Some(names)) = (attrs.remove("texture"), attrs.remove("texture_name"))
    else {
        return Ok(());
    };

    let sources = element_sequence("texture", sources)?;
    let names = element_sequence("texture_name", names)?;
    if sources.len() != names.len() {
        return Err(Error::Structural {
            reason: format!(
                "legacy texture arity mismatch: {} sources, {} names",
                sources.len(),
                names.len()
            ),
        });
    }

    for (name, source) in names.into_iter().zip(sources) {
        let Value::String(name) = name else {
            return Err(Error::UnsupportedValue {
                attribute: "texture_name".to_string(),
                reason: "texture names must be strings".to_string(),
            });
        };
        let mut attributes = AttributeMap::new();
        attributes.insert("source".to_string(), source);
        textures.push(Texture { name, attributes });
    }

    Ok(())
}

/// Flatten a legacy texture attribute into its element sequence: a scalar
/// is one element, arrays and lists contribute their entries.
fn element_sequence(attribute: &str, value: Value) -> Result<Vec<Value>> {
    match value {
        Value::Array(elems) => elems
            .into_iter()
            .enumerate()
            .map(|(i, slot)| {
                slot.ok_or_else(|| Error::Structural {
                    reason: format!("hole at index {i} in legacy {attribute} array"),
                })
            })
            .collect(),
        Value::List(items) => Ok(items),
        Value::Nested(_) => Err(Error::UnsupportedValue {
            attribute: attribute.to_string(),
            reason: "nested record in a legacy texture attribute".to_string(),
        }),
        scalar => Ok(vec![scalar]),
    }
}
