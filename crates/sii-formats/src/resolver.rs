//! Second pass: raw records to canonical units.
//!
//! Folds each record's duplicate-preserving attribute sequence into an
//! ordered, unique-key map, disambiguating bracket-indexed entries into
//! fixed-length arrays or append-ordered lists along the way. The duplicate
//! policy is an explicit parameter on every call; there is no ambient
//! configuration.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::parser::{RawRecord, RawValue};
use crate::unit::{AttributeMap, Unit};
use crate::value::Value;

/// Resolve a raw record into a unit.
pub(crate) fn resolve_record(raw: RawRecord, override_on_duplicate: bool) -> Result<Unit> {
    let mut unit = Unit::new(raw.class_name, raw.instance_name);
    // next implicit insert index per array base name, scoped to this record
    let mut cursors: HashMap<String, usize> = HashMap::new();

    for (key, value) in raw.attributes {
        let value = resolve_value(value, override_on_duplicate)?;
        if key.ends_with(']') {
            apply_bracket_write(&mut unit.attributes, &key, value, &mut cursors)?;
        } else {
            add_attribute(&mut unit.attributes, key, value, override_on_duplicate)?;
        }
    }

    Ok(unit)
}

/// Map a raw scalar to its resolved form; nested records resolve
/// recursively.
pub(crate) fn resolve_value(raw: RawValue, override_on_duplicate: bool) -> Result<Value> {
    Ok(match raw {
        RawValue::String(s) => Value::String(s),
        RawValue::Number(n) => Value::Number(n),
        RawValue::Bool(b) => Value::Bool(b),
        RawValue::Tuple2(t) => Value::Tuple2(t),
        RawValue::Tuple3(t) => Value::Tuple3(t),
        RawValue::Tuple4(t) => Value::Tuple4(t),
        RawValue::Record(record) => {
            Value::Nested(Box::new(resolve_record(record, override_on_duplicate)?))
        }
    })
}

/// Add a plain (non-bracket) attribute under the duplicate policy.
pub(crate) fn add_attribute(
    attrs: &mut AttributeMap,
    name: String,
    value: Value,
    override_on_duplicate: bool,
) -> Result<()> {
    if attrs.contains_key(&name) && !override_on_duplicate {
        return Err(Error::DuplicateAttribute { name });
    }
    attrs.insert(name, value);
    Ok(())
}

/// Apply one `name[idx-or-empty]` write.
///
/// Classification happens the first time a base name is seen and is
/// permanent for the record: an explicit index (or a prior integer scalar
/// declaring the length) makes a fixed-length array, an empty index makes an
/// append-ordered list. A prior non-integer scalar under the base name is
/// folded into a single-element array; that is a recovery path for
/// malformed input, not a supported idiom.
pub(crate) fn apply_bracket_write(
    attrs: &mut AttributeMap,
    raw_key: &str,
    value: Value,
    cursors: &mut HashMap<String, usize>,
) -> Result<()> {
    let open = raw_key.rfind('[').ok_or_else(|| Error::Structural {
        reason: format!("not an array entry attribute: {raw_key}"),
    })?;
    let base = &raw_key[..open];
    let index_text = &raw_key[open + 1..raw_key.len() - 1];
    // non-numeric index text, or an index outside u32 range, behaves like
    // an empty index
    let explicit: Option<usize> = index_text.parse::<u32>().ok().map(|i| i as usize);

    match attrs.get(base) {
        Some(Value::Array(_) | Value::List(_)) => {}
        Some(Value::Number(n)) if *n >= 0.0 && n.fract() == 0.0 => {
            // declared-length idiom: the integer scalar carried the array
            // size and is replaced by the element storage
            let declared = *n as usize;
            attrs.insert(base.to_string(), Value::Array(vec![None; declared]));
        }
        Some(_) => {
            if let Some(slot) = attrs.get_mut(base) {
                let prior = std::mem::replace(slot, Value::Array(Vec::new()));
                *slot = Value::Array(vec![Some(prior)]);
            }
            // keep the recovered scalar: implicit writes continue after it
            cursors.insert(base.to_string(), 1);
        }
        None => {
            let storage = if let Some(i) = explicit {
                Value::Array(vec![None; i + 1])
            } else {
                Value::List(Vec::new())
            };
            attrs.insert(base.to_string(), storage);
        }
    }

    let cursor = cursors.entry(base.to_string()).or_insert(0);
    match attrs.get_mut(base) {
        Some(Value::Array(elems)) => {
            if let Some(i) = explicit {
                if elems.len() < i + 1 {
                    elems.resize(i + 1, None);
                }
                elems[i] = Some(value);
                *cursor = i + 1;
            } else {
                let i = *cursor;
                *cursor += 1;
                if i >= elems.len() {
                    elems.push(Some(value));
                } else {
                    elems[i] = Some(value);
                }
            }
        }
        Some(Value::List(items)) => items.push(value),
        _ => {
            return Err(Error::Structural {
                reason: format!("array storage for '{base}' was replaced mid-record"),
            });
        }
    }

    Ok(())
}
