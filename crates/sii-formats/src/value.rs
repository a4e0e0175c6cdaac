//! Resolved attribute values.

use crate::unit::Unit;

/// A resolved attribute value.
///
/// This is the closed set of shapes an attribute can hold after the second
/// pass. Exactly one variant is active per instance; consumers are expected
/// to match exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A quoted or bare string.
    String(String),
    /// A numeric literal. Serialized via the shortest representation that
    /// parses back to the same value.
    Number(f64),
    /// A boolean literal.
    Bool(bool),
    /// A 2-component numeric tuple.
    Tuple2([f64; 2]),
    /// A 3-component numeric tuple.
    Tuple3([f64; 3]),
    /// A 4-component numeric tuple.
    Tuple4([f64; 4]),
    /// A fixed-length, index-addressed array. Slots that were declared but
    /// never written are `None`.
    Array(Vec<Option<Value>>),
    /// An append-ordered list with no declared length.
    List(Vec<Value>),
    /// A resolved nested record.
    Nested(Box<Unit>),
}

impl Value {
    /// Get the value as a string slice, if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as a number, if it is numeric.
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the value as a boolean, if it is one.
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the array slots, if this is a fixed-length array.
    pub fn as_array(&self) -> Option<&[Option<Value>]> {
        match self {
            Self::Array(elems) => Some(elems),
            _ => None,
        }
    }

    /// Get the list items, if this is a list.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Get the nested record, if this is one.
    pub fn as_nested(&self) -> Option<&Unit> {
        match self {
            Self::Nested(unit) => Some(unit),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<[f64; 2]> for Value {
    fn from(t: [f64; 2]) -> Self {
        Self::Tuple2(t)
    }
}

impl From<[f64; 3]> for Value {
    fn from(t: [f64; 3]) -> Self {
        Self::Tuple3(t)
    }
}

impl From<[f64; 4]> for Value {
    fn from(t: [f64; 4]) -> Self {
        Self::Tuple4(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let s = Value::from("flag_pl");
        assert_eq!(s.as_str(), Some("flag_pl"));
        assert_eq!(s.as_number(), None);

        let n = Value::from(25.0);
        assert_eq!(n.as_number(), Some(25.0));
        assert_eq!(n.as_bool(), None);

        let b = Value::from(true);
        assert_eq!(b.as_bool(), Some(true));

        let list = Value::List(vec![Value::from("a")]);
        assert_eq!(list.as_list().map(<[Value]>::len), Some(1));
        assert_eq!(list.as_array(), None);
    }

    #[test]
    fn test_tuple_conversions() {
        assert_eq!(Value::from([0.2, 0.9]), Value::Tuple2([0.2, 0.9]));
        assert_eq!(Value::from([1.0, 2.0, 3.0]), Value::Tuple3([1.0, 2.0, 3.0]));
    }
}
