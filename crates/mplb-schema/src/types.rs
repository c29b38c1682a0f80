use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

/// Semantic value types of the slave protocol.
///
/// The protocol's own tags map many-to-one: `Position` and `Time` are both
/// floating-point, they are not distinct types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Bool,
    Str,
    Int,
    Float,
}

impl ValueType {
    /// Resolve a protocol type tag (`Flag`, `Integer`, `Time`, ...).
    ///
    /// Returns `None` for tags this library does not know; discovery skips
    /// those entries rather than guessing a type.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "Flag" => Some(Self::Bool),
            "String" => Some(Self::Str),
            "Integer" => Some(Self::Int),
            "Float" | "Position" | "Time" => Some(Self::Float),
            _ => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::Str => "string",
            Self::Int => "integer",
            Self::Float => "float",
        };
        f.write_str(name)
    }
}

/// A typed runtime value moving across the protocol.
///
/// `Display` renders the canonical wire form: booleans as `yes`/`no`,
/// integers base-10, floats in default decimal form, strings verbatim (the
/// protocol has no quoting).
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Str(String),
    Int(i64),
    Float(f64),
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Bool(_) => ValueType::Bool,
            Self::Str(_) => ValueType::Str,
            Self::Int(_) => ValueType::Int,
            Self::Float(_) => ValueType::Float,
        }
    }

    /// Parse wire text as the given type.
    ///
    /// Booleans follow the protocol convention: the literal `yes` is true,
    /// anything else is false — that parse never fails. Numeric parses can.
    pub fn parse_as(ty: ValueType, raw: &str) -> Option<Self> {
        match ty {
            ValueType::Bool => Some(Self::Bool(raw == "yes")),
            ValueType::Str => Some(Self::Str(raw.to_string())),
            ValueType::Int => raw.parse().ok().map(Self::Int),
            ValueType::Float => raw.parse().ok().map(Self::Float),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(true) => f.write_str("yes"),
            Self::Bool(false) => f.write_str("no"),
            Self::Str(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
        }
    }
}

/// Values of different types are unordered; bounds checks only ever compare
/// a value against a bound of the property's own type.
impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.partial_cmp(b),
            (Self::Str(a), Self::Str(b)) => a.partial_cmp(b),
            (Self::Int(a), Self::Int(b)) => a.partial_cmp(b),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_resolution_is_many_to_one() {
        assert_eq!(ValueType::from_tag("Flag"), Some(ValueType::Bool));
        assert_eq!(ValueType::from_tag("String"), Some(ValueType::Str));
        assert_eq!(ValueType::from_tag("Integer"), Some(ValueType::Int));
        assert_eq!(ValueType::from_tag("Float"), Some(ValueType::Float));
        assert_eq!(ValueType::from_tag("Position"), Some(ValueType::Float));
        assert_eq!(ValueType::from_tag("Time"), Some(ValueType::Float));
    }

    #[test]
    fn unknown_tags_resolve_to_none() {
        assert_eq!(ValueType::from_tag("Object"), None);
        assert_eq!(ValueType::from_tag("flag"), None);
        assert_eq!(ValueType::from_tag(""), None);
    }

    #[test]
    fn wire_rendering() {
        assert_eq!(Value::Bool(true).to_string(), "yes");
        assert_eq!(Value::Bool(false).to_string(), "no");
        assert_eq!(Value::Int(-1).to_string(), "-1");
        assert_eq!(Value::Float(1.5).to_string(), "1.5");
        assert_eq!(Value::Str("test.ogv".into()).to_string(), "test.ogv");
    }

    #[test]
    fn bool_parse_is_yes_or_false() {
        assert_eq!(Value::parse_as(ValueType::Bool, "yes"), Some(Value::Bool(true)));
        assert_eq!(Value::parse_as(ValueType::Bool, "no"), Some(Value::Bool(false)));
        assert_eq!(Value::parse_as(ValueType::Bool, "1"), Some(Value::Bool(false)));
    }

    #[test]
    fn numeric_parse_failures_are_none() {
        assert_eq!(Value::parse_as(ValueType::Int, "abc"), None);
        assert_eq!(Value::parse_as(ValueType::Float, ""), None);
        assert_eq!(Value::parse_as(ValueType::Int, "-1"), Some(Value::Int(-1)));
        assert_eq!(
            Value::parse_as(ValueType::Float, "99.5"),
            Some(Value::Float(99.5))
        );
    }

    #[test]
    fn ordering_only_within_one_type() {
        assert!(Value::Int(1) < Value::Int(2));
        assert!(Value::Float(0.5) < Value::Float(1.0));
        assert_eq!(Value::Int(1).partial_cmp(&Value::Float(2.0)), None);
    }
}
