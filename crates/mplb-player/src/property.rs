use std::cmp::Ordering;

use mplb_channel::LineIo;
use mplb_schema::{CommandDescriptor, PropertyDescriptor, Value};

use crate::dispatch::{dispatch, Pausing};
use crate::error::{PlayerError, Result};

/// Raw reply a list property yields when it holds no elements.
///
/// Distinct from `PROPERTY_UNAVAILABLE`: an empty list is a well-defined
/// state, "does not currently apply" is not.
const NULL_LIST: &str = "(null)";

/// A typed property value: one scalar, or a sequence of scalars for list
/// properties.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    Scalar(Value),
    List(Vec<Value>),
}

impl PropertyValue {
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            Self::Scalar(v) => Some(v),
            Self::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::Scalar(_) => None,
            Self::List(items) => Some(items),
        }
    }
}

impl From<Value> for PropertyValue {
    fn from(v: Value) -> Self {
        Self::Scalar(v)
    }
}

impl From<Vec<Value>> for PropertyValue {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        Self::Scalar(Value::Bool(v))
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        Self::Scalar(Value::Int(v))
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        Self::Scalar(Value::Float(v))
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        Self::Scalar(Value::Str(v.to_string()))
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        Self::Scalar(Value::Str(v))
    }
}

/// Read a property through the generic `get_property` command and coerce the
/// raw reply to the descriptor's type.
///
/// Properties are layered entirely on the command protocol: `get_property`
/// is itself an ordinary discovered command, dispatched with the property
/// name as its sole argument.
pub fn get(
    desc: &PropertyDescriptor,
    get_property: &CommandDescriptor,
    io: &mut dyn LineIo,
    pausing: Pausing,
) -> Result<Option<PropertyValue>> {
    let raw = dispatch(
        get_property,
        io,
        &[Value::Str(desc.name().to_string())],
        pausing,
    )?;
    let Some(raw) = raw else {
        return Ok(None);
    };

    if desc.is_list() {
        if raw == NULL_LIST {
            return Ok(Some(PropertyValue::List(Vec::new())));
        }
        let items = raw
            .split(',')
            .map(|token| coerce(desc, token))
            .collect::<Result<Vec<_>>>()?;
        return Ok(Some(PropertyValue::List(items)));
    }

    Ok(Some(PropertyValue::Scalar(coerce(desc, &raw)?)))
}

/// Validate a value against the descriptor and write it through the generic
/// `set_property` command.
pub fn set(
    desc: &PropertyDescriptor,
    set_property: &CommandDescriptor,
    io: &mut dyn LineIo,
    pausing: Pausing,
    value: &PropertyValue,
) -> Result<()> {
    let rendered = match (desc.is_list(), value) {
        (false, PropertyValue::Scalar(v)) => {
            check_scalar(desc, v)?;
            v.to_string()
        }
        (true, PropertyValue::List(items)) => {
            for (index, item) in items.iter().enumerate() {
                check_element(desc, index, item)?;
            }
            let rendered: Vec<String> = items.iter().map(Value::to_string).collect();
            rendered.join(",")
        }
        (false, PropertyValue::List(_)) | (true, PropertyValue::Scalar(_)) => {
            return Err(PlayerError::WrongType {
                name: desc.name().to_string(),
                expected: desc.value_type(),
                actual: match value {
                    PropertyValue::Scalar(v) => v.value_type(),
                    PropertyValue::List(_) => desc.value_type(),
                },
            });
        }
    };

    // set_property has no reply; successful enqueue is all the protocol
    // offers.
    dispatch(
        set_property,
        io,
        &[Value::Str(desc.name().to_string()), Value::Str(rendered)],
        pausing,
    )?;
    Ok(())
}

fn coerce(desc: &PropertyDescriptor, raw: &str) -> Result<Value> {
    Value::parse_as(desc.value_type(), raw).ok_or_else(|| PlayerError::BadReply {
        name: desc.name().to_string(),
        raw: raw.to_string(),
        expected: desc.value_type(),
    })
}

fn check_scalar(desc: &PropertyDescriptor, value: &Value) -> Result<()> {
    if value.value_type() != desc.value_type() {
        return Err(PlayerError::WrongType {
            name: desc.name().to_string(),
            expected: desc.value_type(),
            actual: value.value_type(),
        });
    }
    check_bounds(desc, value)
}

fn check_element(desc: &PropertyDescriptor, index: usize, value: &Value) -> Result<()> {
    if value.value_type() != desc.value_type() {
        return Err(PlayerError::ElementType {
            name: desc.name().to_string(),
            index,
            expected: desc.value_type(),
            actual: value.value_type(),
        });
    }
    check_bounds(desc, value)
}

// The checks demand a provable ordering against each bound: an
// incomparable value (NaN) fails here instead of slipping onto the wire.
fn check_bounds(desc: &PropertyDescriptor, value: &Value) -> Result<()> {
    if let Some(min) = desc.min() {
        if !matches!(
            value.partial_cmp(min),
            Some(Ordering::Equal | Ordering::Greater)
        ) {
            return Err(PlayerError::BelowMin {
                name: desc.name().to_string(),
                value: value.to_string(),
                min: min.to_string(),
            });
        }
    }
    if let Some(max) = desc.max() {
        if !matches!(
            value.partial_cmp(max),
            Some(Ordering::Equal | Ordering::Less)
        ) {
            return Err(PlayerError::AboveMax {
                name: desc.name().to_string(),
                value: value.to_string(),
                max: max.to_string(),
            });
        }
    }
    Ok(())
}
