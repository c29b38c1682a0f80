use serde::Serialize;

use crate::types::{Value, ValueType};

/// One discovered slave-mode command: its name and parameter shape.
///
/// Parameters past `required` are optional; the protocol treats all
/// arguments as positional and contiguous, so an optional argument can only
/// be supplied when every argument before it is.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CommandDescriptor {
    name: String,
    arg_types: Vec<ValueType>,
    required: usize,
}

impl CommandDescriptor {
    /// Build a descriptor. `required` must not exceed the parameter count;
    /// a violation panics in debug builds (it can only come from a parser
    /// bug) and is clamped in release builds.
    pub fn new(name: impl Into<String>, arg_types: Vec<ValueType>, required: usize) -> Self {
        debug_assert!(
            required <= arg_types.len(),
            "required ({required}) exceeds declared parameters ({})",
            arg_types.len()
        );
        let required = required.min(arg_types.len());
        Self {
            name: name.into(),
            arg_types,
            required,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared parameter types, in declaration order.
    pub fn arg_types(&self) -> &[ValueType] {
        &self.arg_types
    }

    /// Number of leading parameters that must be supplied.
    pub fn required(&self) -> usize {
        self.required
    }
}

/// One discovered property: value type, list-ness, and declared bounds.
///
/// For list properties the bounds apply to each element, not the aggregate.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PropertyDescriptor {
    name: String,
    value_type: ValueType,
    is_list: bool,
    min: Option<Value>,
    max: Option<Value>,
}

impl PropertyDescriptor {
    pub fn new(
        name: impl Into<String>,
        value_type: ValueType,
        is_list: bool,
        min: Option<Value>,
        max: Option<Value>,
    ) -> Self {
        Self {
            name: name.into(),
            value_type,
            is_list,
            min,
            max,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Whether the property holds a comma-joined sequence of scalars.
    pub fn is_list(&self) -> bool {
        self.is_list
    }

    pub fn min(&self) -> Option<&Value> {
        self.min.as_ref()
    }

    pub fn max(&self) -> Option<&Value> {
        self.max.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "exceeds declared parameters")]
    fn required_beyond_arity_panics_in_debug() {
        CommandDescriptor::new("seek", vec![ValueType::Float], 3);
    }

    #[test]
    fn niladic_command() {
        let desc = CommandDescriptor::new("quit", vec![], 0);
        assert!(desc.arg_types().is_empty());
        assert_eq!(desc.required(), 0);
    }
}
