use std::collections::HashMap;
use std::path::Path;

use mplb_channel::PlayerProcess;

use crate::descriptor::{CommandDescriptor, PropertyDescriptor};
use crate::error::{Result, SchemaError};
use crate::types::{Value, ValueType};

/// Discovery-pass arguments for the command listing.
pub const CMDLIST_ARGS: &[&str] = &["-input", "cmdlist"];

/// Discovery-pass arguments for the property listing.
pub const PROPERTY_LIST_ARGS: &[&str] = &["-list-properties"];

/// Parse one `-input cmdlist` line.
///
/// Shape: `name [type]*` where a bracketed type tag (`[Integer]`) marks an
/// optional parameter. Returns `Ok(None)` for blank lines and for commands
/// using a type tag this library does not know — a forward-evolved binary
/// may list commands we cannot type, and guessing would be worse than
/// omitting them. A bracket that never closes is a hard error: that is not
/// vocabulary evolution, it is a breaking format change.
pub fn parse_command_line(line: &str) -> Result<Option<CommandDescriptor>> {
    let mut tokens = line.split_whitespace();
    let Some(name) = tokens.next() else {
        return Ok(None);
    };

    let mut arg_types = Vec::new();
    let mut required = 0;
    for token in tokens {
        let (tag, optional) = match token.strip_prefix('[') {
            Some(inner) => {
                let tag = inner
                    .strip_suffix(']')
                    .ok_or_else(|| SchemaError::MalformedCommand {
                        line: line.to_string(),
                    })?;
                (tag, true)
            }
            None => (token, false),
        };

        match ValueType::from_tag(tag) {
            Some(ty) => {
                arg_types.push(ty);
                if !optional {
                    required += 1;
                }
            }
            None => {
                tracing::warn!(command = name, tag, "skipping command with unknown type tag");
                return Ok(None);
            }
        }
    }

    Ok(Some(CommandDescriptor::new(name, arg_types, required)))
}

/// Parse one `-list-properties` line.
///
/// Two recognized shapes: `name Type min max`, or `name Type list min max`
/// for list-valued properties. Anything else on the listing (headers, blank
/// lines, decorations) is skipped, as are properties of unknown type. A
/// bound that is neither the literal `No` nor a value of the property's own
/// type is a hard error.
pub fn parse_property_line(line: &str) -> Result<Option<PropertyDescriptor>> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let (name, tag, is_list, min_raw, max_raw) = match parts.as_slice() {
        [name, tag, min, max] => (*name, *tag, false, *min, *max),
        [name, tag, "list", min, max] => (*name, *tag, true, *min, *max),
        _ => return Ok(None),
    };

    let Some(value_type) = ValueType::from_tag(tag) else {
        tracing::debug!(property = name, tag, "skipping property with unknown type tag");
        return Ok(None);
    };

    let min = parse_bound(name, value_type, min_raw)?;
    let max = parse_bound(name, value_type, max_raw)?;
    if let (Some(min), Some(max)) = (&min, &max) {
        if min > max {
            return Err(SchemaError::InvertedBounds {
                name: name.to_string(),
                min: min.to_string(),
                max: max.to_string(),
            });
        }
    }

    Ok(Some(PropertyDescriptor::new(
        name, value_type, is_list, min, max,
    )))
}

fn parse_bound(name: &str, ty: ValueType, raw: &str) -> Result<Option<Value>> {
    if raw == "No" {
        return Ok(None);
    }
    match Value::parse_as(ty, raw) {
        Some(value) => Ok(Some(value)),
        None => Err(SchemaError::InvalidBound {
            name: name.to_string(),
            value: raw.to_string(),
            expected: ty,
        }),
    }
}

/// The discovered vocabulary: every command and property the binary
/// reported, in listing order, with name lookups.
///
/// Immutable once built. Wrap it in an `Arc` and share it across any number
/// of player instances — discovery runs the binary twice, there is no reason
/// to repeat that per player.
#[derive(Debug, Default)]
pub struct Schema {
    commands: Vec<CommandDescriptor>,
    properties: Vec<PropertyDescriptor>,
    command_index: HashMap<String, usize>,
    property_index: HashMap<String, usize>,
}

impl Schema {
    /// Run both discovery passes against the binary.
    pub fn discover(binary: impl AsRef<Path>) -> Result<Self> {
        let binary = binary.as_ref();
        let commands = discover_commands(binary)?;
        let properties = discover_properties(binary)?;
        Ok(Self::from_parts(commands, properties))
    }

    /// Build a schema from already-captured listing lines.
    pub fn from_listings<'a>(
        command_lines: impl IntoIterator<Item = &'a str>,
        property_lines: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self> {
        let mut commands = Vec::new();
        for line in command_lines {
            if let Some(desc) = parse_command_line(line)? {
                commands.push(desc);
            }
        }
        let mut properties = Vec::new();
        for line in property_lines {
            if let Some(desc) = parse_property_line(line)? {
                properties.push(desc);
            }
        }
        Ok(Self::from_parts(commands, properties))
    }

    /// Bundle descriptor collections. A repeated name replaces the earlier
    /// descriptor in place, so the latest listing entry wins.
    pub fn from_parts(
        commands: Vec<CommandDescriptor>,
        properties: Vec<PropertyDescriptor>,
    ) -> Self {
        let mut schema = Self::default();
        for desc in commands {
            match schema.command_index.get(desc.name()) {
                Some(&i) => schema.commands[i] = desc,
                None => {
                    schema
                        .command_index
                        .insert(desc.name().to_string(), schema.commands.len());
                    schema.commands.push(desc);
                }
            }
        }
        for desc in properties {
            match schema.property_index.get(desc.name()) {
                Some(&i) => schema.properties[i] = desc,
                None => {
                    schema
                        .property_index
                        .insert(desc.name().to_string(), schema.properties.len());
                    schema.properties.push(desc);
                }
            }
        }
        schema
    }

    pub fn command(&self, name: &str) -> Option<&CommandDescriptor> {
        self.command_index.get(name).map(|&i| &self.commands[i])
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.property_index.get(name).map(|&i| &self.properties[i])
    }

    /// All commands in listing order.
    pub fn commands(&self) -> &[CommandDescriptor] {
        &self.commands
    }

    /// All properties in listing order.
    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }
}

/// Run the command-listing discovery pass.
pub fn discover_commands(binary: &Path) -> Result<Vec<CommandDescriptor>> {
    let lines = PlayerProcess::discovery_pass(binary, CMDLIST_ARGS)?;
    let mut commands = Vec::new();
    for line in &lines {
        if let Some(desc) = parse_command_line(line)? {
            commands.push(desc);
        }
    }
    tracing::debug!(total = lines.len(), typed = commands.len(), "command discovery");
    Ok(commands)
}

/// Run the property-listing discovery pass.
pub fn discover_properties(binary: &Path) -> Result<Vec<PropertyDescriptor>> {
    let lines = PlayerProcess::discovery_pass(binary, PROPERTY_LIST_ARGS)?;
    let mut properties = Vec::new();
    for line in &lines {
        if let Some(desc) = parse_property_line(line)? {
            properties.push(desc);
        }
    }
    tracing::debug!(total = lines.len(), typed = properties.len(), "property discovery");
    Ok(properties)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_niladic() {
        let desc = parse_command_line("quit").unwrap().unwrap();
        assert_eq!(desc.name(), "quit");
        assert!(desc.arg_types().is_empty());
        assert_eq!(desc.required(), 0);
    }

    #[test]
    fn command_required_and_optional_args() {
        let desc = parse_command_line("seek Float [Integer]").unwrap().unwrap();
        assert_eq!(desc.name(), "seek");
        assert_eq!(desc.arg_types(), &[ValueType::Float, ValueType::Int]);
        assert_eq!(desc.required(), 1);
    }

    #[test]
    fn command_all_optional() {
        let desc = parse_command_line("quit [Integer]").unwrap().unwrap();
        assert_eq!(desc.required(), 0);
        assert_eq!(desc.arg_types(), &[ValueType::Int]);
    }

    #[test]
    fn command_position_and_time_are_float() {
        let desc = parse_command_line("seek_chapter Integer [Integer]")
            .unwrap()
            .unwrap();
        assert_eq!(desc.required(), 1);
        let desc = parse_command_line("set_position Position Time").unwrap().unwrap();
        assert_eq!(desc.arg_types(), &[ValueType::Float, ValueType::Float]);
    }

    #[test]
    fn command_blank_line_skipped() {
        assert!(parse_command_line("").unwrap().is_none());
        assert!(parse_command_line("   ").unwrap().is_none());
    }

    #[test]
    fn command_unknown_tag_skipped_not_defaulted() {
        assert!(parse_command_line("future_cmd Gadget").unwrap().is_none());
    }

    #[test]
    fn command_unclosed_bracket_is_error() {
        let err = parse_command_line("seek [Float").unwrap_err();
        assert!(matches!(err, SchemaError::MalformedCommand { .. }));
    }

    #[test]
    fn property_scalar_with_bounds() {
        let desc = parse_property_line("volume Float 0 100").unwrap().unwrap();
        assert_eq!(desc.name(), "volume");
        assert_eq!(desc.value_type(), ValueType::Float);
        assert!(!desc.is_list());
        assert_eq!(desc.min(), Some(&Value::Float(0.0)));
        assert_eq!(desc.max(), Some(&Value::Float(100.0)));
    }

    #[test]
    fn property_no_bounds() {
        let desc = parse_property_line("loop Integer No No").unwrap().unwrap();
        assert_eq!(desc.min(), None);
        assert_eq!(desc.max(), None);
    }

    #[test]
    fn property_list_shape() {
        let desc = parse_property_line("metadata String list No No")
            .unwrap()
            .unwrap();
        assert!(desc.is_list());
        assert_eq!(desc.value_type(), ValueType::Str);
    }

    #[test]
    fn property_unrecognized_shapes_skipped() {
        assert!(parse_property_line("").unwrap().is_none());
        assert!(parse_property_line("Name Type Min Max comment").unwrap().is_none());
        assert!(parse_property_line("just three fields").unwrap().is_none());
    }

    #[test]
    fn property_unknown_type_skipped() {
        assert!(parse_property_line("chapters Object No No").unwrap().is_none());
    }

    #[test]
    fn property_unparsable_bound_is_error() {
        let err = parse_property_line("speed Float low high").unwrap_err();
        assert!(matches!(err, SchemaError::InvalidBound { .. }));
    }

    #[test]
    fn property_inverted_bounds_is_error() {
        let err = parse_property_line("volume Float 100 0").unwrap_err();
        assert!(matches!(err, SchemaError::InvertedBounds { .. }));
        // Equal bounds describe a single admissible value and stay valid.
        let desc = parse_property_line("loop Integer 0 0").unwrap().unwrap();
        assert_eq!(desc.min(), desc.max());
    }

    #[test]
    fn schema_lookup_and_order() {
        let schema = Schema::from_listings(
            ["quit", "loadfile String [Integer]", "get_property String"],
            ["loop Integer No No", "volume Float 0 100"],
        )
        .unwrap();

        assert_eq!(schema.commands().len(), 3);
        assert_eq!(schema.commands()[1].name(), "loadfile");
        assert_eq!(schema.command("quit").unwrap().required(), 0);
        assert_eq!(schema.property("volume").unwrap().value_type(), ValueType::Float);
        assert!(schema.command("unknown").is_none());
        assert!(schema.property("quit").is_none());
    }

    #[test]
    fn schema_duplicate_name_last_wins() {
        let schema = Schema::from_listings(["seek Float", "seek Float [Integer]"], []).unwrap();
        assert_eq!(schema.commands().len(), 1);
        assert_eq!(schema.command("seek").unwrap().arg_types().len(), 2);
    }

    #[test]
    fn schema_skips_junk_but_fails_on_corrupt_bound() {
        let schema = Schema::from_listings(
            [],
            ["# properties:", "loop Integer No No", "weird Line"],
        )
        .unwrap();
        assert_eq!(schema.properties().len(), 1);

        let err = Schema::from_listings([], ["loop Integer No bogus"]).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidBound { .. }));
    }
}
