use mplb_player::PropertyValue;
use mplb_schema::{PropertyDescriptor, Value, ValueType};

use crate::cmd::{coerce_arg, finish, launch_player, SetArgs};
use crate::exit::{player_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::OutputFormat;

pub fn run(args: SetArgs, _format: OutputFormat) -> CliResult<i32> {
    let player = launch_player(&args.player)?;
    let result = coerce_value(player.property_descriptor(&args.property), &args).and_then(
        |value| {
            player
                .set(&args.property, value)
                .map_err(|err| player_error("set failed", err))
        },
    );

    if let Err(err) = result {
        player.close();
        return Err(err);
    }

    finish(player)?;
    Ok(SUCCESS)
}

fn coerce_value(desc: Option<&PropertyDescriptor>, args: &SetArgs) -> CliResult<PropertyValue> {
    let desc = desc.ok_or_else(|| {
        CliError::new(USAGE, format!("unknown property: {}", args.property))
    })?;
    if desc.is_list() {
        let elements = parse_list(desc.value_type(), &args.value)?;
        Ok(PropertyValue::List(elements))
    } else {
        Ok(PropertyValue::Scalar(coerce_arg(
            desc.value_type(),
            &args.value,
        )?))
    }
}

// Empty input means an empty list, matching how the player reports one.
fn parse_list(ty: ValueType, raw: &str) -> CliResult<Vec<Value>> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    raw.split(',').map(|item| coerce_arg(ty, item)).collect()
}
