use crate::cmd::{finish, launch_player, GetArgs};
use crate::exit::{player_error, CliResult, SUCCESS};
use crate::output::{print_property_value, OutputFormat};

pub fn run(args: GetArgs, format: OutputFormat) -> CliResult<i32> {
    let player = launch_player(&args.player)?;
    let result = player
        .get(&args.property)
        .map_err(|err| player_error("get failed", err));
    let value = match result {
        Ok(value) => value,
        Err(err) => {
            player.close();
            return Err(err);
        }
    };

    print_property_value(&args.property, value.as_ref(), format);
    finish(player)?;
    Ok(SUCCESS)
}
