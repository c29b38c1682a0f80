use mplb_player::Player;
use mplb_schema::Value;

use crate::cmd::{coerce_arg, finish, launch_player, SendArgs};
use crate::exit::{player_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::OutputFormat;

pub fn run(args: SendArgs, _format: OutputFormat) -> CliResult<i32> {
    let player = launch_player(&args.player)?;
    let result = coerce_args(&player, &args).and_then(|values| {
        player
            .invoke_with(&args.command, &values, args.pausing.into())
            .map_err(|err| player_error("send failed", err))
    });

    let reply = match result {
        Ok(reply) => reply,
        Err(err) => {
            player.close();
            return Err(err);
        }
    };

    if let Some(reply) = reply {
        println!("{reply}");
    }
    finish(player)?;
    Ok(SUCCESS)
}

fn coerce_args(player: &Player, args: &SendArgs) -> CliResult<Vec<Value>> {
    let desc = player.command_descriptor(&args.command).ok_or_else(|| {
        CliError::new(USAGE, format!("unknown command: {}", args.command))
    })?;
    if args.args.len() > desc.arg_types().len() {
        return Err(CliError::new(
            USAGE,
            format!(
                "{} takes at most {} argument(s), got {}",
                args.command,
                desc.arg_types().len(),
                args.args.len()
            ),
        ));
    }
    desc.arg_types()
        .iter()
        .zip(&args.args)
        .map(|(ty, raw)| coerce_arg(*ty, raw))
        .collect()
}
