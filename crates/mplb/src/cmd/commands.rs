use mplb_schema::Schema;

use crate::cmd::ListArgs;
use crate::exit::{schema_error, CliResult, SUCCESS};
use crate::output::{print_commands, OutputFormat};

pub fn run(args: ListArgs, format: OutputFormat) -> CliResult<i32> {
    let schema =
        Schema::discover(&args.binary).map_err(|err| schema_error("discovery failed", err))?;
    print_commands(schema.commands(), format);
    Ok(SUCCESS)
}
