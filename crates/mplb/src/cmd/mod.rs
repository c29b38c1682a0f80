use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Subcommand, ValueEnum};
use mplb_channel::LaunchSpec;
use mplb_player::{Pausing, Player, PlayerError};
use mplb_schema::{Schema, Value, ValueType};

use crate::exit::{player_error, schema_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod commands;
pub mod get;
pub mod properties;
pub mod send;
pub mod set;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Discover and print the binary's command vocabulary.
    Commands(ListArgs),
    /// Discover and print the binary's property vocabulary.
    Properties(ListArgs),
    /// Launch a player and read one property.
    Get(GetArgs),
    /// Launch a player and write one property.
    Set(SetArgs),
    /// Launch a player and send one command.
    Send(SendArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Commands(args) => commands::run(args, format),
        Command::Properties(args) => properties::run(args, format),
        Command::Get(args) => get::run(args, format),
        Command::Set(args) => set::run(args, format),
        Command::Send(args) => send::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Path to the player binary.
    pub binary: PathBuf,
}

#[derive(Args, Debug)]
pub struct PlayerArgs {
    /// Path to the player binary.
    pub binary: PathBuf,
    /// Extra startup option, `name=value` (repeatable).
    #[arg(long, value_name = "NAME=VALUE")]
    pub player_option: Vec<String>,
    /// Extra startup flag, bare `name` (repeatable).
    #[arg(long, value_name = "NAME")]
    pub player_flag: Vec<String>,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    #[command(flatten)]
    pub player: PlayerArgs,
    /// Bound property name (default prefix `p_`, e.g. `p_loop`).
    pub property: String,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    #[command(flatten)]
    pub player: PlayerArgs,
    /// Bound property name (default prefix `p_`, e.g. `p_loop`).
    pub property: String,
    /// New value in wire text form; list properties take comma-joined
    /// elements.
    pub value: String,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    #[command(flatten)]
    pub player: PlayerArgs,
    /// Command name as discovered (e.g. `seek`).
    pub command: String,
    /// Positional command arguments.
    pub args: Vec<String>,
    /// Pausing mode for the command line.
    #[arg(long, value_name = "MODE", default_value = "keep")]
    pub pausing: PausingArg,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum PausingArg {
    None,
    Keep,
    Pause,
    Toggle,
    KeepForce,
}

impl From<PausingArg> for Pausing {
    fn from(arg: PausingArg) -> Self {
        match arg {
            PausingArg::None => Pausing::None,
            PausingArg::Keep => Pausing::Keep,
            PausingArg::Pause => Pausing::Pause,
            PausingArg::Toggle => Pausing::Toggle,
            PausingArg::KeepForce => Pausing::KeepForce,
        }
    }
}

/// Discover the vocabulary and launch one player per the CLI arguments.
pub fn launch_player(args: &PlayerArgs) -> CliResult<Player> {
    let schema = Arc::new(
        Schema::discover(&args.binary).map_err(|err| schema_error("discovery failed", err))?,
    );
    let spec = launch_spec(args)?;
    Player::launch(schema, &spec).map_err(|err| player_error("launch failed", err))
}

fn launch_spec(args: &PlayerArgs) -> CliResult<LaunchSpec> {
    let mut spec = LaunchSpec::new(&args.binary);
    for option in &args.player_option {
        let (name, value) = option.split_once('=').ok_or_else(|| {
            CliError::new(USAGE, format!("--player-option must be NAME=VALUE: {option}"))
        })?;
        spec = spec.option(name, value);
    }
    for flag in &args.player_flag {
        spec = spec.flag(flag.clone(), true);
    }
    Ok(spec)
}

/// Coerce one CLI token to the descriptor's declared type.
///
/// The CLI accepts a couple of spellings for booleans; everything on the
/// wire still renders as the protocol's `yes`/`no`.
pub fn coerce_arg(ty: ValueType, raw: &str) -> CliResult<Value> {
    match ty {
        ValueType::Bool => match raw {
            "yes" | "true" | "1" => Ok(Value::Bool(true)),
            "no" | "false" | "0" => Ok(Value::Bool(false)),
            _ => Err(CliError::new(
                USAGE,
                format!("expected a boolean (yes/no), got {raw:?}"),
            )),
        },
        ValueType::Str => Ok(Value::Str(raw.to_string())),
        ValueType::Int => raw
            .parse()
            .map(Value::Int)
            .map_err(|_| CliError::new(USAGE, format!("expected an integer, got {raw:?}"))),
        ValueType::Float => raw
            .parse()
            .map(Value::Float)
            .map_err(|_| CliError::new(USAGE, format!("expected a float, got {raw:?}"))),
    }
}

/// Quit politely, falling back to close on error; CLI sessions are one-shot.
pub fn finish(player: Player) -> CliResult<()> {
    match player.quit() {
        Ok(()) | Err(PlayerError::Closed) => Ok(()),
        Err(err) => {
            player.close();
            Err(player_error("quit failed", err))
        }
    }
}
