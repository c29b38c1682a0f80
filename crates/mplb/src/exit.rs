use std::fmt;

use mplb_channel::ChannelError;
use mplb_player::PlayerError;
use mplb_schema::SchemaError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const NOT_FOUND: i32 = 127;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn channel_error(context: &str, err: ChannelError) -> CliError {
    let code = match &err {
        ChannelError::PlayerNotFound { .. } => NOT_FOUND,
        ChannelError::Spawn { .. } => FAILURE,
        ChannelError::Io(_) => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn schema_error(context: &str, err: SchemaError) -> CliError {
    match err {
        SchemaError::Channel(err) => channel_error(context, err),
        other @ (SchemaError::MalformedCommand { .. }
        | SchemaError::InvalidBound { .. }
        | SchemaError::InvertedBounds { .. }) => {
            CliError::new(DATA_INVALID, format!("{context}: {other}"))
        }
    }
}

pub fn player_error(context: &str, err: PlayerError) -> CliError {
    let code = match &err {
        PlayerError::Channel(ChannelError::PlayerNotFound { .. }) => NOT_FOUND,
        PlayerError::Channel(_) | PlayerError::Disconnected | PlayerError::Closed => FAILURE,
        PlayerError::TooFewArgs { .. }
        | PlayerError::TooManyArgs { .. }
        | PlayerError::ArgType { .. }
        | PlayerError::UnknownCommand { .. }
        | PlayerError::UnknownProperty { .. } => USAGE,
        PlayerError::WrongType { .. }
        | PlayerError::ElementType { .. }
        | PlayerError::BelowMin { .. }
        | PlayerError::AboveMax { .. }
        | PlayerError::BadReply { .. }
        | PlayerError::MalformedReply { .. } => DATA_INVALID,
        PlayerError::PrefixCollision { .. } | PlayerError::MissingPrimitive { .. } => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}
