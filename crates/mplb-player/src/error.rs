use mplb_schema::ValueType;

/// Errors that can occur while driving a player.
#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    /// Channel-level error (spawn, stream I/O).
    #[error("channel error: {0}")]
    Channel(#[from] mplb_channel::ChannelError),

    /// Fewer arguments than the command requires.
    #[error("{name} takes at least {required} arguments ({given} given)")]
    TooFewArgs {
        name: String,
        required: usize,
        given: usize,
    },

    /// More arguments than the command declares.
    #[error("{name} takes at most {max} arguments ({given} given)")]
    TooManyArgs {
        name: String,
        max: usize,
        given: usize,
    },

    /// A command argument's type does not match the descriptor exactly.
    #[error("argument {index} of {name} has type {actual}, expected {expected}")]
    ArgType {
        name: String,
        index: usize,
        expected: ValueType,
        actual: ValueType,
    },

    /// A scalar property value of the wrong type.
    #[error("{name} has type {actual}, not {expected}")]
    WrongType {
        name: String,
        expected: ValueType,
        actual: ValueType,
    },

    /// A list property element of the wrong type.
    #[error("element {index} of {name} has type {actual}, not {expected}")]
    ElementType {
        name: String,
        index: usize,
        expected: ValueType,
        actual: ValueType,
    },

    /// A property value below the declared minimum.
    #[error("{name}: {value} must be at least {min}")]
    BelowMin {
        name: String,
        value: String,
        min: String,
    },

    /// A property value above the declared maximum.
    #[error("{name}: {value} must be at most {max}")]
    AboveMax {
        name: String,
        value: String,
        max: String,
    },

    /// Two bound names collide after prefixing. Raised at construction,
    /// before any process is launched.
    #[error("prefix collision: {name} is bound more than once")]
    PrefixCollision { name: String },

    /// The discovered vocabulary lacks a primitive the property layer is
    /// built on (`get_property` / `set_property`).
    #[error("schema does not provide the {name} command")]
    MissingPrimitive { name: &'static str },

    /// No command bound under this name.
    #[error("unknown command: {name}")]
    UnknownCommand { name: String },

    /// No property bound under this name.
    #[error("unknown property: {name}")]
    UnknownProperty { name: String },

    /// Operation attempted after the player was closed.
    #[error("player is closed")]
    Closed,

    /// A reply line that does not follow the `name=value` shape.
    #[error("malformed reply line: {line:?}")]
    MalformedReply { line: String },

    /// A reply value that does not parse as the property's type.
    #[error("{name}: reply {raw:?} does not parse as {expected}")]
    BadReply {
        name: String,
        raw: String,
        expected: ValueType,
    },

    /// The player's output stream ended while a reply was pending.
    #[error("player disconnected")]
    Disconnected,
}

pub type Result<T> = std::result::Result<T, PlayerError>;
