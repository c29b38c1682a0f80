/// Errors that can occur during vocabulary discovery.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The discovery pass could not be launched or read.
    #[error("channel error: {0}")]
    Channel(#[from] mplb_channel::ChannelError),

    /// A recognized command line has broken bracket syntax.
    #[error("malformed command listing line: {line:?}")]
    MalformedCommand { line: String },

    /// A recognized property line carries a bound that does not parse as the
    /// property's own type.
    #[error("property {name}: bound {value:?} does not parse as {expected}")]
    InvalidBound {
        name: String,
        value: String,
        expected: crate::types::ValueType,
    },

    /// A recognized property line declares a minimum above its maximum. A
    /// descriptor like that would reject every value.
    #[error("property {name}: minimum {min} exceeds maximum {max}")]
    InvertedBounds {
        name: String,
        min: String,
        max: String,
    },
}

pub type Result<T> = std::result::Result<T, SchemaError>;
