use std::fmt::Write as _;

use mplb_channel::LineIo;
use mplb_schema::{CommandDescriptor, Value};

use crate::error::{PlayerError, Result};

/// Raw reply value meaning the property does not currently apply.
const PROPERTY_UNAVAILABLE: &str = "PROPERTY_UNAVAILABLE";

/// Pausing modifier prefixed to every command line.
///
/// Defined entirely by the slave protocol: it controls whether issuing the
/// command pauses or resumes playback. `Keep` is the protocol's conventional
/// default; `None` sends the bare command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Pausing {
    None,
    #[default]
    Keep,
    Pause,
    Toggle,
    KeepForce,
}

impl Pausing {
    pub fn token(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Keep => Some("pausing_keep"),
            Self::Pause => Some("pausing"),
            Self::Toggle => Some("pausing_toggle"),
            Self::KeepForce => Some("pausing_keep_force"),
        }
    }
}

/// Validate, serialize, and send one command; read the paired reply when the
/// protocol defines one.
///
/// Validation order: too few arguments, too many arguments, then exact
/// per-index type match — the protocol's type semantics are exact, so there
/// is deliberately no numeric coercion.
///
/// Only commands named `get_*` produce a reply line (`name=value`); the
/// sentinel `PROPERTY_UNAVAILABLE` maps to `None`. Everything else is
/// fire-and-forget — the protocol has no acknowledgment for those.
pub fn dispatch(
    desc: &CommandDescriptor,
    io: &mut dyn LineIo,
    args: &[Value],
    pausing: Pausing,
) -> Result<Option<String>> {
    if args.len() < desc.required() {
        return Err(PlayerError::TooFewArgs {
            name: desc.name().to_string(),
            required: desc.required(),
            given: args.len(),
        });
    }
    if args.len() > desc.arg_types().len() {
        return Err(PlayerError::TooManyArgs {
            name: desc.name().to_string(),
            max: desc.arg_types().len(),
            given: args.len(),
        });
    }
    for (index, (arg, &expected)) in args.iter().zip(desc.arg_types()).enumerate() {
        if arg.value_type() != expected {
            return Err(PlayerError::ArgType {
                name: desc.name().to_string(),
                index,
                expected,
                actual: arg.value_type(),
            });
        }
    }

    let mut line = String::new();
    if let Some(token) = pausing.token() {
        line.push_str(token);
        line.push(' ');
    }
    line.push_str(desc.name());
    for arg in args {
        // Infallible: writing into a String.
        let _ = write!(line, " {arg}");
    }

    tracing::trace!(command = desc.name(), %line, "dispatch");
    io.write_line(&line)?;

    if !desc.name().starts_with("get_") {
        return Ok(None);
    }

    let reply = io.read_line()?.ok_or(PlayerError::Disconnected)?;
    let (_, value) = reply
        .split_once('=')
        .ok_or_else(|| PlayerError::MalformedReply {
            line: reply.clone(),
        })?;
    let value = value.trim_end();
    if value == PROPERTY_UNAVAILABLE {
        return Ok(None);
    }
    Ok(Some(value.to_string()))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use mplb_channel::LineStream;
    use mplb_schema::ValueType;

    use super::*;

    fn stream(replies: &str) -> LineStream<Cursor<Vec<u8>>, Vec<u8>> {
        LineStream::new(Cursor::new(replies.as_bytes().to_vec()), Vec::new())
    }

    fn seek() -> CommandDescriptor {
        CommandDescriptor::new("seek", vec![ValueType::Float, ValueType::Int], 1)
    }

    #[test]
    fn too_few_arguments() {
        let mut io = stream("");
        let err = dispatch(&seek(), &mut io, &[], Pausing::default()).unwrap_err();
        assert!(matches!(
            err,
            PlayerError::TooFewArgs { required: 1, given: 0, .. }
        ));
    }

    #[test]
    fn too_many_arguments() {
        let mut io = stream("");
        let args = [Value::Float(1.0), Value::Int(0), Value::Int(0)];
        let err = dispatch(&seek(), &mut io, &args, Pausing::default()).unwrap_err();
        assert!(matches!(
            err,
            PlayerError::TooManyArgs { max: 2, given: 3, .. }
        ));
    }

    #[test]
    fn exact_type_match_no_numeric_coercion() {
        let mut io = stream("");
        let err = dispatch(&seek(), &mut io, &[Value::Int(10)], Pausing::default()).unwrap_err();
        assert!(matches!(
            err,
            PlayerError::ArgType {
                index: 0,
                expected: ValueType::Float,
                actual: ValueType::Int,
                ..
            }
        ));
    }

    #[test]
    fn serializes_with_pausing_prefix() {
        let mut io = stream("");
        dispatch(&seek(), &mut io, &[Value::Float(12.5), Value::Int(2)], Pausing::default())
            .unwrap();
        let (_, written) = io.into_inner();
        assert_eq!(written, b"pausing_keep seek 12.5 2\n");
    }

    #[test]
    fn empty_pausing_sends_bare_command() {
        let mut io = stream("");
        let quit = CommandDescriptor::new("quit", vec![], 0);
        dispatch(&quit, &mut io, &[], Pausing::None).unwrap();
        let (_, written) = io.into_inner();
        assert_eq!(written, b"quit\n");
    }

    #[test]
    fn pausing_variants_render_protocol_tokens() {
        assert_eq!(Pausing::Pause.token(), Some("pausing"));
        assert_eq!(Pausing::Toggle.token(), Some("pausing_toggle"));
        assert_eq!(Pausing::KeepForce.token(), Some("pausing_keep_force"));
        assert_eq!(Pausing::None.token(), None);
    }

    #[test]
    fn get_command_reads_one_reply() {
        let get_property = CommandDescriptor::new("get_property", vec![ValueType::Str], 1);
        let mut io = stream("ANS_loop=-1\n");
        let reply = dispatch(
            &get_property,
            &mut io,
            &[Value::Str("loop".into())],
            Pausing::default(),
        )
        .unwrap();
        assert_eq!(reply.as_deref(), Some("-1"));

        let (_, written) = io.into_inner();
        assert_eq!(written, b"pausing_keep get_property loop\n");
    }

    #[test]
    fn reply_value_keeps_inner_equals_signs() {
        let get_property = CommandDescriptor::new("get_property", vec![ValueType::Str], 1);
        let mut io = stream("ANS_path=a=b\n");
        let reply = dispatch(
            &get_property,
            &mut io,
            &[Value::Str("path".into())],
            Pausing::default(),
        )
        .unwrap();
        assert_eq!(reply.as_deref(), Some("a=b"));
    }

    #[test]
    fn unavailable_sentinel_is_absent() {
        let get_property = CommandDescriptor::new("get_property", vec![ValueType::Str], 1);
        let mut io = stream("ANS_filename=PROPERTY_UNAVAILABLE\n");
        let reply = dispatch(
            &get_property,
            &mut io,
            &[Value::Str("filename".into())],
            Pausing::default(),
        )
        .unwrap();
        assert_eq!(reply, None);
    }

    #[test]
    fn non_get_commands_do_not_read() {
        // A reply is queued, but a non-get_ command must not consume it.
        let mut io = stream("ANS_loop=5\n");
        let reply = dispatch(&seek(), &mut io, &[Value::Float(0.0)], Pausing::default()).unwrap();
        assert_eq!(reply, None);
        assert_eq!(io.read_line().unwrap().as_deref(), Some("ANS_loop=5"));
    }

    #[test]
    fn reply_without_separator_is_malformed() {
        let get_property = CommandDescriptor::new("get_property", vec![ValueType::Str], 1);
        let mut io = stream("garbage\n");
        let err = dispatch(
            &get_property,
            &mut io,
            &[Value::Str("loop".into())],
            Pausing::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PlayerError::MalformedReply { .. }));
    }

    #[test]
    fn eof_while_reply_pending_is_disconnect() {
        let get_property = CommandDescriptor::new("get_property", vec![ValueType::Str], 1);
        let mut io = stream("");
        let err = dispatch(
            &get_property,
            &mut io,
            &[Value::Str("loop".into())],
            Pausing::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PlayerError::Disconnected));
    }

    #[test]
    fn optional_argument_may_be_omitted() {
        let mut io = stream("");
        dispatch(&seek(), &mut io, &[Value::Float(30.0)], Pausing::default()).unwrap();
        let (_, written) = io.into_inner();
        assert_eq!(written, b"pausing_keep seek 30\n");
    }
}
