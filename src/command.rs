//! Command data model shared by the renderer and the hook adapters.
//!
//! A command is an ordered list of [`Arg`] values, a display name used for
//! span naming and pipeline summaries, and an optional terminal error. The
//! [`Cmder`] trait is the contract hooks consume; [`Command`] is a concrete
//! implementation for callers that do not carry their own command type.

use std::fmt;

use chrono::{DateTime, Utc};

/// A single command argument.
///
/// This is a closed set of the scalar kinds a Redis command argument can
/// take. Rendering an `Arg` never fails: every variant has a textual form,
/// and the [`Arg::Other`] fallback routes through [`fmt::Display`], so
/// exotic caller-defined values still produce a best-effort string.
///
/// `From` conversions are provided for the common primitive types, so
/// commands can be assembled without naming variants:
///
/// ```rust,ignore
/// use redis_tracing_hooks::Command;
///
/// let cmd = Command::new("SET").arg("SET").arg("key1").arg(42).arg(true);
/// ```
pub enum Arg {
    /// Absent value, rendered as `<nil>`.
    Nil,
    /// Text, truncated to 64 bytes before rendering.
    Str(String),
    /// Raw bytes, truncated to 64 bytes before rendering. Values containing
    /// anything outside the simple character class are hex-encoded.
    Bytes(Vec<u8>),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Bool(bool),
    /// Timestamp, rendered as RFC 3339 with nanosecond precision.
    Time(DateTime<Utc>),
    /// Fallback for arbitrary values; rendered via their `Display` output.
    Other(Box<dyn fmt::Display + Send + Sync>),
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Nil => f.write_str("Nil"),
            Arg::Str(v) => f.debug_tuple("Str").field(v).finish(),
            Arg::Bytes(v) => f.debug_tuple("Bytes").field(v).finish(),
            Arg::I8(v) => f.debug_tuple("I8").field(v).finish(),
            Arg::I16(v) => f.debug_tuple("I16").field(v).finish(),
            Arg::I32(v) => f.debug_tuple("I32").field(v).finish(),
            Arg::I64(v) => f.debug_tuple("I64").field(v).finish(),
            Arg::U8(v) => f.debug_tuple("U8").field(v).finish(),
            Arg::U16(v) => f.debug_tuple("U16").field(v).finish(),
            Arg::U32(v) => f.debug_tuple("U32").field(v).finish(),
            Arg::U64(v) => f.debug_tuple("U64").field(v).finish(),
            Arg::F32(v) => f.debug_tuple("F32").field(v).finish(),
            Arg::F64(v) => f.debug_tuple("F64").field(v).finish(),
            Arg::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Arg::Time(v) => f.debug_tuple("Time").field(v).finish(),
            Arg::Other(v) => write!(f, "Other({v})"),
        }
    }
}

macro_rules! arg_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(impl From<$ty> for Arg {
            fn from(value: $ty) -> Self {
                Arg::$variant(value)
            }
        })*
    };
}

arg_from! {
    String => Str,
    Vec<u8> => Bytes,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    bool => Bool,
    DateTime<Utc> => Time,
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Str(value.to_owned())
    }
}

impl From<&[u8]> for Arg {
    fn from(value: &[u8]) -> Self {
        Arg::Bytes(value.to_vec())
    }
}

/// Terminal error of a command.
///
/// [`CommandError::Nil`] is the backend's "no such key" sentinel. It
/// represents normal absence rather than failure, so the hook adapters
/// render it into the command text but never record it as a span error.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The key or member was not found. Normal absence, not a failure.
    #[error("redis: nil")]
    Nil,
    /// An error surfaced by the redis client.
    #[error(transparent)]
    Redis(#[from] redis::RedisError),
    /// Arbitrary terminal error text from the host client.
    #[error("{0}")]
    Other(String),
}

impl CommandError {
    /// Returns `true` for the "no such key" sentinel.
    pub fn is_nil(&self) -> bool {
        matches!(self, CommandError::Nil)
    }
}

/// The command contract consumed by hooks and the renderer.
///
/// Any command object must expose an ordered argument list, a display name
/// (used for span naming and pipeline summaries), and its terminal error.
pub trait Cmder {
    /// Display/grouping name of the command, e.g. `GET`.
    fn name(&self) -> &str;

    /// Ordered argument list, including the command word itself.
    fn args(&self) -> &[Arg];

    /// Terminal error of the command, if it has finished with one.
    fn err(&self) -> Option<&CommandError>;
}

/// A concrete command for callers without their own [`Cmder`] type.
///
/// Built up in builder style:
///
/// ```rust,ignore
/// use redis_tracing_hooks::{Command, CommandError};
///
/// let cmd = Command::new("GET")
///     .arg("GET")
///     .arg("missing")
///     .with_error(CommandError::Nil);
/// ```
#[derive(Debug, Default)]
pub struct Command {
    name: String,
    args: Vec<Arg>,
    err: Option<CommandError>,
}

impl Command {
    /// Creates an empty command with the given display name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            err: None,
        }
    }

    /// Appends an argument.
    pub fn arg(mut self, arg: impl Into<Arg>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Sets the terminal error, consuming the command.
    pub fn with_error(mut self, err: CommandError) -> Self {
        self.err = Some(err);
        self
    }

    /// Sets the terminal error in place, e.g. after execution.
    pub fn set_error(&mut self, err: CommandError) {
        self.err = Some(err);
    }

    /// Converts a `redis::Cmd` into a [`Command`].
    ///
    /// The display name is derived from the first argument, uppercased for
    /// consistency. Cursor placeholders belong to the SCAN family and map to
    /// `SCAN`; a command name that is not valid UTF-8 leaves the name empty
    /// and logs a warning.
    pub fn from_redis_cmd(cmd: &redis::Cmd) -> Self {
        let mut name = String::new();
        let mut args = Vec::new();

        for arg in cmd.args_iter() {
            match arg {
                redis::Arg::Simple(bytes) => {
                    if args.is_empty() {
                        match std::str::from_utf8(bytes) {
                            Ok(cmd_name) => name = cmd_name.to_uppercase(),
                            Err(_) => {
                                tracing::warn!("failed to parse Redis command name as UTF-8");
                            }
                        }
                    }
                    args.push(Arg::Bytes(bytes.to_vec()));
                }
                redis::Arg::Cursor => {
                    if args.is_empty() {
                        name = "SCAN".to_owned();
                    }
                    // The cursor placeholder is sent as 0 on the wire.
                    args.push(Arg::U64(0));
                }
            }
        }

        Self {
            name,
            args,
            err: None,
        }
    }
}

impl Cmder for Command {
    fn name(&self) -> &str {
        &self.name
    }

    fn args(&self) -> &[Arg] {
        &self.args
    }

    fn err(&self) -> Option<&CommandError> {
        self.err.as_ref()
    }
}
