//! Tracing hooks for Redis clients
//!
//! This crate provides lifecycle hooks that instrument Redis command and
//! pipeline execution with tracing spans. A host client invokes the hooks
//! before and after each command (or pipelined batch); the hooks start and
//! end spans and attach a compact, size-bounded rendering of the command as
//! span attributes.
//!
//! Two backend adapters implement the same [`Hook`] contract:
//!
//! - [`otel::OpenTelemetryHook`] records spans through the OpenTelemetry
//!   tracing API, skipping span creation when the ambient span is not
//!   recording.
//! - [`tracing_hook::TracingHook`] records spans through the `tracing`
//!   crate, for applications that route telemetry through a subscriber
//!   stack.
//!
//! The command renderer behind both adapters is deterministic and bounded
//! regardless of input: 64 bytes per text/binary argument, 33 arguments per
//! command, 101 commands per pipeline dump and 10 distinct names per
//! pipeline summary. Arguments containing bytes outside a small safe
//! character class are hex-encoded in full, so attribute values never carry
//! control characters or broken multi-byte sequences.
//!
//! # Features
//!
//! - `otel` (default): the OpenTelemetry hook adapter
//!
//! # Examples
//!
//! ```rust,ignore
//! use redis_tracing_hooks::prelude::*;
//!
//! let hook = OpenTelemetryHook::new();
//!
//! let cmd = Command::new("SET").arg("SET").arg("key1").arg("value1");
//! let cx = hook.before_process(opentelemetry::Context::current(), &cmd);
//! // ... execute the command against Redis ...
//! hook.after_process(cx, &cmd);
//! ```
//!
//! Commands coming from redis-rs convert directly:
//!
//! ```rust,ignore
//! let mut cmd = redis::Cmd::new();
//! cmd.arg("HSET").arg("hash1").arg("field1").arg("value1");
//! let cmd = Command::from_redis_cmd(&cmd);
//! ```
//!
//! # Span attributes
//!
//! - `db.system` / `db.system.name`: always `"redis"`
//! - `redis.cmd`: rendered command text (single-command spans)
//! - `redis.cmds`: rendered multi-line dump (pipeline spans)
//! - `redis.num_cmd`: pipeline command count
//! - `error`: set when a command fails with a non-nil error
//!
//! Errors never propagate out of a hook: tracing is best-effort and must
//! not break command execution. The backend's "no such key" sentinel
//! ([`CommandError::Nil`]) is rendered into the command text but is never
//! recorded as a span error, since it represents normal absence.

pub mod command;
pub mod hook;
pub mod render;

#[cfg(feature = "otel")]
pub mod otel;

pub mod tracing_hook;

pub use command::{Arg, Cmder, Command, CommandError};
pub use hook::Hook;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::command::{Arg, Cmder, Command, CommandError};
    pub use crate::hook::Hook;
    pub use crate::tracing_hook::TracingHook;

    #[cfg(feature = "otel")]
    pub use crate::otel::OpenTelemetryHook;
}
