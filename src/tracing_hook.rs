//! Hook adapter for the `tracing` ecosystem.
//!
//! Command spans are emitted as `tracing` spans, so they flow into whatever
//! subscriber the application has installed (fmt layers,
//! `tracing-opentelemetry`, ...). Unlike the OpenTelemetry adapter there is
//! no recording gate: spans are opened unconditionally and a disabled
//! subscriber simply discards them. Pipeline tracing is not supported by
//! this backend; both pipeline callbacks are no-ops.

use tracing::field::Empty;
use tracing::Span;

use crate::command::Cmder;
use crate::hook::Hook;
use crate::render;

/// A [`Hook`] that records command spans through the `tracing` crate.
///
/// Each command opens an `info`-level span named `redis_command` as a child
/// of the span passed in, with `otel.name` carrying the command name so
/// OpenTelemetry bridge layers pick it up. A non-nil terminal error records
/// a boolean `error` field on the span and emits an error-level annotation
/// event with the error's message. The span closes when its last handle is
/// dropped, which the after callback guarantees for the handle it owns.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingHook;

impl Hook for TracingHook {
    type Context = Span;

    fn before_process<C: Cmder>(&self, cx: Span, cmd: &C) -> Span {
        let rendered = render::command_string(cmd);
        tracing::info_span!(
            parent: &cx,
            "redis_command",
            otel.name = %cmd.name(),
            db.system = "redis",
            redis.cmd = %rendered,
            error = Empty,
        )
    }

    fn after_process<C: Cmder>(&self, cx: Span, cmd: &C) {
        if let Some(err) = cmd.err() {
            if !err.is_nil() {
                cx.record("error", true);
                tracing::error!(parent: &cx, error.kind = "redis error", "{err}");
            }
        }
        // Dropping the handle closes the span.
    }

    fn before_process_pipeline<C: Cmder>(&self, cx: Span, _cmds: &[C]) -> Span {
        cx
    }

    fn after_process_pipeline<C: Cmder>(&self, _cx: Span, _cmds: &[C]) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Command, CommandError};
    use tracing_test::traced_test;

    #[traced_test]
    #[test]
    fn emits_annotation_for_command_error() {
        let hook = TracingHook;
        let cmd = Command::new("GET")
            .arg("GET")
            .arg("key1")
            .with_error(CommandError::Other("connection reset".into()));

        let span = hook.before_process(Span::current(), &cmd);
        hook.after_process(span, &cmd);

        assert!(logs_contain("connection reset"));
        assert!(logs_contain("redis error"));
    }

    #[traced_test]
    #[test]
    fn nil_sentinel_emits_no_annotation() {
        let hook = TracingHook;
        let cmd = Command::new("GET")
            .arg("GET")
            .arg("missing")
            .with_error(CommandError::Nil);

        let span = hook.before_process(Span::current(), &cmd);
        hook.after_process(span, &cmd);

        assert!(!logs_contain("redis error"));
    }

    #[traced_test]
    #[test]
    fn success_emits_no_annotation() {
        let hook = TracingHook;
        let cmd = Command::new("SET").arg("SET").arg("key1").arg("value1");

        let span = hook.before_process(Span::current(), &cmd);
        assert!(!span.is_disabled());
        hook.after_process(span, &cmd);

        assert!(!logs_contain("redis error"));
    }

    #[traced_test]
    #[test]
    fn pipeline_callbacks_are_noops() {
        let hook = TracingHook;
        let cmds = vec![
            Command::new("GET").arg("GET").arg("a"),
            Command::new("SET").arg("SET").arg("b").arg(1),
        ];

        let cx = hook.before_process_pipeline(Span::current(), &cmds);
        hook.after_process_pipeline(cx, &cmds);

        assert!(!logs_contain("redis_command"));
    }
}
