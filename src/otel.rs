//! OpenTelemetry hook adapter.
//!
//! Spans are started through the OpenTelemetry tracing API as children of
//! whatever span is active in the incoming `Context`. When that ambient
//! span is not recording (tracing disabled or unsampled), span creation is
//! skipped entirely and the context is returned unchanged.

use opentelemetry::global::{self, BoxedTracer};
use opentelemetry::trace::{Span, SpanRef, Status, TraceContextExt, Tracer};
use opentelemetry::{Context, KeyValue};
use opentelemetry_semantic_conventions as semconv;

use crate::command::{Cmder, CommandError};
use crate::hook::Hook;
use crate::render;

const TRACER_NAME: &str = "redis-tracing-hooks";

/// A [`Hook`] that records command and pipeline spans via OpenTelemetry.
///
/// The default constructor obtains a tracer from the globally installed
/// provider; [`OpenTelemetryHook::with_tracer`] accepts any tracer, which is
/// how applications wire in a specific provider (and how tests use the SDK's
/// in-memory exporter).
///
/// # Span attributes
///
/// - `db.system.name`: always `"redis"`
/// - `redis.cmd`: the rendered command (single-command spans)
/// - `redis.cmds`: the rendered multi-line pipeline dump (pipeline spans)
/// - `redis.num_cmd`: number of commands in the pipeline (pipeline spans)
///
/// A non-nil terminal error is recorded through the API's native
/// error-recording facility and sets the span status to error. The nil
/// sentinel (`CommandError::Nil`) means normal absence and is not recorded.
pub struct OpenTelemetryHook<T = BoxedTracer> {
    tracer: T,
}

impl OpenTelemetryHook<BoxedTracer> {
    /// Creates a hook backed by the global tracer provider.
    pub fn new() -> Self {
        Self {
            tracer: global::tracer(TRACER_NAME),
        }
    }
}

impl Default for OpenTelemetryHook<BoxedTracer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> OpenTelemetryHook<T>
where
    T: Tracer,
    T::Span: Send + Sync + 'static,
{
    /// Creates a hook backed by the given tracer.
    pub fn with_tracer(tracer: T) -> Self {
        Self { tracer }
    }
}

impl<T> Hook for OpenTelemetryHook<T>
where
    T: Tracer,
    T::Span: Send + Sync + 'static,
{
    type Context = Context;

    fn before_process<C: Cmder>(&self, cx: Context, cmd: &C) -> Context {
        if !cx.span().is_recording() {
            return cx;
        }

        let mut span = self.tracer.start_with_context(cmd.name().to_owned(), &cx);
        span.set_attribute(KeyValue::new(semconv::attribute::DB_SYSTEM_NAME, "redis"));
        span.set_attribute(KeyValue::new("redis.cmd", render::command_string(cmd)));

        cx.with_span(span)
    }

    fn after_process<C: Cmder>(&self, cx: Context, cmd: &C) {
        let span = cx.span();
        if let Some(err) = cmd.err() {
            record_error(&span, err);
        }
        span.end();
    }

    fn before_process_pipeline<C: Cmder>(&self, cx: Context, cmds: &[C]) -> Context {
        if !cx.span().is_recording() {
            return cx;
        }

        let (summary, rendered) = render::commands_string(cmds);
        let mut span = self
            .tracer
            .start_with_context(format!("pipeline {summary}"), &cx);
        span.set_attribute(KeyValue::new(semconv::attribute::DB_SYSTEM_NAME, "redis"));
        span.set_attribute(KeyValue::new("redis.num_cmd", cmds.len() as i64));
        span.set_attribute(KeyValue::new("redis.cmds", rendered));

        cx.with_span(span)
    }

    fn after_process_pipeline<C: Cmder>(&self, cx: Context, cmds: &[C]) {
        let span = cx.span();
        // A pipeline reports the first command's error; an empty pipeline
        // has nothing to report but the span still ends.
        if let Some(err) = cmds.first().and_then(|cmd| cmd.err()) {
            record_error(&span, err);
        }
        span.end();
    }
}

fn record_error(span: &SpanRef<'_>, err: &CommandError) {
    if err.is_nil() {
        return;
    }
    span.record_error(err);
    span.set_status(Status::error(err.to_string()));
}
