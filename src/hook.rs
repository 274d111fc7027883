//! The four-callback hook contract invoked by the host Redis client.

use crate::command::Cmder;

/// Lifecycle hooks around command and pipeline execution.
///
/// The host client calls `before_process` immediately before executing a
/// command and `after_process` once it has finished; the pipeline variants
/// wrap a batch executed together. Whatever `before_process` returns is
/// handed back to the matching `after_process`, so `Context` carries the
/// backend's span state across the pair (an OpenTelemetry `Context`, a
/// `tracing::Span`, ...).
///
/// No method returns a `Result`: tracing is best-effort and must never break
/// command execution. Implementations swallow backend faults; the worst
/// outcome of an internal failure is a missing or garbled span attribute.
///
/// After always follows before for the same command, on the same thread that
/// executes it. Implementations hold no mutable state, so a single hook
/// value can serve any number of concurrent executions.
pub trait Hook {
    /// Span-state carrier threaded from a before callback to its after
    /// callback.
    type Context;

    /// Called before a single command executes. Typically opens a span as a
    /// child of whatever span is active in `cx`.
    fn before_process<C: Cmder>(&self, cx: Self::Context, cmd: &C) -> Self::Context;

    /// Called after a single command finishes. Records the command's
    /// terminal error, if any, and closes the span.
    fn after_process<C: Cmder>(&self, cx: Self::Context, cmd: &C);

    /// Called before a pipelined batch executes.
    fn before_process_pipeline<C: Cmder>(&self, cx: Self::Context, cmds: &[C]) -> Self::Context;

    /// Called after a pipelined batch finishes.
    fn after_process_pipeline<C: Cmder>(&self, cx: Self::Context, cmds: &[C]);
}
