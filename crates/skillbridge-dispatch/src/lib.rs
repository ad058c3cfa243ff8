//! `skillbridge-dispatch` – the dispatch loop
//!
//! The core of SkillBridge: a single-threaded polling bridge that watches
//! the parameter channel for a pending command, routes it to the matching
//! skill gateway call, and republishes the outcome so a remote planner can
//! observe completion.
//!
//! # Modules
//!
//! - [`dispatcher`] – [`Dispatcher`][dispatcher::Dispatcher]:
//!   the poll–decode–execute–publish state machine ([`tick`][dispatcher::Dispatcher::tick]
//!   runs exactly one iteration; [`run`][dispatcher::Dispatcher::run] polls
//!   until a shutdown flag is raised), including the waypoint sequencing
//!   path for `nav`.
//! - [`reporter`] – [`ResultReporter`][reporter::ResultReporter]:
//!   owns the result key; brackets each execution window with the cleared
//!   sentinel and enforces the clear-command-then-publish write order.
//! - [`telemetry`] – [`init_tracing`][telemetry::init_tracing]:
//!   initialises the global `tracing` subscriber with an optional OTLP span
//!   exporter.  Set `OTEL_EXPORTER_OTLP_ENDPOINT` to enable live trace
//!   export to an OTLP-compatible collector.
//!
//! # At-most-one-in-flight
//!
//! There is no lock anywhere: the loop is the sole consumer of the command
//! key and the sole writer of the result key, and it executes skills
//! synchronously within a tick, so at most one invocation is ever in flight
//! by construction.

pub mod dispatcher;
pub mod reporter;
pub mod telemetry;

pub use dispatcher::{Dispatcher, TickOutcome};
pub use reporter::ResultReporter;
pub use telemetry::{TracerProviderGuard, init_tracing};
