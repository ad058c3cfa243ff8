//! `skillbridge-channel` – the shared parameter channel
//!
//! The dispatcher never talks to a concrete transport.  It reads and writes
//! string-valued keys through the [`ParamChannel`] trait; backends translate
//! those operations into whatever actually carries the data (a ROS parameter
//! server, a test map, …).
//!
//! # Modules
//!
//! - [`channel`] – [`ParamChannel`]: the async get/set seam, plus
//!   [`InMemoryChannel`], a cheap-clone in-process backend used by tests and
//!   the demo shell.
//! - [`keys`] – the well-known channel key names and their ownership rules.
//! - [`planner`] – [`PlannerClient`]: the typed planner-side counterpart of
//!   the protocol (sends commands, stages waypoint lists, reads results).

pub mod channel;
pub mod keys;
pub mod planner;

pub use channel::{InMemoryChannel, ParamChannel};
pub use planner::PlannerClient;
