//! `skillbridge-gateway` – the skill invocation seam
//!
//! The dispatcher never implements a skill itself.  It calls one of the
//! [`SkillGateway`] methods and gets back a
//! [`SkillOutcome`][skillbridge_types::SkillOutcome]; the gateway hides
//! whatever actually moves the robot.
//!
//! # Modules
//!
//! - [`gateway`] – [`SkillGateway`]: the trait every skill backend must
//!   implement, plus [`PlaceRequest`], the structured form of the place
//!   skill's argument tuple.
//! - [`sim`] – [`SimGateway`]: a recording stub backend for headless tests
//!   and the demo shell, with scripted failures.

pub mod gateway;
pub mod sim;

pub use gateway::{PlaceRequest, SkillGateway};
pub use sim::{GatewayCall, SimGateway};
