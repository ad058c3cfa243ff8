//! [`Dispatcher`] – the poll–decode–execute–publish state machine.
//!
//! Each [`tick`][Dispatcher::tick] performs exactly one iteration:
//!
//! 1. **Decode** – read the pending-command key; an idle sentinel, an
//!    unknown skill name, or an unsplittable record means an idle poll and
//!    the tick returns with no side effects.
//! 2. **Bracket** – write the cleared sentinel into the result key *before*
//!    invoking the skill, so an observer never reads a stale result while
//!    the new command runs.
//! 3. **Route** – exhaustive `match` over [`SkillKind`]; `nav` takes the
//!    waypoint-sequencing path, `findagentaction` reads the `human_state`
//!    key, everything else is a direct gateway call.
//! 4. **Invoke** – the gateway call blocks for the skill's full duration;
//!    an in-band failure is a normal outcome, an `Err` is fatal.
//! 5. **Publish** – clear the command key, then write the result (in that
//!    order; see [`ResultReporter`]).
//! 6. **Nav cleanup** – after any `nav`, reset the waypoint-list key to its
//!    idle sentinel regardless of success, so a stale list is never reused
//!    by a later plain `nav`.
//!
//! [`run`][Dispatcher::run] wraps `tick` in the startup contract (both
//! protocol keys reset to idle before the first poll) and a polling loop
//! that exits on a shutdown flag or the first fatal error.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use skillbridge_channel::{ParamChannel, keys};
use skillbridge_gateway::{PlaceRequest, SkillGateway};
use skillbridge_types::{
    BridgeError, Command, SkillKind, SkillOutcome, Waypoint, decode_waypoint_list, wire,
};
use tracing::{error, info};

use crate::reporter::ResultReporter;

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No pending command; nothing was written.
    Idle,
    /// A command was consumed and its result published.
    Completed { kind: SkillKind, succeeded: bool },
}

/// The dispatch loop.
///
/// Owns a channel handle, a gateway handle, and the [`ResultReporter`] that
/// guards the result key.  Generic over both seams so tests and the demo
/// shell run the identical state machine against in-memory backends.
pub struct Dispatcher<C: ParamChannel + Clone, G: SkillGateway> {
    channel: C,
    gateway: G,
    reporter: ResultReporter<C>,
}

impl<C: ParamChannel + Clone, G: SkillGateway> Dispatcher<C, G> {
    pub fn new(channel: C, gateway: G) -> Self {
        let reporter = ResultReporter::new(channel.clone());
        Self {
            channel,
            gateway,
            reporter,
        }
    }

    /// Startup contract: reset both protocol keys to their idle sentinels so
    /// the loop begins from a known state regardless of prior process
    /// history.
    pub async fn reset_channel_state(&self) -> Result<(), BridgeError> {
        self.channel
            .set(keys::SKILL_NAME_INPUT, wire::COMMAND_IDLE)
            .await?;
        self.reporter.reset().await
    }

    /// Execute one poll–decode–execute–publish iteration.
    ///
    /// # Errors
    ///
    /// Any `Err` is fatal to the loop: a channel transport failure, a
    /// corrupt waypoint list, or a gateway fault the skill could not turn
    /// into an in-band outcome.  Skill *failures* are not errors; they
    /// surface as `Completed { succeeded: false }`.
    pub async fn tick(&self) -> Result<TickOutcome, BridgeError> {
        let raw = self
            .channel
            .get(keys::SKILL_NAME_INPUT, wire::COMMAND_IDLE)
            .await?;
        let Some(command) = Command::decode(&raw) else {
            return Ok(TickOutcome::Idle);
        };

        info!(skill = %command.kind, input = %command.input, "executing skill");
        self.reporter.reset().await?;

        let outcome = match command.kind {
            SkillKind::Nav => self.run_nav(&command.input).await?,
            SkillKind::Pick => self.gateway.pick(&command.input).await?,
            SkillKind::Place => self.gateway.place(PlaceRequest::semantic()).await?,
            SkillKind::OpenDrawer => self.gateway.open_drawer().await?,
            SkillKind::CloseDrawer => self.gateway.close_drawer().await?,
            SkillKind::FindAgentAction => {
                let state = self
                    .channel
                    .get(keys::HUMAN_STATE, keys::HUMAN_STATE_DEFAULT)
                    .await?;
                SkillOutcome::success(state)
            }
        };

        self.reporter.publish(command.kind, &outcome).await?;

        if command.kind == SkillKind::Nav {
            // A stale list must never leak into a later plain nav command.
            self.channel
                .set(keys::NAV_TARGET_XYZ, wire::WAYPOINTS_IDLE)
                .await?;
        }

        Ok(TickOutcome::Completed {
            kind: command.kind,
            succeeded: outcome.succeeded,
        })
    }

    /// Poll until `shutdown` is raised.
    ///
    /// Sleeps `poll_interval` after an idle tick; a completed command is
    /// followed immediately by the next poll.  The first fatal tick error
    /// stops the loop and is returned to the caller — restarting is the
    /// supervisor's job, not ours.
    pub async fn run(
        &self,
        shutdown: Arc<AtomicBool>,
        poll_interval: Duration,
    ) -> Result<(), BridgeError> {
        self.reset_channel_state().await?;
        info!("dispatcher running");
        while !shutdown.load(Ordering::SeqCst) {
            match self.tick().await {
                Ok(TickOutcome::Idle) => tokio::time::sleep(poll_interval).await,
                Ok(TickOutcome::Completed { kind, succeeded }) => {
                    info!(skill = %kind, succeeded, "skill dispatch completed");
                }
                Err(e) => {
                    error!(error = %e, "fatal dispatch error; stopping loop");
                    return Err(e);
                }
            }
        }
        info!("dispatcher stopped");
        Ok(())
    }

    /// `nav`: waypoint sequence when one is staged, single named target
    /// otherwise.
    async fn run_nav(&self, input: &str) -> Result<SkillOutcome, BridgeError> {
        let raw = self
            .channel
            .get(keys::NAV_TARGET_XYZ, wire::WAYPOINTS_IDLE)
            .await?;
        match decode_waypoint_list(&raw)? {
            Some(waypoints) => self.run_waypoints(&waypoints).await,
            None => self.gateway.navigate_named(input).await,
        }
    }

    /// Execute an ordered waypoint sequence, stopping at the first failure.
    ///
    /// The reported outcome is that of the failing (or, if all succeed, the
    /// last) invocation; intermediate successes are not individually
    /// reported.
    async fn run_waypoints(&self, waypoints: &[Waypoint]) -> Result<SkillOutcome, BridgeError> {
        let total = waypoints.len();
        // decode_waypoint_list never yields an empty list, so the loop body
        // runs at least once and `outcome` is always overwritten.
        let mut outcome = SkillOutcome::failure("empty waypoint list");
        for (i, waypoint) in waypoints.iter().enumerate() {
            let (x, y) = waypoint.planar_target();
            info!(x, y, step = i + 1, total, "navigating to waypoint");
            outcome = self.gateway.navigate(x, y).await?;
            if !outcome.succeeded {
                break;
            }
        }
        Ok(outcome)
    }
}
