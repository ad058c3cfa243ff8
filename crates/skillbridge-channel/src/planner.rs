//! [`PlannerClient`] – the planner-side half of the protocol.
//!
//! The dispatcher owns the command-*clear* and result writes; the planner
//! owns the command-*set* and waypoint writes.  This client enforces that
//! single-writer split by only exposing the planner-owned operations, plus
//! non-destructive reads of the dispatcher-owned keys.

use skillbridge_types::{Command, SkillResult, Waypoint, encode_waypoint_list, wire, BridgeError};

use crate::channel::ParamChannel;
use crate::keys;

/// Typed planner handle over any [`ParamChannel`].
///
/// Used by the demo shell and by tests; a real high-level planner process
/// would speak the same five operations.
#[derive(Clone, Debug)]
pub struct PlannerClient<C: ParamChannel> {
    channel: C,
}

impl<C: ParamChannel> PlannerClient<C> {
    pub fn new(channel: C) -> Self {
        Self { channel }
    }

    /// Publish a command into the pending slot.
    ///
    /// The caller is responsible for not racing an in-flight command; the
    /// protocol's contract is that a new command is only issued after the
    /// previous result has been observed.
    pub async fn send(&self, command: &Command) -> Result<(), BridgeError> {
        self.channel
            .set(keys::SKILL_NAME_INPUT, &command.encode())
            .await
    }

    /// Stage a waypoint list for the *next* `nav` command.
    ///
    /// An empty slice stages the idle sentinel (plain single-target nav).
    pub async fn stage_waypoints(&self, waypoints: &[Waypoint]) -> Result<(), BridgeError> {
        self.channel
            .set(keys::NAV_TARGET_XYZ, &encode_waypoint_list(waypoints))
            .await
    }

    /// Write the observed human state (stands in for the perception stack).
    pub async fn set_human_state(&self, state: &str) -> Result<(), BridgeError> {
        self.channel.set(keys::HUMAN_STATE, state).await
    }

    /// `true` while the command slot still holds an unconsumed command.
    pub async fn command_pending(&self) -> Result<bool, BridgeError> {
        let raw = self
            .channel
            .get(keys::SKILL_NAME_INPUT, wire::COMMAND_IDLE)
            .await?;
        Ok(Command::decode(&raw).is_some())
    }

    /// Read the result slot; `None` while the cleared sentinel is in place.
    ///
    /// Because the dispatcher clears the command slot *before* publishing
    /// the result, observing `Some` here guarantees the pending slot is
    /// already free for the next command.
    pub async fn result(&self) -> Result<Option<SkillResult>, BridgeError> {
        let raw = self
            .channel
            .get(keys::SKILL_NAME_SUC_MSG, wire::RESULT_IDLE)
            .await?;
        Ok(SkillResult::decode(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::InMemoryChannel;
    use skillbridge_types::SkillKind;

    #[tokio::test]
    async fn send_writes_encoded_command() {
        let channel = InMemoryChannel::new();
        let planner = PlannerClient::new(channel.clone());
        planner
            .send(&Command::new(SkillKind::Pick, "bottle"))
            .await
            .unwrap();
        assert_eq!(
            channel.get(keys::SKILL_NAME_INPUT, "").await.unwrap(),
            "pick,bottle"
        );
        assert!(planner.command_pending().await.unwrap());
    }

    #[tokio::test]
    async fn command_pending_is_false_when_idle() {
        let planner = PlannerClient::new(InMemoryChannel::new());
        assert!(!planner.command_pending().await.unwrap());
    }

    #[tokio::test]
    async fn stage_waypoints_writes_pipe_delimited_list() {
        let channel = InMemoryChannel::new();
        let planner = PlannerClient::new(channel.clone());
        planner
            .stage_waypoints(&[Waypoint::new(1.0, 0.0, 2.0)])
            .await
            .unwrap();
        assert_eq!(
            channel.get(keys::NAV_TARGET_XYZ, "").await.unwrap(),
            "1,0,2|"
        );
    }

    #[tokio::test]
    async fn result_is_none_while_sentinel_is_in_place() {
        let channel = InMemoryChannel::new();
        let planner = PlannerClient::new(channel.clone());
        assert_eq!(planner.result().await.unwrap(), None);

        channel
            .set(keys::SKILL_NAME_SUC_MSG, "nav,true,reached target")
            .await
            .unwrap();
        let result = planner.result().await.unwrap().expect("result present");
        assert_eq!(result.kind, SkillKind::Nav);
        assert!(result.succeeded);
        assert_eq!(result.message, "reached target");
    }
}
