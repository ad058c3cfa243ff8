//! [`ResultReporter`] – result-key ownership and write ordering.

use skillbridge_channel::{ParamChannel, keys};
use skillbridge_types::{BridgeError, SkillKind, SkillOutcome, SkillResult, wire};
use tracing::debug;

/// Sole writer of the `skill_name_suc_msg` key.
///
/// Two operations bracket every dispatch:
///
/// * [`reset`][Self::reset] before the skill runs, so a concurrent observer
///   never reads a stale result from the previous command while the new one
///   is executing;
/// * [`publish`][Self::publish] after it returns, which clears the command
///   slot *first* and only then makes the result visible — a planner that
///   sees the result can therefore issue its next command immediately
///   without racing the one just consumed.
pub struct ResultReporter<C: ParamChannel> {
    channel: C,
}

impl<C: ParamChannel> ResultReporter<C> {
    pub fn new(channel: C) -> Self {
        Self { channel }
    }

    /// Write the cleared sentinel into the result slot.  Idempotent.
    pub async fn reset(&self) -> Result<(), BridgeError> {
        self.channel
            .set(keys::SKILL_NAME_SUC_MSG, wire::RESULT_IDLE)
            .await
    }

    /// Clear the consumed command, then publish the result.
    ///
    /// The order of the two writes is the protocol's only completion
    /// guarantee; do not swap them.
    pub async fn publish(
        &self,
        kind: SkillKind,
        outcome: &SkillOutcome,
    ) -> Result<(), BridgeError> {
        self.channel
            .set(keys::SKILL_NAME_INPUT, wire::COMMAND_IDLE)
            .await?;
        let result = SkillResult::new(kind, outcome);
        debug!(skill = %kind, succeeded = outcome.succeeded, "publishing result");
        self.channel
            .set(keys::SKILL_NAME_SUC_MSG, &result.encode())
            .await
    }
}
