//! [`SimGateway`] – recording stub backend for CI and the demo shell.
//!
//! Records every invocation and succeeds by default.  Failures can be
//! scripted per navigation target or per skill kind, which is how the
//! short-circuit and failure-reporting paths are exercised without physical
//! hardware.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use skillbridge_types::{BridgeError, SkillKind, SkillOutcome};
use tracing::debug;

use crate::gateway::{PlaceRequest, SkillGateway};

/// One recorded gateway invocation, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    Navigate { x: f32, y: f32 },
    NavigateNamed(String),
    Pick(String),
    Place(PlaceRequest),
    OpenDrawer,
    CloseDrawer,
}

#[derive(Default)]
struct SimInner {
    calls: Mutex<Vec<GatewayCall>>,
    failing_targets: Mutex<Vec<(f32, f32)>>,
    failing_kinds: Mutex<HashSet<SkillKind>>,
}

/// Simulated skill backend.
///
/// Clone it cheaply – all clones share the same call log and failure
/// script, so the shell can flip failures on a clone while the dispatcher
/// holds another.
#[derive(Clone, Default)]
pub struct SimGateway {
    inner: Arc<SimInner>,
}

impl SimGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the navigation to planar target `(x, y)` to fail.
    pub fn fail_navigate_to(&self, x: f32, y: f32) {
        self.inner.failing_targets.lock().unwrap().push((x, y));
    }

    /// Script every invocation of `kind` to fail (or clear the script).
    pub fn set_skill_failure(&self, kind: SkillKind, failing: bool) {
        let mut kinds = self.inner.failing_kinds.lock().unwrap();
        if failing {
            kinds.insert(kind);
        } else {
            kinds.remove(&kind);
        }
    }

    /// Snapshot of every invocation so far, in call order.
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.inner.calls.lock().unwrap().clone()
    }

    /// Forget all recorded invocations (failure scripts are kept).
    pub fn clear_calls(&self) {
        self.inner.calls.lock().unwrap().clear();
    }

    fn record(&self, call: GatewayCall) {
        debug!(call = ?call, "sim gateway invoked");
        self.inner.calls.lock().unwrap().push(call);
    }

    fn kind_fails(&self, kind: SkillKind) -> bool {
        self.inner.failing_kinds.lock().unwrap().contains(&kind)
    }

    fn target_fails(&self, x: f32, y: f32) -> bool {
        self.inner
            .failing_targets
            .lock()
            .unwrap()
            .iter()
            .any(|&(fx, fy)| (fx - x).abs() < 1e-6 && (fy - y).abs() < 1e-6)
    }
}

#[async_trait]
impl SkillGateway for SimGateway {
    async fn navigate(&self, x: f32, y: f32) -> Result<SkillOutcome, BridgeError> {
        self.record(GatewayCall::Navigate { x, y });
        if self.kind_fails(SkillKind::Nav) || self.target_fails(x, y) {
            return Ok(SkillOutcome::failure(format!(
                "sim: navigation to ({x}, {y}) failed"
            )));
        }
        Ok(SkillOutcome::success(format!("sim: reached ({x}, {y})")))
    }

    async fn navigate_named(&self, target: &str) -> Result<SkillOutcome, BridgeError> {
        self.record(GatewayCall::NavigateNamed(target.to_string()));
        if self.kind_fails(SkillKind::Nav) {
            return Ok(SkillOutcome::failure(format!(
                "sim: navigation to '{target}' failed"
            )));
        }
        Ok(SkillOutcome::success(format!("sim: reached '{target}'")))
    }

    async fn pick(&self, target: &str) -> Result<SkillOutcome, BridgeError> {
        self.record(GatewayCall::Pick(target.to_string()));
        if self.kind_fails(SkillKind::Pick) {
            return Ok(SkillOutcome::failure(format!(
                "sim: failed to grasp '{target}'"
            )));
        }
        Ok(SkillOutcome::success(format!("sim: picked '{target}'")))
    }

    async fn place(&self, request: PlaceRequest) -> Result<SkillOutcome, BridgeError> {
        self.record(GatewayCall::Place(request));
        if self.kind_fails(SkillKind::Place) {
            return Ok(SkillOutcome::failure("sim: place failed"));
        }
        Ok(SkillOutcome::success("sim: object placed"))
    }

    async fn open_drawer(&self) -> Result<SkillOutcome, BridgeError> {
        self.record(GatewayCall::OpenDrawer);
        if self.kind_fails(SkillKind::OpenDrawer) {
            return Ok(SkillOutcome::failure("sim: drawer stuck"));
        }
        Ok(SkillOutcome::success("sim: drawer opened"))
    }

    async fn close_drawer(&self) -> Result<SkillOutcome, BridgeError> {
        self.record(GatewayCall::CloseDrawer);
        if self.kind_fails(SkillKind::CloseDrawer) {
            return Ok(SkillOutcome::failure("sim: drawer stuck"));
        }
        Ok(SkillOutcome::success("sim: drawer closed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn navigate_records_call_and_succeeds_by_default() {
        let sim = SimGateway::new();
        let outcome = sim.navigate(1.0, 2.0).await.unwrap();
        assert!(outcome.succeeded);
        assert_eq!(sim.calls(), vec![GatewayCall::Navigate { x: 1.0, y: 2.0 }]);
    }

    #[tokio::test]
    async fn scripted_navigate_target_fails() {
        let sim = SimGateway::new();
        sim.fail_navigate_to(1.0, 2.0);
        assert!(!sim.navigate(1.0, 2.0).await.unwrap().succeeded);
        // Other targets are unaffected.
        assert!(sim.navigate(3.0, 4.0).await.unwrap().succeeded);
    }

    #[tokio::test]
    async fn scripted_skill_failure_can_be_cleared() {
        let sim = SimGateway::new();
        sim.set_skill_failure(SkillKind::Pick, true);
        assert!(!sim.pick("bottle").await.unwrap().succeeded);
        sim.set_skill_failure(SkillKind::Pick, false);
        assert!(sim.pick("bottle").await.unwrap().succeeded);
    }

    #[tokio::test]
    async fn clones_share_call_log_and_script() {
        let sim = SimGateway::new();
        let observer = sim.clone();
        observer.set_skill_failure(SkillKind::OpenDrawer, true);
        assert!(!sim.open_drawer().await.unwrap().succeeded);
        assert_eq!(observer.calls(), vec![GatewayCall::OpenDrawer]);
    }

    #[tokio::test]
    async fn place_records_request() {
        let sim = SimGateway::new();
        sim.place(PlaceRequest::semantic()).await.unwrap();
        match &sim.calls()[0] {
            GatewayCall::Place(req) => {
                assert_eq!(req.target, None);
                assert!(req.local_frame);
                assert!(!req.visualize);
                assert!(req.estimate_waypoint);
            }
            other => panic!("unexpected call: {other:?}"),
        }
    }
}
