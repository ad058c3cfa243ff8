//! [`SkillGateway`] – one blocking skill invocation per method.

use async_trait::async_trait;
use skillbridge_types::{BridgeError, SkillOutcome};

/// Configuration for a single place invocation.
///
/// The dispatcher always issues [`PlaceRequest::semantic`]; the full struct
/// exists so backends (and future planners) deal in named fields instead of
/// a positional argument tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceRequest {
    /// Explicit place target; `None` lets the backend estimate one.
    pub target: Option<String>,
    /// Interpret the target in the robot's local frame.
    pub local_frame: bool,
    /// Render debug visualisation while placing.
    pub visualize: bool,
    /// Let the backend estimate an approach waypoint.
    pub estimate_waypoint: bool,
}

impl PlaceRequest {
    /// The fixed semantic-place mode used for every dispatched `place`
    /// command: no explicit target, local frame, no visualisation, with
    /// waypoint estimation.
    pub fn semantic() -> Self {
        Self {
            target: None,
            local_frame: true,
            visualize: false,
            estimate_waypoint: true,
        }
    }
}

/// Every skill backend must implement this trait.
///
/// # Contract
///
/// * Each method blocks for the full duration of the skill and returns the
///   skill's own verdict as a [`SkillOutcome`] — `succeeded == false` is a
///   *normal* return, never an `Err`.
/// * `Err` is reserved for faults the skill could not convert into an
///   outcome (lost robot connection, crashed subprocess, …) and is fatal to
///   the dispatch loop.
/// * Methods take `&self`: a backend that needs mutable state guards it
///   internally, because the dispatcher drives at most one invocation at a
///   time but tests may inspect the backend concurrently.
#[async_trait]
pub trait SkillGateway: Send + Sync {
    /// Navigate to planar coordinates `(x, y)` in the robot's map frame.
    async fn navigate(&self, x: f32, y: f32) -> Result<SkillOutcome, BridgeError>;

    /// Navigate to a named target (e.g. a receptacle label); the backend
    /// decides how to resolve the name into a pose.
    async fn navigate_named(&self, target: &str) -> Result<SkillOutcome, BridgeError>;

    /// Pick up the named object.
    async fn pick(&self, target: &str) -> Result<SkillOutcome, BridgeError>;

    /// Place the held object.
    async fn place(&self, request: PlaceRequest) -> Result<SkillOutcome, BridgeError>;

    /// Open the drawer in front of the robot.
    async fn open_drawer(&self) -> Result<SkillOutcome, BridgeError>;

    /// Close the drawer in front of the robot.
    async fn close_drawer(&self) -> Result<SkillOutcome, BridgeError>;
}
