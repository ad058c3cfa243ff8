use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed set of robot skills the dispatcher can route to.
///
/// The wire names are the exact strings the planner writes into the
/// `skill_name_input` channel key.  Anything outside this set (including the
/// `"None"` idle sentinel) decodes to *no command* rather than an error, so
/// routing is an exhaustive `match` with no silent fallthrough arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillKind {
    /// Navigate to a target: either a named location or a waypoint sequence.
    Nav,
    /// Grasp the object named in the command input.
    Pick,
    /// Put down the held object using the fixed semantic-place configuration.
    Place,
    /// Open the drawer in front of the robot.
    OpenDrawer,
    /// Close the drawer in front of the robot.
    CloseDrawer,
    /// Report the currently observed human state (always succeeds).
    FindAgentAction,
}

impl SkillKind {
    /// All skill kinds, in wire-name order.
    pub const ALL: [SkillKind; 6] = [
        SkillKind::Nav,
        SkillKind::Pick,
        SkillKind::Place,
        SkillKind::OpenDrawer,
        SkillKind::CloseDrawer,
        SkillKind::FindAgentAction,
    ];

    /// The string this skill is identified by on the channel.
    pub fn wire_name(self) -> &'static str {
        match self {
            SkillKind::Nav => "nav",
            SkillKind::Pick => "pick",
            SkillKind::Place => "place",
            SkillKind::OpenDrawer => "opendrawer",
            SkillKind::CloseDrawer => "closedrawer",
            SkillKind::FindAgentAction => "findagentaction",
        }
    }

    /// Case-sensitive reverse lookup of [`wire_name`][Self::wire_name].
    pub fn from_wire(name: &str) -> Option<Self> {
        match name {
            "nav" => Some(SkillKind::Nav),
            "pick" => Some(SkillKind::Pick),
            "place" => Some(SkillKind::Place),
            "opendrawer" => Some(SkillKind::OpenDrawer),
            "closedrawer" => Some(SkillKind::CloseDrawer),
            "findagentaction" => Some(SkillKind::FindAgentAction),
            _ => None,
        }
    }
}

impl fmt::Display for SkillKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Wire-format sentinels shared by both ends of the protocol.
///
/// The channel carries plain strings; these are the reserved values meaning
/// "no data / idle" for each key.
pub mod wire {
    /// Idle value of the pending-command key.
    pub const COMMAND_IDLE: &str = "None,None";
    /// Idle / cleared value of the result key.
    pub const RESULT_IDLE: &str = "None,None,None";
    /// Idle value of the waypoint-list key (note the terminal delimiter).
    pub const WAYPOINTS_IDLE: &str = "None,None,None|";
    /// The per-field placeholder used inside the sentinels above.
    pub const NONE_FIELD: &str = "None";
}

// ─────────────────────────────────────────────────────────────────────────────
// Command
// ─────────────────────────────────────────────────────────────────────────────

/// A pending command decoded from the `skill_name_input` key.
///
/// Written by an external planner, consumed (and cleared) exactly once by
/// the dispatch loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub kind: SkillKind,
    /// The raw input field.  Meaning depends on the skill: a navigation
    /// target for `nav`, an object name for `pick`, unused otherwise.
    pub input: String,
}

impl Command {
    pub fn new(kind: SkillKind, input: impl Into<String>) -> Self {
        Self {
            kind,
            input: input.into(),
        }
    }

    /// Decode the raw `skill_name_input` value.
    ///
    /// Returns `None` for the idle sentinel, for unknown skill names, and for
    /// records without the name/input delimiter.  Malformed input is never an
    /// error: an unparseable record simply means "idle, nothing to do".
    pub fn decode(raw: &str) -> Option<Command> {
        let (name, input) = raw.split_once(',')?;
        let kind = SkillKind::from_wire(name)?;
        Some(Command {
            kind,
            input: input.to_string(),
        })
    }

    /// Encode this command as the `"<name>,<input>"` channel value.
    pub fn encode(&self) -> String {
        format!("{},{}", self.kind.wire_name(), self.input)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Waypoints
// ─────────────────────────────────────────────────────────────────────────────

/// A single 3-D point of a navigation waypoint list, in the planner's frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Waypoint {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// The horizontal `(x, y)` target handed to the navigation skill.
    ///
    /// The stored second and third components arrive flipped from the
    /// planner's habitat-convention frame, so the target's second horizontal
    /// coordinate is the stored `z`.  This remap is deliberately the only
    /// place in the codebase where the two frames are reconciled; confirm it
    /// against the upstream frame definitions before reusing elsewhere.
    pub fn planar_target(self) -> (f32, f32) {
        (self.x, self.z)
    }
}

/// Decode the `nav_target_xyz` value into an ordered waypoint list.
///
/// Format: `"x0,y0,z0|x1,y1,z1|"` — pipe-delimited comma-triples with a
/// terminal delimiter.  Returns `Ok(None)` when the value contains the
/// `"None"` placeholder (the idle sentinel) or holds no waypoints at all; the
/// caller then falls back to single-target navigation.
///
/// # Errors
///
/// [`BridgeError::Parse`] when a segment does not have exactly three
/// components or a component is not a valid float.  Unlike command decoding
/// this is a hard error: a planner that got far enough to write a list is
/// not allowed to write a corrupt one.
pub fn decode_waypoint_list(raw: &str) -> Result<Option<Vec<Waypoint>>, BridgeError> {
    if raw.contains(wire::NONE_FIELD) {
        return Ok(None);
    }
    let mut waypoints = Vec::new();
    // The terminal delimiter produces one trailing empty segment; drop it
    // (and any other empty segment) rather than erroring.
    for segment in raw.split('|').filter(|s| !s.is_empty()) {
        let fields: Vec<&str> = segment.split(',').collect();
        if fields.len() != 3 {
            return Err(BridgeError::Parse(format!(
                "waypoint segment '{segment}' must have exactly 3 components"
            )));
        }
        let coord = |s: &str| {
            s.trim().parse::<f32>().map_err(|e| {
                BridgeError::Parse(format!("invalid waypoint coordinate '{s}': {e}"))
            })
        };
        waypoints.push(Waypoint::new(
            coord(fields[0])?,
            coord(fields[1])?,
            coord(fields[2])?,
        ));
    }
    if waypoints.is_empty() {
        return Ok(None);
    }
    Ok(Some(waypoints))
}

/// Encode a waypoint list as the `nav_target_xyz` channel value.
///
/// An empty slice encodes as the idle sentinel.
pub fn encode_waypoint_list(waypoints: &[Waypoint]) -> String {
    if waypoints.is_empty() {
        return wire::WAYPOINTS_IDLE.to_string();
    }
    let mut out = String::new();
    for wp in waypoints {
        out.push_str(&format!("{},{},{}|", wp.x, wp.y, wp.z));
    }
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Results
// ─────────────────────────────────────────────────────────────────────────────

/// What a single skill invocation reported back: in-band success/failure plus
/// a human-readable message.
///
/// A `succeeded == false` outcome is a *normal* result (the skill ran and
/// failed); the fatal error path is [`BridgeError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillOutcome {
    pub succeeded: bool,
    pub message: String,
}

impl SkillOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            succeeded: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            message: message.into(),
        }
    }
}

/// The completed-dispatch record published on the `skill_name_suc_msg` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillResult {
    pub kind: SkillKind,
    pub succeeded: bool,
    pub message: String,
}

impl SkillResult {
    pub fn new(kind: SkillKind, outcome: &SkillOutcome) -> Self {
        Self {
            kind,
            succeeded: outcome.succeeded,
            message: outcome.message.clone(),
        }
    }

    /// Encode as the `"<name>,<succeeded>,<message>"` channel value.
    pub fn encode(&self) -> String {
        format!("{},{},{}", self.kind.wire_name(), self.succeeded, self.message)
    }

    /// Decode a result value; returns `None` for the idle sentinel and for
    /// anything else that is not a well-formed result triple.
    ///
    /// The success flag is matched case-insensitively so results written by
    /// the legacy executor (`True`/`False`) still parse.
    pub fn decode(raw: &str) -> Option<SkillResult> {
        let mut fields = raw.splitn(3, ',');
        let kind = SkillKind::from_wire(fields.next()?)?;
        let flag = fields.next()?;
        let succeeded = if flag.eq_ignore_ascii_case("true") {
            true
        } else if flag.eq_ignore_ascii_case("false") {
            false
        } else {
            return None;
        };
        let message = fields.next().unwrap_or_default().to_string();
        Some(SkillResult {
            kind,
            succeeded,
            message,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Global error type spanning channel failures, gateway faults, and wire
/// parse errors.
///
/// Every variant is fatal to the dispatch loop: skills signal *expected*
/// failures in-band through [`SkillOutcome::succeeded`], and malformed
/// commands decode to idle, so an `Err` reaching the loop means the process
/// itself is in trouble.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BridgeError {
    #[error("channel error on key '{key}': {details}")]
    Channel { key: String, details: String },

    #[error("gateway fault in skill '{skill}': {details}")]
    Gateway { skill: String, details: String },

    #[error("wire parse error: {0}")]
    Parse(String),

    #[error("config error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_roundtrip_for_every_skill_kind() {
        for kind in SkillKind::ALL {
            let cmd = Command::new(kind, "bottle");
            let back = Command::decode(&cmd.encode()).expect("must decode");
            assert_eq!(back, cmd, "round-trip failed for {kind}");
        }
    }

    #[test]
    fn command_idle_sentinel_decodes_to_none() {
        assert_eq!(Command::decode(wire::COMMAND_IDLE), None);
    }

    #[test]
    fn command_unknown_skill_decodes_to_none() {
        assert_eq!(Command::decode("dance,foo"), None);
    }

    #[test]
    fn command_without_delimiter_decodes_to_none() {
        assert_eq!(Command::decode("nav"), None);
        assert_eq!(Command::decode(""), None);
    }

    #[test]
    fn command_input_may_contain_commas() {
        let cmd = Command::decode("nav,kitchen,table").expect("must decode");
        assert_eq!(cmd.kind, SkillKind::Nav);
        assert_eq!(cmd.input, "kitchen,table");
    }

    #[test]
    fn skill_kind_wire_names_are_case_sensitive() {
        assert_eq!(SkillKind::from_wire("Nav"), None);
        assert_eq!(SkillKind::from_wire("PICK"), None);
    }

    #[test]
    fn skill_kind_serde_roundtrip() {
        for kind in SkillKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            let back: SkillKind = serde_json::from_str(&json).unwrap();
            assert_eq!(back, kind);
        }
    }

    #[test]
    fn waypoint_planar_target_flips_second_and_third_axes() {
        let wp = Waypoint::new(1.0, 0.0, 2.0);
        assert_eq!(wp.planar_target(), (1.0, 2.0));
    }

    #[test]
    fn waypoint_list_roundtrip_with_terminal_delimiter() {
        let list = vec![Waypoint::new(1.0, 0.0, 2.0), Waypoint::new(3.0, 0.0, 4.0)];
        let encoded = encode_waypoint_list(&list);
        assert!(encoded.ends_with('|'), "encoding must keep the terminal delimiter");
        let decoded = decode_waypoint_list(&encoded).expect("must parse").expect("must be Some");
        assert_eq!(decoded, list);
    }

    #[test]
    fn waypoint_list_sentinel_decodes_to_none() {
        assert_eq!(decode_waypoint_list(wire::WAYPOINTS_IDLE).unwrap(), None);
        assert_eq!(decode_waypoint_list("None").unwrap(), None);
    }

    #[test]
    fn waypoint_list_empty_value_decodes_to_none() {
        assert_eq!(decode_waypoint_list("").unwrap(), None);
        assert_eq!(decode_waypoint_list("|").unwrap(), None);
    }

    #[test]
    fn waypoint_list_bad_arity_is_a_parse_error() {
        let err = decode_waypoint_list("1.0,2.0|").unwrap_err();
        assert!(matches!(err, BridgeError::Parse(_)));
    }

    #[test]
    fn waypoint_list_bad_float_is_a_parse_error() {
        let err = decode_waypoint_list("1.0,zero,2.0|").unwrap_err();
        assert!(matches!(err, BridgeError::Parse(_)));
    }

    #[test]
    fn empty_waypoint_slice_encodes_as_idle_sentinel() {
        assert_eq!(encode_waypoint_list(&[]), wire::WAYPOINTS_IDLE);
    }

    #[test]
    fn skill_result_roundtrip() {
        let result = SkillResult::new(SkillKind::Pick, &SkillOutcome::failure("grasp slipped"));
        let back = SkillResult::decode(&result.encode()).expect("must decode");
        assert_eq!(back, result);
    }

    #[test]
    fn skill_result_message_may_contain_commas() {
        let back = SkillResult::decode("nav,true,reached (1, 2)").expect("must decode");
        assert_eq!(back.message, "reached (1, 2)");
        assert!(back.succeeded);
    }

    #[test]
    fn skill_result_idle_sentinel_decodes_to_none() {
        assert_eq!(SkillResult::decode(wire::RESULT_IDLE), None);
    }

    #[test]
    fn skill_result_accepts_legacy_python_bool_casing() {
        let back = SkillResult::decode("pick,True,done").expect("must decode");
        assert!(back.succeeded);
        let back = SkillResult::decode("pick,False,nope").expect("must decode");
        assert!(!back.succeeded);
    }

    #[test]
    fn skill_result_garbage_flag_decodes_to_none() {
        assert_eq!(SkillResult::decode("pick,maybe,huh"), None);
    }

    #[test]
    fn bridge_error_display() {
        let err = BridgeError::Channel {
            key: "skill_name_input".to_string(),
            details: "backend unreachable".to_string(),
        };
        assert!(err.to_string().contains("skill_name_input"));

        let err = BridgeError::Parse("bad coordinate".to_string());
        assert!(err.to_string().contains("bad coordinate"));
    }
}
