//! Well-known channel keys.
//!
//! The protocol stays race-free by convention, not by locking: every key has
//! exactly one writer.
//!
//! | key | written by | meaning |
//! |---|---|---|
//! | [`SKILL_NAME_INPUT`] | planner | pending command (`"<name>,<input>"`); cleared by the dispatcher once consumed |
//! | [`NAV_TARGET_XYZ`] | planner | optional waypoint list for `nav`; reset by the dispatcher after every `nav` |
//! | [`SKILL_NAME_SUC_MSG`] | dispatcher | last result (`"<name>,<succeeded>,<message>"`) |
//! | [`HUMAN_STATE`] | external perception | free string, read-only to the dispatcher |
//!
//! Two processes writing the same key is unsupported and undefined.

/// Pending command slot.  The dispatcher is the sole *clearer* of this key.
pub const SKILL_NAME_INPUT: &str = "skill_name_input";

/// Optional waypoint list consumed by `nav`.
pub const NAV_TARGET_XYZ: &str = "nav_target_xyz";

/// Result slot.  The dispatcher is the sole writer of this key.
pub const SKILL_NAME_SUC_MSG: &str = "skill_name_suc_msg";

/// Latest observed human state, maintained by an external perception stack.
pub const HUMAN_STATE: &str = "human_state";

/// Value assumed for [`HUMAN_STATE`] when the key has never been written.
pub const HUMAN_STATE_DEFAULT: &str = "standing";
