//! Per-tick input snapshot

use serde::{Deserialize, Serialize};

/// Merged directional and button state for a single tick (deterministic)
///
/// Keyboard and virtual touch controls are sampled upstream and OR-ed together
/// before the simulation sees them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Primary action: tap to throw, hold to charge
    pub action_a: bool,
    /// Secondary action: jump
    pub action_b: bool,
    /// Pause toggle (edge, not level)
    #[serde(default)]
    pub pause: bool,
}

impl InputSnapshot {
    /// Combine two physical sources; a button is down if either source holds it
    pub fn merged(self, other: InputSnapshot) -> InputSnapshot {
        InputSnapshot {
            left: self.left || other.left,
            right: self.right || other.right,
            up: self.up || other.up,
            down: self.down || other.down,
            action_a: self.action_a || other.action_a,
            action_b: self.action_b || other.action_b,
            pause: self.pause || other.pause,
        }
    }

    /// Jump is bound to both up and the secondary button
    #[inline]
    pub fn jump(&self) -> bool {
        self.up || self.action_b
    }
}
