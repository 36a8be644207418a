//! Per-frame input snapshot consumed by the simulation

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::EnemyKind;

/// Axis magnitude below which an actor channel carries no signal
pub const SIGNAL_THRESHOLD: f32 = 0.05;

/// Control channel for an externally puppeted actor
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ActorInput {
    /// -1 to 1
    pub axis_x: f32,
    /// -1 to 1
    pub axis_y: f32,
    /// Held boost button
    pub boost: bool,
    /// Held auxiliary action (barrier rotation)
    pub action1: bool,
}

impl ActorInput {
    pub fn axis(&self) -> Vec2 {
        Vec2::new(self.axis_x, self.axis_y)
    }

    /// True if either axis is outside the dead band
    pub fn has_axis_signal(&self) -> bool {
        self.axis_x.abs() > SIGNAL_THRESHOLD || self.axis_y.abs() > SIGNAL_THRESHOLD
    }
}

/// Remote channels for every puppetable actor
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EnemyInputs {
    /// Reserved for a fourth actor, not consumed by the simulation yet
    pub barrier: ActorInput,
    pub dog: ActorInput,
    pub old_man: ActorInput,
}

impl EnemyInputs {
    pub fn for_kind(&self, kind: EnemyKind) -> &ActorInput {
        match kind {
            EnemyKind::Dog => &self.dog,
            EnemyKind::OldMan => &self.old_man,
        }
    }
}

/// Input commands for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputState {
    /// Player movement, -1 to 1 per axis
    pub axis_x: f32,
    pub axis_y: f32,
    /// Tag button held
    pub action_primary: bool,
    /// Tag button pressed this frame (drives tagging)
    pub action_primary_trigger: bool,
    /// Boost
    pub action_secondary: bool,
    /// Teleport
    pub action_tertiary: bool,
    /// Back to menu
    pub action_cancel: bool,
    pub enemies: EnemyInputs,
}

impl InputState {
    pub fn axis(&self) -> Vec2 {
        Vec2::new(self.axis_x, self.axis_y)
    }
}
