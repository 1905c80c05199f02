// Head pose state and commands

use crate::engine::input::Action;

/// Discrete head posture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoseState {
    /// Head upright
    Neutral,
    /// Head tilted toward the character's left (positive angle)
    TiltedLeft,
    /// Head tilted toward the character's right (negative angle)
    TiltedRight,
}

impl Default for PoseState {
    fn default() -> Self {
        Self::Neutral
    }
}

impl PoseState {
    /// Get the resting head angle for this pose
    pub fn target_angle(&self, max_angle: f32) -> f32 {
        match self {
            Self::Neutral => 0.0,
            Self::TiltedLeft => max_angle,
            Self::TiltedRight => -max_angle,
        }
    }

    /// Get the name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::TiltedLeft => "tilted_left",
            Self::TiltedRight => "tilted_right",
        }
    }
}

/// A request to move the head into a pose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoseCommand {
    TiltLeft,
    TiltRight,
    DefaultPosition,
}

impl PoseCommand {
    /// Get the pose this command leads to
    pub fn target_state(&self) -> PoseState {
        match self {
            Self::TiltLeft => PoseState::TiltedLeft,
            Self::TiltRight => PoseState::TiltedRight,
            Self::DefaultPosition => PoseState::Neutral,
        }
    }

    /// Translate an input action, if it is a pose action
    pub fn from_action(action: Action) -> Option<Self> {
        match action {
            Action::TiltLeft => Some(Self::TiltLeft),
            Action::TiltRight => Some(Self::TiltRight),
            Action::DefaultPosition => Some(Self::DefaultPosition),
            Action::Quit => None,
        }
    }
}
