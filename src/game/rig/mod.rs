// Character rig
//
// This module contains the layered head rig:
// - Static configuration (pivot table, tilt timing)
// - Visual parts and the hair swing trigger
// - Pose state and commands
// - The head joint coordinating the tilt
// - The assembled character

pub mod character;
pub mod config;
pub mod head_joint;
pub mod parts;
pub mod pose;

// Re-export commonly used types
pub use character::Kokori;
pub use config::{PivotTable, RigConfig, KOKORI_RIG};
pub use head_joint::{AnimationSession, HeadJoint, HeadParts};
pub use parts::{EyeGroup, Hair, HairSide, Part, SecondaryMotion};
pub use pose::{PoseCommand, PoseState};

use crate::engine::tween::TweenError;

/// Rig assembly errors
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RigError {
    #[error("Max tilt angle must be positive and finite, got {0}")]
    InvalidMaxAngle(f32),

    #[error("Tween error: {0}")]
    Tween(#[from] TweenError),
}
