// Assembled character rig

use super::config::RigConfig;
use super::head_joint::{HeadJoint, HeadParts};
use super::parts::{EyeGroup, Hair, HairSide, Part};
use super::pose::PoseCommand;
use super::RigError;
use crate::engine::clock::TickSource;
use crate::engine::input::Action;
use crate::engine::transform::{FragmentUniform, VisualFragment};

/// Kokori: every head layer plus the joint that tilts them
#[derive(Debug)]
pub struct Kokori {
    head: Part,
    hair: Hair,
    hair_side: HairSide,
    hair_back: Part,
    eye_left: EyeGroup,
    eye_right: EyeGroup,
    mouth: Part,
    red_cheek: Part,
    head_joint: HeadJoint,
}

impl Kokori {
    /// Build all layers and bind the head joint
    pub fn new(config: &RigConfig, clock: impl TickSource + 'static) -> Result<Self, RigError> {
        let mut head = Part::new("head");
        let mut hair = Hair::default();
        let mut hair_side = HairSide::default();
        let mut hair_back = Part::new("hair_back");
        let mut eye_left = EyeGroup::left();
        let mut eye_right = EyeGroup::right();
        let mut mouth = Part::new("mouth");
        let mut red_cheek = Part::new("red_cheek");

        let motion = hair.motion();
        let head_joint = HeadJoint::new(
            HeadParts {
                head: &mut head,
                hair: &mut hair,
                hair_side: &mut hair_side,
                hair_back: &mut hair_back,
                eye_left: &mut eye_left,
                eye_right: &mut eye_right,
                mouth: &mut mouth,
                red_cheek: &mut red_cheek,
            },
            motion,
            clock,
            config,
        )?;

        log::info!("Kokori rig assembled");

        Ok(Self {
            head,
            hair,
            hair_side,
            hair_back,
            eye_left,
            eye_right,
            mouth,
            red_cheek,
            head_joint,
        })
    }

    pub fn head_joint(&self) -> &HeadJoint {
        &self.head_joint
    }

    pub fn head_joint_mut(&mut self) -> &mut HeadJoint {
        &mut self.head_joint
    }

    pub fn hair(&self) -> &Hair {
        &self.hair
    }

    /// Apply an input action. Returns false for non-pose actions.
    pub fn handle_action(&mut self, action: Action) -> bool {
        match PoseCommand::from_action(action) {
            Some(command) => {
                self.head_joint.apply(command);
                true
            }
            None => false,
        }
    }

    /// Every layer, back to front
    pub fn fragments(&self) -> Vec<&dyn VisualFragment> {
        let mut fragments: Vec<&dyn VisualFragment> = Vec::with_capacity(13);
        fragments.push(&self.hair_back);
        fragments.push(&self.hair_side.left);
        fragments.push(&self.hair_side.right);
        fragments.push(&self.head);
        fragments.push(&self.red_cheek);
        fragments.push(&self.mouth);
        fragments.extend(self.eye_left.fragments());
        fragments.extend(self.eye_right.fragments());
        fragments.push(&self.hair);
        fragments
    }

    /// Per-layer uniforms for the renderer, in draw order
    pub fn uniforms(&self) -> Vec<FragmentUniform> {
        self.fragments()
            .into_iter()
            .map(FragmentUniform::new)
            .collect()
    }
}
