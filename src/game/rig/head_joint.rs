// Head joint - binds the neck rotation to every head layer and tweens it
// between poses

use super::config::RigConfig;
use super::parts::{EyeGroup, HairSide, SecondaryMotion};
use super::pose::{PoseCommand, PoseState};
use super::RigError;
use crate::core::math::{approx_equal, clamp, lerp};
use crate::engine::clock::TickSource;
use crate::engine::transform::{Rotate, RotateHandle, VisualFragment};
use crate::engine::tween::TimeBasedTween;
use glam::Vec2;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// A primary rotation and the sub-pivots that counter it
#[derive(Debug)]
pub struct Joint {
    primary: RotateHandle,
    counters: Vec<RotateHandle>,
    max_angle: f32,
}

impl Joint {
    pub fn new(pivot: Vec2, max_angle: f32) -> Self {
        Self {
            primary: Rotate::shared(0.0, pivot),
            counters: Vec::new(),
            max_angle,
        }
    }

    /// Add a sub-pivot that always holds the negated primary angle
    pub fn add_counter_rotation(&mut self, pivot: Vec2) -> RotateHandle {
        let rotate = Rotate::shared(0.0, pivot);
        self.counters.push(Rc::clone(&rotate));
        rotate
    }

    pub fn primary(&self) -> &RotateHandle {
        &self.primary
    }

    /// Current primary angle in degrees
    pub fn angle(&self) -> f32 {
        self.primary.angle()
    }

    /// Write the primary angle and its negation to every counter-rotation
    fn write(&self, angle: f32) {
        let angle = clamp(angle, -self.max_angle, self.max_angle);
        self.primary.set_angle(angle);
        for counter in &self.counters {
            counter.set_angle(-angle);
        }
    }
}

/// One pose change in flight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSession {
    pub start_angle: f32,
    pub target_angle: f32,
    pub duration: Duration,
}

impl AnimationSession {
    /// Head angle at normalized progress `p`. The final tick lands exactly
    /// on the target.
    pub fn angle_at(&self, p: f32) -> f32 {
        if p >= 1.0 {
            self.target_angle
        } else {
            lerp(self.start_angle, self.target_angle, p)
        }
    }
}

/// Layers the head joint binds to, borrowed for construction only
pub struct HeadParts<'a> {
    pub head: &'a mut dyn VisualFragment,
    pub hair: &'a mut dyn VisualFragment,
    pub hair_side: &'a mut HairSide,
    pub hair_back: &'a mut dyn VisualFragment,
    pub eye_left: &'a mut EyeGroup,
    pub eye_right: &'a mut EyeGroup,
    pub mouth: &'a mut dyn VisualFragment,
    pub red_cheek: &'a mut dyn VisualFragment,
}

/// Coordinates the head tilt
///
/// Owns the pose state machine and the neck joint. The side locks carry the
/// neck rotation plus their own counter-rotation, so they keep hanging
/// straight down while the head tilts.
pub struct HeadJoint {
    joint: Rc<Joint>,
    hair_side_left: RotateHandle,
    hair_side_right: RotateHandle,
    session: Rc<Cell<AnimationSession>>,
    tween: TimeBasedTween,
    motion: Rc<dyn SecondaryMotion>,
    state: PoseState,
    previous_state: PoseState,
    max_angle: f32,
}

impl HeadJoint {
    /// Bind the joint into every head layer
    pub fn new(
        parts: HeadParts<'_>,
        motion: Rc<dyn SecondaryMotion>,
        clock: impl TickSource + 'static,
        config: &RigConfig,
    ) -> Result<Self, RigError> {
        config.validate()?;

        let mut joint = Joint::new(config.pivots.head, config.max_angle);
        let hair_side_left = joint.add_counter_rotation(config.pivots.hair_side_left);
        let hair_side_right = joint.add_counter_rotation(config.pivots.hair_side_right);
        let joint = Rc::new(joint);

        let session = Rc::new(Cell::new(AnimationSession {
            start_angle: 0.0,
            target_angle: 0.0,
            duration: config.tilt_duration,
        }));

        // Every fallible step happens before the parts are touched
        let tween = {
            let joint = Rc::clone(&joint);
            let session = Rc::clone(&session);
            TimeBasedTween::new(config.tilt_duration, clock, move |p| {
                let angle = session.get().angle_at(p);
                joint.write(angle);
                log::trace!("Head angle {:.3} at {:.3}", angle, p);
            })?
        };

        let head = joint.primary();
        let mut pushed = 0;
        for fragment in [parts.head, parts.hair, parts.hair_back, parts.mouth, parts.red_cheek] {
            fragment.transforms_mut().push_rotate(head);
            pushed += 1;
        }
        for eye in [parts.eye_left, parts.eye_right] {
            for fragment in eye.fragments_mut() {
                fragment.transforms_mut().push_rotate(head);
                pushed += 1;
            }
        }
        for (side, own) in [
            (&mut parts.hair_side.left, &hair_side_left),
            (&mut parts.hair_side.right, &hair_side_right),
        ] {
            side.transforms_mut().push_rotate(head);
            side.transforms_mut().push_rotate(own);
            pushed += 2;
        }

        log::info!(
            "Head joint pushed {} rotations (pivot {:?}, max {} deg)",
            pushed,
            config.pivots.head,
            config.max_angle
        );

        Ok(Self {
            joint,
            hair_side_left,
            hair_side_right,
            session,
            tween,
            motion,
            state: PoseState::Neutral,
            previous_state: PoseState::Neutral,
            max_angle: config.max_angle,
        })
    }

    pub fn tilt_to_left(&mut self) {
        self.transition(PoseState::TiltedLeft);
    }

    pub fn tilt_to_right(&mut self) {
        self.transition(PoseState::TiltedRight);
    }

    pub fn to_default_position(&mut self) {
        self.transition(PoseState::Neutral);
    }

    /// Run a pose command
    pub fn apply(&mut self, command: PoseCommand) {
        self.transition(command.target_state());
    }

    fn transition(&mut self, next: PoseState) {
        if self.state == next {
            log::debug!("Head already {}, ignoring", next.name());
            return;
        }

        self.previous_state = self.state;
        self.state = next;

        // Start from the live angle so a preempted tilt never jumps
        let session = AnimationSession {
            start_angle: self.joint.angle(),
            target_angle: next.target_angle(self.max_angle),
            duration: self.tween.duration(),
        };
        self.session.set(session);
        self.tween.play();
        self.motion.swing();

        log::debug!(
            "Head {} -> {}: {:.3} -> {:.3} deg",
            self.previous_state.name(),
            next.name(),
            session.start_angle,
            session.target_angle
        );
    }

    pub fn state(&self) -> PoseState {
        self.state
    }

    pub fn previous_state(&self) -> PoseState {
        self.previous_state
    }

    /// Current head angle in degrees
    pub fn angle(&self) -> f32 {
        self.joint.angle()
    }

    /// Current (left, right) side lock angles
    pub fn hair_side_angles(&self) -> (f32, f32) {
        (self.hair_side_left.angle(), self.hair_side_right.angle())
    }

    /// The most recent session
    pub fn session(&self) -> AnimationSession {
        self.session.get()
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_active()
    }

    /// Check whether the head rests at its pose's angle
    pub fn is_settled(&self) -> bool {
        !self.is_animating()
            && approx_equal(self.angle(), self.state.target_angle(self.max_angle), 1e-4)
    }

    pub fn head_rotate(&self) -> &RotateHandle {
        self.joint.primary()
    }

    pub fn max_angle(&self) -> f32 {
        self.max_angle
    }
}

impl std::fmt::Debug for HeadJoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadJoint")
            .field("state", &self.state)
            .field("angle", &self.angle())
            .field("session", &self.session.get())
            .field("tween", &self.tween)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::clock::FrameClock;
    use crate::game::rig::parts::{HairSwing, Part};
    use approx::assert_abs_diff_eq;

    struct Layers {
        head: Part,
        hair: Part,
        hair_side: HairSide,
        hair_back: Part,
        eye_left: EyeGroup,
        eye_right: EyeGroup,
        mouth: Part,
        red_cheek: Part,
    }

    impl Layers {
        fn new() -> Self {
            Self {
                head: Part::new("head"),
                hair: Part::new("hair"),
                hair_side: HairSide::default(),
                hair_back: Part::new("hair_back"),
                eye_left: EyeGroup::left(),
                eye_right: EyeGroup::right(),
                mouth: Part::new("mouth"),
                red_cheek: Part::new("red_cheek"),
            }
        }

        fn single_bound(&self) -> Vec<&dyn VisualFragment> {
            let mut fragments: Vec<&dyn VisualFragment> = Vec::new();
            for part in [&self.head, &self.hair, &self.hair_back, &self.mouth, &self.red_cheek] {
                fragments.push(part);
            }
            fragments.extend(self.eye_left.fragments());
            fragments.extend(self.eye_right.fragments());
            fragments
        }
    }

    struct Fixture {
        joint: HeadJoint,
        layers: Layers,
        swing: Rc<HairSwing>,
        clock: FrameClock,
    }

    fn fixture() -> Fixture {
        let clock = FrameClock::new();
        let swing = Rc::new(HairSwing::default());
        let mut layers = Layers::new();
        let joint = HeadJoint::new(
            HeadParts {
                head: &mut layers.head,
                hair: &mut layers.hair,
                hair_side: &mut layers.hair_side,
                hair_back: &mut layers.hair_back,
                eye_left: &mut layers.eye_left,
                eye_right: &mut layers.eye_right,
                mouth: &mut layers.mouth,
                red_cheek: &mut layers.red_cheek,
            },
            swing.clone(),
            clock.clone(),
            &RigConfig::default(),
        )
        .unwrap();

        Fixture {
            joint,
            layers,
            swing,
            clock,
        }
    }

    fn tick(f: &Fixture, millis: u64) {
        f.clock.advance(Duration::from_millis(millis));
    }

    fn assert_counter_rotated(joint: &HeadJoint) {
        let (left, right) = joint.hair_side_angles();
        assert_eq!(left, -joint.angle());
        assert_eq!(right, -joint.angle());
    }

    #[test]
    fn test_initial_state() {
        let f = fixture();
        assert_eq!(f.joint.state(), PoseState::Neutral);
        assert_eq!(f.joint.angle(), 0.0);
        assert!(!f.joint.is_animating());
        assert!(f.joint.is_settled());
        assert_eq!(f.clock.subscriber_count(), 0);
    }

    #[test]
    fn test_head_rotation_bound_once_per_layer() {
        let f = fixture();
        let head = f.joint.head_rotate();
        let fragments = f.layers.single_bound();
        assert_eq!(fragments.len(), 11);
        for fragment in fragments {
            assert_eq!(fragment.transforms().len(), 1, "{}", fragment.name());
            assert_eq!(fragment.transforms().count_rotate(head), 1, "{}", fragment.name());
        }
    }

    #[test]
    fn test_hair_sides_stack_head_then_own_rotation() {
        let f = fixture();
        let head = f.joint.head_rotate();
        for side in [&f.layers.hair_side.left, &f.layers.hair_side.right] {
            let stack = side.transforms();
            assert_eq!(stack.len(), 2);
            assert_eq!(stack.position_of(head), Some(0));
            assert_eq!(stack.count_rotate(head), 1);
        }
        assert_eq!(
            f.joint.hair_side_left.pivot(),
            RigConfig::default().pivots.hair_side_left
        );
        assert_eq!(
            f.joint.hair_side_right.pivot(),
            RigConfig::default().pivots.hair_side_right
        );
    }

    #[test]
    fn test_tilt_right_halfway() {
        let mut f = fixture();
        f.joint.tilt_to_right();

        assert_eq!(f.joint.state(), PoseState::TiltedRight);
        assert_eq!(f.joint.previous_state(), PoseState::Neutral);
        assert_eq!(f.joint.session().start_angle, 0.0);
        assert_eq!(f.joint.session().target_angle, -10.0);
        assert_eq!(f.swing.swing_count(), 1);

        tick(&f, 150);
        assert_abs_diff_eq!(f.joint.angle(), -5.0, epsilon = 1e-4);
        let (left, right) = f.joint.hair_side_angles();
        assert_abs_diff_eq!(left, 5.0, epsilon = 1e-4);
        assert_abs_diff_eq!(right, 5.0, epsilon = 1e-4);
    }

    #[test]
    fn test_repeated_tilt_right_is_noop() {
        let mut f = fixture();
        f.joint.tilt_to_right();
        tick(&f, 300);
        assert_eq!(f.joint.angle(), -10.0);
        assert!(f.joint.is_settled());

        let session = f.joint.session();
        f.joint.tilt_to_right();

        assert_eq!(f.joint.state(), PoseState::TiltedRight);
        assert_eq!(f.joint.previous_state(), PoseState::Neutral);
        assert_eq!(f.joint.session(), session);
        assert_eq!(f.swing.swing_count(), 1);
        assert!(!f.joint.is_animating());

        tick(&f, 100);
        assert_eq!(f.joint.angle(), -10.0);
    }

    #[test]
    fn test_default_from_mid_tilt() {
        let mut f = fixture();
        f.joint.tilt_to_right();
        tick(&f, 90);
        assert_abs_diff_eq!(f.joint.angle(), -3.0, epsilon = 1e-4);

        f.joint.to_default_position();
        let session = f.joint.session();
        assert_abs_diff_eq!(session.start_angle, -3.0, epsilon = 1e-4);
        assert_eq!(session.target_angle, 0.0);

        tick(&f, 150);
        assert_abs_diff_eq!(f.joint.angle(), -1.5, epsilon = 1e-4);
        assert_counter_rotated(&f.joint);
    }

    #[test]
    fn test_same_state_is_noop_in_every_state() {
        let mut f = fixture();

        f.joint.to_default_position();
        assert_eq!(f.swing.swing_count(), 0);
        assert!(!f.joint.is_animating());

        f.joint.tilt_to_left();
        tick(&f, 100);
        let angle = f.joint.angle();
        f.joint.tilt_to_left();
        assert_eq!(f.swing.swing_count(), 1);
        assert_eq!(f.joint.angle(), angle);
        assert_eq!(f.joint.state(), PoseState::TiltedLeft);

        tick(&f, 300);
        assert_eq!(f.joint.angle(), 10.0);
    }

    #[test]
    fn test_tilt_left_settles_with_counter_rotation() {
        let mut f = fixture();
        f.joint.tilt_to_left();

        for _ in 0..20 {
            tick(&f, 16);
            assert_counter_rotated(&f.joint);
        }

        assert_eq!(f.joint.angle(), 10.0);
        assert_eq!(f.joint.hair_side_angles(), (-10.0, -10.0));
        assert!(f.joint.is_settled());
    }

    #[test]
    fn test_linear_interpolation() {
        let mut f = fixture();
        f.joint.tilt_to_left();
        let session = f.joint.session();

        let mut elapsed = 0;
        for step in [10, 35, 60, 45, 100] {
            tick(&f, step);
            elapsed += step;
            let p = (elapsed as f32 / 300.0).min(1.0);
            assert_abs_diff_eq!(f.joint.angle(), session.angle_at(p), epsilon = 1e-4);
            assert_abs_diff_eq!(f.joint.angle(), 10.0 * p, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_supersession_starts_from_live_angle() {
        let mut f = fixture();
        f.joint.tilt_to_left();
        tick(&f, 150);
        let angle_at_switch = f.joint.angle();
        assert_abs_diff_eq!(angle_at_switch, 5.0, epsilon = 1e-4);

        f.joint.tilt_to_right();
        assert_eq!(f.joint.session().start_angle, angle_at_switch);
        assert_eq!(f.joint.session().target_angle, -10.0);
        assert_eq!(f.clock.subscriber_count(), 1);

        // Never moves back toward the old target
        let mut last = angle_at_switch;
        for _ in 0..10 {
            tick(&f, 30);
            assert!(f.joint.angle() <= last);
            last = f.joint.angle();
        }
        assert_eq!(f.joint.angle(), -10.0);
        assert_eq!(f.swing.swing_count(), 2);
    }

    #[test]
    fn test_angle_stays_bounded() {
        let mut f = fixture();
        let commands = [
            PoseCommand::TiltLeft,
            PoseCommand::TiltRight,
            PoseCommand::TiltLeft,
            PoseCommand::DefaultPosition,
            PoseCommand::TiltRight,
            PoseCommand::TiltRight,
            PoseCommand::TiltLeft,
        ];

        for (i, command) in commands.iter().enumerate() {
            f.joint.apply(*command);
            for _ in 0..(i % 4 + 1) {
                tick(&f, 37);
                assert!(f.joint.angle().abs() <= 10.0);
                assert_counter_rotated(&f.joint);
            }
        }

        tick(&f, 1000);
        assert_eq!(f.joint.state(), PoseState::TiltedLeft);
        assert_eq!(f.joint.angle(), 10.0);
    }

    #[test]
    fn test_apply_commands() {
        let mut f = fixture();
        f.joint.apply(PoseCommand::TiltRight);
        assert_eq!(f.joint.state(), PoseState::TiltedRight);
        f.joint.apply(PoseCommand::DefaultPosition);
        assert_eq!(f.joint.state(), PoseState::Neutral);
        assert_eq!(f.joint.previous_state(), PoseState::TiltedRight);
        assert_eq!(f.swing.swing_count(), 2);
    }

    #[test]
    fn test_side_locks_hang_straight_when_tilted() {
        let mut f = fixture();
        f.joint.tilt_to_left();
        tick(&f, 300);

        // Head rotation and counter-rotation cancel, leaving a pure offset
        let m = f.layers.hair_side.left.world_transform().matrix2;
        assert_abs_diff_eq!(m.x_axis.x, 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(m.x_axis.y, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(m.y_axis.x, 0.0, epsilon = 1e-5);

        let head = f.layers.head.world_transform().matrix2;
        assert!(head.x_axis.y.abs() > 0.1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let clock = FrameClock::new();
        let mut layers = Layers::new();
        let config = RigConfig::default().with_tilt_duration(Duration::ZERO);
        let result = HeadJoint::new(
            HeadParts {
                head: &mut layers.head,
                hair: &mut layers.hair,
                hair_side: &mut layers.hair_side,
                hair_back: &mut layers.hair_back,
                eye_left: &mut layers.eye_left,
                eye_right: &mut layers.eye_right,
                mouth: &mut layers.mouth,
                red_cheek: &mut layers.red_cheek,
            },
            Rc::new(HairSwing::default()),
            clock,
            &config,
        );
        assert!(matches!(result, Err(RigError::Tween(_))));

        // A failed bind leaves every layer untouched
        for fragment in layers.single_bound() {
            assert!(fragment.transforms().is_empty(), "{}", fragment.name());
        }
        assert_eq!(layers.hair_side.left.transforms().len(), 0);
        assert_eq!(layers.hair_side.right.transforms().len(), 0);
    }

    #[test]
    fn test_joint_write_clamps() {
        let mut joint = Joint::new(Vec2::ZERO, 10.0);
        let counter = joint.add_counter_rotation(Vec2::ONE);
        joint.write(25.0);
        assert_eq!(joint.angle(), 10.0);
        assert_eq!(counter.angle(), -10.0);

        joint.write(-25.0);
        assert_eq!(joint.angle(), -10.0);
        assert_eq!(counter.angle(), 10.0);
    }
}
