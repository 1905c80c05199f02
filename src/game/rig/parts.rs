// Visual parts of the rig and the hair swing trigger

use crate::engine::transform::{TransformStack, VisualFragment};
use std::cell::Cell;
use std::rc::Rc;

/// A single drawable layer with its own transform stack
#[derive(Debug, Clone)]
pub struct Part {
    name: &'static str,
    transforms: TransformStack,
}

impl Part {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            transforms: TransformStack::new(),
        }
    }
}

impl VisualFragment for Part {
    fn name(&self) -> &str {
        self.name
    }

    fn transforms(&self) -> &TransformStack {
        &self.transforms
    }

    fn transforms_mut(&mut self) -> &mut TransformStack {
        &mut self.transforms
    }
}

/// Eye, eyebrow and socket moving as one dependent
#[derive(Debug, Clone)]
pub struct EyeGroup {
    pub eye: Part,
    pub eyebrow: Part,
    pub socket: Part,
}

impl EyeGroup {
    pub fn left() -> Self {
        Self {
            eye: Part::new("eye_left"),
            eyebrow: Part::new("eyebrow_left"),
            socket: Part::new("eye_socket_left"),
        }
    }

    pub fn right() -> Self {
        Self {
            eye: Part::new("eye_right"),
            eyebrow: Part::new("eyebrow_right"),
            socket: Part::new("eye_socket_right"),
        }
    }

    /// Members in draw order
    pub fn fragments(&self) -> [&dyn VisualFragment; 3] {
        [&self.socket, &self.eye, &self.eyebrow]
    }

    pub fn fragments_mut(&mut self) -> [&mut dyn VisualFragment; 3] {
        [&mut self.socket, &mut self.eye, &mut self.eyebrow]
    }
}

/// The two side locks, each on its own counter-rotating pivot
#[derive(Debug, Clone)]
pub struct HairSide {
    pub left: Part,
    pub right: Part,
}

impl Default for HairSide {
    fn default() -> Self {
        Self {
            left: Part::new("hair_side_left"),
            right: Part::new("hair_side_right"),
        }
    }
}

/// Receiver of the swing signal sent on every pose change
pub trait SecondaryMotion {
    fn swing(&self);
}

/// Swing trigger attached to the hair mass.
/// Only counts and reports triggers; the motion itself is played elsewhere.
#[derive(Debug, Default)]
pub struct HairSwing {
    swings: Cell<u32>,
}

impl HairSwing {
    /// Get the number of swings triggered so far
    pub fn swing_count(&self) -> u32 {
        self.swings.get()
    }
}

impl SecondaryMotion for HairSwing {
    fn swing(&self) {
        self.swings.set(self.swings.get() + 1);
        log::debug!("Hair swing #{}", self.swings.get());
    }
}

/// Hair mass layer plus its swing trigger
#[derive(Debug)]
pub struct Hair {
    part: Part,
    swing: Rc<HairSwing>,
}

impl Default for Hair {
    fn default() -> Self {
        Self {
            part: Part::new("hair"),
            swing: Rc::new(HairSwing::default()),
        }
    }
}

impl Hair {
    /// Shared handle to the swing trigger
    pub fn motion(&self) -> Rc<dyn SecondaryMotion> {
        self.swing.clone()
    }

    pub fn swing_count(&self) -> u32 {
        self.swing.swing_count()
    }
}

impl VisualFragment for Hair {
    fn name(&self) -> &str {
        self.part.name()
    }

    fn transforms(&self) -> &TransformStack {
        self.part.transforms()
    }

    fn transforms_mut(&mut self) -> &mut TransformStack {
        self.part.transforms_mut()
    }
}
