// Transform stacks for layered 2D fragments

use bytemuck::{Pod, Zeroable};
use glam::{Affine2, Mat3, Vec2};
use std::cell::Cell;
use std::rc::Rc;

/// Rotation in degrees about a fixed pivot
///
/// Fragments hold this through a [`RotateHandle`] and only read it. The angle
/// is written by the joint that owns the rotation.
#[derive(Debug)]
pub struct Rotate {
    pivot: Vec2,
    angle: Cell<f32>,
}

/// Shared, read-only view of a rotation
pub type RotateHandle = Rc<Rotate>;

impl Rotate {
    /// Create a new rotation about `pivot`
    pub fn new(angle: f32, pivot: Vec2) -> Self {
        Self {
            pivot,
            angle: Cell::new(angle),
        }
    }

    /// Create a shared rotation handle
    pub fn shared(angle: f32, pivot: Vec2) -> RotateHandle {
        Rc::new(Self::new(angle, pivot))
    }

    /// Get the pivot coordinate
    pub fn pivot(&self) -> Vec2 {
        self.pivot
    }

    /// Get the current angle in degrees
    pub fn angle(&self) -> f32 {
        self.angle.get()
    }

    pub(crate) fn set_angle(&self, degrees: f32) {
        self.angle.set(degrees);
    }

    /// Affine equivalent: translate(pivot) * rotate(angle) * translate(-pivot)
    pub fn matrix(&self) -> Affine2 {
        Affine2::from_translation(self.pivot)
            * Affine2::from_angle(self.angle().to_radians())
            * Affine2::from_translation(-self.pivot)
    }
}

/// Ordered list of rotations applied to a fragment
///
/// The first entry is the outermost transform, so a point is transformed by
/// the last entry first.
#[derive(Debug, Clone, Default)]
pub struct TransformStack {
    transforms: Vec<RotateHandle>,
}

impl TransformStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a shared rotation
    pub fn push_rotate(&mut self, rotate: &RotateHandle) {
        self.transforms.push(Rc::clone(rotate));
    }

    /// Get the number of transforms
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Check if the stack is empty
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Count how many times this exact rotation appears in the stack
    pub fn count_rotate(&self, rotate: &RotateHandle) -> usize {
        self.transforms
            .iter()
            .filter(|r| Rc::ptr_eq(r, rotate))
            .count()
    }

    /// Position of this exact rotation in the stack
    pub fn position_of(&self, rotate: &RotateHandle) -> Option<usize> {
        self.transforms
            .iter()
            .position(|r| Rc::ptr_eq(r, rotate))
    }

    /// Compose all transforms in stack order
    pub fn compose(&self) -> Affine2 {
        self.transforms
            .iter()
            .fold(Affine2::IDENTITY, |acc, t| acc * t.matrix())
    }

    /// Transform a local point into rig space
    pub fn apply(&self, point: Vec2) -> Vec2 {
        self.compose().transform_point2(point)
    }
}

/// A drawable part of the rig that carries a transform stack
pub trait VisualFragment {
    /// Part name (for logs and debugging)
    fn name(&self) -> &str;

    fn transforms(&self) -> &TransformStack;

    fn transforms_mut(&mut self) -> &mut TransformStack;

    /// Combined transform to hand to the renderer
    fn world_transform(&self) -> Affine2 {
        self.transforms().compose()
    }
}

/// Fragment transform uniform for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct FragmentUniform {
    /// 3x3 matrix, columns padded to vec4 for WGSL alignment
    pub transform: [[f32; 4]; 3],
}

impl FragmentUniform {
    /// Create a new uniform from a fragment
    pub fn new(fragment: &dyn VisualFragment) -> Self {
        let cols = Mat3::from(fragment.world_transform()).to_cols_array_2d();
        Self {
            transform: cols.map(|[x, y, z]| [x, y, z, 0.0]),
        }
    }
}
