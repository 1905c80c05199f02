// Engine modules: clock, tweening, transforms, input

pub mod clock;
pub mod input;
pub mod transform;
pub mod tween;
