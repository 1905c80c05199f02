// Core utilities shared by the engine and the rig

pub mod math;
