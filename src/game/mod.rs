// Game modules

pub mod rig;
