//! Layered 2D character head rig.
//!
//! A [`game::rig::HeadJoint`] owns the neck rotation shared by every head
//! layer and tweens it between tilt poses on a [`engine::clock::FrameClock`].

pub mod core;
pub mod engine;
pub mod game;
