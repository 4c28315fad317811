//! Common utilities for the cloth simulation
//!
//! This crate provides the window and GPU context, buffer helpers, and the
//! first-person camera shared by the simulation binary.

pub mod graphics;
pub mod camera;

pub use graphics::*;
pub use camera::*;
