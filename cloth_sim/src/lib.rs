//! Mass-spring cloth simulation
//!
//! A grid of Verlet particles joined by structural, shear and bend springs,
//! relaxed against a stretch ceiling every frame. The cloth can be torn with a
//! mouse ray, dropped onto a cube or sphere, or flown as a flag in gusting wind.
//!
//! - **Particles & springs**: [`particle`], [`spring`], [`network`]
//! - **Modes**: simulation and pinning state machines in [`mode`]
//! - **Interaction**: ray picking and tearing in [`picking`]
//! - **Collisions**: cube/sphere positional response in [`collision`]
//! - **Frame loop**: [`Simulation`] owns all state and runs one step per frame
//! - **Render data**: cloth indices, normals and prop meshes in [`mesh`]

pub mod collision;
pub mod config;
pub mod error;
pub mod mesh;
pub mod mode;
pub mod network;
pub mod particle;
pub mod picking;
pub mod simulation;
pub mod spring;

pub use collision::{CollisionObject, CollisionShape, Contact};
pub use config::{ClothConfig, SpringParams, WindConfig};
pub use error::ClothError;
pub use mode::{ModeBehavior, PinningMode, SimMode};
pub use network::SpringNetwork;
pub use particle::Particle;
pub use picking::{Ray, Viewport};
pub use simulation::{Simulation, StepStats};
pub use spring::{Spring, SpringKind, SpringLimits};
