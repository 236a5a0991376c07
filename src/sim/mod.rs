//! Simulation core
//!
//! All gameplay logic lives here. This module stays free of rendering and
//! platform dependencies:
//! - One tick per host frame, input read before motion
//! - Seeded RNG only, injectable for tests
//! - Stable iteration order (by entity ID)
//! - Physics reached only through `PhysicsWorld` and the collision channel

pub mod car;
pub mod collision;
pub mod input;
pub mod motion;
pub mod registry;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod world;

pub use car::{CarPart, CarRig, PartRole, PartShape};
pub use collision::{
    CollisionEvent, CollisionGate, CollisionReceiver, CollisionSender, GamePhase, collision_channel,
};
pub use input::{InputState, Key};
pub use motion::MotionController;
pub use registry::{PlayBounds, ShapeRegistry};
pub use spawner::{ShapeDescriptor, ShapeKind, ShapeRandom, ShapeSpawner};
pub use state::Session;
pub use tick::{TickOutcome, spawn_tick, tick};
pub use world::{EntityId, KinematicWorld, PhysicsWorld, WorldError};
