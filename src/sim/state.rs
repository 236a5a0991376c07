//! Session state
//!
//! Everything that lives for one play session. Restarting means building a
//! fresh `Session` (and a fresh physics world); nothing is carried over.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::car::CarRig;
use super::collision::{CollisionGate, CollisionReceiver, GamePhase};
use super::input::InputState;
use super::motion::MotionController;
use super::registry::{PlayBounds, ShapeRegistry};
use super::spawner::ShapeSpawner;
use super::world::EntityId;
use crate::settings::Settings;

pub struct Session {
    /// Run seed for reproducibility
    pub seed: u64,
    pub input: InputState,
    pub motion: MotionController,
    pub gate: CollisionGate,
    pub spawner: ShapeSpawner,
    pub shapes: ShapeRegistry,
    pub bounds: PlayBounds,
    pub car: CarRig,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Player body, once the physics world has it
    pub(super) player: Option<EntityId>,
    pub(super) collisions: CollisionReceiver,
    pub(super) rng: Pcg32,
    next_id: u32,
}

impl Session {
    /// Create a session listening on `collisions`
    pub fn new(settings: &Settings, seed: u64, collisions: CollisionReceiver) -> Self {
        log::info!("Session starting with seed {}", seed);
        Self {
            seed,
            input: InputState::new(),
            motion: MotionController::new(settings.move_speed),
            gate: CollisionGate::new(),
            spawner: ShapeSpawner::new(settings.spawn_interval_ms),
            shapes: ShapeRegistry::new(settings.max_live_shapes),
            bounds: settings.bounds(),
            car: CarRig::default(),
            time_ticks: 0,
            player: None,
            collisions,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Bind the car body the motion controller drives
    pub fn attach_player(&mut self, id: EntityId) {
        log::debug!("Player body attached as {}", id);
        self.player = Some(id);
    }

    pub fn player(&self) -> Option<EntityId> {
        self.player
    }

    pub fn phase(&self) -> GamePhase {
        self.gate.current_state()
    }
}
