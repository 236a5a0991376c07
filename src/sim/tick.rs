//! Per-frame and per-timer entry points
//!
//! The host calls `tick` from its animation frame (after stepping physics) and
//! `spawn_tick` from its interval timer. A world fault skips the rest of the
//! tick and is logged; the session carries on.

use glam::Vec3;

use super::collision::GamePhase;
use super::state::Session;
use super::world::{EntityId, PhysicsWorld, WorldError};

/// What changed during one tick (for the presentation layer)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    /// New car position, if the car moved
    pub car_position: Option<Vec3>,
    /// The game ended on this tick
    pub game_over: bool,
    /// Shapes removed for leaving the play area
    pub culled: Vec<EntityId>,
}

/// Advance the session by one frame
pub fn tick<W: PhysicsWorld + ?Sized>(session: &mut Session, world: &mut W) -> TickOutcome {
    session.time_ticks += 1;
    match try_tick(session, world) {
        Ok(outcome) => outcome,
        Err(e) => {
            log::warn!("Tick {} skipped: {}", session.time_ticks, e);
            TickOutcome::default()
        }
    }
}

fn try_tick<W: PhysicsWorld + ?Sized>(
    session: &mut Session,
    world: &mut W,
) -> Result<TickOutcome, WorldError> {
    let game_over = session.gate.drain(&session.collisions, session.player);

    // Car stops once the game is over; shapes keep falling
    let car_position = match session.phase() {
        GamePhase::Playing => session.motion.tick(&session.input, world, session.player)?,
        GamePhase::GameOver => None,
    };

    let culled = session.shapes.cull(world, &session.bounds);
    for &id in &culled {
        world.despawn(id);
    }

    Ok(TickOutcome {
        car_position,
        game_over,
        culled,
    })
}

/// Feed `elapsed` seconds to the spawner; returns the id of a new shape
///
/// The new shape is handed to the world first and only registered if the
/// world accepted it. A shape evicted by the live cap is despawned.
pub fn spawn_tick<W: PhysicsWorld + ?Sized>(
    session: &mut Session,
    world: &mut W,
    elapsed: f32,
) -> Option<EntityId> {
    let shape = session.spawner.on_tick(elapsed, &mut session.rng)?;
    let id = session.next_entity_id();

    if let Err(e) = world.spawn_shape(id, &shape) {
        log::warn!("Shape {} not spawned: {}", id, e);
        return None;
    }
    log::debug!(
        "Spawned {:?} {} (size {:.2}) at {}",
        shape.kind,
        id,
        shape.size,
        shape.spawn_position
    );

    if let Some(evicted) = session.shapes.insert(id, shape) {
        world.despawn(evicted);
    }
    Some(id)
}
