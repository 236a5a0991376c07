//! Collision-driven game over
//!
//! The physics world publishes contact pairs into a channel; the gate drains
//! it once per tick and latches to `GameOver` on the first contact involving
//! the player's car.

use std::sync::mpsc::{self, Receiver, Sender};

use super::world::EntityId;

/// A contact reported by the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionEvent {
    pub a: EntityId,
    pub b: EntityId,
}

impl CollisionEvent {
    pub fn new(a: EntityId, b: EntityId) -> Self {
        Self { a, b }
    }

    /// True if either side of the pair is `id`
    pub fn involves(&self, id: EntityId) -> bool {
        self.a == id || self.b == id
    }

    /// The partner of `id` in this pair
    pub fn other(&self, id: EntityId) -> Option<EntityId> {
        if self.a == id {
            Some(self.b)
        } else if self.b == id {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Publishing side of the collision channel (held by the physics world)
#[derive(Debug, Clone)]
pub struct CollisionSender(Sender<CollisionEvent>);

impl CollisionSender {
    /// Publish a contact. A torn-down session simply stops listening.
    pub fn send(&self, event: CollisionEvent) {
        if self.0.send(event).is_err() {
            log::debug!("Collision {:?} dropped: session gone", event);
        }
    }
}

/// Consuming side of the collision channel (held by the session)
#[derive(Debug)]
pub struct CollisionReceiver(Receiver<CollisionEvent>);

impl CollisionReceiver {
    /// Pending events, without blocking
    pub fn try_iter(&self) -> impl Iterator<Item = CollisionEvent> + '_ {
        self.0.try_iter()
    }
}

/// Create a connected sender/receiver pair
pub fn collision_channel() -> (CollisionSender, CollisionReceiver) {
    let (tx, rx) = mpsc::channel();
    (CollisionSender(tx), CollisionReceiver(rx))
}

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    /// Car is driving
    #[default]
    Playing,
    /// Car hit something; terminal for this session
    GameOver,
}

/// Two-state latch: Playing -> GameOver, never back
#[derive(Debug, Clone, Default)]
pub struct CollisionGate {
    phase: GamePhase,
}

impl CollisionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one collision. Returns true only on the Playing -> GameOver transition.
    pub fn on_collision(&mut self, involves_controlled_entity: bool) -> bool {
        if self.phase == GamePhase::Playing && involves_controlled_entity {
            self.phase = GamePhase::GameOver;
            return true;
        }
        false
    }

    pub fn current_state(&self) -> GamePhase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Consume every pending event. Events keep draining after game over so
    /// the channel never backs up.
    pub fn drain(&mut self, events: &CollisionReceiver, player: Option<EntityId>) -> bool {
        let mut fired = false;
        for event in events.try_iter() {
            let involves = player.is_some_and(|p| event.involves(p));
            if self.on_collision(involves) {
                if let Some(hit) = player.and_then(|p| event.other(p)) {
                    log::info!("Car collided with {} - game over", hit);
                }
                fired = true;
            }
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_starts_playing() {
        let gate = CollisionGate::new();
        assert_eq!(gate.current_state(), GamePhase::Playing);
        assert!(!gate.is_game_over());
    }

    #[test]
    fn test_collision_is_idempotent() {
        let mut gate = CollisionGate::new();

        assert!(gate.on_collision(true));
        assert_eq!(gate.current_state(), GamePhase::GameOver);

        assert!(!gate.on_collision(true));
        assert_eq!(gate.current_state(), GamePhase::GameOver);
    }

    #[test]
    fn test_unrelated_collision_is_ignored() {
        let mut gate = CollisionGate::new();
        assert!(!gate.on_collision(false));
        assert_eq!(gate.current_state(), GamePhase::Playing);
    }

    #[test]
    fn test_drain_filters_by_player() {
        let (tx, rx) = collision_channel();
        let player = EntityId(1);
        let mut gate = CollisionGate::new();

        // Two shapes bumping each other
        tx.send(CollisionEvent::new(EntityId(4), EntityId(5)));
        assert!(!gate.drain(&rx, Some(player)));
        assert_eq!(gate.current_state(), GamePhase::Playing);

        // Duplicate delivery of the same hit
        tx.send(CollisionEvent::new(EntityId(3), player));
        tx.send(CollisionEvent::new(EntityId(3), player));
        assert!(gate.drain(&rx, Some(player)));
        assert!(gate.is_game_over());
        assert_eq!(rx.try_iter().count(), 0);
    }

    #[test]
    fn test_drain_without_player_never_fires() {
        let (tx, rx) = collision_channel();
        let mut gate = CollisionGate::new();
        tx.send(CollisionEvent::new(EntityId(1), EntityId(2)));
        assert!(!gate.drain(&rx, None));
        assert_eq!(gate.current_state(), GamePhase::Playing);
    }

    #[test]
    fn test_send_after_receiver_dropped() {
        let (tx, rx) = collision_channel();
        drop(rx);
        // Must not panic
        tx.send(CollisionEvent::new(EntityId(1), EntityId(2)));
    }

    #[test]
    fn test_event_partner() {
        let event = CollisionEvent::new(EntityId(1), EntityId(2));
        assert_eq!(event.other(EntityId(1)), Some(EntityId(2)));
        assert_eq!(event.other(EntityId(2)), Some(EntityId(1)));
        assert_eq!(event.other(EntityId(3)), None);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn game_over_is_terminal(hits in proptest::collection::vec(any::<bool>(), 0..32)) {
                let mut gate = CollisionGate::new();
                gate.on_collision(true);
                for involves in hits {
                    gate.on_collision(involves);
                    prop_assert_eq!(gate.current_state(), GamePhase::GameOver);
                }
            }
        }
    }
}
