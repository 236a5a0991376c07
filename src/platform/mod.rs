//! Platform abstraction layer
//!
//! Handles the browser/native boundary for:
//! - Raw input events and how they land in `InputState`
//! - Scoped ownership of listeners and timers, released with the session

use std::cell::RefCell;
use std::rc::Rc;

use crate::sim::InputState;

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Raw device event, as delivered by the host
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    KeyDown(String),
    KeyUp(String),
    PointerMove {
        x: f32,
        y: f32,
        viewport_width: f32,
        viewport_height: f32,
    },
    /// Window lost focus; held keys will never see their key-up
    Blur,
}

/// Apply a raw event. Returns false if the event didn't concern the car.
pub fn apply_input(input: &mut InputState, event: &InputEvent) -> bool {
    match event {
        InputEvent::KeyDown(key) => input.set_key_name(key, true),
        InputEvent::KeyUp(key) => input.set_key_name(key, false),
        InputEvent::PointerMove {
            x,
            y,
            viewport_width,
            viewport_height,
        } => {
            input.set_pointer(*x, *y, *viewport_width, *viewport_height);
            true
        }
        InputEvent::Blur => {
            input.forward = false;
            input.backward = false;
            true
        }
    }
}

type Release = Box<dyn FnOnce()>;

/// Resources held for the lifetime of a session
///
/// Each acquisition registers its release. Releases run exactly once, newest
/// first, on `release_all` or drop.
#[derive(Default)]
pub struct ScopedResources {
    releases: Vec<(&'static str, Release)>,
}

impl ScopedResources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record how to give a resource back
    pub fn acquire(&mut self, label: &'static str, release: impl FnOnce() + 'static) {
        self.releases.push((label, Box::new(release)));
    }

    pub fn len(&self) -> usize {
        self.releases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }

    pub fn release_all(&mut self) {
        while let Some((label, release)) = self.releases.pop() {
            log::debug!("Releasing {}", label);
            release();
        }
    }
}

impl Drop for ScopedResources {
    fn drop(&mut self) {
        self.release_all();
    }
}

impl std::fmt::Debug for ScopedResources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let labels: Vec<_> = self.releases.iter().map(|(label, _)| *label).collect();
        f.debug_struct("ScopedResources").field("held", &labels).finish()
    }
}

/// Shared slot for the running session's resources
///
/// Handles are cheap clones of one slot. Dropping a handle never releases
/// anything; only `end` or `begin` does, so the slot can be handed to
/// optional UI (a restart button) without that UI owning the session.
#[derive(Debug, Clone, Default)]
pub struct SessionScope {
    slot: Rc<RefCell<Option<ScopedResources>>>,
}

impl SessionScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a new session's resources, releasing the previous session's first
    pub fn begin(&self, resources: ScopedResources) {
        self.end();
        *self.slot.borrow_mut() = Some(resources);
    }

    /// Release the current session's resources, if any
    pub fn end(&self) {
        // Take before dropping so releases run without the slot borrowed
        let previous = self.slot.borrow_mut().take();
        drop(previous);
    }

    pub fn is_active(&self) -> bool {
        self.slot.borrow().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_key_events() {
        let mut input = InputState::new();
        assert!(apply_input(&mut input, &InputEvent::KeyDown("w".into())));
        assert!(input.forward);
        assert!(apply_input(&mut input, &InputEvent::KeyUp("w".into())));
        assert!(!input.forward);
        assert!(!apply_input(&mut input, &InputEvent::KeyDown("q".into())));
    }

    #[test]
    fn test_pointer_event() {
        let mut input = InputState::new();
        apply_input(
            &mut input,
            &InputEvent::PointerMove {
                x: 0.0,
                y: 300.0,
                viewport_width: 800.0,
                viewport_height: 600.0,
            },
        );
        assert_eq!(input.pointer_direction(), Vec3::NEG_X);
    }

    #[test]
    fn test_blur_releases_keys_keeps_steering() {
        let mut input = InputState::new();
        apply_input(&mut input, &InputEvent::KeyDown("w".into()));
        apply_input(&mut input, &InputEvent::KeyDown("s".into()));
        input.set_pointer(800.0, 300.0, 800.0, 600.0);

        apply_input(&mut input, &InputEvent::Blur);
        assert!(!input.forward && !input.backward);
        assert_eq!(input.pointer_direction(), Vec3::X);
    }

    #[test]
    fn test_releases_run_once_in_reverse_on_drop() {
        let log = Rc::new(RefCell::new(Vec::new()));
        {
            let mut scope = ScopedResources::new();
            for label in ["keydown", "keyup", "interval"] {
                let log = log.clone();
                scope.acquire(label, move || log.borrow_mut().push(label));
            }
            assert_eq!(scope.len(), 3);
        }
        assert_eq!(*log.borrow(), vec!["interval", "keyup", "keydown"]);
    }

    #[test]
    fn test_explicit_release_then_drop() {
        let count = Rc::new(RefCell::new(0));
        let mut scope = ScopedResources::new();
        let c = count.clone();
        scope.acquire("timer", move || *c.borrow_mut() += 1);

        scope.release_all();
        assert!(scope.is_empty());
        drop(scope);
        assert_eq!(*count.borrow(), 1);
    }

    fn counting_scope(count: &Rc<RefCell<u32>>) -> ScopedResources {
        let mut resources = ScopedResources::new();
        let c = count.clone();
        resources.acquire("listener", move || *c.borrow_mut() += 1);
        resources
    }

    #[test]
    fn test_session_outlives_dropped_handles() {
        let released = Rc::new(RefCell::new(0));
        let session = SessionScope::new();
        session.begin(counting_scope(&released));

        // A consumer that gives up its handle early must not end the session
        let handle = session.clone();
        drop(handle);

        assert!(session.is_active());
        assert_eq!(*released.borrow(), 0);

        session.end();
        assert!(!session.is_active());
        assert_eq!(*released.borrow(), 1);
    }

    #[test]
    fn test_begin_releases_previous_session() {
        let first = Rc::new(RefCell::new(0));
        let second = Rc::new(RefCell::new(0));
        let session = SessionScope::new();

        session.begin(counting_scope(&first));
        session.clone().begin(counting_scope(&second));

        assert_eq!(*first.borrow(), 1);
        assert_eq!(*second.borrow(), 0);
        assert!(session.is_active());
    }
}
