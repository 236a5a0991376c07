//! Drive Dodge entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;

    use drive_dodge::Settings;
    use drive_dodge::consts::*;
    use drive_dodge::platform::{ScopedResources, SessionScope, apply_input, web};
    use drive_dodge::sim::{
        GamePhase, KinematicWorld, PhysicsWorld, Session, collision_channel, spawn_tick, tick,
    };

    /// Game instance holding one session and its physics world
    struct Game {
        settings: Settings,
        session: Session,
        world: KinematicWorld,
        last_time: f64,
        last_phase: GamePhase,
    }

    impl Game {
        fn new(settings: Settings, seed: u64) -> Result<Self, JsValue> {
            let (tx, rx) = collision_channel();
            let mut world = KinematicWorld::new(tx);
            let mut session = Session::new(&settings, seed, rx);

            let car = session.next_entity_id();
            world
                .add_car(car, CAR_START, session.car.body_half_extents())
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
            session.attach_player(car);

            Ok(Self {
                settings,
                session,
                world,
                last_time: 0.0,
                last_phase: GamePhase::Playing,
            })
        }

        /// Step physics, then the simulation
        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                (((time - self.last_time) / 1000.0) as f32).min(0.1)
            } else {
                SIM_DT
            };
            self.last_time = time;

            self.world.step(dt);
            let outcome = tick(&mut self.session, &mut self.world);
            if outcome.game_over {
                log::info!("Game over after {} ticks", self.session.time_ticks);
            }
        }

        /// Update HUD and overlay in DOM
        fn update_hud(&mut self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if self.settings.show_hud {
                if let Some(el) = document.get_element_by_id("hud") {
                    let pos = self
                        .session
                        .player()
                        .and_then(|id| self.world.position(id))
                        .unwrap_or(CAR_START);
                    el.set_text_content(Some(&format!(
                        "x {:.1}  z {:.1}  shapes {}",
                        pos.x,
                        pos.z,
                        self.session.shapes.len()
                    )));
                }
            }

            let phase = self.session.phase();
            if phase == self.last_phase {
                return;
            }
            self.last_phase = phase;

            // Show/hide game over
            if let Some(el) = document.get_element_by_id("game-over") {
                let class = if phase == GamePhase::GameOver { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }
        }
    }

    type SharedGame = Rc<RefCell<Game>>;

    thread_local! {
        /// Resources of the running session; lives as long as the page
        static SESSION: SessionScope = SessionScope::new();
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Drive Dodge starting...");

        let settings = Settings::load();
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let game: SharedGame = Rc::new(RefCell::new(Game::new(settings, seed)?));

        let session = SESSION.with(SessionScope::clone);
        session.begin(start_session(&game)?);
        setup_restart_button(game, session)?;

        log::info!("Drive Dodge running!");
        Ok(())
    }

    /// Acquire listeners, spawn timer and frame loop for the current session
    fn start_session(game: &SharedGame) -> Result<ScopedResources, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let mut scope = ScopedResources::new();

        // Keyboard throttle
        for (event_type, pressed) in [("keydown", true), ("keyup", false)] {
            let game = game.clone();
            web::listen(&mut scope, &window, event_type, move |event| {
                if let Some(input) = web::key_event(&event, pressed) {
                    apply_input(&mut game.borrow_mut().session.input, &input);
                }
            })?;
        }

        // Pointer steering
        {
            let game = game.clone();
            let win = window.clone();
            web::listen(&mut scope, &window, "mousemove", move |event| {
                if let Some(input) = web::pointer_event(&win, &event) {
                    apply_input(&mut game.borrow_mut().session.input, &input);
                }
            })?;
        }

        // Focus loss: keys held now will never report key-up
        {
            let game = game.clone();
            web::listen(&mut scope, &window, "blur", move |_event| {
                let input = drive_dodge::platform::InputEvent::Blur;
                apply_input(&mut game.borrow_mut().session.input, &input);
            })?;
        }

        // Falling shapes
        {
            let game = game.clone();
            let period_ms = game.borrow().settings.spawn_interval_ms;
            let elapsed = period_ms as f32 / 1000.0;
            web::interval(&mut scope, &window, period_ms, move || {
                let mut guard = game.borrow_mut();
                let g = &mut *guard;
                spawn_tick(&mut g.session, &mut g.world, elapsed);
            })?;
        }

        // Game loop
        {
            let game = game.clone();
            web::frame_loop(&mut scope, &window, move |time| {
                let mut g = game.borrow_mut();
                g.frame(time);
                g.update_hud();
            })?;
        }

        Ok(scope)
    }

    fn setup_restart_button(game: SharedGame, session: SessionScope) -> Result<(), JsValue> {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return Ok(());
        };
        let Some(btn) = document.get_element_by_id("restart-btn") else {
            log::warn!("No #restart-btn element, restart disabled");
            return Ok(());
        };

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            // Release the old session's listeners and timers before rebuilding
            session.end();

            let settings = game.borrow().settings.clone();
            let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
            match Game::new(settings, seed) {
                Ok(fresh) => *game.borrow_mut() = fresh,
                Err(e) => {
                    log::error!("Restart failed: {:?}", e);
                    return;
                }
            }
            if let Some(el) = document.get_element_by_id("game-over") {
                let _ = el.set_attribute("class", "hidden");
            }

            match start_session(&game) {
                Ok(resources) => session.begin(resources),
                Err(e) => log::error!("Restart failed: {:?}", e),
            }
            log::info!("Game restarted with seed: {}", seed);
        });
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Drive Dodge (native) starting...");
    log::info!("Native mode runs headless - run with `trunk serve` for the web version");

    headless::run(drive_dodge::Settings::load());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted run against the kinematic world: full throttle, steering slowly
/// sweeping around the screen, until the car is hit or time runs out
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use drive_dodge::Settings;
    use drive_dodge::consts::*;
    use drive_dodge::platform::{InputEvent, apply_input};
    use drive_dodge::sim::{
        GamePhase, KinematicWorld, PhysicsWorld, Session, collision_channel, spawn_tick, tick,
    };

    const MAX_SECONDS: f32 = 60.0;
    const VIEWPORT: (f32, f32) = (800.0, 600.0);

    pub fn run(settings: Settings) {
        let seed = settings.seed.unwrap_or(12345);
        let (tx, rx) = collision_channel();
        let mut world = KinematicWorld::new(tx);
        let mut session = Session::new(&settings, seed, rx);

        let car = session.next_entity_id();
        if let Err(e) = world.add_car(car, CAR_START, session.car.body_half_extents()) {
            log::error!("Could not place car: {}", e);
            return;
        }
        session.attach_player(car);
        apply_input(&mut session.input, &InputEvent::KeyDown("w".into()));

        let max_ticks = (MAX_SECONDS / SIM_DT) as u64;
        while session.time_ticks < max_ticks {
            let t = session.time_ticks as f32 * SIM_DT;
            let pointer = InputEvent::PointerMove {
                x: VIEWPORT.0 * (0.5 + 0.4 * (t * 0.5).cos()),
                y: VIEWPORT.1 * (0.5 + 0.4 * (t * 0.5).sin()),
                viewport_width: VIEWPORT.0,
                viewport_height: VIEWPORT.1,
            };
            apply_input(&mut session.input, &pointer);

            world.step(SIM_DT);
            spawn_tick(&mut session, &mut world, SIM_DT);
            tick(&mut session, &mut world);

            if session.phase() == GamePhase::GameOver {
                break;
            }
        }

        let pos = world.position(car).unwrap_or(CAR_START);
        match session.phase() {
            GamePhase::GameOver => log::info!(
                "Game over after {:.1}s at ({:.2}, {:.2}, {:.2})",
                session.time_ticks as f32 * SIM_DT,
                pos.x,
                pos.y,
                pos.z
            ),
            GamePhase::Playing => log::info!("Survived {:.0}s", MAX_SECONDS),
        }
        log::info!(
            "{} shapes spawned, {} live",
            session.spawner.spawned(),
            session.shapes.len()
        );
    }
}
