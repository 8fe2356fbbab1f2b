//! Stack 'n' Shake entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;

    use stack_n_shake::consts::SIM_DT;
    use stack_n_shake::persistence::{LocalStorage, MemoryStorage, Storage};
    use stack_n_shake::platform::KeyState;
    use stack_n_shake::scene::FrameSnapshot;
    use stack_n_shake::{Game, SessionConfig};

    // The host page owns drawing; hand it each frame as JSON
    #[wasm_bindgen(inline_js = "
        export function render_frame(json) {
            if (typeof window.renderFrame === 'function') {
                window.renderFrame(JSON.parse(json));
            }
        }
    ")]
    extern "C" {
        fn render_frame(json: &str);
    }

    /// Game instance holding all browser-side state
    struct App {
        game: Game,
        keys: KeyState,
        last_time: f64,
    }

    impl App {
        /// Advance the game and publish the frame
        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            self.last_time = time;

            let input = self.keys.take_input();
            if let Err(e) = self.game.update(dt, &input) {
                log::error!("Update failed: {}", e);
            }

            for event in self.game.drain_events() {
                log::debug!("{:?}", event);
            }

            let snapshot = self.game.snapshot();
            self.update_hud(&snapshot);
            match serde_json::to_string(&snapshot) {
                Ok(json) => render_frame(&json),
                Err(e) => log::warn!("Snapshot serialization failed: {}", e),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, snapshot: &FrameSnapshot) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            let set_text = |id: &str, text: &str| {
                if let Some(el) = document.get_element_by_id(id) {
                    el.set_text_content(Some(text));
                }
            };
            let set_visible = |id: &str, visible: bool| {
                if let Some(el) = document.get_element_by_id(id) {
                    let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
                }
            };

            set_visible("main-menu", matches!(snapshot, FrameSnapshot::MainMenu));
            set_visible("hud", matches!(snapshot, FrameSnapshot::Playing(_)));
            set_visible("game-over", matches!(snapshot, FrameSnapshot::GameOver { .. }));

            match snapshot {
                FrameSnapshot::Playing(round) => {
                    set_text("hud-score", &round.score.to_string());
                    set_text("hud-timer", &round.timer.to_string());
                }
                FrameSnapshot::GameOver {
                    score, high_scores, ..
                } => {
                    set_text("final-score", &score.to_string());
                    let table: Vec<String> = high_scores.scores.iter().map(|s| s.to_string()).collect();
                    set_text("high-scores", &table.join("\n"));
                }
                FrameSnapshot::MainMenu => {}
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Stack 'n' Shake starting...");

        let storage: Box<dyn Storage> = match LocalStorage::open() {
            Some(storage) => Box::new(storage),
            None => {
                log::warn!("LocalStorage unavailable, high scores will not persist");
                Box::new(MemoryStorage::new())
            }
        };
        let config = SessionConfig::load(storage.as_ref());

        let seed = js_sys::Date::now() as u64;
        let game = match Game::new(config, storage, seed) {
            Ok(game) => game,
            Err(e) => {
                log::error!("Cannot start: {}", e);
                return;
            }
        };
        log::info!("Game initialized with seed: {}", seed);

        let app = Rc::new(RefCell::new(App {
            game,
            keys: KeyState::new(),
            last_time: 0.0,
        }));

        setup_input_handlers(app.clone());
        request_animation_frame(app);

        log::info!("Stack 'n' Shake running!");
    }

    fn setup_input_handlers(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard down
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if app.borrow_mut().keys.key_down(&event.key()) {
                    event.prevent_default();
                }
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard up
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                app.borrow_mut().keys.key_up(&event.key());
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur: drop held keys so the platform doesn't run away
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().keys.release_all();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Stack 'n' Shake (native) starting...");
    log::info!("Native mode runs a headless autopilot round - serve the wasm build for the playable version");

    if let Err(e) = demo::run() {
        log::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless autopilot: catch pieces, shake the tower off once it is tall enough
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use stack_n_shake::consts::SIM_DT;
    use stack_n_shake::persistence::MemoryStorage;
    use stack_n_shake::scene::FrameSnapshot;
    use stack_n_shake::sim::{GameEvent, RoundSnapshot, TickInput};
    use stack_n_shake::{Game, GameError, SceneKind, SessionConfig};

    /// Tower height at which the autopilot starts shaking
    const SHAKE_AT: usize = 3;

    pub fn run() -> Result<(), GameError> {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let config = SessionConfig {
            round_seconds: 30,
            ..Default::default()
        };
        let mut game = Game::new(config, Box::new(MemoryStorage::new()), seed)?;
        log::info!("Seed: {}", seed);

        game.update(
            SIM_DT,
            &TickInput {
                start: true,
                ..Default::default()
            },
        )?;

        let mut pilot = Autopilot::default();
        while game.scene_kind() == SceneKind::Playing {
            let input = match game.snapshot() {
                FrameSnapshot::Playing(round) => pilot.input(&round),
                _ => TickInput::default(),
            };
            game.update(SIM_DT, &input)?;

            for event in game.drain_events() {
                match event {
                    GameEvent::Collapse {
                        pieces,
                        points,
                        bonus_secs,
                    } => log::info!("Collapse! {} pieces, +{} points, +{}s", pieces, points, bonus_secs),
                    GameEvent::StackGrew { count } => log::info!("Tower height {}", count),
                    GameEvent::RoundOver { score } => log::info!("Round over, score {}", score),
                    other => log::debug!("{:?}", other),
                }
            }
        }

        if let FrameSnapshot::GameOver {
            score,
            high_scores,
            rank,
        } = game.snapshot()
        {
            println!("Final score: {}", score);
            if let Some(rank) = rank {
                println!("New high score at rank {}", rank);
            }
            for (i, s) in high_scores.scores.iter().enumerate() {
                println!("  {}. {}", i + 1, s);
            }
        }
        Ok(())
    }

    /// Chases the lowest falling piece; once the tower is `SHAKE_AT` tall it
    /// slams the platform wall to wall until the tower falls off.
    #[derive(Debug, Default)]
    struct Autopilot {
        /// -1 / 1 while shaking, 0 while catching
        shake_dir: i8,
    }

    impl Autopilot {
        fn input(&mut self, round: &RoundSnapshot) -> TickInput {
            let platform = &round.platform;
            let half = platform.width / 2.0;

            if round.stacked == 0 {
                self.shake_dir = 0;
            } else if round.stacked >= SHAKE_AT && self.shake_dir == 0 {
                self.shake_dir = if platform.x < round.field_width / 2.0 { -1 } else { 1 };
            }

            if self.shake_dir != 0 {
                if self.shake_dir < 0 && platform.x - half <= 0.5 {
                    self.shake_dir = 1;
                } else if self.shake_dir > 0 && platform.x + half >= round.field_width - 0.5 {
                    self.shake_dir = -1;
                }
                return TickInput {
                    left: self.shake_dir < 0,
                    right: self.shake_dir > 0,
                    start: false,
                };
            }

            let target = round
                .pieces
                .iter()
                .filter(|p| !p.stacked)
                .max_by(|a, b| a.y.total_cmp(&b.y))
                .map(|p| p.x)
                .unwrap_or(round.field_width / 2.0);

            let delta = target - platform.x;
            TickInput {
                left: delta < -5.0,
                right: delta > 5.0,
                start: false,
            }
        }
    }
}
