//! Neon Runner entry point
//!
//! Browser builds drive the simulation from `requestAnimationFrame` and hand
//! each frame to an external renderer. Native builds run a headless demo.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::KeyboardEvent;

    use neon_runner::Tuning;
    use neon_runner::consts::SIM_DT;
    use neon_runner::sim::{FrameClock, RunEvent, RunPhase, RunSnapshot, RunState, TickInput, WorldObject};

    // Hooks the renderer and score store register on `window`
    #[wasm_bindgen(inline_js = "
        export function publish_frame(json) {
            if (typeof window.onRunnerFrame === 'function') {
                window.onRunnerFrame(json);
            }
        }

        export function publish_run_end(json) {
            if (typeof window.onRunEnded === 'function') {
                window.onRunEnded(json);
            }
        }
    ")]
    extern "C" {
        fn publish_frame(json: &str);
        fn publish_run_end(json: &str);
    }

    /// What the renderer gets every frame
    #[derive(serde::Serialize)]
    struct FrameView<'a> {
        snapshot: &'a RunSnapshot,
        objects: &'a [WorldObject],
    }

    /// Game instance holding all state
    struct Game {
        state: RunState,
        clock: FrameClock,
        input: TickInput,
        left: bool,
        right: bool,
        last_time: f64,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            Self {
                state: RunState::new(seed, Tuning::default()),
                clock: FrameClock::new(),
                input: TickInput::default(),
                left: false,
                right: false,
                last_time: 0.0,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            self.input.lateral = match (self.left, self.right) {
                (true, false) => -1.0,
                (false, true) => 1.0,
                _ => 0.0,
            };

            let input = self.input.clone();
            let (_, snapshot) = self.clock.advance(&mut self.state, &input, dt);

            // Clear one-shot inputs after processing
            self.input.jump = false;
            self.input.pause = false;

            for event in self.state.drain_events() {
                if let RunEvent::RunEnded(summary) = event {
                    match serde_json::to_string(&summary) {
                        Ok(json) => publish_run_end(&json),
                        Err(e) => log::warn!("Could not encode run summary: {}", e),
                    }
                }
            }

            let view = FrameView {
                snapshot: &snapshot,
                objects: &self.state.objects,
            };
            if let Ok(json) = serde_json::to_string(&view) {
                publish_frame(&json);
            }
        }

        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.get_element_by_id("scoreEl") {
                el.set_text_content(Some(&(self.state.score.floor() as u64).to_string()));
            }
            if let Some(el) = document.get_element_by_id("tokensEl") {
                el.set_text_content(Some(&self.state.tokens.to_string()));
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {e}").into());
        }

        log::info!("Neon Runner starting...");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(game.clone());
        setup_buttons(game.clone());
        setup_auto_pause(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Neon Runner running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "ArrowLeft" => g.left = true,
                    "ArrowRight" => g.right = true,
                    // Jump is edge-triggered: ignore auto-repeat
                    "Space" if !event.repeat() => {
                        g.input.jump = true;
                        event.prevent_default();
                    }
                    _ => {}
                }
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "ArrowLeft" => g.left = false,
                    "ArrowRight" => g.right = false,
                    _ => {}
                }
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("btnStart") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                match g.state.phase {
                    RunPhase::Paused => {
                        g.state.resume();
                    }
                    _ => {
                        g.state.start_run();
                    }
                }
                g.clock.reset();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("btnPause") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().input.pause = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        // Visibility change (tab switch, minimize)
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                let mut g = game.borrow_mut();
                if g.state.pause() {
                    log::info!("Auto-paused (tab hidden)");
                }
                g.clock.reset();
            }
        });
        let _ = document.add_event_listener_with_callback(
            "visibilitychange",
            closure.as_ref().unchecked_ref(),
        );
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use neon_runner::Tuning;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Neon Runner (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - use the web build to play");

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x5EED);
    let tuning = match args.next() {
        Some(path) => Tuning::load(&path).unwrap_or_else(|e| {
            log::error!("{}; falling back to default tuning", e);
            Tuning::default()
        }),
        None => Tuning::default(),
    };

    run_headless(seed, tuning);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Longest demo run before we stop it ourselves (seconds)
#[cfg(not(target_arch = "wasm32"))]
const DEMO_LIMIT_SECS: f32 = 120.0;

#[cfg(not(target_arch = "wasm32"))]
fn run_headless(seed: u64, tuning: neon_runner::Tuning) {
    use neon_runner::sim::{EndReason, FrameClock, RunEvent, RunState, autopilot::autopilot_input};

    const FRAME_DT: f32 = 1.0 / 60.0;

    let mut state = RunState::new(seed, tuning);
    let mut clock = FrameClock::new();
    state.start_run();

    let mut elapsed = 0.0;
    let mut summary = None;
    while state.is_running() && elapsed < DEMO_LIMIT_SECS {
        let input = autopilot_input(&state);
        clock.advance(&mut state, &input, FRAME_DT);
        elapsed += FRAME_DT;

        for event in state.drain_events() {
            match event {
                RunEvent::PowerUpCollected { kind, .. } => {
                    log::info!("Picked up {}", kind.as_str());
                }
                RunEvent::RunEnded(s) => summary = Some(s),
                _ => {}
            }
        }
    }

    if summary.is_none() {
        log::info!("Demo time limit reached");
        state.stop();
        summary = state.drain_events().into_iter().find_map(|e| match e {
            RunEvent::RunEnded(s) => Some(s),
            _ => None,
        });
    }
    let Some(summary) = summary else {
        log::error!("Run finished without a summary");
        return;
    };
    let ended_by = match summary.reason {
        EndReason::ObstacleHit { id } => format!("hit obstacle #{id}"),
        EndReason::FellOff => "fell off the track".to_string(),
        EndReason::Stopped => "time limit".to_string(),
    };

    println!(
        "Run over ({}): score {}, tokens {}, distance {:.1}, {:.1}s",
        ended_by, summary.score, summary.tokens, summary.distance, summary.duration
    );
    match serde_json::to_string(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => log::warn!("Could not encode run summary: {}", e),
    }
}
