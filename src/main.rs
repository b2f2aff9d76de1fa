//! Pillar Run entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use pillar_run::consts::*;
    use pillar_run::renderer::{Camera, RenderState, Scene};
    use pillar_run::sim::{GameEvent, GameState, TickInput, tick};
    use pillar_run::{Hud, Settings};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        hud: Hud,
    }

    impl Game {
        fn new(settings: Settings, seed: u64) -> Self {
            Self {
                state: GameState::new(settings, seed),
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                hud: Hud::new(),
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(MAX_FRAME_DT);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.jump = false;
            }

            for event in self.state.drain_events() {
                if let GameEvent::GameOver { score } = event {
                    // Blocks the page until dismissed; the next frame's dt is clamped
                    if let Some(window) = web_sys::window() {
                        let _ = window.alert_with_message(&format!("Game Over! Score: {}", score));
                    }
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                let scene = Scene::from_state(&self.state);
                let camera = Camera::from_rig(
                    &self.state.camera,
                    self.state.settings.fov_degrees,
                    render_state.aspect(),
                );
                match render_state.render(&scene, &camera) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            let Some(text) = self.hud.sync(self.state.score) else {
                return;
            };
            if let Some(el) = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.query_selector("#hud-score").ok().flatten())
            {
                el.set_text_content(Some(text));
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Pillar Run starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let dpr = window.device_pixel_ratio();
        let inner_w = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(canvas.client_width() as f64);
        let inner_h = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(canvas.client_height() as f64);
        let width = (inner_w * dpr) as u32;
        let height = (inner_h * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let quality = settings.quality;
        let game = Rc::new(RefCell::new(Game::new(settings, seed)));

        log::info!("Game initialized with seed: {}", seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height, quality).await;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(game.clone());

        request_animation_frame(game);

        log::info!("Pillar Run running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            let mut g = game.borrow_mut();
            match event.key().as_str() {
                " " => {
                    event.prevent_default();
                    g.input.jump = true;
                }
                "i" | "I" => {
                    g.input.autopilot = !g.input.autopilot;
                    log::info!("Autopilot: {}", g.input.autopilot);
                }
                _ => {}
            }
        });
        let _ =
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
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

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            // Once per frame: only the score after the last substep is ever visible
            g.update_hud();
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use serde::Serialize;

    use pillar_run::Settings;
    use pillar_run::consts::SIM_DT;
    use pillar_run::sim::{GameEvent, GameState, TickInput, tick};

    /// One minute of play at 60 Hz
    pub const DEFAULT_TICKS: u64 = 3600;
    pub const DEFAULT_SEED: u64 = 12345;

    /// What a headless run prints when it finishes
    #[derive(Debug, Serialize)]
    pub struct RunSummary {
        pub seed: u64,
        pub ticks: u64,
        pub score: u64,
        pub best_score: u64,
        pub pairs_passed: u64,
        pub game_overs: u64,
        pub recycled: u64,
    }

    /// Let the autopilot play for `ticks` fixed steps
    pub fn run(settings: Settings, ticks: u64) -> RunSummary {
        let seed = settings.seed.unwrap_or(DEFAULT_SEED);
        let mut state = GameState::new(settings, seed);
        log::info!("Headless run with seed {} for {} ticks", state.seed, ticks);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };

        let mut summary = RunSummary {
            seed: state.seed,
            ticks,
            score: 0,
            best_score: 0,
            pairs_passed: 0,
            game_overs: 0,
            recycled: 0,
        };

        for _ in 0..ticks {
            tick(&mut state, &input, SIM_DT);
            for event in state.drain_events() {
                match event {
                    GameEvent::PairPassed { score, .. } => {
                        summary.pairs_passed += 1;
                        summary.best_score = summary.best_score.max(score);
                    }
                    GameEvent::GameOver { score } => {
                        log::info!("Run {} over at tick {}", state.runs, state.time_ticks);
                        summary.game_overs += 1;
                        summary.best_score = summary.best_score.max(score);
                    }
                    GameEvent::Recycled { .. } => summary.recycled += 1,
                    GameEvent::Collision { pair, side } => {
                        log::debug!("Hit {:?} pillar of pair {}", side, pair);
                    }
                }
            }
        }

        summary.score = state.score;
        summary
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use pillar_run::Settings;

    env_logger::init();
    log::info!("Pillar Run (native) starting...");
    log::info!("Native mode runs headless - use `trunk serve` for the web version");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load_from_path(std::path::Path::new(&path))?,
        None => Settings::default(),
    };
    let ticks = match args.next() {
        Some(n) => n
            .parse()
            .with_context(|| format!("tick count {:?} is not a number", n))?,
        None => headless::DEFAULT_TICKS,
    };

    let summary = headless::run(settings, ticks);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
