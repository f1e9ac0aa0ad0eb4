//! Onslaught entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use onslaught::consts::*;
    use onslaught::renderer::SdfRenderState;
    use onslaught::settings::Settings;
    use onslaught::sim::{CameraMode, GamePhase, GameState, PlayerAction, TickInput, tick};

    /// Pending key events beyond this are dropped instead of queued
    const PENDING_INPUT_CAP: usize = 32;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        render_state: Option<SdfRenderState>,
        accumulator: f32,
        last_time: f64,
        /// Queued key events, drained one per simulation tick
        pending: VecDeque<PlayerAction>,
        pause_pending: bool,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            Self {
                state: GameState::new(seed),
                settings: Settings::load(),
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                pending: VecDeque::new(),
                pause_pending: false,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        fn queue_action(&mut self, action: PlayerAction) {
            if self.pending.len() < PENDING_INPUT_CAP {
                self.pending.push_back(action);
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = TickInput {
                    action: self.pending.pop_front(),
                    pause: std::mem::take(&mut self.pause_pending),
                };
                tick(&mut self.state, &input);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.state, &self.settings, time) {
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
        fn update_hud(&self) {
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();

            // Enemies remaining
            if let Some(el) = document
                .query_selector("#hud-enemies .hud-value")
                .ok()
                .flatten()
            {
                el.set_text_content(Some(&self.state.enemies.len().to_string()));
            }

            // Traps placed and still armed
            if let Some(el) = document
                .query_selector("#hud-traps .hud-value")
                .ok()
                .flatten()
            {
                el.set_text_content(Some(&self.state.traps.len().to_string()));
            }

            // Camera mode
            if let Some(el) = document
                .query_selector("#hud-camera .hud-value")
                .ok()
                .flatten()
            {
                let label = match self.state.camera_mode {
                    CameraMode::FirstPerson => "1st",
                    CameraMode::ThirdPerson => "3rd",
                };
                el.set_text_content(Some(label));
            }

            // FPS
            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    let _ = el.set_attribute("class", "hud-item");
                    if let Some(val) = document.query_selector("#hud-fps .hud-value").ok().flatten()
                    {
                        val.set_text_content(Some(&self.fps.to_string()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }

            // Show/hide pause overlay
            if let Some(el) = document.get_element_by_id("pause-overlay") {
                if self.state.phase == GamePhase::Paused {
                    let _ = el.set_attribute("class", "");
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }

            // Show/hide victory overlay
            if let Some(el) = document.get_element_by_id("victory") {
                if self.state.phase == GamePhase::Cleared {
                    let _ = el.set_attribute("class", "");
                    if let Some(ticks_el) = document.get_element_by_id("victory-ticks") {
                        ticks_el.set_text_content(Some(&self.state.time_ticks.to_string()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Onslaught starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        onslaught::sim::spawn_enemies(&mut game.borrow_mut().state);

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
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

        let render_state = SdfRenderState::new(surface, &adapter, width, height).await;
        game.borrow_mut().render_state = Some(render_state);

        // Set up input handlers
        setup_input_handlers(game.clone());

        // Set up auto-pause on visibility change
        setup_auto_pause(game.clone());

        // Show HUD
        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        // Start game loop
        request_animation_frame(game);

        log::info!("Onslaught running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            let mut g = game.borrow_mut();
            let action = match event.key().as_str() {
                "ArrowLeft" => Some(PlayerAction::TurnLeft),
                "ArrowRight" => Some(PlayerAction::TurnRight),
                "ArrowUp" => Some(PlayerAction::Forward),
                "ArrowDown" => Some(PlayerAction::Backward),
                " " => Some(PlayerAction::PlaceTrap),
                "c" | "C" => Some(PlayerAction::ToggleView),
                "Escape" => {
                    g.pause_pending = true;
                    None
                }
                _ => return,
            };
            event.prevent_default();
            if let Some(action) = action {
                g.queue_action(action);
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
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

            g.update(dt, time);
            g.render(time);
            g.update_hud();
        }

        request_animation_frame(game);
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.state.phase == GamePhase::Playing {
                        g.pause_pending = true;
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.state.phase == GamePhase::Playing {
                    g.pause_pending = true;
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use onslaught::sim::{GamePhase, GameState, PlayerAction, TickInput, spawn_enemies, tick};

    env_logger::init();
    log::info!("Onslaught (native) starting headless demo...");

    let mut state = GameState::new(0xDEAD_BEEF);
    spawn_enemies(&mut state);

    // Scripted run: sweep the arena laying traps until it clears or the
    // tick budget runs out.
    let mut traps_placed = 0u32;
    while state.phase != GamePhase::Cleared && state.time_ticks < 20_000 {
        let action = if state.time_ticks % 45 == 0 {
            traps_placed += 1;
            Some(PlayerAction::PlaceTrap)
        } else if state.time_ticks % 7 == 0 {
            Some(PlayerAction::TurnLeft)
        } else {
            Some(PlayerAction::Forward)
        };
        tick(
            &mut state,
            &TickInput {
                action,
                ..Default::default()
            },
        );
    }

    log::info!(
        "Demo finished: {:?} after {} ticks, {} traps placed, {} enemies and {} armed traps left",
        state.phase,
        state.time_ticks,
        traps_placed,
        state.enemies.len(),
        state.traps.len()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
