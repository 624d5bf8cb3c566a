//! Hoop Arcade entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use hoop_arcade::camera::{FollowCamera, pointer_to_ndc};
    use hoop_arcade::consts::FRAME_MS;
    use hoop_arcade::controls::KeyState;
    use hoop_arcade::platform::FetchTransport;
    use hoop_arcade::protocol::UPDATE_BALL_PATH;
    use hoop_arcade::renderer::vertex::colors;
    use hoop_arcade::renderer::{RenderState, backing_size, scene};
    use hoop_arcade::sim::{
        Game2d, Game3d, GameEvent, LocalStepper, RemoteStepper,
    };
    use hoop_arcade::Court2dTuning;
    use hoop_arcade::tuning::from_json_or_default;

    /// Which demo is running
    enum Mode {
        Court3d {
            game: Game3d,
            camera: FollowCamera,
        },
        Court2d {
            game: Game2d,
            stepper: LocalStepper,
        },
        Remote {
            game: Game2d,
            stepper: RemoteStepper<FetchTransport>,
        },
    }

    impl Mode {
        /// `?mode=court3d|court2d|remote`, optional `?endpoint=` for the
        /// remote physics URL and `?tuning=` JSON overriding game constants
        fn from_query(
            mode: Option<String>,
            endpoint: Option<String>,
            tuning: Option<String>,
        ) -> Self {
            let tuning = tuning.as_deref();
            match mode.as_deref() {
                Some("court2d") => {
                    let tuning: Court2dTuning = from_json_or_default(tuning);
                    Mode::Court2d {
                        stepper: LocalStepper::new(tuning.flight),
                        game: Game2d::new(tuning),
                    }
                }
                Some("remote") => {
                    let tuning: Court2dTuning = from_json_or_default(tuning);
                    let url = endpoint.unwrap_or_else(|| UPDATE_BALL_PATH.to_string());
                    log::info!("Ball physics served by {}", url);
                    Mode::Remote {
                        stepper: RemoteStepper::new(FetchTransport::new(url), tuning.flight),
                        game: Game2d::new(tuning),
                    }
                }
                _ => Mode::Court3d {
                    game: Game3d::new(from_json_or_default(tuning)),
                    camera: FollowCamera::default(),
                },
            }
        }

        fn name(&self) -> &'static str {
            match self {
                Mode::Court3d { .. } => "court3d",
                Mode::Court2d { .. } => "court2d",
                Mode::Remote { .. } => "remote",
            }
        }
    }

    /// Game instance holding all state
    struct Game {
        mode: Mode,
        render_state: Option<RenderState>,
        keys: KeyState,
        /// One-shot commands collected between frames
        reset_ball: bool,
        reset_game: bool,
        last_time: f64,
        /// Canvas size in CSS pixels (pointer coordinates)
        css_size: (f32, f32),
    }

    impl Game {
        fn new(mode: Mode) -> Self {
            Self {
                mode,
                render_state: None,
                keys: KeyState::new(),
                reset_ball: false,
                reset_game: false,
                last_time: 0.0,
                css_size: (1.0, 1.0),
            }
        }

        fn aspect(&self) -> f32 {
            self.render_state
                .as_ref()
                .map(|r| r.aspect())
                .unwrap_or(self.css_size.0 / self.css_size.1)
        }

        /// Pointer position to a point on the 3D court
        fn pointer_ground(&self, x: f32, y: f32) -> Option<glam::Vec3> {
            let Mode::Court3d { camera, .. } = &self.mode else {
                return None;
            };
            let ndc = pointer_to_ndc(x, y, self.css_size.0, self.css_size.1);
            camera.ground_point(ndc, self.aspect())
        }

        /// Advance one display frame
        fn update(&mut self, frame_ms: f32) -> Vec<GameEvent> {
            match &mut self.mode {
                Mode::Court3d { game, camera } => {
                    let mut input = self.keys.input_3d();
                    input.reset_ball = std::mem::take(&mut self.reset_ball);
                    input.reset_game = std::mem::take(&mut self.reset_game);
                    let events = game.tick(&input, frame_ms);
                    camera.follow(game.player);
                    events
                }
                Mode::Court2d { game, stepper } => {
                    if std::mem::take(&mut self.reset_game) {
                        game.reset(stepper);
                    }
                    game.tick(&self.keys.input_2d(), stepper)
                }
                Mode::Remote { game, stepper } => {
                    if std::mem::take(&mut self.reset_game) {
                        game.reset(stepper);
                    }
                    game.tick(&self.keys.input_2d(), stepper)
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let aspect = self.aspect();
            let (vertices, clear) = match &self.mode {
                Mode::Court3d { game, camera } => {
                    (scene::court3d(game, camera, aspect), colors::BACKGROUND_3D)
                }
                Mode::Court2d { game, .. } | Mode::Remote { game, .. } => {
                    (scene::court2d(game, aspect), colors::BACKGROUND_2D)
                }
            };

            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices, clear) {
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

        /// Update score text in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let text = match &self.mode {
                Mode::Court3d { game, .. } => format!(
                    "Player: {}  \u{00A0}\u{00A0} Opponent: {}",
                    game.score_player, game.score_opponent
                ),
                Mode::Court2d { game, .. } | Mode::Remote { game, .. } => {
                    format!("Score: {}", game.score)
                }
            };
            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&text));
            }
        }
    }

    fn log_events(events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::Scored { by, side } => {
                    log::info!("{:?} scored through the {:?} hoop", by, side)
                }
                GameEvent::PickedUp(holder) => log::debug!("{:?} has the ball", holder),
                other => log::debug!("{:?}", other),
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Hoop Arcade starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let params = window
            .location()
            .search()
            .ok()
            .and_then(|s| web_sys::UrlSearchParams::new_with_str(&s).ok());
        let mode = Mode::from_query(
            params.as_ref().and_then(|p| p.get("mode")),
            params.as_ref().and_then(|p| p.get("endpoint")),
            params.as_ref().and_then(|p| p.get("tuning")),
        );
        log::info!("Mode: {}", mode.name());

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let game = Rc::new(RefCell::new(Game::new(mode)));
        let (width, height) = fit_canvas(&canvas, &mut game.borrow_mut());

        // Initialize WebGPU (falls back to WebGL2)
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
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

        let render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .expect("Failed to create device");
        game.borrow_mut().render_state = Some(render_state);

        setup_keyboard(game.clone());
        setup_pointer(&canvas, game.clone());
        setup_reset_button(game.clone());
        setup_resize(&canvas, game.clone());

        request_animation_frame(game);

        log::info!("Hoop Arcade running!");
    }

    /// Match the canvas backing store to its CSS size; returns the new size
    fn fit_canvas(canvas: &HtmlCanvasElement, game: &mut Game) -> (u32, u32) {
        let dpr = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0);
        let client_w = canvas.client_width().max(1);
        let client_h = canvas.client_height().max(1);
        let (width, height) = backing_size(client_w, client_h, dpr);
        canvas.set_width(width);
        canvas.set_height(height);
        game.css_size = (client_w as f32, client_h as f32);
        (width, height)
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            let (width, height) = fit_canvas(&canvas, &mut g);
            if let Some(render_state) = g.render_state.as_mut() {
                render_state.resize(width, height);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                if matches!(
                    key.as_str(),
                    " " | "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight"
                ) {
                    event.prevent_default();
                }
                let mut g = game.borrow_mut();
                g.keys.key_down(&key);
                if event.code() == "Space" && matches!(g.mode, Mode::Court3d { .. }) {
                    g.reset_ball = true;
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().keys.key_up(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keys released while unfocused never report keyup
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().keys.clear();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_pointer(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Drag start (only while the player holds the ball)
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut g = game.borrow_mut();
                g.css_size = (
                    canvas_clone.client_width().max(1) as f32,
                    canvas_clone.client_height().max(1) as f32,
                );
                let Some(ground) = g.pointer_ground(event.offset_x() as f32, event.offset_y() as f32)
                else {
                    return;
                };
                if let Mode::Court3d { game, .. } = &mut g.mode {
                    game.begin_aim(ground);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Aim preview
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut g = game.borrow_mut();
                let ground = g.pointer_ground(event.offset_x() as f32, event.offset_y() as f32);
                if let (Mode::Court3d { game, .. }, Some(ground)) = (&mut g.mode, ground) {
                    game.update_aim(ground);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Release shoots
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut g = game.borrow_mut();
                let ground = g.pointer_ground(event.offset_x() as f32, event.offset_y() as f32);
                if let Mode::Court3d { game, .. } = &mut g.mode {
                    match ground {
                        Some(ground) => {
                            game.release_aim(ground);
                        }
                        None => game.cancel_aim(),
                    }
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_reset_button(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(btn) = document.get_element_by_id("resetBtn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().reset_game = true;
                log::info!("Game reset");
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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

            let frame_ms = if g.last_time > 0.0 {
                (time - g.last_time) as f32
            } else {
                FRAME_MS
            };
            g.last_time = time;

            let events = g.update(frame_ms);
            log_events(&events);
            g.render();
            g.update_hud();
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
fn main() {
    env_logger::init();
    log::info!("Hoop Arcade (native) starting...");
    log::info!("The playable demos run in the browser - build with `trunk serve`");

    headless_demo();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play one scripted possession of each court and log what happens
#[cfg(not(target_arch = "wasm32"))]
fn headless_demo() {
    use glam::Vec3;
    use hoop_arcade::consts::FRAME_MS;
    use hoop_arcade::sim::{Game2d, Game3d, GameEvent, Input2d, Input3d, LocalStepper};
    use hoop_arcade::{Court2dTuning, Court3dTuning};

    let tuning = Court2dTuning::default();
    let mut stepper = LocalStepper::new(tuning.flight);
    let mut game = Game2d::new(tuning);
    let shoot = Input2d {
        shoot: true,
        ..Default::default()
    };
    for frame in 0..240 {
        let input = if frame == 0 { shoot } else { Input2d::default() };
        let events = game.tick(&input, &mut stepper);
        if events.contains(&GameEvent::BallReturned) {
            log::info!("2D: ball back with the player after {} frames", frame + 1);
            break;
        }
    }

    let mut game = Game3d::new(Court3dTuning::default());
    game.begin_aim(Vec3::new(-40.0, 0.0, 0.0));
    if let Some(vel) = game.release_aim(Vec3::new(-10.0, 0.0, -25.0)) {
        log::info!("3D: shot launched at {:?}", vel);
    }
    for frame in 0..600 {
        for event in game.tick(&Input3d::default(), FRAME_MS) {
            log::info!("3D frame {}: {:?}", frame, event);
            if matches!(event, GameEvent::PickedUp(_)) {
                return;
            }
        }
    }
}
