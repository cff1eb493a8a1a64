//! Fast Fission Reactor entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::Clamped;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData, KeyboardEvent, MouseEvent};

    use fission_reactor::audio::AudioManager;
    use fission_reactor::consts::*;
    use fission_reactor::platform::{FrameInput, HeldInput};
    use fission_reactor::renderer::Canvas;
    use fission_reactor::sim::{self, SimError, SimulationState};
    use fission_reactor::{Assets, Settings};

    const LINE_HEIGHT: f64 = 10.0;

    /// Game instance holding all state
    struct Game {
        state: SimulationState,
        canvas: Canvas,
        ctx: CanvasRenderingContext2d,
        input: HeldInput,
        audio: AudioManager,
        settings: Settings,
    }

    impl Game {
        /// Run one simulation frame into the software canvas
        fn step(&mut self) -> Result<(), SimError> {
            self.canvas.begin_frame();
            let input = FrameInput::poll(&self.input);
            sim::frame(&mut self.state, &input, &mut self.canvas)?;
            self.audio.play_cues(self.state.drain_cues());
            Ok(())
        }

        /// Blit the finished frame and its text overlay
        fn present(&self) -> Result<(), JsValue> {
            let image = ImageData::new_with_u8_clamped_array_and_sh(
                Clamped(self.canvas.as_bytes()),
                WIDTH_PX as u32,
                HEIGHT_PX as u32,
            )?;
            self.ctx.put_image_data(&image, 0.0, 0.0)?;

            let mut y = LINE_HEIGHT;
            for line in self.canvas.overlay().iter().flat_map(|text| text.lines()) {
                self.ctx.fill_text(line, 4.0, y)?;
                y += LINE_HEIGHT;
            }
            Ok(())
        }

        /// Convert a mouse event to logical canvas coordinates
        fn pointer_pos(&self, event: &MouseEvent) -> Vec2 {
            let scale = self.settings.scale;
            Vec2::new(event.offset_x() as f32 / scale, event.offset_y() as f32 / scale)
        }
    }

    fn js_error(e: impl std::fmt::Display) -> JsValue {
        js_sys::Error::new(&e.to_string()).into()
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(js_error)?;

        log::info!("{TITLE} starting...");

        let window = web_sys::window().ok_or_else(|| js_error("no window"))?;
        let document = window.document().ok_or_else(|| js_error("no document"))?;
        document.set_title(TITLE);

        let settings = Settings::load();

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| js_error("no canvas"))?
            .dyn_into()?;
        canvas.set_width(WIDTH_PX as u32);
        canvas.set_height(HEIGHT_PX as u32);
        let style = canvas.style();
        style.set_property("width", &format!("{}px", WIDTH * settings.scale))?;
        style.set_property("height", &format!("{}px", HEIGHT * settings.scale))?;
        style.set_property("image-rendering", "pixelated")?;

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| js_error("no 2d context"))?
            .dyn_into()?;
        ctx.set_fill_style_str("white");
        ctx.set_font("8px monospace");

        let assets = Assets::builtin().map_err(js_error)?;
        let state = SimulationState::new(&assets, &settings).map_err(js_error)?;

        let game = Rc::new(RefCell::new(Game {
            state,
            canvas: Canvas::new(assets),
            ctx,
            input: HeldInput::default(),
            audio: AudioManager::new(&settings),
            settings,
        }));

        setup_input_handlers(&canvas, game.clone())?;
        setup_auto_mute(game.clone())?;

        // Start game loop
        request_animation_frame(game);

        log::info!("{TITLE} running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| js_error("no window"))?;

        // Keyboard
        for (event_name, held) in [("keydown", true), ("keyup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.key() == " " {
                    let mut g = game.borrow_mut();
                    g.input.space = held;
                    if held {
                        g.audio.resume();
                    }
                }
            });
            window.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Mouse buttons
        for (event_name, held) in [("mousedown", true), ("mouseup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.input.pointer = g.pointer_pos(&event);
                g.input.pointer_held = held;
                if held {
                    g.audio.resume();
                }
            });
            canvas.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Mouse move
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.input.pointer = g.pointer_pos(&event);
            });
            canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    /// Silence audio while the tab is hidden
    fn setup_auto_mute(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| js_error("no document"))?;

        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let hidden = document_clone.visibility_state() == web_sys::VisibilityState::Hidden;
            game.borrow_mut().audio.set_page_hidden(hidden);
        });
        document.add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            log::error!("No window, frame loop stopped");
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            if let Err(e) = g.step() {
                log::error!("Frame {} failed, stopping: {e}", g.state.frame);
                return;
            }
            if let Err(e) = g.present() {
                log::error!("Present failed, stopping: {e:?}");
                return;
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_game::run() {
        log::error!("Startup failed: {e:?}");
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    //! Native host: no window, an autopilot plays until meltdown or the frame cap

    use fission_reactor::audio::AudioManager;
    use fission_reactor::consts::*;
    use fission_reactor::platform::FrameInput;
    use fission_reactor::renderer::Canvas;
    use fission_reactor::sim::{self, GamePhase, Neutron, SimError, SimulationState, Snapshot};
    use fission_reactor::{Assets, Settings};

    /// Env var capping the number of frames to run
    pub const FRAMES_ENV: &str = "FISSION_REACTOR_FRAMES";
    pub const DEFAULT_FRAMES: u64 = 36_000;

    /// Where a neutron will be when a freshly dropped rod reaches its lane
    fn intercept_x(neutron: &Neutron) -> Option<f32> {
        let dir = neutron.direction()?;
        let frames_to_lane = (neutron.pos().y - ROD_DROP_Y) / ROD_FALL_SPEED;
        let x = neutron.pos().x + dir.step() * frames_to_lane;
        Some(x.clamp(EDGE_MARGIN, WIDTH - EDGE_MARGIN))
    }

    /// Pick this frame's input: start from the intro, then chase the neutron
    /// closest to escaping
    pub fn autopilot(state: &SimulationState) -> FrameInput {
        match state.phase {
            GamePhase::Intro => FrameInput::start(),
            GamePhase::Meltdown => FrameInput::default(),
            GamePhase::Playing => {
                if !state.rod.is_parked() {
                    return FrameInput::default();
                }
                let edge_distance = |n: &Neutron| {
                    let x = n.pos().x;
                    (x - EDGE_MARGIN).min(WIDTH - EDGE_MARGIN - x)
                };
                state
                    .pool
                    .active()
                    .min_by(|a, b| edge_distance(a).total_cmp(&edge_distance(b)))
                    .and_then(intercept_x)
                    .map(FrameInput::click_at)
                    .unwrap_or_default()
            }
        }
    }

    pub fn run(max_frames: u64) -> Result<Snapshot, SimError> {
        let settings = Settings::load();
        let assets = Assets::builtin()?;
        let mut state = SimulationState::new(&assets, &settings)?;
        let mut canvas = Canvas::new(assets);
        let mut audio = AudioManager::new(&settings);

        let mut played = 0u64;
        let mut saw_playing = false;
        while played < max_frames {
            let input = autopilot(&state);
            canvas.begin_frame();
            sim::frame(&mut state, &input, &mut canvas)?;
            audio.play_cues(state.drain_cues());
            played += 1;

            saw_playing |= state.phase == GamePhase::Playing;
            if saw_playing && state.phase == GamePhase::Meltdown {
                break;
            }
        }
        log::info!("Stopped after {played} frames in {:?}", state.phase);
        Ok(state.snapshot())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("{} (native) starting...", fission_reactor::consts::TITLE);

    let max_frames = std::env::var(headless::FRAMES_ENV)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(headless::DEFAULT_FRAMES);

    let snapshot = match headless::run(max_frames) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            log::error!("Simulation failed: {e}");
            std::process::exit(1);
        }
    };
    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            log::error!("Could not serialize snapshot: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
