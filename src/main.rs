//! Canvas Pong entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};
    use std::time::Duration;

    use wasm_bindgen::prelude::*;
    use web_sys::{Event, EventTarget, HtmlCanvasElement, KeyboardEvent};

    use canvas_pong::platform::{ServeTimer, TimerId};
    use canvas_pong::renderer::vertex::colors;
    use canvas_pong::renderer::{QuadBatch, RenderState, Renderer, Scoreboard};
    use canvas_pong::sim::Score;
    use canvas_pong::{GameConfig, Session};

    /// LocalStorage key for tuning overrides
    const CONFIG_STORAGE_KEY: &str = "canvas_pong_config";

    thread_local! {
        static ACTIVE: RefCell<Option<Rc<RefCell<Game>>>> = const { RefCell::new(None) };
    }

    /// Serve timer backed by `setTimeout`
    struct TimeoutTimer {
        game: Weak<RefCell<Game>>,
        next_id: u64,
        /// The live timeout; its closure must outlive the JS callback
        slot: Option<(TimerId, i32, Closure<dyn FnMut()>)>,
    }

    impl TimeoutTimer {
        fn detached() -> Self {
            Self {
                game: Weak::new(),
                next_id: 0,
                slot: None,
            }
        }
    }

    impl ServeTimer for TimeoutTimer {
        fn start(&mut self, delay: Duration) -> TimerId {
            let id = TimerId::new(self.next_id);
            self.next_id += 1;

            let game = self.game.clone();
            let closure = Closure::<dyn FnMut()>::new(move || {
                if let Some(game) = game.upgrade() {
                    game.borrow_mut().session.serve_timer_fired(id);
                }
            });
            let callback: &js_sys::Function = closure.as_ref().unchecked_ref();
            let millis = i32::try_from(delay.as_millis()).unwrap_or_else(|_| {
                log::warn!("Serve delay {:?} too long for setTimeout; clamping", delay);
                i32::MAX
            });
            let handle = web_sys::window().and_then(|window| {
                window
                    .set_timeout_with_callback_and_timeout_and_arguments_0(callback, millis)
                    .ok()
            });

            // Any previous slot has already fired or been cancelled
            match handle {
                Some(handle) => self.slot = Some((id, handle, closure)),
                None => log::error!("Failed to schedule serve timer {:?}", id),
            }
            id
        }

        fn cancel(&mut self, id: TimerId) {
            let matches = matches!(&self.slot, Some((slot_id, _, _)) if *slot_id == id);
            if !matches {
                return;
            }
            if let Some((_, handle, _closure)) = self.slot.take() {
                if let Some(window) = web_sys::window() {
                    window.clear_timeout_with_handle(handle);
                }
            }
        }
    }

    /// Writes the tally into `#score-player` / `#score-opponent`
    struct DomScoreboard;

    impl Scoreboard for DomScoreboard {
        fn show(&mut self, score: Score) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.get_element_by_id("score-player") {
                el.set_text_content(Some(&score.player.to_string()));
            }
            if let Some(el) = document.get_element_by_id("score-opponent") {
                el.set_text_content(Some(&score.opponent.to_string()));
            }
        }
    }

    /// An attached DOM listener, kept so teardown can detach it
    struct Listener {
        target: EventTarget,
        event: &'static str,
        closure: Closure<dyn FnMut(Event)>,
    }

    /// Game instance holding all state
    struct Game {
        session: Session<TimeoutTimer>,
        renderer: Renderer,
        batch: QuadBatch,
        render_state: Option<RenderState>,
        scoreboard: DomScoreboard,
        frame_id: Option<i32>,
        listeners: Vec<Listener>,
    }

    impl Game {
        /// Update, then render the current frame
        fn frame(&mut self) {
            let Self {
                session,
                renderer,
                batch,
                render_state,
                scoreboard,
                ..
            } = self;

            session.frame(renderer, batch, scoreboard);

            if let Some(render_state) = render_state {
                match render_state.render(batch.vertices()) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        let (w, h) = render_state.size;
                        render_state.resize(w, h);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        fn teardown(&mut self) {
            self.session.teardown();

            if let Some(window) = web_sys::window() {
                if let Some(id) = self.frame_id.take() {
                    let _ = window.cancel_animation_frame(id);
                }
            }

            for listener in self.listeners.drain(..) {
                let _ = listener.target.remove_event_listener_with_callback(
                    listener.event,
                    listener.closure.as_ref().unchecked_ref(),
                );
            }
        }
    }

    /// Stored tuning overrides, with the viewport taken from the window
    fn load_config(window: &web_sys::Window, width: f32, height: f32) -> GameConfig {
        let stored = window
            .local_storage()
            .ok()
            .flatten()
            .and_then(|storage| storage.get_item(CONFIG_STORAGE_KEY).ok().flatten());

        let mut config = match stored {
            Some(json) => match GameConfig::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded tuning overrides from LocalStorage");
                    config
                }
                Err(e) => {
                    log::warn!("Ignoring stored tuning: {}", e);
                    GameConfig::default()
                }
            },
            None => GameConfig::default(),
        };
        config.viewport_width = width;
        config.viewport_height = height;
        config
    }

    async fn init_gpu(canvas: &HtmlCanvasElement, width: f32, height: f32) -> Option<RenderState> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                return None;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {}", e);
                return None;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width as u32, height as u32, (width, height)).await
        {
            Ok(render_state) => Some(render_state),
            Err(e) => {
                log::error!("Failed to create device: {}", e);
                None
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            // Logger already installed
        }

        log::info!("Canvas Pong starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element");
            return;
        };

        // Physics is tied to the viewport at load time
        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(800.0) as f32;
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(600.0) as f32;
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let config = load_config(&window, width, height);
        let session = match Session::new(config, TimeoutTimer::detached()) {
            Ok(session) => session,
            Err(e) => {
                log::error!("Cannot start game: {}", e);
                return;
            }
        };

        let mut batch = QuadBatch::new(width, height);
        let renderer = Renderer::new(
            batch.load_sprite(colors::PADDLE),
            batch.load_sprite(colors::BALL),
        );
        let render_state = init_gpu(&canvas, width, height).await;

        let game = Rc::new(RefCell::new(Game {
            session,
            renderer,
            batch,
            render_state,
            scoreboard: DomScoreboard,
            frame_id: None,
            listeners: Vec::new(),
        }));

        {
            let mut g = game.borrow_mut();
            g.session.timer_mut().game = Rc::downgrade(&game);
            let score = g.session.state().score;
            g.scoreboard.show(score);
        }

        setup_input_handlers(&window, &game);
        setup_teardown(&window);
        ACTIVE.with(|active| *active.borrow_mut() = Some(game.clone()));

        // Start game loop
        request_animation_frame(game);

        log::info!("Canvas Pong running!");
    }

    fn add_listener(
        game: &Rc<RefCell<Game>>,
        target: EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        match target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
            Ok(()) => game.borrow_mut().listeners.push(Listener {
                target,
                event,
                closure,
            }),
            Err(e) => log::error!("Failed to listen for {}: {:?}", event, e),
        }
    }

    fn setup_input_handlers(window: &web_sys::Window, game: &Rc<RefCell<Game>>) {
        let target: EventTarget = window.clone().into();

        // Key down
        {
            let weak = Rc::downgrade(game);
            add_listener(game, target.clone(), "keydown", move |event: Event| {
                let (Some(event), Some(game)) = (event.dyn_ref::<KeyboardEvent>(), weak.upgrade())
                else {
                    return;
                };
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "Escape" => {
                        if !event.repeat() {
                            g.session.toggle_pause();
                        }
                    }
                    key => {
                        if key.starts_with("Arrow") {
                            event.prevent_default();
                        }
                        g.session.key_down(key);
                    }
                }
            });
        }

        // Key up
        {
            let weak = Rc::downgrade(game);
            add_listener(game, target.clone(), "keyup", move |event: Event| {
                let (Some(event), Some(game)) = (event.dyn_ref::<KeyboardEvent>(), weak.upgrade())
                else {
                    return;
                };
                game.borrow_mut().session.key_up(&event.key());
            });
        }

        // Window blur: key-up events will not arrive, so drop held keys and pause
        {
            let weak = Rc::downgrade(game);
            add_listener(game, target, "blur", move |_event: Event| {
                if let Some(game) = weak.upgrade() {
                    let mut g = game.borrow_mut();
                    g.session.release_all_keys();
                    if g.session.is_running() {
                        g.session.pause();
                        log::info!("Auto-paused (window blur)");
                    }
                }
            });
        }
    }

    fn setup_teardown(window: &web_sys::Window) {
        let closure = Closure::<dyn FnMut(Event)>::new(move |_event: Event| shutdown());
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Tear down the running game, if any
    pub fn shutdown() {
        let game = ACTIVE.with(|active| active.borrow_mut().take());
        if let Some(game) = game {
            game.borrow_mut().teardown();
            log::info!("Canvas Pong stopped");
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let handle = game.clone();
        let closure = Closure::once(move |_time: f64| {
            game_loop(handle);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => game.borrow_mut().frame_id = Some(id),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            g.frame_id = None;
            if g.session.is_torn_down() {
                return;
            }
            g.frame();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

/// Stop the game: cancels the frame loop and serve timer, detaches listeners
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn shutdown() {
    wasm_game::shutdown();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Canvas Pong (native) starting...");
    log::info!("Native mode runs a headless demo - run with `trunk serve` for the web version");

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)?;
            log::info!("Loaded config from {}", path);
            canvas_pong::GameConfig::from_json(&json)?
        }
        None => canvas_pong::GameConfig::default(),
    };

    native_demo::run(config)?;
    Ok(())
}

/// Plays a session on a virtual 60 Hz clock with no keyboard input
#[cfg(not(target_arch = "wasm32"))]
mod native_demo {
    use std::time::Duration;

    use canvas_pong::platform::DeadlineTimers;
    use canvas_pong::renderer::vertex::colors;
    use canvas_pong::renderer::{LogScoreboard, QuadBatch, Renderer, Scoreboard};
    use canvas_pong::sim::TickOutcome;
    use canvas_pong::{ConfigError, GameConfig, Session};

    const FRAME: Duration = Duration::from_micros(16_667);
    const DEMO_FRAMES: u32 = 60 * 20;

    pub fn run(config: GameConfig) -> Result<(), ConfigError> {
        let mut batch = QuadBatch::new(config.viewport_width, config.viewport_height);
        let renderer = Renderer::new(
            batch.load_sprite(colors::PADDLE),
            batch.load_sprite(colors::BALL),
        );
        let mut scoreboard = LogScoreboard;
        let mut session = Session::new(config, DeadlineTimers::new())?;
        scoreboard.show(session.state().score);

        let mut points = 0;
        for _ in 0..DEMO_FRAMES {
            if let TickOutcome::Scored(_) = session.frame(&renderer, &mut batch, &mut scoreboard) {
                points += 1;
            }
            let fired = session.timer_mut().advance(FRAME);
            for id in fired {
                session.serve_timer_fired(id);
            }
        }

        log::info!(
            "Demo finished: {} points in {} frames ({:.1}s virtual), {} vertices in last frame",
            points,
            DEMO_FRAMES,
            session.timer().now().as_secs_f32(),
            batch.vertices().len()
        );
        session.teardown();
        Ok(())
    }
}
