//! Plugie Arcade entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{AudioContext, HtmlCanvasElement};

    use plugie_arcade::audio::WebAudio;
    use plugie_arcade::platform::canvas::{CanvasPainter, ImageStore};
    use plugie_arcade::platform::hud::WebHud;
    use plugie_arcade::platform::{HostAction, KeyRouter, player_from_query};
    use plugie_arcade::renderer::DrawList;
    use plugie_arcade::sim::{MonotonicClock, Orchestrator, Services, SessionEvent};
    use plugie_arcade::{Profiles, Settings, Tuning};

    /// Game instance holding all state
    struct Game {
        orch: Orchestrator,
        images: ImageStore,
        painter: CanvasPainter,
        router: KeyRouter,
        audio_ctx: Option<AudioContext>,
        size: (f64, f64),
        /// Autopilot plays for the user (idle mode)
        autopilot: bool,
    }

    impl Game {
        fn handle_key_down(&mut self, key: &str) {
            for action in self.router.key_down(key, self.orch.is_active()) {
                match action {
                    HostAction::Input(event) => self.orch.handle_input(event),
                    HostAction::Restart => {
                        log::info!("Restarting session");
                        self.orch.restart();
                    }
                    HostAction::ForceGameOver => self.orch.force_game_over(),
                    HostAction::ToggleAutopilot => {
                        self.autopilot = !self.autopilot;
                        log::info!("Autopilot: {}", self.autopilot);
                    }
                }
            }
        }

        fn handle_key_up(&mut self, key: &str) {
            if let HostAction::Input(event) = self.router.key_up(key) {
                self.orch.handle_input(event);
            }
        }

        fn resize(&mut self, width: f64, height: f64) {
            self.size = (width, height);
            self.orch.on_resize(width as f32, height as f32);
        }

        fn frame(&mut self) {
            if self.autopilot {
                for event in self.orch.autopilot_inputs() {
                    self.orch.handle_input(event);
                }
            }
            self.orch.tick();

            for event in self.orch.drain_events() {
                match event {
                    SessionEvent::GameOver(summary) => match serde_json::to_string(&summary) {
                        Ok(json) => log::info!("Game over: {}", json),
                        Err(e) => log::warn!("Failed to encode summary: {}", e),
                    },
                    other => log::debug!("{:?}", other),
                }
            }

            let mut list = DrawList::new(&self.images);
            self.orch.draw(&mut list);
            self.painter
                .paint(list.commands(), &self.images, self.size.0, self.size.1);
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Plugie Arcade starting...");

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
        let painter = CanvasPainter::new(&canvas).expect("no 2d context");

        // Profile from ?player=Name
        let mut profiles = Profiles::load();
        let search = window.location().search().unwrap_or_default();
        if let Some(name) = player_from_query(&search) {
            if let Some(profile) = profiles.create_user(&name, js_sys::Date::now()) {
                log::info!("Playing as {} (best {})", profile.name, profile.highscore);
            }
        }
        let player = profiles.current_name().map(str::to_string);
        let settings = Settings::load(player.as_deref());

        let audio = WebAudio::new();
        let audio_ctx = audio.context();

        let seed = js_sys::Date::now() as u64;
        let services = Services::new(seed)
            .with_hud(WebHud::new(&document))
            .with_audio(audio)
            .with_profiles(profiles)
            .with_settings(settings);
        let orch = Orchestrator::standard(
            services,
            Box::new(MonotonicClock::new()),
            &Tuning::default(),
        );
        log::info!("Session seeded with: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            orch,
            images: ImageStore::preload(),
            painter,
            router: KeyRouter::new(),
            audio_ctx,
            size: (0.0, 0.0),
            autopilot: false,
        }));

        fit_canvas(&canvas, &game);
        setup_input_handlers(game.clone());
        setup_resize(canvas, game.clone());
        setup_auto_mute(game.clone());

        game.borrow_mut().orch.start_session();

        // Start game loop
        request_animation_frame(game);

        log::info!("Plugie Arcade running!");
    }

    /// Match the canvas backing store to its CSS size
    fn fit_canvas(canvas: &HtmlCanvasElement, game: &Rc<RefCell<Game>>) {
        let w = canvas.client_width().max(1);
        let h = canvas.client_height().max(1);
        canvas.set_width(w as u32);
        canvas.set_height(h as u32);
        game.borrow_mut().resize(w as f64, h as f64);
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Keydown
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if event.key().starts_with("Arrow") {
                    event.prevent_default();
                }
                if event.repeat() {
                    return;
                }
                game.borrow_mut().handle_key_down(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyup
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                game.borrow_mut().handle_key_up(&event.key());
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            fit_canvas(&canvas, &game);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        game.borrow_mut().frame();
        request_animation_frame(game);
    }

    fn setup_auto_mute(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Window blur (click outside, tab switch)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let g = game.borrow();
                if !g.orch.services().settings.mute_on_blur {
                    return;
                }
                if let Some(ctx) = &g.audio_ctx {
                    let _ = ctx.suspend();
                    log::info!("Audio suspended (window blur)");
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Focus back
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if let Some(ctx) = &game.borrow().audio_ctx {
                    let _ = ctx.resume();
                }
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
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
    env_logger::init();
    log::info!("Plugie Arcade (native) starting...");
    log::info!("Native mode runs a headless autopilot session - use `trunk serve` to play");

    let tuning = match std::env::args().nth(1) {
        Some(path) => match load_tuning(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Failed to load tuning from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => plugie_arcade::Tuning::default(),
    };

    let summary = autopilot_session(&tuning);
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to encode summary: {}", e),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> plugie_arcade::Result<plugie_arcade::Tuning> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| plugie_arcade::Error::Storage(e.to_string()))?;
    plugie_arcade::Tuning::from_json(&json)
}

/// Let the autopilot play a few cycles on a simulated 60 Hz clock
#[cfg(not(target_arch = "wasm32"))]
fn autopilot_session(tuning: &plugie_arcade::Tuning) -> plugie_arcade::summary::SessionSummary {
    use plugie_arcade::consts::FRAME_MS;
    use plugie_arcade::sim::{ManualClock, Orchestrator, Services, SessionEvent};
    use plugie_arcade::Profiles;

    const MAX_CYCLES: u32 = 3;
    const MAX_SIM_MS: f64 = 10.0 * 60.0 * 1000.0;

    let clock = ManualClock::new(0.0);
    let mut profiles = Profiles::new();
    profiles.create_user("autopilot", 0.0);
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    log::info!("Session seeded with: {}", seed);

    let services = Services::new(seed).with_profiles(profiles);
    let mut orch = Orchestrator::standard(services, Box::new(clock.clone()), tuning);
    orch.start_session();

    let mut cycles = 0;
    let mut elapsed = 0.0;
    loop {
        for event in orch.autopilot_inputs() {
            orch.handle_input(event);
        }
        clock.advance(FRAME_MS);
        elapsed += FRAME_MS;
        orch.tick();

        for event in orch.drain_events() {
            match event {
                SessionEvent::GameOver(summary) => return summary,
                SessionEvent::CycleCompleted { difficulty } => {
                    cycles += 1;
                    log::info!("Cycle {} complete, difficulty x{:.3}", cycles, difficulty);
                }
                other => log::info!("{:?}", other),
            }
        }

        if cycles >= MAX_CYCLES || elapsed >= MAX_SIM_MS {
            orch.force_game_over();
            return orch
                .summary()
                .map(|s| *s.payload())
                .unwrap_or_default();
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
