//! Kata Drop entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

    use kata_drop::Settings;
    use kata_drop::audio::{AudioManager, SoundEffect};
    use kata_drop::consts::*;
    use kata_drop::renderer::Renderer;
    use kata_drop::sim::{self, GameEvent, GamePhase, GameState, MessageKind, tick};
    use kata_drop::speech::{Speaker, SpeechStatus};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: Option<Renderer>,
        audio: AudioManager,
        speaker: Speaker,
        settings: Settings,
        accumulator: f32,
        last_time: f64,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let settings = Settings::load();
            let mut audio = AudioManager::new();
            audio.set_volume(settings.effective_sfx_volume());
            let speaker = Speaker::new(settings.speech_rate);
            Self {
                state: GameState::with_difficulty(seed, settings.difficulty),
                renderer: None,
                audio,
                speaker,
                settings,
                accumulator: 0.0,
                last_time: 0.0,
            }
        }

        /// Run simulation ticks at the fixed timestep
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(&mut self.state, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
        }

        /// Render the current frame
        fn render(&self) {
            if let Some(renderer) = &self.renderer {
                renderer.render(&self.state, &self.settings);
            }
        }

        /// Convert a canvas-relative point to play-area coordinates
        fn to_play_coords(&self, x: f32, y: f32, client_w: f32, client_h: f32) -> Vec2 {
            Vec2::new(
                x * PLAY_WIDTH / client_w.max(1.0),
                y * PLAY_HEIGHT / client_h.max(1.0),
            )
        }

        /// Resolve a click/tap in play-area coordinates
        fn pointer_down(&mut self, point: Vec2) {
            // Browsers gate audio behind a user gesture
            self.audio.resume();
            if let Some(id) = sim::tile_at(&self.state.tiles, point) {
                self.state.tile_clicked(id);
            }
        }

        /// Update HUD elements in the DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.get_element_by_id("hud-level") {
                el.set_text_content(Some(&self.state.level().to_string()));
            }
            if let Some(el) = document.get_element_by_id("hud-score") {
                el.set_text_content(Some(&self.state.score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("hud-progress") {
                let progress = format!(
                    "{}/{}",
                    self.state.built_word.chars().count(),
                    self.state.target_word().chars().count()
                );
                el.set_text_content(Some(&progress));
            }
            if let Some(el) = document.get_element_by_id("word-prompt") {
                el.set_text_content(Some(self.state.current_pair().source));
            }
            if let Some(el) = document.get_element_by_id("built-word") {
                let text = if self.state.built_word.is_empty() {
                    "准备开始..."
                } else {
                    self.state.built_word.as_str()
                };
                el.set_text_content(Some(text));
            }
            if let Some(el) = document.get_element_by_id("message") {
                el.set_text_content(Some(&self.state.message));
                let class = match self.state.message_kind {
                    MessageKind::Info => "message",
                    MessageKind::Success => "message success",
                    MessageKind::Error => "message error",
                };
                let _ = el.set_attribute("class", class);
            }
            if let Some(btn) = document.get_element_by_id("start-btn") {
                if self.state.phase == GamePhase::Playing {
                    let _ = btn.set_attribute("disabled", "");
                } else {
                    let _ = btn.remove_attribute("disabled");
                }
            }
        }
    }

    /// Drain session events into audio/speech side effects
    fn process_events(game: &Rc<RefCell<Game>>) {
        let events = game.borrow_mut().state.take_events();
        for event in events {
            match event {
                GameEvent::Correct => game.borrow().audio.play(SoundEffect::Correct),
                GameEvent::Incorrect => game.borrow().audio.play(SoundEffect::Wrong),
                GameEvent::WordCompleted => game.borrow().audio.play(SoundEffect::WordComplete),
                GameEvent::RoundStarted(text) => {
                    if game.borrow().settings.speak_on_start {
                        speak_word(game, text);
                    }
                }
                GameEvent::Pronounce(text) => speak_word(game, text),
            }
        }
    }

    /// Ask the speech engine for the word; callbacks only touch the status line
    fn speak_word(game: &Rc<RefCell<Game>>, text: &'static str) {
        // Clone out of the cell: a missing engine reports Failed synchronously
        let speaker = game.borrow().speaker.clone();
        let g = game.clone();
        speaker.speak(text, move |status| {
            let mut g = g.borrow_mut();
            match status {
                SpeechStatus::Started => {
                    g.state.set_message("🔊 正在播放中文发音...", MessageKind::Success);
                }
                SpeechStatus::Ended => {
                    if g.state.phase == GamePhase::Playing {
                        g.state
                            .set_message("点击掉落的字母来拼出马来文单词！", MessageKind::Success);
                    }
                }
                SpeechStatus::Failed => {
                    let msg = format!("语音播放失败。中文词语是: {text}");
                    g.state.set_message(&msg, MessageKind::Error);
                    log::warn!("Speech synthesis failed for {text:?}");
                }
            }
        });
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Kata Drop starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Backing store at device resolution, logical 800x600 play area
        let dpr = window.device_pixel_ratio();
        canvas.set_width((PLAY_WIDTH as f64 * dpr) as u32);
        canvas.set_height((PLAY_HEIGHT as f64 * dpr) as u32);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        game.borrow_mut().renderer = Renderer::new(&canvas, dpr);
        if game.borrow().renderer.is_none() {
            log::error!("Failed to acquire 2d canvas context");
        }

        log::info!("Game initialized with seed: {}", seed);

        setup_canvas_input(&canvas, game.clone());
        setup_buttons(game.clone());
        setup_auto_reset(game.clone());

        request_animation_frame(game);

        log::info!("Kata Drop running!");
    }

    fn setup_canvas_input(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse click
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let point = g.to_play_coords(
                    event.offset_x() as f32,
                    event.offset_y() as f32,
                    canvas_clone.client_width() as f32,
                    canvas_clone.client_height() as f32,
                );
                g.pointer_down(point);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let y = touch.client_y() as f32 - rect.top() as f32;
                    let point = g.to_play_coords(
                        x,
                        y,
                        canvas_clone.client_width() as f32,
                        canvas_clone.client_height() as f32,
                    );
                    g.pointer_down(point);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Wire up the Start / Reset / Next / Repeat buttons
    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let hook = |id: &str, game: Rc<RefCell<Game>>, f: fn(&mut GameState)| {
            let document = web_sys::window().unwrap().document().unwrap();
            if let Some(btn) = document.get_element_by_id(id) {
                let closure = Closure::<dyn FnMut(_)>::new(move |_: MouseEvent| {
                    let mut g = game.borrow_mut();
                    g.audio.resume();
                    f(&mut g.state);
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        };

        hook("start-btn", game.clone(), GameState::start);
        hook("reset-btn", game.clone(), GameState::reset);
        hook("next-btn", game.clone(), GameState::next_word);
        hook("repeat-btn", game, GameState::repeat);
    }

    /// Reset the round when the tab is hidden, so timers never run unattended
    fn setup_auto_reset(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                let mut g = game.borrow_mut();
                if g.state.phase == GamePhase::Playing {
                    g.state.reset();
                    log::info!("Round reset (tab hidden)");
                }
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
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

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
        }

        // Side effects run outside the borrow: speech callbacks re-enter the game
        process_events(&game);

        {
            let g = game.borrow();
            g.render();
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
    env_logger::init();
    log::info!("Kata Drop (native) starting...");
    log::info!("The playable build targets wasm32 - run with `trunk serve` for the web version");

    // Headless smoke run
    println!("\nRunning a scripted round...");
    demo_round();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive one full word headlessly: tick the spawner and click every needed
/// letter as soon as a matching tile is on screen.
#[cfg(not(target_arch = "wasm32"))]
fn demo_round() {
    use kata_drop::consts::SIM_DT;
    use kata_drop::sim::{GamePhase, GameState, tick};

    let mut state = GameState::new(42);
    state.start();

    let mut safety = 0u32;
    while state.phase == GamePhase::Playing && safety < 100_000 {
        tick(&mut state, SIM_DT);
        if let Some(needed) = state.needed_letter()
            && let Some(id) = state
                .tiles
                .iter()
                .find(|t| t.letter == needed)
                .map(|t| t.id)
        {
            state.tile_clicked(id);
        }
        safety += 1;
    }

    assert_eq!(state.phase, GamePhase::Completed, "round should complete");
    println!(
        "✓ Spelled {:?} with score {}",
        state.target_word(),
        state.score
    );
}
