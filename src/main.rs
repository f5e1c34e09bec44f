//! Neon Invaders entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod shell {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlSelectElement, KeyboardEvent};

    use neon_invaders::audio::AudioManager;
    use neon_invaders::engine::{Engine, EngineHooks};
    use neon_invaders::highscore::{self, BestScore};
    use neon_invaders::keys::KeyState;
    use neon_invaders::renderer::Canvas2dSurface;
    use neon_invaders::sim::{Difficulty, GamePhase};

    /// Everything the frame loop needs behind one handle
    struct Shell {
        engine: Engine,
        surface: Canvas2dSurface,
        /// True while a frame is scheduled; prevents double loops
        running: bool,
        /// False after `shutdown`; stops the loop and ignores further kicks
        active: bool,
        /// Kept alive so the key listeners stay registered until teardown
        input: InputBindings,
    }

    thread_local! {
        /// Live shell handle, set by `run` and drained by `shutdown`
        static SHELL: RefCell<Option<Rc<RefCell<Shell>>>> = const { RefCell::new(None) };
    }

    /// Keyboard listeners writing the shared key map. Unlike one-shot
    /// `Closure::forget` wiring, the closures are retained so the listeners
    /// can be deregistered when the shell is discarded.
    struct InputBindings {
        window: web_sys::Window,
        on_down: Closure<dyn FnMut(KeyboardEvent)>,
        on_up: Closure<dyn FnMut(KeyboardEvent)>,
    }

    impl InputBindings {
        fn attach(keys: Rc<RefCell<KeyState>>) -> Result<Self, JsValue> {
            let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

            let on_down = {
                let keys = keys.clone();
                Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                    let key = event.key();
                    if matches!(key.as_str(), "ArrowLeft" | "ArrowRight" | "ArrowUp" | " ") {
                        event.prevent_default();
                    }
                    keys.borrow_mut().set(&key, true);
                })
            };
            window
                .add_event_listener_with_callback("keydown", on_down.as_ref().unchecked_ref())?;

            let on_up = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                keys.borrow_mut().set(&event.key(), false);
            });
            window.add_event_listener_with_callback("keyup", on_up.as_ref().unchecked_ref())?;

            Ok(Self {
                window,
                on_down,
                on_up,
            })
        }

        /// Deregister the listeners
        fn cleanup(&self) {
            let _ = self.window.remove_event_listener_with_callback(
                "keydown",
                self.on_down.as_ref().unchecked_ref(),
            );
            let _ = self.window.remove_event_listener_with_callback(
                "keyup",
                self.on_up.as_ref().unchecked_ref(),
            );
        }
    }

    impl Drop for InputBindings {
        fn drop(&mut self) {
            self.cleanup();
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let class = if hidden { "hidden" } else { "" };
            let _ = el.set_attribute("class", class);
        }
    }

    /// Host callbacks: score display, overlay panels, best-score persistence
    struct DomHooks {
        document: Document,
        difficulty: Rc<Cell<Difficulty>>,
        last_score: u32,
    }

    impl DomHooks {
        fn show_best(&self) {
            if let Some(best) = highscore::load() {
                set_text(&self.document, "best-score", &best.score.to_string());
            }
        }

        /// Terminal-state bookkeeping: reveal the overlay, persist a new record
        fn finish(&self, overlay_id: &str) {
            set_text(&self.document, "final-score", &self.last_score.to_string());
            set_hidden(&self.document, overlay_id, false);

            let beats = highscore::load()
                .map(|best| best.beaten_by(self.last_score))
                .unwrap_or(self.last_score > 0);
            if beats {
                highscore::store(&BestScore::new(
                    self.last_score,
                    self.difficulty.get(),
                    js_sys::Date::now(),
                ));
            }
            self.show_best();
        }
    }

    impl EngineHooks for DomHooks {
        fn on_score(&mut self, score: u32) {
            self.last_score = score;
            set_text(&self.document, "score", &score.to_string());
        }

        fn on_phase(&mut self, phase: GamePhase) {
            match phase {
                GamePhase::Countdown => {
                    self.last_score = 0;
                    set_text(&self.document, "score", "0");
                    set_hidden(&self.document, "menu", true);
                    set_hidden(&self.document, "game-over", true);
                    set_hidden(&self.document, "victory", true);
                }
                GamePhase::Playing => {}
                GamePhase::GameOver => self.finish("game-over"),
                GamePhase::Victory => self.finish("victory"),
                GamePhase::Start => {
                    set_hidden(&self.document, "menu", false);
                    set_hidden(&self.document, "game-over", true);
                    set_hidden(&self.document, "victory", true);
                }
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Neon Invaders starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let width = canvas.client_width().max(1) as u32;
        let height = canvas.client_height().max(1) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let surface = Canvas2dSurface::new(canvas.clone()).expect("no 2d context");

        let keys = Rc::new(RefCell::new(KeyState::default()));
        let input = InputBindings::attach(keys.clone()).expect("input wiring failed");

        let difficulty = Rc::new(Cell::new(Difficulty::Hard));
        let hooks = DomHooks {
            document: document.clone(),
            difficulty: difficulty.clone(),
            last_score: 0,
        };
        hooks.show_best();

        let seed = js_sys::Date::now() as u64;
        let engine = Engine::new(
            width as f32,
            height as f32,
            seed,
            keys,
            Box::new(hooks),
            Box::new(AudioManager::new()),
        );
        log::info!("Engine initialized with seed: {seed}");

        let shell = Rc::new(RefCell::new(Shell {
            engine,
            surface,
            running: false,
            active: true,
            input,
        }));
        SHELL.with(|slot| *slot.borrow_mut() = Some(shell.clone()));

        setup_menu_buttons(&document, shell.clone(), difficulty);
        setup_resize(&window, canvas, shell.clone());

        // Paint the idle backdrop once; the loop proper starts on Start
        paint_once(&shell);

        log::info!("Neon Invaders ready");
    }

    /// Tear the component down: deregister the keyboard listeners and stop
    /// the frame loop. The button/resize closures stay registered (they were
    /// forgotten) but become inert once the shell is inactive.
    pub fn shutdown() {
        let Some(shell) = SHELL.with(|slot| slot.borrow_mut().take()) else {
            return;
        };
        let mut s = shell.borrow_mut();
        s.active = false;
        s.input.cleanup();
        log::info!("Neon Invaders shut down");
    }

    fn setup_menu_buttons(
        document: &Document,
        shell: Rc<RefCell<Shell>>,
        difficulty: Rc<Cell<Difficulty>>,
    ) {
        // Start / retry both launch a fresh session at the picked tier
        for id in ["start-btn", "retry-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let shell = shell.clone();
                let difficulty = difficulty.clone();
                let document = document.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                    let tier = document
                        .get_element_by_id("difficulty")
                        .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
                        .map(|sel| Difficulty::parse(&sel.value()))
                        .unwrap_or_default();
                    difficulty.set(tier);
                    shell.borrow_mut().engine.start(tier);
                    kick(shell.clone());
                });
                let _ = btn
                    .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        if let Some(btn) = document.get_element_by_id("menu-btn") {
            let shell = shell.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                shell.borrow_mut().engine.reset_to_menu();
                paint_once(&shell);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(
        window: &web_sys::Window,
        canvas: HtmlCanvasElement,
        shell: Rc<RefCell<Shell>>,
    ) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let width = canvas.client_width().max(1) as u32;
            let height = canvas.client_height().max(1) as u32;
            let mut s = shell.borrow_mut();
            s.surface.set_size(width, height);
            s.engine.resize(width as f32, height as f32);
            if s.active && !s.running {
                let Shell {
                    engine, surface, ..
                } = &mut *s;
                engine.frame(js_sys::Date::now(), surface);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Render one frame outside the live loop (menu backdrop, post-reset)
    fn paint_once(shell: &Rc<RefCell<Shell>>) {
        let mut s = shell.borrow_mut();
        if s.running || !s.active {
            return;
        }
        let Shell {
            engine, surface, ..
        } = &mut *s;
        engine.frame(js_sys::Date::now(), surface);
    }

    /// Begin the frame loop unless one is already scheduled
    fn kick(shell: Rc<RefCell<Shell>>) {
        {
            let mut s = shell.borrow_mut();
            if s.running || !s.active {
                return;
            }
            s.running = true;
        }
        request_frame(shell);
    }

    fn request_frame(shell: Rc<RefCell<Shell>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |time: f64| frame(shell, time));
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame(shell: Rc<RefCell<Shell>>, time: f64) {
        let keep_going = {
            let mut s = shell.borrow_mut();
            if s.active {
                let Shell {
                    engine, surface, ..
                } = &mut *s;
                engine.frame(time, surface)
            } else {
                false
            }
        };
        if keep_going {
            request_frame(shell);
        } else {
            // Terminal state or menu: the final paint already happened
            shell.borrow_mut().running = false;
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    shell::run();
}

/// Host-callable teardown: deregisters input listeners and halts the loop
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn shutdown() {
    shell::shutdown();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Neon Invaders (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    run_headless_smoke();
}

/// Scripted session with held fire + movement, no renderer attached
#[cfg(not(target_arch = "wasm32"))]
fn run_headless_smoke() {
    use neon_invaders::consts::{ENEMY_COLS, ENEMY_ROWS};
    use neon_invaders::keys::KeyState;
    use neon_invaders::sim::{Difficulty, GamePhase, GameState, tick};

    let mut state = GameState::new(800.0, 600.0, 42);
    state.reset(Difficulty::Hard);
    state.phase = GamePhase::Playing;

    let mut keys = KeyState::default();
    keys.set(" ", true);
    keys.set("ArrowRight", true);

    let mut events = Vec::new();
    for _ in 0..600 {
        tick(&mut state, &keys, 16.7, &mut events);
        if !state.phase.is_live() {
            break;
        }
    }

    println!(
        "\nHeadless smoke run: phase {:?}, score {}, {} of {} enemies left",
        state.phase,
        state.score,
        state.active_enemy_count(),
        ENEMY_ROWS * ENEMY_COLS,
    );
    assert_eq!(state.enemies.len(), ENEMY_ROWS * ENEMY_COLS);
    println!("✓ Simulation smoke run passed!");
}
