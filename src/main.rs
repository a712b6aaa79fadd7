//! Castle Run entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent};

    use castle_run::audio::AudioManager;
    use castle_run::input::is_game_key;
    use castle_run::session::{FrameHandle, GameHooks, GamePhase, Session};
    use castle_run::sim::{EntityKind, SoundCue};
    use castle_run::snapshot::{RectInstance, RenderSnapshot, SKY_COLOR};
    use castle_run::{InputState, Settings, Tuning};

    /// Hooks wired to Web Audio and the on-canvas hint line
    struct BrowserHooks {
        audio: AudioManager,
        show_hints: bool,
        hint: String,
    }

    impl GameHooks for BrowserHooks {
        fn on_score_update(&mut self, total: u32) {
            log::debug!("Score: {}", total);
        }

        fn on_game_over(&mut self) {
            log::info!("Game over - press Enter to retry");
        }

        fn on_victory(&mut self) {
            log::info!("Level clear - press Enter to continue");
        }

        fn set_game_state(&mut self, phase: GamePhase) {
            log::info!("Requested state {:?}", phase);
        }

        fn play_sound(&mut self, cue: SoundCue) {
            self.audio.play(cue);
        }

        fn on_tutorial_changed(&mut self, text: &str) {
            if self.show_hints {
                self.hint = text.to_string();
            }
        }
    }

    /// Game instance holding all state
    struct Game {
        session: Session,
        input: InputState,
        hooks: BrowserHooks,
        settings: Settings,
        ctx: Option<CanvasRenderingContext2d>,
    }

    impl Game {
        fn new(settings: Settings, ctx: Option<CanvasRenderingContext2d>) -> Self {
            Self {
                session: Session::new(Tuning::default()),
                input: InputState::new(),
                hooks: BrowserHooks {
                    audio: AudioManager::new(&settings),
                    show_hints: settings.show_tutorial_hints,
                    hint: String::new(),
                },
                settings,
                ctx,
            }
        }

        /// Preference toggles, available in every phase
        fn handle_settings_key(&mut self, code: &str) -> bool {
            match code {
                "KeyN" => self.settings.muted = !self.settings.muted,
                "KeyH" => self.settings.show_tutorial_hints = !self.settings.show_tutorial_hints,
                _ => return false,
            }
            self.hooks.audio.apply_settings(&self.settings);
            self.hooks.show_hints = self.settings.show_tutorial_hints;
            if self.hooks.show_hints {
                if let Some(sim) = self.session.sim() {
                    self.hooks.hint = sim.tutorial_text.clone();
                }
            } else {
                self.hooks.hint.clear();
            }
            self.settings.save();
            log::info!(
                "Sound {}, hints {}",
                if self.settings.muted { "off" } else { "on" },
                if self.settings.show_tutorial_hints { "on" } else { "off" }
            );
            true
        }

        /// One animation frame: simulate, then draw
        fn frame(&mut self, handle: FrameHandle) {
            self.session.run_frame(handle, &mut self.input, &mut self.hooks);
            self.render();
        }

        /// Menu navigation keys (the simulation only sees held movement keys)
        fn handle_menu_key(&mut self, code: &str) {
            let result = match (self.session.phase(), code) {
                (GamePhase::Menu, "Enter") => {
                    self.session.open_intro();
                    Ok(())
                }
                (GamePhase::Menu, "KeyL") => {
                    self.session.open_level_select();
                    Ok(())
                }
                (GamePhase::Intro, "Enter") => self.session.start(),
                (GamePhase::LevelSelect, "Digit1") => self.session.select_level(1),
                (GamePhase::LevelSelect, "Digit2") => self.session.select_level(2),
                (GamePhase::LevelSelect, "Digit3") => self.session.select_level(3),
                (GamePhase::GameOver, "Enter") => {
                    self.session.restart();
                    Ok(())
                }
                (GamePhase::Victory, "Enter") => self.session.next_level(),
                (
                    GamePhase::LevelSelect
                    | GamePhase::GameOver
                    | GamePhase::Victory
                    | GamePhase::Paused,
                    "KeyM",
                ) => {
                    self.session.back_to_menu();
                    Ok(())
                }
                _ => Ok(()),
            };
            if let Err(e) = result {
                log::error!("Failed to load level: {}", e);
            }
            if self.session.phase() != GamePhase::Playing {
                self.hooks.hint.clear();
            }
        }

        /// Draw the current frame; skipped entirely without a 2D context
        fn render(&self) {
            let Some(ctx) = &self.ctx else { return };
            let tuning = Tuning::default();
            let (w, h) = (tuning.viewport_width as f64, tuning.viewport_height as f64);

            ctx.set_fill_style_str(&css(SKY_COLOR));
            ctx.fill_rect(0.0, 0.0, w, h);

            if let Some(snap) = self.session.snapshot() {
                self.draw_level(ctx, &snap);
                self.draw_hud(ctx, w);
            }
            self.draw_overlay(ctx, w, h);
        }

        fn draw_level(&self, ctx: &CanvasRenderingContext2d, snap: &RenderSnapshot) {
            ctx.save();
            if ctx.translate(-snap.camera_x as f64, 0.0).is_err() {
                ctx.restore();
                return;
            }

            for rect in snap.visible_entities() {
                if rect.kind == EntityKind::Gate.code() {
                    draw_gate(ctx, rect);
                } else {
                    fill(ctx, rect);
                }
            }
            fill(ctx, &snap.player);

            ctx.restore();
        }

        fn draw_hud(&self, ctx: &CanvasRenderingContext2d, w: f64) {
            ctx.set_fill_style_str("#ffffff");
            ctx.set_font("bold 20px sans-serif");
            ctx.fill_text(&format!("SCORE {}", self.session.score()), 16.0, 32.0).ok();
            ctx.fill_text(&self.session.level_label(), w - 320.0, 32.0).ok();

            if !self.hooks.hint.is_empty() {
                ctx.set_font("18px sans-serif");
                ctx.fill_text(&self.hooks.hint, 16.0, 72.0).ok();
            }
        }

        fn draw_overlay(&self, ctx: &CanvasRenderingContext2d, w: f64, h: f64) {
            let lines: &[&str] = match self.session.phase() {
                GamePhase::Playing => return,
                GamePhase::Menu => &[
                    "CASTLE RUN",
                    "Enter: start   L: select level",
                    "N: sound on/off   H: hints on/off",
                ],
                GamePhase::Intro => &[
                    "The castle gate awaits beyond the lava fields.",
                    "Enter: begin",
                ],
                GamePhase::Paused => &[
                    "PAUSED",
                    "Esc: resume   M: menu",
                    "N: sound on/off   H: hints on/off",
                ],
                GamePhase::GameOver => &["GAME OVER", "Enter: retry   M: menu"],
                GamePhase::Victory => &["VICTORY!", "Enter: continue   M: menu"],
                GamePhase::LevelSelect => &["SELECT LEVEL", "1 / 2 / 3   M: menu"],
            };

            ctx.set_fill_style_str("rgba(0, 0, 0, 0.55)");
            ctx.fill_rect(0.0, 0.0, w, h);
            ctx.set_fill_style_str("#ffffff");
            for (i, line) in lines.iter().enumerate() {
                ctx.set_font(if i == 0 { "bold 40px sans-serif" } else { "20px sans-serif" });
                ctx.fill_text(line, 60.0, h / 2.0 - 20.0 + i as f64 * 44.0).ok();
            }
        }
    }

    fn css(color: [f32; 4]) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            (color[0] * 255.0).round() as u8,
            (color[1] * 255.0).round() as u8,
            (color[2] * 255.0).round() as u8,
            color[3]
        )
    }

    fn fill(ctx: &CanvasRenderingContext2d, rect: &RectInstance) {
        ctx.set_fill_style_str(&css(rect.color));
        ctx.fill_rect(
            rect.pos[0] as f64,
            rect.pos[1] as f64,
            rect.size[0] as f64,
            rect.size[1] as f64,
        );
    }

    /// Two door panels sliding apart as the gate opens
    fn draw_gate(ctx: &CanvasRenderingContext2d, rect: &RectInstance) {
        let [x, y] = rect.pos.map(|v| v as f64);
        let [w, h] = rect.size.map(|v| v as f64);
        let open = rect.open_fraction as f64;
        let half = w / 2.0;

        ctx.set_fill_style_str(&css(rect.color));
        ctx.fill_rect(x - open * w * 1.5, y, half, h);
        ctx.fill_rect(x + half + open * w * 1.5, y, half, h);
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Logger init failed: {}", e).into());
        }

        log::info!("Castle Run starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document; nothing to run in");
            return;
        };

        let tuning = Tuning::default();
        let canvas = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok());
        let ctx = canvas.as_ref().and_then(|canvas| {
            canvas.set_width(tuning.viewport_width as u32);
            canvas.set_height(tuning.viewport_height as u32);
            canvas
                .get_context("2d")
                .ok()
                .flatten()
                .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
        });
        if ctx.is_none() {
            log::warn!("No 2D canvas available - frames will not be drawn");
        }

        let settings = Settings::load();
        let game = Rc::new(RefCell::new(Game::new(settings, ctx)));

        setup_input_handlers(game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Castle Run running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let code = event.code();
                if is_game_key(&code) {
                    event.prevent_default();
                }
                let mut g = game.borrow_mut();
                g.hooks.audio.resume();
                g.input.key_down(&code);
                if !g.handle_settings_key(&code) {
                    g.handle_menu_key(&code);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().input.key_up(&event.code());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        // Window blur (click outside): keys released there never reach us
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            let mut g = game.borrow_mut();
            g.input.clear();
            if g.session.phase() == GamePhase::Playing {
                g.session.pause();
                log::info!("Auto-paused (window blur)");
            }
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Schedule the next frame with the handle that is current right now
    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let handle = game.borrow().session.frame_handle();
        let closure = Closure::once(move |_time: f64| {
            game_loop(game, handle);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, handle: FrameHandle) {
        game.borrow_mut().frame(handle);
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
    log::info!("Castle Run (native) starting...");
    log::info!("Native mode runs a headless demo - serve the wasm build to play");

    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted headless run of level 1, or of a level JSON file given as the
/// first argument. `CASTLE_RUN_TUNING` may point at a JSON file of tuning
/// overrides.
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use castle_run::session::{GameHooks, GamePhase};
    use castle_run::sim::SoundCue;
    use castle_run::{InputState, LevelData, Session, Settings, Tuning};

    const MAX_FRAMES: u32 = 1_200;

    fn load_tuning() -> Tuning {
        let Ok(path) = std::env::var("CASTLE_RUN_TUNING") else {
            return Tuning::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(content) => match Tuning::from_json(&content) {
                Ok(tuning) => {
                    log::info!("Loaded tuning overrides from {}", path);
                    tuning
                }
                Err(e) => {
                    log::warn!("Failed to parse {}: {}, using defaults", path, e);
                    Tuning::default()
                }
            },
            Err(e) => {
                log::warn!("Failed to read {}: {}, using defaults", path, e);
                Tuning::default()
            }
        }
    }

    fn start(session: &mut Session) -> Result<(), String> {
        let Some(path) = std::env::args().nth(1) else {
            return session.start().map_err(|e| e.to_string());
        };
        let content = std::fs::read_to_string(&path).map_err(|e| format!("{}: {}", path, e))?;
        let level = LevelData::from_json(&content).map_err(|e| e.to_string())?;
        session.play_level(level).map_err(|e| e.to_string())
    }

    /// Logs every outbound event
    struct LogHooks;

    impl GameHooks for LogHooks {
        fn on_score_update(&mut self, total: u32) {
            log::info!("score -> {}", total);
        }
        fn on_game_over(&mut self) {
            log::info!("game over");
        }
        fn on_victory(&mut self) {
            log::info!("victory");
        }
        fn set_game_state(&mut self, phase: GamePhase) {
            log::info!("state -> {:?}", phase);
        }
        fn play_sound(&mut self, cue: SoundCue) {
            log::debug!("sound: {}", cue.key());
        }
        fn on_tutorial_changed(&mut self, text: &str) {
            log::info!("hint: {:?}", text);
        }
    }

    pub fn run() {
        let settings = Settings::load();
        log::debug!("Settings: {:?}", settings);

        let mut session = Session::new(load_tuning());
        if let Err(e) = start(&mut session) {
            log::error!("Could not start: {}", e);
            return;
        }

        let mut input = InputState::new();
        let mut hooks = LogHooks;
        input.key_down("ArrowRight");

        let mut frames = 0;
        while frames < MAX_FRAMES && session.phase() == GamePhase::Playing {
            // Hop every second to clear the first ledge gaps
            if frames % 60 == 0 {
                input.key_down("Space");
            } else if frames % 60 == 10 {
                input.key_up("Space");
            }
            let handle = session.frame_handle();
            session.run_frame(handle, &mut input, &mut hooks);
            frames += 1;
        }

        let x = session.sim().map_or(0.0, |s| s.player.rect.pos.x);
        log::info!(
            "Demo finished after {} frames: {:?}, {} at x={:.0}, score {}",
            frames,
            session.phase(),
            session.level_label(),
            x,
            session.score()
        );
    }
}
