//! Apple Catch entry point
//!
//! Browser: Canvas 2D front-end driven by `requestAnimationFrame`.
//! Native: headless autopilot run that reports a summary.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{FocusEvent, HtmlCanvasElement, HtmlImageElement, KeyboardEvent, MouseEvent};

    use apple_catch::app::{App, AppEvent};
    use apple_catch::assets::{self, SoundSet, SpriteSet};
    use apple_catch::audio::AudioManager;
    use apple_catch::consts::*;
    use apple_catch::platform::{InputEvent, Key};
    use apple_catch::renderer::{self, CanvasRenderer, WebAssets};
    use apple_catch::{ItemCatalog, Settings};

    const SETTINGS_KEY: &str = "apple_catch_settings";

    /// Game instance holding all state
    struct Game {
        app: App,
        sprites: SpriteSet<HtmlImageElement>,
        renderer: CanvasRenderer,
        audio: AudioManager,
        last_time: f64,
    }

    impl Game {
        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            self.last_time = time;
            self.app.fps.record(time);

            for event in self.app.frame(dt) {
                if let AppEvent::DifficultyChanged(_) = event {
                    save_settings(&self.app.settings);
                }
                self.audio.handle(&event);
            }
            self.audio.update(dt);
        }

        fn render(&self) {
            let commands = renderer::build(&self.app, &self.sprites);
            self.renderer.render(&commands, &self.sprites);
        }
    }

    fn load_settings() -> Settings {
        let stored = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .and_then(|storage| storage.get_item(SETTINGS_KEY).ok().flatten());
        match stored.map(|json| Settings::from_json_str(&json)) {
            Some(Ok(settings)) => {
                log::info!("Loaded settings from LocalStorage");
                settings
            }
            Some(Err(e)) => {
                log::warn!("Ignoring stored settings: {}", e);
                Settings::default()
            }
            None => Settings::default(),
        }
    }

    fn save_settings(settings: &Settings) {
        let Ok(json) = settings.to_json() else { return };
        if let Some(storage) = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
        {
            let _ = storage.set_item(SETTINGS_KEY, &json);
            log::info!("Settings saved");
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Apple Catch starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let renderer = CanvasRenderer::new(&canvas).ok_or("no 2d context")?;

        let catalog = ItemCatalog::embedded().map_err(|e| {
            log::error!("Item table unusable: {}", e);
            JsValue::from_str(&e.to_string())
        })?;
        let settings = load_settings();

        let mut web_assets = WebAssets::preload(&assets::image_paths(&catalog)).await;
        let sprites = SpriteSet::load(&mut web_assets, &catalog);
        let sounds = SoundSet::load(&mut web_assets, &catalog);
        let audio = AudioManager::new(sounds, &settings);

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let game = Rc::new(RefCell::new(Game {
            app: App::new(catalog, settings, seed),
            sprites,
            renderer,
            audio,
            last_time: 0.0,
        }));

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone())?;

        // Start game loop
        request_animation_frame(game);

        log::info!("Apple Catch running!");
        Ok(())
    }

    /// Convert a mouse event to field coordinates (the canvas may be scaled by CSS)
    fn field_pos(canvas: &HtmlCanvasElement, event: &MouseEvent) -> glam::Vec2 {
        let rect = canvas.get_bounding_client_rect();
        let sx = if rect.width() > 0.0 {
            FIELD_WIDTH as f64 / rect.width()
        } else {
            1.0
        };
        let sy = if rect.height() > 0.0 {
            FIELD_HEIGHT as f64 / rect.height()
        } else {
            1.0
        };
        glam::Vec2::new(
            ((event.client_x() as f64 - rect.left()) * sx) as f32,
            ((event.client_y() as f64 - rect.top()) * sy) as f32,
        )
    }

    fn setup_input_handlers(
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        // Mouse move / down / up
        for (name, kind) in [("mousemove", 0), ("mousedown", 1), ("mouseup", 2)] {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let pos = field_pos(&canvas_clone, &event);
                let input = match kind {
                    0 => InputEvent::PointerMove(pos),
                    1 => InputEvent::PointerDown(pos),
                    _ => InputEvent::PointerUp(pos),
                };
                game.borrow_mut().app.input.push(input);
            });
            canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Keyboard
        for (name, down) in [("keydown", true), ("keyup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let Some(key) = Key::from_code(&event.code()) else {
                    return;
                };
                // Keep arrows and space from scrolling the page
                event.prevent_default();
                let input = if down {
                    InputEvent::KeyDown(key)
                } else {
                    InputEvent::KeyUp(key)
                };
                game.borrow_mut().app.input.push(input);
            });
            window.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Window blur (click outside): release held keys
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: FocusEvent| {
                game.borrow_mut().app.input.push(InputEvent::FocusLost);
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
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
            g.update(time);
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::{Path, PathBuf};

    use anyhow::{Context, Result};
    use clap::Parser;
    use serde::Serialize;

    use apple_catch::app::{App, AppEvent};
    use apple_catch::assets::fs::FsAssetLoader;
    use apple_catch::assets::{SoundSet, SpriteSet};
    use apple_catch::catalog::sqlite;
    use apple_catch::sim::{GameEvent, autopilot};
    use apple_catch::{Difficulty, ItemCatalog, Settings};

    #[derive(Parser, Debug)]
    #[command(name = "apple-catch")]
    #[command(about = "Run Apple Catch headless with the autopilot and report the result")]
    struct Args {
        /// RNG seed (defaults to the settings seed, then a random one)
        #[arg(long)]
        seed: Option<u64>,
        /// Ticks to simulate (60 per second)
        #[arg(long, default_value_t = 36_000)]
        ticks: u64,
        /// normal or hard (overrides the settings file)
        #[arg(long, value_parser = parse_difficulty)]
        difficulty: Option<Difficulty>,
        /// Item table: .db/.sqlite for SQLite, anything else is JSON
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Settings JSON file
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Asset root to check with the filesystem loader
        #[arg(long)]
        assets: Option<PathBuf>,
        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    }

    fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
        Difficulty::from_str(s).ok_or_else(|| format!("unknown difficulty '{}'", s))
    }

    #[derive(Debug, Default, Serialize)]
    struct RunSummary {
        seed: u64,
        difficulty: String,
        ticks: u64,
        rounds: u32,
        victories: u32,
        game_overs: u32,
        caught: u32,
        missed: u32,
        expired: u32,
        best_score: i64,
        final_score: i64,
        /// Sprites that fell back to placeholders (only with --assets)
        placeholders: Option<usize>,
        silent_sounds: Option<usize>,
    }

    fn load_catalog(path: Option<&Path>) -> Result<ItemCatalog> {
        let Some(path) = path else {
            return ItemCatalog::embedded().context("embedded item table is invalid");
        };
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);
        let catalog = match ext.as_deref() {
            Some("db" | "sqlite" | "sqlite3") => sqlite::load_file(path),
            _ => ItemCatalog::load_json_file(path),
        };
        catalog.with_context(|| format!("failed loading item table {}", path.display()))
    }

    pub fn run() -> Result<()> {
        let args = Args::parse();

        let mut settings = match &args.settings {
            Some(path) => Settings::load_file(path),
            None => Settings::default(),
        };
        if let Some(difficulty) = args.difficulty {
            settings.difficulty = difficulty;
        }
        let catalog = load_catalog(args.catalog.as_deref())?;
        let seed = args.seed.or(settings.seed).unwrap_or_else(rand::random);

        let mut summary = RunSummary {
            seed,
            difficulty: settings.difficulty.as_str().to_string(),
            ticks: args.ticks,
            rounds: 1,
            ..Default::default()
        };

        if let Some(root) = &args.assets {
            let mut loader = FsAssetLoader::new(root);
            let sprites = SpriteSet::load(&mut loader, &catalog);
            let sounds = SoundSet::load(&mut loader, &catalog);
            summary.placeholders = Some(sprites.placeholder_count());
            summary.silent_sounds = Some(
                sounds.catches.iter().filter(|s| s.is_none()).count()
                    + usize::from(sounds.music.is_none()),
            );
        }

        let mut app = App::new(catalog, settings, seed);
        log::info!("Running {} ticks headless", args.ticks);

        for _ in 0..args.ticks {
            let input = autopilot(&app.state, &app.catalog);
            for event in app.tick_with(&input) {
                match event {
                    AppEvent::Game(GameEvent::Caught { .. }) => summary.caught += 1,
                    AppEvent::Game(GameEvent::Missed { .. }) => summary.missed += 1,
                    AppEvent::Game(GameEvent::Expired { .. }) => summary.expired += 1,
                    AppEvent::Game(GameEvent::Victory) => summary.victories += 1,
                    AppEvent::Game(GameEvent::GameOver) => summary.game_overs += 1,
                    AppEvent::Game(GameEvent::Restarted) => summary.rounds += 1,
                    _ => {}
                }
            }
            summary.best_score = summary.best_score.max(app.state.round.score);
        }
        summary.final_score = app.state.round.score;

        log::info!(
            "Done: {} rounds, {} victories, {} game overs, best score {}",
            summary.rounds,
            summary.victories,
            summary.game_overs,
            summary.best_score
        );

        if args.json {
            let json =
                serde_json::to_string_pretty(&summary).context("failed encoding run summary")?;
            println!("{}", json);
        } else {
            println!("{:#?}", summary);
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
