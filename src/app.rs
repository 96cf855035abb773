//! Application context
//!
//! Owns everything a front-end needs between frames: catalog, settings, game
//! state, UI overlays, input queue and frame clock. Front-ends push input
//! events, call `frame` once per rendered frame and react to the returned
//! events (sound, logging).

use crate::catalog::ItemCatalog;
use crate::platform::{FixedTimestep, FpsCounter, InputQueue, Key};
use crate::settings::{Difficulty, Settings};
use crate::sim::{GameEvent, GameState, TickInput, tick};
use crate::ui::{Screen, Ui, UiAction};

/// Something the front-end may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    Game(GameEvent),
    ButtonClicked(UiAction),
    ScreenChanged(Screen),
    DifficultyChanged(Difficulty),
}

pub struct App {
    pub catalog: ItemCatalog,
    pub settings: Settings,
    pub state: GameState,
    pub ui: Ui,
    pub input: InputQueue,
    pub fps: FpsCounter,
    clock: FixedTimestep,
}

impl App {
    pub fn new(catalog: ItemCatalog, settings: Settings, seed: u64) -> Self {
        let state = GameState::new(seed, settings.difficulty);
        let ui = Ui::new(&catalog, settings.difficulty);
        log::info!(
            "App ready: {} item kinds, seed {}, difficulty {}",
            catalog.len(),
            seed,
            settings.difficulty.as_str()
        );
        Self {
            catalog,
            settings,
            state,
            ui,
            input: InputQueue::new(),
            fps: FpsCounter::default(),
            clock: FixedTimestep::default(),
        }
    }

    pub fn screen(&self) -> Screen {
        self.ui.screen
    }

    /// Run as many ticks as `dt` seconds of wall time cover
    pub fn frame(&mut self, dt: f32) -> Vec<AppEvent> {
        let steps = self.clock.advance(dt);
        let mut events = Vec::new();
        for _ in 0..steps {
            events.extend(self.step());
        }
        events
    }

    /// One tick: drain the input queue and route it to the UI or the game
    pub fn step(&mut self) -> Vec<AppEvent> {
        let polled = self.input.drain();
        let mut events = Vec::new();

        if self.ui.screen == Screen::Playing {
            if polled.was_pressed(Key::Back) {
                self.set_screen(Screen::Menu, &mut events);
                return events;
            }
            events.extend(self.tick_with(&polled.tick_input()));
            return events;
        }

        for action in self.ui.update(&polled) {
            events.push(AppEvent::ButtonClicked(action));
            self.apply(action, &mut events);
        }
        events
    }

    /// Advance the game by one tick with explicit input (headless runs)
    pub fn tick_with(&mut self, input: &TickInput) -> Vec<AppEvent> {
        tick(&mut self.state, &self.catalog, input);
        self.state
            .drain_events()
            .into_iter()
            .map(AppEvent::Game)
            .collect()
    }

    fn apply(&mut self, action: UiAction, events: &mut Vec<AppEvent>) {
        match action {
            UiAction::Start => {
                self.state.difficulty = self.settings.difficulty;
                self.state.restart();
                events.extend(self.state.drain_events().into_iter().map(AppEvent::Game));
                self.clock.reset();
                self.set_screen(Screen::Playing, events);
            }
            UiAction::ToggleDifficulty => {
                let difficulty = self.settings.difficulty.toggled();
                self.settings.difficulty = difficulty;
                self.ui.menu.set_difficulty(difficulty);
                log::info!("Difficulty: {}", difficulty.as_str());
                events.push(AppEvent::DifficultyChanged(difficulty));
            }
            UiAction::ShowInfo => self.set_screen(Screen::Info, events),
            UiAction::CloseInfo => self.set_screen(Screen::Menu, events),
        }
    }

    fn set_screen(&mut self, screen: Screen, events: &mut Vec<AppEvent>) {
        if self.ui.screen != screen {
            log::debug!("Screen {:?} -> {:?}", self.ui.screen, screen);
            self.ui.set_screen(screen);
            events.push(AppEvent::ScreenChanged(screen));
        }
    }
}
