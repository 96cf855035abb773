//! Menu and info overlays
//!
//! Buttons live in field coordinates and react to the pointer events drained
//! from the input queue. The UI only reports actions; `App` applies them.

use glam::Vec2;

use crate::catalog::ItemCatalog;
use crate::consts::*;
use crate::platform::input::{Key, PointerEvent, PolledInput};
use crate::settings::Difficulty;
use crate::sim::Rect;

const BUTTON_WIDTH: f32 = 260.0;
const BUTTON_HEIGHT: f32 = 60.0;
const BUTTON_GAP: f32 = 20.0;
const MENU_TOP: f32 = 220.0;

/// Which layer is on top
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Menu,
    Info,
    Playing,
}

/// What a button (or its keyboard shortcut) asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    Start,
    ToggleDifficulty,
    ShowInfo,
    CloseInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub rect: Rect,
    pub label: String,
    pub action: UiAction,
    pub hovered: bool,
    /// Pointer went down inside and has not been released yet
    pub pressed: bool,
}

impl Button {
    pub fn new(rect: Rect, label: impl Into<String>, action: UiAction) -> Self {
        Self {
            rect,
            label: label.into(),
            action,
            hovered: false,
            pressed: false,
        }
    }

    /// Feed one pointer event. Returns the action when a click completes:
    /// pressed inside, released inside.
    pub fn handle(&mut self, event: PointerEvent) -> Option<UiAction> {
        match event {
            PointerEvent::Move(p) => {
                self.hovered = self.rect.contains(p);
                None
            }
            PointerEvent::Down(p) => {
                self.hovered = self.rect.contains(p);
                self.pressed = self.hovered;
                None
            }
            PointerEvent::Up(p) => {
                self.hovered = self.rect.contains(p);
                let clicked = self.pressed && self.hovered;
                self.pressed = false;
                clicked.then_some(self.action)
            }
        }
    }

    fn reset(&mut self) {
        self.hovered = false;
        self.pressed = false;
    }
}

/// Centered button in the menu column
fn column_button(row: usize, label: impl Into<String>, action: UiAction) -> Button {
    let x = (FIELD_WIDTH - BUTTON_WIDTH) / 2.0;
    let y = MENU_TOP + row as f32 * (BUTTON_HEIGHT + BUTTON_GAP);
    Button::new(Rect::new(x, y, BUTTON_WIDTH, BUTTON_HEIGHT), label, action)
}

pub fn difficulty_label(difficulty: Difficulty) -> String {
    format!("Difficulty: {}", difficulty.as_str())
}

/// Main menu: Start, Difficulty, Info
#[derive(Debug, Clone)]
pub struct Menu {
    pub title: String,
    pub buttons: Vec<Button>,
}

impl Menu {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            title: "Apple Catch".to_string(),
            buttons: vec![
                column_button(0, "Start", UiAction::Start),
                column_button(1, difficulty_label(difficulty), UiAction::ToggleDifficulty),
                column_button(2, "How to play", UiAction::ShowInfo),
            ],
        }
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        if let Some(button) = self
            .buttons
            .iter_mut()
            .find(|b| b.action == UiAction::ToggleDifficulty)
        {
            button.label = difficulty_label(difficulty);
        }
    }
}

/// Rules panel
#[derive(Debug, Clone)]
pub struct InfoWindow {
    pub panel: Rect,
    pub lines: Vec<String>,
    pub back: Button,
}

impl InfoWindow {
    pub fn new(catalog: &ItemCatalog) -> Self {
        let panel = Rect::new(150.0, 60.0, FIELD_WIDTH - 300.0, FIELD_HEIGHT - 120.0);

        let mut lines = vec![
            "Move with Left/Right or A/D".to_string(),
            format!("Reach {} points to win", VICTORY_SCORE),
            format!("Drop {} apples and the game is over", MAX_MISSED),
            String::new(),
        ];
        lines.extend(catalog.kinds().iter().map(|kind| {
            let name = std::path::Path::new(&kind.asset_path)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("item")
                .replace('_', " ");
            format!("{}: {:+}", name, kind.point_value)
        }));

        let back_rect = Rect::new(
            (FIELD_WIDTH - BUTTON_WIDTH) / 2.0,
            panel.bottom() - BUTTON_HEIGHT - BUTTON_GAP,
            BUTTON_WIDTH,
            BUTTON_HEIGHT,
        );

        Self {
            panel,
            lines,
            back: Button::new(back_rect, "Back", UiAction::CloseInfo),
        }
    }
}

/// Overlay state
#[derive(Debug, Clone)]
pub struct Ui {
    pub screen: Screen,
    pub menu: Menu,
    pub info: InfoWindow,
    /// Last known pointer position
    pub pointer: Option<Vec2>,
}

impl Ui {
    pub fn new(catalog: &ItemCatalog, difficulty: Difficulty) -> Self {
        Self {
            screen: Screen::Menu,
            menu: Menu::new(difficulty),
            info: InfoWindow::new(catalog),
            pointer: None,
        }
    }

    /// Buttons that respond on the current screen
    pub fn active_buttons(&self) -> &[Button] {
        match self.screen {
            Screen::Menu => &self.menu.buttons,
            Screen::Info => std::slice::from_ref(&self.info.back),
            Screen::Playing => &[],
        }
    }

    fn active_buttons_mut(&mut self) -> &mut [Button] {
        match self.screen {
            Screen::Menu => &mut self.menu.buttons,
            Screen::Info => std::slice::from_mut(&mut self.info.back),
            Screen::Playing => &mut [],
        }
    }

    /// Switch screens; button hover/press state does not carry over
    pub fn set_screen(&mut self, screen: Screen) {
        if self.screen == screen {
            return;
        }
        for button in self.active_buttons_mut() {
            button.reset();
        }
        self.screen = screen;
        // Re-hover under a pointer that has not moved
        if let Some(p) = self.pointer {
            for button in self.active_buttons_mut() {
                button.hovered = button.rect.contains(p);
            }
        }
    }

    /// Process one tick's input. Returns the actions triggered, in order.
    pub fn update(&mut self, input: &PolledInput) -> Vec<UiAction> {
        let mut actions = Vec::new();

        for &event in &input.pointer {
            self.pointer = Some(match event {
                PointerEvent::Move(p) | PointerEvent::Down(p) | PointerEvent::Up(p) => p,
            });
            for button in self.active_buttons_mut() {
                if let Some(action) = button.handle(event) {
                    actions.push(action);
                }
            }
        }

        for &key in &input.pressed {
            let action = match (self.screen, key) {
                (Screen::Menu, Key::Confirm) => Some(UiAction::Start),
                (Screen::Info, Key::Back | Key::Confirm) => Some(UiAction::CloseInfo),
                _ => None,
            };
            actions.extend(action);
        }

        actions
    }
}
