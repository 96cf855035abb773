//! Keyboard / pointer input queue
//!
//! Event handlers push raw events as they arrive; the game loop drains the
//! whole queue once per tick.

use std::collections::VecDeque;

use glam::Vec2;

use crate::sim::TickInput;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    /// R: restart / advance the victory screen
    Restart,
    /// Enter or Space
    Confirm,
    /// Escape: back to the menu
    Back,
}

impl Key {
    /// Map a DOM `KeyboardEvent.code`
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" | "KeyA" => Some(Key::Left),
            "ArrowRight" | "KeyD" => Some(Key::Right),
            "KeyR" => Some(Key::Restart),
            "Enter" | "NumpadEnter" | "Space" => Some(Key::Confirm),
            "Escape" => Some(Key::Back),
            _ => None,
        }
    }
}

/// A raw platform event (pointer positions in field coordinates)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    PointerMove(Vec2),
    PointerDown(Vec2),
    PointerUp(Vec2),
    /// Window lost focus: release everything
    FocusLost,
}

/// Pointer activity collected during one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Move(Vec2),
    Down(Vec2),
    Up(Vec2),
}

/// Everything that happened since the last drain
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolledInput {
    /// Left held at the end of the batch (or tapped during it)
    pub left: bool,
    /// Right held at the end of the batch (or tapped during it)
    pub right: bool,
    /// Keys that went down during the batch (auto-repeat filtered out)
    pub pressed: Vec<Key>,
    pub pointer: Vec<PointerEvent>,
}

impl PolledInput {
    pub fn was_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    /// Gameplay view of this batch
    pub fn tick_input(&self) -> TickInput {
        TickInput {
            left: self.left,
            right: self.right,
            restart: self.was_pressed(Key::Restart),
        }
    }
}

#[derive(Debug, Default)]
pub struct InputQueue {
    pending: VecDeque<InputEvent>,
    held_left: bool,
    held_right: bool,
    held_restart: bool,
    held_confirm: bool,
    held_back: bool,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.pending.push_back(event);
    }

    /// Consume every pending event
    pub fn drain(&mut self) -> PolledInput {
        let mut polled = PolledInput::default();

        while let Some(event) = self.pending.pop_front() {
            match event {
                InputEvent::KeyDown(key) => {
                    let held = self.held_mut(key);
                    if !*held {
                        *held = true;
                        polled.pressed.push(key);
                    }
                }
                InputEvent::KeyUp(key) => *self.held_mut(key) = false,
                InputEvent::PointerMove(p) => polled.pointer.push(PointerEvent::Move(p)),
                InputEvent::PointerDown(p) => polled.pointer.push(PointerEvent::Down(p)),
                InputEvent::PointerUp(p) => polled.pointer.push(PointerEvent::Up(p)),
                InputEvent::FocusLost => {
                    self.held_left = false;
                    self.held_right = false;
                    self.held_restart = false;
                    self.held_confirm = false;
                    self.held_back = false;
                }
            }
        }

        // A tap shorter than a tick still moves the player once
        polled.left = self.held_left || polled.was_pressed(Key::Left);
        polled.right = self.held_right || polled.was_pressed(Key::Right);
        polled
    }

    fn held_mut(&mut self, key: Key) -> &mut bool {
        match key {
            Key::Left => &mut self.held_left,
            Key::Right => &mut self.held_right,
            Key::Restart => &mut self.held_restart,
            Key::Confirm => &mut self.held_confirm,
            Key::Back => &mut self.held_back,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_codes() {
        assert_eq!(Key::from_code("ArrowLeft"), Some(Key::Left));
        assert_eq!(Key::from_code("KeyD"), Some(Key::Right));
        assert_eq!(Key::from_code("Space"), Some(Key::Confirm));
        assert_eq!(Key::from_code("KeyQ"), None);
    }

    #[test]
    fn test_held_keys_persist_across_drains() {
        let mut queue = InputQueue::new();
        queue.push(InputEvent::KeyDown(Key::Right));
        assert!(queue.drain().right);
        // Still held with no new events
        assert!(queue.drain().right);

        queue.push(InputEvent::KeyUp(Key::Right));
        assert!(!queue.drain().right);
    }

    #[test]
    fn test_auto_repeat_is_not_a_new_press() {
        let mut queue = InputQueue::new();
        queue.push(InputEvent::KeyDown(Key::Restart));
        queue.push(InputEvent::KeyDown(Key::Restart));
        let polled = queue.drain();
        assert_eq!(polled.pressed, vec![Key::Restart]);
        assert!(polled.tick_input().restart);

        queue.push(InputEvent::KeyDown(Key::Restart));
        assert!(!queue.drain().tick_input().restart);
    }

    #[test]
    fn test_tap_within_one_tick_moves() {
        let mut queue = InputQueue::new();
        queue.push(InputEvent::KeyDown(Key::Left));
        queue.push(InputEvent::KeyUp(Key::Left));
        assert!(queue.drain().left);
        assert!(!queue.drain().left);
    }

    #[test]
    fn test_focus_lost_releases_keys() {
        let mut queue = InputQueue::new();
        queue.push(InputEvent::KeyDown(Key::Left));
        queue.drain();
        queue.push(InputEvent::FocusLost);
        assert!(!queue.drain().left);
    }

    #[test]
    fn test_drain_empties_queue() {
        let mut queue = InputQueue::new();
        queue.push(InputEvent::PointerMove(Vec2::new(1.0, 2.0)));
        queue.push(InputEvent::PointerDown(Vec2::new(1.0, 2.0)));
        let polled = queue.drain();
        assert_eq!(polled.pointer.len(), 2);
        assert!(queue.drain().pointer.is_empty());
    }
}
