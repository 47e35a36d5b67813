//! Input state tracking and the per-frame snapshot handed to the session.
//!
//! - **Level-triggered (held):** `is_held(key)` returns true every frame the key
//!   is physically down. Used for continuous actions like walking.
//!
//! - **Edge-triggered (just_pressed):** true only during the frame the press
//!   happened. Cleared by `end_frame()`.
//!
//! The host feeds device events into `InputState` as they arrive. Once per
//! frame the session polls an `InputSource`, which freezes everything into an
//! immutable `InputSnapshot`. Every decision made during that frame (state
//! transitions, HUD, the level's own movement) reads the same snapshot, so a
//! press can never be observed differently by two consumers in one frame.

use std::collections::HashSet;

use glam::{Vec2, Vec3};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Enter,
    Escape,
    Space,
    W,
    A,
    S,
    D,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PadButton {
    A,
    B,
    Start,
    Back,
    DPadLeft,
    DPadRight,
}

/// Physical orientation of the display, forwarded to the level so tilt
/// controls can be remapped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayOrientation {
    #[default]
    Default,
    LandscapeLeft,
    LandscapeRight,
    Portrait,
}

/// High-level intents the session state machine reacts to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameIntent {
    pub confirm: bool,
    pub cancel: bool,
    pub quit: bool,
}

/// Immutable view of all device state for one frame.
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
    pad_held: HashSet<PadButton>,
    pad_just_pressed: HashSet<PadButton>,
    touches: Vec<Vec2>,
    new_touch: bool,
    pub tilt: Vec3,
    pub orientation: DisplayOrientation,
}

impl InputSnapshot {
    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn is_pad_held(&self, button: PadButton) -> bool {
        self.pad_held.contains(&button)
    }

    pub fn is_pad_just_pressed(&self, button: PadButton) -> bool {
        self.pad_just_pressed.contains(&button)
    }

    pub fn touches(&self) -> &[Vec2] {
        &self.touches
    }

    /// Horizontal movement in [-1, 1] from keys, d-pad or tilt.
    pub fn move_x(&self) -> f32 {
        let mut x = 0.0;
        if self.is_held(Key::Left) || self.is_held(Key::A) || self.is_pad_held(PadButton::DPadLeft)
        {
            x -= 1.0;
        }
        if self.is_held(Key::Right)
            || self.is_held(Key::D)
            || self.is_pad_held(PadButton::DPadRight)
        {
            x += 1.0;
        }
        if x == 0.0 {
            x = self.tilt.x.clamp(-1.0, 1.0);
        }
        x
    }

    pub fn intent(&self) -> FrameIntent {
        FrameIntent {
            confirm: self.is_just_pressed(Key::Enter)
                || self.is_just_pressed(Key::Space)
                || self.is_pad_just_pressed(PadButton::A)
                || self.is_pad_just_pressed(PadButton::Start)
                || self.new_touch,
            cancel: self.is_just_pressed(Key::Escape) || self.is_pad_just_pressed(PadButton::B),
            quit: self.is_pad_held(PadButton::Back),
        }
    }
}

/// Anything the session can poll for exactly one snapshot per frame.
pub trait InputSource {
    fn poll(&mut self) -> InputSnapshot;
}

pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,

    pad_held: HashSet<PadButton>,
    pad_just_pressed: HashSet<PadButton>,

    touches: Vec<Vec2>,
    new_touch: bool,

    pub tilt: Vec3,
    pub orientation: DisplayOrientation,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            just_pressed: HashSet::new(),
            pad_held: HashSet::new(),
            pad_just_pressed: HashSet::new(),
            touches: Vec::new(),
            new_touch: false,
            tilt: Vec3::ZERO,
            orientation: DisplayOrientation::Default,
        }
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn pad_down(&mut self, button: PadButton) {
        if self.pad_held.insert(button) {
            self.pad_just_pressed.insert(button);
        }
    }

    pub fn pad_up(&mut self, button: PadButton) {
        self.pad_held.remove(&button);
    }

    pub fn touch_start(&mut self, position: Vec2) {
        self.touches.push(position);
        self.new_touch = true;
    }

    pub fn touch_end_all(&mut self) {
        self.touches.clear();
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            held: self.held.clone(),
            just_pressed: self.just_pressed.clone(),
            pad_held: self.pad_held.clone(),
            pad_just_pressed: self.pad_just_pressed.clone(),
            touches: self.touches.clone(),
            new_touch: self.new_touch,
            tilt: self.tilt,
            orientation: self.orientation,
        }
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.pad_just_pressed.clear();
        self.new_touch = false;
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for InputState {
    /// Freezes the current state, then clears edge-triggered input so the
    /// next poll only reports new presses.
    fn poll(&mut self) -> InputSnapshot {
        let snapshot = self.snapshot();
        self.end_frame();
        snapshot
    }
}
