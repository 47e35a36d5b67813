//! Drawing primitives the host engine provides.
//!
//! The session never touches a GPU or a font atlas directly. It asks the host
//! for the title-safe viewport, text metrics and overlay sizes, and issues
//! draw calls through `Canvas`. Levels draw through the same trait.

use glam::Vec2;

pub type Color = [f32; 4];

pub mod palette {
    use super::Color;

    pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];
    pub const BLACK: Color = [0.0, 0.0, 0.0, 1.0];
    pub const YELLOW: Color = [1.0, 1.0, 0.0, 1.0];
    pub const RED: Color = [1.0, 0.0, 0.0, 1.0];
    pub const CORNFLOWER_BLUE: Color = [0.392, 0.584, 0.929, 1.0];
}

/// Full-screen decorative image composited behind HUD text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Overlay {
    StartMenu,
    GameOverMenu,
}

impl Overlay {
    pub fn asset_name(self) -> &'static str {
        match self {
            Self::StartMenu => "Menus/StartMenu",
            Self::GameOverMenu => "Menus/gameoverMenu",
        }
    }
}

/// Title-safe rectangle of the viewport, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

pub trait Canvas {
    fn viewport(&self) -> Viewport;
    fn clear(&mut self, color: Color);
    fn measure_text(&self, text: &str) -> Vec2;
    fn draw_text(&mut self, text: &str, position: Vec2, color: Color);
    fn overlay_size(&self, overlay: Overlay) -> Vec2;
    fn draw_overlay(&mut self, overlay: Overlay, position: Vec2);
    /// Level art: `sprite` is an asset name the host resolves.
    fn draw_sprite(&mut self, sprite: &str, position: Vec2, color: Color);
}
