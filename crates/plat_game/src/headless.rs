//! Host services for running without a window or audio device.
//!
//! `TraceCanvas` measures text with a fixed glyph cell and logs every draw at
//! `trace`, so `RUST_LOG=trace` gives a readable frame dump. `FileAudio` only
//! checks that the track exists under the content root.

use std::path::PathBuf;

use glam::Vec2;
use plat_session::{AudioSink, Canvas, Color, Overlay, Viewport};

pub const SCREEN_WIDTH: f32 = 1280.0;
pub const SCREEN_HEIGHT: f32 = 720.0;
const GLYPH: Vec2 = Vec2::new(8.0, 16.0);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawCounts {
    pub clears: u64,
    pub texts: u64,
    pub overlays: u64,
    pub sprites: u64,
}

pub struct TraceCanvas {
    viewport: Viewport,
    counts: DrawCounts,
}

impl TraceCanvas {
    pub fn new() -> Self {
        Self {
            viewport: Viewport {
                x: 0.0,
                y: 0.0,
                width: SCREEN_WIDTH,
                height: SCREEN_HEIGHT,
            },
            counts: DrawCounts::default(),
        }
    }

    pub fn counts(&self) -> DrawCounts {
        self.counts
    }
}

impl Default for TraceCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas for TraceCanvas {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn clear(&mut self, color: Color) {
        self.counts.clears += 1;
        log::trace!("clear {color:?}");
    }

    fn measure_text(&self, text: &str) -> Vec2 {
        let lines = text.lines().count().max(1);
        let widest = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
        Vec2::new(widest as f32 * GLYPH.x, lines as f32 * GLYPH.y)
    }

    fn draw_text(&mut self, text: &str, position: Vec2, color: Color) {
        self.counts.texts += 1;
        log::trace!("text {:?} at ({}, {}) {color:?}", text, position.x, position.y);
    }

    fn overlay_size(&self, _overlay: Overlay) -> Vec2 {
        Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0)
    }

    fn draw_overlay(&mut self, overlay: Overlay, position: Vec2) {
        self.counts.overlays += 1;
        log::trace!(
            "overlay {} at ({}, {})",
            overlay.asset_name(),
            position.x,
            position.y
        );
    }

    fn draw_sprite(&mut self, sprite: &str, position: Vec2, color: Color) {
        self.counts.sprites += 1;
        log::trace!("sprite {sprite} at ({}, {}) {color:?}", position.x, position.y);
    }
}

pub struct FileAudio {
    root: PathBuf,
}

impl FileAudio {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AudioSink for FileAudio {
    fn play_looping(&mut self, track: &str) -> Result<(), String> {
        let path = self.root.join(track);
        if !path.is_file() {
            return Err(format!("track {} not found", path.display()));
        }
        log::info!("Playing {} (looping)", path.display());
        Ok(())
    }
}
