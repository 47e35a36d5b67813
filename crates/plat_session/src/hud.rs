//! Heads-up display: timer, score, leaderboard and status overlay.
//!
//! `compose` is a pure read of level status and ledger contents that produces
//! a `HudFrame`, an ordered list of draw items. `HudFrame::render` replays it.
//! The overlay always comes first so it sits beneath the text, and every
//! string is emitted twice (dark offset copy, then colored copy) for a drop
//! shadow.

use std::time::Duration;

use glam::Vec2;

use crate::canvas::{palette, Canvas, Color, Overlay};
use crate::config::HudLayout;
use crate::level::LevelStatus;

#[derive(Debug, Clone, PartialEq)]
pub enum HudItem {
    Overlay { overlay: Overlay, position: Vec2 },
    Text { text: String, position: Vec2, color: Color },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HudFrame {
    pub items: Vec<HudItem>,
}

impl HudFrame {
    fn push_shadowed(&mut self, text: String, position: Vec2, color: Color, offset: f32) {
        self.items.push(HudItem::Text {
            text: text.clone(),
            position: position + Vec2::splat(offset),
            color: palette::BLACK,
        });
        self.items.push(HudItem::Text {
            text,
            position,
            color,
        });
    }

    pub fn render(&self, canvas: &mut dyn Canvas) {
        for item in &self.items {
            match item {
                HudItem::Overlay { overlay, position } => canvas.draw_overlay(*overlay, *position),
                HudItem::Text {
                    text,
                    position,
                    color,
                } => canvas.draw_text(text, *position, *color),
            }
        }
    }
}

/// `TIME: MM:SS` using the minute and second components of `remaining`.
pub fn format_time(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    format!("TIME: {:02}:{:02}", (secs / 60) % 60, secs % 60)
}

/// Yellow normally; blinks red on odd seconds inside the warning window.
/// Reaching the exit stops the blink.
pub fn timer_color(remaining: Duration, reached_exit: bool, warning: Duration) -> Color {
    if remaining > warning || reached_exit || remaining.as_secs() % 2 == 0 {
        palette::YELLOW
    } else {
        palette::RED
    }
}

pub fn leaderboard_text(highscores: &[i64]) -> String {
    let mut text = String::from("Highscores:");
    for score in highscores {
        text.push('\n');
        text.push_str(&score.to_string());
    }
    text
}

pub fn compose(
    canvas: &dyn Canvas,
    layout: &HudLayout,
    warning: Duration,
    status: &LevelStatus,
    highscores: &[i64],
    overlay: Option<Overlay>,
) -> HudFrame {
    let viewport = canvas.viewport();
    let hud_location = viewport.origin();
    let mut frame = HudFrame::default();

    if let Some(overlay) = overlay {
        let size = canvas.overlay_size(overlay);
        frame.items.push(HudItem::Overlay {
            overlay,
            position: viewport.center() - size / 2.0,
        });
    }

    let time_text = format_time(status.time_remaining);
    let time_height = canvas.measure_text(&time_text).y;
    let time_color = timer_color(status.time_remaining, status.reached_exit, warning);
    frame.push_shadowed(time_text, hud_location, time_color, layout.shadow_offset);

    frame.push_shadowed(
        format!("SCORE: {}", status.score),
        hud_location + Vec2::new(0.0, time_height * layout.score_line_spacing),
        palette::YELLOW,
        layout.shadow_offset,
    );

    frame.push_shadowed(
        leaderboard_text(highscores),
        Vec2::new(layout.leaderboard_x, layout.leaderboard_y),
        palette::RED,
        layout.shadow_offset,
    );

    frame
}
