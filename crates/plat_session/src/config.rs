//! Session rules and gameplay tuning.
//!
//! Both are plain values loaded once at startup and passed down explicitly.
//! `SessionRules` shapes the controller (level count, resource template,
//! scoring level, HUD placement). `GameInfo` is opaque to the controller and
//! is handed to the level factory for gem/enemy behavior.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::canvas::{palette, Color};

pub const LEVEL_INDEX_PLACEHOLDER: &str = "{index}";

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SessionRules {
    #[serde(default = "default_level_count")]
    pub level_count: usize,
    #[serde(default = "default_level_path_template")]
    pub level_path_template: String,
    #[serde(default = "default_warning_secs")]
    pub warning_secs: u64,
    /// Completing this level commits the captured score to the ledger.
    #[serde(default = "default_scoring_level")]
    pub scoring_level: usize,
    #[serde(default = "default_music_track")]
    pub music_track: String,
    #[serde(default)]
    pub hud: HudLayout,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct HudLayout {
    #[serde(default = "default_leaderboard_x")]
    pub leaderboard_x: f32,
    #[serde(default = "default_leaderboard_y")]
    pub leaderboard_y: f32,
    #[serde(default = "default_score_line_spacing")]
    pub score_line_spacing: f32,
    #[serde(default = "default_shadow_offset")]
    pub shadow_offset: f32,
}

impl Default for HudLayout {
    fn default() -> Self {
        Self {
            leaderboard_x: default_leaderboard_x(),
            leaderboard_y: default_leaderboard_y(),
            score_line_spacing: default_score_line_spacing(),
            shadow_offset: default_shadow_offset(),
        }
    }
}

impl Default for SessionRules {
    fn default() -> Self {
        Self {
            level_count: default_level_count(),
            level_path_template: default_level_path_template(),
            warning_secs: default_warning_secs(),
            scoring_level: default_scoring_level(),
            music_track: default_music_track(),
            hud: HudLayout::default(),
        }
    }
}

impl SessionRules {
    pub fn warning_time(&self) -> Duration {
        Duration::from_secs(self.warning_secs)
    }

    /// Resource path for a level. Pure function of the index; existence is
    /// guaranteed by content packaging, not probed here.
    pub fn level_path(&self, index: usize) -> String {
        self.level_path_template
            .replace(LEVEL_INDEX_PLACEHOLDER, &index.to_string())
    }

    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.level_count
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.level_count == 0 {
            return Err("Session rules validation failed: level_count must be >= 1".to_string());
        }
        if !self.level_path_template.contains(LEVEL_INDEX_PLACEHOLDER) {
            return Err(format!(
                "Session rules validation failed: level_path_template '{}' has no {} placeholder",
                self.level_path_template, LEVEL_INDEX_PLACEHOLDER
            ));
        }
        if self.scoring_level >= self.level_count {
            return Err(format!(
                "Session rules validation failed: scoring_level {} is outside 0..{}",
                self.scoring_level, self.level_count
            ));
        }
        Ok(())
    }
}

pub fn load_rules_from_path(path: &Path) -> Result<SessionRules, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read session rules {}: {e}", path.display()))?;
    let rules: SessionRules = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse session rules JSON {}: {e}", path.display()))?;
    rules.validate()?;
    Ok(rules)
}

/// Patrol speeds in pixels per second, one per enemy kind.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct EnemyInfo {
    #[serde(default)]
    pub speed: f32,
    #[serde(default)]
    pub speed2: f32,
    #[serde(default)]
    pub speed3: f32,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GemInfo {
    #[serde(default)]
    pub bounce_height: f32,
    #[serde(default)]
    pub bounce_rate: f32,
    #[serde(default = "default_gem_color")]
    pub color: Color,
}

impl Default for GemInfo {
    fn default() -> Self {
        Self {
            bounce_height: 0.0,
            bounce_rate: 0.0,
            color: default_gem_color(),
        }
    }
}

/// Gem and enemy tuning handed to every level the factory builds.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct GameInfo {
    #[serde(default)]
    pub enemy_info: EnemyInfo,
    #[serde(default)]
    pub gem_info: GemInfo,
}

impl GameInfo {
    /// Keeps `previous` when the file cannot be deserialized.
    pub fn load_or(path: &Path, previous: GameInfo) -> GameInfo {
        crate::loader::deserialize_config(path).unwrap_or(previous)
    }
}

const fn default_level_count() -> usize {
    3
}

fn default_level_path_template() -> String {
    "Levels/{index}.txt".to_string()
}

const fn default_warning_secs() -> u64 {
    30
}

const fn default_scoring_level() -> usize {
    1
}

fn default_music_track() -> String {
    "Sounds/Music.ogg".to_string()
}

const fn default_leaderboard_x() -> f32 {
    680.0
}

const fn default_leaderboard_y() -> f32 {
    10.0
}

const fn default_score_line_spacing() -> f32 {
    1.2
}

const fn default_shadow_offset() -> f32 {
    1.0
}

const fn default_gem_color() -> Color {
    palette::WHITE
}
