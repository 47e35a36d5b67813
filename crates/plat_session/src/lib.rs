//! Session layer of a side-scrolling platformer.
//!
//! The controller owns the start/gameplay/game-over state machine, the single
//! live level, and the high score ledger. Everything host-specific (drawing,
//! audio, content storage, device polling) comes in through traits.

pub mod audio;
pub mod canvas;
pub mod config;
pub mod content;
pub mod controller;
pub mod hud;
pub mod ledger;
pub mod level;
pub mod loader;
pub mod state;
#[cfg(test)]
mod testing;

pub use audio::{AudioSink, BestEffort, SilentAudio};
pub use canvas::{palette, Canvas, Color, Overlay, Viewport};
pub use config::{load_rules_from_path, EnemyInfo, GameInfo, GemInfo, HudLayout, SessionRules};
pub use content::{ContentSource, DirContent, MemoryContent};
pub use controller::{FrameOutcome, SessionController, SessionError};
pub use ledger::{JsonLedger, MemoryLedger, ScoreLedger};
pub use level::{LevelFactory, LevelSession, LevelSlot, LevelStatus};
pub use state::{GameOverCause, SessionState};
