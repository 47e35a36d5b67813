//! The playable-level boundary and the slot that owns the live level.
//!
//! A level owns its terrain, entities, player and clock. The session only
//! reads four facts from it each frame (`LevelStatus`) and forwards update and
//! draw calls. Levels are heavy (textures, sounds), so at most one may exist:
//! `LevelSlot::replace_with` releases the current level before constructing
//! the next, and the new level only becomes reachable once construction
//! succeeded.

use std::io::Read;
use std::time::Duration;

use plat_core::{FrameTime, InputSnapshot};

use crate::canvas::Canvas;
use crate::config::GameInfo;

/// Everything the state machine needs from a level, read at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelStatus {
    pub player_alive: bool,
    pub time_remaining: Duration,
    pub reached_exit: bool,
    pub score: i64,
}

pub trait LevelSession {
    fn is_player_alive(&self) -> bool;
    fn time_remaining(&self) -> Duration;
    fn reached_exit(&self) -> bool;
    fn score(&self) -> i64;

    /// Advance the simulation. Orientation travels inside the snapshot.
    fn update(&mut self, time: &FrameTime, input: &InputSnapshot);
    fn draw(&mut self, time: &FrameTime, canvas: &mut dyn Canvas);

    /// Release content owned by this level. Called once, right before drop.
    fn unload(&mut self) {}

    fn status(&self) -> LevelStatus {
        LevelStatus {
            player_alive: self.is_player_alive(),
            time_remaining: self.time_remaining(),
            reached_exit: self.reached_exit(),
            score: self.score(),
        }
    }
}

/// Builds a level from its resource stream.
pub trait LevelFactory {
    type Level: LevelSession;

    fn build(
        &mut self,
        info: &GameInfo,
        stream: &mut dyn Read,
        index: usize,
    ) -> Result<Self::Level, String>;
}

pub struct LevelSlot<L: LevelSession> {
    current: Option<L>,
}

impl<L: LevelSession> LevelSlot<L> {
    pub fn empty() -> Self {
        Self { current: None }
    }

    pub fn get(&self) -> Option<&L> {
        self.current.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut L> {
        self.current.as_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    pub fn release(&mut self) {
        if let Some(mut old) = self.current.take() {
            old.unload();
        }
    }

    /// Releases the current level, then stores whatever `build` produces.
    /// On failure the slot stays empty.
    pub fn replace_with<E>(
        &mut self,
        build: impl FnOnce() -> Result<L, E>,
    ) -> Result<&mut L, E> {
        self.release();
        let level = build()?;
        Ok(self.current.insert(level))
    }
}

impl<L: LevelSession> Default for LevelSlot<L> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<L: LevelSession> Drop for LevelSlot<L> {
    fn drop(&mut self) {
        self.release();
    }
}
