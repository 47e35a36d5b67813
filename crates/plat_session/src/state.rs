//! Top-level session state machine.
//!
//! `transition` is a pure function of the current state, this frame's input
//! intent and the level status read after the level update. It returns the
//! next state plus the side effects to run, in order. The controller executes
//! the commands; nothing here touches a level, the ledger or a canvas, so every
//! rule can be tested without a host.
//!
//! Finishing a level is not a separate state. The next level starts
//! immediately, so completion stays in `Gameplay` and emits `LoadNextLevel`.

use std::time::Duration;

use plat_core::FrameIntent;

use crate::canvas::Overlay;
use crate::config::SessionRules;
use crate::level::LevelStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverCause {
    PlayerDied,
    TimeExpired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    StartScreen,
    Gameplay,
    GameOver(GameOverCause),
}

impl SessionState {
    /// Overlay composited behind the HUD while in this state.
    pub fn overlay(self) -> Option<Overlay> {
        match self {
            Self::StartScreen => Some(Overlay::StartMenu),
            Self::Gameplay => None,
            Self::GameOver(_) => Some(Overlay::GameOverMenu),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::StartScreen => "start screen",
            Self::Gameplay => "gameplay",
            Self::GameOver(GameOverCause::PlayerDied) => "game over (player died)",
            Self::GameOver(GameOverCause::TimeExpired) => "game over (time expired)",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Exit,
    /// Remember the score of the level being left.
    CaptureScore(i64),
    LoadNextLevel,
    LoadStartLevel,
    /// Add the captured score to the ledger and persist it.
    CommitScore,
    SetOverlay(Option<Overlay>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: SessionState,
    pub commands: Vec<Command>,
}

impl Transition {
    fn stay(state: SessionState) -> Self {
        Self {
            next: state,
            commands: Vec::new(),
        }
    }

    fn to(next: SessionState, commands: Vec<Command>) -> Self {
        Self { next, commands }
    }
}

pub fn transition(
    state: SessionState,
    intent: FrameIntent,
    status: &LevelStatus,
    level_index: usize,
    rules: &SessionRules,
) -> Transition {
    if intent.quit {
        return Transition::to(state, vec![Command::Exit]);
    }

    match state {
        SessionState::StartScreen => {
            if intent.confirm {
                Transition::to(SessionState::Gameplay, vec![Command::SetOverlay(None)])
            } else {
                Transition::stay(state)
            }
        }
        SessionState::Gameplay => {
            if !status.player_alive {
                game_over(GameOverCause::PlayerDied)
            } else if status.time_remaining == Duration::ZERO {
                if status.reached_exit {
                    let mut commands = vec![Command::CaptureScore(status.score), Command::LoadNextLevel];
                    if level_index == rules.scoring_level {
                        commands.push(Command::CommitScore);
                    }
                    Transition::to(SessionState::Gameplay, commands)
                } else {
                    game_over(GameOverCause::TimeExpired)
                }
            } else {
                Transition::stay(state)
            }
        }
        SessionState::GameOver(_) => {
            if intent.cancel {
                Transition::to(
                    SessionState::StartScreen,
                    vec![
                        Command::LoadStartLevel,
                        Command::SetOverlay(Some(Overlay::StartMenu)),
                    ],
                )
            } else {
                Transition::stay(state)
            }
        }
    }
}

fn game_over(cause: GameOverCause) -> Transition {
    Transition::to(
        SessionState::GameOver(cause),
        vec![Command::SetOverlay(Some(Overlay::GameOverMenu))],
    )
}
