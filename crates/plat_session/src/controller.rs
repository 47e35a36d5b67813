//! Session controller: the frame-driven owner of state, level and ledger.
//!
//! Per frame the host calls `update` then `draw`, on one thread:
//!
//!   1. `update` polls input exactly once and keeps the snapshot for the frame
//!   2. a held back/quit button ends the frame with `FrameOutcome::Exit`
//!   3. in `Gameplay` the level advances its own simulation
//!   4. `LevelStatus` is read once, after the level update
//!   5. `state::transition` decides the next state and the commands to run
//!   6. commands run in order: capture score, swap levels, commit, overlay
//!
//! `draw` clears, draws the level during gameplay, then composes the HUD.
//!
//! Level loading is fatal. If a level cannot be opened or built the slot is
//! left empty and `SessionError` is returned; the host is expected to stop.

use std::fmt;

use plat_core::{FrameTime, InputSnapshot, InputSource};

use crate::audio::{start_music, AudioSink, BestEffort};
use crate::canvas::{palette, Canvas, Overlay};
use crate::config::{GameInfo, SessionRules};
use crate::content::ContentSource;
use crate::hud;
use crate::ledger::ScoreLedger;
use crate::level::{LevelFactory, LevelSession, LevelSlot, LevelStatus};
use crate::state::{transition, Command, SessionState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    InvalidRules(String),
    LevelLoad {
        index: usize,
        path: String,
        reason: String,
    },
    /// A previous load failed and no level is available.
    NoLevel,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRules(reason) => write!(f, "invalid session rules: {reason}"),
            Self::LevelLoad {
                index,
                path,
                reason,
            } => write!(f, "failed to load level {index} from '{path}': {reason}"),
            Self::NoLevel => f.write_str("no level is loaded"),
        }
    }
}

impl std::error::Error for SessionError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    Exit,
}

pub struct SessionController<F: LevelFactory, S: ScoreLedger> {
    rules: SessionRules,
    game_info: GameInfo,
    content: Box<dyn ContentSource>,
    factory: F,
    ledger: S,

    state: SessionState,
    level_index: usize,
    level: LevelSlot<F::Level>,
    last_score: Option<i64>,
    overlay: Option<Overlay>,
    frame_input: InputSnapshot,
}

impl<F: LevelFactory, S: ScoreLedger> SessionController<F, S> {
    /// Validates the rules and loads level 0 on the start screen.
    pub fn new(
        rules: SessionRules,
        game_info: GameInfo,
        content: Box<dyn ContentSource>,
        factory: F,
        ledger: S,
    ) -> Result<Self, SessionError> {
        rules.validate().map_err(SessionError::InvalidRules)?;
        let mut controller = Self {
            rules,
            game_info,
            content,
            factory,
            ledger,
            state: SessionState::StartScreen,
            level_index: 0,
            level: LevelSlot::empty(),
            last_score: None,
            overlay: Some(Overlay::StartMenu),
            frame_input: InputSnapshot::default(),
        };
        controller.load_start_level()?;
        Ok(controller)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn overlay(&self) -> Option<Overlay> {
        self.overlay
    }

    pub fn level(&self) -> Option<&F::Level> {
        self.level.get()
    }

    pub fn level_status(&self) -> Option<LevelStatus> {
        self.level.get().map(|level| level.status())
    }

    pub fn ledger(&self) -> &S {
        &self.ledger
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn rules(&self) -> &SessionRules {
        &self.rules
    }

    /// Snapshot captured by the most recent `update`.
    pub fn frame_input(&self) -> &InputSnapshot {
        &self.frame_input
    }

    pub fn start_music(&self, sink: &mut dyn AudioSink) -> BestEffort {
        start_music(sink, &self.rules.music_track)
    }

    pub fn update(
        &mut self,
        time: &FrameTime,
        input: &mut dyn InputSource,
    ) -> Result<FrameOutcome, SessionError> {
        self.frame_input = input.poll();
        let intent = self.frame_input.intent();
        if intent.quit {
            log::info!("Back pressed, exiting");
            return Ok(FrameOutcome::Exit);
        }

        let level = self.level.get_mut().ok_or(SessionError::NoLevel)?;
        if self.state == SessionState::Gameplay {
            level.update(time, &self.frame_input);
        }
        let status = level.status();

        let outcome = transition(self.state, intent, &status, self.level_index, &self.rules);
        if outcome.next != self.state {
            log::info!("Session: {} -> {}", self.state, outcome.next);
        }
        self.state = outcome.next;

        for command in outcome.commands {
            match command {
                Command::Exit => return Ok(FrameOutcome::Exit),
                Command::CaptureScore(score) => self.last_score = Some(score),
                Command::LoadNextLevel => self.load_next_level()?,
                Command::LoadStartLevel => self.load_start_level()?,
                Command::CommitScore => self.commit_score(),
                Command::SetOverlay(overlay) => self.overlay = overlay,
            }
        }

        Ok(FrameOutcome::Continue)
    }

    pub fn draw(&mut self, time: &FrameTime, canvas: &mut dyn Canvas) -> Result<(), SessionError> {
        self.overlay = self.state.overlay();
        canvas.clear(palette::CORNFLOWER_BLUE);

        let level = self.level.get_mut().ok_or(SessionError::NoLevel)?;
        if self.state == SessionState::Gameplay {
            level.draw(time, canvas);
        }

        let frame = hud::compose(
            canvas,
            &self.rules.hud,
            self.rules.warning_time(),
            &level.status(),
            self.ledger.highscores(),
            self.overlay,
        );
        frame.render(canvas);
        Ok(())
    }

    /// Back to level 0 on the start screen.
    pub fn load_start_level(&mut self) -> Result<(), SessionError> {
        self.level_index = 0;
        self.state = SessionState::StartScreen;
        self.overlay = Some(Overlay::StartMenu);
        self.load_level(0)
    }

    /// Advance to the next level, wrapping after the last. Leaves the state
    /// alone.
    pub fn load_next_level(&mut self) -> Result<(), SessionError> {
        self.level_index = self.rules.next_index(self.level_index);
        self.load_level(self.level_index)
    }

    fn load_level(&mut self, index: usize) -> Result<(), SessionError> {
        let path = self.rules.level_path(index);
        let content = &self.content;
        let factory = &mut self.factory;
        let info = &self.game_info;

        let built = self.level.replace_with(|| {
            let mut stream = content.open(&path).map_err(|e| e.to_string())?;
            factory.build(info, &mut stream, index)
        });

        match built {
            Ok(_) => {
                log::info!("Loaded level {index} from '{path}'");
                Ok(())
            }
            Err(reason) => {
                log::error!("Level {index} failed to load from '{path}': {reason}");
                Err(SessionError::LevelLoad {
                    index,
                    path,
                    reason,
                })
            }
        }
    }

    fn commit_score(&mut self) {
        let Some(score) = self.last_score.take() else {
            return;
        };
        log::info!("Committing score {score} to high scores");
        self.ledger.add(score);
        BestEffort::from_result("High score save", self.ledger.save());
    }
}
