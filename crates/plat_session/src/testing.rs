//! Scripted level doubles shared by the unit tests.

use std::cell::{Cell, RefCell};
use std::io::Read;
use std::rc::Rc;
use std::time::Duration;

use glam::Vec2;
use plat_core::{FrameTime, InputSnapshot};

use crate::canvas::{palette, Canvas};
use crate::config::GameInfo;
use crate::level::{LevelFactory, LevelSession};
use crate::loader::read_all_text;

/// Status knobs and call counters for one scripted level.
#[derive(Debug)]
pub struct Probe {
    pub alive: bool,
    pub remaining: Duration,
    pub reached_exit: bool,
    pub score: i64,
    pub updates: u32,
    pub draws: u32,
    pub last_move_x: f32,
    pub unloaded: bool,
    pub source: String,
}

impl Default for Probe {
    fn default() -> Self {
        Self {
            alive: true,
            remaining: Duration::from_secs(120),
            reached_exit: false,
            score: 0,
            updates: 0,
            draws: 0,
            last_move_x: 0.0,
            unloaded: false,
            source: String::new(),
        }
    }
}

pub struct ScriptedLevel {
    pub index: usize,
    probe: Rc<RefCell<Probe>>,
    live: Rc<Cell<usize>>,
}

impl LevelSession for ScriptedLevel {
    fn is_player_alive(&self) -> bool {
        self.probe.borrow().alive
    }

    fn time_remaining(&self) -> Duration {
        self.probe.borrow().remaining
    }

    fn reached_exit(&self) -> bool {
        self.probe.borrow().reached_exit
    }

    fn score(&self) -> i64 {
        self.probe.borrow().score
    }

    fn update(&mut self, _time: &FrameTime, input: &InputSnapshot) {
        let mut probe = self.probe.borrow_mut();
        probe.updates += 1;
        probe.last_move_x = input.move_x();
    }

    fn draw(&mut self, _time: &FrameTime, canvas: &mut dyn Canvas) {
        self.probe.borrow_mut().draws += 1;
        canvas.draw_sprite("Tiles/Exit", Vec2::ZERO, palette::WHITE);
    }

    fn unload(&mut self) {
        self.probe.borrow_mut().unloaded = true;
    }
}

impl Drop for ScriptedLevel {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
    }
}

pub struct ScriptedFactory {
    probes: Vec<(usize, Rc<RefCell<Probe>>)>,
    live: Rc<Cell<usize>>,
    max_live_at_build: usize,
    fail_index: Option<usize>,
}

impl ScriptedFactory {
    pub fn new() -> Self {
        Self {
            probes: Vec::new(),
            live: Rc::new(Cell::new(0)),
            max_live_at_build: 0,
            fail_index: None,
        }
    }

    pub fn failing_at(mut self, index: usize) -> Self {
        self.fail_index = Some(index);
        self
    }

    pub fn set_failing_at(&mut self, index: Option<usize>) {
        self.fail_index = index;
    }

    /// Probe of the most recently built level with this index.
    pub fn probe(&self, index: usize) -> Rc<RefCell<Probe>> {
        self.probes
            .iter()
            .rev()
            .find(|(i, _)| *i == index)
            .map(|(_, probe)| probe.clone())
            .expect("no level built for index")
    }

    pub fn built_indices(&self) -> Vec<usize> {
        self.probes.iter().map(|(i, _)| *i).collect()
    }

    pub fn live(&self) -> usize {
        self.live.get()
    }

    /// Highest number of levels alive at the moment a new one was built.
    pub fn max_live_at_build(&self) -> usize {
        self.max_live_at_build
    }
}

impl LevelFactory for ScriptedFactory {
    type Level = ScriptedLevel;

    fn build(
        &mut self,
        _info: &GameInfo,
        stream: &mut dyn Read,
        index: usize,
    ) -> Result<ScriptedLevel, String> {
        self.max_live_at_build = self.max_live_at_build.max(self.live.get());
        let source = read_all_text(stream);
        if self.fail_index == Some(index) {
            return Err(format!("scripted failure for level {index}"));
        }
        let probe = Rc::new(RefCell::new(Probe {
            source,
            ..Probe::default()
        }));
        self.probes.push((index, probe.clone()));
        self.live.set(self.live.get() + 1);
        Ok(ScriptedLevel {
            index,
            probe,
            live: self.live.clone(),
        })
    }
}
