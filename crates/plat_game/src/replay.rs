//! Scripted input for the headless host.
//!
//! A replay lists, per frame, which keys and pad buttons are held. Presses are
//! derived by feeding those sets through `InputState`, so "press Enter once" is
//! written as a frame holding Enter followed by a frame without it.

use plat_core::{InputSnapshot, InputSource, InputState, Key, PadButton};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use glam::{Vec2, Vec3};

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    #[serde(default = "default_dt")]
    pub fixed_dt: f32,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ReplayFrame {
    #[serde(default)]
    pub keys: Vec<Key>,
    #[serde(default)]
    pub pad: Vec<PadButton>,
    #[serde(default)]
    pub touch: bool,
    #[serde(default)]
    pub tilt_x: f32,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ReplaySequence {
    pub fn expanded_frames(&self) -> Vec<ReplayFrame> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for _ in 0..frame.repeat.max(1) {
                out.push(ReplayFrame {
                    tilt_x: frame.tilt_x.clamp(-1.0, 1.0),
                    repeat: 1,
                    ..frame.clone()
                });
            }
        }
        out
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplaySequence = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if !replay.fixed_dt.is_finite() || replay.fixed_dt <= 0.0 {
        return Err("Replay validation failed: fixed_dt must be finite and > 0".to_string());
    }
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(())
}

/// Plays a replay back one frame per poll. Once exhausted every poll
/// reports nothing held.
pub struct ReplayInput {
    frames: Vec<ReplayFrame>,
    cursor: usize,
    state: InputState,
    touching: bool,
}

impl ReplayInput {
    pub fn new(replay: &ReplaySequence) -> Self {
        Self {
            frames: replay.expanded_frames(),
            cursor: 0,
            state: InputState::new(),
            touching: false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.frames.len()
    }

    pub fn frames_played(&self) -> usize {
        self.cursor
    }

    fn apply(&mut self, frame: &ReplayFrame) {
        for key in ALL_KEYS {
            if frame.keys.contains(key) {
                self.state.key_down(*key);
            } else {
                self.state.key_up(*key);
            }
        }
        for button in ALL_BUTTONS {
            if frame.pad.contains(button) {
                self.state.pad_down(*button);
            } else {
                self.state.pad_up(*button);
            }
        }
        if frame.touch && !self.touching {
            self.state.touch_start(Vec2::ZERO);
        } else if !frame.touch {
            self.state.touch_end_all();
        }
        self.touching = frame.touch;
        self.state.tilt = Vec3::new(frame.tilt_x, 0.0, 0.0);
    }
}

impl InputSource for ReplayInput {
    fn poll(&mut self) -> InputSnapshot {
        let frame = self.frames.get(self.cursor).cloned().unwrap_or_default();
        self.cursor += 1;
        self.apply(&frame);
        self.state.poll()
    }
}

const ALL_KEYS: &[Key] = &[
    Key::Left,
    Key::Right,
    Key::Up,
    Key::Down,
    Key::Enter,
    Key::Escape,
    Key::Space,
    Key::W,
    Key::A,
    Key::S,
    Key::D,
];

const ALL_BUTTONS: &[PadButton] = &[
    PadButton::A,
    PadButton::B,
    PadButton::Start,
    PadButton::Back,
    PadButton::DPadLeft,
    PadButton::DPadRight,
];

const fn default_dt() -> f32 {
    1.0 / 60.0
}

const fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "plat_replay_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn replay_file_parses_and_expands() {
        let path = temp_file_path("parse");
        fs::write(
            &path,
            r#"{
              "fixed_dt": 0.016666667,
              "frames": [
                { "keys": ["right"], "repeat": 3 },
                { "pad": ["back"], "tilt_x": 4.0 }
              ]
            }"#,
        )
        .expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        let expanded = replay.expanded_frames();
        assert_eq!(expanded.len(), 4);
        assert_eq!(expanded[0].keys, vec![Key::Right]);
        assert_eq!(expanded[3].pad, vec![PadButton::Back]);
        assert_eq!(expanded[3].tilt_x, 1.0);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn replay_rejects_empty_frames() {
        let path = temp_file_path("empty");
        fs::write(&path, r#"{ "frames": [] }"#).expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("empty replay should fail");
        assert!(err.contains("frames list is empty"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn replay_rejects_non_positive_dt() {
        let path = temp_file_path("dt");
        fs::write(&path, r#"{ "fixed_dt": 0.0, "frames": [{}] }"#).expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("zero dt should fail");
        assert!(err.contains("fixed_dt"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn replay_rejects_non_finite_dt() {
        let path = temp_file_path("inf_dt");
        // Overflows f32 and parses as infinity.
        fs::write(&path, r#"{ "fixed_dt": 1e39, "frames": [{}] }"#).expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("infinite dt should fail");
        assert!(err.contains("finite"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn held_key_only_presses_on_first_frame() {
        let replay = ReplaySequence {
            fixed_dt: default_dt(),
            frames: vec![
                ReplayFrame {
                    keys: vec![Key::Enter],
                    repeat: 2,
                    ..ReplayFrame::default()
                },
                ReplayFrame {
                    repeat: 1,
                    ..ReplayFrame::default()
                },
                ReplayFrame {
                    keys: vec![Key::Enter],
                    repeat: 1,
                    ..ReplayFrame::default()
                },
            ],
        };
        let mut input = ReplayInput::new(&replay);
        let confirms: Vec<bool> = (0..4).map(|_| input.poll().intent().confirm).collect();
        assert_eq!(confirms, vec![true, false, false, true]);
        assert!(input.is_finished());
        assert_eq!(input.frames_played(), 4);

        // Past the end nothing is held.
        let after = input.poll();
        assert!(!after.is_held(Key::Enter));
    }
}
