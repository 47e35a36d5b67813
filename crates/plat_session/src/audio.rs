//! Background music, started best-effort.
//!
//! Some platforms refuse media playback (a device tethered to a debugger, no
//! output device). Failing to start music must never stop the game, so the
//! result is a `BestEffort` rather than a `Result`: it is logged when it is
//! built and callers are free to drop it.

pub trait AudioSink {
    fn play_looping(&mut self, track: &str) -> Result<(), String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BestEffort {
    Done,
    Skipped(String),
}

impl BestEffort {
    pub fn from_result(action: &str, result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Self::Done,
            Err(reason) => {
                log::warn!("{action} skipped: {reason}");
                Self::Skipped(reason)
            }
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

pub fn start_music(sink: &mut dyn AudioSink, track: &str) -> BestEffort {
    BestEffort::from_result("Background music", sink.play_looping(track))
}

/// Sink for hosts without audio output.
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play_looping(&mut self, track: &str) -> Result<(), String> {
        Err(format!("no audio device for '{track}'"))
    }
}
