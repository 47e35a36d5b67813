use std::time::Duration;

/// Timing values handed to every update and draw call for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTime {
    pub elapsed: Duration,
    pub total: Duration,
    pub frame: u64,
}

impl FrameTime {
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }
}

pub struct FrameClock {
    pub max_frame: Duration,
    total: Duration,
    frame_count: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            max_frame: Duration::from_millis(250),
            total: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Advance by a fixed step, capped at `max_frame`.
    pub fn advance(&mut self, dt: Duration) -> FrameTime {
        let mut elapsed = dt;
        if elapsed > self.max_frame {
            log::warn!(
                "Frame took {:.1}ms, capping to {}ms",
                elapsed.as_secs_f64() * 1000.0,
                self.max_frame.as_millis()
            );
            elapsed = self.max_frame;
        }

        self.total += elapsed;
        self.frame_count += 1;

        FrameTime {
            elapsed,
            total: self.total,
            frame: self.frame_count,
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn total(&self) -> Duration {
        self.total
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
