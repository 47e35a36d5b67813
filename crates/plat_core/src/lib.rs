pub mod input;
pub mod time;

pub use input::{DisplayOrientation, FrameIntent, InputSnapshot, InputSource, InputState, Key, PadButton};
pub use time::{FrameClock, FrameTime};
