//! Headless platformer host -- drives a `SessionController` from a replay.
//!
//! Each replay frame is one fixed step:
//!
//!   1. `FrameClock::advance(fixed_dt)` -- deterministic frame time
//!   2. `update()` -- poll the replay once, advance the level, run the state machine
//!   3. `draw()` -- level and HUD go to a `TraceCanvas` (`RUST_LOG=trace` to see them)
//!
//! The loop stops when the session asks to exit or the replay runs out. A
//! level that fails to load ends the process with a non-zero status.

mod headless;
mod replay;
mod tile_level;

use std::path::{Path, PathBuf};
use std::time::Duration;

use plat_core::FrameClock;
use plat_session::{
    load_rules_from_path, DirContent, FrameOutcome, GameInfo, JsonLedger, ScoreLedger,
    SessionController, SessionRules,
};

use headless::{FileAudio, TraceCanvas};
use replay::{load_replay_from_path, ReplayInput};
use tile_level::TileLevelFactory;

const CONTENT_ROOT: &str = "assets/content";
const RULES_PATH: &str = "assets/config/session.json";
const GAME_INFO_PATH: &str = "assets/config/game_info.json";
const HIGHSCORE_PATH: &str = "highscores.json";
const DEFAULT_REPLAY_PATH: &str = "assets/replays/demo.json";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Platformer session starting...");

    if let Err(err) = run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let rules = load_rules_from_path(Path::new(RULES_PATH)).unwrap_or_else(|err| {
        log::warn!("{err}; using default session rules");
        SessionRules::default()
    });
    let game_info = GameInfo::load_or(Path::new(GAME_INFO_PATH), GameInfo::default());

    let replay_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_REPLAY_PATH));
    let replay = load_replay_from_path(&replay_path)?;
    let fixed_dt = Duration::try_from_secs_f32(replay.fixed_dt)
        .map_err(|e| format!("Invalid replay fixed_dt {}: {e}", replay.fixed_dt))?;
    log::info!(
        "Replaying {} ({} frames at {:.1}ms)",
        replay_path.display(),
        replay.expanded_frames().len(),
        replay.fixed_dt * 1000.0
    );

    let mut session = SessionController::new(
        rules,
        game_info,
        Box::new(DirContent::new(CONTENT_ROOT)),
        TileLevelFactory,
        JsonLedger::load(HIGHSCORE_PATH),
    )
    .map_err(|e| format!("Session failed to start: {e}"))?;

    let mut audio = FileAudio::new(CONTENT_ROOT);
    session.start_music(&mut audio);

    let mut input = ReplayInput::new(&replay);
    let mut canvas = TraceCanvas::new();
    let mut clock = FrameClock::new();

    while !input.is_finished() {
        let time = clock.advance(fixed_dt);
        let outcome = session
            .update(&time, &mut input)
            .map_err(|e| format!("Session stopped: {e}"))?;
        if outcome == FrameOutcome::Exit {
            log::info!("Exit requested at frame {}", clock.frame_count());
            break;
        }
        session
            .draw(&time, &mut canvas)
            .map_err(|e| format!("Session stopped: {e}"))?;
    }

    let counts = canvas.counts();
    log::info!(
        "Ran {} frames ({:.1}s simulated), final state {}, level {}",
        input.frames_played(),
        clock.total().as_secs_f32(),
        session.state(),
        session.level_index()
    );
    log::info!(
        "Draws: {} clears, {} texts, {} overlays, {} sprites",
        counts.clears,
        counts.texts,
        counts.overlays,
        counts.sprites
    );
    log::info!("High scores: {:?}", session.ledger().highscores());
    Ok(())
}
