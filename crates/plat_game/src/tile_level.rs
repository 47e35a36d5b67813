//! Tile-text levels for the headless host.
//!
//! One character per tile:
//!
//! | char | tile |
//! |---|---|
//! | `#` | wall |
//! | `.` | empty |
//! | `1` | player start |
//! | `X` | exit |
//! | `G` | gem |
//! | `^` | spikes |
//! | `A` `B` `C` | patrolling enemy, using `speed`, `speed2`, `speed3` |
//!
//! Enemies walk their own row in pixels per second, turning at walls and at
//! the row ends. Touching one kills the player.
//!
//! The player walks the start row only. There is no gravity or jumping; the
//! host exists to drive the session, not to be a physics playground. Once the
//! exit is reached the clock drains quickly and each drained second is worth
//! points, so a level "completes" when its timer hits zero with the exit
//! reached.

use std::io::Read;
use std::time::Duration;

use glam::Vec2;
use plat_core::{FrameTime, InputSnapshot};
use plat_session::loader::read_lines;
use plat_session::{palette, Canvas, EnemyInfo, GameInfo, GemInfo, LevelFactory, LevelSession};

pub const LEVEL_TIME: Duration = Duration::from_secs(120);
pub const WALK_SPEED_TILES: f32 = 8.0;
pub const GEM_POINTS: i64 = 10;
pub const POINTS_PER_DRAINED_SECOND: i64 = 5;
const DRAIN_RATE: u32 = 100;
const TILE_SIZE: Vec2 = Vec2::new(40.0, 32.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Empty,
    Wall,
    Exit,
    Gem,
    Spikes,
}

impl Tile {
    fn sprite(self) -> Option<&'static str> {
        match self {
            Self::Empty => None,
            Self::Wall => Some("Tiles/BlockA0"),
            Self::Exit => Some("Tiles/Exit"),
            Self::Gem => Some("Sprites/Gem"),
            Self::Spikes => Some("Tiles/Spikes"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyKind {
    A,
    B,
    C,
}

impl EnemyKind {
    fn from_char(ch: char) -> Option<Self> {
        match ch {
            'A' => Some(Self::A),
            'B' => Some(Self::B),
            'C' => Some(Self::C),
            _ => None,
        }
    }

    /// Speed in pixels per second.
    fn speed(self, info: &EnemyInfo) -> f32 {
        match self {
            Self::A => info.speed,
            Self::B => info.speed2,
            Self::C => info.speed3,
        }
    }

    fn sprite(self) -> &'static str {
        match self {
            Self::A => "Sprites/MonsterA",
            Self::B => "Sprites/MonsterB",
            Self::C => "Sprites/MonsterC",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Enemy {
    kind: EnemyKind,
    row: usize,
    x: f32,
    direction: f32,
    speed_tiles: f32,
}

pub struct TileLevel {
    index: usize,
    tiles: Vec<Vec<Tile>>,
    enemies: Vec<Enemy>,
    player_row: usize,
    player_x: f32,
    alive: bool,
    reached_exit: bool,
    time_remaining: Duration,
    score: i64,
    gem: GemInfo,
}

impl TileLevel {
    pub fn parse(index: usize, lines: &[String], info: &GameInfo) -> Result<Self, String> {
        let rows: Vec<&str> = lines
            .iter()
            .map(|l| l.trim_end())
            .filter(|l| !l.is_empty())
            .collect();
        if rows.is_empty() {
            return Err(format!("Level {index} validation failed: no rows"));
        }

        let width = rows[0].chars().count();
        let mut tiles = Vec::with_capacity(rows.len());
        let mut start = None;
        let mut exits = 0;
        let mut enemies = Vec::new();

        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(format!(
                    "Level {index} validation failed: row {y} has width {} but expected {width}",
                    row.chars().count()
                ));
            }
            let mut parsed = Vec::with_capacity(width);
            for (x, ch) in row.chars().enumerate() {
                if let Some(kind) = EnemyKind::from_char(ch) {
                    enemies.push(Enemy {
                        kind,
                        row: y,
                        x: x as f32,
                        direction: 1.0,
                        speed_tiles: kind.speed(&info.enemy_info) / TILE_SIZE.x,
                    });
                    parsed.push(Tile::Empty);
                    continue;
                }
                let tile = match ch {
                    '#' => Tile::Wall,
                    '.' => Tile::Empty,
                    'X' => {
                        exits += 1;
                        Tile::Exit
                    }
                    'G' => Tile::Gem,
                    '^' => Tile::Spikes,
                    '1' => {
                        if start.replace((x, y)).is_some() {
                            return Err(format!(
                                "Level {index} validation failed: more than one start"
                            ));
                        }
                        Tile::Empty
                    }
                    other => {
                        return Err(format!(
                            "Level {index} validation failed: unsupported tile '{other}' at ({x}, {y})"
                        ))
                    }
                };
                parsed.push(tile);
            }
            tiles.push(parsed);
        }

        let Some((start_x, start_y)) = start else {
            return Err(format!("Level {index} validation failed: no start"));
        };
        if exits != 1 {
            return Err(format!(
                "Level {index} validation failed: expected one exit, found {exits}"
            ));
        }

        Ok(Self {
            index,
            tiles,
            enemies,
            player_row: start_y,
            player_x: start_x as f32,
            alive: true,
            reached_exit: false,
            time_remaining: LEVEL_TIME,
            score: 0,
            gem: info.gem_info.clone(),
        })
    }

    pub fn player_column(&self) -> usize {
        self.player_x.round() as usize
    }

    fn tile_at(&self, column: usize) -> Tile {
        self.tiles[self.player_row]
            .get(column)
            .copied()
            .unwrap_or(Tile::Wall)
    }

    fn walk(&mut self, move_x: f32, dt: f32) {
        if move_x == 0.0 {
            return;
        }
        let width = self.tiles[self.player_row].len();
        let target = (self.player_x + move_x * WALK_SPEED_TILES * dt).clamp(0.0, (width - 1) as f32);
        if self.tile_at(target.round() as usize) != Tile::Wall {
            self.player_x = target;
        }
    }

    fn touch_tile(&mut self) {
        let column = self.player_column();
        match self.tile_at(column) {
            Tile::Gem => {
                self.tiles[self.player_row][column] = Tile::Empty;
                self.score += GEM_POINTS;
                log::debug!("Level {}: gem collected", self.index);
            }
            Tile::Spikes => {
                self.alive = false;
                log::info!("Level {}: player killed by spikes", self.index);
            }
            Tile::Exit => {
                self.reached_exit = true;
                log::info!("Level {}: exit reached", self.index);
            }
            Tile::Empty | Tile::Wall => {}
        }
    }

    pub fn enemy_columns(&self) -> Vec<usize> {
        self.enemies.iter().map(|e| e.x.round() as usize).collect()
    }

    fn patrol(&mut self, dt: f32) {
        for enemy in &mut self.enemies {
            let row = &self.tiles[enemy.row];
            let target = enemy.x + enemy.direction * enemy.speed_tiles * dt;
            let blocked = target < 0.0
                || target > (row.len() - 1) as f32
                || row.get(target.round() as usize) == Some(&Tile::Wall);
            if blocked {
                enemy.direction = -enemy.direction;
            } else {
                enemy.x = target;
            }
        }
    }

    fn touch_enemies(&mut self) {
        let hit = self
            .enemies
            .iter()
            .any(|e| e.row == self.player_row && (e.x - self.player_x).abs() < 0.5);
        if hit {
            self.alive = false;
            log::info!("Level {}: player killed by an enemy", self.index);
        }
    }

    fn drain_clock(&mut self, elapsed: Duration) {
        let before = self.time_remaining.as_secs();
        self.time_remaining = self.time_remaining.saturating_sub(elapsed * DRAIN_RATE);
        let drained = before - self.time_remaining.as_secs();
        self.score += drained as i64 * POINTS_PER_DRAINED_SECOND;
    }
}

impl LevelSession for TileLevel {
    fn is_player_alive(&self) -> bool {
        self.alive
    }

    fn time_remaining(&self) -> Duration {
        self.time_remaining
    }

    fn reached_exit(&self) -> bool {
        self.reached_exit
    }

    fn score(&self) -> i64 {
        self.score
    }

    fn update(&mut self, time: &FrameTime, input: &InputSnapshot) {
        if !self.alive {
            return;
        }
        if self.reached_exit {
            self.drain_clock(time.elapsed);
            return;
        }
        self.time_remaining = self.time_remaining.saturating_sub(time.elapsed);
        self.walk(input.move_x(), time.elapsed_secs());
        self.patrol(time.elapsed_secs());
        self.touch_tile();
        if self.alive && !self.reached_exit {
            self.touch_enemies();
        }
    }

    fn draw(&mut self, time: &FrameTime, canvas: &mut dyn Canvas) {
        let bob = self.gem.bounce_height
            * TILE_SIZE.y
            * (time.total.as_secs_f32() * self.gem.bounce_rate).sin();
        for (y, row) in self.tiles.iter().enumerate() {
            for (x, tile) in row.iter().enumerate() {
                let Some(sprite) = tile.sprite() else {
                    continue;
                };
                let mut position = Vec2::new(x as f32, y as f32) * TILE_SIZE;
                let color = if *tile == Tile::Gem {
                    position.y += bob;
                    self.gem.color
                } else {
                    palette::WHITE
                };
                canvas.draw_sprite(sprite, position, color);
            }
        }
        for enemy in &self.enemies {
            let position = Vec2::new(enemy.x, enemy.row as f32) * TILE_SIZE;
            canvas.draw_sprite(enemy.kind.sprite(), position, palette::WHITE);
        }
        let player = Vec2::new(self.player_x, self.player_row as f32) * TILE_SIZE;
        let sprite = if self.alive {
            "Sprites/Player/Idle"
        } else {
            "Sprites/Player/Die"
        };
        canvas.draw_sprite(sprite, player, palette::WHITE);
    }

    fn unload(&mut self) {
        log::debug!("Unloading level {}", self.index);
    }
}

pub struct TileLevelFactory;

impl LevelFactory for TileLevelFactory {
    type Level = TileLevel;

    fn build(
        &mut self,
        info: &GameInfo,
        stream: &mut dyn Read,
        index: usize,
    ) -> Result<TileLevel, String> {
        let lines = read_lines(stream);
        TileLevel::parse(index, &lines, info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plat_core::{InputState, Key};
    use std::io::Cursor;

    fn lines(rows: &[&str]) -> Vec<String> {
        rows.iter().map(|r| r.to_string()).collect()
    }

    fn frame(ms: u64) -> FrameTime {
        FrameTime {
            elapsed: Duration::from_millis(ms),
            ..FrameTime::default()
        }
    }

    fn holding(key: Key) -> InputSnapshot {
        let mut input = InputState::new();
        input.key_down(key);
        input.snapshot()
    }

    #[test]
    fn factory_builds_from_stream() {
        let mut stream = Cursor::new("#####\n#1GX#\n#####\n");
        let level = TileLevelFactory
            .build(&GameInfo::default(), &mut stream, 0)
            .expect("level should parse");
        assert_eq!(level.player_column(), 1);
        assert_eq!(level.time_remaining(), LEVEL_TIME);
        assert!(level.is_player_alive());
        assert!(!level.reached_exit());
    }

    #[test]
    fn parse_rejects_ragged_rows() {
        let err = TileLevel::parse(2, &lines(&["####", "#1X", "####"]), &GameInfo::default())
            .err()
            .expect("ragged rows");
        assert!(err.contains("row 1 has width 3"));
    }

    #[test]
    fn parse_rejects_missing_start_and_extra_exits() {
        let err = TileLevel::parse(0, &lines(&["#..X#"]), &GameInfo::default())
            .err()
            .expect("no start");
        assert!(err.contains("no start"));

        let err = TileLevel::parse(0, &lines(&["#1XX#"]), &GameInfo::default())
            .err()
            .expect("two exits");
        assert!(err.contains("found 2"));

        let err = TileLevel::parse(0, &lines(&["#1?X#"]), &GameInfo::default())
            .err()
            .expect("unknown tile");
        assert!(err.contains("unsupported tile '?'"));
    }

    #[test]
    fn walking_collects_gems_and_reaches_exit() {
        let mut level =
            TileLevel::parse(0, &lines(&["#1G.X#"]), &GameInfo::default()).expect("parse");
        let right = holding(Key::Right);
        for _ in 0..60 {
            level.update(&frame(50), &right);
            if level.reached_exit() {
                break;
            }
        }
        assert!(level.reached_exit());
        assert_eq!(level.score(), GEM_POINTS);
        assert_eq!(level.player_column(), 4);
    }

    #[test]
    fn walls_block_movement() {
        let mut level = TileLevel::parse(0, &lines(&["#1#X."]), &GameInfo::default()).expect("parse");
        let right = holding(Key::Right);
        for _ in 0..20 {
            level.update(&frame(50), &right);
        }
        assert!(!level.reached_exit());
        assert!(level.player_column() <= 1);
    }

    #[test]
    fn spikes_kill_and_freeze_the_level() {
        let mut level = TileLevel::parse(0, &lines(&["1^..X"]), &GameInfo::default()).expect("parse");
        let right = holding(Key::Right);
        for _ in 0..10 {
            level.update(&frame(50), &right);
        }
        assert!(!level.is_player_alive());
        let frozen = level.time_remaining();
        level.update(&frame(500), &right);
        assert_eq!(level.time_remaining(), frozen);
    }

    #[test]
    fn clock_runs_out_while_walking() {
        let mut level = TileLevel::parse(0, &lines(&["1...X"]), &GameInfo::default()).expect("parse");
        let idle = InputState::new().snapshot();
        for _ in 0..5 {
            level.update(&frame(30_000), &idle);
        }
        assert_eq!(level.time_remaining(), Duration::ZERO);
        assert!(!level.reached_exit());
    }

    #[test]
    fn reaching_exit_drains_clock_into_score() {
        let mut level = TileLevel::parse(0, &lines(&["1X"]), &GameInfo::default()).expect("parse");
        let right = holding(Key::Right);
        while !level.reached_exit() {
            level.update(&frame(100), &right);
        }
        let remaining = level.time_remaining().as_secs() as i64;
        let idle = InputState::new().snapshot();
        while level.time_remaining() > Duration::ZERO {
            level.update(&frame(100), &idle);
        }
        assert_eq!(level.score(), remaining * POINTS_PER_DRAINED_SECOND);
    }

    fn enemy_speeds(speed: f32, speed2: f32, speed3: f32) -> GameInfo {
        GameInfo {
            enemy_info: EnemyInfo {
                speed,
                speed2,
                speed3,
            },
            ..GameInfo::default()
        }
    }

    #[test]
    fn enemies_patrol_and_turn_at_walls() {
        // 40 px/s is one tile per second.
        let info = enemy_speeds(40.0, 0.0, 0.0);
        let mut level = TileLevel::parse(0, &lines(&["#A..#", "#1.X#"]), &info).expect("parse");
        let idle = InputState::new().snapshot();
        for _ in 0..5 {
            level.update(&frame(500), &idle);
        }
        assert_eq!(level.enemy_columns(), vec![3]);
        for _ in 0..2 {
            level.update(&frame(500), &idle);
        }
        assert_eq!(level.enemy_columns(), vec![2]);
        assert!(level.is_player_alive());
    }

    #[test]
    fn enemy_speed_tiers_come_from_tuning() {
        let info = enemy_speeds(40.0, 80.0, 120.0);
        let mut level = TileLevel::parse(
            0,
            &lines(&["#A.......#", "#B.......#", "#C.......#", "#1......X#"]),
            &info,
        )
        .expect("parse");
        level.update(&frame(1000), &InputState::new().snapshot());
        assert_eq!(level.enemy_columns(), vec![2, 3, 4]);
    }

    #[test]
    fn touching_an_enemy_kills_the_player() {
        let info = enemy_speeds(0.0, 80.0, 0.0);
        let mut level =
            TileLevel::parse(0, &lines(&["#1..B.X#"]), &info).expect("parse");
        let idle = InputState::new().snapshot();
        for _ in 0..60 {
            level.update(&frame(100), &idle);
            if !level.is_player_alive() {
                break;
            }
        }
        assert!(!level.is_player_alive());
        assert!(!level.reached_exit());
    }

    #[test]
    fn draw_tints_gems_with_tuning_color() {
        struct Sprites(Vec<(String, [f32; 4])>);
        impl Canvas for Sprites {
            fn viewport(&self) -> plat_session::Viewport {
                plat_session::Viewport {
                    x: 0.0,
                    y: 0.0,
                    width: 100.0,
                    height: 100.0,
                }
            }
            fn clear(&mut self, _color: plat_session::Color) {}
            fn measure_text(&self, _text: &str) -> Vec2 {
                Vec2::ZERO
            }
            fn draw_text(&mut self, _text: &str, _position: Vec2, _color: plat_session::Color) {}
            fn overlay_size(&self, _overlay: plat_session::Overlay) -> Vec2 {
                Vec2::ZERO
            }
            fn draw_overlay(&mut self, _overlay: plat_session::Overlay, _position: Vec2) {}
            fn draw_sprite(&mut self, sprite: &str, _position: Vec2, color: plat_session::Color) {
                self.0.push((sprite.to_string(), color));
            }
        }

        let gem = GemInfo {
            color: palette::YELLOW,
            ..GemInfo::default()
        };
        let info = GameInfo {
            gem_info: gem,
            ..GameInfo::default()
        };
        let mut level = TileLevel::parse(0, &lines(&["#1GX#"]), &info).expect("parse");
        let mut canvas = Sprites(Vec::new());
        level.draw(&frame(16), &mut canvas);

        assert!(canvas
            .0
            .contains(&("Sprites/Gem".to_string(), palette::YELLOW)));
        assert_eq!(canvas.0.last().map(|(s, _)| s.as_str()), Some("Sprites/Player/Idle"));
        assert_eq!(canvas.0.len(), 5);
    }
}
