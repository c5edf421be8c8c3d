//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the game.
//! All types are plain data with no external dependencies, so they can be
//! used by the simulation, the terminal view and the input layer alike.
//!
//! # Grid
//!
//! The playfield is a square grid of `GRID_SIZE` x `GRID_SIZE` tiles
//! (indexed `0..GRID_SIZE` on both axes). Enemies enter at column 0 and walk
//! along +x until they leave the grid.
//!
//! # Tile Geometry
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TILE_WIDTH` | 64 | Pixel width of one isometric tile |
//! | `TILE_HEIGHT` | 32 | Pixel height of one isometric tile |
//! | `ORIGIN_Y` | 100 | Vertical offset of the grid's top vertex |
//! | `TERM_TILE_WIDTH` | 4 | Tile width in terminal columns |
//! | `TERM_TILE_HEIGHT` | 2 | Tile height in terminal rows |
//!
//! # Timing
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `ENEMY_SPAWN_INTERVAL_MS` | 2000 | Time between spawned enemies |
//! | `PROJECTILE_LIFETIME_MS` | 1500 | Projectile lifetime |
//!
//! # Examples
//!
//! ```
//! use blockwave_types::{DefenseKind, EnemyKind, GameAction, GridPos, GRID_SIZE};
//!
//! assert_eq!(EnemyKind::from_str("type2"), Some(EnemyKind::Type2));
//! assert_eq!(EnemyKind::Type1.speed(), 0.25);
//!
//! let action = GameAction::from_str("place").unwrap();
//! assert_eq!(action, GameAction::PlaceDefense);
//!
//! assert!(GridPos::new(0, 24).in_bounds(GRID_SIZE));
//! assert!(!GridPos::new(25, 0).in_bounds(GRID_SIZE));
//! assert_eq!(DefenseKind::Defender2.as_str(), "defender2");
//! ```

/// Grid edge length in tiles (25 x 25)
pub const GRID_SIZE: i32 = 25;

/// Pixel width of an isometric tile
pub const TILE_WIDTH: u32 = 64;

/// Pixel height of an isometric tile
pub const TILE_HEIGHT: u32 = 32;

/// Vertical screen offset of the grid's top vertex in pixel geometry
pub const ORIGIN_Y: u32 = 100;

/// Tile width in terminal columns.
///
/// Terminal glyphs are roughly twice as tall as they are wide, so a 4x2 cell
/// footprint keeps the diamond close to its pixel proportions.
pub const TERM_TILE_WIDTH: u32 = 4;

/// Tile height in terminal rows
pub const TERM_TILE_HEIGHT: u32 = 2;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Maximum number of live game objects (enemies, defenses and projectiles)
pub const MAX_GAME_OBJECTS: usize = 512;

/// Game time between two spawned enemies
pub const ENEMY_SPAWN_INTERVAL_MS: u32 = 2000;

/// Projectile speed in tiles per second
pub const PROJECTILE_SPEED: f32 = 6.0;

/// Time a projectile lives before it is culled
pub const PROJECTILE_LIFETIME_MS: u32 = 1500;

/// DAS (Delayed Auto Shift) delay for held cursor keys.
pub const CURSOR_DAS_MS: u32 = 150;

/// ARR (Auto Repeat Rate) for held cursor keys.
pub const CURSOR_ARR_MS: u32 = 50;


/// Integer tile coordinate on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// True when the tile lies inside a `grid_size` x `grid_size` grid.
    pub fn in_bounds(&self, grid_size: i32) -> bool {
        self.x >= 0 && self.x < grid_size && self.y >= 0 && self.y < grid_size
    }

    /// Step one tile in `dir`, clamped to the grid.
    pub fn step_clamped(&self, dir: Direction, grid_size: i32) -> Self {
        let (dx, dy) = dir.delta();
        let max = grid_size.saturating_sub(1).max(0);
        Self {
            x: (self.x + dx).clamp(0, max),
            y: (self.y + dy).clamp(0, max),
        }
    }
}

/// Enemy variants
///
/// - **Type1**: slow walker (0.25 tiles/s)
/// - **Type2**: fast walker (0.5 tiles/s)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Type1,
    Type2,
}

impl EnemyKind {
    /// Walking speed along +x in tiles per second
    pub fn speed(&self) -> f32 {
        match self {
            EnemyKind::Type1 => 0.25,
            EnemyKind::Type2 => 0.5,
        }
    }

    /// Parse enemy kind from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "type1" | "1" => Some(EnemyKind::Type1),
            "type2" | "2" => Some(EnemyKind::Type2),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyKind::Type1 => "type1",
            EnemyKind::Type2 => "type2",
        }
    }
}

/// Defender variants
///
/// - **Defender1**: long range, slow fire (5 tiles, 1000ms)
/// - **Defender2**: short range, fast fire (3 tiles, 400ms)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DefenseKind {
    #[default]
    Defender1,
    Defender2,
}

impl DefenseKind {
    /// Targeting range in tiles
    pub fn range(&self) -> f32 {
        match self {
            DefenseKind::Defender1 => 5.0,
            DefenseKind::Defender2 => 3.0,
        }
    }

    /// Minimum time between two shots
    pub fn fire_interval_ms(&self) -> u32 {
        match self {
            DefenseKind::Defender1 => 1000,
            DefenseKind::Defender2 => 400,
        }
    }

    /// Parse defender kind from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "defender1" | "1" => Some(DefenseKind::Defender1),
            "defender2" | "2" => Some(DefenseKind::Defender2),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DefenseKind::Defender1 => "defender1",
            DefenseKind::Defender2 => "defender2",
        }
    }
}

/// Variant tag of a game object.
///
/// The discriminant order is also the draw layer used to break depth ties:
/// enemies first, then defenses, projectiles on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectTag {
    Enemy,
    Defense,
    Projectile,
}

impl ObjectTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectTag::Enemy => "enemy",
            ObjectTag::Defense => "defense",
            ObjectTag::Projectile => "projectile",
        }
    }
}

/// Cursor movement direction in grid space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Grid delta for one step.
    ///
    /// Directions are in grid space, not screen space: `Up` decreases y.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Player actions that modify game state
///
/// These come from the keyboard; mouse input is resolved to a grid tile by
/// the engine before it reaches the game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Move the hover cursor one tile
    MoveCursor(Direction),
    /// Place the selected defender on the hovered tile
    PlaceDefense,
    /// Choose which defender the next placement uses
    SelectDefense(DefenseKind),
    /// Toggle pause state
    Pause,
    /// Restart the game
    Restart,
}

impl GameAction {
    /// Parse action from string
    ///
    /// # Examples
    ///
    /// ```
    /// use blockwave_types::{Direction, GameAction};
    ///
    /// assert_eq!(GameAction::from_str("cursorUp"), Some(GameAction::MoveCursor(Direction::Up)));
    /// assert_eq!(GameAction::from_str("pause"), Some(GameAction::Pause));
    /// assert_eq!(GameAction::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cursorup" => Some(GameAction::MoveCursor(Direction::Up)),
            "cursordown" => Some(GameAction::MoveCursor(Direction::Down)),
            "cursorleft" => Some(GameAction::MoveCursor(Direction::Left)),
            "cursorright" => Some(GameAction::MoveCursor(Direction::Right)),
            "place" => Some(GameAction::PlaceDefense),
            "selectdefender1" => Some(GameAction::SelectDefense(DefenseKind::Defender1)),
            "selectdefender2" => Some(GameAction::SelectDefense(DefenseKind::Defender2)),
            "pause" => Some(GameAction::Pause),
            "restart" => Some(GameAction::Restart),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveCursor(Direction::Up) => "cursorUp",
            GameAction::MoveCursor(Direction::Down) => "cursorDown",
            GameAction::MoveCursor(Direction::Left) => "cursorLeft",
            GameAction::MoveCursor(Direction::Right) => "cursorRight",
            GameAction::PlaceDefense => "place",
            GameAction::SelectDefense(DefenseKind::Defender1) => "selectDefender1",
            GameAction::SelectDefense(DefenseKind::Defender2) => "selectDefender2",
            GameAction::Pause => "pause",
            GameAction::Restart => "restart",
        }
    }
}
