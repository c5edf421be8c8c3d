//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the world rules, the object store and the isometric
//! transform. It has **no dependencies** on the terminal, input devices or
//! any other I/O, making it:
//!
//! - **Deterministic**: Same seed produces the same spawns and the same run
//! - **Testable**: Every rule can be exercised headless
//! - **Portable**: Any display provider can draw a [`FrameSnapshot`]
//!
//! # Module Structure
//!
//! - [`iso`]: grid <-> screen isometric projection and draw depth
//! - [`objects`]: tagged game objects and the fixed-capacity store
//! - [`spawner`]: opening wave and timed enemy spawns
//! - [`game_state`]: per-frame update, placement and player actions
//! - [`snapshot`]: render-facing copy of the state in draw order
//! - [`rng`]: small LCG so spawns replay from a seed
//!
//! # Frame Cycle
//!
//! Each fixed tick runs one linear pass over the store:
//!
//! 1. spawn enemies on schedule
//! 2. move enemies along +x, cool down defenses, fly projectiles
//! 3. ready defenses shoot at the nearest enemy in range
//! 4. cull escaped enemies and spent projectiles
//! 5. sort the store back to front by isometric depth
//!
//! # Example
//!
//! ```
//! use blockwave_core::{GameState, WorldConfig};
//! use blockwave_types::{DefenseKind, GridPos, ObjectTag, TICK_MS};
//!
//! let mut game = GameState::new(WorldConfig::default());
//! game.place_defense(GridPos::new(3, 9), DefenseKind::Defender1).unwrap();
//!
//! game.tick(TICK_MS);
//!
//! // The defender saw the opening-wave enemy on its row and fired.
//! assert_eq!(game.objects().count(ObjectTag::Projectile), 1);
//! ```

pub mod game_state;
pub mod iso;
pub mod objects;
pub mod rng;
pub mod snapshot;
pub mod spawner;

pub use blockwave_types as types;

// Re-export commonly used types for convenience
pub use game_state::{GameState, PlaceError, WorldConfig};
pub use iso::{depth, IsoProjection};
pub use objects::{
    Defense, Enemy, GameObject, ObjectBody, ObjectId, ObjectStore, Projectile, StoreFull,
};
pub use rng::SimpleRng;
pub use snapshot::{FrameSnapshot, ObjectSnapshot, ObjectView};
pub use spawner::{EnemySpawner, OPENING_WAVE};
