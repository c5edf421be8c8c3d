use arrayvec::ArrayVec;
use glam::Vec2;

use crate::objects::ObjectId;
use crate::types::{DefenseKind, EnemyKind, GridPos, ObjectTag, GRID_SIZE, MAX_GAME_OBJECTS};

/// What a snapshot object looks like, enough to pick its sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectView {
    Enemy(EnemyKind),
    Defense(DefenseKind),
    Projectile,
}

impl ObjectView {
    pub fn tag(&self) -> ObjectTag {
        match self {
            ObjectView::Enemy(_) => ObjectTag::Enemy,
            ObjectView::Defense(_) => ObjectTag::Defense,
            ObjectView::Projectile => ObjectTag::Projectile,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectSnapshot {
    pub id: ObjectId,
    pub position: Vec2,
    pub view: ObjectView,
}

/// Render-facing copy of the game state, objects in draw order.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub grid_size: i32,
    pub hover: Option<GridPos>,
    pub selected: DefenseKind,
    pub paused: bool,
    pub episode_id: u32,
    pub frame: u64,
    /// Game time simulated this episode.
    pub time_ms: u64,
    pub spawned: u32,
    pub escaped: u32,
    pub placed: u32,
    pub shots_fired: u32,
    pub objects: ArrayVec<ObjectSnapshot, MAX_GAME_OBJECTS>,
}

impl FrameSnapshot {
    /// Live objects carrying `tag`.
    pub fn count(&self, tag: ObjectTag) -> usize {
        self.objects.iter().filter(|o| o.view.tag() == tag).count()
    }
}

impl Default for FrameSnapshot {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            hover: None,
            selected: DefenseKind::default(),
            paused: false,
            episode_id: 0,
            frame: 0,
            time_ms: 0,
            spawned: 0,
            escaped: 0,
            placed: 0,
            shots_fired: 0,
            objects: ArrayVec::new(),
        }
    }
}
