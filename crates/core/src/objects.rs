//! Game objects and the fixed-capacity object store.
//!
//! Every live entity (enemy, defense, projectile) sits in one array. The
//! update loop walks it linearly, and it is sorted by isometric depth once
//! per frame so drawing can iterate it back to front.

use std::fmt;

use arrayvec::ArrayVec;
use glam::Vec2;

use crate::iso::depth;
use crate::types::{DefenseKind, EnemyKind, GridPos, ObjectTag, MAX_GAME_OBJECTS};

/// Stable identity of a game object.
///
/// Ids are never reused within one store, so they stay valid as handles
/// across sorts and removals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u32);

/// An enemy walking along +x
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enemy {
    pub position: Vec2,
    pub kind: EnemyKind,
}

/// A placed defender
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Defense {
    pub position: Vec2,
    pub kind: DefenseKind,
    /// Time until the next shot may be fired.
    pub cooldown_ms: u32,
}

/// A shot travelling in a straight line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub position: Vec2,
    /// Tiles per second.
    pub velocity: Vec2,
    pub ttl_ms: u32,
    pub source: ObjectId,
}

/// Variant payload of a game object
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObjectBody {
    Enemy(Enemy),
    Defense(Defense),
    Projectile(Projectile),
}

impl ObjectBody {
    pub fn tag(&self) -> ObjectTag {
        match self {
            ObjectBody::Enemy(_) => ObjectTag::Enemy,
            ObjectBody::Defense(_) => ObjectTag::Defense,
            ObjectBody::Projectile(_) => ObjectTag::Projectile,
        }
    }

    pub fn position(&self) -> Vec2 {
        match self {
            ObjectBody::Enemy(e) => e.position,
            ObjectBody::Defense(d) => d.position,
            ObjectBody::Projectile(p) => p.position,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameObject {
    pub id: ObjectId,
    pub body: ObjectBody,
}

impl GameObject {
    pub fn tag(&self) -> ObjectTag {
        self.body.tag()
    }

    pub fn position(&self) -> Vec2 {
        self.body.position()
    }

    pub fn depth(&self) -> f32 {
        depth(self.position())
    }
}

/// Returned when the store is at capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreFull {
    pub capacity: usize,
}

impl fmt::Display for StoreFull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object store is full ({} objects)", self.capacity)
    }
}

impl std::error::Error for StoreFull {}

/// Fixed-capacity array of game objects.
#[derive(Debug, Clone)]
pub struct ObjectStore {
    objects: ArrayVec<GameObject, MAX_GAME_OBJECTS>,
    next_id: u32,
}

impl ObjectStore {
    pub fn new() -> Self {
        Self {
            objects: ArrayVec::new(),
            next_id: 1,
        }
    }

    /// Append an object, or reject it when the store is full.
    ///
    /// A rejected spawn does not consume an id.
    pub fn spawn(&mut self, body: ObjectBody) -> Result<ObjectId, StoreFull> {
        if self.objects.is_full() {
            return Err(StoreFull {
                capacity: self.objects.capacity(),
            });
        }
        let id = ObjectId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.objects.push(GameObject { id, body });
        Ok(id)
    }

    pub fn add_enemy(&mut self, position: Vec2, kind: EnemyKind) -> Result<ObjectId, StoreFull> {
        self.spawn(ObjectBody::Enemy(Enemy { position, kind }))
    }

    /// Add a defender; it may fire on its first tick.
    pub fn add_defense(
        &mut self,
        position: Vec2,
        kind: DefenseKind,
    ) -> Result<ObjectId, StoreFull> {
        self.spawn(ObjectBody::Defense(Defense {
            position,
            kind,
            cooldown_ms: 0,
        }))
    }

    pub fn add_projectile(&mut self, projectile: Projectile) -> Result<ObjectId, StoreFull> {
        self.spawn(ObjectBody::Projectile(projectile))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.objects.is_full()
    }

    pub fn capacity(&self) -> usize {
        self.objects.capacity()
    }

    pub fn as_slice(&self) -> &[GameObject] {
        &self.objects
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GameObject> {
        self.objects.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, GameObject> {
        self.objects.iter_mut()
    }

    pub fn get(&self, id: ObjectId) -> Option<&GameObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut GameObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    /// Number of live objects carrying `tag`.
    pub fn count(&self, tag: ObjectTag) -> usize {
        self.objects.iter().filter(|o| o.tag() == tag).count()
    }

    /// The defense standing on `tile`, if any.
    pub fn defense_at(&self, tile: GridPos) -> Option<&GameObject> {
        self.objects.iter().find(|o| match o.body {
            ObjectBody::Defense(d) => {
                d.position.x as i32 == tile.x && d.position.y as i32 == tile.y
            }
            _ => false,
        })
    }

    /// Keep only objects for which `keep` returns true.
    ///
    /// Survivors keep their relative order.
    pub fn retain(&mut self, keep: impl FnMut(&mut GameObject) -> bool) {
        self.objects.retain(keep);
    }

    /// Order objects back to front for drawing.
    ///
    /// Sorts by isometric depth, then by draw layer (enemies, defenses,
    /// projectiles). The sort is stable, so equal keys keep insertion order.
    pub fn sort_by_depth(&mut self) {
        self.objects.sort_by(|a, b| {
            a.depth()
                .total_cmp(&b.depth())
                .then_with(|| a.tag().cmp(&b.tag()))
        });
    }

    /// Remove every object. Ids keep counting up.
    pub fn clear(&mut self) {
        self.objects.clear();
    }
}

impl Default for ObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a ObjectStore {
    type Item = &'a GameObject;
    type IntoIter = std::slice::Iter<'a, GameObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.iter()
    }
}
