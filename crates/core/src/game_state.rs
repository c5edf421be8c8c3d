//! Game state module - owns the object store and runs the per-frame update.
//!
//! One call to [`GameState::tick`] is one fixed timestep. The update is a
//! linear pass over the object store in a fixed order: spawn, move enemies,
//! fire defenses, move projectiles, cull, then sort by depth for drawing.

use arrayvec::ArrayVec;
use glam::Vec2;

use crate::objects::{ObjectBody, ObjectId, ObjectStore, Projectile, StoreFull};
use crate::snapshot::{FrameSnapshot, ObjectSnapshot, ObjectView};
use crate::spawner::EnemySpawner;
use crate::types::*;

/// World parameters fixed for the lifetime of a game (and kept on restart).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldConfig {
    pub grid_size: i32,
    pub seed: u32,
    /// 0 disables timed spawning; only the opening wave appears.
    pub spawn_interval_ms: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            seed: 1,
            spawn_interval_ms: ENEMY_SPAWN_INTERVAL_MS,
        }
    }
}

/// Why a defender could not be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceError {
    OutOfBounds,
    Occupied,
    StoreFull,
    NotPlayable,
}

impl PlaceError {
    pub fn code(self) -> &'static str {
        match self {
            PlaceError::OutOfBounds | PlaceError::Occupied => "invalid_place",
            PlaceError::StoreFull => "store_full",
            PlaceError::NotPlayable => "not_playable",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            PlaceError::OutOfBounds => "tile is outside the grid",
            PlaceError::Occupied => "tile already holds a defender",
            PlaceError::StoreFull => "no room for another game object",
            PlaceError::NotPlayable => "game is paused",
        }
    }
}

impl From<StoreFull> for PlaceError {
    fn from(_: StoreFull) -> Self {
        PlaceError::StoreFull
    }
}

/// A shot decided during the firing pass, applied once the scan is done.
#[derive(Debug, Clone, Copy)]
struct PendingShot {
    source: ObjectId,
    interval_ms: u32,
    from: Vec2,
    velocity: Vec2,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    config: WorldConfig,
    objects: ObjectStore,
    spawner: EnemySpawner,
    hover: Option<GridPos>,
    selected: DefenseKind,
    paused: bool,
    /// Monotonic episode id (increments on restart).
    episode_id: u32,
    /// Fixed ticks simulated this episode.
    frame: u64,
    time_ms: u64,
    spawned: u32,
    escaped: u32,
    placed: u32,
    shots_fired: u32,
}

impl GameState {
    /// Create a game with the opening wave already on the grid.
    pub fn new(config: WorldConfig) -> Self {
        let mut objects = ObjectStore::new();
        let mut spawner = EnemySpawner::new(config.spawn_interval_ms, config.seed);
        let spawned = spawner.spawn_opening_wave(config.grid_size, &mut objects);
        objects.sort_by_depth();

        Self {
            config,
            objects,
            spawner,
            hover: None,
            selected: DefenseKind::default(),
            paused: false,
            episode_id: 0,
            frame: 0,
            time_ms: 0,
            spawned,
            escaped: 0,
            placed: 0,
            shots_fired: 0,
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn grid_size(&self) -> i32 {
        self.config.grid_size
    }

    pub fn objects(&self) -> &ObjectStore {
        &self.objects
    }

    #[cfg(test)]
    pub fn objects_mut(&mut self) -> &mut ObjectStore {
        &mut self.objects
    }

    pub fn hover(&self) -> Option<GridPos> {
        self.hover
    }

    pub fn selected(&self) -> DefenseKind {
        self.selected
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn time_ms(&self) -> u64 {
        self.time_ms
    }

    pub fn spawned(&self) -> u32 {
        self.spawned
    }

    pub fn escaped(&self) -> u32 {
        self.escaped
    }

    pub fn placed(&self) -> u32 {
        self.placed
    }

    pub fn shots_fired(&self) -> u32 {
        self.shots_fired
    }

    /// Set the hovered tile. Out-of-bounds tiles clear the hover.
    pub fn set_hover(&mut self, tile: Option<GridPos>) {
        self.hover = tile.filter(|t| t.in_bounds(self.config.grid_size));
    }

    /// Move the hover cursor one tile, clamped to the grid.
    ///
    /// With no hover yet, the cursor appears in the middle of the grid.
    pub fn move_cursor(&mut self, dir: Direction) {
        let n = self.config.grid_size;
        if n <= 0 {
            return;
        }
        self.hover = Some(match self.hover {
            Some(at) => at.step_clamped(dir, n),
            None => GridPos::new(n / 2, n / 2),
        });
    }

    pub fn select(&mut self, kind: DefenseKind) {
        self.selected = kind;
    }

    /// Place a defender on `at`.
    pub fn place_defense(&mut self, at: GridPos, kind: DefenseKind) -> Result<ObjectId, PlaceError> {
        if self.paused {
            return Err(PlaceError::NotPlayable);
        }
        if !at.in_bounds(self.config.grid_size) {
            return Err(PlaceError::OutOfBounds);
        }
        if self.objects.defense_at(at).is_some() {
            return Err(PlaceError::Occupied);
        }

        let id = self
            .objects
            .add_defense(Vec2::new(at.x as f32, at.y as f32), kind)?;
        self.placed = self.placed.wrapping_add(1);
        self.objects.sort_by_depth();
        log::info!("placed {} at ({}, {})", kind.as_str(), at.x, at.y);
        Ok(id)
    }

    /// Place the selected defender on the hovered tile.
    pub fn place_at_hover(&mut self) -> Result<ObjectId, PlaceError> {
        let at = self.hover.ok_or(PlaceError::OutOfBounds)?;
        self.place_defense(at, self.selected)
    }

    /// Advance the world by one fixed timestep.
    ///
    /// Returns false when nothing was simulated (paused).
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if self.paused {
            return false;
        }

        let dt = elapsed_ms as f32 / 1000.0;
        let grid_size = self.config.grid_size;

        self.spawned += self.spawner.update(elapsed_ms, grid_size, &mut self.objects);

        // Enemies walk along +x; projectiles fly; defenses cool down.
        for obj in self.objects.iter_mut() {
            match &mut obj.body {
                ObjectBody::Enemy(enemy) => {
                    enemy.position.x += enemy.kind.speed() * dt;
                }
                ObjectBody::Defense(defense) => {
                    defense.cooldown_ms = defense.cooldown_ms.saturating_sub(elapsed_ms);
                }
                ObjectBody::Projectile(p) => {
                    p.position += p.velocity * dt;
                    p.ttl_ms = p.ttl_ms.saturating_sub(elapsed_ms);
                }
            }
        }

        self.fire_defenses();

        let mut escaped = 0;
        let n = grid_size as f32;
        self.objects.retain(|obj| match &obj.body {
            ObjectBody::Enemy(enemy) => {
                if enemy.position.x >= n {
                    escaped += 1;
                    false
                } else {
                    true
                }
            }
            ObjectBody::Defense(_) => true,
            ObjectBody::Projectile(p) => {
                p.ttl_ms > 0
                    && p.position.x >= 0.0
                    && p.position.y >= 0.0
                    && p.position.x < n
                    && p.position.y < n
            }
        });
        if escaped > 0 {
            log::info!("{escaped} enemy(s) escaped");
            self.escaped += escaped;
        }

        self.objects.sort_by_depth();

        self.frame += 1;
        self.time_ms += elapsed_ms as u64;
        true
    }

    /// Every ready defense with an enemy in range shoots at the nearest one.
    fn fire_defenses(&mut self) {
        let mut shots: ArrayVec<PendingShot, MAX_GAME_OBJECTS> = ArrayVec::new();

        for obj in self.objects.iter() {
            let ObjectBody::Defense(defense) = obj.body else {
                continue;
            };
            if defense.cooldown_ms > 0 {
                continue;
            }
            let Some(target) = self.nearest_enemy(defense.position, defense.kind.range()) else {
                continue;
            };

            let dir = (target - defense.position).normalize_or_zero();
            if dir == Vec2::ZERO {
                continue;
            }
            let _ = shots.try_push(PendingShot {
                source: obj.id,
                interval_ms: defense.kind.fire_interval_ms(),
                from: defense.position,
                velocity: dir * PROJECTILE_SPEED,
            });
        }

        for shot in shots {
            let projectile = Projectile {
                position: shot.from,
                velocity: shot.velocity,
                ttl_ms: PROJECTILE_LIFETIME_MS,
                source: shot.source,
            };
            match self.objects.add_projectile(projectile) {
                Ok(_) => {
                    self.shots_fired = self.shots_fired.wrapping_add(1);
                    if let Some(ObjectBody::Defense(d)) =
                        self.objects.get_mut(shot.source).map(|o| &mut o.body)
                    {
                        d.cooldown_ms = shot.interval_ms;
                    }
                }
                // Cooldown stays at zero so the defense retries next tick.
                Err(e) => log::debug!("shot from {:?} skipped: {e}", shot.source),
            }
        }
    }

    fn nearest_enemy(&self, from: Vec2, range: f32) -> Option<Vec2> {
        let range_sq = range * range;
        self.objects
            .iter()
            .filter_map(|o| match o.body {
                ObjectBody::Enemy(e) => Some(e.position),
                _ => None,
            })
            .map(|p| (p, p.distance_squared(from)))
            // An enemy standing on the defense gives no direction to shoot in.
            .filter(|&(_, d)| d > 0.0 && d <= range_sq)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(p, _)| p)
    }

    /// Apply a player action
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveCursor(dir) => {
                self.move_cursor(dir);
                true
            }
            GameAction::PlaceDefense => match self.place_at_hover() {
                Ok(_) => true,
                Err(e) => {
                    log::debug!("place rejected ({}): {}", e.code(), e.message());
                    false
                }
            },
            GameAction::SelectDefense(kind) => {
                self.select(kind);
                true
            }
            GameAction::Pause => {
                self.paused = !self.paused;
                true
            }
            GameAction::Restart => {
                let next_episode = self.episode_id.wrapping_add(1);
                let hover = self.hover;
                let selected = self.selected;
                *self = Self::new(self.config);
                self.episode_id = next_episode;
                self.hover = hover;
                self.selected = selected;
                log::info!("restarted, episode {next_episode}");
                true
            }
        }
    }

    pub fn snapshot_into(&self, out: &mut FrameSnapshot) {
        out.grid_size = self.config.grid_size;
        out.hover = self.hover;
        out.selected = self.selected;
        out.paused = self.paused;
        out.episode_id = self.episode_id;
        out.frame = self.frame;
        out.time_ms = self.time_ms;
        out.spawned = self.spawned;
        out.escaped = self.escaped;
        out.placed = self.placed;
        out.shots_fired = self.shots_fired;

        out.objects.clear();
        for obj in self.objects.iter() {
            let view = match obj.body {
                ObjectBody::Enemy(e) => ObjectView::Enemy(e.kind),
                ObjectBody::Defense(d) => ObjectView::Defense(d.kind),
                ObjectBody::Projectile(_) => ObjectView::Projectile,
            };
            let _ = out.objects.try_push(ObjectSnapshot {
                id: obj.id,
                position: obj.position(),
                view,
            });
        }
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        let mut s = FrameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::ObjectBody;

    fn quiet() -> WorldConfig {
        WorldConfig {
            spawn_interval_ms: 0,
            ..WorldConfig::default()
        }
    }

    fn enemy_positions(state: &GameState) -> Vec<(EnemyKind, Vec2)> {
        state
            .objects()
            .iter()
            .filter_map(|o| match o.body {
                ObjectBody::Enemy(e) => Some((e.kind, e.position)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn new_game_has_opening_wave() {
        let state = GameState::new(quiet());
        assert_eq!(state.objects().count(ObjectTag::Enemy), 2);
        assert_eq!(state.spawned(), 2);
        assert_eq!(state.frame(), 0);
        assert!(!state.paused());
        assert!(state.hover().is_none());
    }

    #[test]
    fn enemies_move_at_their_speed() {
        let mut state = GameState::new(quiet());
        for _ in 0..125 {
            state.tick(TICK_MS);
        }
        // 125 * 16ms = 2s
        for (kind, pos) in enemy_positions(&state) {
            let expected = kind.speed() * 2.0;
            assert!((pos.x - expected).abs() < 1e-4, "{kind:?} at {}", pos.x);
        }
        assert_eq!(state.frame(), 125);
        assert_eq!(state.time_ms(), 2000);
    }

    #[test]
    fn paused_tick_does_nothing() {
        let mut state = GameState::new(quiet());
        assert!(state.apply_action(GameAction::Pause));
        let before = enemy_positions(&state);
        assert!(!state.tick(TICK_MS));
        assert_eq!(enemy_positions(&state), before);
        assert_eq!(state.frame(), 0);
    }

    #[test]
    fn enemies_past_the_edge_escape() {
        let mut state = GameState::new(WorldConfig {
            grid_size: 1,
            ..quiet()
        });
        state.objects_mut().clear();
        state.objects_mut().add_enemy(Vec2::new(0.99, 0.0), EnemyKind::Type2).unwrap();

        assert!(state.tick(100));
        assert_eq!(state.escaped(), 1);
        assert_eq!(state.objects().count(ObjectTag::Enemy), 0);
    }

    #[test]
    fn place_defense_validates_tile() {
        let mut state = GameState::new(quiet());
        let at = GridPos::new(3, 4);

        assert!(state.place_defense(at, DefenseKind::Defender1).is_ok());
        assert_eq!(
            state.place_defense(at, DefenseKind::Defender2),
            Err(PlaceError::Occupied)
        );
        assert_eq!(
            state.place_defense(GridPos::new(-1, 0), DefenseKind::Defender1),
            Err(PlaceError::OutOfBounds)
        );
        assert_eq!(
            state.place_defense(GridPos::new(0, 25), DefenseKind::Defender1),
            Err(PlaceError::OutOfBounds)
        );

        state.apply_action(GameAction::Pause);
        assert_eq!(
            state.place_defense(GridPos::new(5, 5), DefenseKind::Defender1),
            Err(PlaceError::NotPlayable)
        );
        assert_eq!(state.placed(), 1);
    }

    #[test]
    fn place_defense_reports_full_store() {
        let mut state = GameState::new(quiet());
        while !state.objects().is_full() {
            state.objects_mut().add_enemy(Vec2::ZERO, EnemyKind::Type1).unwrap();
        }
        assert_eq!(
            state.place_defense(GridPos::new(1, 1), DefenseKind::Defender1),
            Err(PlaceError::StoreFull)
        );
    }

    #[test]
    fn defense_fires_at_nearest_enemy_in_range() {
        let mut state = GameState::new(quiet());
        state.objects_mut().clear();
        let near = Vec2::new(2.0, 5.0);
        state.objects_mut().add_enemy(near, EnemyKind::Type1).unwrap();
        state.objects_mut().add_enemy(Vec2::new(0.0, 5.0), EnemyKind::Type1).unwrap();
        let d = state.place_defense(GridPos::new(5, 5), DefenseKind::Defender1).unwrap();

        assert!(state.tick(TICK_MS));
        assert_eq!(state.shots_fired(), 1);

        let projectile = state
            .objects()
            .iter()
            .find_map(|o| match o.body {
                ObjectBody::Projectile(p) => Some(p),
                _ => None,
            })
            .unwrap();
        assert_eq!(projectile.source, d);
        // Aimed along -x toward the nearer enemy.
        assert!(projectile.velocity.x < 0.0);
        assert!(projectile.velocity.y.abs() < 1e-4);
        assert!((projectile.velocity.length() - PROJECTILE_SPEED).abs() < 1e-4);
    }

    #[test]
    fn defense_respects_cooldown_and_range() {
        let mut state = GameState::new(quiet());
        state.objects_mut().clear();
        state.objects_mut().add_enemy(Vec2::new(9.0, 5.0), EnemyKind::Type1).unwrap();
        state.place_defense(GridPos::new(5, 5), DefenseKind::Defender1).unwrap();

        // One shot, then nothing until the interval has passed.
        state.tick(TICK_MS);
        assert_eq!(state.shots_fired(), 1);
        for _ in 0..60 {
            state.tick(TICK_MS);
        }
        assert_eq!(state.shots_fired(), 1);
        for _ in 0..10 {
            state.tick(TICK_MS);
        }
        assert_eq!(state.shots_fired(), 2);

        // Out of range: a defender far away never fires.
        let mut far = GameState::new(quiet());
        far.objects_mut().clear();
        far.objects_mut().add_enemy(Vec2::new(0.0, 0.0), EnemyKind::Type1).unwrap();
        far.place_defense(GridPos::new(20, 20), DefenseKind::Defender2).unwrap();
        for _ in 0..100 {
            far.tick(TICK_MS);
        }
        assert_eq!(far.shots_fired(), 0);
    }

    #[test]
    fn projectiles_expire() {
        let mut state = GameState::new(quiet());
        state.objects_mut().clear();
        state
            .objects_mut()
            .add_projectile(Projectile {
                position: Vec2::new(10.0, 10.0),
                velocity: Vec2::ZERO,
                ttl_ms: 32,
                source: ObjectId(0),
            })
            .unwrap();

        state.tick(TICK_MS);
        assert_eq!(state.objects().count(ObjectTag::Projectile), 1);
        state.tick(TICK_MS);
        assert_eq!(state.objects().count(ObjectTag::Projectile), 0);
    }

    #[test]
    fn projectiles_leaving_the_grid_are_culled() {
        let mut state = GameState::new(quiet());
        state.objects_mut().clear();
        state
            .objects_mut()
            .add_projectile(Projectile {
                position: Vec2::new(0.01, 3.0),
                velocity: Vec2::new(-6.0, 0.0),
                ttl_ms: 1000,
                source: ObjectId(0),
            })
            .unwrap();

        state.tick(TICK_MS);
        assert!(state.objects().is_empty());
    }

    #[test]
    fn store_is_depth_sorted_after_tick() {
        let mut state = GameState::default();
        state.place_defense(GridPos::new(10, 10), DefenseKind::Defender1).unwrap();
        state.place_defense(GridPos::new(0, 0), DefenseKind::Defender2).unwrap();
        for _ in 0..300 {
            state.tick(TICK_MS);
            let depths: Vec<f32> = state.objects().iter().map(|o| o.depth()).collect();
            assert!(depths.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn cursor_starts_centred_and_clamps() {
        let mut state = GameState::new(quiet());
        state.apply_action(GameAction::MoveCursor(Direction::Left));
        assert_eq!(state.hover(), Some(GridPos::new(12, 12)));

        for _ in 0..40 {
            state.apply_action(GameAction::MoveCursor(Direction::Up));
        }
        assert_eq!(state.hover(), Some(GridPos::new(12, 0)));
    }

    #[test]
    fn place_action_uses_selection_and_hover() {
        let mut state = GameState::new(quiet());
        assert!(!state.apply_action(GameAction::PlaceDefense));

        state.set_hover(Some(GridPos::new(2, 2)));
        state.apply_action(GameAction::SelectDefense(DefenseKind::Defender2));
        assert!(state.apply_action(GameAction::PlaceDefense));

        let obj = state.objects().defense_at(GridPos::new(2, 2)).unwrap();
        match obj.body {
            ObjectBody::Defense(d) => assert_eq!(d.kind, DefenseKind::Defender2),
            _ => panic!("expected a defense"),
        }
    }

    #[test]
    fn full_store_skips_shot_and_keeps_defense_ready() {
        let mut state = GameState::new(quiet());
        state.objects_mut().clear();
        let d = state.place_defense(GridPos::new(5, 5), DefenseKind::Defender1).unwrap();
        while !state.objects().is_full() {
            state
                .objects_mut()
                .add_enemy(Vec2::new(3.0, 5.0), EnemyKind::Type1)
                .unwrap();
        }

        assert!(state.tick(TICK_MS));

        assert_eq!(state.shots_fired(), 0);
        assert_eq!(state.objects().count(ObjectTag::Projectile), 0);
        match state.objects().get(d).map(|o| o.body) {
            Some(ObjectBody::Defense(defense)) => assert_eq!(defense.cooldown_ms, 0),
            other => panic!("expected the defense, got {other:?}"),
        }
    }

    #[test]
    fn enemy_on_the_defense_tile_does_not_block_other_targets() {
        let mut state = GameState::new(quiet());
        state.objects_mut().clear();
        state.place_defense(GridPos::new(5, 5), DefenseKind::Defender1).unwrap();
        state
            .objects_mut()
            .add_enemy(Vec2::new(5.0, 5.0), EnemyKind::Type1)
            .unwrap();
        state
            .objects_mut()
            .add_enemy(Vec2::new(3.0, 5.0), EnemyKind::Type1)
            .unwrap();

        // A zero-length step keeps the first enemy exactly on the defense.
        assert!(state.tick(0));

        assert_eq!(state.shots_fired(), 1);
        let velocity = state.objects().iter().find_map(|o| match o.body {
            ObjectBody::Projectile(p) => Some(p.velocity),
            _ => None,
        });
        assert_eq!(velocity, Some(Vec2::new(-PROJECTILE_SPEED, 0.0)));
    }

    #[test]
    fn huge_elapsed_time_does_not_overflow() {
        let mut state = GameState::default();
        assert!(state.tick(1000));
        assert!(state.tick(u32::MAX));

        assert_eq!(state.time_ms(), 1000 + u32::MAX as u64);
        assert_eq!(state.spawned() as usize, MAX_GAME_OBJECTS);
        // Everything on the grid walked off in that one step.
        assert_eq!(state.escaped() as usize, MAX_GAME_OBJECTS);
        assert_eq!(state.objects().count(ObjectTag::Enemy), 0);
        assert_eq!(state.snapshot().time_ms, state.time_ms());
    }

    #[test]
    fn set_hover_drops_out_of_bounds() {
        let mut state = GameState::new(quiet());
        state.set_hover(Some(GridPos::new(30, 1)));
        assert!(state.hover().is_none());
    }

    #[test]
    fn restart_increments_episode_and_resets_world() {
        let mut state = GameState::new(quiet());
        state.place_defense(GridPos::new(1, 1), DefenseKind::Defender1).unwrap();
        state.tick(TICK_MS);

        assert!(state.apply_action(GameAction::Restart));
        assert_eq!(state.episode_id(), 1);
        assert_eq!(state.frame(), 0);
        assert_eq!(state.placed(), 0);
        assert_eq!(state.objects().count(ObjectTag::Defense), 0);
        assert_eq!(state.objects().count(ObjectTag::Enemy), 2);
    }

    #[test]
    fn same_seed_same_run() {
        let mut a = GameState::default();
        let mut b = GameState::default();
        for _ in 0..500 {
            a.tick(TICK_MS);
            b.tick(TICK_MS);
        }
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn snapshot_preserves_draw_order() {
        let mut state = GameState::new(quiet());
        state.place_defense(GridPos::new(8, 8), DefenseKind::Defender1).unwrap();
        state.tick(TICK_MS);

        let snap = state.snapshot();
        let ids: Vec<ObjectId> = snap.objects.iter().map(|o| o.id).collect();
        let expected: Vec<ObjectId> = state.objects().iter().map(|o| o.id).collect();
        assert_eq!(ids, expected);
    }
}
