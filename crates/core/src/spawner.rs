//! Enemy spawning: the opening wave plus a timed trickle on random rows.

use glam::Vec2;

use crate::objects::ObjectStore;
use crate::rng::SimpleRng;
use crate::types::EnemyKind;

/// Enemies present when a game starts: (column, row, kind).
pub const OPENING_WAVE: [(f32, f32, EnemyKind); 2] =
    [(0.0, 9.0, EnemyKind::Type1), (0.0, 13.0, EnemyKind::Type2)];

#[derive(Debug, Clone)]
pub struct EnemySpawner {
    interval_ms: u32,
    /// Banked game time; wide enough that any `u32` frame fits.
    timer_ms: u64,
    rng: SimpleRng,
}

impl EnemySpawner {
    pub fn new(interval_ms: u32, seed: u32) -> Self {
        Self {
            interval_ms,
            timer_ms: 0,
            rng: SimpleRng::new(seed),
        }
    }

    /// Place the opening wave. Returns how many enemies were added.
    ///
    /// Rows that do not exist on a smaller grid are skipped.
    pub fn spawn_opening_wave(&mut self, grid_size: i32, store: &mut ObjectStore) -> u32 {
        let mut added = 0;
        for (x, y, kind) in OPENING_WAVE {
            if y >= grid_size as f32 {
                continue;
            }
            match store.add_enemy(Vec2::new(x, y), kind) {
                Ok(_) => added += 1,
                Err(e) => log::warn!("opening wave: {e}"),
            }
        }
        added
    }

    /// Advance the spawn timer and spawn at most one enemy per elapsed interval.
    ///
    /// Returns how many enemies were added. A full store drops the spawn but
    /// still consumes the interval, so spawning resumes on schedule once
    /// space frees up.
    pub fn update(&mut self, elapsed_ms: u32, grid_size: i32, store: &mut ObjectStore) -> u32 {
        if self.interval_ms == 0 || grid_size <= 0 {
            return 0;
        }

        let interval = u64::from(self.interval_ms);
        self.timer_ms += u64::from(elapsed_ms);
        let mut added = 0;
        while self.timer_ms >= interval {
            self.timer_ms -= interval;

            let row = self.rng.next_range(grid_size as u32);
            // One in three spawns is the fast walker.
            let kind = if self.rng.next_range(3) == 0 {
                EnemyKind::Type2
            } else {
                EnemyKind::Type1
            };

            match store.add_enemy(Vec2::new(0.0, row as f32), kind) {
                Ok(id) => {
                    log::debug!("spawned {} enemy {:?} on row {row}", kind.as_str(), id);
                    added += 1;
                }
                Err(e) => log::debug!("spawn dropped: {e}"),
            }
        }
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ObjectTag;

    #[test]
    fn opening_wave_places_two_enemies_at_column_zero() {
        let mut store = ObjectStore::new();
        let mut spawner = EnemySpawner::new(2000, 1);
        assert_eq!(spawner.spawn_opening_wave(25, &mut store), 2);

        let positions: Vec<Vec2> = store.iter().map(|o| o.position()).collect();
        assert_eq!(positions, vec![Vec2::new(0.0, 9.0), Vec2::new(0.0, 13.0)]);
    }

    #[test]
    fn opening_wave_skips_rows_off_a_small_grid() {
        let mut store = ObjectStore::new();
        let mut spawner = EnemySpawner::new(2000, 1);
        assert_eq!(spawner.spawn_opening_wave(10, &mut store), 1);
        assert_eq!(spawner.spawn_opening_wave(5, &mut store), 0);
    }

    #[test]
    fn spawns_once_per_interval() {
        let mut store = ObjectStore::new();
        let mut spawner = EnemySpawner::new(100, 7);

        assert_eq!(spawner.update(99, 25, &mut store), 0);
        assert_eq!(spawner.update(1, 25, &mut store), 1);
        assert_eq!(spawner.update(250, 25, &mut store), 2);
        assert_eq!(store.count(ObjectTag::Enemy), 3);

        for o in store.iter() {
            let p = o.position();
            assert_eq!(p.x, 0.0);
            assert!(p.y >= 0.0 && p.y < 25.0);
        }
    }

    #[test]
    fn huge_frame_fills_the_store_without_overflow() {
        let mut store = ObjectStore::new();
        let mut spawner = EnemySpawner::new(2000, 3);

        spawner.update(1000, 25, &mut store);
        let added = spawner.update(u32::MAX, 25, &mut store);

        assert_eq!(added as usize, store.capacity());
        assert!(store.is_full());

        // The remainder stays banked; the next interval spawns on time.
        store.clear();
        assert_eq!(spawner.update(2000, 25, &mut store), 1);
    }

    #[test]
    fn zero_interval_disables_spawning() {
        let mut store = ObjectStore::new();
        let mut spawner = EnemySpawner::new(0, 7);
        assert_eq!(spawner.update(10_000, 25, &mut store), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn same_seed_spawns_same_rows() {
        let mut a = ObjectStore::new();
        let mut b = ObjectStore::new();
        let mut sa = EnemySpawner::new(10, 42);
        let mut sb = EnemySpawner::new(10, 42);
        sa.update(200, 25, &mut a);
        sb.update(200, 25, &mut b);
        assert_eq!(a.as_slice(), b.as_slice());
    }
}
