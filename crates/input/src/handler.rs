//! DAS/ARR auto-repeat for held cursor keys.
//!
//! Supports terminals that do not emit key release events by using a timeout.

use crossterm::event::KeyCode;

use arrayvec::ArrayVec;

use crate::map::cursor_direction;
use crate::types::{Direction, GameAction, CURSOR_ARR_MS, CURSOR_DAS_MS};

/// Tracks the held cursor key for DAS/ARR handling.
#[derive(Debug, Clone)]
pub struct CursorRepeat {
    held: Option<Direction>,
    last_key_time: std::time::Instant,
    das_timer: u32,
    arr_accumulator: u32,
    das_delay: u32,
    arr_rate: u32,
    key_release_timeout_ms: u32,
}

// In terminals without key-release events, a short timeout prevents a single tap
// from turning into a sustained "held" state that triggers DAS/ARR repeats.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 150;

impl CursorRepeat {
    pub fn new() -> Self {
        Self::with_config(CURSOR_DAS_MS, CURSOR_ARR_MS)
    }

    pub fn with_config(das_delay: u32, arr_rate: u32) -> Self {
        Self {
            held: None,
            last_key_time: std::time::Instant::now(),
            das_timer: 0,
            arr_accumulator: 0,
            das_delay,
            arr_rate: arr_rate.max(1),
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    pub fn held(&self) -> Option<Direction> {
        self.held
    }

    /// Handle a cursor key press.
    ///
    /// Returns the immediate move for a newly pressed direction. A repeated
    /// press of the held direction only refreshes the release timeout.
    pub fn handle_key_press(&mut self, code: KeyCode) -> Option<GameAction> {
        let dir = cursor_direction(code)?;
        self.last_key_time = std::time::Instant::now();
        if self.held == Some(dir) {
            return None;
        }
        self.held = Some(dir);
        self.das_timer = 0;
        self.arr_accumulator = 0;
        Some(GameAction::MoveCursor(dir))
    }

    pub fn handle_key_release(&mut self, code: KeyCode) {
        if self.held.is_some() && self.held == cursor_direction(code) {
            self.release();
        }
    }

    pub fn update(&mut self, elapsed_ms: u32) -> ArrayVec<GameAction, 32> {
        let mut actions = ArrayVec::<GameAction, 32>::new();

        // Auto-release when terminal does not emit release events.
        let time_since_last_key = self.last_key_time.elapsed().as_millis() as u32;
        if time_since_last_key > self.key_release_timeout_ms {
            self.release();
        }

        let Some(dir) = self.held else {
            return actions;
        };

        let prev_das = self.das_timer;
        self.das_timer = self.das_timer.saturating_add(elapsed_ms);

        if self.das_timer >= self.das_delay {
            let excess = if prev_das < self.das_delay {
                self.das_timer - self.das_delay
            } else {
                elapsed_ms
            };
            self.arr_accumulator = self.arr_accumulator.saturating_add(excess);

            while self.arr_accumulator >= self.arr_rate {
                let _ = actions.try_push(GameAction::MoveCursor(dir));
                self.arr_accumulator -= self.arr_rate;
            }
        }

        actions
    }

    pub fn reset(&mut self) {
        self.release();
        self.last_key_time = std::time::Instant::now();
    }

    fn release(&mut self) {
        self.held = None;
        self.das_timer = 0;
        self.arr_accumulator = 0;
    }
}

impl Default for CursorRepeat {
    fn default() -> Self {
        Self::new()
    }
}
