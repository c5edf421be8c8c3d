//! Isometric projection between grid space and screen space.
//!
//! Grid space is measured in tiles (`x` grows down-right on screen, `y` grows
//! down-left). Screen space is whatever unit the display uses: pixels for a
//! graphical backend, character cells for the terminal.

use glam::Vec2;

use crate::types::{GridPos, ORIGIN_Y, TILE_HEIGHT, TILE_WIDTH};

/// Grid <-> screen transform for a diamond (2:1) isometric grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsoProjection {
    pub tile_w: f32,
    pub tile_h: f32,
    /// Screen position of the top vertex of tile (0, 0).
    pub origin: Vec2,
}

impl IsoProjection {
    pub fn new(tile_w: f32, tile_h: f32, origin: Vec2) -> Self {
        Self {
            tile_w,
            tile_h,
            origin,
        }
    }

    /// Pixel geometry: 64x32 tiles, grid hanging from the top centre of the screen.
    pub fn pixel(screen_width: f32) -> Self {
        Self::new(
            TILE_WIDTH as f32,
            TILE_HEIGHT as f32,
            Vec2::new(screen_width / 2.0, ORIGIN_Y as f32),
        )
    }

    /// Top-left screen position of the sprite drawn for `grid`.
    ///
    /// The sprite is `tile_w` wide, so its left edge sits half a tile left of
    /// the tile's top vertex.
    pub fn to_screen(&self, grid: Vec2) -> Vec2 {
        let half_w = self.tile_w / 2.0;
        let half_h = self.tile_h / 2.0;
        Vec2::new(
            (grid.x - grid.y) * half_w - half_w + self.origin.x,
            (grid.x + grid.y) * half_h + self.origin.y,
        )
    }

    /// Grid tile containing `screen`, floored to whole tiles.
    ///
    /// The inverse is measured from each tile's top vertex, not from the
    /// sprite's left edge, so any point inside a tile's diamond maps to it.
    pub fn from_screen(&self, screen: Vec2) -> Vec2 {
        let half_w = self.tile_w / 2.0;
        let half_h = self.tile_h / 2.0;
        let s = screen - self.origin;

        let x = (s.x / half_w + s.y / half_h) / 2.0;
        let y = (s.y / half_h - s.x / half_w) / 2.0;

        Vec2::new(x.floor(), y.floor())
    }

    /// Tile under `screen`, or `None` when it falls outside the grid.
    pub fn pick(&self, screen: Vec2, grid_size: i32) -> Option<GridPos> {
        let g = self.from_screen(screen);
        if !g.x.is_finite() || !g.y.is_finite() {
            return None;
        }
        let pos = GridPos::new(g.x as i32, g.y as i32);
        pos.in_bounds(grid_size).then_some(pos)
    }

    /// Screen position of the diamond centre of `grid`.
    pub fn tile_center(&self, grid: Vec2) -> Vec2 {
        self.to_screen(grid) + Vec2::new(self.tile_w / 2.0, self.tile_h / 2.0)
    }
}

/// Draw depth of a grid position: larger values are nearer the viewer.
pub fn depth(grid: Vec2) -> f32 {
    grid.x + grid.y
}
