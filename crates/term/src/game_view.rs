//! GameView: maps a `core::FrameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! Each tile is drawn as the 2-cell-wide centre band of its diamond, which
//! tessellates the grid exactly and matches what `IsoProjection::pick`
//! returns for a cell centre.

use glam::Vec2;

use crate::assets::{AssetLibrary, Sprite};
use crate::core::{FrameSnapshot, IsoProjection};
use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};
use crate::types::{ObjectTag, TERM_TILE_HEIGHT, TERM_TILE_WIDTH};

/// Rows above the grid reserved for the key help line.
const TOP_MARGIN: f32 = 2.0;

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Isometric terminal renderer for the game.
#[derive(Debug, Clone)]
pub struct GameView {
    /// Tile width in terminal columns.
    tile_w: u16,
    /// Tile height in terminal rows.
    tile_h: u16,
    pan_x: i16,
    pan_y: i16,
    assets: AssetLibrary,
}

impl Default for GameView {
    fn default() -> Self {
        Self::new(TERM_TILE_WIDTH as u16, TERM_TILE_HEIGHT as u16)
    }
}

impl GameView {
    pub fn new(tile_w: u16, tile_h: u16) -> Self {
        Self {
            tile_w: tile_w.max(2),
            tile_h: tile_h.max(1),
            pan_x: 0,
            pan_y: 0,
            assets: AssetLibrary::default(),
        }
    }

    pub fn with_assets(mut self, assets: AssetLibrary) -> Self {
        self.assets = assets;
        self
    }

    pub fn pan(&self) -> (i16, i16) {
        (self.pan_x, self.pan_y)
    }

    /// Shift the camera by (dx, dy) cells.
    pub fn pan_by(&mut self, dx: i16, dy: i16) {
        self.pan_x = self.pan_x.saturating_add(dx);
        self.pan_y = self.pan_y.saturating_add(dy);
    }

    /// The projection used to draw into `viewport`.
    ///
    /// Mouse picking must use the same projection so the highlighted tile is
    /// the tile under the pointer.
    pub fn projection(&self, viewport: Viewport) -> IsoProjection {
        IsoProjection::new(
            self.tile_w as f32,
            self.tile_h as f32,
            Vec2::new(
                (viewport.width / 2) as f32 + self.pan_x as f32,
                TOP_MARGIN + self.pan_y as f32,
            ),
        )
    }

    /// Render a snapshot into an existing framebuffer.
    ///
    /// This is the allocation-free hot path. Callers can reuse a framebuffer
    /// across frames and only resize when the terminal size changes.
    pub fn render_into(&self, snap: &FrameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Cell::default());

        let iso = self.projection(viewport);

        // Ground, row by row, with the hovered tile swapped for the mouseover sprite.
        for y in 0..snap.grid_size {
            for x in 0..snap.grid_size {
                let sprite = match snap.hover {
                    Some(h) if h.x == x && h.y == y => &self.assets.mouseover,
                    _ => self.assets.ground_for(x),
                };
                let (cx, cy) = self.band_origin(&iso, Vec2::new(x as f32, y as f32));
                sprite.draw(fb, cx, cy);
            }
        }

        // Objects are already back to front. Enemies and defenders stand on
        // their tile, so their sprite bottom sits on the band's centre line.
        let lift = (self.tile_h / 2) as i32;
        for obj in snap.objects.iter() {
            let sprite = self.assets.for_object(obj.view);
            let (cx, cy) = self.band_origin(&iso, obj.position);
            let cx = cx + self.centre_offset(sprite);
            let cy = match obj.view.tag() {
                ObjectTag::Enemy | ObjectTag::Defense => cy - lift,
                ObjectTag::Projectile => cy,
            };
            sprite.draw(fb, cx, cy);
        }

        self.draw_help_line(fb);
        self.draw_status_line(fb, snap, viewport);

        if snap.paused {
            self.draw_overlay_text(fb, viewport, "PAUSED");
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &FrameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    /// Top-left cell of the centre band for a grid position.
    fn band_origin(&self, iso: &IsoProjection, grid: Vec2) -> (i32, i32) {
        let s = iso.to_screen(grid);
        let quarter = self.tile_w as f32 / 4.0;
        ((s.x + quarter).round() as i32, s.y.round() as i32)
    }

    fn centre_offset(&self, sprite: &Sprite) -> i32 {
        let band_w = (self.tile_w / 2) as i32;
        (band_w - sprite.width() as i32) / 2
    }

    fn draw_help_line(&self, fb: &mut FrameBuffer) {
        let help = CellStyle {
            dim: true,
            ..CellStyle::default()
        };
        fb.put_str(
            0,
            0,
            "click/space place  1/2 defender  arrows cursor  wasd pan  p pause  r restart  q quit",
            help,
        );
    }

    fn draw_status_line(&self, fb: &mut FrameBuffer, snap: &FrameSnapshot, viewport: Viewport) {
        if viewport.height < 2 {
            return;
        }
        let y = viewport.height - 1;
        let label = CellStyle {
            bold: true,
            ..CellStyle::default()
        };
        let value = CellStyle::default();
        let selected = CellStyle {
            fg: Rgb::new(240, 230, 140),
            bold: true,
            ..CellStyle::default()
        };

        let mut x = fb.put_str(0, y, "DEF ", label);
        x = fb.put_str(x, y, snap.selected.as_str(), selected);

        let counters: [(&str, u64); 5] = [
            ("  ENEMIES ", snap.count(ObjectTag::Enemy) as u64),
            ("  DEFENDERS ", snap.count(ObjectTag::Defense) as u64),
            ("  SHOTS ", snap.shots_fired as u64),
            ("  ESCAPED ", snap.escaped as u64),
            ("  FRAME ", snap.frame),
        ];
        for (name, v) in counters {
            x = fb.put_str(x, y, name, label);
            x = fb.put_u64(x, y, v, value);
        }
    }

    fn draw_overlay_text(&self, fb: &mut FrameBuffer, viewport: Viewport, text: &str) {
        let mid_y = viewport.height / 2;
        let text_w = text.chars().count() as u16;
        let x = viewport.width.saturating_sub(text_w) / 2;
        let style = CellStyle {
            fg: Rgb::new(255, 255, 255),
            bg: Rgb::new(0, 0, 0),
            bold: true,
            dim: false,
        };
        fb.put_str(x, mid_y, text, style);
    }
}
