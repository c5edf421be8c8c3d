//! Hardcoded asset library: one glyph sprite per thing the game draws.
//!
//! Sprites are sized for a tile's 2x2 centre band at the default 4x2 cell
//! tile geometry. A space in a sprite row is transparent.

use crate::core::ObjectView;
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{DefenseKind, EnemyKind};

/// A small block of glyphs drawn with one style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    pub rows: &'static [&'static str],
    pub style: CellStyle,
    /// Keep the background of whatever is underneath.
    pub keep_bg: bool,
}

impl Sprite {
    pub const fn tile(rows: &'static [&'static str], fg: Rgb, bg: Rgb) -> Self {
        Self {
            rows,
            style: CellStyle::new(fg, bg),
            keep_bg: false,
        }
    }

    pub const fn overlay(rows: &'static [&'static str], fg: Rgb) -> Self {
        Self {
            rows,
            style: CellStyle {
                fg,
                bg: Rgb::new(0, 0, 0),
                bold: true,
                dim: false,
            },
            keep_bg: true,
        }
    }

    pub fn width(&self) -> u16 {
        self.rows
            .iter()
            .map(|r| r.chars().count() as u16)
            .max()
            .unwrap_or(0)
    }

    pub fn height(&self) -> u16 {
        self.rows.len() as u16
    }

    /// Blit with the top-left glyph at (x, y), clipping to the framebuffer.
    pub fn draw(&self, fb: &mut FrameBuffer, x: i32, y: i32) {
        for (dy, row) in self.rows.iter().enumerate() {
            for (dx, ch) in row.chars().enumerate() {
                if ch == ' ' {
                    continue;
                }
                fb.put_char_clipped(x + dx as i32, y + dy as i32, ch, self.style, self.keep_bg);
            }
        }
    }
}

/// Every sprite the game uses.
#[derive(Debug, Clone)]
pub struct AssetLibrary {
    pub ground: Sprite,
    pub ground_alt: Sprite,
    pub mouseover: Sprite,
    pub enemy_type_1: Sprite,
    pub enemy_type_2: Sprite,
    pub defender_type_1: Sprite,
    pub defender_type_2: Sprite,
    pub projectile: Sprite,
}

impl AssetLibrary {
    /// Sprite for a snapshot object.
    pub fn for_object(&self, view: ObjectView) -> &Sprite {
        match view {
            ObjectView::Enemy(EnemyKind::Type1) => &self.enemy_type_1,
            ObjectView::Enemy(EnemyKind::Type2) => &self.enemy_type_2,
            ObjectView::Defense(DefenseKind::Defender1) => &self.defender_type_1,
            ObjectView::Defense(DefenseKind::Defender2) => &self.defender_type_2,
            ObjectView::Projectile => &self.projectile,
        }
    }

    /// Ground sprite for a tile; alternating columns get a second shade.
    pub fn ground_for(&self, x: i32) -> &Sprite {
        if x.rem_euclid(2) == 0 {
            &self.ground
        } else {
            &self.ground_alt
        }
    }
}

impl Default for AssetLibrary {
    fn default() -> Self {
        let grass = Rgb::new(46, 94, 52);
        let grass_alt = Rgb::new(40, 82, 46);
        Self {
            ground: Sprite::tile(&["░░", "░░"], Rgb::new(70, 130, 76), grass),
            ground_alt: Sprite::tile(&["░░", "░░"], Rgb::new(62, 116, 68), grass_alt),
            mouseover: Sprite::tile(&["▓▓", "▓▓"], Rgb::new(240, 230, 140), Rgb::new(120, 110, 40)),
            enemy_type_1: Sprite::overlay(&["▄▄", "██"], Rgb::new(220, 70, 70)),
            enemy_type_2: Sprite::overlay(&["▗▖", "▐▌"], Rgb::new(240, 140, 40)),
            defender_type_1: Sprite::overlay(&["┌┐", "██"], Rgb::new(80, 180, 240)),
            defender_type_2: Sprite::overlay(&["◢◣", "██"], Rgb::new(200, 120, 230)),
            projectile: Sprite::overlay(&["•"], Rgb::new(250, 250, 250)),
        }
    }
}
