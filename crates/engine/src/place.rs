//! Pointer placement: resolve a screen point to a tile and act on it.
//!
//! The display provider reports pointer positions in its own screen units.
//! Both hover and click go through the same projection the view used to draw
//! the frame, so what is highlighted is what gets placed.

use glam::Vec2;

use crate::core::{GameState, IsoProjection, ObjectId, PlaceError};
use crate::types::GridPos;

/// Screen point of a terminal cell's centre.
pub fn cell_center(col: u16, row: u16) -> Vec2 {
    Vec2::new(col as f32 + 0.5, row as f32 + 0.5)
}

/// Update the hover cursor from a pointer position.
///
/// Returns the hovered tile (None when the pointer is off the grid).
pub fn hover_at_screen(
    state: &mut GameState,
    projection: &IsoProjection,
    screen: Vec2,
) -> Option<GridPos> {
    let tile = projection.pick(screen, state.grid_size());
    state.set_hover(tile);
    tile
}

/// Place the selected defender on the tile under a pointer release.
pub fn place_at_screen(
    state: &mut GameState,
    projection: &IsoProjection,
    screen: Vec2,
) -> Result<ObjectId, PlaceError> {
    let tile = hover_at_screen(state, projection, screen).ok_or(PlaceError::OutOfBounds)?;
    state.place_defense(tile, state.selected())
}
