//! Key and mouse mapping from terminal events to game input.

use crate::types::{DefenseKind, Direction, GameAction};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

/// Pointer input in terminal cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    /// Pointer moved over a cell.
    Hover { col: u16, row: u16 },
    /// Left button released over a cell.
    Click { col: u16, row: u16 },
}

/// Map cursor keys to a grid direction.
///
/// Directions are in grid space: Up/Down walk the y axis, Left/Right the x axis.
pub fn cursor_direction(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') => Some(Direction::Up),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') => Some(Direction::Down),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') => Some(Direction::Left),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') => Some(Direction::Right),
        _ => None,
    }
}

/// Map keyboard input to game actions.
pub fn handle_key_event(key: KeyEvent) -> Option<GameAction> {
    if let Some(dir) = cursor_direction(key.code) {
        return Some(GameAction::MoveCursor(dir));
    }

    match key.code {
        KeyCode::Char(' ') | KeyCode::Enter => Some(GameAction::PlaceDefense),
        KeyCode::Char('1') => Some(GameAction::SelectDefense(DefenseKind::Defender1)),
        KeyCode::Char('2') => Some(GameAction::SelectDefense(DefenseKind::Defender2)),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(GameAction::Pause),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(GameAction::Restart),
        _ => None,
    }
}

/// Camera pan for `w a s d`, in terminal cells.
pub fn camera_pan(key: KeyEvent) -> Option<(i16, i16)> {
    match key.code {
        KeyCode::Char('w') | KeyCode::Char('W') => Some((0, 2)),
        KeyCode::Char('s') | KeyCode::Char('S') => Some((0, -2)),
        KeyCode::Char('a') | KeyCode::Char('A') => Some((4, 0)),
        KeyCode::Char('d') | KeyCode::Char('D') => Some((-4, 0)),
        _ => None,
    }
}

/// Map mouse input to pointer actions.
///
/// Placement happens on release of the left button, not on press.
pub fn handle_mouse_event(ev: MouseEvent) -> Option<PointerAction> {
    let (col, row) = (ev.column, ev.row);
    match ev.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) | MouseEventKind::Down(_) => {
            Some(PointerAction::Hover { col, row })
        }
        MouseEventKind::Up(MouseButton::Left) => Some(PointerAction::Click { col, row }),
        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
