//! Keyboard and mouse events driving the game through the input layer

use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use blockwave::core::{GameState, WorldConfig};
use blockwave::engine::{cell_center, hover_at_screen, place_at_screen};
use blockwave::input::{handle_key_event, handle_mouse_event, CursorRepeat, PointerAction};
use blockwave::term::{GameView, Viewport};
use blockwave::types::{DefenseKind, GameAction, GridPos, ObjectTag};

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

fn quiet_state() -> GameState {
    GameState::new(WorldConfig {
        spawn_interval_ms: 0,
        ..WorldConfig::default()
    })
}

#[test]
fn held_cursor_key_repeats_after_delay() {
    let mut state = quiet_state();
    // Long release timeout: only the explicit release below ends the hold.
    let mut cursor = CursorRepeat::new().with_key_release_timeout_ms(10_000);

    // First press centres the cursor.
    let first = cursor.handle_key_press(KeyCode::Right).unwrap();
    state.apply_action(first);
    assert_eq!(state.hover(), Some(GridPos::new(12, 12)));

    // 150 ms delay then one move per 50 ms.
    for action in cursor.update(100) {
        state.apply_action(action);
    }
    assert_eq!(state.hover(), Some(GridPos::new(12, 12)));

    for action in cursor.update(150) {
        state.apply_action(action);
    }
    assert_eq!(state.hover(), Some(GridPos::new(14, 12)));

    cursor.handle_key_release(KeyCode::Right);
    assert!(cursor.update(500).is_empty());
}

#[test]
fn keyboard_selects_and_places_at_cursor() {
    let mut state = quiet_state();

    for code in [KeyCode::Down, KeyCode::Down, KeyCode::Char('2'), KeyCode::Char(' ')] {
        if let Some(action) = handle_key_event(key(code)) {
            state.apply_action(action);
        }
    }

    let defense = state
        .objects()
        .defense_at(GridPos::new(12, 13))
        .expect("defender at cursor");
    assert_eq!(defense.tag(), ObjectTag::Defense);
    assert_eq!(state.selected(), DefenseKind::Defender2);

    // Same tile again is rejected.
    assert!(!state.apply_action(GameAction::PlaceDefense));
    assert_eq!(state.placed(), 1);
}

#[test]
fn mouse_move_hovers_and_release_places() {
    let mut state = quiet_state();
    let view = GameView::default();
    let projection = view.projection(Viewport::new(120, 60));

    // Tile (0,0) band is cells (59..=60, 2..=3).
    let moved = handle_mouse_event(mouse(MouseEventKind::Moved, 60, 3));
    let Some(PointerAction::Hover { col, row }) = moved else {
        panic!("expected hover, got {moved:?}");
    };
    hover_at_screen(&mut state, &projection, cell_center(col, row));
    assert_eq!(state.hover(), Some(GridPos::new(0, 0)));

    let released = handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 59, 2));
    let Some(PointerAction::Click { col, row }) = released else {
        panic!("expected click, got {released:?}");
    };
    place_at_screen(&mut state, &projection, cell_center(col, row)).unwrap();
    assert!(state.objects().defense_at(GridPos::new(0, 0)).is_some());
}

#[test]
fn click_off_the_grid_clears_hover_and_places_nothing() {
    let mut state = quiet_state();
    let projection = GameView::default().projection(Viewport::new(120, 60));
    state.set_hover(Some(GridPos::new(3, 3)));

    assert!(place_at_screen(&mut state, &projection, cell_center(0, 0)).is_err());
    assert_eq!(state.hover(), None);
    assert_eq!(state.objects().count(ObjectTag::Defense), 0);
}
