//! Terminal input module (engine-facing).
//!
//! This module is intentionally independent of any UI framework. It maps
//! `crossterm` key and mouse events into [`crate::types::GameAction`]s and
//! pointer actions, and provides DAS/ARR auto-repeat for the cursor keys
//! (including terminals without key-release events).

pub mod handler;
pub mod map;

pub use blockwave_types as types;

pub use handler::CursorRepeat;
pub use map::{
    camera_pan, cursor_direction, handle_key_event, handle_mouse_event, should_quit,
    PointerAction,
};
