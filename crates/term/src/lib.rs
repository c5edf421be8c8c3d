//! Terminal display provider.
//!
//! A small, game-oriented rendering layer: the isometric view is drawn into
//! a framebuffer of styled cells, which is then flushed to the terminal.
//!
//! - [`fb`]: framebuffer and styles
//! - [`assets`]: the hardcoded sprite library
//! - [`game_view`]: snapshot -> framebuffer (pure, testable)
//! - [`renderer`]: framebuffer -> terminal (diffed)

pub mod assets;
pub mod fb;
pub mod game_view;
pub mod renderer;

pub use blockwave_core as core;
pub use blockwave_types as types;

pub use assets::{AssetLibrary, Sprite};
pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
