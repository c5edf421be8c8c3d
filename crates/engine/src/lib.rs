//! Engine glue between wall-clock frames and the deterministic core.
//!
//! - [`timestep`]: turns elapsed frame time into fixed simulation ticks
//! - [`place`]: resolves pointer positions to tiles for hover and placement

pub mod place;
pub mod timestep;

pub use blockwave_core as core;
pub use blockwave_types as types;

pub use place::{cell_center, hover_at_screen, place_at_screen};
pub use timestep::{FixedTimestep, DEFAULT_MAX_STEPS};
