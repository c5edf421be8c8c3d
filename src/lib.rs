//! Blockwave (workspace facade crate).
//!
//! Re-exports the workspace crates as `blockwave::{core,engine,input,term,types}`
//! and hosts the runtime configuration used by the binary.

pub mod config;

pub use blockwave_core as core;
pub use blockwave_engine as engine;
pub use blockwave_input as input;
pub use blockwave_term as term;
pub use blockwave_types as types;

pub use config::{init_logging, AppConfig};
