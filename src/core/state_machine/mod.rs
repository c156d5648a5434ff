//! States Language definitions and the rewrite passes that prepare them for a local engine.

pub mod schema;
pub mod transform;
pub mod walker;

pub use schema::{Definition, StateKind, StateNode};
