//! Pure data structures shared by producers, the orchestrator and the sinks.

pub mod color;
pub mod element;

pub use color::*;
pub use element::*;
