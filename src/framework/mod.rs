//! Generic widget framework.
//!
//! This module provides the building blocks shared by every widget, independent of
//! what drives it.
//!
//! # Main Components
//!
//! - [`Generator`] - Trait every widget implements (produce once, await next trigger)
//! - [`drive`] - The shared driver loop run by every widget task
//! - [`channel_set`] - The update / stop / done channels between tasks and orchestrator
//! - [`WidgetError`] - Errors that end a single widget
//!
//! # Testing
//!
//! See the [`mock`] module for a scripted widget and a channel-backed sink.

pub mod channels;
pub mod driver;
pub mod error;
pub mod generator;
pub mod mock;

pub use channels::*;
pub use driver::*;
pub use error::*;
pub use generator::*;
