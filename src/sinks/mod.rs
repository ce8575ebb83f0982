//! # Sinks
//!
//! A [`Sink`] receives the full ordered aggregate every time it changes and is
//! responsible for turning it into a bar's wire format. The orchestrator calls it from
//! its control loop, so a sink must not block for long.
//!
//! Renderers: [`I3Bar`], [`Lemonbar`], [`Dzen2`].

pub mod dzen2;
pub mod i3bar;
pub mod lemonbar;

pub use dzen2::*;
pub use i3bar::*;
pub use lemonbar::*;

use crate::model::Element;

/// Consumer of the rendered aggregate.
pub trait Sink: Send {
    fn write(&mut self, elements: &[Element]) -> Result<(), SinkError>;
}

/// Errors a sink can report. Any of them ends the orchestrator's control loop.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn write(&mut self, elements: &[Element]) -> Result<(), SinkError> {
        (**self).write(elements)
    }
}
