//! Synchronous probes: read some system state once and describe it as elements.
//!
//! A probe may be slow (it can run a command) and may fail. It is always run on the
//! blocking pool by [`IntervalGenerator`](crate::generators::IntervalGenerator) or
//! [`WatchGenerator`](crate::generators::WatchGenerator).

pub mod battery;
pub mod clock;
pub mod command;
pub mod cpu;

pub use battery::*;
pub use clock::*;
pub use command::*;
pub use cpu::*;

use crate::framework::WidgetError;
use crate::model::Element;

pub type ProbeResult = Result<Vec<Element>, WidgetError>;

/// One-shot reading of a widget's state.
pub trait Probe: Send + Sync + 'static {
    fn probe(&self) -> ProbeResult;
}

impl<F> Probe for F
where
    F: Fn() -> ProbeResult + Send + Sync + 'static,
{
    fn probe(&self) -> ProbeResult {
        self()
    }
}

/// A horizontal meter: `progress` filled cells out of `size`.
pub fn hbar(progress: usize, size: usize, filled: char, empty: char) -> String {
    let progress = progress.min(size);
    std::iter::repeat(filled)
        .take(progress)
        .chain(std::iter::repeat(empty).take(size - progress))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hbar_fills_from_the_left() {
        assert_eq!(hbar(2, 5, '+', '-'), "++---");
        assert_eq!(hbar(0, 3, '+', '-'), "---");
        assert_eq!(hbar(9, 3, '+', '-'), "+++");
    }
}
