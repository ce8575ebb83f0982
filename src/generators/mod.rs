//! Widget implementations, one per kind of trigger.
//!
//! | Generator | Trigger | Production |
//! |---|---|---|
//! | [`IntervalGenerator`] | fixed period | runs a [`Probe`](crate::probes::Probe) on the blocking pool |
//! | [`StreamingGenerator`] | a line of process output | decodes the line as element(s) |
//! | [`WatchGenerator`] | a filesystem event | runs a [`Probe`](crate::probes::Probe) on the blocking pool |
//!
//! All of them fail permanently on the first production error; the driver loop reports
//! it and never calls them again.

pub mod interval;
pub mod streaming;
pub mod watch;

pub use interval::*;
pub use streaming::*;
pub use watch::*;

use crate::framework::WidgetError;
use crate::model::Element;
use crate::probes::Probe;
use std::sync::Arc;

/// Runs a synchronous probe without stalling the runtime's worker threads.
pub(crate) async fn run_probe<P: Probe + ?Sized>(probe: &Arc<P>) -> Result<Vec<Element>, WidgetError> {
    let probe = Arc::clone(probe);
    match tokio::task::spawn_blocking(move || probe.probe()).await {
        Ok(result) => result,
        Err(e) => Err(WidgetError::Probe(format!("probe panicked: {e}"))),
    }
}
