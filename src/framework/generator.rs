//! # The Generator Contract
//!
//! Every widget is a [`Generator`]: something that can produce its current elements on
//! demand and can wait for the next reason to produce again. The *what triggers
//! production* part varies (a timer, a line of process output, a filesystem event); the
//! *how results are delivered* part is written once in [`drive`](super::drive).

use crate::framework::WidgetError;
use crate::model::Element;
use async_trait::async_trait;

/// Outcome of waiting for the next production trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Produce again.
    Fire,
    /// The trigger source is gone; no more data will ever arrive.
    Closed,
}

/// Trait that every widget implements to be driven by the orchestrator.
///
/// # Architecture Note
/// The orchestrator holds widgets as `Box<dyn Generator>`, so the trait is made
/// object-safe with `#[async_trait]`. Implementations own their timing source; they never
/// see the channels, the stop request or the cache. Those belong to the driver loop.
///
/// `produce` may take a while (e.g. run a command) and is never cancelled: the stop
/// request is observed while waiting in `next_trigger` and while a result is waiting
/// to be delivered, so a task acknowledges stop only once its last production returned.
#[async_trait]
pub trait Generator: Send + 'static {
    /// Short name used in log lines.
    fn name(&self) -> &str;

    /// Produce the widget's current elements. An error is terminal for the widget.
    async fn produce(&mut self) -> Result<Vec<Element>, WidgetError>;

    /// Wait until the widget should produce again.
    async fn next_trigger(&mut self) -> Trigger;
}
