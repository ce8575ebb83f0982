//! Timer-driven polling.

use crate::framework::{Generator, Trigger, WidgetError};
use crate::generators::run_probe;
use crate::model::Element;
use crate::probes::Probe;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Shortest accepted period; a zero period would spin.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Runs a probe once at startup and then once per period.
pub struct IntervalGenerator<P: ?Sized> {
    name: String,
    probe: Arc<P>,
    every: Duration,
    ticker: Option<Interval>,
}

impl<P: Probe + ?Sized> IntervalGenerator<P> {
    pub fn new(name: impl Into<String>, probe: Arc<P>, every: Duration) -> Self {
        Self {
            name: name.into(),
            probe,
            every: every.max(MIN_PERIOD),
            ticker: None,
        }
    }

    pub fn every(&self) -> Duration {
        self.every
    }
}

#[async_trait]
impl<P: Probe + ?Sized> Generator for IntervalGenerator<P> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn produce(&mut self) -> Result<Vec<Element>, WidgetError> {
        run_probe(&self.probe).await
    }

    async fn next_trigger(&mut self) -> Trigger {
        let every = self.every;
        // Created on first use so construction works outside a runtime
        let ticker = self.ticker.get_or_insert_with(|| {
            let mut ticker = interval_at(Instant::now() + every, every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker
        });
        ticker.tick().await;
        Trigger::Fire
    }
}
