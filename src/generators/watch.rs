//! Filesystem-event-driven polling.

use crate::framework::{Generator, Trigger, WidgetError};
use crate::generators::run_probe;
use crate::model::Element;
use crate::probes::Probe;
use async_trait::async_trait;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Runs a probe once at startup and again whenever one of the watched paths changes.
///
/// Bursts of events that arrive while a production is in flight collapse into a single
/// trigger.
pub struct WatchGenerator<P: ?Sized> {
    name: String,
    paths: Vec<PathBuf>,
    probe: Arc<P>,
    watcher: Option<RecommendedWatcher>,
    events: Option<mpsc::Receiver<()>>,
}

impl<P: Probe + ?Sized> WatchGenerator<P> {
    pub fn new(name: impl Into<String>, paths: Vec<PathBuf>, probe: Arc<P>) -> Self {
        Self {
            name: name.into(),
            paths,
            probe,
            watcher: None,
            events: None,
        }
    }

    fn watch(&mut self) -> Result<(), WidgetError> {
        let (sender, receiver) = mpsc::channel(1);
        let name = self.name.clone();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            match res {
                Ok(event) => {
                    debug!(widget = %name, kind = ?event.kind, "Filesystem event");
                    // Full means a trigger is already pending
                    let _ = sender.try_send(());
                }
                Err(e) => warn!(widget = %name, error = %e, "Watch error"),
            }
        })?;
        for path in &self.paths {
            watcher
                .watch(path, RecursiveMode::NonRecursive)
                .map_err(|e| WidgetError::Watch(format!("{}: {e}", path.display())))?;
        }
        self.watcher = Some(watcher);
        self.events = Some(receiver);
        Ok(())
    }
}

#[async_trait]
impl<P: Probe + ?Sized> Generator for WatchGenerator<P> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn produce(&mut self) -> Result<Vec<Element>, WidgetError> {
        if self.watcher.is_none() {
            self.watch()?;
        }
        run_probe(&self.probe).await
    }

    async fn next_trigger(&mut self) -> Trigger {
        let Some(events) = self.events.as_mut() else {
            return Trigger::Closed;
        };
        match events.recv().await {
            Some(()) => Trigger::Fire,
            None => Trigger::Closed,
        }
    }
}
