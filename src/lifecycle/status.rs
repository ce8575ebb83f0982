use crate::framework::{channel_set, drive, ChannelSet, Generator, WidgetError, WidgetEvent};
use crate::lifecycle::{LifecycleSignal, LifecycleSignals};
use crate::model::Element;
use crate::sinks::{Sink, SinkError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Where the orchestrator is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Registered but not started yet.
    Idle,
    Running,
    /// Updates are drained and discarded until resume or terminate.
    Suspended,
    ShuttingDown,
    Stopped,
}

/// Errors returned by [`Status`].
#[derive(Debug, thiserror::Error)]
pub enum StatusError {
    /// `start` was called on a status that already ran.
    #[error("status already started")]
    AlreadyStarted,

    /// `register` was called after `start`.
    #[error("cannot register a widget on a started status")]
    RegisterAfterStart,

    /// The sink failed; the control loop stopped and every widget was shut down.
    #[error("sink failed: {0}")]
    Sink(#[from] SinkError),

    /// The shutdown drain ended before every widget acknowledged.
    #[error("{remaining} widget(s) never acknowledged shutdown")]
    ShutdownIncomplete { remaining: usize },
}

/// Summary of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownReport {
    pub producers: usize,
    /// Done acknowledgments observed during the shutdown drain.
    pub acknowledged: usize,
}

struct Registration {
    name: String,
    generator: Option<Box<dyn Generator>>,
    last_error: Option<WidgetError>,
}

/// The orchestrator: an ordered widget registry, a per-widget cache and the control loop.
///
/// # Architecture Note
/// Widgets run in their own Tokio tasks and only ever talk to the orchestrator through
/// [`WidgetEvent`] messages. The cache and the aggregate live on the stack of
/// [`start`](Status::start) and are touched by nothing else, so no locks are involved.
///
/// Registration order is the display order, whatever order updates arrive in.
pub struct Status {
    registrations: Vec<Registration>,
    sink: Box<dyn Sink>,
    started: bool,
    state: watch::Sender<LifecycleState>,
}

impl Status {
    pub fn new(sink: impl Sink + 'static) -> Self {
        let (state, _) = watch::channel(LifecycleState::Idle);
        Self {
            registrations: Vec::new(),
            sink: Box::new(sink),
            started: false,
            state,
        }
    }

    /// Appends a widget and returns its registration index.
    pub fn register(&mut self, generator: Box<dyn Generator>) -> Result<usize, StatusError> {
        if self.started {
            return Err(StatusError::RegisterAfterStart);
        }
        let index = self.registrations.len();
        let name = generator.name().to_string();
        debug!(index, widget = %name, "Registered");
        self.registrations.push(Registration {
            name,
            generator: Some(generator),
            last_error: None,
        });
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    pub fn state(&self) -> LifecycleState {
        *self.state.borrow()
    }

    /// Observe lifecycle transitions, e.g. to wait until the status is suspended.
    pub fn subscribe_state(&self) -> watch::Receiver<LifecycleState> {
        self.state.subscribe()
    }

    /// The error that ended widget `index`, if it failed.
    pub fn last_error(&self, index: usize) -> Option<&WidgetError> {
        self.registrations.get(index)?.last_error.as_ref()
    }

    /// Spawns every widget and runs the control loop until terminate.
    ///
    /// Returns once every widget task has acknowledged the stop request.
    pub async fn start(
        &mut self,
        mut signals: LifecycleSignals,
    ) -> Result<ShutdownReport, StatusError> {
        if self.started {
            return Err(StatusError::AlreadyStarted);
        }
        self.started = true;

        let producers = self.registrations.len();
        let (mut channels, contexts) = channel_set(producers);
        let mut handles = Vec::with_capacity(producers);
        for (registration, ctx) in self.registrations.iter_mut().zip(contexts) {
            // Every registration still holds its generator: start runs once
            if let Some(mut generator) = registration.generator.take() {
                handles.push(tokio::spawn(async move {
                    drive(generator.as_mut(), ctx).await;
                }));
            }
        }
        info!(producers, "Status started");
        self.state.send_replace(LifecycleState::Running);

        let mut cache: Vec<Vec<Element>> = vec![Vec::new(); producers];
        let outcome = self.control_loop(&mut channels, &mut cache, &mut signals).await;

        self.state.send_replace(LifecycleState::ShuttingDown);
        let acknowledged = shutdown(channels, handles).await;
        self.state.send_replace(LifecycleState::Stopped);

        outcome?;
        if acknowledged < producers {
            return Err(StatusError::ShutdownIncomplete {
                remaining: producers - acknowledged,
            });
        }
        info!(producers, "Status stopped");
        Ok(ShutdownReport {
            producers,
            acknowledged,
        })
    }

    async fn control_loop(
        &mut self,
        channels: &mut ChannelSet,
        cache: &mut [Vec<Element>],
        signals: &mut LifecycleSignals,
    ) -> Result<(), StatusError> {
        loop {
            tokio::select! {
                // Lifecycle requests go first so a queued suspend/resume pair is handled
                // before any update that arrived after it
                biased;
                signal = signals.recv() => match signal {
                    LifecycleSignal::Terminate => {
                        info!("Received terminate signal, shutting down");
                        return Ok(());
                    }
                    LifecycleSignal::Suspend => {
                        info!("Received suspend signal, suspending");
                        self.state.send_replace(LifecycleState::Suspended);
                        let mut failures = Vec::new();
                        if self.suspended(channels, signals, &mut failures).await == Wake::Terminate {
                            return Ok(());
                        }
                        self.state.send_replace(LifecycleState::Running);
                        self.show_failures(failures, cache)?;
                    }
                    LifecycleSignal::Resume => {
                        debug!("Received resume signal while running, ignoring");
                    }
                },
                Some(event) = channels.events.recv() => self.apply(event, cache)?,
            }
        }
    }

    /// The suspended sub-loop. Updates are drained and dropped so that no widget stays
    /// blocked on a send while the bar is paused. Failures are recorded in `last_error`
    /// right away and collected into `failures` to be shown on resume.
    async fn suspended(
        &mut self,
        channels: &mut ChannelSet,
        signals: &mut LifecycleSignals,
        failures: &mut Vec<(usize, WidgetError)>,
    ) -> Wake {
        loop {
            tokio::select! {
                biased;
                signal = signals.recv() => match signal {
                    LifecycleSignal::Resume => {
                        info!("Received resume signal while suspended, resuming");
                        return Wake::Resume;
                    }
                    LifecycleSignal::Suspend => {
                        debug!("Received suspend signal while suspended, ignoring");
                    }
                    LifecycleSignal::Terminate => {
                        info!("Received terminate signal while suspended, shutting down");
                        return Wake::Terminate;
                    }
                },
                Some(event) = channels.events.recv() => match event {
                    WidgetEvent::Update { index, .. } => {
                        debug!(index, "Dropping update while suspended");
                    }
                    WidgetEvent::Failed { index, error } => {
                        let Some(registration) = self.registrations.get_mut(index) else {
                            warn!(index, "Event for unknown widget");
                            continue;
                        };
                        warn!(index, widget = %registration.name, error = %error, "Received widget error while suspended");
                        registration.last_error = Some(error.clone());
                        failures.push((index, error));
                    }
                },
            }
        }
    }

    /// Puts the error elements of failures received while suspended into the cache and
    /// writes the aggregate once.
    fn show_failures(
        &mut self,
        failures: Vec<(usize, WidgetError)>,
        cache: &mut [Vec<Element>],
    ) -> Result<(), StatusError> {
        if failures.is_empty() {
            return Ok(());
        }
        for (index, error) in failures {
            if let Some(slot) = cache.get_mut(index) {
                *slot = vec![Element::error(&error)];
            }
        }
        self.sink.write(&aggregate(cache))?;
        Ok(())
    }

    /// Overwrites the widget's cache slot and pushes the new aggregate to the sink.
    fn apply(&mut self, event: WidgetEvent, cache: &mut [Vec<Element>]) -> Result<(), StatusError> {
        let index = event.index();
        let Some(slot) = cache.get_mut(index) else {
            warn!(index, "Event for unknown widget");
            return Ok(());
        };
        match event {
            WidgetEvent::Update { elements, .. } => {
                debug!(index, count = elements.len(), "Update");
                *slot = elements;
            }
            WidgetEvent::Failed { error, .. } => {
                let registration = &mut self.registrations[index];
                warn!(index, widget = %registration.name, error = %error, "Received widget error");
                *slot = vec![Element::error(&error)];
                registration.last_error = Some(error);
            }
        }
        self.sink.write(&aggregate(cache))?;
        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Wake {
    Resume,
    Terminate,
}

/// Stops every widget task and waits for all of their done acknowledgments.
async fn shutdown(mut channels: ChannelSet, handles: Vec<JoinHandle<()>>) -> usize {
    let producers = channels.producers();
    info!(producers, "Sending stop to all widgets");
    channels.stop.cancel();

    // Keep draining events: a task may be blocked on its last send
    let mut acknowledged = 0;
    while acknowledged < producers {
        tokio::select! {
            Some(index) = channels.done.recv() => {
                acknowledged += 1;
                debug!(index, remaining = producers - acknowledged, "Widget done");
            }
            Some(event) = channels.events.recv() => {
                debug!(index = event.index(), "Discarding event during shutdown");
            }
            else => {
                error!(remaining = producers - acknowledged, "Channels closed before every widget acknowledged");
                break;
            }
        }
    }

    for handle in handles {
        if let Err(e) = handle.await {
            error!(error = %e, "Widget task failed");
        }
    }
    info!(acknowledged, "Stopped all widgets");
    acknowledged
}

/// The status line: every cache slot, concatenated in registration order.
pub fn aggregate(cache: &[Vec<Element>]) -> Vec<Element> {
    cache.iter().flatten().cloned().collect()
}
