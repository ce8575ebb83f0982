//! # Mock Framework
//!
//! Utilities for testing the orchestrator deterministically.
//!
//! - [`ScriptedGenerator`]: a widget whose results are pushed by the test through a
//!   [`ScriptHandle`]. Each pushed result is one production; between productions the
//!   widget waits (and is therefore stoppable) until the next one arrives. The eager
//!   first production is whatever was pushed before start, or an empty list.
//! - [`ChannelSink`]: a sink that forwards every aggregate it receives to a channel the
//!   test can await.
//!
//! # Example
//! ```ignore
//! let (gen, script) = ScriptedGenerator::new("a");
//! let (sink, mut writes) = ChannelSink::new();
//! status.register(Box::new(gen))?;
//! script.push_texts(&["a1"]);
//! assert_eq!(texts(&writes.recv().await.unwrap()), vec!["a1"]);
//! ```

use crate::framework::{Generator, Trigger, WidgetError};
use crate::model::Element;
use crate::sinks::{Sink, SinkError};
use async_trait::async_trait;
use tokio::sync::mpsc;

type Scripted = Result<Vec<Element>, WidgetError>;

/// A widget that produces exactly what the test pushes, in order.
pub struct ScriptedGenerator {
    name: String,
    script: mpsc::UnboundedReceiver<Scripted>,
    pending: Option<Scripted>,
}

/// Test side of a [`ScriptedGenerator`]. Dropping it closes the widget's trigger.
#[derive(Clone)]
pub struct ScriptHandle {
    name: String,
    sender: mpsc::UnboundedSender<Scripted>,
}

impl ScriptedGenerator {
    pub fn new(name: impl Into<String>) -> (Self, ScriptHandle) {
        let name = name.into();
        let (sender, script) = mpsc::unbounded_channel();
        let gen = Self {
            name: name.clone(),
            script,
            pending: None,
        };
        (gen, ScriptHandle { name, sender })
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn produce(&mut self) -> Result<Vec<Element>, WidgetError> {
        match self.pending.take() {
            Some(result) => result,
            // The eager first production takes a result pushed before start, if any.
            // It never waits: productions are not interrupted by stop.
            None => self.script.try_recv().unwrap_or_else(|_| Ok(Vec::new())),
        }
    }

    async fn next_trigger(&mut self) -> Trigger {
        match self.script.recv().await {
            Some(result) => {
                self.pending = Some(result);
                Trigger::Fire
            }
            None => Trigger::Closed,
        }
    }
}

impl ScriptHandle {
    /// Queues one production result. Returns `false` if the widget task has ended.
    pub fn push(&self, result: Scripted) -> bool {
        self.sender.send(result).is_ok()
    }

    /// Queues one successful production of elements named after this widget.
    pub fn push_texts(&self, texts: &[&str]) -> bool {
        let elements = texts
            .iter()
            .map(|text| Element::new(self.name.clone(), *text))
            .collect();
        self.push(Ok(elements))
    }

    /// True once the widget (and therefore its task) has been dropped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Waits until the widget has been dropped.
    pub async fn closed(&self) {
        self.sender.closed().await
    }
}

/// A sink that forwards every aggregate to an unbounded channel.
pub struct ChannelSink {
    writes: mpsc::UnboundedSender<Vec<Element>>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Vec<Element>>) {
        let (writes, receiver) = mpsc::unbounded_channel();
        (Self { writes }, receiver)
    }
}

impl Sink for ChannelSink {
    fn write(&mut self, elements: &[Element]) -> Result<(), SinkError> {
        // A test that stopped listening is not a sink failure
        let _ = self.writes.send(elements.to_vec());
        Ok(())
    }
}

/// Full texts of an aggregate, in order.
pub fn texts(elements: &[Element]) -> Vec<String> {
    elements.iter().map(|e| e.full_text.clone()).collect()
}
