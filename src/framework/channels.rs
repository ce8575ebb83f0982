//! # The Generator Channel Set
//!
//! Three logical channels connect every widget task to the orchestrator:
//!
//! - **events**: [`WidgetEvent`]s (an update or a fatal error), many senders, one
//!   receiver. Capacity 1, the closest Tokio gets to a rendezvous channel: a fast widget
//!   waits for the orchestrator instead of queueing stale updates.
//! - **stop**: a [`CancellationToken`]. Cancelling the parent never blocks, no matter
//!   how many tasks there are or what they are doing.
//! - **done**: one acknowledgment per task, sent by a [`DoneGuard`] when the task
//!   finishes. Capacity equals the task count, so the send can never block.

use crate::framework::WidgetError;
use crate::model::Element;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

/// A message from a widget task to the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    /// The widget's latest elements; replaces whatever its slot held before.
    Update { index: usize, elements: Vec<Element> },
    /// The widget failed and will never produce again.
    Failed { index: usize, error: WidgetError },
}

impl WidgetEvent {
    pub fn index(&self) -> usize {
        match self {
            WidgetEvent::Update { index, .. } | WidgetEvent::Failed { index, .. } => *index,
        }
    }
}

/// Sends the task's done acknowledgment when dropped.
///
/// Dropping happens exactly once on every way out of the task, including an unwinding
/// panic, so the orchestrator's shutdown count always completes.
#[derive(Debug)]
pub struct DoneGuard {
    index: usize,
    done: mpsc::Sender<usize>,
}

impl Drop for DoneGuard {
    fn drop(&mut self) {
        match self.done.try_send(self.index) {
            Ok(()) => debug!(index = self.index, "Done"),
            // Only possible if the orchestrator is already gone
            Err(e) => error!(index = self.index, error = %e, "Done acknowledgment lost"),
        }
    }
}

/// The task-side half of the channel set, bound to one registration index.
#[derive(Debug)]
pub struct GeneratorCtx {
    index: usize,
    events: mpsc::Sender<WidgetEvent>,
    stop: CancellationToken,
    done: DoneGuard,
}

impl GeneratorCtx {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Token that is cancelled when the orchestrator asks this task to stop.
    pub fn stop(&self) -> &CancellationToken {
        &self.stop
    }

    /// Sends one production result. Returns `false` once the orchestrator has gone away.
    pub async fn emit(&self, result: Result<Vec<Element>, WidgetError>) -> bool {
        let event = match result {
            Ok(elements) => WidgetEvent::Update {
                index: self.index,
                elements,
            },
            Err(error) => WidgetEvent::Failed {
                index: self.index,
                error,
            },
        };
        self.events.send(event).await.is_ok()
    }

    /// Consumes the context, acknowledging that the task is done.
    pub fn finish(self) {
        drop(self.done);
    }
}

/// The orchestrator-side half of the channel set.
#[derive(Debug)]
pub struct ChannelSet {
    pub events: mpsc::Receiver<WidgetEvent>,
    pub done: mpsc::Receiver<usize>,
    pub stop: CancellationToken,
    producers: usize,
}

impl ChannelSet {
    /// Number of task contexts handed out, i.e. the done acknowledgments to expect.
    pub fn producers(&self) -> usize {
        self.producers
    }
}

/// Builds the channel set for `producers` tasks.
///
/// The orchestrator keeps no sender of its own: once every context is dropped the
/// receivers report closed.
pub fn channel_set(producers: usize) -> (ChannelSet, Vec<GeneratorCtx>) {
    let (events_tx, events) = mpsc::channel(1);
    let (done_tx, done) = mpsc::channel(producers.max(1));
    let stop = CancellationToken::new();

    let contexts = (0..producers)
        .map(|index| GeneratorCtx {
            index,
            events: events_tx.clone(),
            stop: stop.child_token(),
            done: DoneGuard {
                index,
                done: done_tx.clone(),
            },
        })
        .collect();

    let set = ChannelSet {
        events,
        done,
        stop,
        producers,
    };
    (set, contexts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn done_is_acknowledged_once_per_context() {
        let (mut set, contexts) = channel_set(3);
        assert_eq!(set.producers(), 3);
        for ctx in contexts {
            ctx.finish();
        }
        let mut seen = Vec::new();
        while let Some(index) = set.done.recv().await {
            seen.push(index);
        }
        seen.sort();
        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn stop_reaches_every_context() {
        let (set, contexts) = channel_set(2);
        set.stop.cancel();
        assert!(contexts.iter().all(|ctx| ctx.stop().is_cancelled()));
    }

    #[tokio::test]
    async fn emit_tags_events_with_index() {
        let (mut set, mut contexts) = channel_set(2);
        let second = contexts.pop().unwrap();
        assert!(second.emit(Err(WidgetError::StreamEnded)).await);
        let event = set.events.recv().await.unwrap();
        assert_eq!(event.index(), 1);
        assert_eq!(
            event,
            WidgetEvent::Failed {
                index: 1,
                error: WidgetError::StreamEnded
            }
        );
    }
}
