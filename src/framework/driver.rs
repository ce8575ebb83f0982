//! # The Shared Driver Loop
//!
//! [`drive`] is the single control-flow pattern every widget task runs:
//!
//! 1. Produce once, immediately, and emit the result (errors included).
//! 2. Wait for either the next trigger or the stop request.
//! 3. On a trigger, produce and emit again. On an error, emit it and end the task.
//! 4. On stop, or when the trigger source closes, end the task.
//!
//! A production is never cancelled: stop is observed while waiting for a trigger and
//! while a result is waiting to be delivered. The task's done acknowledgment is sent
//! exactly once, on every exit path, when the [`GeneratorCtx`] is dropped, so it always
//! follows the return of the last production.

use crate::framework::{Generator, GeneratorCtx, Trigger};
use tracing::{debug, info, warn};

/// Runs `generator` until it fails, its trigger closes, or the orchestrator stops it.
pub async fn drive<G: Generator + ?Sized>(generator: &mut G, ctx: GeneratorCtx) {
    let index = ctx.index();
    let widget = generator.name().to_string();
    info!(index, %widget, "Widget started");

    loop {
        let result = generator.produce().await;
        let failed = result.is_err();
        if let Err(e) = &result {
            warn!(index, %widget, error = %e, "Widget failed");
        }
        let delivered = tokio::select! {
            biased;
            _ = ctx.stop().cancelled() => {
                debug!(index, %widget, "Stop requested while delivering");
                break;
            }
            delivered = ctx.emit(result) => delivered,
        };
        if !delivered {
            debug!(index, %widget, "Orchestrator gone");
            break;
        }
        if failed {
            break;
        }

        let trigger = tokio::select! {
            biased;
            _ = ctx.stop().cancelled() => {
                debug!(index, %widget, "Stop requested");
                break;
            }
            trigger = generator.next_trigger() => trigger,
        };
        if trigger == Trigger::Closed {
            info!(index, %widget, "Trigger closed");
            break;
        }
    }

    ctx.finish();
}
