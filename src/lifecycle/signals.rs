//! # Lifecycle Signals
//!
//! Three control signals drive the orchestrator: terminate, suspend and resume. They
//! travel on one channel, so a suspend followed by a resume is always seen in that
//! order. [`lifecycle_channel`] returns the sending half ([`SignalHandle`], cheap to
//! clone) and the receiving half ([`LifecycleSignals`], consumed by
//! [`Status::start`](super::Status::start)).
//!
//! Where the signals come from is up to the caller. On Unix, [`forward_os_signals`]
//! maps process signals onto a handle:
//!
//! | Signal | Effect |
//! |---|---|
//! | `SIGINT`, `SIGTERM` | terminate |
//! | `SIGUSR1` | suspend |
//! | `SIGUSR2` | resume |

use tokio::sync::mpsc;
use tracing::info;

/// One lifecycle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleSignal {
    Terminate,
    Suspend,
    Resume,
}

/// Receiving half of the lifecycle signal set.
///
/// All three signals share one channel, so they are seen in the order they were sent.
#[derive(Debug)]
pub struct LifecycleSignals {
    receiver: mpsc::UnboundedReceiver<LifecycleSignal>,
}

impl LifecycleSignals {
    /// The next request. Every handle being dropped reads as [`LifecycleSignal::Terminate`].
    pub(crate) async fn recv(&mut self) -> LifecycleSignal {
        self.receiver
            .recv()
            .await
            .unwrap_or(LifecycleSignal::Terminate)
    }
}

/// Sending half of the lifecycle signal set.
///
/// Every method is non-blocking.
#[derive(Debug, Clone)]
pub struct SignalHandle {
    sender: mpsc::UnboundedSender<LifecycleSignal>,
}

pub fn lifecycle_channel() -> (SignalHandle, LifecycleSignals) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (SignalHandle { sender }, LifecycleSignals { receiver })
}

impl SignalHandle {
    pub fn send(&self, signal: LifecycleSignal) {
        // Fails only once the status has stopped listening
        let _ = self.sender.send(signal);
    }

    pub fn terminate(&self) {
        self.send(LifecycleSignal::Terminate);
    }

    pub fn suspend(&self) {
        self.send(LifecycleSignal::Suspend);
    }

    pub fn resume(&self) {
        self.send(LifecycleSignal::Resume);
    }
}

/// Raw number of the signal mapped to suspend, for bar protocols that advertise it.
#[cfg(unix)]
pub fn suspend_signal_number() -> i32 {
    tokio::signal::unix::SignalKind::user_defined1().as_raw_value()
}

/// Raw number of the signal mapped to resume.
#[cfg(unix)]
pub fn resume_signal_number() -> i32 {
    tokio::signal::unix::SignalKind::user_defined2().as_raw_value()
}

/// Forwards process signals to `handle` until the runtime shuts down.
#[cfg(unix)]
pub fn forward_os_signals(handle: SignalHandle) -> std::io::Result<tokio::task::JoinHandle<()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigusr1 = signal(SignalKind::user_defined1())?;
    let mut sigusr2 = signal(SignalKind::user_defined2())?;

    Ok(tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = sigint.recv() => {
                    info!(signal = "SIGINT", "Signal received");
                    handle.terminate();
                }
                _ = sigterm.recv() => {
                    info!(signal = "SIGTERM", "Signal received");
                    handle.terminate();
                }
                _ = sigusr1.recv() => {
                    info!(signal = "SIGUSR1", "Signal received");
                    handle.suspend();
                }
                _ = sigusr2.recv() => {
                    info!(signal = "SIGUSR2", "Signal received");
                    handle.resume();
                }
            }
        }
    }))
}

/// Forwards Ctrl-C to `handle` as a terminate request.
#[cfg(not(unix))]
pub fn forward_os_signals(handle: SignalHandle) -> std::io::Result<tokio::task::JoinHandle<()>> {
    Ok(tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!(signal = "ctrl-c", "Signal received");
            handle.terminate();
        }
    }))
}
