//! # Status Lifecycle & Orchestration
//!
//! This module owns the runtime lifecycle of the bar: spawning one task per widget,
//! folding their updates into one ordered status line, reacting to suspend / resume /
//! terminate, and shutting every task down without leaking any of them.
//!
//! ## The Status Pattern
//!
//! ```rust,ignore
//! let (handle, signals) = lifecycle_channel();
//! forward_os_signals(handle)?;
//!
//! let mut status = Status::new(I3Bar::new(I3BarHeader::default(), io::stdout()));
//! status.register(Box::new(clock))?;
//! status.register(Box::new(battery))?;
//!
//! // Blocks until terminate, then stops every widget task
//! let report = status.start(signals).await?;
//! ```
//!
//! ## Graceful Shutdown
//!
//! 1. **Cancel the stop token** - every widget task sees it at its next wait point
//! 2. **Drain** - keep consuming updates (discarding them) so no task stays blocked on
//!    its last send
//! 3. **Count** - stop once one done acknowledgment per widget has arrived
//! 4. **Join** - await the task handles and log any that panicked
//!
//! See [`tracing`] for logging setup.

pub mod signals;
pub mod status;
pub mod tracing;

pub use signals::*;
pub use status::*;
pub use self::tracing::*;
