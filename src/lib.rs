#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Bar Status
//!
//! > **A status line generator for i3bar, lemonbar and dzen2.**
//!
//! Independent widgets (a clock, CPU load, battery, the output of shell commands) each
//! run in their own Tokio task and push fresh content to a single orchestrator. The
//! orchestrator keeps the latest content of every widget and writes the whole bar to
//! stdout every time any widget changes.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Why one task per widget?
//!
//! Widgets refresh on completely different schedules: the clock every second, the
//! battery every ten, a streaming command whenever it prints a line, a watched file
//! whenever the kernel says so. Giving each one its own task means:
//! - **Isolation**: a slow or broken widget never stalls the others.
//! - **One writer**: only the orchestrator touches the output, so lines are never torn.
//! - **Fixed slots**: each widget owns one slot on the bar, in registration order.
//!
//! ## 🚀 Core Concepts
//!
//! ### Generators
//! A [`Generator`](framework::Generator) produces a list of
//! [`Element`](model::Element)s and says when it should produce again. The emission
//! loop is written **once** in [`framework::drive`] and works for every widget kind.
//!
//! ### Failures stick
//! A generator that fails is replaced on the bar by an error element and stops. There
//! is no retry: restart the bar to try again.
//!
//! ### Mocking
//! [`framework::mock`] provides a generator driven step by step from a test and a sink
//! that hands every written bar back to the test.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! - **Role**: Channels, the stop broadcast, done acknowledgements and the per-widget loop.
//! - **Key items**: [`Generator`](framework::Generator), [`drive`](framework::drive),
//!   [`channel_set`](framework::channel_set).
//!
//! ### 2. The Orchestrator ([`lifecycle`])
//! - **Role**: Owns the widget cache, reacts to terminate/suspend/resume and performs
//!   the graceful shutdown.
//! - **Key items**: [`Status`](lifecycle::Status),
//!   [`lifecycle_channel`](lifecycle::lifecycle_channel).
//!
//! ### 3. The Widgets ([`generators`], [`probes`])
//! - **Role**: Interval, streaming and file-watch generators, plus the probes they run.
//!
//! ### 4. The Output ([`sinks`], [`model`])
//! - **Role**: The element model and the three bar wire formats.
//!
//! ### 5. The Wiring ([`config`])
//! - **Role**: Turns a JSON file into generators and a sink.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # i3bar with the built-in widgets, debug logs on stderr
//! RUST_LOG=debug cargo run
//!
//! # lemonbar with a custom widget list
//! cargo run -- --config bar.json --format lemonbar | lemonbar
//! ```

pub mod config;
pub mod framework;
pub mod generators;
pub mod lifecycle;
pub mod model;
pub mod probes;
pub mod sinks;
