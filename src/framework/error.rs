//! # Widget Errors
//!
//! Errors that end a single widget. They never propagate as control flow: the driver
//! loop turns them into a [`WidgetEvent::Failed`](super::WidgetEvent::Failed) value
//! and the orchestrator renders them in the widget's slot.

/// An unrecoverable failure of one widget.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WidgetError {
    /// The probe function reported a failure (or panicked).
    #[error("{0}")]
    Probe(String),

    /// An external command could not be run or exited unsuccessfully.
    #[error("command failed: {0}")]
    Command(String),

    /// Reading from a file, pipe or process failed.
    #[error("i/o error: {0}")]
    Io(String),

    /// A record could not be decoded into elements.
    #[error("invalid record: {0}")]
    Decode(String),

    /// A streaming process closed its output.
    #[error("stream ended")]
    StreamEnded,

    /// The filesystem watcher could not be set up.
    #[error("watch failed: {0}")]
    Watch(String),
}

impl From<std::io::Error> for WidgetError {
    fn from(e: std::io::Error) -> Self {
        WidgetError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for WidgetError {
    fn from(e: serde_json::Error) -> Self {
        WidgetError::Decode(e.to_string())
    }
}

impl From<notify::Error> for WidgetError {
    fn from(e: notify::Error) -> Self {
        WidgetError::Watch(e.to_string())
    }
}
